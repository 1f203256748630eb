//! `Batch`: colección ordenada de tareas que es, a su vez, una tarea.
//!
//! Un batch resuelve su propio espacio de parámetros y ejecuta sus tareas
//! una vez por configuración, en orden de registro. Anidado dentro de otro
//! batch se comporta como una tarea compuesta con discriminadores agregados.

use super::{Import, Task, TaskContext};
use crate::errors::LabError;
use crate::report::BatchReport;
use crate::space::ParameterSpace;

/// Origen del espacio de parámetros de un batch.
///
/// `Derived` cubre el caso cross-validation: el espacio (una configuración
/// por fold) sólo puede construirse leyendo artifacts importados del batch
/// externo (el índice del corpus preprocesado), así que se resuelve en el
/// momento de ejecutar el batch anidado.
pub enum SpaceSource {
    Fixed(ParameterSpace),
    Derived(Box<dyn Fn(&TaskContext<'_>) -> Result<ParameterSpace, LabError>>),
}

pub struct Batch {
    name: String,
    space: SpaceSource,
    imports: Vec<Import>,
    pub(crate) tasks: Vec<Task>,
    pub(crate) reports: Vec<Box<dyn BatchReport>>,
}

impl std::fmt::Debug for Batch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Batch").field("name", &self.name).finish_non_exhaustive()
    }
}

impl Batch {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               space: SpaceSource::Fixed(ParameterSpace::new()),
               imports: Vec::new(),
               tasks: Vec::new(),
               reports: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_space(mut self, space: ParameterSpace) -> Self {
        self.space = SpaceSource::Fixed(space);
        self
    }

    pub fn with_derived_space<F>(mut self, derive: F) -> Self
        where F: Fn(&TaskContext<'_>) -> Result<ParameterSpace, LabError> + 'static
    {
        self.space = SpaceSource::Derived(Box::new(derive));
        self
    }

    /// Import a nivel de batch: disponible para derivar el espacio y ligado
    /// antes de correr las tareas internas.
    pub fn add_import(mut self, import: Import) -> Self {
        self.imports.push(import);
        self
    }

    /// Registra una tarea. El orden de registro debe satisfacer las
    /// dependencias de import: no hay reordenamiento topológico implícito.
    pub fn add_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn add_report(mut self, report: impl BatchReport + 'static) -> Self {
        self.reports.push(Box::new(report));
        self
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    pub(crate) fn space(&self) -> &SpaceSource {
        &self.space
    }
}
