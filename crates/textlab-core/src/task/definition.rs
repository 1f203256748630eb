use serde::{Deserialize, Serialize};

use super::{Batch, TaskContext};
use crate::errors::LabError;

/// Arista de import declarada: la tarea consume, bajo el alias local, el
/// artifact `source_key` comprometido por `source_task`. La tarea fuente
/// debe haber ejecutado antes en el batch (no hay reordenamiento implícito).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Import {
    pub source_task: String,
    pub source_key: String,
    pub alias: String,
}

impl Import {
    pub fn new(source_task: impl Into<String>, source_key: impl Into<String>, alias: impl Into<String>) -> Self {
        Self { source_task: source_task.into(),
               source_key: source_key.into(),
               alias: alias.into() }
    }
}

/// Tarea hoja: la unidad ejecutable del grafo.
///
/// Implementaciones deben ser puras respecto a imports + configuración: leen
/// sólo artifacts ya comprometidos (sus imports declarados) y escriben sólo
/// sus propias claves de salida.
pub trait LeafTask {
    /// Identificador estable y único dentro del batch.
    fn name(&self) -> &str;

    /// Aristas de import requeridas antes de ejecutar.
    fn imports(&self) -> Vec<Import> {
        Vec::new()
    }

    /// Claves de artifact que esta tarea puede comprometer.
    fn output_keys(&self) -> Vec<String>;

    /// Claves de configuración que afectan la salida de la tarea. Dos
    /// ejecuciones con igual subconjunto discriminador son equivalentes para
    /// la cache.
    fn discriminator_keys(&self) -> Vec<String> {
        Vec::new()
    }

    /// Ejecución de la tarea. Todo error fatal aborta el batch y se propaga
    /// con la identidad de la tarea adjunta.
    fn execute(&self, ctx: &mut TaskContext<'_>) -> Result<(), LabError>;
}

/// Conjunto cerrado de variantes de tarea.
pub enum Task {
    Leaf(Box<dyn LeafTask>),
    Batch(Batch),
}

impl Task {
    pub fn leaf(task: impl LeafTask + 'static) -> Self {
        Task::Leaf(Box::new(task))
    }

    pub fn name(&self) -> &str {
        match self {
            Task::Leaf(t) => t.name(),
            Task::Batch(b) => b.name(),
        }
    }
}
