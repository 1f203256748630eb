//! Contrato de reportes de batch.
//!
//! Un reporte es una función `(ejecuciones recolectadas) → Table`, enchufable
//! por tipo de experimento. Corre después de que todas las configuraciones
//! del batch terminaron, sobre los metadatos de ejecución y el artifact
//! store de sólo lectura.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::artifact::{Artifact, ArtifactStore, Lookup};
use crate::errors::LabError;

use super::Table;

/// Metadatos de una ejecución comprometida, recolectados por el engine para
/// los reportes del batch (incluye las ejecuciones de batches anidados).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskExecutionRecord {
    /// Nombre de la tarea que ejecutó.
    pub task: String,
    /// Identidad de la ejecución (fingerprint del conjunto discriminador).
    pub execution: String,
    /// Discriminadores resueltos, ya renderizados a texto estable.
    pub discriminators: BTreeMap<String, String>,
    /// `true` si la ejecución se sirvió de cache.
    pub reused: bool,
}

/// Contexto de sólo lectura entregado a `BatchReport::execute`. Las
/// ausencias de artifacts opcionales se acumulan en `missing` y el engine
/// las registra como eventos al terminar el reporte.
pub struct ReportContext<'a> {
    batch: &'a str,
    executions: &'a [TaskExecutionRecord],
    store: &'a dyn ArtifactStore,
    pub(crate) missing: Vec<(String, String)>,
}

impl<'a> ReportContext<'a> {
    pub(crate) fn new(batch: &'a str, executions: &'a [TaskExecutionRecord], store: &'a dyn ArtifactStore) -> Self {
        Self { batch,
               executions,
               store,
               missing: Vec::new() }
    }

    pub fn batch(&self) -> &str {
        self.batch
    }

    pub fn executions(&self) -> &[TaskExecutionRecord] {
        self.executions
    }

    /// Carga un artifact opcional; la ausencia queda anotada como condición
    /// blanda (contribución cero) y no interrumpe la agregación.
    pub fn load_optional(&mut self, execution: &str, key: &str) -> Lookup<Artifact> {
        let lookup = self.store.load(execution, key);
        if lookup.is_missing() {
            self.missing.push((execution.to_string(), key.to_string()));
        }
        lookup
    }
}

/// Comportamiento de reporte por tipo de experimento.
pub trait BatchReport {
    fn name(&self) -> &str;
    fn execute(&self, ctx: &mut ReportContext<'_>) -> Result<Table, LabError>;
}
