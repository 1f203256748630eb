//! Taxonomía de errores del motor.
//!
//! Todos los errores fatales viajan como `LabError`; las condiciones blandas
//! (artifact opcional ausente) NO son errores, se modelan con
//! `artifact::Lookup` y se registran como eventos.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone, Serialize, Deserialize)]
pub enum LabError {
    /// Espacio de parámetros malformado, numFolds inválido, discriminador
    /// requerido ausente. Aborta la planificación antes de ejecutar tareas.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Import sin resolver u orden de tareas inválido. Aborta el batch.
    #[error("unresolved dependency in task `{task}`: {detail}")]
    Dependency { task: String, detail: String },

    /// Nombre de feature repetido dentro de una instancia. Local a la
    /// extracción: la instancia ofensora se rechaza, el batch continúa.
    #[error("duplicate feature name `{0}` within one instance")]
    DuplicateFeature(String),

    /// Documento sin etiqueta gold en la fuente del reader. Fatal para la
    /// ingestión de ese documento.
    #[error("no gold label found for document `{0}`")]
    MissingGoldLabel(String),

    /// Error de una tarea, con la identidad de la tarea que falló adjunta.
    /// El engine envuelve aquí todo error fatal surgido dentro de `execute`.
    #[error("task `{task}` failed: {source}")]
    Task { task: String, #[source] source: Box<LabError> },

    #[error("internal: {0}")]
    Internal(String),
}

impl LabError {
    /// Adjunta la identidad de la tarea que origina el error. Idempotente:
    /// un error ya atribuido no se vuelve a envolver.
    pub fn in_task(self, task: &str) -> LabError {
        match self {
            LabError::Task { .. } => self,
            other => LabError::Task { task: task.to_string(),
                                      source: Box::new(other) },
        }
    }
}
