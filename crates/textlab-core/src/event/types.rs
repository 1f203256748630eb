//! Tipos de evento de una corrida y estructura `RunEvent`.
//!
//! Rol: cada corrida del `BatchEngine` emite eventos a un `EventStore`
//! append-only. Son la superficie de observabilidad del motor: qué tarea
//! corrió, cuál se reusó de cache, qué artifact opcional faltó. El enum
//! `RunEventKind` es el contrato observable y estable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LabError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Un batch comenzó con `configurations` configuraciones planificadas.
    BatchStarted { batch: String, configurations: usize },
    /// Una tarea comenzó su ejecución. No implica éxito.
    TaskStarted { batch: String, task: String, execution: String },
    /// Una tarea terminó y comprometió sus outputs (hashes por clave).
    TaskFinished {
        batch: String,
        task: String,
        execution: String,
        outputs: Vec<String>,
    },
    /// La ejecución ya existía bajo el mismo fingerprint y la política es
    /// reuse-cached: la tarea se saltó y sus artifacts quedaron ligados.
    TaskReused { batch: String, task: String, execution: String },
    /// Una tarea terminó con error terminal. El batch no continúa.
    TaskFailed { batch: String, task: String, error: LabError },
    /// Condición blanda: un artifact opcional no estaba presente durante la
    /// agregación. Contribución cero, nunca fatal.
    ArtifactMissing { execution: String, key: String },
    /// Cierre de un batch con el fingerprint agregado de sus ejecuciones.
    BatchCompleted { batch: String, fingerprint: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64, // asignado por el EventStore (orden de append)
    pub run_id: Uuid,
    pub kind: RunEventKind,
    pub ts: DateTime<Utc>, // metadato (no entra en fingerprints)
}
