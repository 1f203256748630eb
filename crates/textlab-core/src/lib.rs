//! textlab-core: motor neutral de orquestación de experimentos.
//!
//! Planifica espacios de parámetros, ejecuta grafos de tareas en orden de
//! dependencias con cache por fingerprint y agrega resultados en tablas.
pub mod artifact;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod report;
pub mod space;
pub mod task;

pub use artifact::{Artifact, ArtifactKind, ArtifactStore, InMemoryArtifactStore, Lookup};
pub use engine::{BatchEngine, BatchOutcome, ExecutionPolicy};
pub use errors::LabError;
pub use event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
pub use report::{BatchReport, ReportContext, Table, TaskExecutionRecord};
pub use space::{Configuration, Dimension, DimensionBundle, ParameterSpace};
pub use task::{Batch, Import, LeafTask, SpaceSource, Task, TaskContext};
