//! Artifacts: salidas nominadas e inmutables de las tareas.

mod store;
mod types;

pub use store::{ArtifactStore, InMemoryArtifactStore};
pub use types::{Artifact, ArtifactKind, Lookup};
