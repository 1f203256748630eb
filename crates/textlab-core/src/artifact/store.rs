//! Store de artifacts: un escritor por (ejecución, clave), lecturas libres.

use std::collections::HashMap;

use crate::errors::LabError;

use super::{Artifact, Lookup};

/// Almacenamiento de artifacts por ejecución. Las ejecuciones se identifican
/// por su fingerprint; dentro de una ejecución cada clave se escribe una sola
/// vez (overwrite sólo bajo política always-rerun, controlado por el engine).
pub trait ArtifactStore {
    /// Compromete un artifact bajo (ejecución, clave). Con `overwrite =
    /// false` es un error interno volver a escribir una clave existente.
    fn commit(&mut self, execution: &str, key: &str, artifact: Artifact, overwrite: bool) -> Result<(), LabError>;

    /// Lectura post-commit. Ausencia no es error.
    fn load(&self, execution: &str, key: &str) -> Lookup<Artifact>;

    /// `true` si la ejecución ya comprometió al menos un artifact (la base
    /// de la decisión de reuso del engine).
    fn contains_execution(&self, execution: &str) -> bool;
}

#[derive(Debug, Default)]
pub struct InMemoryArtifactStore {
    inner: HashMap<String, HashMap<String, Artifact>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactStore for InMemoryArtifactStore {
    fn commit(&mut self, execution: &str, key: &str, artifact: Artifact, overwrite: bool) -> Result<(), LabError> {
        let slot = self.inner.entry(execution.to_string()).or_default();
        if slot.contains_key(key) && !overwrite {
            return Err(LabError::Internal(format!("artifact `{key}` already committed for execution `{execution}`")));
        }
        slot.insert(key.to_string(), artifact);
        Ok(())
    }

    fn load(&self, execution: &str, key: &str) -> Lookup<Artifact> {
        match self.inner.get(execution).and_then(|slot| slot.get(key)) {
            Some(a) => Lookup::Found(a.clone()),
            None => Lookup::Missing,
        }
    }

    fn contains_execution(&self, execution: &str) -> bool {
        self.inner.get(execution).map(|slot| !slot.is_empty()).unwrap_or(false)
    }
}
