//! Contexto de ejecución entregado a `LeafTask::execute`.
//!
//! El contexto materializa el contrato de aislamiento del executor: la tarea
//! lee únicamente los imports ya comprometidos (copias, el store nunca se
//! muta a través de una lectura) y escribe únicamente sus claves de salida
//! declaradas, en un buffer que el engine compromete al finalizar con éxito.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;

use crate::artifact::{Artifact, ArtifactKind};
use crate::errors::LabError;
use crate::space::Configuration;

pub struct TaskContext<'a> {
    config: &'a Configuration,
    imports: HashMap<String, Artifact>,
    declared_outputs: Vec<String>,
    outputs: IndexMap<String, Artifact>,
}

impl<'a> TaskContext<'a> {
    pub(crate) fn new(config: &'a Configuration,
                      imports: HashMap<String, Artifact>,
                      declared_outputs: Vec<String>)
                      -> Self {
        Self { config,
               imports,
               declared_outputs,
               outputs: IndexMap::new() }
    }

    /// Configuración completa resuelta para esta ejecución.
    pub fn config(&self) -> &Configuration {
        self.config
    }

    /// Artifact importado bajo su alias local. El engine garantiza que todo
    /// alias declarado esté ligado antes de ejecutar, así que un fallo aquí
    /// es un alias no declarado.
    pub fn import(&self, alias: &str) -> Result<&Artifact, LabError> {
        self.imports
            .get(alias)
            .ok_or_else(|| LabError::Internal(format!("import alias `{alias}` was not declared")))
    }

    /// Deserializa el payload de un import al tipo pedido.
    pub fn import_as<T: serde::de::DeserializeOwned>(&self, alias: &str) -> Result<T, LabError> {
        let artifact = self.import(alias)?;
        serde_json::from_value(artifact.payload.clone())
            .map_err(|e| LabError::Internal(format!("decoding import `{alias}`: {e}")))
    }

    /// Escribe un output bajo una clave declarada. Una sola escritura por
    /// clave y por ejecución.
    pub fn publish(&mut self, key: &str, kind: ArtifactKind, payload: Value) -> Result<(), LabError> {
        if !self.declared_outputs.iter().any(|k| k == key) {
            return Err(LabError::Internal(format!("output key `{key}` was not declared by the task")));
        }
        if self.outputs.contains_key(key) {
            return Err(LabError::Internal(format!("output key `{key}` written twice in one execution")));
        }
        self.outputs.insert(key.to_string(), Artifact::new_unhashed(kind, payload));
        Ok(())
    }

    /// Serializa y publica un valor tipado.
    pub fn publish_as<T: serde::Serialize>(&mut self, key: &str, kind: ArtifactKind, value: &T) -> Result<(), LabError> {
        let payload = serde_json::to_value(value).map_err(|e| LabError::Internal(format!("encoding output `{key}`: {e}")))?;
        self.publish(key, kind, payload)
    }

    pub(crate) fn into_outputs(self) -> IndexMap<String, Artifact> {
        self.outputs
    }
}
