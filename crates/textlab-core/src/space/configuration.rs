//! `Configuration`: una asignación totalmente resuelta de valor por
//! dimensión. Inmutable una vez creada; el orden de inserción se conserva
//! para que el nombrado aguas abajo sea reproducible.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::LabError;
use crate::hashing::to_canonical_json;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Configuration {
    values: IndexMap<String, Value>,
}

impl Configuration {
    pub(crate) fn from_values(values: IndexMap<String, Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    /// Valor requerido; `Configuration` error si la dimensión no existe.
    pub fn require(&self, name: &str) -> Result<&Value, LabError> {
        self.values
            .get(name)
            .ok_or_else(|| LabError::Configuration(format!("missing required dimension `{name}`")))
    }

    pub fn require_str(&self, name: &str) -> Result<&str, LabError> {
        self.require(name)?
            .as_str()
            .ok_or_else(|| LabError::Configuration(format!("dimension `{name}` is not a string")))
    }

    pub fn require_i64(&self, name: &str) -> Result<i64, LabError> {
        self.require(name)?
            .as_i64()
            .ok_or_else(|| LabError::Configuration(format!("dimension `{name}` is not an integer")))
    }

    pub fn require_bool(&self, name: &str) -> Result<bool, LabError> {
        self.require(name)?
            .as_bool()
            .ok_or_else(|| LabError::Configuration(format!("dimension `{name}` is not a boolean")))
    }

    /// Lista de strings (p. ej. las listas de archivos de un fold).
    pub fn require_str_list(&self, name: &str) -> Result<Vec<String>, LabError> {
        let items = self.require(name)?
                        .as_array()
                        .ok_or_else(|| LabError::Configuration(format!("dimension `{name}` is not a list")))?;
        items.iter()
             .map(|v| {
                 v.as_str()
                  .map(str::to_string)
                  .ok_or_else(|| LabError::Configuration(format!("dimension `{name}` holds a non-string entry")))
             })
             .collect()
    }

    /// Subconjunto discriminante: los pares clave/valor que determinan la
    /// identidad de cache de una tarea, renderizados a texto estable.
    /// Claves desconocidas simplemente no aparecen (la tarea puede declarar
    /// más discriminadores de los que esta configuración resuelve).
    pub fn discriminators(&self, keys: &[String]) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for key in keys {
            if let Some(value) = self.values.get(key) {
                out.insert(key.clone(), render_value(value));
            }
        }
        out
    }

    /// Fusiona esta configuración (externa) con otra (interna, gana en caso
    /// de colisión de nombre). Usada por batches anidados para acumular
    /// discriminadores.
    pub fn merged(&self, inner: &Configuration) -> Configuration {
        let mut values = self.values.clone();
        for (k, v) in &inner.values {
            values.insert(k.clone(), v.clone());
        }
        Configuration { values }
    }
}

/// Render estable de un valor de dimensión: strings crudos, el resto en JSON
/// canónico. Así `"ab"` y `ab` no colisionan con estructuras.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => to_canonical_json(other),
    }
}
