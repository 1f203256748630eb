//! Dimensiones y bundles del espacio de parámetros.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Eje nominado del espacio de configuración con una lista ordenada de
/// valores candidatos. Los valores no tienen por qué ser escalares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub values: Vec<Value>,
}

impl Dimension {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self { name: name.into(), values }
    }

    /// Dimensión de un único valor (informativa o fija).
    pub fn single(name: impl Into<String>, value: Value) -> Self {
        Self::new(name, vec![value])
    }
}

/// Conjunto de dimensiones cuyos valores están correlacionados y deben
/// asignarse juntos como tuplas (p. ej. índice de fold con sus listas de
/// entrenamiento/validación). Un bundle aporta una configuración por tupla,
/// nunca el producto cartesiano de sus dimensiones constituyentes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionBundle {
    pub names: Vec<String>,
    pub tuples: Vec<Vec<Value>>,
}

impl DimensionBundle {
    pub fn new(names: Vec<String>, tuples: Vec<Vec<Value>>) -> Self {
        Self { names, tuples }
    }
}

/// Descripción declarativa y construible del espacio: dimensiones
/// independientes más bundles correlacionados.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterSpace {
    pub dimensions: Vec<Dimension>,
    pub bundles: Vec<DimensionBundle>,
}

impl ParameterSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dimension(mut self, dim: Dimension) -> Self {
        self.dimensions.push(dim);
        self
    }

    pub fn add_bundle(mut self, bundle: DimensionBundle) -> Self {
        self.bundles.push(bundle);
        self
    }

    /// `true` si el espacio no declara ningún eje: planifica exactamente una
    /// configuración vacía.
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty() && self.bundles.is_empty()
    }
}
