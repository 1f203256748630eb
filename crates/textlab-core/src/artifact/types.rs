//! Artifact neutral del experimento.
//!
//! Un `Artifact` es la unidad de datos intercambiada entre tareas. Es
//! neutral: `payload` es JSON genérico y el motor no interpreta su
//! semántica. `hash` lo calcula el engine sobre el JSON canonicalizado y
//! sirve como identidad para trazabilidad. Una vez comprometido en el store,
//! el artifact es de sólo lectura.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tipos neutrales de artifact. El kind distingue familias de payload sin
/// imponer esquema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// JSON genérico sin semántica.
    GenericJson,
    /// Corpus procesado (documentos + índice ordenado).
    Corpus,
    /// Estadísticas auxiliares (distribución de frecuencias, top-K).
    MetaStatistics,
    /// Feature store serializado.
    FeatureStore,
    /// Métricas nombre → valor.
    Metrics,
    /// Matriz de confusión tabular.
    ConfusionMatrix,
    /// Mapa de discriminadores de una ejecución.
    Discriminators,
}

/// Artifact producido/consumido por tareas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub hash: String,            // hash canónico del payload (asignado por el engine)
    pub payload: Value,          // contenido neutro JSON
    pub metadata: Option<Value>, // información auxiliar (no entra al hash)
}

impl Artifact {
    /// Constructor sin hash; el engine lo asigna al comprometer.
    pub fn new_unhashed(kind: ArtifactKind, payload: Value) -> Self {
        Self { kind,
               hash: String::new(),
               payload,
               metadata: None }
    }
}

/// Resultado de buscar un artifact opcional: presente o ausente.
///
/// La ausencia de un artifact esperado-pero-opcional (p. ej. la matriz de
/// confusión de un fold) no es un error: se trata como contribución nula y
/// se registra. Sólo los errores fatales viajan por `Result`.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    Missing,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            Lookup::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Lookup::Missing)
    }
}
