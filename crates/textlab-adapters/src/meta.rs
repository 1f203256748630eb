//! Colectores de meta-estadísticas y su registro explícito.
//!
//! Un colector se resuelve por capability id contra un registro armado por
//! el programa, nunca por nombre de tipo ni reflexión: lo que no está
//! registrado es un error de configuración visible antes de ejecutar.

use indexmap::IndexMap;
use serde_json::Value;

use textlab_core::{Configuration, LabError};
use textlab_ml::{Document, FrequencyDistribution, TopKSet};

use crate::ngram::{token_ngrams, NGramConfig};

/// Capability id del colector de n-grams.
pub const NGRAM_CAPABILITY: &str = "ngram";

/// Acumulador de estadísticas sobre los documentos de entrenamiento. Se
/// construye por ejecución, observa cada documento una vez y al final emite
/// su resultado congelado como JSON.
pub trait MetaCollector {
    fn capability(&self) -> &str;
    fn observe(&mut self, document: &Document) -> Result<(), LabError>;
    fn finish(self: Box<Self>) -> Result<Value, LabError>;
}

impl std::fmt::Debug for dyn MetaCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn MetaCollector")
    }
}

type CollectorBuilder = Box<dyn Fn(&Configuration) -> Result<Box<dyn MetaCollector>, LabError>>;

/// Registro capability id → constructor de colector.
#[derive(Default)]
pub struct MetaRegistry {
    builders: IndexMap<String, CollectorBuilder>,
}

impl MetaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registro con los colectores de fábrica.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(NGRAM_CAPABILITY, |config| {
                    Ok(Box::new(NGramMetaCollector::from_config(config)?))
                });
        registry
    }

    pub fn register<F>(&mut self, capability: &str, builder: F)
        where F: Fn(&Configuration) -> Result<Box<dyn MetaCollector>, LabError> + 'static
    {
        self.builders.insert(capability.to_string(), Box::new(builder));
    }

    /// Construye el colector registrado bajo la capability pedida.
    pub fn build(&self, capability: &str, config: &Configuration) -> Result<Box<dyn MetaCollector>, LabError> {
        let builder = self.builders.get(capability).ok_or_else(|| {
                          LabError::Configuration(format!("no meta collector registered for capability `{capability}`"))
                      })?;
        builder(config)
    }

    pub fn capabilities(&self) -> impl Iterator<Item = &str> {
        self.builders.keys().map(String::as_str)
    }
}

/// Colector de frecuencias de n-grams: una pasada por los documentos de
/// entrenamiento, al final congela el top-K de términos.
pub struct NGramMetaCollector {
    config: NGramConfig,
    distribution: FrequencyDistribution,
}

impl NGramMetaCollector {
    pub fn new(config: NGramConfig) -> Self {
        Self { config, distribution: FrequencyDistribution::new() }
    }

    pub fn from_config(config: &Configuration) -> Result<Self, LabError> {
        Ok(Self::new(NGramConfig::from_config(config)?))
    }
}

impl MetaCollector for NGramMetaCollector {
    fn capability(&self) -> &str {
        NGRAM_CAPABILITY
    }

    fn observe(&mut self, document: &Document) -> Result<(), LabError> {
        for gram in token_ngrams(&document.tokens, &self.config) {
            self.distribution.add(&gram);
        }
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<Value, LabError> {
        let set = TopKSet::freeze(&self.distribution, self.config.top_k);
        serde_json::to_value(&set).map_err(|e| LabError::Internal(format!("encoding top-K set: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, tokens: &[&str]) -> Document {
        let mut d = Document::new(id, "", "pos");
        d.tokens = tokens.iter().map(|t| t.to_string()).collect();
        d
    }

    #[test]
    fn ngram_collector_freezes_the_top_k_over_observed_documents() {
        let config = NGramConfig::new(1, 1, true, 2).unwrap();
        let mut collector: Box<dyn MetaCollector> = Box::new(NGramMetaCollector::new(config));
        collector.observe(&doc("d1", &["the", "cat", "the"])).unwrap();
        collector.observe(&doc("d2", &["the", "dog"])).unwrap();

        let value = collector.finish().unwrap();
        let set: TopKSet = serde_json::from_value(value).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("the"));
        // cat y dog empatan en 1; gana el lexicográficamente menor
        assert!(set.contains("cat"));
        assert!(!set.contains("dog"));
    }

    #[test]
    fn unknown_capability_is_a_configuration_error() {
        let registry = MetaRegistry::with_defaults();
        let err = registry.build("part-of-speech", &Configuration::default()).unwrap_err();
        assert!(matches!(err, LabError::Configuration(_)));
    }
}
