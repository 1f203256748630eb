//! textlab-ml: bloques de ML para el motor de experimentos.
//!
//! Particionado de folds, estadísticas de frecuencia con top-K acotado,
//! feature store, matriz de confusión y los contratos de colaboradores
//! externos (procesador de documentos, reader de corpus, backend de modelo).
pub mod backend;
pub mod confusion;
pub mod features;
pub mod folds;
pub mod stats;

pub use backend::{evaluate, CorpusReader, Document, DocumentProcessor, Evaluation, ModelBackend, TrainedModel};
pub use confusion::{ConfusionEntry, ConfusionMatrix};
pub use features::{Feature, FeatureStore, FeatureValue, Instance};
pub use folds::{fold_dimension_bundle, partition, FoldAssignment};
pub use stats::{select_top_k, FrequencyDistribution, TermFreq, TopKSet};
