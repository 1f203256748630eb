//! textlab-adapters: tareas concretas y armado de experimentos.
//!
//! Aquí vive todo lo que conoce la semántica del dominio: preprocesamiento,
//! colección de meta-estadísticas, extracción de features n-gram, la tarea
//! de test y los builders de experimentos train/test y cross-validation.
//! El motor (`textlab-core`) permanece neutral.
pub mod collaborators;
pub mod dims;
pub mod experiments;
pub mod meta;
pub mod ngram;
pub mod reports;
pub mod tasks;

pub use collaborators::{InMemoryCorpusReader, MostFrequentClassBackend, WhitespaceProcessor};
pub use experiments::{ExperimentCrossValidation, ExperimentTrainTest};
pub use meta::{MetaCollector, MetaRegistry, NGramMetaCollector, NGRAM_CAPABILITY};
pub use ngram::{ngram_features, token_ngrams, NGramConfig};
pub use reports::{canonical_row_key, performance_overview, CrossValidationReport, TrainTestReport};
pub use tasks::{CorpusPayload, ExtractFeaturesTask, MetaInfoTask, PreprocessTask, TestTask, ValidityCheckTask};
