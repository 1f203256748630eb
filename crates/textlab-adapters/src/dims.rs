//! Nombres de dimensiones y claves de artifact compartidos entre tareas,
//! reportes y builders de experimentos.

/// Etiqueta del corpus de trabajo (discriminador del preprocesamiento).
pub const DIM_CORPUS: &str = "corpus";
/// Nombre del backend de modelo.
pub const DIM_BACKEND: &str = "backend";
/// Índice de fold dentro de una corrida cross-validation.
pub const DIM_FOLD: &str = "fold";
/// Lista de documentos de entrenamiento del split activo.
pub const DIM_FILES_TRAINING: &str = "files_training";
/// Lista de documentos de validación/test del split activo.
pub const DIM_FILES_VALIDATION: &str = "files_validation";

pub const DIM_NGRAM_MIN_N: &str = "ngram_min_n";
pub const DIM_NGRAM_MAX_N: &str = "ngram_max_n";
pub const DIM_NGRAM_LOWER_CASE: &str = "ngram_lower_case";
pub const DIM_NGRAM_TOP_K: &str = "ngram_top_k";

/// Corpus procesado (documentos con tokens).
pub const CORPUS_KEY: &str = "corpus";
/// Índice ordenado de ids de documento del corpus procesado.
pub const CORPUS_INDEX_KEY: &str = "corpus_index";
/// Meta-estadísticas por capability.
pub const META_KEY: &str = "meta-statistics";
/// Feature store serializado de una extracción.
pub const FEATURE_STORE_KEY: &str = "feature-store";
