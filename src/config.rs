//! Configuración central de la aplicación demo.
//! Carga variables de entorno (.env) y expone una estructura inmutable (`CONFIG`).

use once_cell::sync::Lazy;
use std::env;

use textlab_core::ExecutionPolicy;

/// Configuración global de la aplicación (extensible para más secciones).
pub struct AppConfig {
    /// Parámetros del motor de ejecución.
    pub engine: EngineConfig,
    /// Parámetros por defecto del extractor n-gram.
    pub ngram: NGramDefaults,
}

/// Parámetros del motor.
pub struct EngineConfig {
    /// Política de cache (`reuse` o `rerun`).
    pub policy: ExecutionPolicy,
    /// Cantidad de folds del experimento cross-validation (−1 = leave-one-out).
    pub num_folds: i64,
}

/// Valores por defecto de la grilla n-gram del demo.
pub struct NGramDefaults {
    pub min_n: i64,
    pub max_n: i64,
    pub lower_case: bool,
    pub top_k: i64,
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    let policy = match env::var("TEXTLAB_POLICY").as_deref() {
        Ok("rerun") => ExecutionPolicy::AlwaysRerun,
        _ => ExecutionPolicy::ReuseCached,
    };
    let num_folds = env::var("TEXTLAB_NUM_FOLDS").ok()
        .and_then(|v| v.parse().ok()).unwrap_or(3);
    let top_k = env::var("TEXTLAB_NGRAM_TOP_K").ok()
        .and_then(|v| v.parse().ok()).unwrap_or(20);
    AppConfig {
        engine: EngineConfig { policy, num_folds },
        ngram: NGramDefaults { min_n: 1, max_n: 2, lower_case: true, top_k },
    }
});
