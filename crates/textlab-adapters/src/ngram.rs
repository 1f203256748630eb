//! Cálculo de n-grams de tokens y features de membresía top-K.
//!
//! La configuración viaja como un record explícito por llamada; no hay
//! estado global ni campos estáticos mutables.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use textlab_core::{Configuration, LabError};
use textlab_ml::{Feature, TopKSet};

use crate::dims::{DIM_NGRAM_LOWER_CASE, DIM_NGRAM_MAX_N, DIM_NGRAM_MIN_N, DIM_NGRAM_TOP_K};

/// Parámetros del extractor de n-grams. Validados al construir:
/// `1 <= min_n <= max_n`, `top_k >= 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NGramConfig {
    pub min_n: usize,
    pub max_n: usize,
    pub lower_case: bool,
    pub top_k: usize,
}

impl NGramConfig {
    pub fn new(min_n: usize, max_n: usize, lower_case: bool, top_k: usize) -> Result<Self, LabError> {
        if min_n < 1 || min_n > max_n {
            return Err(LabError::Configuration(format!(
                "ngram orders must satisfy 1 <= min_n <= max_n, got min_n={min_n} max_n={max_n}"
            )));
        }
        if top_k == 0 {
            return Err(LabError::Configuration("ngram top_k must be at least 1".into()));
        }
        Ok(Self { min_n, max_n, lower_case, top_k })
    }

    /// Lee los cuatro parámetros desde las dimensiones de configuración.
    pub fn from_config(config: &Configuration) -> Result<Self, LabError> {
        let min_n = config.require_i64(DIM_NGRAM_MIN_N)?;
        let max_n = config.require_i64(DIM_NGRAM_MAX_N)?;
        let lower_case = config.require_bool(DIM_NGRAM_LOWER_CASE)?;
        let top_k = config.require_i64(DIM_NGRAM_TOP_K)?;
        if min_n < 1 || max_n < 1 || top_k < 1 {
            return Err(LabError::Configuration(format!(
                "ngram dimensions must be positive, got min_n={min_n} max_n={max_n} top_k={top_k}"
            )));
        }
        Self::new(min_n as usize, max_n as usize, lower_case, top_k as usize)
    }
}

/// Todos los n-grams de orden `min_n..=max_n` de la secuencia de tokens,
/// unidos con `_`, en orden de aparición.
pub fn token_ngrams(tokens: &[String], config: &NGramConfig) -> Vec<String> {
    let normalized: Vec<String> = if config.lower_case {
        tokens.iter().map(|t| t.to_lowercase()).collect()
    } else {
        tokens.to_vec()
    };

    let mut grams = Vec::new();
    for n in config.min_n..=config.max_n {
        if n > normalized.len() {
            break;
        }
        for window in normalized.windows(n) {
            grams.push(window.join("_"));
        }
    }
    grams
}

/// Vector de features booleanas de ancho fijo sobre el conjunto top-K: una
/// feature `ngram_<term>` por término retenido, `true` si el documento lo
/// contiene. El ancho fijo garantiza que train y test comparten esquema.
pub fn ngram_features(tokens: &[String], set: &TopKSet, config: &NGramConfig) -> Vec<Feature> {
    let present: HashSet<String> = token_ngrams(tokens, config).into_iter().collect();
    set.terms()
       .map(|t| Feature::new(format!("ngram_{}", t.term), present.contains(&t.term)))
       .collect()
}
