//! Particionador de folds para cross-validation.
//!
//! El particionado es una función pura de `(sorted(corpus), num_folds)`:
//! índice de corpus ordenado lexicográficamente, asignación por bloques
//! contiguos, resto repartido entre los primeros folds. Re-ejecutar con
//! inputs idénticos produce folds byte-idénticos, condición necesaria para
//! que la cache por fingerprint funcione.

use serde::{Deserialize, Serialize};
use serde_json::json;

use textlab_core::constants::LEAVE_ONE_OUT;
use textlab_core::{DimensionBundle, LabError};

/// Un split train/validación. `validation` es el bloque del fold;
/// `train` es su complemento dentro del corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldAssignment {
    pub fold: usize,
    pub train: Vec<String>,
    pub validation: Vec<String>,
}

/// Particiona el índice del corpus en `num_folds` grupos de validación
/// disjuntos cuya unión es el corpus completo.
///
/// `num_folds` admite el sentinela [`LEAVE_ONE_OUT`], que se resuelve a
/// `|corpus|`. Errores de configuración: corpus vacío, `num_folds < 2`
/// (fuera del sentinela), más folds que documentos.
pub fn partition(corpus_index: &[String], num_folds: i64) -> Result<Vec<FoldAssignment>, LabError> {
    if corpus_index.is_empty() {
        return Err(LabError::Configuration("cannot partition an empty corpus".into()));
    }

    let mut sorted: Vec<String> = corpus_index.to_vec();
    sorted.sort();

    let folds = if num_folds == LEAVE_ONE_OUT {
        sorted.len()
    } else if num_folds < 2 {
        return Err(LabError::Configuration(format!(
            "number of folds must be at least 2 (or the leave-one-out sentinel), got {num_folds}"
        )));
    } else {
        num_folds as usize
    };

    if folds > sorted.len() {
        return Err(LabError::Configuration(format!(
            "{} folds requested but the corpus only has {} documents",
            folds,
            sorted.len()
        )));
    }

    let base = sorted.len() / folds;
    let remainder = sorted.len() % folds;

    let mut assignments = Vec::with_capacity(folds);
    let mut offset = 0;
    for fold in 0..folds {
        let size = base + usize::from(fold < remainder);
        let validation: Vec<String> = sorted[offset..offset + size].to_vec();
        let train: Vec<String> = sorted[..offset].iter()
                                                 .chain(sorted[offset + size..].iter())
                                                 .cloned()
                                                 .collect();
        assignments.push(FoldAssignment { fold, train, validation });
        offset += size;
    }

    Ok(assignments)
}

/// Expone los folds como un `DimensionBundle` con las dimensiones
/// correlacionadas `fold`, `files_training` y `files_validation`: las dos
/// listas de un mismo fold nunca se separan en el producto del planner.
pub fn fold_dimension_bundle(corpus_index: &[String], num_folds: i64) -> Result<DimensionBundle, LabError> {
    let assignments = partition(corpus_index, num_folds)?;
    let tuples = assignments.into_iter()
                            .map(|a| vec![json!(a.fold), json!(a.train), json!(a.validation)])
                            .collect();
    Ok(DimensionBundle::new(vec!["fold".into(), "files_training".into(), "files_validation".into()],
                            tuples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn corpus(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("doc{i:03}")).collect()
    }

    #[test]
    fn folds_are_disjoint_and_cover_the_corpus() {
        let c = corpus(10);
        let folds = partition(&c, 3).unwrap();
        assert_eq!(folds.len(), 3);

        let mut seen = BTreeSet::new();
        for f in &folds {
            for doc in &f.validation {
                assert!(seen.insert(doc.clone()), "{doc} appears in two validation groups");
            }
        }
        assert_eq!(seen, c.iter().cloned().collect::<BTreeSet<_>>());
    }

    #[test]
    fn train_is_the_complement_of_validation() {
        let c = corpus(7);
        for f in partition(&c, 3).unwrap() {
            let union: BTreeSet<_> = f.train.iter().chain(f.validation.iter()).collect();
            assert_eq!(union.len(), c.len());
            assert_eq!(f.train.len() + f.validation.len(), c.len());
        }
    }

    #[test]
    fn leave_one_out_resolves_to_corpus_size() {
        let c = corpus(5);
        let folds = partition(&c, textlab_core::constants::LEAVE_ONE_OUT).unwrap();
        assert_eq!(folds.len(), 5);
        assert!(folds.iter().all(|f| f.validation.len() == 1));
    }

    #[test]
    fn partition_is_deterministic_and_ignores_input_order() {
        let c = corpus(9);
        let mut shuffled = c.clone();
        shuffled.reverse();
        assert_eq!(partition(&c, 4).unwrap(), partition(&shuffled, 4).unwrap());
        assert_eq!(partition(&c, 4).unwrap(), partition(&c, 4).unwrap());
    }

    #[test]
    fn invalid_fold_counts_are_configuration_errors() {
        let c = corpus(4);
        assert!(matches!(partition(&c, 1), Err(LabError::Configuration(_))));
        assert!(matches!(partition(&c, 0), Err(LabError::Configuration(_))));
        assert!(matches!(partition(&c, -2), Err(LabError::Configuration(_))));
        assert!(matches!(partition(&c, 5), Err(LabError::Configuration(_))));
        assert!(matches!(partition(&[], 2), Err(LabError::Configuration(_))));
    }

    #[test]
    fn bundle_keeps_fold_lists_correlated() {
        let c = corpus(4);
        let bundle = fold_dimension_bundle(&c, 2).unwrap();
        assert_eq!(bundle.names, vec!["fold", "files_training", "files_validation"]);
        assert_eq!(bundle.tuples.len(), 2);
        for tuple in &bundle.tuples {
            assert_eq!(tuple.len(), 3);
        }
    }

    proptest! {
        #[test]
        fn prop_validation_groups_partition_the_corpus(n in 2usize..60, folds in 2i64..10) {
            prop_assume!(folds as usize <= n);
            let c = corpus(n);
            let assignments = partition(&c, folds).unwrap();

            let mut seen = BTreeSet::new();
            for a in &assignments {
                for doc in &a.validation {
                    prop_assert!(seen.insert(doc.clone()));
                }
                let train: BTreeSet<_> = a.train.iter().cloned().collect();
                for doc in &a.validation {
                    prop_assert!(!train.contains(doc));
                }
            }
            prop_assert_eq!(seen.len(), n);
        }
    }
}
