//! Contratos de colaboradores externos: reader de corpus, procesador de
//! documentos y backend de modelo. El motor sólo conoce estos traits; las
//! implementaciones concretas viven en los adaptadores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use textlab_core::LabError;

use crate::confusion::ConfusionMatrix;
use crate::features::FeatureStore;

/// Un documento del corpus: identidad, texto crudo, etiqueta gold y los
/// tokens que dejó el preprocesamiento (vacíos hasta entonces).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub gold_label: String,
    #[serde(default)]
    pub tokens: Vec<String>,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>, gold_label: impl Into<String>) -> Self {
        Self { id: id.into(),
               text: text.into(),
               gold_label: gold_label.into(),
               tokens: Vec::new() }
    }
}

/// Fuente de documentos. Cada documento debe llegar con etiqueta gold;
/// una etiqueta vacía se reporta como `MissingGoldLabel`.
pub trait CorpusReader {
    fn read(&self) -> Result<Vec<Document>, LabError>;
}

/// Transformación de preprocesamiento aplicada documento a documento
/// (tokenización, normalización).
pub trait DocumentProcessor {
    fn name(&self) -> &str;
    fn process(&self, document: &mut Document) -> Result<(), LabError>;
}

/// Modelo entrenado: predice una etiqueta por instancia del store.
pub trait TrainedModel {
    fn predict(&self, store: &FeatureStore) -> Result<Vec<String>, LabError>;
}

impl std::fmt::Debug for dyn TrainedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn TrainedModel")
    }
}

/// Backend de aprendizaje. `train` recibe el feature store de
/// entrenamiento y devuelve un modelo listo para predecir.
pub trait ModelBackend {
    fn name(&self) -> &str;
    fn train(&self, store: &FeatureStore) -> Result<Box<dyn TrainedModel>, LabError>;
}

/// Resultado de evaluar un modelo sobre un feature store de test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Métricas escalares por nombre (`accuracy`, conteos).
    pub metrics: BTreeMap<String, f64>,
    pub confusion: ConfusionMatrix,
}

/// Entrena con `train`, predice sobre `test` y arma métricas y matriz de
/// confusión contra los outcomes gold del store de test.
pub fn evaluate(backend: &dyn ModelBackend,
                train: &FeatureStore,
                test: &FeatureStore)
                -> Result<Evaluation, LabError> {
    let model = backend.train(train)?;
    let predictions = model.predict(test)?;
    if predictions.len() != test.len() {
        return Err(LabError::Internal(format!(
            "backend `{}` returned {} predictions for {} test instances",
            backend.name(),
            predictions.len(),
            test.len()
        )));
    }

    let mut confusion = ConfusionMatrix::new();
    for (instance, predicted) in test.instances().iter().zip(&predictions) {
        confusion.record(&instance.outcome, predicted);
    }

    let mut metrics = BTreeMap::new();
    metrics.insert("accuracy".to_string(), confusion.accuracy().unwrap_or(0.0));
    metrics.insert("correct".to_string(), confusion.correct() as f64);
    metrics.insert("incorrect".to_string(), (confusion.total() - confusion.correct()) as f64);
    metrics.insert("total".to_string(), confusion.total() as f64);

    Ok(Evaluation { metrics, confusion })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Instance;

    /// Backend trivial: siempre predice la etiqueta fija con que se creó.
    struct ConstantBackend(String);

    struct ConstantModel(String);

    impl TrainedModel for ConstantModel {
        fn predict(&self, store: &FeatureStore) -> Result<Vec<String>, LabError> {
            Ok(vec![self.0.clone(); store.len()])
        }
    }

    impl ModelBackend for ConstantBackend {
        fn name(&self) -> &str {
            "constant"
        }

        fn train(&self, _store: &FeatureStore) -> Result<Box<dyn TrainedModel>, LabError> {
            Ok(Box::new(ConstantModel(self.0.clone())))
        }
    }

    fn store_of(outcomes: &[&str]) -> FeatureStore {
        let mut store = FeatureStore::new();
        for (i, outcome) in outcomes.iter().enumerate() {
            store.add(Instance::new(format!("d{i}"), *outcome));
        }
        store
    }

    #[test]
    fn evaluate_builds_metrics_and_confusion_from_gold_outcomes() {
        let backend = ConstantBackend("pos".into());
        let train = store_of(&["pos", "neg"]);
        let test = store_of(&["pos", "pos", "neg", "neg"]);

        let eval = evaluate(&backend, &train, &test).unwrap();
        assert_eq!(eval.metrics["accuracy"], 0.5);
        assert_eq!(eval.metrics["correct"], 2.0);
        assert_eq!(eval.metrics["incorrect"], 2.0);
        assert_eq!(eval.metrics["total"], 4.0);
        assert_eq!(eval.confusion.count("neg", "pos"), 2);
        assert_eq!(eval.confusion.count("pos", "pos"), 2);
    }

    #[test]
    fn prediction_count_mismatch_is_an_internal_error() {
        struct ShortModel;
        impl TrainedModel for ShortModel {
            fn predict(&self, _store: &FeatureStore) -> Result<Vec<String>, LabError> {
                Ok(vec!["pos".into()])
            }
        }
        struct ShortBackend;
        impl ModelBackend for ShortBackend {
            fn name(&self) -> &str {
                "short"
            }
            fn train(&self, _store: &FeatureStore) -> Result<Box<dyn TrainedModel>, LabError> {
                Ok(Box::new(ShortModel))
            }
        }

        let err = evaluate(&ShortBackend, &store_of(&["pos"]), &store_of(&["pos", "neg"])).unwrap_err();
        assert!(matches!(err, LabError::Internal(_)));
    }
}
