//! Implementaciones simples de los colaboradores externos: reader de
//! corpus en memoria, tokenizador por espacios y un backend de clase
//! mayoritaria. Suficientes para armar experimentos completos sin depender
//! de ningún toolkit lingüístico real.

use textlab_core::LabError;
use textlab_ml::{CorpusReader, Document, DocumentProcessor, FeatureStore, ModelBackend, TrainedModel};

/// Reader que sirve un corpus fijo en memoria. Todo documento debe traer
/// etiqueta gold; una etiqueta vacía es fatal para la ingestión.
pub struct InMemoryCorpusReader {
    documents: Vec<Document>,
}

impl InMemoryCorpusReader {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

impl CorpusReader for InMemoryCorpusReader {
    fn read(&self) -> Result<Vec<Document>, LabError> {
        for doc in &self.documents {
            if doc.gold_label.is_empty() {
                return Err(LabError::MissingGoldLabel(doc.id.clone()));
            }
        }
        Ok(self.documents.clone())
    }
}

/// Tokenizador mínimo: corta por espacios y descarta puntuación colgante.
pub struct WhitespaceProcessor;

impl DocumentProcessor for WhitespaceProcessor {
    fn name(&self) -> &str {
        "whitespace"
    }

    fn process(&self, document: &mut Document) -> Result<(), LabError> {
        document.tokens = document.text
                                  .split_whitespace()
                                  .map(|t| t.trim_matches(|c: char| c.is_ascii_punctuation()).to_string())
                                  .filter(|t| !t.is_empty())
                                  .collect();
        Ok(())
    }
}

/// Backend de referencia: predice siempre la clase mayoritaria del set de
/// entrenamiento. A igual conteo gana la etiqueta lexicográficamente menor.
pub struct MostFrequentClassBackend;

struct MajorityModel {
    label: String,
}

impl TrainedModel for MajorityModel {
    fn predict(&self, store: &FeatureStore) -> Result<Vec<String>, LabError> {
        Ok(vec![self.label.clone(); store.len()])
    }
}

impl ModelBackend for MostFrequentClassBackend {
    fn name(&self) -> &str {
        "most-frequent-class"
    }

    fn train(&self, store: &FeatureStore) -> Result<Box<dyn TrainedModel>, LabError> {
        let counts = store.outcome_counts();
        let majority = counts.iter()
                             .max_by(|(la, ca), (lb, cb)| ca.cmp(cb).then_with(|| lb.cmp(la)))
                             .map(|(label, _)| label.clone())
                             .ok_or_else(|| LabError::Configuration("cannot train on an empty feature store".into()))?;
        Ok(Box::new(MajorityModel { label: majority }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textlab_ml::Instance;

    #[test]
    fn reader_rejects_documents_without_gold_label() {
        let reader = InMemoryCorpusReader::new(vec![Document::new("d1", "some text", "pos"),
                                                    Document::new("d2", "more text", "")]);
        let err = reader.read().unwrap_err();
        assert!(matches!(err, LabError::MissingGoldLabel(ref id) if id == "d2"));
    }

    #[test]
    fn whitespace_processor_strips_hanging_punctuation() {
        let mut doc = Document::new("d1", "Hello, world! (really)", "pos");
        WhitespaceProcessor.process(&mut doc).unwrap();
        assert_eq!(doc.tokens, vec!["Hello", "world", "really"]);
    }

    #[test]
    fn majority_backend_breaks_ties_lexicographically() {
        let mut store = FeatureStore::new();
        store.add(Instance::new("d1", "zebra"));
        store.add(Instance::new("d2", "apple"));
        let model = MostFrequentClassBackend.train(&store).unwrap();

        let mut test = FeatureStore::new();
        test.add(Instance::new("t1", "zebra"));
        assert_eq!(model.predict(&test).unwrap(), vec!["apple"]);
    }

    #[test]
    fn majority_backend_refuses_an_empty_store() {
        let err = MostFrequentClassBackend.train(&FeatureStore::new()).unwrap_err();
        assert!(matches!(err, LabError::Configuration(_)));
    }
}
