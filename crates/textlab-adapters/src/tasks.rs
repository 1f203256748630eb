//! Tareas concretas de los experimentos de clasificación de texto.
//!
//! La cadena completa: chequeo de validez → preprocesamiento → meta →
//! extracción train/test → test. Cada tarea declara sus imports, sus claves
//! de salida y el subconjunto de dimensiones que discrimina su cache.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use textlab_core::constants::{CONFUSION_MATRIX_KEY, RESULTS_KEY};
use textlab_core::{ArtifactKind, Import, LabError, LeafTask, TaskContext};
use textlab_ml::{evaluate, CorpusReader, Document, DocumentProcessor, FeatureStore, ModelBackend, TopKSet};

use crate::dims::{CORPUS_INDEX_KEY, CORPUS_KEY, DIM_CORPUS, DIM_FILES_TRAINING, DIM_FILES_VALIDATION,
                  DIM_NGRAM_LOWER_CASE, DIM_NGRAM_MAX_N, DIM_NGRAM_MIN_N, DIM_NGRAM_TOP_K, FEATURE_STORE_KEY,
                  META_KEY};
use crate::meta::MetaRegistry;
use crate::ngram::{ngram_features, NGramConfig};

/// Payload del artifact de corpus: documentos ya procesados.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusPayload {
    pub documents: Vec<Document>,
}

/// Verifica que las dimensiones requeridas estén presentes antes de que
/// arranque cualquier trabajo. Corre primera en todo batch de experimento.
pub struct ValidityCheckTask {
    required: Vec<String>,
}

impl ValidityCheckTask {
    pub fn new(required: Vec<String>) -> Self {
        Self { required }
    }
}

impl LeafTask for ValidityCheckTask {
    fn name(&self) -> &str {
        "check"
    }

    fn output_keys(&self) -> Vec<String> {
        Vec::new()
    }

    fn discriminator_keys(&self) -> Vec<String> {
        self.required.clone()
    }

    fn execute(&self, ctx: &mut TaskContext<'_>) -> Result<(), LabError> {
        for name in &self.required {
            ctx.config().require(name)?;
        }
        Ok(())
    }
}

/// Materializa el corpus de trabajo una vez por experimento: lee los
/// documentos, aplica el procesador y publica corpus + índice ordenado.
pub struct PreprocessTask {
    reader: Rc<dyn CorpusReader>,
    processor: Rc<dyn DocumentProcessor>,
}

impl PreprocessTask {
    pub fn new(reader: Rc<dyn CorpusReader>, processor: Rc<dyn DocumentProcessor>) -> Self {
        Self { reader, processor }
    }
}

impl LeafTask for PreprocessTask {
    fn name(&self) -> &str {
        "preprocess"
    }

    fn output_keys(&self) -> Vec<String> {
        vec![CORPUS_KEY.into(), CORPUS_INDEX_KEY.into()]
    }

    fn discriminator_keys(&self) -> Vec<String> {
        vec![DIM_CORPUS.into()]
    }

    fn execute(&self, ctx: &mut TaskContext<'_>) -> Result<(), LabError> {
        let mut documents = self.reader.read()?;
        for document in &mut documents {
            self.processor.process(document)?;
        }

        let mut index: Vec<String> = documents.iter().map(|d| d.id.clone()).collect();
        index.sort();

        ctx.publish_as(CORPUS_KEY, ArtifactKind::Corpus, &CorpusPayload { documents })?;
        ctx.publish_as(CORPUS_INDEX_KEY, ArtifactKind::GenericJson, &index)
    }
}

/// Colecciona meta-estadísticas sobre los documentos de entrenamiento del
/// split activo, una capability por entrada del mapa publicado.
pub struct MetaInfoTask {
    registry: Rc<MetaRegistry>,
    capabilities: Vec<String>,
}

impl MetaInfoTask {
    pub fn new(registry: Rc<MetaRegistry>, capabilities: Vec<String>) -> Self {
        Self { registry, capabilities }
    }
}

impl LeafTask for MetaInfoTask {
    fn name(&self) -> &str {
        "meta"
    }

    fn imports(&self) -> Vec<Import> {
        vec![Import::new("preprocess", CORPUS_KEY, "corpus")]
    }

    fn output_keys(&self) -> Vec<String> {
        vec![META_KEY.into()]
    }

    fn discriminator_keys(&self) -> Vec<String> {
        vec![DIM_CORPUS.into(),
             DIM_FILES_TRAINING.into(),
             DIM_NGRAM_MIN_N.into(),
             DIM_NGRAM_MAX_N.into(),
             DIM_NGRAM_LOWER_CASE.into(),
             DIM_NGRAM_TOP_K.into()]
    }

    fn execute(&self, ctx: &mut TaskContext<'_>) -> Result<(), LabError> {
        let corpus: CorpusPayload = ctx.import_as("corpus")?;
        let train_ids: HashSet<String> = ctx.config().require_str_list(DIM_FILES_TRAINING)?.into_iter().collect();

        let mut statistics: BTreeMap<String, Value> = BTreeMap::new();
        for capability in &self.capabilities {
            let mut collector = self.registry.build(capability, ctx.config())?;
            for document in corpus.documents.iter().filter(|d| train_ids.contains(&d.id)) {
                collector.observe(document)?;
            }
            statistics.insert(capability.clone(), collector.finish()?);
        }

        ctx.publish_as(META_KEY, ArtifactKind::MetaStatistics, &statistics)
    }
}

/// Lado del split sobre el que extrae una `ExtractFeaturesTask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractScope {
    Training,
    Validation,
}

/// Extrae el feature store de un lado del split usando el top-K congelado
/// por la tarea de meta. Train y test comparten esquema por construcción:
/// el vector de features tiene el ancho del conjunto top-K.
pub struct ExtractFeaturesTask {
    scope: ExtractScope,
}

impl ExtractFeaturesTask {
    pub fn training() -> Self {
        Self { scope: ExtractScope::Training }
    }

    pub fn validation() -> Self {
        Self { scope: ExtractScope::Validation }
    }

    fn files_dimension(&self) -> &'static str {
        match self.scope {
            ExtractScope::Training => DIM_FILES_TRAINING,
            ExtractScope::Validation => DIM_FILES_VALIDATION,
        }
    }
}

impl LeafTask for ExtractFeaturesTask {
    fn name(&self) -> &str {
        match self.scope {
            ExtractScope::Training => "extract_train",
            ExtractScope::Validation => "extract_test",
        }
    }

    fn imports(&self) -> Vec<Import> {
        vec![Import::new("preprocess", CORPUS_KEY, "corpus"),
             Import::new("meta", META_KEY, "meta")]
    }

    fn output_keys(&self) -> Vec<String> {
        vec![FEATURE_STORE_KEY.into()]
    }

    fn discriminator_keys(&self) -> Vec<String> {
        // files_training siempre discrimina: el top-K de meta depende del
        // set de entrenamiento aunque se extraiga el lado de validación.
        let mut keys = vec![DIM_CORPUS.into(),
                            DIM_FILES_TRAINING.into(),
                            DIM_NGRAM_MIN_N.into(),
                            DIM_NGRAM_MAX_N.into(),
                            DIM_NGRAM_LOWER_CASE.into(),
                            DIM_NGRAM_TOP_K.into()];
        if self.scope == ExtractScope::Validation {
            keys.push(DIM_FILES_VALIDATION.into());
        }
        keys
    }

    fn execute(&self, ctx: &mut TaskContext<'_>) -> Result<(), LabError> {
        let corpus: CorpusPayload = ctx.import_as("corpus")?;
        let statistics: BTreeMap<String, Value> = ctx.import_as("meta")?;
        let config = NGramConfig::from_config(ctx.config())?;

        let top_k_value = statistics.get(crate::meta::NGRAM_CAPABILITY).cloned().ok_or_else(|| {
                              LabError::Configuration("meta statistics carry no ngram capability".into())
                          })?;
        let set: TopKSet = serde_json::from_value(top_k_value)
            .map_err(|e| LabError::Internal(format!("decoding frozen top-K set: {e}")))?;

        let by_id: HashMap<&str, &Document> = corpus.documents.iter().map(|d| (d.id.as_str(), d)).collect();
        let mut ids = ctx.config().require_str_list(self.files_dimension())?;
        ids.sort();

        let mut store = FeatureStore::new();
        for id in &ids {
            let document = by_id.get(id.as_str()).ok_or_else(|| {
                               LabError::Internal(format!("document `{id}` is not part of the processed corpus"))
                           })?;
            let features = ngram_features(&document.tokens, &set, &config);
            // un nombre de feature repetido rechaza la instancia ofensora
            // pero no interrumpe la extracción de las demás
            match store.add_instance(document.id.clone(), document.gold_label.clone(), features) {
                Err(LabError::DuplicateFeature(_)) => {}
                result => result?,
            }
        }

        ctx.publish_as(FEATURE_STORE_KEY, ArtifactKind::FeatureStore, &store)
    }
}

/// Entrena el backend sobre el store de entrenamiento, predice sobre el de
/// test y publica métricas y matriz de confusión bajo las claves conocidas.
pub struct TestTask {
    backend: Rc<dyn ModelBackend>,
}

impl TestTask {
    pub fn new(backend: Rc<dyn ModelBackend>) -> Self {
        Self { backend }
    }
}

impl LeafTask for TestTask {
    fn name(&self) -> &str {
        "test"
    }

    fn imports(&self) -> Vec<Import> {
        vec![Import::new("extract_train", FEATURE_STORE_KEY, "train"),
             Import::new("extract_test", FEATURE_STORE_KEY, "test")]
    }

    fn output_keys(&self) -> Vec<String> {
        vec![RESULTS_KEY.into(), CONFUSION_MATRIX_KEY.into()]
    }

    fn discriminator_keys(&self) -> Vec<String> {
        vec![DIM_CORPUS.into(),
             crate::dims::DIM_BACKEND.into(),
             DIM_FILES_TRAINING.into(),
             DIM_FILES_VALIDATION.into(),
             DIM_NGRAM_MIN_N.into(),
             DIM_NGRAM_MAX_N.into(),
             DIM_NGRAM_LOWER_CASE.into(),
             DIM_NGRAM_TOP_K.into()]
    }

    fn execute(&self, ctx: &mut TaskContext<'_>) -> Result<(), LabError> {
        let train: FeatureStore = ctx.import_as("train")?;
        let test: FeatureStore = ctx.import_as("test")?;

        let evaluation = evaluate(self.backend.as_ref(), &train, &test)?;
        ctx.publish_as(RESULTS_KEY, ArtifactKind::Metrics, &evaluation.metrics)?;
        ctx.publish_as(CONFUSION_MATRIX_KEY, ArtifactKind::ConfusionMatrix, &evaluation.confusion)
    }
}
