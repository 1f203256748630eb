//! Builders de experimentos: train/test y cross-validation.
//!
//! Ambos arman el mismo encadenamiento check → preprocess → meta →
//! extract_train → extract_test → test; cambia de dónde sale el split. El
//! train/test lo trae el llamador como listas explícitas; el
//! cross-validation lo deriva un batch anidado a partir del índice del
//! corpus preprocesado, una configuración por fold.

use std::rc::Rc;

use serde_json::json;

use textlab_core::{Batch, Dimension, DimensionBundle, Import, LabError, ParameterSpace, Task};
use textlab_ml::{fold_dimension_bundle, CorpusReader, DocumentProcessor, ModelBackend};

use crate::dims::{CORPUS_INDEX_KEY, DIM_BACKEND, DIM_CORPUS, DIM_FILES_TRAINING, DIM_FILES_VALIDATION,
                  DIM_NGRAM_LOWER_CASE, DIM_NGRAM_MAX_N, DIM_NGRAM_MIN_N, DIM_NGRAM_TOP_K};
use crate::meta::{MetaRegistry, NGRAM_CAPABILITY};
use crate::reports::{CrossValidationReport, TrainTestReport};
use crate::tasks::{ExtractFeaturesTask, MetaInfoTask, PreprocessTask, TestTask, ValidityCheckTask};

fn required_dimensions() -> Vec<String> {
    vec![DIM_CORPUS.into(),
         DIM_BACKEND.into(),
         DIM_NGRAM_MIN_N.into(),
         DIM_NGRAM_MAX_N.into(),
         DIM_NGRAM_LOWER_CASE.into(),
         DIM_NGRAM_TOP_K.into()]
}

/// Experimento train/test con split explícito del llamador.
pub struct ExperimentTrainTest {
    name: String,
    reader: Rc<dyn CorpusReader>,
    processor: Rc<dyn DocumentProcessor>,
    backend: Rc<dyn ModelBackend>,
    registry: Rc<MetaRegistry>,
    capabilities: Vec<String>,
    space: ParameterSpace,
    train_ids: Vec<String>,
    test_ids: Vec<String>,
}

impl ExperimentTrainTest {
    pub fn new(name: impl Into<String>,
               reader: Rc<dyn CorpusReader>,
               processor: Rc<dyn DocumentProcessor>,
               backend: Rc<dyn ModelBackend>)
               -> Self {
        Self { name: name.into(),
               reader,
               processor,
               backend,
               registry: Rc::new(MetaRegistry::with_defaults()),
               capabilities: vec![NGRAM_CAPABILITY.into()],
               space: ParameterSpace::new(),
               train_ids: Vec::new(),
               test_ids: Vec::new() }
    }

    /// Dimensiones del usuario (p. ej. la grilla de parámetros n-gram).
    pub fn with_space(mut self, space: ParameterSpace) -> Self {
        self.space = space;
        self
    }

    pub fn with_registry(mut self, registry: Rc<MetaRegistry>, capabilities: Vec<String>) -> Self {
        self.registry = registry;
        self.capabilities = capabilities;
        self
    }

    pub fn with_split(mut self, train_ids: Vec<String>, test_ids: Vec<String>) -> Self {
        self.train_ids = train_ids;
        self.test_ids = test_ids;
        self
    }

    /// Arma el batch ejecutable. Split vacío de cualquiera de los dos lados
    /// es un error de configuración.
    pub fn build(self) -> Result<Batch, LabError> {
        if self.train_ids.is_empty() || self.test_ids.is_empty() {
            return Err(LabError::Configuration(format!(
                "experiment `{}` needs non-empty train and test document lists",
                self.name
            )));
        }

        let split = DimensionBundle::new(vec![DIM_FILES_TRAINING.into(), DIM_FILES_VALIDATION.into()],
                                         vec![vec![json!(self.train_ids), json!(self.test_ids)]]);
        let space = self.space
                        .add_dimension(Dimension::single(DIM_CORPUS, json!(self.name.clone())))
                        .add_dimension(Dimension::single(DIM_BACKEND, json!(self.backend.name())))
                        .add_bundle(split);

        Ok(Batch::new(self.name)
            .with_space(space)
            .add_task(Task::leaf(ValidityCheckTask::new(required_dimensions())))
            .add_task(Task::leaf(PreprocessTask::new(self.reader, self.processor)))
            .add_task(Task::leaf(MetaInfoTask::new(self.registry, self.capabilities)))
            .add_task(Task::leaf(ExtractFeaturesTask::training()))
            .add_task(Task::leaf(ExtractFeaturesTask::validation()))
            .add_task(Task::leaf(TestTask::new(self.backend)))
            .add_report(TrainTestReport))
    }
}

/// Experimento cross-validation: el batch externo preprocesa una vez; el
/// batch anidado deriva su espacio del índice del corpus (un fold por
/// configuración) y corre la cadena meta → extract → test por fold.
pub struct ExperimentCrossValidation {
    name: String,
    reader: Rc<dyn CorpusReader>,
    processor: Rc<dyn DocumentProcessor>,
    backend: Rc<dyn ModelBackend>,
    registry: Rc<MetaRegistry>,
    capabilities: Vec<String>,
    space: ParameterSpace,
    num_folds: i64,
}

impl ExperimentCrossValidation {
    pub fn new(name: impl Into<String>,
               reader: Rc<dyn CorpusReader>,
               processor: Rc<dyn DocumentProcessor>,
               backend: Rc<dyn ModelBackend>,
               num_folds: i64)
               -> Self {
        Self { name: name.into(),
               reader,
               processor,
               backend,
               registry: Rc::new(MetaRegistry::with_defaults()),
               capabilities: vec![NGRAM_CAPABILITY.into()],
               space: ParameterSpace::new(),
               num_folds }
    }

    pub fn with_space(mut self, space: ParameterSpace) -> Self {
        self.space = space;
        self
    }

    pub fn with_registry(mut self, registry: Rc<MetaRegistry>, capabilities: Vec<String>) -> Self {
        self.registry = registry;
        self.capabilities = capabilities;
        self
    }

    pub fn build(self) -> Batch {
        let num_folds = self.num_folds;
        let folds = Batch::new("folds")
            .add_import(Import::new("preprocess", CORPUS_INDEX_KEY, "corpus_index"))
            .with_derived_space(move |ctx| {
                let index: Vec<String> = ctx.import_as("corpus_index")?;
                let bundle = fold_dimension_bundle(&index, num_folds)?;
                Ok(ParameterSpace::new().add_bundle(bundle))
            })
            .add_task(Task::leaf(MetaInfoTask::new(self.registry, self.capabilities)))
            .add_task(Task::leaf(ExtractFeaturesTask::training()))
            .add_task(Task::leaf(ExtractFeaturesTask::validation()))
            .add_task(Task::leaf(TestTask::new(self.backend.clone())));

        let space = self.space
                        .add_dimension(Dimension::single(DIM_CORPUS, json!(self.name.clone())))
                        .add_dimension(Dimension::single(DIM_BACKEND, json!(self.backend.name())));

        Batch::new(self.name)
            .with_space(space)
            .add_task(Task::leaf(ValidityCheckTask::new(required_dimensions())))
            .add_task(Task::leaf(PreprocessTask::new(self.reader, self.processor)))
            .add_task(Task::Batch(folds))
            .add_report(CrossValidationReport)
    }
}
