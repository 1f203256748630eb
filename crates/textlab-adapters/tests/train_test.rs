//! Corrida completa de un experimento train/test con split explícito.

use std::rc::Rc;

use serde_json::json;

use textlab_adapters::{performance_overview, ExperimentTrainTest, InMemoryCorpusReader, MetaCollector,
                       MetaRegistry, MostFrequentClassBackend, WhitespaceProcessor};
use textlab_core::{ArtifactStore, BatchEngine, Dimension, LabError, Lookup, ParameterSpace};
use textlab_ml::{Document, FeatureStore, ModelBackend, TrainedModel};

fn corpus() -> Vec<Document> {
    vec![Document::new("t1", "good fine great", "pos"),
         Document::new("t2", "good nice fine", "pos"),
         Document::new("t3", "bad awful poor", "neg"),
         Document::new("e1", "great good thing", "pos"),
         Document::new("e2", "awful bad day", "neg")]
}

fn space() -> ParameterSpace {
    ParameterSpace::new().add_dimension(Dimension::single("ngram_min_n", json!(1)))
                         .add_dimension(Dimension::single("ngram_max_n", json!(1)))
                         .add_dimension(Dimension::single("ngram_lower_case", json!(true)))
                         .add_dimension(Dimension::single("ngram_top_k", json!(4)))
}

fn experiment() -> textlab_core::Batch {
    ExperimentTrainTest::new("tt-demo",
                             Rc::new(InMemoryCorpusReader::new(corpus())),
                             Rc::new(WhitespaceProcessor),
                             Rc::new(MostFrequentClassBackend))
        .with_space(space())
        .with_split(vec!["t1".into(), "t2".into(), "t3".into()],
                    vec!["e1".into(), "e2".into()])
        .build()
        .unwrap()
}

#[test]
fn the_report_carries_metrics_keyed_without_the_file_lists() {
    let mut engine = BatchEngine::new();
    let outcome = engine.run(&experiment()).unwrap();

    let (name, table) = &outcome.tables[0];
    assert_eq!(name, "tt-demo/train-test");
    assert_eq!(table.row_count(), 1);

    // clave canónica: valores de backend, corpus y dims n-gram ordenados
    // por nombre; las listas de archivos del split no participan
    let (label, row) = table.rows().next().unwrap();
    assert_eq!(label, "most-frequent-class_tt-demo_true_1_1_4");
    assert!(!label.contains("t1") && !label.contains("e1"));

    // el backend mayoritario predice `pos` (2 de 3 en entrenamiento):
    // acierta e1, falla e2
    assert_eq!(row.get("accuracy").unwrap(), "0.5");
    assert_eq!(row.get("total").unwrap(), "2");

    let overview = performance_overview(table, "accuracy");
    assert!(overview.contains("most-frequent-class_tt-demo_true_1_1_4: accuracy = 0.5"));
}

#[test]
fn results_and_confusion_artifacts_live_under_the_well_known_keys() {
    let mut engine = BatchEngine::new();
    let outcome = engine.run(&experiment()).unwrap();

    let test = outcome.executions.iter().find(|r| r.task == "test").unwrap();
    let results = engine.artifact_store().load(&test.execution, "results");
    let confusion = engine.artifact_store().load(&test.execution, "confusion-matrix");
    assert!(matches!(results, Lookup::Found(_)));
    assert!(matches!(confusion, Lookup::Found(_)));
}

#[test]
fn an_empty_split_is_rejected_at_build_time() {
    let err = ExperimentTrainTest::new("tt-bad",
                                       Rc::new(InMemoryCorpusReader::new(corpus())),
                                       Rc::new(WhitespaceProcessor),
                                       Rc::new(MostFrequentClassBackend))
        .with_space(space())
        .build()
        .unwrap_err();
    assert!(matches!(err, LabError::Configuration(_)));
}

#[test]
fn a_missing_ngram_dimension_fails_in_the_validity_check() {
    let batch = ExperimentTrainTest::new("tt-invalid",
                                         Rc::new(InMemoryCorpusReader::new(corpus())),
                                         Rc::new(WhitespaceProcessor),
                                         Rc::new(MostFrequentClassBackend))
        .with_split(vec!["t1".into()], vec!["e1".into()])
        .build()
        .unwrap();
    let mut engine = BatchEngine::new();
    let err = engine.run(&batch).unwrap_err();
    assert!(matches!(err, LabError::Task { ref task, .. } if task == "check"), "got {err:?}");
}

#[test]
fn a_duplicate_feature_name_skips_the_instance_without_aborting() {
    // colector que congela dos veces el mismo término: toda instancia
    // extraída traería dos features `ngram_good`
    struct DuplicatedTermsCollector;
    impl MetaCollector for DuplicatedTermsCollector {
        fn capability(&self) -> &str {
            "ngram"
        }
        fn observe(&mut self, _document: &Document) -> Result<(), LabError> {
            Ok(())
        }
        fn finish(self: Box<Self>) -> Result<serde_json::Value, LabError> {
            Ok(json!({ "terms": [{ "term": "good", "count": 2 }, { "term": "good", "count": 1 }] }))
        }
    }

    struct ConstantModel;
    impl TrainedModel for ConstantModel {
        fn predict(&self, store: &FeatureStore) -> Result<Vec<String>, LabError> {
            Ok(vec!["pos".into(); store.len()])
        }
    }
    struct ConstantBackend;
    impl ModelBackend for ConstantBackend {
        fn name(&self) -> &str {
            "constant"
        }
        fn train(&self, _store: &FeatureStore) -> Result<Box<dyn TrainedModel>, LabError> {
            Ok(Box::new(ConstantModel))
        }
    }

    let mut registry = MetaRegistry::new();
    registry.register("ngram", |_| Ok(Box::new(DuplicatedTermsCollector)));

    let batch = ExperimentTrainTest::new("tt-dup",
                                         Rc::new(InMemoryCorpusReader::new(corpus())),
                                         Rc::new(WhitespaceProcessor),
                                         Rc::new(ConstantBackend))
        .with_space(space())
        .with_registry(Rc::new(registry), vec!["ngram".into()])
        .with_split(vec!["t1".into(), "t2".into()], vec!["e1".into()])
        .build()
        .unwrap();

    // el batch completa: las instancias ofensoras se rechazan una a una
    let mut engine = BatchEngine::new();
    let outcome = engine.run(&batch).unwrap();

    let extract = outcome.executions.iter().find(|r| r.task == "extract_train").unwrap();
    let artifact = engine.artifact_store().load(&extract.execution, "feature-store").found().unwrap();
    let store: FeatureStore = serde_json::from_value(artifact.payload).unwrap();
    assert!(store.is_empty(), "every offending instance is rejected, none aborts");
}

#[test]
fn a_document_without_gold_label_aborts_preprocessing() {
    let mut docs = corpus();
    docs.push(Document::new("x1", "text", ""));
    let batch = ExperimentTrainTest::new("tt-nogold",
                                         Rc::new(InMemoryCorpusReader::new(docs)),
                                         Rc::new(WhitespaceProcessor),
                                         Rc::new(MostFrequentClassBackend))
        .with_space(space())
        .with_split(vec!["t1".into(), "t3".into()], vec!["e2".into()])
        .build()
        .unwrap();
    let mut engine = BatchEngine::new();
    let err = engine.run(&batch).unwrap_err();
    match err {
        LabError::Task { task, source } => {
            assert_eq!(task, "preprocess");
            assert!(matches!(*source, LabError::MissingGoldLabel(ref id) if id == "x1"));
        }
        other => panic!("expected Task error, got {other:?}"),
    }
}
