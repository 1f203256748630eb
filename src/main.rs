//! Demo de extremo a extremo: corre un experimento cross-validation y uno
//! train/test sobre un corpus mínimo en memoria, imprime las tablas de
//! reporte y muestra el efecto de la cache en una segunda corrida.

mod config;

use std::rc::Rc;

use serde_json::json;

use textlab_adapters::{performance_overview, ExperimentCrossValidation, ExperimentTrainTest,
                       InMemoryCorpusReader, MostFrequentClassBackend, WhitespaceProcessor};
use textlab_core::{BatchEngine, Dimension, LabError, Lookup, ParameterSpace, RunEventKind};
use textlab_ml::Document;

use config::CONFIG;

fn demo_corpus() -> Vec<Document> {
    vec![Document::new("rev01", "great movie, truly great acting", "pos"),
         Document::new("rev02", "fine plot and a good ending", "pos"),
         Document::new("rev03", "good fun, nice pace", "pos"),
         Document::new("rev04", "a great and good experience", "pos"),
         Document::new("rev05", "bad script, awful pacing", "neg"),
         Document::new("rev06", "poor acting and a bad plot", "neg"),
         Document::new("rev07", "awful, simply awful", "neg"),
         Document::new("rev08", "bad ending, poor writing", "neg"),
         Document::new("rev09", "good ideas buried in a bad script", "neg")]
}

fn ngram_space() -> ParameterSpace {
    let ngram = &CONFIG.ngram;
    ParameterSpace::new().add_dimension(Dimension::single("ngram_min_n", json!(ngram.min_n)))
                         .add_dimension(Dimension::single("ngram_max_n", json!(ngram.max_n)))
                         .add_dimension(Dimension::single("ngram_lower_case", json!(ngram.lower_case)))
                         .add_dimension(Dimension::new("ngram_top_k", vec![json!(5), json!(ngram.top_k)]))
}

fn print_tables(tables: &[(String, textlab_core::Table)]) {
    for (name, table) in tables {
        println!("--- {name} ---");
        match table.to_grid() {
            Lookup::Found(grid) => print!("{grid}"),
            Lookup::Missing => print!("{}", table.to_csv()),
        }
        print!("{}", performance_overview(table, "accuracy"));
    }
}

fn main() -> Result<(), LabError> {
    dotenvy::dotenv().ok();

    let reader = Rc::new(InMemoryCorpusReader::new(demo_corpus()));
    let processor = Rc::new(WhitespaceProcessor);
    let backend = Rc::new(MostFrequentClassBackend);

    // Cross-validation con grilla de top-K
    let cv = ExperimentCrossValidation::new("reviews-cv",
                                            reader.clone(),
                                            processor.clone(),
                                            backend.clone(),
                                            CONFIG.engine.num_folds).with_space(ngram_space())
                                                                    .build();

    let mut engine = BatchEngine::new().with_policy(CONFIG.engine.policy);
    let outcome = engine.run(&cv)?;
    println!("run {} -> {} executions", outcome.run_id, outcome.executions.len());
    print_tables(&outcome.tables);

    // Segunda corrida: bajo reuse-cached todo sale de cache
    let second = engine.run(&cv)?;
    let reused = engine.events(second.run_id)
                       .iter()
                       .filter(|e| matches!(e.kind, RunEventKind::TaskReused { .. }))
                       .count();
    println!("second run {} -> {reused} tasks served from cache", second.run_id);

    // Train/test con split explícito
    let ids: Vec<String> = demo_corpus().iter().map(|d| d.id.clone()).collect();
    let (train_ids, test_ids) = (ids[..6].to_vec(), ids[6..].to_vec());
    let tt = ExperimentTrainTest::new("reviews-tt", reader, processor, backend)
        .with_space(ngram_space())
        .with_split(train_ids, test_ids)
        .build()?;
    let outcome = engine.run(&tt)?;
    print_tables(&outcome.tables);

    Ok(())
}
