//! Reportes de agregación sobre las ejecuciones de test.
//!
//! La clave canónica de fila se arma ordenando los nombres de
//! discriminadores y uniendo sus valores con `_`, después de descartar las
//! listas de archivos del fold (no discriminan configuración, sólo split).

use std::collections::BTreeMap;

use indexmap::IndexMap;

use textlab_core::constants::{CONFUSION_MATRIX_KEY, RESULTS_KEY};
use textlab_core::{BatchReport, LabError, Lookup, ReportContext, Table};
use textlab_ml::ConfusionMatrix;

use crate::dims::{DIM_FILES_TRAINING, DIM_FILES_VALIDATION};

/// Clave canónica de una ejecución para agrupar filas de reporte.
pub fn canonical_row_key(discriminators: &BTreeMap<String, String>) -> String {
    discriminators.iter()
                  .filter(|(name, _)| name.as_str() != DIM_FILES_TRAINING && name.as_str() != DIM_FILES_VALIDATION)
                  .map(|(_, value)| value.as_str())
                  .collect::<Vec<_>>()
                  .join("_")
}

/// Reporte train/test: una fila por ejecución de test con sus métricas.
/// Un artifact de resultados ausente deja la fila vacía (contribución
/// cero), nunca aborta la agregación.
pub struct TrainTestReport;

impl BatchReport for TrainTestReport {
    fn name(&self) -> &str {
        "train-test"
    }

    fn execute(&self, ctx: &mut ReportContext<'_>) -> Result<Table, LabError> {
        let mut table = Table::new();
        let records: Vec<_> = ctx.executions().iter().filter(|r| r.task == "test").cloned().collect();
        for record in records {
            let key = canonical_row_key(&record.discriminators);
            let mut row = BTreeMap::new();
            if let Lookup::Found(artifact) = ctx.load_optional(&record.execution, RESULTS_KEY) {
                let metrics: BTreeMap<String, f64> = serde_json::from_value(artifact.payload)
                    .map_err(|e| LabError::Internal(format!("decoding results artifact: {e}")))?;
                for (metric, value) in metrics {
                    row.insert(metric, value.to_string());
                }
            }
            table.add_row(key, row);
        }
        Ok(table)
    }
}

/// Reporte cross-validation: agrupa las ejecuciones de test por clave
/// canónica (los folds de una misma configuración comparten clave), suma
/// sus matrices de confusión y deriva las métricas de la matriz agregada.
pub struct CrossValidationReport;

impl BatchReport for CrossValidationReport {
    fn name(&self) -> &str {
        "cross-validation"
    }

    fn execute(&self, ctx: &mut ReportContext<'_>) -> Result<Table, LabError> {
        let records: Vec<_> = ctx.executions().iter().filter(|r| r.task == "test").cloned().collect();

        let mut groups: IndexMap<String, (ConfusionMatrix, usize)> = IndexMap::new();
        for record in records {
            let key = canonical_row_key(&record.discriminators);
            let entry = groups.entry(key).or_insert_with(|| (ConfusionMatrix::new(), 0));
            entry.1 += 1;
            if let Lookup::Found(artifact) = ctx.load_optional(&record.execution, CONFUSION_MATRIX_KEY) {
                let matrix: ConfusionMatrix = serde_json::from_value(artifact.payload)
                    .map_err(|e| LabError::Internal(format!("decoding confusion matrix artifact: {e}")))?;
                entry.0.merge(&matrix);
            }
        }

        let mut table = Table::new();
        for (key, (matrix, folds)) in groups {
            let mut row = BTreeMap::new();
            row.insert("folds".to_string(), folds.to_string());
            row.insert("total".to_string(), matrix.total().to_string());
            row.insert("correct".to_string(), matrix.correct().to_string());
            row.insert("incorrect".to_string(), (matrix.total() - matrix.correct()).to_string());
            row.insert("accuracy".to_string(),
                       matrix.accuracy().map(|a| a.to_string()).unwrap_or_default());
            table.add_row(key, row);
        }
        Ok(table)
    }
}

/// Resumen compacto de una métrica por fila, para la salida del demo.
pub fn performance_overview(table: &Table, metric: &str) -> String {
    let mut out = String::from("== performance overview ==\n");
    for (label, values) in table.rows() {
        let value = values.get(metric).map(String::as_str).unwrap_or("-");
        out.push_str(&format!("{label}: {metric} = {value}\n"));
    }
    out
}
