//! Matriz de confusión agregable entre folds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Una celda de la matriz serializada: cuántas veces `actual` fue
/// predicho como `predicted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionEntry {
    pub actual: String,
    pub predicted: String,
    pub count: u64,
}

/// Matriz de confusión dispersa sobre etiquetas string. El orden interno
/// es el del par (actual, predicted), así la serialización es estable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ConfusionEntry>", into = "Vec<ConfusionEntry>")]
pub struct ConfusionMatrix {
    cells: BTreeMap<(String, String), u64>,
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, actual: &str, predicted: &str) {
        self.add(actual, predicted, 1);
    }

    pub fn add(&mut self, actual: &str, predicted: &str, count: u64) {
        *self.cells.entry((actual.to_string(), predicted.to_string())).or_insert(0) += count;
    }

    pub fn count(&self, actual: &str, predicted: &str) -> u64 {
        self.cells.get(&(actual.to_string(), predicted.to_string())).copied().unwrap_or(0)
    }

    /// Suma celda a celda la otra matriz sobre esta.
    pub fn merge(&mut self, other: &ConfusionMatrix) {
        for ((actual, predicted), count) in &other.cells {
            self.add(actual, predicted, *count);
        }
    }

    pub fn total(&self) -> u64 {
        self.cells.values().sum()
    }

    pub fn correct(&self) -> u64 {
        self.cells.iter().filter(|((a, p), _)| a == p).map(|(_, c)| *c).sum()
    }

    /// Proporción de aciertos; `None` sobre una matriz vacía.
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            None
        } else {
            Some(self.correct() as f64 / total as f64)
        }
    }

    /// Etiquetas observadas (actuales y predichas), ordenadas.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.cells.keys()
                                                .flat_map(|(a, p)| [a.clone(), p.clone()])
                                                .collect();
        labels.sort();
        labels.dedup();
        labels
    }

    pub fn entries(&self) -> impl Iterator<Item = ConfusionEntry> + '_ {
        self.cells.iter().map(|((actual, predicted), count)| ConfusionEntry {
            actual: actual.clone(),
            predicted: predicted.clone(),
            count: *count,
        })
    }
}

impl From<Vec<ConfusionEntry>> for ConfusionMatrix {
    fn from(entries: Vec<ConfusionEntry>) -> Self {
        let mut matrix = ConfusionMatrix::new();
        for entry in entries {
            matrix.add(&entry.actual, &entry.predicted, entry.count);
        }
        matrix
    }
}

impl From<ConfusionMatrix> for Vec<ConfusionEntry> {
    fn from(matrix: ConfusionMatrix) -> Self {
        matrix.entries().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_counts_the_diagonal() {
        let mut m = ConfusionMatrix::new();
        m.record("pos", "pos");
        m.record("pos", "pos");
        m.record("pos", "neg");
        m.record("neg", "neg");
        assert_eq!(m.total(), 4);
        assert_eq!(m.correct(), 3);
        assert_eq!(m.accuracy(), Some(0.75));
    }

    #[test]
    fn empty_matrix_has_no_accuracy() {
        assert_eq!(ConfusionMatrix::new().accuracy(), None);
    }

    #[test]
    fn merge_sums_cell_by_cell() {
        let mut left = ConfusionMatrix::new();
        left.add("a", "a", 2);
        left.add("a", "b", 1);
        let mut right = ConfusionMatrix::new();
        right.add("a", "b", 3);
        right.add("b", "b", 1);

        left.merge(&right);
        assert_eq!(left.count("a", "a"), 2);
        assert_eq!(left.count("a", "b"), 4);
        assert_eq!(left.count("b", "b"), 1);
        assert_eq!(left.total(), 7);
    }

    #[test]
    fn serializes_as_a_stable_entry_list() {
        let mut m = ConfusionMatrix::new();
        m.add("b", "a", 1);
        m.add("a", "a", 5);

        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json[0]["actual"], "a");
        assert_eq!(json[1]["actual"], "b");

        let back: ConfusionMatrix = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn labels_cover_actual_and_predicted_sides() {
        let mut m = ConfusionMatrix::new();
        m.record("pos", "neu");
        assert_eq!(m.labels(), vec!["neu", "pos"]);
    }
}
