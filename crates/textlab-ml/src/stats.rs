//! Distribuciones de frecuencia y selección top-K acotada.
//!
//! El colector mantiene como máximo K entradas vivas en un heap binario:
//! el máximo del heap es la entrada más débil, así el descarte por overflow
//! es O(log K) y la memoria no depende del vocabulario total.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Un término con su conteo agregado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFreq {
    pub term: String,
    pub count: u64,
}

/// Distribución de frecuencias acumulativa sobre términos.
///
/// Preserva el orden de primera inserción (irrelevante para el top-K, que
/// ordena por conteo) y acumula conteos de llamadas repetidas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrequencyDistribution {
    counts: IndexMap<String, u64>,
}

impl FrequencyDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, term: &str) {
        self.add_count(term, 1);
    }

    pub fn add_count(&mut self, term: &str, count: u64) {
        *self.counts.entry(term.to_string()).or_insert(0) += count;
    }

    pub fn count(&self, term: &str) -> u64 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Absorbe otra distribución sumando conteos término a término.
    pub fn merge(&mut self, other: &FrequencyDistribution) {
        for (term, count) in &other.counts {
            self.add_count(term, *count);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(t, c)| (t.as_str(), *c))
    }
}

/// Entrada del heap con orden invertido: el "mayor" es el peor candidato.
/// A igual conteo pierde el término lexicográficamente mayor, de modo que
/// la selección es determinista ante empates en el borde K.
#[derive(Debug, PartialEq, Eq)]
struct HeapEntry {
    count: u64,
    term: String,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.count.cmp(&self.count).then_with(|| self.term.cmp(&other.term))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Selecciona los K términos más frecuentes de la distribución, en orden
/// de conteo descendente y término ascendente dentro del mismo conteo.
///
/// Devuelve exactamente `min(K, términos distintos)` entradas: con menos
/// de K términos devuelve todos los disponibles y `k == 0` devuelve una
/// selección vacía.
pub fn select_top_k(dist: &FrequencyDistribution, k: usize) -> Vec<TermFreq> {
    let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::with_capacity(k + 1);
    for (term, count) in dist.iter() {
        heap.push(HeapEntry { count, term: term.to_string() });
        if heap.len() > k {
            heap.pop();
        }
    }

    heap.into_sorted_vec()
        .into_iter()
        .map(|e| TermFreq { term: e.term, count: e.count })
        .collect()
}

/// Conjunto congelado de términos seleccionados, para membership O(1)
/// durante la extracción de features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopKSet {
    terms: Vec<TermFreq>,
}

impl TopKSet {
    pub fn freeze(dist: &FrequencyDistribution, k: usize) -> Self {
        Self { terms: select_top_k(dist, k) }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t.term == term)
    }

    /// Términos en el orden de selección (conteo desc, término asc).
    pub fn terms(&self) -> impl Iterator<Item = &TermFreq> {
        self.terms.iter()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dist_of(pairs: &[(&str, u64)]) -> FrequencyDistribution {
        let mut d = FrequencyDistribution::new();
        for (term, count) in pairs {
            d.add_count(term, *count);
        }
        d
    }

    #[test]
    fn counts_accumulate_across_additions() {
        let mut d = FrequencyDistribution::new();
        d.add("the");
        d.add("the");
        d.add_count("the", 3);
        d.add("a");
        assert_eq!(d.count("the"), 5);
        assert_eq!(d.count("a"), 1);
        assert_eq!(d.count("unseen"), 0);
    }

    #[test]
    fn merge_sums_counts_per_term() {
        let mut left = dist_of(&[("x", 2), ("y", 1)]);
        let right = dist_of(&[("y", 4), ("z", 1)]);
        left.merge(&right);
        assert_eq!(left.count("x"), 2);
        assert_eq!(left.count("y"), 5);
        assert_eq!(left.count("z"), 1);
    }

    #[test]
    fn top_k_orders_by_count_then_term() {
        let d = dist_of(&[("b", 3), ("a", 3), ("c", 9), ("d", 1)]);
        let top = select_top_k(&d, 3);
        let names: Vec<_> = top.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn ties_at_the_boundary_keep_the_lexicographically_smaller_term() {
        // tres términos con conteo 2 compiten por dos lugares
        let d = dist_of(&[("zeta", 2), ("alfa", 2), ("beta", 2)]);
        let top = select_top_k(&d, 2);
        let names: Vec<_> = top.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(names, vec!["alfa", "beta"]);
    }

    #[test]
    fn fewer_terms_than_k_returns_them_all() {
        let d = dist_of(&[("only", 1)]);
        assert_eq!(select_top_k(&d, 10).len(), 1);
    }

    #[test]
    fn k_zero_selects_nothing() {
        let d = dist_of(&[("x", 3), ("y", 1)]);
        assert!(select_top_k(&d, 0).is_empty());
        assert!(TopKSet::freeze(&d, 0).is_empty());
    }

    #[test]
    fn frozen_set_answers_membership() {
        let d = dist_of(&[("in", 5), ("out", 1), ("also_in", 4)]);
        let set = TopKSet::freeze(&d, 2);
        assert!(set.contains("in"));
        assert!(set.contains("also_in"));
        assert!(!set.contains("out"));
    }

    proptest! {
        #[test]
        fn prop_top_k_is_bounded_and_dominates_the_rest(
            pairs in proptest::collection::btree_map("[a-f]{1,3}", 1u64..50, 1..40),
            k in 0usize..12,
        ) {
            let mut d = FrequencyDistribution::new();
            for (term, count) in &pairs {
                d.add_count(term, *count);
            }
            let top = select_top_k(&d, k);
            prop_assert!(top.len() <= k);
            prop_assert_eq!(top.len(), k.min(pairs.len()));

            // todo término excluido tiene conteo <= que el mínimo retenido
            if let Some(weakest) = top.last() {
                for (term, count) in &pairs {
                    if !top.iter().any(|t| &t.term == term) {
                        prop_assert!(*count <= weakest.count);
                    }
                }
            }

            // orden no creciente por conteo
            for window in top.windows(2) {
                prop_assert!(window[0].count >= window[1].count);
            }
        }
    }
}
