//! Feature store: instancias nombradas con features tipadas.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use textlab_core::LabError;

/// Valor de una feature. Los valores numéricos viajan como f64; los
/// backends deciden cómo interpretarlos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Boolean(bool),
    Numeric(f64),
    Nominal(String),
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        FeatureValue::Boolean(v)
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Numeric(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Nominal(v.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub value: FeatureValue,
}

impl Feature {
    pub fn new(name: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// Una instancia etiquetada: las features de un documento más su outcome.
///
/// El vector de features solo crece vía `add_feature`, que es el punto
/// donde se impone la unicidad de nombres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    pub outcome: String,
    features: Vec<Feature>,
}

impl Instance {
    pub fn new(id: impl Into<String>, outcome: impl Into<String>) -> Self {
        Self { id: id.into(), outcome: outcome.into(), features: Vec::new() }
    }

    /// Agrega una feature rechazando nombres duplicados dentro de la
    /// instancia. Ante un duplicado la instancia queda sin modificar.
    pub fn add_feature(&mut self, feature: Feature) -> Result<(), LabError> {
        if self.features.iter().any(|f| f.name == feature.name) {
            return Err(LabError::DuplicateFeature(feature.name));
        }
        self.features.push(feature);
        Ok(())
    }

    pub fn feature(&self, name: &str) -> Option<&FeatureValue> {
        self.features.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// Features en orden de inserción.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }
}

/// Colección de instancias con los universos de nombres de features y de
/// outcomes observados, en orden de primera aparición.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureStore {
    instances: Vec<Instance>,
    feature_names: IndexSet<String>,
    outcomes: IndexSet<String>,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, instance: Instance) {
        for feature in &instance.features {
            self.feature_names.insert(feature.name.clone());
        }
        self.outcomes.insert(instance.outcome.clone());
        self.instances.push(instance);
    }

    /// Arma y agrega una instancia validando la unicidad de nombres de
    /// feature. Ante un duplicado la instancia ofensora se rechaza y el
    /// store queda exactamente como estaba.
    pub fn add_instance(&mut self,
                        id: impl Into<String>,
                        outcome: impl Into<String>,
                        features: Vec<Feature>)
                        -> Result<(), LabError> {
        let mut instance = Instance::new(id, outcome);
        for feature in features {
            instance.add_feature(feature)?;
        }
        self.add(instance);
        Ok(())
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Nombres de features en orden de primera aparición.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.feature_names.iter().map(String::as_str)
    }

    /// Outcomes observados en orden de primera aparición.
    pub fn outcomes(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().map(String::as_str)
    }

    /// Conteo de instancias por outcome, en orden de primera aparición.
    pub fn outcome_counts(&self) -> IndexMap<String, usize> {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for outcome in &self.outcomes {
            counts.insert(outcome.clone(), 0);
        }
        for instance in &self.instances {
            *counts.entry(instance.outcome.clone()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(id: &str, outcome: &str, features: &[(&str, f64)]) -> Instance {
        let mut i = Instance::new(id, outcome);
        for (name, value) in features {
            i.add_feature(Feature::new(*name, *value)).unwrap();
        }
        i
    }

    #[test]
    fn duplicate_feature_is_rejected_and_leaves_the_instance_unchanged() {
        let mut i = instance("d1", "pos", &[("len", 3.0)]);
        let err = i.add_feature(Feature::new("len", 9.0)).unwrap_err();
        assert!(matches!(err, LabError::DuplicateFeature(ref name) if name == "len"));
        assert_eq!(i.features().len(), 1);
        assert_eq!(i.feature("len"), Some(&FeatureValue::Numeric(3.0)));
    }

    #[test]
    fn features_are_read_back_in_insertion_order() {
        let i = instance("d1", "pos", &[("len", 3.0), ("caps", 1.0)]);
        let names: Vec<_> = i.features().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["len", "caps"]);
    }

    #[test]
    fn rejected_instance_leaves_the_store_unchanged() {
        let mut store = FeatureStore::new();
        store.add_instance("d1", "pos", vec![Feature::new("len", 3.0)]).unwrap();

        let err = store.add_instance("d2", "neg", vec![Feature::new("len", 1.0), Feature::new("len", 2.0)])
                       .unwrap_err();
        assert!(matches!(err, LabError::DuplicateFeature(_)));
        assert_eq!(store.len(), 1);
        let outcomes: Vec<_> = store.outcomes().collect();
        assert_eq!(outcomes, vec!["pos"]);
    }

    #[test]
    fn store_tracks_feature_and_outcome_universes_in_first_seen_order() {
        let mut store = FeatureStore::new();
        store.add(instance("d1", "pos", &[("len", 1.0), ("caps", 0.0)]));
        store.add(instance("d2", "neg", &[("caps", 2.0), ("digits", 1.0)]));
        store.add(instance("d3", "pos", &[("len", 4.0)]));

        let names: Vec<_> = store.feature_names().collect();
        assert_eq!(names, vec!["len", "caps", "digits"]);
        let outcomes: Vec<_> = store.outcomes().collect();
        assert_eq!(outcomes, vec!["pos", "neg"]);

        let counts = store.outcome_counts();
        assert_eq!(counts["pos"], 2);
        assert_eq!(counts["neg"], 1);
    }

    #[test]
    fn feature_values_round_trip_through_json() {
        let mut i = Instance::new("d1", "pos");
        i.add_feature(Feature::new("flag", true)).unwrap();
        i.add_feature(Feature::new("ratio", 0.5)).unwrap();
        i.add_feature(Feature::new("shape", "Xx")).unwrap();

        let json = serde_json::to_string(&i).unwrap();
        let back: Instance = serde_json::from_str(&json).unwrap();
        assert_eq!(back, i);
    }
}
