//! Planner: producto cartesiano sobre dimensiones independientes y bundles.
//!
//! El orden de emisión es determinista y deriva del orden de declaración:
//! la última dimensión declarada varía más rápido. Esa estabilidad es la que
//! hace reproducible el nombrado/caching aguas abajo.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;

use super::{Configuration, ParameterSpace};
use crate::errors::LabError;

impl ParameterSpace {
    /// Enumera todas las configuraciones del espacio.
    ///
    /// Falla con `LabError::Configuration` si una dimensión no tiene valores,
    /// si un bundle tiene tuplas de aridad distinta a sus dimensiones
    /// constituyentes (o ninguna tupla), o si un nombre de dimensión se
    /// repite.
    pub fn plan(&self) -> Result<Vec<Configuration>, LabError> {
        self.validate()?;

        let mut partial: Vec<IndexMap<String, Value>> = vec![IndexMap::new()];

        for dim in &self.dimensions {
            let mut next = Vec::with_capacity(partial.len() * dim.values.len());
            for assignment in &partial {
                for value in &dim.values {
                    let mut extended = assignment.clone();
                    extended.insert(dim.name.clone(), value.clone());
                    next.push(extended);
                }
            }
            partial = next;
        }

        // Un bundle aporta una rama por tupla: sus dimensiones se asignan
        // juntas, nunca en producto cruzado entre sí.
        for bundle in &self.bundles {
            let mut next = Vec::with_capacity(partial.len() * bundle.tuples.len());
            for assignment in &partial {
                for tuple in &bundle.tuples {
                    let mut extended = assignment.clone();
                    for (name, value) in bundle.names.iter().zip(tuple) {
                        extended.insert(name.clone(), value.clone());
                    }
                    next.push(extended);
                }
            }
            partial = next;
        }

        Ok(partial.into_iter().map(Configuration::from_values).collect())
    }

    fn validate(&self) -> Result<(), LabError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for dim in &self.dimensions {
            if dim.values.is_empty() {
                return Err(LabError::Configuration(format!("dimension `{}` has no candidate values", dim.name)));
            }
            if !seen.insert(dim.name.as_str()) {
                return Err(LabError::Configuration(format!("dimension `{}` declared twice", dim.name)));
            }
        }
        for bundle in &self.bundles {
            if bundle.tuples.is_empty() {
                return Err(LabError::Configuration(format!("bundle `{}` has no tuples", bundle.names.join("+"))));
            }
            for tuple in &bundle.tuples {
                if tuple.len() != bundle.names.len() {
                    return Err(LabError::Configuration(format!(
                        "bundle `{}` has a tuple of arity {} (expected {})",
                        bundle.names.join("+"),
                        tuple.len(),
                        bundle.names.len()
                    )));
                }
            }
            for name in &bundle.names {
                if !seen.insert(name.as_str()) {
                    return Err(LabError::Configuration(format!("dimension `{name}` declared twice")));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::{Dimension, DimensionBundle};
    use serde_json::json;

    #[test]
    fn cross_product_over_independent_dimensions() {
        let space = ParameterSpace::new().add_dimension(Dimension::new("lower_case", vec![json!(true), json!(false)]))
                                         .add_dimension(Dimension::new("top_k", vec![json!(50), json!(500)]));
        let configs = space.plan().unwrap();
        assert_eq!(configs.len(), 4);
        // última dimensión varía más rápido
        assert_eq!(configs[0].get("lower_case"), Some(&json!(true)));
        assert_eq!(configs[0].get("top_k"), Some(&json!(50)));
        assert_eq!(configs[1].get("top_k"), Some(&json!(500)));
        assert_eq!(configs[2].get("lower_case"), Some(&json!(false)));
    }

    #[test]
    fn bundle_contributes_one_branch_per_tuple() {
        let bundle = DimensionBundle::new(vec!["fold".into(), "files_validation".into()],
                                          vec![vec![json!(0), json!(["a"])], vec![json!(1), json!(["b"])]]);
        let space = ParameterSpace::new().add_dimension(Dimension::new("top_k", vec![json!(10), json!(20)]))
                                         .add_bundle(bundle);
        let configs = space.plan().unwrap();
        // 2 valores x 2 tuplas, no 2 x 2 x 2
        assert_eq!(configs.len(), 4);
        assert_eq!(configs[0].get("fold"), Some(&json!(0)));
        assert_eq!(configs[0].get("files_validation"), Some(&json!(["a"])));
    }

    #[test]
    fn empty_dimension_is_a_configuration_error() {
        let space = ParameterSpace::new().add_dimension(Dimension::new("empty", vec![]));
        assert!(matches!(space.plan(), Err(LabError::Configuration(_))));
    }

    #[test]
    fn mismatched_bundle_arity_is_a_configuration_error() {
        let bundle = DimensionBundle::new(vec!["a".into(), "b".into()], vec![vec![json!(1)]]);
        let space = ParameterSpace::new().add_bundle(bundle);
        assert!(matches!(space.plan(), Err(LabError::Configuration(_))));
    }

    #[test]
    fn empty_space_plans_a_single_empty_configuration() {
        let configs = ParameterSpace::new().plan().unwrap();
        assert_eq!(configs.len(), 1);
        assert!(configs[0].is_empty());
    }

    #[test]
    fn plan_order_is_stable_across_calls() {
        let space = ParameterSpace::new().add_dimension(Dimension::new("x", vec![json!("p"), json!("q")]))
                                         .add_dimension(Dimension::new("y", vec![json!(1), json!(2), json!(3)]));
        assert_eq!(space.plan().unwrap(), space.plan().unwrap());
    }
}
