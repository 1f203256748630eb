//! Espacio de parámetros: dimensiones, bundles y su producto cartesiano.
//!
//! El espacio existe sólo durante la planificación; las `Configuration`
//! resultantes son inmutables y alimentan al executor.

mod configuration;
mod dimension;
mod planner;

pub use configuration::Configuration;
pub use dimension::{Dimension, DimensionBundle, ParameterSpace};
