//! Motor de ejecución de batches.

mod core;
mod policy;

pub use core::{BatchEngine, BatchOutcome};
pub use policy::ExecutionPolicy;
