//! Modelo de tareas.
//!
//! Una tarea es una unidad nominada de trabajo con imports declarados
//! (artifacts consumidos de tareas aguas arriba), claves de salida
//! declaradas y un conjunto discriminador. Las tareas componen en `Batch`
//! (colección ordenada que es a su vez una tarea, habilitando anidamiento).
//! Conjunto cerrado de variantes {Leaf, Batch}: composición por contrato de
//! imports/outputs, sin jerarquías de herencia.

mod batch;
mod context;
mod definition;

pub use batch::{Batch, SpaceSource};
pub use context::TaskContext;
pub use definition::{Import, LeafTask, Task};
