use serde::{Deserialize, Serialize};

/// Política de ejecución frente a un fingerprint ya conocido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionPolicy {
    /// Si ya existe una ejecución bajo el mismo fingerprint, la tarea se
    /// salta y sus artifacts comprometidos se ligan a los consumidores.
    ReuseCached,
    /// La tarea ejecuta incondicionalmente; sus artifacts sobreescriben los
    /// previos bajo la misma clave.
    AlwaysRerun,
}
