//! Constantes del motor de experimentos.
//!
//! Agrupa los valores estáticos que participan en el cálculo de fingerprints
//! y las claves de artifact conocidas por todos los componentes. Cambiar
//! `ENGINE_VERSION` invalida deterministícamente la cache de ejecuciones
//! aunque las configuraciones no cambien.

/// Versión lógica del motor. Forma parte del input de todo fingerprint de
/// tarea, de modo que un cambio incompatible del engine recalcule las
/// ejecuciones cacheadas. Mantener estable mientras no haya cambios de
/// semántica.
pub const ENGINE_VERSION: &str = "L1.0";

/// Clave de artifact con el mapa de discriminadores de una ejecución.
/// La comete el engine automáticamente para cada tarea.
pub const DISCRIMINATORS_KEY: &str = "discriminators";

/// Clave de artifact con las métricas (nombre → valor) de una ejecución.
pub const RESULTS_KEY: &str = "results";

/// Clave de artifact con la matriz de confusión de una ejecución.
pub const CONFUSION_MATRIX_KEY: &str = "confusion-matrix";

/// Sentinela para cross-validation leave-one-out: el particionador lo
/// resuelve a `numFolds = |corpus|`.
pub const LEAVE_ONE_OUT: i64 = -1;

/// Máximo de columnas que tolera la representación compacta (tipo hoja de
/// cálculo) de una `Table`. Por encima se omite esa representación; la
/// tabular CSV no tiene límite.
pub const MAX_GRID_COLUMNS: usize = 255;
