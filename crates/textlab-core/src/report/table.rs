//! `Table`: estructura tabular genérica de los reportes.
//!
//! Dos representaciones del mismo contenido:
//! - `to_csv`: registro por fila, sin restricción de columnas;
//! - `to_grid`: grilla compacta estilo hoja de cálculo, omitida cuando la
//!   tabla supera `MAX_GRID_COLUMNS` (las hojas de cálculo clásicas no
//!   soportan más de 255 columnas).
//!
//! Las columnas conservan orden de primera aparición; las celdas ausentes se
//! emiten vacías.

use std::collections::BTreeMap;

use indexmap::IndexSet;

use crate::artifact::Lookup;
use crate::constants::MAX_GRID_COLUMNS;

#[derive(Debug, Default, Clone)]
pub struct Table {
    columns: IndexSet<String>,
    rows: Vec<(String, BTreeMap<String, String>)>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega una fila etiquetada; columnas nuevas se registran en orden de
    /// primera aparición.
    pub fn add_row(&mut self, label: impl Into<String>, values: BTreeMap<String, String>) {
        for column in values.keys() {
            self.columns.insert(column.clone());
        }
        self.rows.push((label.into(), values));
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.as_str())
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        self.rows.get(row).and_then(|(_, values)| values.get(column)).map(|s| s.as_str())
    }

    /// Filas en orden de inserción, como (etiqueta, celdas).
    pub fn rows(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, String>)> {
        self.rows.iter().map(|(label, values)| (label.as_str(), values))
    }

    /// Representación tabular sin restricción de columnas.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        out.push_str("ID");
        for column in &self.columns {
            out.push(',');
            out.push_str(&escape_csv(column));
        }
        out.push('\n');
        for (label, values) in &self.rows {
            out.push_str(&escape_csv(label));
            for column in &self.columns {
                out.push(',');
                if let Some(v) = values.get(column) {
                    out.push_str(&escape_csv(v));
                }
            }
            out.push('\n');
        }
        out
    }

    /// Grilla compacta de ancho fijo. `Missing` por encima del límite de
    /// columnas: el llamador emite igualmente el CSV.
    pub fn to_grid(&self) -> Lookup<String> {
        if self.column_count() > MAX_GRID_COLUMNS {
            return Lookup::Missing;
        }
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.len()).collect();
        let mut label_width = 2;
        for (label, values) in &self.rows {
            label_width = label_width.max(label.len());
            for (i, column) in self.columns.iter().enumerate() {
                if let Some(v) = values.get(column) {
                    widths[i] = widths[i].max(v.len());
                }
            }
        }

        let mut out = String::new();
        out.push_str(&format!("{:label_width$}", "ID"));
        for (i, column) in self.columns.iter().enumerate() {
            out.push_str(&format!(" | {:w$}", column, w = widths[i]));
        }
        out.push('\n');
        for (label, values) in &self.rows {
            out.push_str(&format!("{label:label_width$}"));
            for (i, column) in self.columns.iter().enumerate() {
                let v = values.get(column).map(|s| s.as_str()).unwrap_or("");
                out.push_str(&format!(" | {:w$}", v, w = widths[i]));
            }
            out.push('\n');
        }
        Lookup::Found(out)
    }
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn csv_keeps_first_seen_column_order() {
        let mut table = Table::new();
        table.add_row("r1", row(&[("b", "1"), ("a", "2")]));
        table.add_row("r2", row(&[("c", "3")]));
        let csv = table.to_csv();
        assert_eq!(csv.lines().next().unwrap(), "ID,a,b,c");
        assert_eq!(csv.lines().nth(2).unwrap(), "r2,,,3");
    }

    #[test]
    fn csv_escapes_separators_and_quotes() {
        let mut table = Table::new();
        table.add_row("r1", row(&[("col", "x,\"y\"")]));
        assert!(table.to_csv().contains("\"x,\"\"y\"\"\""));
    }

    #[test]
    fn grid_is_skipped_above_the_column_cap() {
        let mut table = Table::new();
        let wide: BTreeMap<String, String> = (0..256).map(|i| (format!("c{i:03}"), i.to_string())).collect();
        table.add_row("r1", wide);
        assert_eq!(table.column_count(), 256);
        assert!(table.to_grid().is_missing());
        // la representación sin restricción sigue emitiendo todo
        let csv = table.to_csv();
        assert_eq!(csv.lines().next().unwrap().split(',').count(), 257);
    }

    #[test]
    fn grid_renders_at_the_cap() {
        let mut table = Table::new();
        let wide: BTreeMap<String, String> = (0..255).map(|i| (format!("c{i:03}"), i.to_string())).collect();
        table.add_row("r1", wide);
        assert!(matches!(table.to_grid(), Lookup::Found(_)));
    }
}
