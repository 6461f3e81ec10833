//! # Output Table
//!
//! Ordered columns of typed cells: what the presentation layer renders and
//! what gets exported as CSV.
//!
//! ## Shape
//! ```text
//! columns: [ model | supplier_max_price | GulongPH | ... | qty_SupA | price_SupA ]
//! rows[0]: [ Text  | Money              | Money    | ... | Int      | Money      ]
//! rows[1]: [ Text  | Empty              | Empty    | ... | Empty    | Empty      ]
//! ```
//!
//! `Empty` is "undefined", never zero: an unpriced row exports blank cells.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use ts_rs::TS;

use crate::config::TierLabels;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Tier;

/// Column names shared by the pass, the annotator and the CSV header.
pub mod columns {
    pub const MODEL: &str = "model";
    pub const SKU_NAME: &str = "sku_name";
    pub const MAKE: &str = "make";
    pub const PATTERN: &str = "pattern";
    pub const DIMENSIONS: &str = "dimensions";
    pub const YEAR: &str = "year";
    pub const SUPPLIER_MAX_PRICE: &str = "supplier_max_price";
    pub const PROMO_3PLUS1: &str = "3+1_promo_per_tire_GP25";
    pub const QTY_TIREMANILA: &str = "qty_tiremanila";
    pub const SELECTION_MAX_PRICE: &str = "selection_max_price";
    /// Promo price currently live on the backend.
    pub const GULONGPH_BACKEND: &str = "GulongPH_backend";

    pub const QTY_PREFIX: &str = "qty_";
    pub const PRICE_PREFIX: &str = "price_";

    /// Always shown, in this order.
    pub const BASE: [&str; 17] = [
        MODEL,
        SKU_NAME,
        MAKE,
        PATTERN,
        DIMENSIONS,
        SUPPLIER_MAX_PRICE,
        PROMO_3PLUS1,
        "GulongPH",
        "GulongPH_slashed",
        "b2b",
        "affiliate",
        "marketplace",
        "GoGulong",
        "TireManila",
        "PartsPro",
        QTY_TIREMANILA,
        YEAR,
    ];
}

// =============================================================================
// Cell
// =============================================================================

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Money(Money),
}

impl Cell {
    pub fn as_money(&self) -> Option<Money> {
        match self {
            Cell::Money(money) => Some(*money),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<Option<Money>> for Cell {
    fn from(value: Option<Money>) -> Self {
        value.map_or(Cell::Empty, Cell::Money)
    }
}

impl From<Option<i64>> for Cell {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Cell::Empty, Cell::Int)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// CSV rendering: money as plain decimals, empty as blank.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(text) => f.write_str(text),
            Cell::Int(value) => write!(f, "{}", value),
            Cell::Money(money) => f.write_str(&money.to_plain_string()),
        }
    }
}

// =============================================================================
// Table
// =============================================================================

/// Ordered columns with one `Vec<Cell>` per row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Cell at `row` in the named column.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    /// Row index of the first row per `model` value.
    pub fn model_index(&self) -> HashMap<&str, usize> {
        let mut index = HashMap::new();
        if let Some(model_col) = self.column_index(columns::MODEL) {
            for (i, row) in self.rows.iter().enumerate() {
                if let Some(model) = row.get(model_col).and_then(Cell::as_text) {
                    index.entry(model).or_insert(i);
                }
            }
        }
        index
    }

    /// Copy with tier columns renamed to the operator's labels.
    ///
    /// ```rust
    /// use gulong_core::table::Table;
    /// use gulong_core::TierLabels;
    ///
    /// let table = Table::new(vec!["model".into(), "GulongPH".into()]);
    /// let labelled = table.relabel(&TierLabels::default());
    /// assert_eq!(labelled.columns, vec!["model", "Website Prices"]);
    /// ```
    pub fn relabel(&self, labels: &TierLabels) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|column| match Tier::from_column(column) {
                Some(tier) => labels.label(tier).to_string(),
                None => column.clone(),
            })
            .collect();
        Table {
            columns,
            rows: self.rows.clone(),
        }
    }

    /// Encodes the table as UTF-8 CSV with a header row.
    ///
    /// The same table always encodes to the same bytes.
    pub fn to_csv_bytes(&self) -> CoreResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record(&self.columns)
            .map_err(|e| CoreError::Export(e.to_string()))?;

        for row in &self.rows {
            writer
                .write_record(row.iter().map(|cell| cell.to_string()))
                .map_err(|e| CoreError::Export(e.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| CoreError::Export(e.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(vec![
            "model".to_string(),
            "GulongPH".to_string(),
            "qty_tiremanila".to_string(),
        ]);
        table.push_row(vec![
            Cell::from("M1"),
            Cell::Money(Money::from_pesos(1176)),
            Cell::Int(8),
        ]);
        table.push_row(vec![Cell::from("M2, \"XL\"")]);
        table
    }

    #[test]
    fn test_csv_export() {
        let csv = String::from_utf8(sample().to_csv_bytes().unwrap()).unwrap();
        assert_eq!(
            csv,
            "model,GulongPH,qty_tiremanila\nM1,1176.00,8\n\"M2, \"\"XL\"\"\",,\n"
        );
    }

    #[test]
    fn test_csv_export_is_reproducible() {
        let table = sample();
        assert_eq!(table.to_csv_bytes().unwrap(), table.to_csv_bytes().unwrap());
    }

    #[test]
    fn test_push_row_pads() {
        let table = sample();
        assert_eq!(table.rows[1].len(), 3);
        assert!(table.rows[1][2].is_empty());
    }

    #[test]
    fn test_get_and_model_index() {
        let table = sample();
        assert_eq!(
            table.get(0, "GulongPH").and_then(Cell::as_money),
            Some(Money::from_pesos(1176))
        );
        assert_eq!(table.get(0, "missing"), None);
        assert_eq!(table.model_index().get("M1"), Some(&0));
    }

    #[test]
    fn test_cell_serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Cell::Empty,
            Cell::from("x"),
            Cell::Int(3),
            Cell::Money(Money::from_pesos(2)),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,"x",3,200]"#);
    }
}
