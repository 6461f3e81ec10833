//! # Annotation
//!
//! Cell-level highlight flags, computed from the output table and the raw
//! backend table. Neither table is touched; the presentation layer maps
//! each [`Annotation`] to a colour.
//!
//! ## Rules
//! ```text
//! ┌───────────────────────────────┬─────────────────────────────────────────┐
//! │ Condition                     │ Flagged cells                           │
//! ├───────────────────────────────┼─────────────────────────────────────────┤
//! │ supplier_max_price > tier     │ tier column + supplier_max_price        │
//! │ GulongPH > configured rival   │ GulongPH + that competitor column       │
//! │ selection_max_price < cost    │ selection_max_price                     │
//! │ value ≠ raw value (by model)  │ that column                             │
//! └───────────────────────────────┴─────────────────────────────────────────┘
//! ```

use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::table::{columns, Cell, Table};
use crate::types::Tier;

// =============================================================================
// Annotation
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Annotation {
    /// Price is under the supplier cost.
    BelowCost,
    /// Promo price is above this competitor.
    AboveCompetitor,
    /// Selection price leaves margin under the supplier cost.
    PositiveMarginOverSelection,
    /// Differs from the backend value.
    Adjusted,
}

impl Annotation {
    pub const fn describe(&self) -> &'static str {
        match self {
            Annotation::BelowCost => "would be below cost",
            Annotation::AboveCompetitor => "would be below competitor",
            Annotation::PositiveMarginOverSelection => "provides positive margin over selection",
            Annotation::Adjusted => "differs from backend price",
        }
    }
}

/// Same shape as the annotated table: one (possibly empty) list per cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct AnnotationMatrix {
    pub columns: Vec<String>,
    pub cells: Vec<Vec<Vec<Annotation>>>,
}

impl AnnotationMatrix {
    fn empty_like(table: &Table) -> Self {
        Self {
            columns: table.columns.clone(),
            cells: vec![vec![Vec::new(); table.columns.len()]; table.rows.len()],
        }
    }

    fn mark(&mut self, row: usize, col: usize, annotation: Annotation) {
        let cell = &mut self.cells[row][col];
        if !cell.contains(&annotation) {
            cell.push(annotation);
        }
    }

    /// Annotations on one cell.
    pub fn get(&self, row: usize, column: &str) -> &[Annotation] {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|col| self.cells.get(row).and_then(|r| r.get(col)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of cells carrying `annotation`.
    pub fn count(&self, annotation: Annotation) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.contains(&annotation))
            .count()
    }
}

// =============================================================================
// Annotate
// =============================================================================

/// Computes the highlight matrix for `computed` against `raw`.
///
/// `raw` rows are matched on `model`. Only the `competitors` being
/// reconciled against are compared with the promo price. Columns missing
/// from either table are skipped, as are cells past the end of a short row;
/// empty cells never compare.
pub fn annotate(computed: &Table, raw: &Table, competitors: &[String]) -> AnnotationMatrix {
    let mut matrix = AnnotationMatrix::empty_like(computed);

    let col = |name: &str| computed.column_index(name);
    let cost_col = col(columns::SUPPLIER_MAX_PRICE);
    let promo_col = col(Tier::Promo.column());
    let selection_col = col(columns::SELECTION_MAX_PRICE);
    let model_col = col(columns::MODEL);

    let tier_cols: Vec<usize> = Tier::ALL.iter().filter_map(|tier| col(tier.column())).collect();
    let competitor_cols: Vec<usize> = competitors.iter().filter_map(|name| col(name)).collect();
    let raw_models = raw.model_index();

    for (r, row) in computed.rows.iter().enumerate() {
        let money_at = |c: Option<usize>| -> Option<Money> { c.and_then(|c| row.get(c)).and_then(Cell::as_money) };
        let cost = money_at(cost_col);

        if let Some(cost) = cost {
            for &c in &tier_cols {
                if matches!(money_at(Some(c)), Some(price) if cost > price) {
                    matrix.mark(r, c, Annotation::BelowCost);
                    if let Some(cost_c) = cost_col {
                        matrix.mark(r, cost_c, Annotation::BelowCost);
                    }
                }
            }

            if let (Some(s), Some(selection)) = (selection_col, money_at(selection_col)) {
                if selection < cost {
                    matrix.mark(r, s, Annotation::PositiveMarginOverSelection);
                }
            }
        }

        if let (Some(p), Some(promo)) = (promo_col, money_at(promo_col)) {
            for &c in &competitor_cols {
                if matches!(money_at(Some(c)), Some(competitor) if promo > competitor) {
                    matrix.mark(r, p, Annotation::AboveCompetitor);
                    matrix.mark(r, c, Annotation::AboveCompetitor);
                }
            }
        }

        let raw_row = model_col
            .and_then(|m| row.get(m))
            .and_then(Cell::as_text)
            .and_then(|model| raw_models.get(model))
            .and_then(|&i| raw.rows.get(i));
        if let Some(raw_row) = raw_row {
            for (c, name) in computed.columns.iter().enumerate() {
                if Some(c) == model_col {
                    continue;
                }
                let Some(raw_c) = raw.column_index(name) else {
                    continue;
                };
                if let (Some(Cell::Money(now)), Some(Cell::Money(before))) = (row.get(c), raw_row.get(raw_c)) {
                    if now != before {
                        matrix.mark(r, c, Annotation::Adjusted);
                    }
                }
            }
        }
    }

    matrix
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn money(pesos: i64) -> Cell {
        Cell::Money(Money::from_pesos(pesos))
    }

    fn computed() -> Table {
        let mut table = Table::new(
            ["model", "supplier_max_price", "GulongPH", "b2b", "GoGulong", "selection_max_price"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        );
        table.push_row(vec![Cell::from("M1"), money(1000), money(1176), money(900), money(1100), money(950)]);
        table.push_row(vec![Cell::from("M2"), Cell::Empty, Cell::Empty, Cell::Empty, money(1), Cell::Empty]);
        table
    }

    fn raw() -> Table {
        let mut table = Table::new(vec!["model".to_string(), "GulongPH".to_string()]);
        table.push_row(vec![Cell::from("M1"), money(1200)]);
        table.push_row(vec![Cell::from("M2"), money(1200)]);
        table
    }

    fn rivals() -> Vec<String> {
        vec!["GoGulong".to_string(), "TireManila".to_string()]
    }

    #[test]
    fn test_annotation_rules() {
        let matrix = annotate(&computed(), &raw(), &rivals());

        assert_eq!(matrix.get(0, "b2b"), &[Annotation::BelowCost]);
        assert_eq!(matrix.get(0, "supplier_max_price"), &[Annotation::BelowCost]);
        assert_eq!(
            matrix.get(0, "GulongPH"),
            &[Annotation::AboveCompetitor, Annotation::Adjusted]
        );
        assert_eq!(matrix.get(0, "GoGulong"), &[Annotation::AboveCompetitor]);
        assert_eq!(
            matrix.get(0, "selection_max_price"),
            &[Annotation::PositiveMarginOverSelection]
        );
    }

    #[test]
    fn test_empty_cells_never_flag() {
        let matrix = annotate(&computed(), &raw(), &rivals());
        for column in &matrix.columns {
            assert!(matrix.get(1, column).is_empty(), "{} flagged", column);
        }
    }

    #[test]
    fn test_same_shape_and_inputs_untouched() {
        let table = computed();
        let raw_table = raw();
        let before = (table.clone(), raw_table.clone());

        let matrix = annotate(&table, &raw_table, &rivals());
        assert_eq!(matrix.cells.len(), table.rows.len());
        assert!(matrix.cells.iter().all(|row| row.len() == table.columns.len()));
        assert_eq!((table, raw_table), before);
    }

    #[test]
    fn test_count_and_describe() {
        let matrix = annotate(&computed(), &raw(), &rivals());
        assert_eq!(matrix.count(Annotation::AboveCompetitor), 2);
        assert_eq!(Annotation::AboveCompetitor.describe(), "would be below competitor");
    }

    #[test]
    fn test_only_configured_competitors_flag() {
        let columns = ["model", "GulongPH", "GoGulong", "PartsPro"];
        let mut table = Table::new(columns.iter().map(|c| c.to_string()).collect());
        table.push_row(vec![Cell::from("M1"), money(5000), money(6000), money(4000)]);
        let raw = Table::new(vec!["model".to_string()]);

        let matrix = annotate(&table, &raw, &rivals());
        assert!(matrix.get(0, "PartsPro").is_empty());
        assert!(matrix.get(0, "GulongPH").is_empty());

        let matrix = annotate(&table, &raw, &["PartsPro".to_string()]);
        assert_eq!(matrix.get(0, "PartsPro"), &[Annotation::AboveCompetitor]);
        assert_eq!(matrix.get(0, "GulongPH"), &[Annotation::AboveCompetitor]);
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let mut table = computed();
        table.rows[0].truncate(2);
        let mut raw_table = raw();
        raw_table.rows[1].clear();

        let matrix = annotate(&table, &raw_table, &rivals());
        assert_eq!(matrix.cells.len(), table.rows.len());
        assert!(matrix.get(0, "GulongPH").is_empty());
        assert!(matrix.get(1, "GulongPH").is_empty());
    }
}
