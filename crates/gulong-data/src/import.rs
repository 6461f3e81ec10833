//! # CSV Import
//!
//! Loaders for the files operators hand the tool:
//!
//! | File                  | Shape                                         | Loader                    |
//! |-----------------------|-----------------------------------------------|---------------------------|
//! | Backend SKU export    | one row per model, `skus` table columns       | [`load_sku_rows`]         |
//! | Competitor price grid | `model` + one column per competitor (wide)    | [`load_competitor_rows`]  |
//! | Supplier upload       | `supplier,brand,similar_pattern,correct_specs,qty,price` | [`load_supplier_offers`] |
//!
//! Line numbers in errors are 1-based and count the header row.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use gulong_core::validation::{parse_optional_money, parse_optional_quantity};
use gulong_core::SupplierOffer;

use crate::error::{ImportError, ImportResult};
use crate::repository::{CompetitorRow, SkuRow};

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn open(path: &Path) -> ImportResult<File> {
    File::open(path).map_err(|e| ImportError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn csv_error(line: usize, err: csv::Error) -> ImportError {
    ImportError::Csv {
        line: line as u64,
        reason: err.to_string(),
    }
}

fn invalid(line: usize, field: &str, reason: impl ToString) -> ImportError {
    ImportError::Invalid {
        line: line as u64,
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

// =============================================================================
// Supplier Offers
// =============================================================================

/// A supplier upload row before number parsing.
#[derive(Debug, Clone, Deserialize)]
struct OfferRecord {
    supplier: String,
    brand: String,
    similar_pattern: String,
    correct_specs: String,
    qty: Option<String>,
    price: Option<String>,
}

/// Loads supplier offers. Blank `qty`/`price` are "no value"; anything
/// else that is not a number rejects the file.
pub fn load_supplier_offers<R: Read>(input: R) -> ImportResult<Vec<SupplierOffer>> {
    let mut offers = Vec::new();

    for (index, result) in reader(input).deserialize().enumerate() {
        let line = index + 2;
        let record: OfferRecord = result.map_err(|e| csv_error(line, e))?;

        if record.supplier.is_empty() {
            return Err(invalid(line, "supplier", "is required"));
        }
        let qty = parse_optional_quantity("qty", record.qty.as_deref()).map_err(|e| invalid(line, "qty", e))?;
        let price =
            parse_optional_money("price", record.price.as_deref()).map_err(|e| invalid(line, "price", e))?;

        offers.push(SupplierOffer {
            supplier: record.supplier,
            brand: record.brand,
            similar_pattern: record.similar_pattern,
            correct_specs: record.correct_specs,
            qty,
            price,
        });
    }

    Ok(offers)
}

pub fn load_supplier_offers_file(path: impl AsRef<Path>) -> ImportResult<Vec<SupplierOffer>> {
    let path = path.as_ref();
    let offers = load_supplier_offers(open(path)?)?;
    info!(path = %path.display(), count = offers.len(), "Loaded supplier offers");
    Ok(offers)
}

// =============================================================================
// Backend Exports
// =============================================================================

/// Loads the backend SKU export. Prices stay text; blank or duplicate
/// models reject the file.
pub fn load_sku_rows<R: Read>(input: R) -> ImportResult<Vec<SkuRow>> {
    let mut rows = Vec::new();
    let mut seen = HashSet::new();

    for (index, result) in reader(input).deserialize().enumerate() {
        let line = index + 2;
        let row: SkuRow = result.map_err(|e| csv_error(line, e))?;

        if row.model.is_empty() {
            return Err(invalid(line, "model", "is required"));
        }
        if !seen.insert(row.model.clone()) {
            return Err(invalid(line, "model", format!("duplicate '{}'", row.model)));
        }
        rows.push(row);
    }

    Ok(rows)
}

pub fn load_sku_rows_file(path: impl AsRef<Path>) -> ImportResult<Vec<SkuRow>> {
    let path = path.as_ref();
    let rows = load_sku_rows(open(path)?)?;
    info!(path = %path.display(), count = rows.len(), "Loaded backend SKU export");
    Ok(rows)
}

/// Loads the competitor price grid: a `model` column, then one column per
/// competitor. Each non-blank cell becomes one [`CompetitorRow`].
pub fn load_competitor_rows<R: Read>(input: R) -> ImportResult<Vec<CompetitorRow>> {
    let mut csv = reader(input);
    let headers = csv.headers().map_err(|e| csv_error(1, e))?.clone();

    let model_col = headers
        .iter()
        .position(|h| h == "model")
        .ok_or_else(|| invalid(1, "model", "column is missing"))?;

    let mut rows = Vec::new();
    let mut seen = HashSet::new();

    for (index, result) in csv.records().enumerate() {
        let line = index + 2;
        let record = result.map_err(|e| csv_error(line, e))?;

        let model = record.get(model_col).unwrap_or_default();
        if model.is_empty() {
            return Err(invalid(line, "model", "is required"));
        }
        if !seen.insert(model.to_string()) {
            return Err(invalid(line, "model", format!("duplicate '{}'", model)));
        }

        for (col, competitor) in headers.iter().enumerate() {
            if col == model_col || competitor.is_empty() {
                continue;
            }
            match record.get(col) {
                Some(price) if !price.is_empty() => rows.push(CompetitorRow::new(model, competitor, Some(price))),
                _ => {}
            }
        }
    }

    Ok(rows)
}

pub fn load_competitor_rows_file(path: impl AsRef<Path>) -> ImportResult<Vec<CompetitorRow>> {
    let path = path.as_ref();
    let rows = load_competitor_rows(open(path)?)?;
    info!(path = %path.display(), count = rows.len(), "Loaded competitor prices");
    Ok(rows)
}

// =============================================================================
// Unit Tests
// =============================================================================
