//! Dataset loader for CSV and Parquet purchase files
//!
//! Loading goes through polars; the loaded frame is then validated and
//! converted into typed [`RawRecord`]s.

use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use polars::prelude::*;

use super::error::{SegmentError, SegmentResult};
use super::record::{RawRecord, KEY_SEPARATOR};
use crate::utils::{create_spinner, finish_with_success};

/// Accepted header names per field, matched case-insensitively
const COUNTRY_COLUMNS: &[&str] = &["country"];
const PLATFORM_COLUMNS: &[&str] = &["platform", "source"];
const SEX_COLUMNS: &[&str] = &["sex"];
const AGE_COLUMNS: &[&str] = &["age"];
const PRICE_COLUMNS: &[&str] = &["price"];

/// Actual header names of the five required columns in a loaded frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub country: String,
    pub platform: String,
    pub sex: String,
    pub age: String,
    pub price: String,
}

/// Load a dataset from a file (CSV or Parquet based on extension)
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    // 0 means full table scan
    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_length)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    let df = lf
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;
    debug!("Loaded {} rows x {} columns from {}", df.height(), df.width(), path.display());
    Ok(df)
}

/// Load and validate purchase records, showing a spinner while reading.
///
/// Returns the records together with the number of rows and the estimated
/// in-memory size of the frame in MB.
pub fn load_records_with_progress(
    path: &Path,
    infer_schema_length: usize,
) -> Result<(Vec<RawRecord>, usize, f64)> {
    let spinner = create_spinner("Loading dataset...");
    let df = load_dataset(path, infer_schema_length)?;
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);

    let records = records_from_dataframe(&df)
        .with_context(|| format!("Invalid purchase data in {}", path.display()))?;
    finish_with_success(&spinner, &format!("Loaded {} purchase record(s)", records.len()));

    Ok((records, df.height(), memory_mb))
}

/// Load and validate purchase records without any terminal output
pub fn load_records(path: &Path, infer_schema_length: usize) -> Result<Vec<RawRecord>> {
    let df = load_dataset(path, infer_schema_length)?;
    records_from_dataframe(&df)
        .with_context(|| format!("Invalid purchase data in {}", path.display()))
}

/// Find the required columns in a frame, ignoring header case.
///
/// `SOURCE` is accepted for the platform column.
pub fn resolve_columns(df: &DataFrame) -> SegmentResult<ColumnMap> {
    let available: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let find = |candidates: &[&str]| -> SegmentResult<String> {
        candidates
            .iter()
            .find_map(|candidate| {
                available
                    .iter()
                    .find(|name| name.trim().eq_ignore_ascii_case(candidate))
                    .cloned()
            })
            .ok_or_else(|| SegmentError::MissingColumn {
                column: candidates[0].to_string(),
                available: available.clone(),
            })
    };

    Ok(ColumnMap {
        country: find(COUNTRY_COLUMNS)?,
        platform: find(PLATFORM_COLUMNS)?,
        sex: find(SEX_COLUMNS)?,
        age: find(AGE_COLUMNS)?,
        price: find(PRICE_COLUMNS)?,
    })
}

/// Convert a loaded frame into validated records.
///
/// Fails on the first null, empty attribute, attribute containing the key
/// separator, or negative / non-finite price.
pub fn records_from_dataframe(df: &DataFrame) -> SegmentResult<Vec<RawRecord>> {
    if df.height() == 0 {
        return Err(SegmentError::EmptyDataset);
    }

    let columns = resolve_columns(df)?;

    let countries = string_values(df, &columns.country)?;
    let platforms = string_values(df, &columns.platform)?;
    let sexes = string_values(df, &columns.sex)?;

    // Read ages as floats so fractional values are caught instead of truncated
    let ages = df.column(&columns.age)?.cast(&DataType::Float64)?;
    let ages = ages.f64()?;
    let prices = df.column(&columns.price)?.cast(&DataType::Float64)?;
    let prices = prices.f64()?;

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let country = require_attribute(&countries[row], &columns.country, row)?;
        let platform = require_attribute(&platforms[row], &columns.platform, row)?;
        let sex = require_attribute(&sexes[row], &columns.sex, row)?;

        let age = ages
            .get(row)
            .ok_or_else(|| invalid(&columns.age, row, "missing or non-numeric age"))?;
        if !age.is_finite() || age.fract() != 0.0 {
            return Err(invalid(
                &columns.age,
                row,
                &format!("age must be a whole number of years, got {}", age),
            ));
        }
        let age = age as i64;

        let price = prices
            .get(row)
            .ok_or_else(|| invalid(&columns.price, row, "missing or non-numeric price"))?;
        if !price.is_finite() || price < 0.0 {
            return Err(invalid(
                &columns.price,
                row,
                &format!("price must be a finite non-negative number, got {}", price),
            ));
        }

        records.push(RawRecord {
            country,
            platform,
            sex,
            age,
            price,
        });
    }

    Ok(records)
}

/// Read a column as optional strings, casting non-string types
fn string_values(df: &DataFrame, name: &str) -> SegmentResult<Vec<Option<String>>> {
    let col = df.column(name)?;
    let cast = col.cast(&DataType::String)?;
    let values = cast
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect();
    Ok(values)
}

fn require_attribute(value: &Option<String>, column: &str, row: usize) -> SegmentResult<String> {
    let value = value
        .as_deref()
        .map(str::trim)
        .ok_or_else(|| invalid(column, row, "missing value"))?;

    if value.is_empty() {
        return Err(invalid(column, row, "empty value"));
    }
    if value.contains(KEY_SEPARATOR) {
        return Err(invalid(
            column,
            row,
            &format!("'{}' contains the key separator '{}'", value, KEY_SEPARATOR),
        ));
    }
    Ok(value.to_string())
}

fn invalid(column: &str, row: usize, message: &str) -> SegmentError {
    SegmentError::InvalidValue {
        column: column.to_string(),
        row,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_columns_accepts_source_alias_and_case() {
        let df = df! {
            "PRICE" => [39i64],
            "SOURCE" => ["android"],
            "SEX" => ["male"],
            "COUNTRY" => ["bra"],
            "AGE" => [17i64],
        }
        .unwrap();

        let columns = resolve_columns(&df).unwrap();
        assert_eq!(columns.platform, "SOURCE");
        assert_eq!(columns.price, "PRICE");
    }

    #[test]
    fn test_resolve_columns_missing() {
        let df = df! {
            "price" => [39i64],
            "platform" => ["android"],
            "country" => ["bra"],
            "age" => [17i64],
        }
        .unwrap();

        match resolve_columns(&df) {
            Err(SegmentError::MissingColumn { column, .. }) => assert_eq!(column, "sex"),
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_records_from_dataframe() {
        let df = df! {
            "price" => [39i64, 49],
            "source" => ["android", "ios"],
            "sex" => ["male", "female"],
            "country" => ["bra", "tur"],
            "age" => [17i64, 33],
        }
        .unwrap();

        let records = records_from_dataframe(&df).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], RawRecord::new("tur", "ios", "female", 33, 49.0));
    }

    #[test]
    fn test_records_reject_null_age() {
        let df = df! {
            "price" => [39i64, 49],
            "platform" => ["android", "ios"],
            "sex" => ["male", "female"],
            "country" => ["bra", "tur"],
            "age" => [Some(17i64), None],
        }
        .unwrap();

        match records_from_dataframe(&df) {
            Err(SegmentError::InvalidValue { column, row, .. }) => {
                assert_eq!(column, "age");
                assert_eq!(row, 1);
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_records_reject_fractional_age() {
        let df = df! {
            "price" => [39i64, 49],
            "platform" => ["android", "ios"],
            "sex" => ["male", "female"],
            "country" => ["bra", "tur"],
            "age" => [17.0f64, 70.9],
        }
        .unwrap();

        match records_from_dataframe(&df) {
            Err(SegmentError::InvalidValue { column, row, message }) => {
                assert_eq!(column, "age");
                assert_eq!(row, 1);
                assert!(message.contains("70.9"));
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_records_accept_whole_float_age() {
        let df = df! {
            "price" => [39i64],
            "platform" => ["android"],
            "sex" => ["male"],
            "country" => ["bra"],
            "age" => [18.0f64],
        }
        .unwrap();

        let records = records_from_dataframe(&df).unwrap();
        assert_eq!(records[0].age, 18);
    }

    #[test]
    fn test_records_reject_separator_in_attribute() {
        let df = df! {
            "price" => [39i64],
            "platform" => ["smart_tv"],
            "sex" => ["male"],
            "country" => ["bra"],
            "age" => [17i64],
        }
        .unwrap();

        assert!(matches!(
            records_from_dataframe(&df),
            Err(SegmentError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_records_reject_negative_price() {
        let df = df! {
            "price" => [-1.0f64],
            "platform" => ["ios"],
            "sex" => ["male"],
            "country" => ["bra"],
            "age" => [17i64],
        }
        .unwrap();

        assert!(matches!(
            records_from_dataframe(&df),
            Err(SegmentError::InvalidValue { .. })
        ));
    }
}
