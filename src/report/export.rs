//! Export of segmentation results to JSON, CSV and Parquet

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::{AgePolicy, CustomerGroup, CustomerGroupTable, SegmentStats};

/// Name of the key column, kept from the customers-level-based convention
pub const KEY_COLUMN: &str = "customers_level_based";

/// Metadata about the segmentation run
#[derive(Serialize)]
pub struct ExportMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub persona_version: String,
    pub input_file: String,
    pub age_policy: AgePolicy,
    pub records: usize,
    pub groups: usize,
}

/// Complete segmentation export
#[derive(Serialize)]
pub struct SegmentationExport<'a> {
    pub metadata: ExportMetadata,
    pub segments: Vec<SegmentStats>,
    /// Ranked by mean price, highest first
    pub groups: &'a [CustomerGroup],
}

/// Write the segment table and its summary to a JSON file
pub fn export_segmentation_json(
    table: &CustomerGroupTable,
    input_file: &str,
    records: usize,
    output_path: &Path,
) -> Result<()> {
    let export = SegmentationExport {
        metadata: ExportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            persona_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.to_string(),
            age_policy: table.age_policy(),
            records,
            groups: table.len(),
        },
        segments: table.segment_stats(),
        groups: table.groups(),
    };

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize segmentation to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write segmentation to {}", output_path.display()))?;

    Ok(())
}

/// Convert the ranked groups into a data frame
pub fn groups_to_dataframe(groups: &[CustomerGroup]) -> PolarsResult<DataFrame> {
    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
    let countries: Vec<&str> = groups.iter().map(|g| g.country.as_str()).collect();
    let platforms: Vec<&str> = groups.iter().map(|g| g.platform.as_str()).collect();
    let sexes: Vec<&str> = groups.iter().map(|g| g.sex.as_str()).collect();
    let age_classes: Vec<&str> = groups.iter().map(|g| g.age_class.label()).collect();
    let prices: Vec<f64> = groups.iter().map(|g| g.mean_price).collect();
    let records: Vec<u64> = groups.iter().map(|g| g.records as u64).collect();
    let segments: Vec<String> = groups.iter().map(|g| g.segment.to_string()).collect();

    DataFrame::new(vec![
        Column::new(KEY_COLUMN.into(), keys),
        Column::new("country".into(), countries),
        Column::new("platform".into(), platforms),
        Column::new("sex".into(), sexes),
        Column::new("age_class".into(), age_classes),
        Column::new("price".into(), prices),
        Column::new("records".into(), records),
        Column::new("segment".into(), segments),
    ])
}

/// Save the ranked groups to CSV or Parquet, chosen by extension
pub fn save_groups(groups: &[CustomerGroup], path: &Path) -> Result<()> {
    let mut df = groups_to_dataframe(groups).context("Failed to build output table")?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(&mut df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(&mut df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        _ => anyhow::bail!(
            "Unsupported output format: {}. Supported formats: csv, parquet",
            extension
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RawRecord;
    use tempfile::TempDir;

    fn table() -> CustomerGroupTable {
        let records = vec![
            RawRecord::new("tur", "android", "female", 33, 100.0),
            RawRecord::new("tur", "android", "female", 34, 200.0),
            RawRecord::new("bra", "ios", "male", 17, 40.0),
        ];
        CustomerGroupTable::build(&records, AgePolicy::Reject).unwrap()
    }

    #[test]
    fn test_groups_to_dataframe_shape() {
        let table = table();
        let df = groups_to_dataframe(table.groups()).unwrap();
        assert_eq!(df.shape(), (2, 8));
        let first = df.column(KEY_COLUMN).unwrap().str().unwrap().get(0);
        assert_eq!(first, Some("TUR_ANDROID_FEMALE_YOUNG"));
    }

    #[test]
    fn test_export_json_contains_metadata_and_groups() {
        let table = table();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("segments.json");

        export_segmentation_json(&table, "persona.csv", 3, &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["metadata"]["groups"], 2);
        assert_eq!(json["metadata"]["records"], 3);
        assert_eq!(json["metadata"]["age_policy"], "reject");
        assert_eq!(json["groups"][0]["key"], "TUR_ANDROID_FEMALE_YOUNG");
        assert_eq!(json["groups"][0]["age_class"], "YOUNG");
        assert_eq!(json["groups"][0]["mean_price"], 150.0);
    }

    #[test]
    fn test_save_groups_rejects_unknown_extension() {
        let table = table();
        let temp_dir = TempDir::new().unwrap();
        let result = save_groups(table.groups(), &temp_dir.path().join("out.xlsx"));
        assert!(result.is_err());
    }
}
