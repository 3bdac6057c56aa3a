//! `segment` subcommand - build, rank, segment and export the persona table

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use console::style;
use log::info;

use super::prompts::confirm_overwrite;
use crate::pipeline::{CustomerGroupTable, EstimatorConfig, SEGMENT_COUNT};
use crate::report::{display_segmentation, export_segmentation_json, save_groups};
use crate::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
};

/// Run the full segmentation pipeline
///
/// # Arguments
/// * `config` - Input path, age policy and display settings
/// * `output_path` - Where to write the ranked table (CSV or Parquet)
/// * `json_path` - Optional JSON export path
/// * `no_confirm` - Overwrite existing outputs without asking
pub fn run_segment(
    config: &EstimatorConfig,
    output_path: &Path,
    json_path: Option<&Path>,
    no_confirm: bool,
) -> Result<()> {
    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &config.input,
        Some(output_path),
        &config.age_policy.to_string(),
    );

    // Step 1: Load dataset
    print_step_header(1, "Load Purchases");
    let step_start = Instant::now();
    let (records, rows, memory_mb) =
        crate::pipeline::load_records_with_progress(&config.input, config.infer_schema_length)?;

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Estimated memory: {:.2} MB", memory_mb);
    print_step_time(step_start.elapsed());

    // Step 2: Aggregate and segment
    print_step_header(2, "Aggregate & Segment");
    let step_start = Instant::now();
    let spinner = create_spinner("Grouping personas...");
    let table = CustomerGroupTable::build(&records, config.age_policy)
        .context("Failed to build persona table")?;

    if table.len() < SEGMENT_COUNT {
        finish_with_warning(
            &spinner,
            &format!(
                "Only {} persona(s) found, some segments will be empty",
                table.len()
            ),
        );
    } else {
        finish_with_success(&spinner, "Personas segmented");
    }
    print_count(
        "persona(s)",
        table.len(),
        Some(&format!("from {} record(s)", records.len())),
    );
    info!(
        "Segmented {} records into {} personas",
        records.len(),
        table.len()
    );
    print_step_time(step_start.elapsed());

    // Step 3: Report
    print_step_header(3, "Ranking");
    let stats = table.segment_stats();
    display_segmentation(table.top(config.top_groups), table.len(), &stats);

    // Step 4: Save output
    print_step_header(4, "Save Results");
    let step_start = Instant::now();
    save_if_confirmed(output_path, no_confirm, |path| {
        save_groups(table.groups(), path)
    })?;

    if let Some(json_path) = json_path {
        let input_file = config.input.display().to_string();
        save_if_confirmed(json_path, no_confirm, |path| {
            export_segmentation_json(&table, &input_file, records.len(), path)
        })?;
    }
    print_step_time(step_start.elapsed());

    print_completion();
    Ok(())
}

fn save_if_confirmed<F>(path: &Path, no_confirm: bool, save: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    if !confirm_overwrite(path, no_confirm)? {
        print_info(&format!("Skipped {}", path.display()));
        return Ok(());
    }

    let spinner = create_spinner("Writing output file...");
    save(path)?;
    finish_with_success(&spinner, &format!("Saved to {}", path.display()));
    print_success("Output written");
    Ok(())
}
