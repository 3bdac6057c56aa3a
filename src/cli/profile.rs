//! `profile` subcommand - descriptive statistics of the raw purchases

use std::path::Path;

use anyhow::{Context, Result};

use crate::pipeline::{load_records_with_progress, profile_records};
use crate::report::display_profile;

pub fn run_profile(input: &Path, infer_schema_length: usize) -> Result<()> {
    let (records, _rows, _memory_mb) = load_records_with_progress(input, infer_schema_length)?;
    let profile = profile_records(&records).context("Failed to profile dataset")?;
    display_profile(&profile);
    Ok(())
}
