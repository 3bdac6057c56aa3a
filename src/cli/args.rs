//! Command-line argument definitions using clap

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::pipeline::{AgePolicy, EstimatorConfig, DEFAULT_INFER_SCHEMA_LENGTH};

/// Persona - Segment customers by demographics and estimate their expected revenue
#[derive(Parser, Debug)]
#[command(name = "persona")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v for debug, -vv for trace).
    /// RUST_LOG takes precedence when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value_t = DEFAULT_INFER_SCHEMA_LENGTH, global = true)]
    pub infer_schema_length: usize,
}

/// Dataset and age handling shared by the table-building subcommands
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Input file path (CSV or Parquet) with price, platform/source, sex, country and age columns
    #[arg(short, long)]
    pub input: PathBuf,

    /// How to treat ages outside (0, 70].
    /// Options: "reject" (fail, default) or "unclassified" (group as UNCLASSIFIED)
    #[arg(long, default_value = "reject")]
    pub age_policy: AgePolicy,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the persona table, assign A-D segments and export the result
    Segment {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Output file path (CSV or Parquet, determined by extension).
        /// Defaults to input directory with '_segments' suffix (e.g., persona.csv → persona_segments.csv).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also export the table and segment summary as JSON next to the input
        #[arg(long, default_value = "false")]
        export_json: bool,

        /// Number of top-ranked personas to display
        #[arg(long, default_value = "20", value_parser = validate_top)]
        top: usize,

        /// Overwrite existing output files without asking
        #[arg(long, default_value = "false")]
        no_confirm: bool,
    },

    /// Classify a new customer and estimate their expected income
    Classify {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Composite persona key, e.g. TUR_ANDROID_FEMALE_YOUNG (case-sensitive)
        #[arg(short, long, conflicts_with_all = ["country", "platform", "sex", "age"])]
        key: Option<String>,

        /// Customer country (used with --platform, --sex and --age instead of --key)
        #[arg(long, required_unless_present = "key")]
        country: Option<String>,

        /// Customer platform, e.g. android or ios
        #[arg(long, required_unless_present = "key")]
        platform: Option<String>,

        /// Customer sex
        #[arg(long, required_unless_present = "key")]
        sex: Option<String>,

        /// Customer age in years
        #[arg(long, required_unless_present = "key")]
        age: Option<i64>,

        /// Print the estimate as JSON instead of a table
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Show descriptive statistics of a purchase dataset
    Profile {
        /// Input file path (CSV or Parquet)
        #[arg(short, long)]
        input: PathBuf,
    },
}

impl DatasetArgs {
    /// Convert into the library configuration
    pub fn to_config(&self, infer_schema_length: usize) -> EstimatorConfig {
        EstimatorConfig::new(&self.input)
            .with_age_policy(self.age_policy)
            .with_infer_schema_length(infer_schema_length)
    }
}

/// Get the table output path, deriving from input if not explicitly provided.
/// The derived path will be in the same directory as the input with a '_segments' suffix.
pub fn segments_output_path(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => {
            let extension = input
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("csv");
            sibling_path(input, &format!("_segments.{}", extension))
        }
    }
}

/// Get the JSON export path, derived from the input file.
pub fn segments_json_path(input: &Path) -> PathBuf {
    sibling_path(input, "_segments.json")
}

fn sibling_path(input: &Path, suffix: &str) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    parent.join(format!("{}{}", stem, suffix))
}

/// Validator for the top parameter
fn validate_top(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;

    if value == 0 {
        Err("top must be at least 1".to_string())
    } else {
        Ok(value)
    }
}
