//! Run configuration shared by the CLI subcommands

use std::path::PathBuf;

use super::record::AgePolicy;

/// Default number of rows used for CSV schema inference
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10_000;

/// Default number of ranked groups shown in the terminal
pub const DEFAULT_TOP_GROUPS: usize = 20;

/// Settings for loading a dataset and building the segment table
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    pub input: PathBuf,
    pub age_policy: AgePolicy,
    /// Rows used for CSV schema inference, 0 for a full scan
    pub infer_schema_length: usize,
    pub top_groups: usize,
}

impl EstimatorConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            age_policy: AgePolicy::default(),
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
            top_groups: DEFAULT_TOP_GROUPS,
        }
    }

    pub fn with_age_policy(mut self, policy: AgePolicy) -> Self {
        self.age_policy = policy;
        self
    }

    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }

    pub fn with_top_groups(mut self, n: usize) -> Self {
        self.top_groups = n;
        self
    }
}
