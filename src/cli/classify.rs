//! `classify` subcommand - segment and expected income of a new customer

use anyhow::{Context, Result};
use log::debug;

use crate::pipeline::{classify_and_estimate, load_records, CustomerGroupTable, EstimatorConfig, PersonaKey};
use crate::report::display_estimate;

/// How the customer to classify was described on the command line
#[derive(Debug, Clone, PartialEq)]
pub enum PersonaQuery {
    /// A ready composite key, matched exactly
    Key(String),
    /// Loose attributes turned into a key with the configured age policy
    Attributes(PersonaKey),
}

impl PersonaQuery {
    pub fn resolve_key(&self, config: &EstimatorConfig) -> Result<String> {
        match self {
            PersonaQuery::Key(key) => Ok(key.clone()),
            PersonaQuery::Attributes(persona) => persona
                .to_key(config.age_policy)
                .context("Cannot build a persona key from the given attributes"),
        }
    }
}

/// Build the table from the dataset and classify one persona
pub fn run_classify(config: &EstimatorConfig, query: &PersonaQuery, json: bool) -> Result<()> {
    let key = query.resolve_key(config)?;
    debug!("Classifying persona {}", key);

    let records = load_records(&config.input, config.infer_schema_length)?;
    let table = CustomerGroupTable::build(&records, config.age_policy)
        .context("Failed to build persona table")?;

    let estimate = classify_and_estimate(&table, &key)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&estimate).context("Failed to serialize estimate")?
        );
    } else {
        display_estimate(&estimate);
    }

    Ok(())
}
