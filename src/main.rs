//! Persona: Customer Segmentation CLI Tool
//!
//! A command-line tool for grouping customers into demographic personas,
//! segmenting them by expected revenue and classifying new customers.

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use persona::cli::{
    classify::run_classify, profile::run_profile, segment::run_segment, segments_json_path,
    segments_output_path, Cli, Commands, PersonaQuery,
};
use persona::pipeline::PersonaKey;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Segment {
            dataset,
            output,
            export_json,
            top,
            no_confirm,
        } => {
            let config = dataset
                .to_config(cli.infer_schema_length)
                .with_top_groups(*top);
            let output_path = segments_output_path(&dataset.input, output.as_deref());
            let json_path = export_json.then(|| segments_json_path(&dataset.input));
            run_segment(&config, &output_path, json_path.as_deref(), *no_confirm)
        }
        Commands::Classify {
            dataset,
            key,
            country,
            platform,
            sex,
            age,
            json,
        } => {
            let config = dataset.to_config(cli.infer_schema_length);
            let query = match (key, country, platform, sex, age) {
                (Some(key), ..) => PersonaQuery::Key(key.clone()),
                (None, Some(country), Some(platform), Some(sex), Some(age)) => {
                    PersonaQuery::Attributes(PersonaKey::new(country, platform, sex, *age))
                }
                _ => anyhow::bail!(
                    "Provide either --key or all of --country, --platform, --sex and --age"
                ),
            };
            run_classify(&config, &query, *json)
        }
        Commands::Profile { input } => run_profile(input, cli.infer_schema_length),
    }
}

/// Log to stderr; `-v` raises the level, RUST_LOG overrides it
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
