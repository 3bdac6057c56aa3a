//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use persona::pipeline::RawRecord;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

/// Header used by the original persona dataset
pub const PERSONA_HEADER: &str = "PRICE,SOURCE,SEX,COUNTRY,AGE";

/// A small persona-style dataset with known group means
///
/// Groups (mean price):
/// - TUR_ANDROID_FEMALE_YOUNG: 100, 200 → 150
/// - BRA_ANDROID_MALE_CHILD: 39, 39, 49 → 42.33
/// - USA_IOS_MALE_MID-AGE: 29 → 29
/// - FRA_IOS_FEMALE_YOUNG: 59, 79 → 69
/// - DEU_ANDROID_FEMALE_UPPER-MID: 19 → 19
pub fn persona_rows() -> Vec<(f64, &'static str, &'static str, &'static str, i64)> {
    vec![
        (100.0, "android", "female", "tur", 33),
        (200.0, "android", "female", "tur", 25),
        (39.0, "android", "male", "bra", 17),
        (39.0, "android", "male", "bra", 15),
        (49.0, "android", "male", "bra", 18),
        (29.0, "ios", "male", "usa", 45),
        (59.0, "ios", "female", "fra", 35),
        (79.0, "ios", "female", "fra", 40),
        (19.0, "android", "female", "deu", 66),
    ]
}

/// The persona rows as typed records
pub fn persona_records() -> Vec<RawRecord> {
    persona_rows()
        .into_iter()
        .map(|(price, source, sex, country, age)| RawRecord::new(country, source, sex, age, price))
        .collect()
}

/// Write rows in the persona CSV layout into a temporary directory
pub fn write_persona_csv(
    rows: &[(f64, &str, &str, &str, i64)],
) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("persona.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "{}", PERSONA_HEADER).unwrap();
    for (price, source, sex, country, age) in rows {
        writeln!(file, "{},{},{},{},{}", price, source, sex, country, age).unwrap();
    }
    drop(file);

    (temp_dir, csv_path)
}

/// Write the persona rows as a Parquet file into a temporary directory
pub fn write_persona_parquet() -> (TempDir, PathBuf) {
    let rows = persona_rows();
    let mut df = df! {
        "price" => rows.iter().map(|r| r.0).collect::<Vec<f64>>(),
        "platform" => rows.iter().map(|r| r.1).collect::<Vec<&str>>(),
        "sex" => rows.iter().map(|r| r.2).collect::<Vec<&str>>(),
        "country" => rows.iter().map(|r| r.3).collect::<Vec<&str>>(),
        "age" => rows.iter().map(|r| r.4).collect::<Vec<i64>>(),
    }
    .unwrap();

    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("persona.parquet");
    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(&mut df).unwrap();

    (temp_dir, parquet_path)
}

/// Generate a random but reproducible record set
pub fn generate_records(n: usize, seed: u64) -> Vec<RawRecord> {
    const COUNTRIES: [&str; 6] = ["usa", "bra", "deu", "tur", "fra", "can"];
    const PLATFORMS: [&str; 2] = ["android", "ios"];
    const SEXES: [&str; 2] = ["male", "female"];
    const PRICES: [f64; 6] = [9.0, 19.0, 29.0, 39.0, 49.0, 59.0];

    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            RawRecord::new(
                COUNTRIES[rng.gen_range(0..COUNTRIES.len())],
                PLATFORMS[rng.gen_range(0..PLATFORMS.len())],
                SEXES[rng.gen_range(0..SEXES.len())],
                rng.gen_range(1..=70),
                PRICES[rng.gen_range(0..PRICES.len())],
            )
        })
        .collect()
}

/// Assert two floats are equal within a small tolerance
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "Expected {}, got {}",
        expected,
        actual
    );
}
