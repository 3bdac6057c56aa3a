//! Descriptive statistics over raw purchase records

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::error::{SegmentError, SegmentResult};
use super::record::RawRecord;

/// Sales count, revenue and mean price for one attribute value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueStats {
    pub value: String,
    pub sales: usize,
    pub revenue: f64,
    pub mean_price: f64,
}

/// Overview of a purchase dataset before segmentation
#[derive(Debug, Clone, Serialize)]
pub struct DatasetProfile {
    pub records: usize,
    pub distinct_countries: usize,
    pub distinct_platforms: usize,
    pub distinct_sexes: usize,
    pub distinct_ages: usize,
    pub distinct_prices: usize,
    pub min_price: f64,
    pub max_price: f64,
    pub mean_price: f64,
    pub total_revenue: f64,
    /// Sorted by sales descending
    pub by_country: Vec<ValueStats>,
    pub by_platform: Vec<ValueStats>,
    /// Keyed as `COUNTRY/PLATFORM`
    pub by_country_platform: Vec<ValueStats>,
    /// Number of sales per distinct price point, sorted by sales descending
    pub by_price: Vec<(String, usize)>,
}

/// Compute descriptive statistics for a record set.
///
/// Attribute values are upper-cased so `tur` and `TUR` count together.
pub fn profile_records(records: &[RawRecord]) -> SegmentResult<DatasetProfile> {
    if records.is_empty() {
        return Err(SegmentError::EmptyDataset);
    }

    let total_revenue: f64 = records.iter().map(|r| r.price).sum();
    let min_price = records.iter().map(|r| r.price).fold(f64::INFINITY, f64::min);
    let max_price = records.iter().map(|r| r.price).fold(f64::NEG_INFINITY, f64::max);

    let mut price_counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        *price_counts.entry(format_price(record.price)).or_default() += 1;
    }
    let mut by_price: Vec<(String, usize)> = price_counts.into_iter().collect();
    by_price.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Ok(DatasetProfile {
        records: records.len(),
        distinct_countries: distinct_count(records, |r| r.country.trim().to_uppercase()),
        distinct_platforms: distinct_count(records, |r| r.platform.trim().to_uppercase()),
        distinct_sexes: distinct_count(records, |r| r.sex.trim().to_uppercase()),
        distinct_ages: distinct_count(records, |r| r.age.to_string()),
        distinct_prices: by_price.len(),
        min_price,
        max_price,
        mean_price: total_revenue / records.len() as f64,
        total_revenue,
        by_country: value_stats(records, |r| r.country.trim().to_uppercase()),
        by_platform: value_stats(records, |r| r.platform.trim().to_uppercase()),
        by_country_platform: value_stats(records, |r| {
            format!(
                "{}/{}",
                r.country.trim().to_uppercase(),
                r.platform.trim().to_uppercase()
            )
        }),
        by_price,
    })
}

fn distinct_count<F>(records: &[RawRecord], key_fn: F) -> usize
where
    F: Fn(&RawRecord) -> String,
{
    records.iter().map(key_fn).collect::<BTreeSet<_>>().len()
}

fn value_stats<F>(records: &[RawRecord], key_fn: F) -> Vec<ValueStats>
where
    F: Fn(&RawRecord) -> String,
{
    let mut acc: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for record in records {
        let entry = acc.entry(key_fn(record)).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += record.price;
    }

    let mut stats: Vec<ValueStats> = acc
        .into_iter()
        .map(|(value, (sales, revenue))| ValueStats {
            value,
            sales,
            revenue,
            mean_price: revenue / sales as f64,
        })
        .collect();
    stats.sort_by(|a, b| b.sales.cmp(&a.sales).then_with(|| a.value.cmp(&b.value)));
    stats
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{:.0}", price)
    } else {
        format!("{}", price)
    }
}
