//! Segmented customer group table and classify-and-estimate lookup
//!
//! The table is built once from the full record set and is read-only
//! afterwards. Lookups never mutate it, so a built table can be shared
//! freely between readers.

use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use super::aggregate::{aggregate_records, PersonaAttributes};
use super::error::{SegmentError, SegmentResult};
use super::record::{build_key, classify_age, AgeClass, AgePolicy, RawRecord, KEY_SEPARATOR};
use super::segment::{assign_quartile_segments, Segment};

/// Maximum number of suggestions attached to a `NotFound` error
const MAX_SUGGESTIONS: usize = 3;

/// One persona row: aggregated demographics, mean price and segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerGroup {
    /// Composite key, e.g. `TUR_ANDROID_FEMALE_YOUNG`
    pub key: String,
    pub country: String,
    pub platform: String,
    pub sex: String,
    pub age_class: AgeClass,
    /// Arithmetic mean of price over the group's records
    pub mean_price: f64,
    /// Number of raw records in the group
    pub records: usize,
    /// Sum of prices over the group's records
    pub revenue: f64,
    pub segment: Segment,
}

/// Result of classifying a persona
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub key: String,
    pub segment: Segment,
    /// Expected revenue per purchase (the group's mean price)
    pub estimated_income: f64,
    /// Number of records backing the estimate
    pub records: usize,
}

/// Summary of one segment over the groups' mean prices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentStats {
    pub segment: Segment,
    pub groups: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
}

/// Immutable table of segmented customer groups
#[derive(Debug, Clone)]
pub struct CustomerGroupTable {
    /// Groups sorted by mean price descending, key ascending on ties
    groups: Vec<CustomerGroup>,
    index: HashMap<String, usize>,
    policy: AgePolicy,
}

impl CustomerGroupTable {
    /// Aggregate, rank and segment the full record set.
    pub fn build(records: &[RawRecord], policy: AgePolicy) -> SegmentResult<Self> {
        let aggregated = aggregate_records(records, policy)?;

        let pairs: Vec<(&str, f64)> = aggregated
            .iter()
            .map(|g| (g.key.as_str(), g.mean_price))
            .collect();
        let segments = assign_quartile_segments(&pairs);

        let mut groups: Vec<CustomerGroup> = aggregated
            .into_iter()
            .zip(segments)
            .map(|(g, segment)| {
                let PersonaAttributes {
                    country,
                    platform,
                    sex,
                    age_class,
                } = g.attributes;
                CustomerGroup {
                    key: g.key,
                    country,
                    platform,
                    sex,
                    age_class,
                    mean_price: g.mean_price,
                    records: g.records,
                    revenue: g.revenue,
                    segment,
                }
            })
            .collect();

        groups.sort_by(|a, b| {
            b.mean_price
                .total_cmp(&a.mean_price)
                .then_with(|| a.key.cmp(&b.key))
        });

        let index = groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.key.clone(), i))
            .collect();

        debug!("Built segment table with {} group(s)", groups.len());

        Ok(Self {
            groups,
            index,
            policy,
        })
    }

    /// Groups ranked by mean price, highest first
    pub fn groups(&self) -> &[CustomerGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Age policy the table was built with
    pub fn age_policy(&self) -> AgePolicy {
        self.policy
    }

    pub fn get(&self, key: &str) -> Option<&CustomerGroup> {
        self.index.get(key).map(|&i| &self.groups[i])
    }

    /// The `n` highest-paying groups
    pub fn top(&self, n: usize) -> &[CustomerGroup] {
        &self.groups[..n.min(self.groups.len())]
    }

    /// Groups belonging to one segment, highest mean price first
    pub fn in_segment(&self, segment: Segment) -> impl Iterator<Item = &CustomerGroup> {
        self.groups.iter().filter(move |g| g.segment == segment)
    }

    /// Per-segment mean/min/max/sum of mean prices, highest segment first.
    /// Segments without groups are omitted.
    pub fn segment_stats(&self) -> Vec<SegmentStats> {
        Segment::ASCENDING
            .iter()
            .rev()
            .filter_map(|&segment| {
                let prices: Vec<f64> = self.in_segment(segment).map(|g| g.mean_price).collect();
                if prices.is_empty() {
                    return None;
                }
                let sum: f64 = prices.iter().sum();
                Some(SegmentStats {
                    segment,
                    groups: prices.len(),
                    mean: sum / prices.len() as f64,
                    min: prices.iter().copied().fold(f64::INFINITY, f64::min),
                    max: prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    sum,
                })
            })
            .collect()
    }

    /// Known keys sharing the country/platform prefix of `key`
    fn suggestions_for(&self, key: &str) -> Vec<String> {
        let prefix: Vec<&str> = key.splitn(3, KEY_SEPARATOR).take(2).collect();
        if prefix.len() < 2 {
            return Vec::new();
        }
        let prefix = format!("{}{}{}{}", prefix[0], KEY_SEPARATOR, prefix[1], KEY_SEPARATOR);

        let mut matches: Vec<&str> = self
            .groups
            .iter()
            .map(|g| g.key.as_str())
            .filter(|k| k.starts_with(&prefix))
            .collect();
        matches.sort_unstable();
        matches
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(String::from)
            .collect()
    }
}

/// Classify a persona key and estimate its expected income.
///
/// Matching is exact and case-sensitive against the upper-case key. Keys
/// never observed in the data fail with [`SegmentError::NotFound`].
pub fn classify_and_estimate(table: &CustomerGroupTable, key: &str) -> SegmentResult<Estimate> {
    let group = table.get(key).ok_or_else(|| SegmentError::NotFound {
        key: key.to_string(),
        suggestions: table.suggestions_for(key),
    })?;

    Ok(Estimate {
        key: group.key.clone(),
        segment: group.segment,
        estimated_income: group.mean_price,
        records: group.records,
    })
}

/// Loose description of a new customer, turned into a composite key
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaKey {
    pub country: String,
    pub platform: String,
    pub sex: String,
    pub age: i64,
}

impl PersonaKey {
    pub fn new(
        country: impl Into<String>,
        platform: impl Into<String>,
        sex: impl Into<String>,
        age: i64,
    ) -> Self {
        Self {
            country: country.into(),
            platform: platform.into(),
            sex: sex.into(),
            age,
        }
    }

    /// Build the composite key, bucketing the age under `policy`.
    pub fn to_key(&self, policy: AgePolicy) -> SegmentResult<String> {
        let age_class = classify_age(self.age, policy, 0)
            .map_err(|_| SegmentError::QueryAgeOutOfRange { age: self.age })?;
        Ok(build_key(&self.country, &self.platform, &self.sex, age_class))
    }
}
