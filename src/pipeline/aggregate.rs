//! Aggregation of raw purchase records into persona groups

use std::collections::BTreeMap;

use log::{debug, warn};

use super::error::{SegmentError, SegmentResult};
use super::record::{build_key, classify_age, AgeClass, AgePolicy, RawRecord};

/// Grouping attributes of a persona, upper-cased
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonaAttributes {
    pub country: String,
    pub platform: String,
    pub sex: String,
    pub age_class: AgeClass,
}

impl PersonaAttributes {
    pub fn key(&self) -> String {
        build_key(&self.country, &self.platform, &self.sex, self.age_class)
    }
}

/// Aggregated purchases of one persona, before segmentation
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedGroup {
    pub key: String,
    pub attributes: PersonaAttributes,
    /// Number of raw records in the group
    pub records: usize,
    /// Sum of prices over the group
    pub revenue: f64,
    /// Arithmetic mean of prices over the group
    pub mean_price: f64,
}

#[derive(Default)]
struct Accumulator {
    records: usize,
    revenue: f64,
}

/// Group records by (country, platform, sex, age class) and average their prices.
///
/// Ages are bucketed before grouping so records that differ only in exact
/// age collapse into one group. Groups are returned in key order.
pub fn aggregate_records(
    records: &[RawRecord],
    policy: AgePolicy,
) -> SegmentResult<Vec<AggregatedGroup>> {
    if records.is_empty() {
        return Err(SegmentError::EmptyDataset);
    }

    let mut groups: BTreeMap<PersonaAttributes, Accumulator> = BTreeMap::new();
    let mut unclassified = 0usize;

    for (row, record) in records.iter().enumerate() {
        let age_class = classify_age(record.age, policy, row)?;
        if age_class == AgeClass::Unclassified {
            unclassified += 1;
        }

        let attributes = PersonaAttributes {
            country: record.country.trim().to_uppercase(),
            platform: record.platform.trim().to_uppercase(),
            sex: record.sex.trim().to_uppercase(),
            age_class,
        };

        let acc = groups.entry(attributes).or_default();
        acc.records += 1;
        acc.revenue += record.price;
    }

    if unclassified > 0 {
        warn!(
            "{} record(s) with age outside (0, 70] grouped as {}",
            unclassified,
            AgeClass::Unclassified
        );
    }

    let aggregated: Vec<AggregatedGroup> = groups
        .into_iter()
        .map(|(attributes, acc)| AggregatedGroup {
            key: attributes.key(),
            mean_price: acc.revenue / acc.records as f64,
            records: acc.records,
            revenue: acc.revenue,
            attributes,
        })
        .collect();

    debug!(
        "Aggregated {} record(s) into {} group(s)",
        records.len(),
        aggregated.len()
    );

    Ok(aggregated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_same_age_class_collapse() {
        let records = vec![
            RawRecord::new("tur", "android", "female", 33, 100.0),
            RawRecord::new("tur", "android", "female", 25, 200.0),
        ];
        let groups = aggregate_records(&records, AgePolicy::Reject).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "TUR_ANDROID_FEMALE_YOUNG");
        assert_eq!(groups[0].records, 2);
        assert!((groups[0].mean_price - 150.0).abs() < 1e-9);
        assert!((groups[0].revenue - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_case_differences_collapse() {
        let records = vec![
            RawRecord::new("TUR", "ANDROID", "FEMALE", 20, 10.0),
            RawRecord::new("tur", "android", "female", 21, 30.0),
        ];
        let groups = aggregate_records(&records, AgePolicy::Reject).unwrap();
        assert_eq!(groups.len(), 1);
        assert!((groups[0].mean_price - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_is_over_records_not_over_ages() {
        // Three purchases at age 20 and one at age 30: record-level mean is 25,
        // a mean of per-age means would be 30.
        let records = vec![
            RawRecord::new("bra", "ios", "male", 20, 20.0),
            RawRecord::new("bra", "ios", "male", 20, 20.0),
            RawRecord::new("bra", "ios", "male", 20, 20.0),
            RawRecord::new("bra", "ios", "male", 30, 40.0),
        ];
        let groups = aggregate_records(&records, AgePolicy::Reject).unwrap();
        assert_eq!(groups.len(), 1);
        assert!((groups[0].mean_price - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_age_rejected() {
        let records = vec![
            RawRecord::new("usa", "ios", "male", 30, 10.0),
            RawRecord::new("usa", "ios", "male", 75, 10.0),
        ];
        let result = aggregate_records(&records, AgePolicy::Reject);
        assert!(matches!(
            result,
            Err(SegmentError::AgeOutOfRange { row: 1, age: 75 })
        ));
    }

    #[test]
    fn test_out_of_range_age_kept_as_unclassified() {
        let records = vec![
            RawRecord::new("usa", "ios", "male", 30, 10.0),
            RawRecord::new("usa", "ios", "male", 75, 50.0),
        ];
        let groups = aggregate_records(&records, AgePolicy::Unclassified).unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().any(|g| g.key == "USA_IOS_MALE_UNCLASSIFIED"));
    }

    #[test]
    fn test_empty_records() {
        let result = aggregate_records(&[], AgePolicy::Reject);
        assert!(matches!(result, Err(SegmentError::EmptyDataset)));
    }
}
