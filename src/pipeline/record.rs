//! Typed purchase records and age classification

use serde::{Deserialize, Serialize};

use super::error::{SegmentError, SegmentResult};

/// Separator used when joining key components
pub const KEY_SEPARATOR: char = '_';

/// Upper bounds (inclusive) of the age classes, lower bound of the first class is 0 (exclusive)
const AGE_BREAKPOINTS: [(i64, AgeClass); 4] = [
    (18, AgeClass::Child),
    (40, AgeClass::Young),
    (55, AgeClass::MidAge),
    (70, AgeClass::UpperMid),
];

/// A single purchase transaction with the customer's demographics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub country: String,
    pub platform: String,
    pub sex: String,
    pub age: i64,
    pub price: f64,
}

impl RawRecord {
    pub fn new(
        country: impl Into<String>,
        platform: impl Into<String>,
        sex: impl Into<String>,
        age: i64,
        price: f64,
    ) -> Self {
        Self {
            country: country.into(),
            platform: platform.into(),
            sex: sex.into(),
            age,
            price,
        }
    }
}

/// Categorical age bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeClass {
    /// (0, 18]
    #[serde(rename = "CHILD")]
    Child,
    /// (18, 40]
    #[serde(rename = "YOUNG")]
    Young,
    /// (40, 55]
    #[serde(rename = "MID-AGE")]
    MidAge,
    /// (55, 70]
    #[serde(rename = "UPPER-MID")]
    UpperMid,
    /// Outside (0, 70], only produced under [`AgePolicy::Unclassified`]
    #[serde(rename = "UNCLASSIFIED")]
    Unclassified,
}

impl AgeClass {
    pub fn label(&self) -> &'static str {
        match self {
            AgeClass::Child => "CHILD",
            AgeClass::Young => "YOUNG",
            AgeClass::MidAge => "MID-AGE",
            AgeClass::UpperMid => "UPPER-MID",
            AgeClass::Unclassified => "UNCLASSIFIED",
        }
    }

    /// Bucket an age, returning `None` when it lies outside (0, 70].
    pub fn from_age(age: i64) -> Option<AgeClass> {
        if age <= 0 {
            return None;
        }
        AGE_BREAKPOINTS
            .iter()
            .find(|(upper, _)| age <= *upper)
            .map(|(_, class)| *class)
    }
}

impl std::fmt::Display for AgeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How to treat ages outside (0, 70]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgePolicy {
    /// Fail the build with [`SegmentError::AgeOutOfRange`]
    #[default]
    Reject,
    /// Keep the record under [`AgeClass::Unclassified`]
    Unclassified,
}

impl std::fmt::Display for AgePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgePolicy::Reject => write!(f, "reject"),
            AgePolicy::Unclassified => write!(f, "unclassified"),
        }
    }
}

impl std::str::FromStr for AgePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(AgePolicy::Reject),
            "unclassified" => Ok(AgePolicy::Unclassified),
            _ => Err(format!(
                "Unknown age policy: '{}'. Use 'reject' or 'unclassified'.",
                s
            )),
        }
    }
}

/// Classify an age under the given policy.
///
/// `row` is only used to locate the record in the error.
pub fn classify_age(age: i64, policy: AgePolicy, row: usize) -> SegmentResult<AgeClass> {
    match (AgeClass::from_age(age), policy) {
        (Some(class), _) => Ok(class),
        (None, AgePolicy::Unclassified) => Ok(AgeClass::Unclassified),
        (None, AgePolicy::Reject) => Err(SegmentError::AgeOutOfRange { row, age }),
    }
}

/// Build the composite persona key from its four components.
///
/// Components are upper-cased and joined with [`KEY_SEPARATOR`].
pub fn build_key(country: &str, platform: &str, sex: &str, age_class: AgeClass) -> String {
    [country, platform, sex, age_class.label()]
        .iter()
        .map(|part| part.trim().to_uppercase())
        .collect::<Vec<_>>()
        .join(&KEY_SEPARATOR.to_string())
}
