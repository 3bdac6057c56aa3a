//! Persona: Customer Segmentation Library
//!
//! Groups purchase records into demographic personas, ranks them by mean
//! price into A-D quartile segments and estimates the expected income of
//! new customers.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
