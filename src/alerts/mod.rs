//! Threshold alerts on regional entities
//!
//! Fetches regional block data, compares each region's value with a
//! threshold and keeps the regions in alert.

pub mod filter;
pub mod operator;
pub mod processor;

pub use filter::{filter, AlertResult};
pub use operator::{compare, Operator};
pub use processor::{AlertKind, AlertProcessor, VegetationAlertQuery, WeatherAlertQuery};

use crate::source::SourceError;

/// Alert pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("operator: possible values are >, <, >=, <=")]
    InvalidOperator(String),

    #[error("Cannot convert value to a number: '{0}'")]
    ValueConversion(String),

    #[error("No column {selector} in provider data (columns: {columns:?})")]
    Schema {
        selector: String,
        columns: Vec<String>,
    },

    #[error(transparent)]
    Source(#[from] SourceError),
}
