//! Regional data sources
//!
//! The alert pipeline reads weather and vegetation block data through the
//! [`DataSource`] trait. [`AgriquestClient`] is the production implementation.

pub mod client;
pub mod codes;
#[cfg(test)]
pub(crate) mod stub;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::data::{Table, TableError};

pub use client::{AgriquestClient, AgriquestConfig, Credentials, PriorityQueue, ProviderEnv, ProviderRegion};
pub use codes::{BlockCode, CommodityCode, UnknownCode, WeatherType};

/// Result of a provider read. An empty result is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Data(Table),
    NoData,
}

impl FetchOutcome {
    pub fn into_table(self) -> Option<Table> {
        match self {
            FetchOutcome::Data(table) => Some(table),
            FetchOutcome::NoData => None,
        }
    }
}

/// Read access to regional block data
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Weather values per region for the given period
    async fn fetch_weather(
        &self,
        block: BlockCode,
        start_date: NaiveDate,
        end_date: NaiveDate,
        weather_type: WeatherType,
    ) -> Result<FetchOutcome, SourceError>;

    /// NDVI values per region at the observation date, all vegetation
    async fn fetch_vegetation(
        &self,
        block: BlockCode,
        observation_date: NaiveDate,
    ) -> Result<FetchOutcome, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Cannot decode provider data: {0}")]
    Decode(#[from] TableError),
}
