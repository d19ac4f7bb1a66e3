//! Fetch-then-filter pipeline for weather and vegetation alerts

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::filter::{filter, AlertResult};
use super::operator::Operator;
use super::AlertError;
use crate::data::ColumnSelector;
use crate::source::{BlockCode, DataSource, WeatherType};

/// Kind of alert, decides value column and export naming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Weather,
    Vegetation,
}

impl AlertKind {
    /// Operation name, used in logs and client-facing messages
    pub fn endpoint(self) -> &'static str {
        match self {
            AlertKind::Weather => "get_weather_alerts",
            AlertKind::Vegetation => "get_vegetation_alerts",
        }
    }

    pub fn file_suffix(self) -> &'static str {
        match self {
            AlertKind::Weather => "_weather",
            AlertKind::Vegetation => "_vegetation",
        }
    }

    /// Weather columns embed the unit in their name (`Value_mm`)
    pub fn value_column(self) -> ColumnSelector {
        match self {
            AlertKind::Weather => ColumnSelector::prefix("Value"),
            AlertKind::Vegetation => ColumnSelector::exact("NDVI"),
        }
    }

    pub fn no_data_message(self) -> String {
        format!("{}: No data found", self.endpoint())
    }
}

/// Parameters of a weather alert request
#[derive(Debug, Clone)]
pub struct WeatherAlertQuery {
    pub block: BlockCode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub weather_type: WeatherType,
    pub threshold: f64,
    /// Raw operator, validated before the provider is called
    pub operator: String,
}

/// Parameters of a vegetation alert request
#[derive(Debug, Clone)]
pub struct VegetationAlertQuery {
    pub block: BlockCode,
    pub observation_date: NaiveDate,
    pub threshold: f64,
    /// Raw operator, validated before the provider is called
    pub operator: String,
}

/// Runs alert queries against a data source
#[derive(Clone)]
pub struct AlertProcessor {
    source: Arc<dyn DataSource>,
}

impl AlertProcessor {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }

    /// Regions whose weather value passes the threshold over the period.
    /// Returns `Ok(None)` when the provider has no data.
    pub async fn weather_alerts(
        &self,
        query: &WeatherAlertQuery,
    ) -> Result<Option<AlertResult>, AlertError> {
        let operator: Operator = query.operator.parse()?;

        tracing::info!(
            block = %query.block,
            start_date = %query.start_date,
            end_date = %query.end_date,
            weather_type = %query.weather_type,
            threshold = query.threshold,
            operator = %operator,
            "Fetching weather block data"
        );

        let outcome = self
            .source
            .fetch_weather(query.block, query.start_date, query.end_date, query.weather_type)
            .await?;

        match outcome.into_table() {
            Some(table) => {
                let kind = AlertKind::Weather;
                filter(table, &kind.value_column(), query.threshold, operator).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Regions whose NDVI passes the threshold at the observation date.
    /// Returns `Ok(None)` when the provider has no data.
    pub async fn vegetation_alerts(
        &self,
        query: &VegetationAlertQuery,
    ) -> Result<Option<AlertResult>, AlertError> {
        let operator: Operator = query.operator.parse()?;

        tracing::info!(
            block = %query.block,
            observation_date = %query.observation_date,
            threshold = query.threshold,
            operator = %operator,
            "Fetching vegetation block data"
        );

        let outcome = self
            .source
            .fetch_vegetation(query.block, query.observation_date)
            .await?;

        match outcome.into_table() {
            Some(table) => {
                let kind = AlertKind::Vegetation;
                filter(table, &kind.value_column(), query.threshold, operator).map(Some)
            }
            None => Ok(None),
        }
    }
}
