//! Canned data source for tests

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{BlockCode, DataSource, FetchOutcome, SourceError, WeatherType};

/// Returns fixed outcomes and counts calls
pub struct StubSource {
    weather: Option<FetchOutcome>,
    vegetation: Option<FetchOutcome>,
    weather_calls: AtomicUsize,
    vegetation_calls: AtomicUsize,
}

impl StubSource {
    pub fn new(weather: FetchOutcome, vegetation: FetchOutcome) -> Self {
        Self {
            weather: Some(weather),
            vegetation: Some(vegetation),
            weather_calls: AtomicUsize::new(0),
            vegetation_calls: AtomicUsize::new(0),
        }
    }

    /// Every fetch fails with a remote error
    pub fn failing() -> Self {
        Self {
            weather: None,
            vegetation: None,
            weather_calls: AtomicUsize::new(0),
            vegetation_calls: AtomicUsize::new(0),
        }
    }

    pub fn weather_calls(&self) -> usize {
        self.weather_calls.load(Ordering::SeqCst)
    }

    pub fn vegetation_calls(&self) -> usize {
        self.vegetation_calls.load(Ordering::SeqCst)
    }

    fn outcome(canned: &Option<FetchOutcome>) -> Result<FetchOutcome, SourceError> {
        canned.clone().ok_or_else(|| SourceError::Remote {
            status: 502,
            message: "upstream unavailable".to_string(),
        })
    }
}

#[async_trait]
impl DataSource for StubSource {
    async fn fetch_weather(
        &self,
        _block: BlockCode,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
        _weather_type: WeatherType,
    ) -> Result<FetchOutcome, SourceError> {
        self.weather_calls.fetch_add(1, Ordering::SeqCst);
        Self::outcome(&self.weather)
    }

    async fn fetch_vegetation(
        &self,
        _block: BlockCode,
        _observation_date: NaiveDate,
    ) -> Result<FetchOutcome, SourceError> {
        self.vegetation_calls.fetch_add(1, Ordering::SeqCst);
        Self::outcome(&self.vegetation)
    }
}
