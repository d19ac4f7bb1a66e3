//! Regional Level Alerts
//!
//! Raises weather or vegetation alerts on regional entities. Regional block
//! data is read from the AgriQuest API, each region's value is compared with
//! a user supplied threshold, and the regions in alert are returned as a CSV
//! file that is also mirrored to AWS S3 and Azure Blob Storage when
//! configured.
//!
//! # Example
//!
//! ```no_run
//! use regional_level_alerts::alerts::{AlertProcessor, WeatherAlertQuery};
//! use regional_level_alerts::source::{AgriquestClient, AgriquestConfig, BlockCode, WeatherType};
//! use chrono::NaiveDate;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AgriquestClient::new(&AgriquestConfig::default())?;
//! let processor = AlertProcessor::new(Arc::new(client));
//!
//! let query = WeatherAlertQuery {
//!     block: BlockCode::FraDepartements,
//!     start_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
//!     end_date: NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
//!     weather_type: WeatherType::CumulativePrecipitation,
//!     threshold: 50.0,
//!     operator: ">".to_string(),
//! };
//! if let Some(result) = processor.weather_alerts(&query).await? {
//!     println!("{} of {} regions in alert", result.rows_after, result.rows_before);
//! }
//! # Ok(())
//! # }
//! ```

pub mod alerts;
pub mod api;
pub mod config;
pub mod data;
pub mod export;
pub mod source;

// Re-export commonly used types
pub use alerts::{AlertError, AlertKind, AlertProcessor, AlertResult, Operator};
pub use config::{AppConfig, ConfigError};
pub use data::{Table, Value};
pub use export::{Exporter, ExportedFile};
pub use source::{DataSource, FetchOutcome, SourceError};
