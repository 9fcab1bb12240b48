pub mod aggregate;
pub mod browser;
pub mod client;
pub mod config;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod utils;

pub use aggregate::{scrape_all, Aggregator, Outcome, ScrapeResult};
pub use config::Config;
pub use error::{AppError, FailureKind, Result};
