use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("Scraping error: {0}")]
    Scraper(#[from] ScraperError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required configuration: {0}")]
    MissingField(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to build client: {0}")]
    BuildError(String),

    #[error("Response error {status_code} for {url}")]
    ResponseError { status_code: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Browser session failure: {0}")]
    Session(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Browser command failed: {0}")]
    Command(String),
}

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    #[error("Selector error: {0}")]
    SelectorError(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ElementNotFound,
    FetchFailure,
    DriverFailure,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::ElementNotFound => "element_not_found",
            FailureKind::FetchFailure => "fetch_failure",
            FailureKind::DriverFailure => "driver_failure",
        };
        f.write_str(name)
    }
}

impl AppError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            AppError::Browser(BrowserError::Session(_)) => FailureKind::DriverFailure,
            AppError::Browser(_) | AppError::Client(_) | AppError::Request(_) | AppError::Io(_) => {
                FailureKind::FetchFailure
            }
            AppError::Scraper(_) | AppError::Serde(_) | AppError::Config(_) => {
                FailureKind::ElementNotFound
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
