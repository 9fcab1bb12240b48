use crate::browser::{BrowserSession, WebDriverSession};
use crate::client::{ClientBuilder, PageFetcher};
use crate::config::Config;
use crate::error::{BrowserError, FailureKind, Result};
use crate::extractors::{facts, featured, hemispheres, news, HemisphereEntry};
use crate::{log_error, log_info, log_warn};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Failure(FailureKind),
}

impl<T> Outcome<T> {
    pub async fn capture<F>(section: &'static str, section_future: F) -> Self
    where
        F: Future<Output = Result<T>>,
    {
        match section_future.await {
            Ok(value) => Outcome::Success(value),
            Err(err) => {
                let kind = err.failure_kind();
                log_warn!(section, %kind, error = %err, "[aggregate] Section left empty");
                Outcome::Failure(kind)
            }
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<FailureKind> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(kind) => Some(*kind),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrapeResult {
    pub news_title: Option<String>,
    #[serde(rename = "news_paragraph")]
    pub news_summary: Option<String>,
    #[serde(rename = "featured_image")]
    pub featured_image_url: Option<String>,
    #[serde(rename = "facts")]
    pub facts_table: Option<String>,
    pub last_modified: DateTime<Utc>,
    #[serde(rename = "hemisphere_image_info")]
    pub hemisphere_entries: Option<Vec<HemisphereEntry>>,
    #[serde(skip)]
    failures: Vec<(&'static str, FailureKind)>,
}

impl ScrapeResult {
    pub fn failures(&self) -> &[(&'static str, FailureKind)] {
        &self.failures
    }
}

pub struct Aggregator<'a> {
    config: &'a Config,
    fetcher: &'a dyn PageFetcher,
}

impl<'a> Aggregator<'a> {
    pub fn new(config: &'a Config, fetcher: &'a dyn PageFetcher) -> Self {
        Self { config, fetcher }
    }

    pub async fn run(&self, session: &mut dyn BrowserSession) -> ScrapeResult {
        let config = self.config;

        let headline = Outcome::capture("news", news::extract(&mut *session, config)).await;
        let featured =
            Outcome::capture("featured_image", featured::extract(&mut *session, config)).await;
        let facts = Outcome::capture("facts", facts::extract(self.fetcher, config)).await;
        let hemispheres =
            Outcome::capture("hemispheres", hemispheres::extract(&mut *session, config)).await;

        let failures = [
            ("news", headline.failure()),
            ("featured_image", featured.failure()),
            ("facts", facts.failure()),
            ("hemispheres", hemispheres.failure()),
        ]
        .into_iter()
        .filter_map(|(section, kind)| kind.map(|kind| (section, kind)))
        .collect();

        let (news_title, news_summary) = match headline.ok() {
            Some(headline) => (Some(headline.title), Some(headline.summary)),
            None => (None, None),
        };

        ScrapeResult {
            news_title,
            news_summary,
            featured_image_url: featured.ok(),
            facts_table: facts.ok(),
            last_modified: Utc::now(),
            hemisphere_entries: hemispheres.ok(),
            failures,
        }
    }

    // Closes the session whatever the extractors did.
    pub async fn run_and_close(&self, session: &mut dyn BrowserSession) -> Result<ScrapeResult> {
        let result = self.run(&mut *session).await;
        if let Err(err) = session.close().await {
            log_error!(&err => "[aggregate] Failed to close browser session");
        }
        if let Some((section, _)) = result
            .failures()
            .iter()
            .find(|(_, kind)| *kind == FailureKind::DriverFailure)
        {
            return Err(BrowserError::Session(format!(
                "browser session died during {}",
                section
            ))
            .into());
        }
        Ok(result)
    }
}

pub async fn scrape_all(config: &Config) -> Result<ScrapeResult> {
    let client = ClientBuilder::from_config(&config.client)?.build()?;
    let mut session = WebDriverSession::connect(&config.browser).await?;

    let result = Aggregator::new(config, &client)
        .run_and_close(&mut session)
        .await;
    match &result {
        Ok(scrape) => {
            log_info!(
                "[aggregate] Scrape finished with {} empty section(s)",
                scrape.failures().len()
            );
        }
        Err(err) => {
            log_error!(err => "[aggregate] Scrape aborted");
        }
    }
    result
}
