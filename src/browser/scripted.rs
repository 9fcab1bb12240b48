use super::BrowserSession;
use crate::error::{BrowserError, Result, ScraperError};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

#[derive(Default)]
pub struct ScriptedSession {
    pages: HashMap<String, String>,
    revealed: HashMap<(String, String, usize), String>,
    failing: HashSet<String>,
    crash_at: Option<String>,
    back_redirect: Option<String>,
    history: Vec<String>,
    overlay: Option<String>,
    pub visits: Vec<String>,
    pub clicks: Vec<(String, usize)>,
    pub waits: Vec<(String, Duration)>,
    pub closed: bool,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn on_click(mut self, url: &str, id: &str, index: usize, html: &str) -> Self {
        self.revealed
            .insert((url.to_string(), id.to_string(), index), html.to_string());
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn crashing_at(mut self, url: &str) -> Self {
        self.crash_at = Some(url.to_string());
        self
    }

    pub fn back_lands_on(mut self, url: &str) -> Self {
        self.back_redirect = Some(url.to_string());
        self
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(BrowserError::Session("session already closed".into()).into());
        }
        Ok(())
    }

    fn current(&self) -> Result<&String> {
        self.history
            .last()
            .ok_or_else(|| BrowserError::Command("no page loaded".into()).into())
    }

    fn current_markup(&self) -> Result<String> {
        if let Some(overlay) = &self.overlay {
            return Ok(overlay.clone());
        }
        let url = self.current()?;
        self.pages.get(url).cloned().ok_or_else(|| {
            BrowserError::Navigation {
                url: url.clone(),
                reason: "no such page".into(),
            }
            .into()
        })
    }
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.ensure_open()?;
        self.visits.push(url.to_string());
        if self.crash_at.as_deref() == Some(url) {
            self.closed = true;
            return Err(BrowserError::Session("browser crashed".into()).into());
        }
        if self.failing.contains(url) || !self.pages.contains_key(url) {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: "unreachable".into(),
            }
            .into());
        }
        self.history.push(url.to_string());
        self.overlay = None;
        Ok(())
    }

    async fn source(&mut self) -> Result<String> {
        self.ensure_open()?;
        self.current_markup()
    }

    async fn current_url(&mut self) -> Result<String> {
        self.ensure_open()?;
        self.current().cloned()
    }

    async fn wait_for_css(&mut self, selector: &str, timeout: Duration) -> Result<bool> {
        self.ensure_open()?;
        self.waits.push((selector.to_string(), timeout));
        let selector = Selector::parse(selector)
            .map_err(|e| ScraperError::SelectorError(e.to_string()))?;
        let document = Html::parse_document(&self.current_markup()?);
        let found = document.select(&selector).next().is_some();
        Ok(found)
    }

    async fn click_nth_by_id(&mut self, id: &str, index: usize) -> Result<()> {
        self.ensure_open()?;
        self.clicks.push((id.to_string(), index));
        let selector = Selector::parse(&format!("[id=\"{}\"]", id))
            .map_err(|e| ScraperError::SelectorError(e.to_string()))?;
        let count = Html::parse_document(&self.current_markup()?)
            .select(&selector)
            .count();
        if index >= count {
            return Err(ScraperError::ElementNotFound(format!("#{} [{}]", id, index)).into());
        }
        let key = (self.current()?.clone(), id.to_string(), index);
        if let Some(revealed) = self.revealed.get(&key) {
            self.overlay = Some(revealed.clone());
        }
        Ok(())
    }

    async fn back(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.history.len() < 2 {
            return Err(BrowserError::Command("no history to go back to".into()).into());
        }
        self.history.pop();
        if let Some(redirect) = &self.back_redirect {
            self.history.pop();
            self.history.push(redirect.clone());
        }
        self.overlay = None;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
