use super::page::{child, element_text, Page};
use crate::browser::BrowserSession;
use crate::config::Config;
use crate::error::Result;
use crate::{log_debug, log_info};
use serde::Serialize;
use std::time::Duration;

pub const SLIDE_SELECTOR: &str = "ul.item_list li.slide";
pub const TITLE_SELECTOR: &str = "div.content_title";
pub const TEASER_SELECTOR: &str = "div.article_teaser_body";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Headline {
    pub title: String,
    pub summary: String,
}

pub async fn extract(session: &mut dyn BrowserSession, config: &Config) -> Result<Headline> {
    let url = &config.sites.news_url;
    log_info!("[news] Visiting {}", url);
    session.goto(url).await?;

    let wait = Duration::from_millis(config.layout.news_wait_ms);
    if !session.wait_for_css(SLIDE_SELECTOR, wait).await? {
        log_debug!("[news] No slide after {:?}, parsing anyway", wait);
    }

    let markup = session.source().await?;
    let headline = parse_headline(&markup)?;
    log_info!("[news] Latest headline: {}", headline.title);
    Ok(headline)
}

pub fn parse_headline(markup: &str) -> Result<Headline> {
    let page = Page::new(markup);
    let slide = page.select_first(SLIDE_SELECTOR)?;
    Ok(Headline {
        title: element_text(&child(&slide, TITLE_SELECTOR)?),
        summary: element_text(&child(&slide, TEASER_SELECTOR)?),
    })
}
