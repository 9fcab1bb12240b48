use crate::error::{Result, ScraperError};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

pub fn normalize_text(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScraperError::SelectorError(format!("{}: {}", css, e)).into())
}

pub(crate) fn element_text(element: &ElementRef) -> String {
    normalize_text(&element.text().collect::<String>())
}

// Not Send: read what you need and drop it before awaiting.
pub struct Page {
    document: Html,
}

impl Page {
    pub fn new(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn count(&self, css: &str) -> Result<usize> {
        Ok(self.document.select(&selector(css)?).count())
    }

    pub fn select_first(&self, css: &str) -> Result<ElementRef<'_>> {
        self.select_nth(css, 0)
    }

    pub fn select_nth(&self, css: &str, index: usize) -> Result<ElementRef<'_>> {
        self.document
            .select(&selector(css)?)
            .nth(index)
            .ok_or_else(|| ScraperError::ElementNotFound(format!("{} [{}]", css, index)).into())
    }

    pub fn text_of(&self, css: &str) -> Result<String> {
        Ok(element_text(&self.select_first(css)?))
    }

    pub fn attr_of(&self, css: &str, attr: &str) -> Result<String> {
        attr_value(&self.select_first(css)?, css, attr)
    }

    pub fn nth_attr_of(&self, css: &str, index: usize, attr: &str) -> Result<String> {
        attr_value(&self.select_nth(css, index)?, css, attr)
    }
}

pub(crate) fn child<'a>(scope: &ElementRef<'a>, css: &str) -> Result<ElementRef<'a>> {
    scope
        .select(&selector(css)?)
        .next()
        .ok_or_else(|| ScraperError::ElementNotFound(css.to_string()).into())
}

fn attr_value(element: &ElementRef, css: &str, attr: &str) -> Result<String> {
    element
        .value()
        .attr(attr)
        .map(str::to_string)
        .ok_or_else(|| ScraperError::ElementNotFound(format!("{}[{}]", css, attr)).into())
}
