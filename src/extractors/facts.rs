use super::page::{element_text, selector, Page};
use crate::client::PageFetcher;
use crate::config::Config;
use crate::error::{Result, ScraperError};
use crate::log_info;
use html_escape::encode_text;
use std::fmt::Write;

pub const KEY_COLUMN: &str = "Description";
pub const VALUE_COLUMN: &str = "Mars";
pub const TABLE_CLASSES: &str = "table table-striped";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactsTable {
    rows: Vec<(String, String)>,
}

impl FactsTable {
    pub fn parse(markup: &str) -> Result<Self> {
        let page = Page::new(markup);
        let table = page.select_first("table")?;
        let row_selector = selector("tr")?;
        let cell_selector = selector("th, td")?;

        let mut rows = Vec::new();
        for (index, row) in table.select(&row_selector).enumerate() {
            let in_head = row
                .parent()
                .and_then(scraper::ElementRef::wrap)
                .is_some_and(|parent| parent.value().name() == "thead");
            let cells: Vec<_> = row.select(&cell_selector).collect();
            if cells.is_empty() {
                continue;
            }
            let header_only = cells.iter().all(|c| c.value().name() == "th");
            if in_head || (index == 0 && header_only) {
                continue;
            }
            if cells.len() != 2 {
                return Err(ScraperError::ParseError(format!(
                    "facts row {} has {} cells, expected 2",
                    index,
                    cells.len()
                ))
                .into());
            }
            rows.push((element_text(&cells[0]), element_text(&cells[1])));
        }

        if rows.is_empty() {
            return Err(ScraperError::ParseError("facts table has no rows".into()).into());
        }
        Ok(Self { rows })
    }

    pub fn lookup(&self, description: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(key, _)| key == description)
            .map(|(_, value)| value.as_str())
    }

    pub fn rows(&self) -> &[(String, String)] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_html(&self, classes: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "<table border=\"1\" class=\"dataframe {}\">",
            encode_text(classes)
        );
        out.push_str("  <thead>\n");
        out.push_str("    <tr style=\"text-align: right;\">\n");
        out.push_str("      <th></th>\n");
        let _ = writeln!(out, "      <th>{}</th>", VALUE_COLUMN);
        out.push_str("    </tr>\n");
        out.push_str("    <tr>\n");
        let _ = writeln!(out, "      <th>{}</th>", KEY_COLUMN);
        out.push_str("      <th></th>\n");
        out.push_str("    </tr>\n");
        out.push_str("  </thead>\n");
        out.push_str("  <tbody>\n");
        for (description, value) in &self.rows {
            out.push_str("    <tr>\n");
            let _ = writeln!(out, "      <th>{}</th>", encode_text(description));
            let _ = writeln!(out, "      <td>{}</td>", encode_text(value));
            out.push_str("    </tr>\n");
        }
        out.push_str("  </tbody>\n");
        out.push_str("</table>");
        out
    }
}

pub async fn extract(fetcher: &dyn PageFetcher, config: &Config) -> Result<String> {
    let url = &config.sites.facts_url;
    log_info!("[facts] Fetching {}", url);
    let markup = fetcher.fetch(url).await?;
    let table = FactsTable::parse(&markup)?;
    log_info!("[facts] Parsed {} facts", table.len());
    Ok(table.to_html(TABLE_CLASSES))
}
