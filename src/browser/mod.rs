mod webdriver;

#[cfg(test)]
pub(crate) mod scripted;

pub use webdriver::WebDriverSession;

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait BrowserSession: Send {
    async fn goto(&mut self, url: &str) -> Result<()>;

    async fn source(&mut self) -> Result<String>;

    async fn current_url(&mut self) -> Result<String>;

    // Ok(false) when nothing matched within `timeout`
    async fn wait_for_css(&mut self, selector: &str, timeout: Duration) -> Result<bool>;

    async fn click_nth_by_id(&mut self, id: &str, index: usize) -> Result<()>;

    async fn back(&mut self) -> Result<()>;

    async fn close(&mut self) -> Result<()>;
}
