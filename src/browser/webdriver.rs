use super::BrowserSession;
use crate::config::BrowserConfig;
use crate::error::{BrowserError, Result, ScraperError};
use crate::log_info;
use async_trait::async_trait;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use std::time::Duration;

pub struct WebDriverSession {
    client: Option<Client>,
}

impl WebDriverSession {
    pub async fn connect(config: &BrowserConfig) -> Result<Self> {
        let mut caps = Map::new();
        caps.insert("goog:chromeOptions".to_string(), chrome_options(config));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| {
                BrowserError::Session(format!(
                    "could not start session at {}: {}",
                    config.webdriver_url, e
                ))
            })?;

        log_info!("[browser] Session opened via {}", config.webdriver_url);
        Ok(Self {
            client: Some(client),
        })
    }

    fn client(&self) -> Result<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| BrowserError::Session("session already closed".into()).into())
    }
}

fn chrome_options(config: &BrowserConfig) -> Value {
    let mut args = vec![json!("--no-sandbox"), json!("--disable-dev-shm-usage")];
    if config.headless {
        args.push(json!("--headless"));
        args.push(json!("--disable-gpu"));
    }

    let mut opts = Map::new();
    opts.insert("args".to_string(), Value::Array(args));
    if let Some(binary) = &config.browser_binary {
        opts.insert("binary".to_string(), json!(binary));
    }
    Value::Object(opts)
}

fn command_error(err: CmdError) -> BrowserError {
    if err.is_no_such_element() {
        return BrowserError::Command(format!("no such element: {}", err));
    }
    match err {
        // chromedriver itself is gone
        CmdError::Lost(e) => BrowserError::Session(e.to_string()),
        CmdError::Failed(e) => BrowserError::Session(e.to_string()),
        // chromedriver is up but the browser behind the session is not
        CmdError::Standard(wd)
            if matches!(
                wd.error,
                ErrorStatus::InvalidSessionId | ErrorStatus::SessionNotCreated
            ) =>
        {
            BrowserError::Session(wd.to_string())
        }
        other => BrowserError::Command(other.to_string()),
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.client()?.goto(url).await.map_err(|e| match command_error(e) {
            BrowserError::Session(reason) => BrowserError::Session(reason),
            other => BrowserError::Navigation {
                url: url.to_string(),
                reason: other.to_string(),
            },
        })?;
        Ok(())
    }

    async fn source(&mut self) -> Result<String> {
        Ok(self.client()?.source().await.map_err(command_error)?)
    }

    async fn current_url(&mut self) -> Result<String> {
        let url = self.client()?.current_url().await.map_err(command_error)?;
        Ok(url.to_string())
    }

    async fn wait_for_css(&mut self, selector: &str, timeout: Duration) -> Result<bool> {
        let found = self
            .client()?
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await;
        match found {
            Ok(_) => Ok(true),
            Err(CmdError::WaitTimeout) => Ok(false),
            Err(e) if e.is_no_such_element() => Ok(false),
            Err(e) => Err(command_error(e).into()),
        }
    }

    async fn click_nth_by_id(&mut self, id: &str, index: usize) -> Result<()> {
        let mut elements = self
            .client()?
            .find_all(Locator::Id(id))
            .await
            .map_err(command_error)?;
        if index >= elements.len() {
            return Err(ScraperError::ElementNotFound(format!(
                "#{} [{}] (found {})",
                id,
                index,
                elements.len()
            ))
            .into());
        }
        let element = elements.swap_remove(index);
        element.click().await.map_err(command_error)?;
        Ok(())
    }

    async fn back(&mut self) -> Result<()> {
        self.client()?.back().await.map_err(command_error)?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(client) = self.client.take() {
            client.close().await.map_err(command_error)?;
            log_info!("[browser] Session closed");
        }
        Ok(())
    }
}
