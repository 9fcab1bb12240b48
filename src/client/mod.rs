mod builder;

use crate::error::{ClientError, Result};
use crate::log_debug;
use async_trait::async_trait;
pub use builder::ClientBuilder;
use reqwest::Client as ReqwestClient;
use url::Url;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub struct Client {
    inner: ReqwestClient,
}

impl Client {
    async fn request(&self, url: &str) -> Result<String> {
        let url =
            Url::parse(url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", url, e)))?;

        let response = self.inner.get(url.as_str()).send().await?;

        let status = response.status().as_u16();
        let is_success = response.status().is_success();
        let content = response.text().await?;

        if !is_success {
            return Err(ClientError::ResponseError {
                status_code: status,
                url: url.to_string(),
            }
            .into());
        }

        log_debug!("[client] GET {} -> {} ({} bytes)", url, status, content.len());
        Ok(content)
    }
}

#[async_trait]
impl PageFetcher for Client {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.request(url).await
    }
}
