use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::Path;
use url::Url;

pub const CONFIG_ENV_VAR: &str = "MARS_SCRAPER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_directory")]
    pub directory: String,
    #[serde(default = "default_log_filename")]
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_news_url")]
    pub news_url: String,
    #[serde(default = "default_gallery_url")]
    pub gallery_url: String,
    #[serde(default = "default_facts_url")]
    pub facts_url: String,
    #[serde(default = "default_hemisphere_url")]
    pub hemisphere_url: String,
    #[serde(default = "default_hemisphere_origin")]
    pub hemisphere_origin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_featured_button_id")]
    pub featured_button_id: String,
    #[serde(default = "default_featured_button_index")]
    pub featured_button_index: usize,
    #[serde(default = "default_news_wait_ms")]
    pub news_wait_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    #[serde(default = "default_headless")]
    pub headless: bool,
    #[serde(default)]
    pub browser_binary: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default)]
    pub proxy: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sites: SiteConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

// Default implementations
impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
            filename: default_log_filename(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            news_url: default_news_url(),
            gallery_url: default_gallery_url(),
            facts_url: default_facts_url(),
            hemisphere_url: default_hemisphere_url(),
            hemisphere_origin: default_hemisphere_origin(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            featured_button_id: default_featured_button_id(),
            featured_button_index: default_featured_button_index(),
            news_wait_ms: default_news_wait_ms(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            browser_binary: None,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout: default_request_timeout(),
            proxy: None,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::FileRead)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;

        config.validate()?;
        Ok(config)
    }

    // A missing file means defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Self::load_or_default(path)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }

    fn validate(&self) -> Result<()> {
        let urls = [
            ("sites.news_url", &self.sites.news_url),
            ("sites.gallery_url", &self.sites.gallery_url),
            ("sites.facts_url", &self.sites.facts_url),
            ("sites.hemisphere_url", &self.sites.hemisphere_url),
            ("sites.hemisphere_origin", &self.sites.hemisphere_origin),
            ("browser.webdriver_url", &self.browser.webdriver_url),
        ];
        for (name, value) in urls {
            validate_http_url(name, value)?;
        }

        if self.layout.featured_button_id.is_empty() {
            return Err(ConfigError::MissingField("layout.featured_button_id".to_string()).into());
        }

        if self.layout.news_wait_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "layout.news_wait_ms must be greater than 0".to_string(),
            )
            .into());
        }

        if self.client.request_timeout == 0 {
            return Err(ConfigError::InvalidValue(
                "client.request_timeout must be greater than 0".to_string(),
            )
            .into());
        }

        crate::logging::parse_log_level(&self.logging.level)?;

        Ok(())
    }
}

fn validate_http_url(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ConfigError::MissingField(name.to_string()).into());
    }
    let parsed = Url::parse(value)
        .map_err(|e| ConfigError::InvalidValue(format!("{} is not a valid URL: {}", name, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue(format!(
            "{} must start with http(s): {}",
            name, value
        ))
        .into());
    }
    Ok(())
}

fn default_news_url() -> String {
    "https://mars.nasa.gov/news/".to_string()
}

fn default_gallery_url() -> String {
    "https://spaceimages-mars.com".to_string()
}

fn default_facts_url() -> String {
    "http://space-facts.com/mars/".to_string()
}

fn default_hemisphere_url() -> String {
    "https://astrogeology.usgs.gov/search/results?q=hemisphere+enhanced&k1=target&v1=Mars"
        .to_string()
}

fn default_hemisphere_origin() -> String {
    "https://astrogeology.usgs.gov".to_string()
}

fn default_featured_button_id() -> String {
    "button".to_string()
}

fn default_featured_button_index() -> usize {
    1
}

fn default_news_wait_ms() -> u64 {
    1000
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_user_agent() -> String {
    concat!(
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 ",
        "(KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36"
    )
    .to_string()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_log_filename() -> String {
    "mars-scraper.log".to_string()
}
