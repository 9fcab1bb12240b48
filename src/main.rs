use anyhow::Context;
use mars_scraper::logging::{init_logging, LoggerConfig};
use mars_scraper::{log_info, scrape_all, utils, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    init_logging(LoggerConfig::from_config(&config.logging)?).context("initializing logging")?;
    log_info!("[main] Configuration loaded");

    log_info!("[main] Starting Mars scrape...");
    let result = scrape_all(&config)
        .await
        .context("scrape aborted: browser session unavailable")?;

    println!("{}", utils::to_json(&result)?);

    if let Some(path) = &config.output.json_path {
        utils::save_json(&result, path).with_context(|| format!("writing {}", path))?;
    }

    log_info!("[main] Scrape completed");
    Ok(())
}
