use super::page::Page;
use crate::browser::BrowserSession;
use crate::config::Config;
use crate::error::Result;
use crate::log_info;

pub const LIGHTBOX_IMAGE_SELECTOR: &str = "img.fancybox-image";

pub async fn extract(session: &mut dyn BrowserSession, config: &Config) -> Result<String> {
    let origin = &config.sites.gallery_url;
    log_info!("[featured] Visiting {}", origin);
    session.goto(origin).await?;

    session
        .click_nth_by_id(
            &config.layout.featured_button_id,
            config.layout.featured_button_index,
        )
        .await?;

    let markup = session.source().await?;
    let src = Page::new(&markup).attr_of(LIGHTBOX_IMAGE_SELECTOR, "src")?;
    let url = absolute_url(origin, &src);
    log_info!("[featured] Image at {}", url);
    Ok(url)
}

// Plain concatenation; the gallery serves root-relative paths.
pub fn absolute_url(origin: &str, relative: &str) -> String {
    format!("{}{}", origin, relative)
}
