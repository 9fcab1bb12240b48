use super::page::Page;
use crate::browser::BrowserSession;
use crate::config::Config;
use crate::error::{BrowserError, Result, ScraperError};
use crate::{log_debug, log_info};
use serde::Serialize;
use url::Url;

pub const ITEM_SELECTOR: &str = "div.item";
pub const DETAIL_LINK_SELECTOR: &str = "div.description a";
pub const DOWNLOAD_LINK_SELECTOR: &str = "div.downloads ul li a";
pub const TITLE_SELECTOR: &str = "h2.title";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HemisphereEntry {
    #[serde(rename = "img_url")]
    pub image_url: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogState {
    OnListing,
    OnDetail(usize),
}

pub struct CatalogWalk<'s> {
    session: &'s mut dyn BrowserSession,
    origin: String,
    listing_url: String,
    state: CatalogState,
}

impl<'s> CatalogWalk<'s> {
    // The listing URL after load is what `back` must return to.
    pub async fn open(
        session: &'s mut dyn BrowserSession,
        url: &str,
        origin: &str,
    ) -> Result<CatalogWalk<'s>> {
        session.goto(url).await?;
        let listing_url = session.current_url().await?;
        Ok(Self {
            session,
            origin: origin.to_string(),
            listing_url,
            state: CatalogState::OnListing,
        })
    }

    pub fn state(&self) -> CatalogState {
        self.state
    }

    pub async fn item_count(&mut self) -> Result<usize> {
        self.expect(CatalogState::OnListing)?;
        let markup = self.session.source().await?;
        Page::new(&markup).count(ITEM_SELECTOR)
    }

    // OnListing -> OnDetail(index)
    pub async fn enter(&mut self, index: usize) -> Result<()> {
        self.expect(CatalogState::OnListing)?;
        let markup = self.session.source().await?;
        let href = Page::new(&markup).nth_attr_of(DETAIL_LINK_SELECTOR, index, "href")?;
        let detail_url = format!("{}{}", self.origin, href);
        log_debug!("[hemispheres] Item {} -> {}", index, detail_url);
        self.session.goto(&detail_url).await?;
        self.state = CatalogState::OnDetail(index);
        Ok(())
    }

    pub async fn read_detail(&mut self) -> Result<HemisphereEntry> {
        match self.state {
            CatalogState::OnDetail(_) => {}
            CatalogState::OnListing => {
                return Err(BrowserError::Command("not on a detail page".into()).into())
            }
        }
        let detail_url = self.session.current_url().await?;
        let markup = self.session.source().await?;
        parse_detail(&markup, &detail_url)
    }

    // OnDetail(_) -> OnListing, checked against the listing URL
    pub async fn leave(&mut self) -> Result<()> {
        if self.state == CatalogState::OnListing {
            return Err(BrowserError::Command("already on the listing page".into()).into());
        }
        self.session.back().await?;
        let landed = self.session.current_url().await?;
        if landed != self.listing_url {
            return Err(BrowserError::Navigation {
                url: landed,
                reason: format!("expected to be back on {}", self.listing_url),
            }
            .into());
        }
        self.state = CatalogState::OnListing;
        Ok(())
    }

    fn expect(&self, state: CatalogState) -> Result<()> {
        if self.state != state {
            return Err(BrowserError::Command(format!(
                "catalog walk is {:?}, expected {:?}",
                self.state, state
            ))
            .into());
        }
        Ok(())
    }
}

pub fn parse_detail(markup: &str, detail_url: &str) -> Result<HemisphereEntry> {
    let page = Page::new(markup);
    let href = page.attr_of(DOWNLOAD_LINK_SELECTOR, "href")?;
    let title = page.text_of(TITLE_SELECTOR)?;
    let image_url = Url::parse(detail_url)
        .and_then(|base| base.join(&href))
        .map_err(|e| ScraperError::ParseError(format!("bad image link {}: {}", href, e)))?;
    Ok(HemisphereEntry {
        image_url: image_url.to_string(),
        title,
    })
}

// Any failure discards the entries gathered so far.
pub async fn extract(
    session: &mut dyn BrowserSession,
    config: &Config,
) -> Result<Vec<HemisphereEntry>> {
    log_info!("[hemispheres] Visiting {}", config.sites.hemisphere_url);
    let mut walk = CatalogWalk::open(
        session,
        &config.sites.hemisphere_url,
        &config.sites.hemisphere_origin,
    )
    .await?;

    let count = walk.item_count().await?;
    log_info!("[hemispheres] {} items listed", count);

    let mut entries = Vec::with_capacity(count);
    for index in 0..count {
        walk.enter(index).await?;
        let entry = walk.read_detail().await?;
        log_debug!("[hemispheres] {} -> {}", entry.title, entry.image_url);
        entries.push(entry);
        walk.leave().await?;
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::scripted::ScriptedSession;
    use crate::error::AppError;

    const LISTING_URL: &str =
        "https://astrogeology.usgs.gov/search/results?q=hemisphere+enhanced&k1=target&v1=Mars";
    const ORIGIN: &str = "https://astrogeology.usgs.gov";

    const NAMES: [&str; 3] = ["cerberus", "schiaparelli", "syrtis_major"];

    fn listing(names: &[&str]) -> String {
        let items: String = names
            .iter()
            .map(|name| {
                format!(
                    r#"<div class="item">
                         <a class="itemLink product-item" href="/search/map/Mars/{name}">
                           <img src="/thumb/{name}.png"></a>
                         <div class="description">
                           <a class="itemLink product-item" href="/search/map/Mars/{name}">
                             <h3>{name}</h3></a>
                         </div>
                       </div>"#
                )
            })
            .collect();
        format!(r#"<html><body><div class="collapsible results">{items}</div></body></html>"#)
    }

    fn detail(name: &str) -> String {
        let host = "https://astropedia.astrogeology.usgs.gov";
        format!(
            r#"<html><body>
               <div class="downloads"><ul>
                 <li><a href="{host}/download/{name}.tif/full.jpg">Sample</a></li>
                 <li><a href="/original/{name}.tif">Original</a></li>
               </ul></div>
               <h2 class="title">{name} Hemisphere Enhanced</h2>
               </body></html>"#
        )
    }

    fn detail_url(name: &str) -> String {
        format!("{}/search/map/Mars/{}", ORIGIN, name)
    }

    fn catalog(names: &[&str]) -> ScriptedSession {
        let mut session = ScriptedSession::new().page(LISTING_URL, &listing(names));
        for name in names {
            session = session.page(&detail_url(name), &detail(name));
        }
        session
    }

    #[tokio::test]
    async fn visits_every_item_in_listing_order() {
        let mut session = catalog(&NAMES);

        let entries = extract(&mut session, &Config::default()).await.unwrap();

        assert_eq!(entries.len(), 3);
        for (entry, name) in entries.iter().zip(NAMES) {
            assert_eq!(entry.title, format!("{} Hemisphere Enhanced", name));
            let expected = format!(
                "https://astropedia.astrogeology.usgs.gov/download/{}.tif/full.jpg",
                name
            );
            assert_eq!(entry.image_url, expected);
        }
        let details: Vec<_> = session
            .visits
            .iter()
            .filter(|v| *v != LISTING_URL)
            .cloned()
            .collect();
        assert_eq!(details, NAMES.iter().map(|n| detail_url(n)).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn failure_on_second_detail_discards_everything() {
        let mut session = catalog(&NAMES).failing(&detail_url(NAMES[1]));

        let err = extract(&mut session, &Config::default()).await.unwrap_err();

        assert!(matches!(err, AppError::Browser(BrowserError::Navigation { .. })));
        assert_eq!(session.visits.len(), 3);
    }

    #[tokio::test]
    async fn detail_without_title_fails() {
        let mut session = catalog(&NAMES).page(
            &detail_url(NAMES[0]),
            r#"<div class="downloads"><ul><li><a href="/x.jpg">Sample</a></li></ul></div>"#,
        );
        let err = extract(&mut session, &Config::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Scraper(ScraperError::ElementNotFound(_))));
    }

    #[tokio::test]
    async fn empty_listing_is_empty_not_failure() {
        let mut session = catalog(&[]);
        let entries = extract(&mut session, &Config::default()).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn drifting_back_navigation_is_caught() {
        let mut session = catalog(&NAMES).back_lands_on(&detail_url(NAMES[2]));
        let err = extract(&mut session, &Config::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Browser(BrowserError::Navigation { .. })));
    }

    #[tokio::test]
    async fn walk_enforces_transitions() {
        let mut session = catalog(&NAMES);
        let mut walk = CatalogWalk::open(&mut session, LISTING_URL, ORIGIN)
            .await
            .unwrap();

        assert!(walk.leave().await.is_err());
        assert!(walk.read_detail().await.is_err());

        walk.enter(2).await.unwrap();
        assert_eq!(walk.state(), CatalogState::OnDetail(2));
        assert!(walk.enter(0).await.is_err());
        assert!(walk.item_count().await.is_err());

        walk.leave().await.unwrap();
        assert_eq!(walk.state(), CatalogState::OnListing);
    }

    #[test]
    fn relative_image_link_is_made_absolute() {
        let markup = r#"<div class="downloads">
                          <ul><li><a href="/cache/images/full.jpg">Sample</a></li></ul>
                        </div>
                        <h2 class="title">Valles Marineris Hemisphere Enhanced</h2>"#;
        let entry = parse_detail(markup, &detail_url("valles_marineris")).unwrap();
        assert_eq!(entry.image_url, "https://astrogeology.usgs.gov/cache/images/full.jpg");
        assert_eq!(entry.title, "Valles Marineris Hemisphere Enhanced");
    }
}
