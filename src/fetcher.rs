use std::time::Duration;

use anyhow::{bail, Context};
use derive_more::Display;
use headless_chrome::{Browser, LaunchOptions};
use log::{debug, error, info};
use scraper::Html;
use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::{
    document::{parse_document, CardSelectors},
    schema::LoungeRecord,
};

/// Anything that can hand the crawler the lounges listed on a given page.
///
/// An empty result means "no more pages"; implementations swallow their own errors.
pub trait PageSource {
    fn fetch_page(&mut self, page: u32) -> Vec<LoungeRecord>;
}

/// A listing URL with a `{page}` placeholder for the page number.
#[derive(Clone, PartialEq, Eq, Debug, Display, Deserialize)]
#[serde(try_from = "String")]
pub struct UrlTemplate(String);
impl TryFrom<String> for UrlTemplate {
    type Error = anyhow::Error;
    fn try_from(template: String) -> anyhow::Result<Self> {
        if !template.contains(Self::PLACEHOLDER) {
            bail!(
                "URL template {template:?} does not contain {:?}",
                Self::PLACEHOLDER
            );
        }
        Ok(Self(template))
    }
}
impl std::str::FromStr for UrlTemplate {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        s.to_owned().try_into()
    }
}
impl UrlTemplate {
    pub const PLACEHOLDER: &'static str = "{page}";

    pub fn url_for(&self, page: u32) -> String {
        self.0.replace(Self::PLACEHOLDER, &page.to_string())
    }
}

#[derive(Clone, Debug, TypedBuilder)]
pub struct FetchConfig {
    pub url_template: UrlTemplate,
    #[builder(default = DEFAULT_USER_AGENT.to_owned())]
    pub user_agent: String,
    #[builder(default = Duration::from_secs(30))]
    pub wait_timeout: Duration,
    #[builder(default = ".geodir-loop-container".to_owned())]
    pub container_selector: String,
}

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Renders each page in a fresh headless Chrome and parses the result.
pub struct BrowserPageSource {
    config: FetchConfig,
}

impl BrowserPageSource {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    // Dropping `browser` shuts the Chrome process down, on error paths too.
    fn render(&self, url: &str) -> anyhow::Result<String> {
        let browser = Browser::new(LaunchOptions::default_builder().headless(true).build()?)
            .context("Failed to launch browser")?;
        let tab = browser.new_tab()?;
        tab.set_user_agent(&self.config.user_agent, None, None)?;
        tab.navigate_to(url)?.wait_until_navigated()?;
        tab.wait_for_element_with_custom_timeout(
            &self.config.container_selector,
            self.config.wait_timeout,
        )
        .with_context(|| {
            format!(
                "{:?} did not appear within {:?}",
                self.config.container_selector, self.config.wait_timeout
            )
        })?;
        let content = tab.get_content()?;
        debug!("Captured {} bytes from {url}", content.len());
        Ok(content)
    }
}

impl PageSource for BrowserPageSource {
    fn fetch_page(&mut self, page: u32) -> Vec<LoungeRecord> {
        let url = self.config.url_template.url_for(page);
        info!("Fetching page {page}: {url}");
        match self.render(&url) {
            Ok(content) => parse_document(&Html::parse_document(&content), CardSelectors::Live),
            Err(e) => {
                error!("Error fetching page {page}: {e:#}");
                vec![]
            }
        }
    }
}
