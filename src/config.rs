use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use serde::Deserialize;

use crate::{
    crawl::CrawlOptions,
    fetcher::{FetchConfig, UrlTemplate, DEFAULT_USER_AGENT},
};

/// Settings for live crawling, as read from a TOML file.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrawlConfig {
    pub url_template: Option<UrlTemplate>,
    pub max_pages: u32,
    pub output_dir: PathBuf,
    pub delay_secs: u64,
    pub wait_timeout_secs: u64,
    pub user_agent: String,
    pub container_selector: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            url_template: None,
            max_pages: 10,
            output_dir: "output".into(),
            delay_secs: 2,
            wait_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            container_selector: ".geodir-loop-container".to_owned(),
        }
    }
}

impl CrawlConfig {
    pub fn into_parts(self) -> anyhow::Result<(FetchConfig, CrawlOptions)> {
        let url_template = self
            .url_template
            .context("No URL template given; pass --url-template or set `url_template`")?;
        let fetch = FetchConfig::builder()
            .url_template(url_template)
            .user_agent(self.user_agent)
            .wait_timeout(Duration::from_secs(self.wait_timeout_secs))
            .container_selector(self.container_selector)
            .build();
        let options = CrawlOptions::builder()
            .max_pages(self.max_pages)
            .output_dir(self.output_dir)
            .delay(Duration::from_secs(self.delay_secs))
            .build();
        Ok((fetch, options))
    }
}
