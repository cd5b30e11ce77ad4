use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fetcher::{DelayRange, RetryPolicy};

/// Run configuration for one storefront, loaded from a TOML file. The
/// vendor id, currency and rate-limit settings are assigned here, never
/// discovered from the site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site: SiteSection,
    #[serde(default)]
    pub scraping: ScrapingSection,
    pub listing_urls: Vec<String>,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSection {
    pub name: String,
    /// Which selector dialect to use: "lea" or "burgerbae".
    pub profile: String,
    pub base_url: String,
    pub vendor_id: Uuid,
    pub currency_code: String,
    pub currency_symbol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapingSection {
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default = "default_listing_delay")]
    pub listing_delay: DelayRange,
    #[serde(default = "default_detail_delay")]
    pub detail_delay: DelayRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: String,
}

fn default_max_pages() -> u32 {
    32
}

fn default_listing_delay() -> DelayRange {
    DelayRange {
        min_secs: 1.0,
        max_secs: 3.0,
    }
}

fn default_detail_delay() -> DelayRange {
    DelayRange {
        min_secs: 3.0,
        max_secs: 7.0,
    }
}

impl Default for ScrapingSection {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            retry: RetryPolicy::default(),
            listing_delay: default_listing_delay(),
            detail_delay: default_detail_delay(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path))?;
        let config: SiteConfig =
            toml::from_str(&content).with_context(|| format!("invalid config {}", path))?;
        Ok(config)
    }
}
