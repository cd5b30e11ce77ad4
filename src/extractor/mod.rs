pub mod burgerbae;
pub mod common;
pub mod lea;

pub use burgerbae::BurgerBaeProfile;
pub use lea::LeaProfile;

use anyhow::{Result, bail};
use scraper::Html;
use std::collections::BTreeMap;
use tracing::info;
use url::Url;
use uuid::Uuid;

use crate::config::SiteConfig;
use crate::models::{Currency, DetailValue, SizeChart};
use common::css;

/// Current/original price pair pulled from a product fragment or page.
/// Either side may be missing without failing the extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PricePair {
    pub current: Option<f64>,
    pub original: Option<f64>,
}

/// The DOM subtree for one product within a listing page, captured as an
/// owned HTML snippet so it can outlive the listing document while the
/// product's detail page is fetched.
#[derive(Debug, Clone)]
pub struct ProductFragment {
    html: String,
}

impl ProductFragment {
    pub fn parse(&self) -> Html {
        Html::parse_fragment(&self.html)
    }
}

/// Per-vendor selector dialect. Each storefront layout supplies one
/// implementation; shared pipeline logic only talks to this trait.
///
/// All extractors are total over possibly-missing DOM: absent sub-elements
/// yield `None`/empty, never an error.
pub trait SiteProfile {
    fn name(&self) -> &str;
    fn base_url(&self) -> &Url;
    fn vendor_id(&self) -> Uuid;
    fn currency(&self) -> &Currency;

    /// Primary listing selector followed by one alternative.
    fn fragment_selectors(&self) -> [&str; 2];

    /// Product name and absolute detail-page URL. `None` means the whole
    /// product is skipped.
    fn name_and_url(&self, fragment: &Html) -> Option<(String, String)>;

    fn prices(&self, fragment: &Html, detail: &Html) -> PricePair;
    fn images(&self, fragment: &Html, detail: &Html) -> Vec<String>;
    fn rating(&self, fragment: &Html, detail: &Html) -> (Option<f64>, Option<i64>);
    fn sizes(&self, fragment: &Html, detail: &Html) -> Vec<String>;
    fn swatch_colors(&self, fragment: &Html, detail: &Html) -> Vec<String>;
    fn size_chart(&self, detail: &Html) -> SizeChart;
    fn size_chart_image(&self, detail: &Html) -> Option<String>;
    fn description(&self, detail: &Html) -> Option<String>;
    fn product_details(&self, detail: &Html) -> BTreeMap<String, DetailValue>;
    fn vendor_details(&self, detail: &Html) -> BTreeMap<String, DetailValue>;

    /// Category is the path segment just before `/products/` in the detail
    /// URL, e.g. `.../collections/dresses/products/x` -> `dresses`.
    fn category_from_url(&self, url: &str) -> Option<String> {
        let (prefix, _) = url.split_once("/products/")?;
        prefix
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
    }
}

/// Capture all product fragments on a listing page, trying the profile's
/// primary selector first and its alternative second. An empty result under
/// both selectors is the pagination stop signal, not an error.
pub fn capture_fragments(profile: &dyn SiteProfile, document: &Html) -> Vec<ProductFragment> {
    let [primary, fallback] = profile.fragment_selectors();
    for (src, is_fallback) in [(primary, false), (fallback, true)] {
        let fragments: Vec<ProductFragment> = document
            .select(&css(src))
            .map(|element| ProductFragment { html: element.html() })
            .collect();
        if !fragments.is_empty() {
            if is_fallback {
                info!(
                    "Found {} fragments with alternative selector '{}'",
                    fragments.len(),
                    src
                );
            }
            return fragments;
        }
    }
    Vec::new()
}

/// Resolve the vendor profile named by the run configuration.
pub fn profile_for(config: &SiteConfig) -> Result<Box<dyn SiteProfile>> {
    match config.site.profile.as_str() {
        "lea" => Ok(Box::new(LeaProfile::from_config(config)?)),
        "burgerbae" => Ok(Box::new(BurgerBaeProfile::from_config(config)?)),
        other => bail!("unknown site profile: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteSection;

    fn test_profile() -> BurgerBaeProfile {
        BurgerBaeProfile::from_section(&SiteSection {
            name: "test".to_string(),
            profile: "burgerbae".to_string(),
            base_url: "https://www.example-store.com".to_string(),
            vendor_id: Uuid::nil(),
            currency_code: "INR".to_string(),
            currency_symbol: "Rs.".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_capture_fragments_prefers_primary_selector() {
        let profile = test_profile();
        let document = Html::parse_document(
            r#"<html><body>
                <div class="product-card">one</div>
                <div class="product-card">two</div>
                <div class="product-item">ignored</div>
            </body></html>"#,
        );
        assert_eq!(capture_fragments(&profile, &document).len(), 2);
    }

    #[test]
    fn test_capture_fragments_falls_back_to_alternative() {
        let profile = test_profile();
        let document = Html::parse_document(
            r#"<html><body>
                <div class="product-item">one</div>
            </body></html>"#,
        );
        assert_eq!(capture_fragments(&profile, &document).len(), 1);
    }

    #[test]
    fn test_capture_fragments_empty_when_both_selectors_miss() {
        let profile = test_profile();
        let document =
            Html::parse_document("<html><body><div class=\"banner\">sale</div></body></html>");
        assert!(capture_fragments(&profile, &document).is_empty());
    }

    #[test]
    fn test_category_from_url() {
        let profile = test_profile();
        assert_eq!(
            profile.category_from_url(
                "https://www.example-store.com/collections/dresses/products/midi-dress"
            ),
            Some("dresses".to_string())
        );
        assert_eq!(
            profile.category_from_url("https://www.example-store.com/pages/about"),
            None
        );
    }
}
