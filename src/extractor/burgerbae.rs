use anyhow::{Context, Result};
use scraper::Html;
use std::collections::BTreeMap;
use url::Url;
use uuid::Uuid;

use crate::config::{SiteConfig, SiteSection};
use crate::models::{Currency, DetailValue, SizeChart};

use super::common::{
    absolutize, css, element_text, first_element, price_from_selectors, widest_srcset,
};
use super::{PricePair, SiteProfile};

/// Card-style storefront layout: prices, images, rating, sizes and color
/// swatches are all on the listing fragment; the detail page only adds the
/// description and a size-chart image.
pub struct BurgerBaeProfile {
    name: String,
    base_url: Url,
    vendor_id: Uuid,
    currency: Currency,
}

impl BurgerBaeProfile {
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Self::from_section(&config.site)
    }

    pub fn from_section(site: &SiteSection) -> Result<Self> {
        let base_url = Url::parse(&site.base_url)
            .with_context(|| format!("invalid base_url for {}", site.name))?;
        Ok(BurgerBaeProfile {
            name: site.name.clone(),
            base_url,
            vendor_id: site.vendor_id,
            currency: Currency {
                code: site.currency_code.clone(),
                symbol: site.currency_symbol.clone(),
            },
        })
    }

    fn srcset_images(&self, fragment: &Html, selector: &str) -> Vec<String> {
        fragment
            .select(&css(selector))
            .filter_map(|img| img.value().attr("data-srcset"))
            .filter_map(widest_srcset)
            .filter_map(|url| absolutize(&self.base_url, &url))
            .collect()
    }
}

impl SiteProfile for BurgerBaeProfile {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn vendor_id(&self) -> Uuid {
        self.vendor_id
    }

    fn currency(&self) -> &Currency {
        &self.currency
    }

    fn fragment_selectors(&self) -> [&str; 2] {
        [".product-card", ".product-item"]
    }

    fn name_and_url(&self, fragment: &Html) -> Option<(String, String)> {
        let link = first_element(fragment, ".product-card-title")?;
        let name = element_text(link);
        if name.is_empty() {
            return None;
        }
        let href = link.value().attr("href")?;
        let url = absolutize(&self.base_url, href)?;
        Some((name, url))
    }

    fn prices(&self, fragment: &Html, _detail: &Html) -> PricePair {
        PricePair {
            current: price_from_selectors(
                fragment,
                &[".price .amount.discounted", ".price .amount"],
            ),
            original: price_from_selectors(fragment, &[".price del .amount"]),
        }
    }

    fn images(&self, fragment: &Html, _detail: &Html) -> Vec<String> {
        // Primary image first, then secondaries, discovery order preserved.
        let mut images = self.srcset_images(fragment, ".product-primary-image");
        images.extend(self.srcset_images(fragment, ".product-secondary-image"));
        images
    }

    fn rating(&self, fragment: &Html, _detail: &Html) -> (Option<f64>, Option<i64>) {
        // Rating is embedded in an inline style, e.g. style="--rating: 4.5;".
        let rating = first_element(fragment, ".star-rating")
            .and_then(|element| element.value().attr("style").map(str::to_string))
            .and_then(|style| {
                style
                    .split_once(':')
                    .and_then(|(_, value)| value.trim().trim_end_matches(';').parse::<f64>().ok())
            });
        (rating, None)
    }

    fn sizes(&self, fragment: &Html, _detail: &Html) -> Vec<String> {
        fragment
            .select(&css(".product-card-sizes--size span"))
            .map(element_text)
            .filter(|size| !size.is_empty())
            .collect()
    }

    fn swatch_colors(&self, fragment: &Html, _detail: &Html) -> Vec<String> {
        fragment
            .select(&css(".product-card-swatch .visually-hidden"))
            .map(element_text)
            .filter(|color| !color.is_empty())
            .collect()
    }

    fn size_chart(&self, _detail: &Html) -> SizeChart {
        // This layout only ships a size-chart image, never a table.
        SizeChart::default()
    }

    fn size_chart_image(&self, detail: &Html) -> Option<String> {
        let img = first_element(detail, ".product-popup-modal__content-info img")?;
        absolutize(&self.base_url, img.value().attr("src")?)
    }

    fn description(&self, detail: &Html) -> Option<String> {
        let section = first_element(detail, ".collapsible__content.accordion__content.rte")?;
        let text = element_text(section);
        if text.is_empty() { None } else { Some(text) }
    }

    fn product_details(&self, _detail: &Html) -> BTreeMap<String, DetailValue> {
        BTreeMap::new()
    }

    fn vendor_details(&self, _detail: &Html) -> BTreeMap<String, DetailValue> {
        BTreeMap::new()
    }
}
