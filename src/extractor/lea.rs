use anyhow::{Context, Result};
use scraper::Html;
use std::collections::BTreeMap;
use url::Url;
use uuid::Uuid;

use crate::config::{SiteConfig, SiteSection};
use crate::models::{Currency, DetailValue, SizeChart};

use super::common::{
    absolutize, css, detail_items, element_text, first_element, measurement_rows,
    price_from_selectors, widest_srcset,
};
use super::{PricePair, SiteProfile};

/// Shopify-style storefront layout: prices, images, rating, sizes, colors,
/// size chart and structured description all live on the product detail
/// page; the listing fragment only carries the name/link.
pub struct LeaProfile {
    name: String,
    base_url: Url,
    vendor_id: Uuid,
    currency: Currency,
}

impl LeaProfile {
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Self::from_section(&config.site)
    }

    pub fn from_section(site: &SiteSection) -> Result<Self> {
        let base_url = Url::parse(&site.base_url)
            .with_context(|| format!("invalid base_url for {}", site.name))?;
        Ok(LeaProfile {
            name: site.name.clone(),
            base_url,
            vendor_id: site.vendor_id,
            currency: Currency {
                code: site.currency_code.clone(),
                symbol: site.currency_symbol.clone(),
            },
        })
    }

    /// Slide images carry the full-size URL in `data-original-src`; lazy
    /// variants only have a `data-src` template whose `{width}x` slot is
    /// filled from `data-max-width`.
    fn slide_images(&self, detail: &Html) -> Vec<String> {
        let mut images = Vec::new();
        let slide_sel = css(".Product__SlideItem.Product__SlideItem--image");
        let img_sel = css(".Image--fadeIn.lazyautosizes.Image--lazyLoaded, .Image--lazyLoad.Image--fadeIn");
        for slide in detail.select(&slide_sel) {
            let Some(img) = slide.select(&img_sel).next() else {
                continue;
            };
            let raw = match img.value().attr("data-original-src") {
                Some(src) => Some(src.to_string()),
                None => img.value().attr("data-src").map(|template| {
                    let max_width = img.value().attr("data-max-width").unwrap_or("800");
                    template.replace("{width}x", &format!("{}x", max_width))
                }),
            };
            if let Some(url) = raw.as_deref().and_then(|raw| absolutize(&self.base_url, raw)) {
                images.push(url);
            }
        }
        images
    }

    /// Fallback when the slide layout is absent: main image before the
    /// alternate, each resolved to the widest srcset candidate.
    fn listing_images(&self, detail: &Html) -> Vec<String> {
        let mut images = Vec::new();
        let Some(wrapper) = first_element(detail, ".ProductItem .ProductItem__ImageWrapper") else {
            return images;
        };
        let selectors = [
            ".ProductItem__Image:not(.ProductItem__Image--alternate)",
            ".ProductItem__Image--alternate",
        ];
        for src in selectors {
            if let Some(img) = wrapper.select(&css(src)).next() {
                let widest = img
                    .value()
                    .attr("data-srcset")
                    .and_then(widest_srcset)
                    .and_then(|url| absolutize(&self.base_url, &url));
                if let Some(url) = widest {
                    images.push(url);
                }
            }
        }
        images
    }
}

impl SiteProfile for LeaProfile {
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
        [".ProductItem", ".product-item"]
    }

    fn name_and_url(&self, fragment: &Html) -> Option<(String, String)> {
        let link = first_element(fragment, ".ProductItem__Title a")?;
        let name = element_text(link);
        if name.is_empty() {
            return None;
        }
        let href = link.value().attr("href")?;
        let url = absolutize(&self.base_url, href)?;
        Some((name, url))
    }

    fn prices(&self, _fragment: &Html, detail: &Html) -> PricePair {
        PricePair {
            current: price_from_selectors(
                detail,
                &[
                    ".ProductMeta__PriceList .ProductMeta__Price.Price--highlight",
                    ".ProductMeta__PriceList .ProductMeta__Price",
                ],
            ),
            original: price_from_selectors(
                detail,
                &[".ProductMeta__PriceList .ProductMeta__Price.Price--compareAt"],
            ),
        }
    }

    fn images(&self, _fragment: &Html, detail: &Html) -> Vec<String> {
        let slides = self.slide_images(detail);
        if !slides.is_empty() {
            return slides;
        }
        self.listing_images(detail)
    }

    fn rating(&self, _fragment: &Html, detail: &Html) -> (Option<f64>, Option<i64>) {
        let Some(badge) = first_element(detail, ".jdgm-prev-badge") else {
            return (None, None);
        };
        let rating = badge
            .value()
            .attr("data-average-rating")
            .and_then(|v| v.parse::<f64>().ok());
        let review_count = badge
            .value()
            .attr("data-number-of-reviews")
            .and_then(|v| v.parse::<i64>().ok());
        (rating, review_count)
    }

    fn sizes(&self, _fragment: &Html, detail: &Html) -> Vec<String> {
        detail
            .select(&css(".SizeSwatchList .SizeSwatch"))
            .map(element_text)
            .filter(|size| !size.is_empty())
            .collect()
    }

    fn swatch_colors(&self, _fragment: &Html, detail: &Html) -> Vec<String> {
        detail
            .select(&css(".ColorSwatchList .ColorSwatch"))
            .map(element_text)
            .filter(|color| !color.is_empty())
            .collect()
    }

    fn size_chart(&self, detail: &Html) -> SizeChart {
        let Some(wrapper) = first_element(detail, ".ks-table-wrapper") else {
            return SizeChart::default();
        };
        let headers: Vec<String> = wrapper
            .select(&css(".ks-table-header-cell"))
            .map(element_text)
            .collect();

        let mut chart = SizeChart::default();
        if let Some(table) = wrapper.select(&css(".inch-table")).next() {
            chart.inches = measurement_rows(table, &headers);
        }
        if let Some(table) = wrapper.select(&css(".cm-table")).next() {
            chart.cm = measurement_rows(table, &headers);
        }
        chart
    }

    fn size_chart_image(&self, _detail: &Html) -> Option<String> {
        // This layout publishes measurements as a table, not an image.
        None
    }

    fn description(&self, detail: &Html) -> Option<String> {
        let section = first_element(detail, "#description")?;
        let mut out = String::new();

        if let Some(intro) = section.select(&css("p")).next() {
            let text = element_text(intro);
            if !text.is_empty() {
                out.push_str(&text);
                out.push_str("\n\n");
            }
        }

        let features: Vec<String> = section
            .select(&css("ul li"))
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect();
        if !features.is_empty() {
            out.push_str("Features:\n");
            for feature in &features {
                out.push_str(&format!("- {}\n", feature));
            }
        }

        let usage: Vec<String> = section
            .select(&css("p:not(:first-child)"))
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect();
        if !usage.is_empty() {
            out.push_str("\nUsage Suggestions:\n");
            for paragraph in &usage {
                out.push_str(paragraph);
                out.push('\n');
            }
        }

        let trimmed = out.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(out)
        }
    }

    fn product_details(&self, detail: &Html) -> BTreeMap<String, DetailValue> {
        first_element(detail, "#pro-details")
            .map(detail_items)
            .unwrap_or_default()
    }

    fn vendor_details(&self, detail: &Html) -> BTreeMap<String, DetailValue> {
        first_element(detail, "#vendor-details")
            .map(detail_items)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> LeaProfile {
        LeaProfile::from_section(&SiteSection {
            name: "lea".to_string(),
            profile: "lea".to_string(),
            base_url: "https://www.leaclothingco.com".to_string(),
            vendor_id: Uuid::nil(),
            currency_code: "INR".to_string(),
            currency_symbol: "Rs.".to_string(),
        })
        .unwrap()
    }

    fn detail_page() -> Html {
        Html::parse_document(
            r#"<html><body>
                <div class="ProductMeta__PriceList">
                    <span class="ProductMeta__Price Price--highlight">Rs. 1,299.00</span>
                    <span class="ProductMeta__Price Price--compareAt">Rs. 2,599.00</span>
                </div>
                <div class="Product__SlideItem Product__SlideItem--image">
                    <img class="Image--lazyLoad Image--fadeIn"
                         data-src="//cdn.shop.com/tea-dress_{width}x.jpg"
                         data-max-width="1200">
                </div>
                <div class="Product__SlideItem Product__SlideItem--image">
                    <img class="Image--fadeIn lazyautosizes Image--lazyLoaded"
                         data-original-src="/media/tea-dress-back.jpg">
                </div>
                <span class="jdgm-prev-badge" data-average-rating="4.6"
                      data-number-of-reviews="23"></span>
                <div class="SizeSwatchList">
                    <label class="SizeSwatch">S</label>
                    <label class="SizeSwatch">M</label>
                </div>
                <div class="ColorSwatchList">
                    <label class="ColorSwatch">Emerald</label>
                </div>
                <div id="description">
                    <p>A flowing midi dress.</p>
                    <ul><li>Corset bodice</li><li>Puff sleeves</li></ul>
                    <p>Pair with heels for evenings out.</p>
                </div>
                <div id="pro-details">
                    <ul><li>Fabric: Satin</li><li>Lined</li></ul>
                </div>
                <div class="ks-table-wrapper">
                    <table class="inch-table">
                        <tr><th class="ks-table-header-cell">Size</th>
                            <th class="ks-table-header-cell">Bust</th></tr>
                        <tr><td>S</td><td>34</td></tr>
                    </table>
                    <table class="cm-table">
                        <tr><th>Size</th><th>Bust</th></tr>
                        <tr><td>S</td><td>86</td></tr>
                    </table>
                </div>
            </body></html>"#,
        )
    }

    fn empty_fragment() -> Html {
        Html::parse_fragment("<div></div>")
    }

    #[test]
    fn test_name_and_url_from_listing_fragment() {
        let fragment = Html::parse_fragment(
            r#"<div class="ProductItem">
                <h2 class="ProductItem__Title">
                    <a href="/collections/dresses/products/tea-dress">Emerald Tea Dress</a>
                </h2>
            </div>"#,
        );
        let (name, url) = profile().name_and_url(&fragment).unwrap();
        assert_eq!(name, "Emerald Tea Dress");
        assert_eq!(
            url,
            "https://www.leaclothingco.com/collections/dresses/products/tea-dress"
        );
    }

    #[test]
    fn test_name_missing_skips_product() {
        let fragment = Html::parse_fragment(r#"<div class="ProductItem"><img src="a.jpg"></div>"#);
        assert!(profile().name_and_url(&fragment).is_none());
    }

    #[test]
    fn test_prices_from_detail_page() {
        let pair = profile().prices(&empty_fragment(), &detail_page());
        assert_eq!(pair.current, Some(1299.0));
        assert_eq!(pair.original, Some(2599.0));
    }

    #[test]
    fn test_prices_missing_stay_null() {
        let detail = Html::parse_document("<html><body><p>coming soon</p></body></html>");
        let pair = profile().prices(&empty_fragment(), &detail);
        assert_eq!(pair, PricePair::default());
    }

    #[test]
    fn test_slide_images_resolve_templates_and_relative_urls() {
        let images = profile().images(&empty_fragment(), &detail_page());
        assert_eq!(
            images,
            vec![
                "https://cdn.shop.com/tea-dress_1200x.jpg".to_string(),
                "https://www.leaclothingco.com/media/tea-dress-back.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_image_fallback_to_listing_block() {
        let detail = Html::parse_document(
            r#"<html><body><div class="ProductItem">
                <div class="ProductItem__ImageWrapper">
                    <img class="ProductItem__Image"
                         data-srcset="//cdn.shop.com/a.jpg 200w, //cdn.shop.com/b.jpg 800w">
                    <img class="ProductItem__Image ProductItem__Image--alternate"
                         data-srcset="//cdn.shop.com/alt.jpg 600w">
                </div>
            </div></body></html>"#,
        );
        let images = profile().images(&empty_fragment(), &detail);
        assert_eq!(
            images,
            vec![
                "https://cdn.shop.com/b.jpg".to_string(),
                "https://cdn.shop.com/alt.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_rating_and_review_count() {
        let (rating, reviews) = profile().rating(&empty_fragment(), &detail_page());
        assert_eq!(rating, Some(4.6));
        assert_eq!(reviews, Some(23));
    }

    #[test]
    fn test_sizes_and_swatch_colors() {
        let p = profile();
        assert_eq!(p.sizes(&empty_fragment(), &detail_page()), vec!["S", "M"]);
        assert_eq!(
            p.swatch_colors(&empty_fragment(), &detail_page()),
            vec!["Emerald"]
        );
    }

    #[test]
    fn test_size_chart_dual_units() {
        let chart = profile().size_chart(&detail_page());
        assert_eq!(chart.inches["S"]["Bust"], "34");
        assert_eq!(chart.cm["S"]["Bust"], "86");
    }

    #[test]
    fn test_size_chart_absent_yields_empty_maps() {
        let detail = Html::parse_document("<html><body></body></html>");
        assert!(profile().size_chart(&detail).is_empty());
    }

    #[test]
    fn test_description_assembly() {
        let description = profile().description(&detail_page()).unwrap();
        assert!(description.starts_with("A flowing midi dress."));
        assert!(description.contains("Features:\n- Corset bodice\n- Puff sleeves\n"));
        assert!(description.contains("Usage Suggestions:\nPair with heels for evenings out."));
    }

    #[test]
    fn test_product_details_list() {
        let details = profile().product_details(&detail_page());
        assert_eq!(
            details.get("Fabric"),
            Some(&DetailValue::Text("Satin".to_string()))
        );
        assert_eq!(details.get("Lined"), Some(&DetailValue::Flag(true)));
    }
}
