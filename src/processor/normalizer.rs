use std::collections::{BTreeMap, BTreeSet};

use crate::extractor::{PricePair, SiteProfile};
use crate::models::{CanonicalProduct, DetailValue, Price, ProductMeta, SizeChart};

/// Fixed color palette matched as substrings against name + description.
/// `colors` never carries free text: only palette entries and swatch labels.
const COLOR_PALETTE: &[&str] = &[
    "Black", "White", "Red", "Blue", "Green", "Yellow", "Pink", "Purple", "Orange", "Brown",
    "Grey", "Beige",
];

/// Raw extractor output for one product, prior to assembly.
#[derive(Debug, Clone, Default)]
pub struct ExtractedFields {
    pub name: String,
    pub url: String,
    pub prices: PricePair,
    pub images: Vec<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
    pub sizes: Vec<String>,
    pub swatch_colors: Vec<String>,
    pub size_chart: SizeChart,
    pub size_chart_image: Option<String>,
    pub description: Option<String>,
    pub product_details: BTreeMap<String, DetailValue>,
    pub vendor_details: BTreeMap<String, DetailValue>,
}

/// Pure assembly step: extractor output + classifier output in, immutable
/// `CanonicalProduct` out. Only a missing label aborts the record; every
/// other field degrades to null/empty.
pub struct ProductNormalizer;

impl ProductNormalizer {
    pub fn new() -> Self {
        ProductNormalizer
    }

    pub fn assemble(
        &self,
        profile: &dyn SiteProfile,
        fields: ExtractedFields,
        tags: Vec<String>,
    ) -> Option<CanonicalProduct> {
        let label = fields.name.trim().to_string();
        if label.is_empty() {
            return None;
        }

        let current = fields.prices.current.filter(|price| *price >= 0.0);
        let original = fields.prices.original.filter(|price| *price >= 0.0);

        let mut colors: BTreeSet<String> = fields.swatch_colors.into_iter().collect();
        colors.extend(palette_colors(
            &fields.name,
            fields.description.as_deref().unwrap_or(""),
        ));

        let currency = profile.currency();
        Some(CanonicalProduct {
            label,
            description: fields.description,
            images: fields.images,
            price: Price {
                default: current,
                original,
                currency_code: currency.code.clone(),
                currency_symbol: currency.symbol.clone(),
            },
            meta: ProductMeta {
                rating: fields.rating,
                review_count: fields.review_count,
                available_sizes: fields.sizes,
                colors,
                tags,
                size_chart: fields.size_chart,
                product_details: fields.product_details,
                vendor_details: fields.vendor_details,
                on_sale: on_sale(current, original),
                size_chart_image_url: fields.size_chart_image,
                source_url: fields.url,
            },
            vendor_id: profile.vendor_id(),
        })
    }
}

impl Default for ProductNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// On sale iff both prices are present and the compare-at price is strictly
/// higher than the selling price.
fn on_sale(current: Option<f64>, original: Option<f64>) -> bool {
    match (current, original) {
        (Some(current), Some(original)) => original > current,
        _ => false,
    }
}

/// Palette entries found case-insensitively in the name or description.
fn palette_colors(name: &str, description: &str) -> BTreeSet<String> {
    let name = name.to_lowercase();
    let description = description.to_lowercase();
    COLOR_PALETTE
        .iter()
        .filter(|color| {
            let needle = color.to_lowercase();
            name.contains(&needle) || description.contains(&needle)
        })
        .map(|color| color.to_string())
        .collect()
}
