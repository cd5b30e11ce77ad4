use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Canonical product record consumed by the catalog service.
///
/// Constructed once per detail-page visit by the normalizer and never
/// mutated afterwards; re-running the pipeline over the same URL yields a
/// new record rather than an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProduct {
    pub label: String,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub price: Price,
    pub meta: ProductMeta,
    pub vendor_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub default: Option<f64>,
    pub original: Option<f64>,
    pub currency_code: String,
    pub currency_symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMeta {
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
    pub available_sizes: Vec<String>,
    pub colors: BTreeSet<String>,
    pub tags: Vec<String>,
    pub size_chart: SizeChart,
    pub product_details: BTreeMap<String, DetailValue>,
    pub vendor_details: BTreeMap<String, DetailValue>,
    pub on_sale: bool,
    pub size_chart_image_url: Option<String>,
    pub source_url: String,
}

/// Dual-unit measurement table: size label -> dimension label -> value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeChart {
    pub inches: BTreeMap<String, BTreeMap<String, String>>,
    pub cm: BTreeMap<String, BTreeMap<String, String>>,
}

impl SizeChart {
    pub fn is_empty(&self) -> bool {
        self.inches.is_empty() && self.cm.is_empty()
    }
}

/// A product/vendor detail list entry: either "Key: value" text or a bare
/// bullet that acts as a boolean flag ("Dry clean only" => true).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailValue {
    Text(String),
    Flag(bool),
}

/// Fixed per-vendor currency metadata, assigned by configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub symbol: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_value_serialization() {
        let mut details = BTreeMap::new();
        details.insert("Fabric".to_string(), DetailValue::Text("Cotton".to_string()));
        details.insert("Dry clean only".to_string(), DetailValue::Flag(true));

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["Fabric"], "Cotton");
        assert_eq!(json["Dry clean only"], true);
    }

    #[test]
    fn test_size_chart_empty() {
        let chart = SizeChart::default();
        assert!(chart.is_empty());

        let mut chart = SizeChart::default();
        let mut row = BTreeMap::new();
        row.insert("Bust".to_string(), "34".to_string());
        chart.inches.insert("S".to_string(), row);
        assert!(!chart.is_empty());
    }
}
