use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::models::CanonicalProduct;

/// When the preference filter eliminates everything, fall back to an
/// unfiltered sample of this many products.
#[allow(dead_code)]
pub const FALLBACK_SAMPLE_SIZE: usize = 50;

/// A product as returned by the catalog service: the canonical record plus
/// its service-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProduct {
    pub id: Uuid,
    #[serde(flatten)]
    pub product: CanonicalProduct,
}

/// The current user's closet state: which vendors they follow and which
/// products they have already swiped on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClosetPrefs {
    pub preferred_vendors: Vec<Uuid>,
    pub positive_ids: HashSet<Uuid>,
    pub negative_ids: HashSet<Uuid>,
}

impl ClosetPrefs {
    fn seen(&self, id: &Uuid) -> bool {
        self.positive_ids.contains(id) || self.negative_ids.contains(id)
    }
}

/// Products from allow-listed vendors the user has not swiped on yet; when
/// that set is empty, an unfiltered sample of fixed size.
#[allow(dead_code)]
pub fn filter_for_closet(products: &[StoredProduct], prefs: &ClosetPrefs) -> Vec<StoredProduct> {
    let filtered: Vec<StoredProduct> = products
        .iter()
        .filter(|entry| prefs.preferred_vendors.contains(&entry.product.vendor_id))
        .filter(|entry| !prefs.seen(&entry.id))
        .cloned()
        .collect();

    if !filtered.is_empty() {
        return filtered;
    }
    products.iter().take(FALLBACK_SAMPLE_SIZE).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Price, ProductMeta, SizeChart};
    use std::collections::BTreeMap;

    fn stored(id: u128, vendor: u128) -> StoredProduct {
        StoredProduct {
            id: Uuid::from_u128(id),
            product: CanonicalProduct {
                label: format!("Product {}", id),
                description: None,
                images: vec![],
                price: Price {
                    default: None,
                    original: None,
                    currency_code: "INR".to_string(),
                    currency_symbol: "Rs.".to_string(),
                },
                meta: ProductMeta {
                    rating: None,
                    review_count: None,
                    available_sizes: vec![],
                    colors: Default::default(),
                    tags: vec![],
                    size_chart: SizeChart::default(),
                    product_details: BTreeMap::new(),
                    vendor_details: BTreeMap::new(),
                    on_sale: false,
                    size_chart_image_url: None,
                    source_url: String::new(),
                },
                vendor_id: Uuid::from_u128(vendor),
            },
        }
    }

    #[test]
    fn test_vendor_allow_list_and_seen_exclusion() {
        let products = vec![stored(1, 10), stored(2, 10), stored(3, 20)];
        let prefs = ClosetPrefs {
            preferred_vendors: vec![Uuid::from_u128(10)],
            positive_ids: [Uuid::from_u128(1)].into_iter().collect(),
            negative_ids: HashSet::new(),
        };

        let result = filter_for_closet(&products, &prefs);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, Uuid::from_u128(2));
    }

    #[test]
    fn test_empty_filter_falls_back_to_sample() {
        let products: Vec<StoredProduct> = (0..60).map(|i| stored(i, 10)).collect();
        let prefs = ClosetPrefs {
            preferred_vendors: vec![Uuid::from_u128(99)],
            ..Default::default()
        };

        let result = filter_for_closet(&products, &prefs);
        assert_eq!(result.len(), FALLBACK_SAMPLE_SIZE);
        assert_eq!(result[0].id, Uuid::from_u128(0));
    }
}
