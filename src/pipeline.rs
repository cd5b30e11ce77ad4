use anyhow::Result;
use scraper::Html;
use tracing::{info, warn};

use crate::extractor::{ProductFragment, SiteProfile, capture_fragments};
use crate::fetcher::PageFetcher;
use crate::models::CanonicalProduct;
use crate::processor::{ExtractedFields, ProductNormalizer, TagClassifier};
use crate::storage::JsonStore;

/// Pagination driver: walks each listing URL page by page, extracts every
/// product fragment into a canonical record, and checkpoints the whole
/// accumulator to the JSON store after each completed page.
pub struct CatalogWriter<'a> {
    profile: &'a dyn SiteProfile,
    fetcher: &'a mut PageFetcher,
    classifier: &'a TagClassifier,
    normalizer: &'a ProductNormalizer,
    store: &'a JsonStore,
    max_pages: u32,
    products: Vec<CanonicalProduct>,
}

impl<'a> CatalogWriter<'a> {
    pub fn new(
        profile: &'a dyn SiteProfile,
        fetcher: &'a mut PageFetcher,
        classifier: &'a TagClassifier,
        normalizer: &'a ProductNormalizer,
        store: &'a JsonStore,
        max_pages: u32,
    ) -> Self {
        CatalogWriter {
            profile,
            fetcher,
            classifier,
            normalizer,
            store,
            max_pages,
            products: Vec::new(),
        }
    }

    pub async fn run(&mut self, listing_urls: &[String]) -> Result<usize> {
        for url in listing_urls {
            info!("Scraping listing {}", url);
            self.scrape_listing(url).await;
        }
        // Final best-effort checkpoint so the artifact reflects the full run
        // even when the last page produced nothing new.
        self.checkpoint();
        Ok(self.products.len())
    }

    async fn scrape_listing(&mut self, listing_url: &str) {
        for page in 1..=self.max_pages {
            let page_url = format!("{}?page={}", listing_url, page);
            info!("Scraping page {}/{}: {}", page, self.max_pages, page_url);

            let document = match self.fetcher.fetch_listing(&page_url).await {
                Ok(document) => document,
                Err(e) => {
                    warn!("Failed to fetch listing page {}: {}", page_url, e);
                    break;
                }
            };

            let fragments = capture_fragments(self.profile, &document);
            if fragments.is_empty() {
                info!("No products found on page {}, stopping pagination", page);
                break;
            }
            info!("Found {} product fragments on page {}", fragments.len(), page);

            let mut extracted = 0;
            for fragment in fragments {
                if let Some(product) = self.scrape_product(&fragment).await {
                    self.products.push(product);
                    extracted += 1;
                }
            }
            info!(
                "Extracted {} products from page {} ({} total)",
                extracted,
                page,
                self.products.len()
            );

            self.checkpoint();
        }
    }

    /// One product: fragment -> detail page -> extract -> classify ->
    /// normalize. Any failure drops only this product.
    async fn scrape_product(&mut self, fragment: &ProductFragment) -> Option<CanonicalProduct> {
        let fragment_doc = fragment.parse();

        let Some((name, url)) = self.profile.name_and_url(&fragment_doc) else {
            warn!("Skipping fragment without a product name");
            return None;
        };

        let detail = match self.fetcher.fetch_detail(&url).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!("Skipping product {}: {}", name, e);
                return None;
            }
        };

        let fields = extract_fields(self.profile, &fragment_doc, &detail, name, url);
        let category = self.profile.category_from_url(&fields.url);
        let tags = self.classifier.classify(
            &fields.name,
            fields.description.as_deref().unwrap_or(""),
            category.as_deref().unwrap_or(""),
        );

        let product = self.normalizer.assemble(self.profile, fields, tags);
        if product.is_none() {
            warn!("Skipping product without a usable label");
        }
        product
    }

    fn checkpoint(&self) {
        if let Err(e) = self.store.persist(&self.products) {
            warn!(
                "Checkpoint failed ({}); continuing with in-memory accumulator",
                e
            );
        }
    }
}

/// Pull every raw field for one product out of its fragment and detail
/// page. Pure over the two documents, so re-running it over an unchanged
/// page yields an identical result.
pub fn extract_fields(
    profile: &dyn SiteProfile,
    fragment: &Html,
    detail: &Html,
    name: String,
    url: String,
) -> ExtractedFields {
    let (rating, review_count) = profile.rating(fragment, detail);
    ExtractedFields {
        name,
        url,
        prices: profile.prices(fragment, detail),
        images: profile.images(fragment, detail),
        rating,
        review_count,
        sizes: profile.sizes(fragment, detail),
        swatch_colors: profile.swatch_colors(fragment, detail),
        size_chart: profile.size_chart(detail),
        size_chart_image: profile.size_chart_image(detail),
        description: profile.description(detail),
        product_details: profile.product_details(detail),
        vendor_details: profile.vendor_details(detail),
    }
}
