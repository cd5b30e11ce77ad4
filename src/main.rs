use anyhow::{Context, Result};
use std::env;
use std::path::Path;
use tracing::{error, info, warn};

use config::SiteConfig;
use extractor::profile_for;
use fetcher::PageFetcher;
use pipeline::CatalogWriter;
use processor::{ProductNormalizer, TagClassifier};
use storage::{CatalogClient, JsonStore};

mod config;
mod extractor;
mod fetcher;
mod models;
mod pipeline;
mod processor;
mod storage;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    info!("🚀 Starting storefront catalog pipeline");

    // Define all available storefronts
    let sources = vec![
        ("lea", "src/configs/lea.toml"),
        ("burgerbae", "src/configs/burgerbae.toml"),
    ];

    let mut total_products = 0;
    let mut successful_sources = 0;

    for (source_name, config_path) in &sources {
        info!("\n=== Scraping storefront: {} ===", source_name);

        if !Path::new(config_path).exists() {
            warn!("Config file not found for {}: {}", source_name, config_path);
            continue;
        }

        match scrape_source(source_name, config_path).await {
            Ok(products_count) => {
                info!(
                    "✅ Successfully scraped {} with {} products",
                    source_name, products_count
                );
                total_products += products_count;
                successful_sources += 1;
            }
            Err(e) => {
                error!("❌ Failed to scrape {}: {}", source_name, e);
                // Continue with other storefronts even if one fails
            }
        }
    }

    info!("\n=== Catalog Pipeline Summary ===");
    info!(
        "✅ Successfully scraped {} out of {} storefronts",
        successful_sources,
        sources.len()
    );
    info!("📊 Total products extracted: {}", total_products);

    // Optionally push every artifact to the catalog service
    if let Ok(api_url) = env::var("CATALOG_API_URL") {
        for (source_name, config_path) in &sources {
            if !Path::new(config_path).exists() {
                continue;
            }
            if let Err(e) = post_source(source_name, config_path, &api_url).await {
                error!("❌ Failed to post {} to catalog service: {}", source_name, e);
            }
        }
    } else {
        info!("CATALOG_API_URL not set, skipping catalog service upload");
    }

    Ok(())
}

async fn scrape_source(source_name: &str, config_path: &str) -> Result<usize> {
    let config = SiteConfig::from_file(config_path)
        .with_context(|| format!("Failed to load config for {}", source_name))?;

    info!(
        "Loaded config for {}: {} listing URLs, up to {} pages each",
        source_name,
        config.listing_urls.len(),
        config.scraping.max_pages
    );

    let profile = profile_for(&config)?;
    let mut fetcher = PageFetcher::new(
        config.scraping.retry,
        config.scraping.listing_delay,
        config.scraping.detail_delay,
    )?;
    let classifier = TagClassifier::new();
    let normalizer = ProductNormalizer::new();
    let store = JsonStore::new(&config.output.path);

    let mut writer = CatalogWriter::new(
        profile.as_ref(),
        &mut fetcher,
        &classifier,
        &normalizer,
        &store,
        config.scraping.max_pages,
    );
    writer.run(&config.listing_urls).await
}

async fn post_source(source_name: &str, config_path: &str, api_url: &str) -> Result<()> {
    let config = SiteConfig::from_file(config_path)
        .with_context(|| format!("Failed to load config for {}", source_name))?;

    let store = JsonStore::new(&config.output.path);
    let products = store
        .load()
        .with_context(|| format!("No artifact to post for {}", source_name))?;

    info!(
        "Posting {} products from {} to {}",
        products.len(),
        source_name,
        api_url
    );
    let client = CatalogClient::new(api_url)?;
    let summary = client.post_all(&products).await;

    if summary.failed > 0 {
        warn!(
            "{} of {} products failed to post for {}",
            summary.failed, summary.total, source_name
        );
    }
    Ok(())
}
