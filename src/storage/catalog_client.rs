use anyhow::Result;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};
use wreq::Client;
use wreq_util::Emulation;

use crate::models::CanonicalProduct;

/// Pause between consecutive posts so the catalog service is not flooded.
const POST_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
pub struct PostSummary {
    pub total: usize,
    pub posted: usize,
    pub failed: usize,
}

/// Thin client for the downstream catalog service. Error bodies are logged
/// verbatim, never interpreted.
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().emulation(Emulation::Firefox136).build()?;
        Ok(CatalogClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// POST one product; HTTP 200 is the only success signal.
    pub async fn post_product(&self, product: &CanonicalProduct) -> bool {
        let url = format!("{}/products", self.base_url);
        match self.client.post(&url).json(product).send().await {
            Ok(response) if response.status().as_u16() == 200 => {
                info!("Posted product: {}", product.label);
                true
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                error!(
                    "Failed to post product {} (status {}): {}",
                    product.label, status, body
                );
                false
            }
            Err(e) => {
                error!("Error posting product {}: {}", product.label, e);
                false
            }
        }
    }

    pub async fn post_all(&self, products: &[CanonicalProduct]) -> PostSummary {
        let mut summary = PostSummary {
            total: products.len(),
            ..Default::default()
        };

        for (index, product) in products.iter().enumerate() {
            info!("Posting product {}/{}", index + 1, summary.total);
            if self.post_product(product).await {
                summary.posted += 1;
            } else {
                summary.failed += 1;
            }
            if index + 1 < products.len() {
                sleep(POST_DELAY).await;
            }
        }

        info!(
            "Posting summary: {} total, {} posted, {} failed",
            summary.total, summary.posted, summary.failed
        );
        summary
    }
}
