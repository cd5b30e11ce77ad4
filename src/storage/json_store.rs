use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::models::CanonicalProduct;

/// Durable checkpoint for the scrape accumulator: a pretty-printed JSON
/// array regenerated wholesale on every persist, so a late failure loses
/// nothing already written.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStore { path: path.into() }
    }

    pub fn persist(&self, products: &[CanonicalProduct]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let body = serde_json::to_vec_pretty(products)?;
        fs::write(&self.path, body)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        info!(
            "Saved {} products to {}",
            products.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn load(&self) -> Result<Vec<CanonicalProduct>> {
        let body = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let products = serde_json::from_str(&body)
            .with_context(|| format!("invalid product JSON in {}", self.path.display()))?;
        Ok(products)
    }
}
