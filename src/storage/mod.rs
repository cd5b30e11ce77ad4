pub mod catalog_client;
pub mod closet;
pub mod json_store;

pub use catalog_client::{CatalogClient, PostSummary};
pub use closet::{ClosetPrefs, StoredProduct, filter_for_closet};
pub use json_store::JsonStore;
