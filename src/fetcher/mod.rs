pub mod page_fetcher;
pub mod retry;

pub use page_fetcher::{DelayRange, FetchError, PageFetcher, Throttle};
pub use retry::RetryPolicy;
