pub mod normalizer;
pub mod tag_classifier;

pub use normalizer::{ExtractedFields, ProductNormalizer};
pub use tag_classifier::TagClassifier;
