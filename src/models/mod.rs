pub mod product;

pub use product::{CanonicalProduct, Currency, DetailValue, Price, ProductMeta, SizeChart};
