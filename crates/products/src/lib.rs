//! Products domain module (read-only catalog).
//!
//! This crate contains the product record model and the catalog snapshot it is
//! browsed from, implemented as deterministic logic. The only IO is reading a
//! catalog export document handed in by the caller.

pub mod catalog;
pub mod export;
pub mod product;

pub use catalog::{Catalog, Facets, PriceLimits};
pub use export::{ExportError, load_export, parse_export};
pub use product::{ColorFamily, ProductRecord, normalize_label};
