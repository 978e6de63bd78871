//! `catalog-core`: foundation building blocks shared by the catalog crates.
//!
//! This crate contains **pure** value types (no IO, no HTTP, no storage).

pub mod error;
pub mod price;
pub mod value_object;

pub use error::CatalogError;
pub use price::Price;
pub use value_object::ValueObject;
