//! Catalog snapshot: the full, read-only product list plus values derived from it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use catalog_core::{Price, ValueObject};

use crate::product::ProductRecord;

/// Global price bounds across every product of a catalog snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PriceLimits {
    pub min: Price,
    pub max: Price,
}

impl ValueObject for PriceLimits {}

impl PriceLimits {
    /// Bounds given explicitly; swapped if passed in the wrong order.
    pub fn new(a: Price, b: Price) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    /// Fold min/max over every product price. An empty catalog yields `{0, 0}`.
    pub fn from_products<'a, I>(products: I) -> Self
    where
        I: IntoIterator<Item = &'a ProductRecord>,
    {
        let mut prices = products.into_iter().map(ProductRecord::price);
        let Some(first) = prices.next() else {
            return Self::default();
        };
        prices.fold(Self { min: first, max: first }, |acc, price| Self {
            min: acc.min.min(price),
            max: acc.max.max(price),
        })
    }
}

/// Distinct filter targets offered to the user, in first-seen catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Facets {
    /// Every color name of every color family (not only canonical colors).
    pub colors: Vec<String>,
    /// Tags, trimmed.
    pub tags: Vec<String>,
    /// One price per product: the first variant's price the record was built
    /// from. Other variant prices in an export are not kept.
    pub prices: Vec<Price>,
}

impl Facets {
    pub fn collect<'a, I>(products: I) -> Self
    where
        I: IntoIterator<Item = &'a ProductRecord>,
    {
        let mut facets = Self::default();
        let mut seen_colors = HashSet::new();
        let mut seen_tags = HashSet::new();
        let mut seen_prices = HashSet::new();

        for product in products {
            for color in product.color_family() {
                if seen_colors.insert(color.name.clone()) {
                    facets.colors.push(color.name.clone());
                }
            }
            for tag in product.tags() {
                let tag = tag.trim();
                if seen_tags.insert(tag.to_string()) {
                    facets.tags.push(tag.to_string());
                }
            }
            if seen_prices.insert(product.price()) {
                facets.prices.push(product.price());
            }
        }

        facets
    }
}

/// Immutable catalog snapshot.
///
/// Price limits and facets are derived once at construction and stay valid for
/// the snapshot's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<ProductRecord>,
    limits: PriceLimits,
    facets: Facets,
}

impl Catalog {
    pub fn new(products: Vec<ProductRecord>) -> Self {
        let limits = PriceLimits::from_products(&products);
        let facets = Facets::collect(&products);
        Self {
            products,
            limits,
            facets,
        }
    }

    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    pub fn limits(&self) -> PriceLimits {
        self.limits
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
