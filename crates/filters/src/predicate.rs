//! Product membership predicate.
//!
//! Price bounds are exclusive once narrowed: a bound that differs from the
//! catalog limit rejects products priced exactly at it, while an untouched
//! bound rejects nothing. Products priced at the true catalog extremes
//! therefore survive the default range, but the endpoint a user narrowed to
//! does not.

use catalog_products::{PriceLimits, ProductRecord, normalize_label};

use crate::state::FilterState;

fn color_matches(product: &ProductRecord, state: &FilterState) -> bool {
    if state.colors().is_empty() {
        return true;
    }
    product
        .canonical_color()
        .is_some_and(|color| state.colors().contains(&normalize_label(color)))
}

/// Any-of: one selected tag is enough.
fn tags_match(product: &ProductRecord, state: &FilterState) -> bool {
    if state.tags().is_empty() {
        return true;
    }
    product
        .tags()
        .iter()
        .any(|tag| state.tags().contains(&normalize_label(tag)))
}

fn price_matches(product: &ProductRecord, state: &FilterState, limits: PriceLimits) -> bool {
    let price = product.price();
    let range = state.price_range();

    if range.min() != limits.min && price <= range.min() {
        return false;
    }
    if range.max() != limits.max && price >= range.max() {
        return false;
    }
    true
}

/// Whether `product` is retained under `state`.
pub fn matches(product: &ProductRecord, state: &FilterState, limits: PriceLimits) -> bool {
    color_matches(product, state) && tags_match(product, state) && price_matches(product, state, limits)
}

/// Retained products, in catalog order.
pub fn filter_products<'a>(
    products: &'a [ProductRecord],
    state: &'a FilterState,
    limits: PriceLimits,
) -> impl Iterator<Item = &'a ProductRecord> + 'a {
    products.iter().filter(move |p| matches(p, state, limits))
}
