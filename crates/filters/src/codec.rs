//! Conversion between [`FilterState`] and [`QueryParams`].
//!
//! Decoding never fails: anything malformed degrades to the catalog default for
//! that dimension. Encoding is canonical and minimal: dimensions left at their
//! defaults produce no parameter at all.

use catalog_core::Price;
use catalog_products::PriceLimits;

use crate::params::{ParamKey, ParamValue, QueryParams};
use crate::state::{FilterState, PriceRange};

/// Largest whole-unit amount that still fits a [`Price`].
const MAX_WHOLE_UNITS: f64 = (u64::MAX / 100) as f64;

fn labels(params: &QueryParams, key: ParamKey) -> Vec<&str> {
    params.get(key).map(ParamValue::values).unwrap_or_default()
}

/// A price bound is honored only when given once and integral.
///
/// Accepts the same spellings a browser number parse would (`"10"`, `" 10 "`,
/// `"10.0"`, `"1e2"`); rejects fractions, negatives, empty strings and
/// non-numbers.
fn whole_price(value: &ParamValue) -> Option<Price> {
    let raw = value.as_single()?.trim();
    if raw.is_empty() {
        return None;
    }
    let n: f64 = raw.parse().ok()?;
    if !n.is_finite() || n.fract() != 0.0 || n < 0.0 || n > MAX_WHOLE_UNITS {
        return None;
    }
    Some(Price::from_units(n as u64))
}

fn bound(params: &QueryParams, key: ParamKey, default: Price) -> Price {
    params.get(key).and_then(whole_price).unwrap_or(default)
}

/// Decode filter state from query parameters.
pub fn decode(params: &QueryParams, limits: PriceLimits) -> FilterState {
    let min = bound(params, ParamKey::Min, limits.min);
    let max = bound(params, ParamKey::Max, limits.max);

    FilterState::new(
        labels(params, ParamKey::Color),
        labels(params, ParamKey::Tag),
        PriceRange::new(min, max),
    )
}

/// Encode filter state as its canonical, minimal parameter map.
pub fn encode(state: &FilterState, limits: PriceLimits) -> QueryParams {
    let mut params = QueryParams::new();

    if !state.colors().is_empty() {
        params.set(
            ParamKey::Color,
            ParamValue::Many(state.colors().iter().cloned().collect()),
        );
    }
    if !state.tags().is_empty() {
        params.set(
            ParamKey::Tag,
            ParamValue::Many(state.tags().iter().cloned().collect()),
        );
    }

    let range = state.price_range();
    if range.min() != limits.min {
        params.set(ParamKey::Min, ParamValue::Single(range.min().to_compact_string()));
    }
    if range.max() != limits.max {
        params.set(ParamKey::Max, ParamValue::Single(range.max().to_compact_string()));
    }

    params
}

/// Page index of a paged fetch; missing or malformed means the first page.
pub fn decode_cursor(params: &QueryParams) -> usize {
    params
        .get(ParamKey::Cursor)
        .and_then(ParamValue::as_single)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(0)
}
