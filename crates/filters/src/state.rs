//! Filter state: the single source of truth for what the user is looking at.

use std::collections::BTreeSet;

use catalog_core::{Price, ValueObject};
use catalog_products::{PriceLimits, normalize_label};

/// Selected price window. Always ordered (`min <= max`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PriceRange {
    min: Price,
    max: Price,
}

impl ValueObject for PriceRange {}

impl PriceRange {
    /// An inverted pair collapses onto `min` (`max` is raised to it), so a
    /// `min` above `max` still selects nothing instead of a different window.
    pub fn new(min: Price, max: Price) -> Self {
        Self { min, max: max.max(min) }
    }

    pub fn min(&self) -> Price {
        self.min
    }

    pub fn max(&self) -> Price {
        self.max
    }
}

impl From<PriceLimits> for PriceRange {
    fn from(limits: PriceLimits) -> Self {
        Self::new(limits.min, limits.max)
    }
}

/// Immutable filter state.
///
/// Colors and tags are stored normalized (see [`normalize_label`]); an empty
/// set means "no restriction" on that dimension. Equality and hashing are
/// structural, so a state rebuilt from the same parameters compares equal to
/// the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterState {
    colors: BTreeSet<String>,
    tags: BTreeSet<String>,
    price_range: PriceRange,
}

impl ValueObject for FilterState {}

fn normalized_set<I, S>(labels: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .map(|l| normalize_label(l.as_ref()))
        .filter(|l| !l.is_empty())
        .collect()
}

impl FilterState {
    pub fn new<C, T, S1, S2>(colors: C, tags: T, price_range: PriceRange) -> Self
    where
        C: IntoIterator<Item = S1>,
        T: IntoIterator<Item = S2>,
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        Self {
            colors: normalized_set(colors),
            tags: normalized_set(tags),
            price_range,
        }
    }

    /// No color or tag restriction, price window equal to the catalog limits.
    pub fn unrestricted(limits: PriceLimits) -> Self {
        Self {
            colors: BTreeSet::new(),
            tags: BTreeSet::new(),
            price_range: limits.into(),
        }
    }

    pub fn with_colors<I, S>(&self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            colors: normalized_set(colors),
            ..self.clone()
        }
    }

    pub fn with_tags<I, S>(&self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: normalized_set(tags),
            ..self.clone()
        }
    }

    pub fn with_price_range(&self, price_range: PriceRange) -> Self {
        Self {
            price_range,
            ..self.clone()
        }
    }

    pub fn colors(&self) -> &BTreeSet<String> {
        &self.colors
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn price_range(&self) -> PriceRange {
        self.price_range
    }
}
