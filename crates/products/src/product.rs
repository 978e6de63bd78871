use serde::{Deserialize, Serialize};

use catalog_core::Price;

/// Normalize a color or tag label for comparison and storage.
///
/// Trims surrounding whitespace, strips one leading `#` and lower-cases the
/// rest, so `" # Mid-Heels "` and `"mid-heels"` compare equal.
pub fn normalize_label(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_hash = trimmed.strip_prefix('#').unwrap_or(trimmed);
    without_hash.trim().to_lowercase()
}

/// One entry of a product's color family list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorFamily {
    pub name: String,
}

impl ColorFamily {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A single catalog product, as listed and filtered.
///
/// Records are immutable once built; the price is parsed exactly once when the
/// record is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    name: String,
    #[serde(default)]
    color_family: Vec<ColorFamily>,
    #[serde(default)]
    tags: Vec<String>,
    price: Price,
    #[serde(default)]
    thumbnail_url: String,
}

impl ProductRecord {
    pub fn new(name: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            color_family: Vec::new(),
            tags: Vec::new(),
            price,
            thumbnail_url: String::new(),
        }
    }

    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.color_family = colors.into_iter().map(ColorFamily::new).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_thumbnail_url(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = url.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color_family(&self) -> &[ColorFamily] {
        &self.color_family
    }

    /// The first color of the family; the product's single representative color.
    pub fn canonical_color(&self) -> Option<&str> {
        self.color_family.first().map(|c| c.name.as_str())
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn thumbnail_url(&self) -> &str {
        &self.thumbnail_url
    }
}
