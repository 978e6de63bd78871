//! Loading products from a content-platform export document.
//!
//! The export has the shape
//! `{ "data": { "allContentfulProductPage": { "edges": [ { "node": { .. } } ] } } }`
//! and carries far more than the catalog needs; only the fields used for
//! listing and filtering are kept.

use std::io::Read;

use serde::Deserialize;
use thiserror::Error;

use catalog_core::Price;

use crate::catalog::Catalog;
use crate::product::ProductRecord;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to read export: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed export document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ExportDocument {
    data: ExportData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportData {
    all_contentful_product_page: ExportConnection,
}

#[derive(Debug, Deserialize)]
struct ExportConnection {
    #[serde(default)]
    edges: Vec<ExportEdge>,
}

#[derive(Debug, Deserialize)]
struct ExportEdge {
    node: ExportNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportNode {
    name: String,
    thumbnail_image: Option<ExportImage>,
    color_family: Option<Vec<ExportColor>>,
    category_tags: Option<Vec<String>>,
    shopify_product_eu: Option<ExportShopProduct>,
}

#[derive(Debug, Deserialize)]
struct ExportImage {
    file: Option<ExportFile>,
}

#[derive(Debug, Deserialize)]
struct ExportFile {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExportColor {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ExportShopProduct {
    variants: Option<ExportVariants>,
}

#[derive(Debug, Deserialize)]
struct ExportVariants {
    #[serde(default)]
    edges: Vec<ExportVariantEdge>,
}

#[derive(Debug, Deserialize)]
struct ExportVariantEdge {
    node: ExportVariant,
}

#[derive(Debug, Deserialize)]
struct ExportVariant {
    price: Option<String>,
}

impl ExportNode {
    fn first_variant_price(&self) -> Option<&str> {
        self.shopify_product_eu
            .as_ref()?
            .variants
            .as_ref()?
            .edges
            .first()?
            .node
            .price
            .as_deref()
    }

    fn thumbnail_url(&self) -> String {
        let url = self
            .thumbnail_image
            .as_ref()
            .and_then(|img| img.file.as_ref())
            .and_then(|file| file.url.as_deref())
            .unwrap_or_default();
        resolve_protocol_relative(url)
    }

    fn into_record(self) -> Option<ProductRecord> {
        let Some(raw_price) = self.first_variant_price() else {
            tracing::warn!(product = %self.name, "skipping product without a variant price");
            return None;
        };
        let price: Price = match raw_price.parse() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(product = %self.name, "skipping product with unparseable price: {e}");
                return None;
            }
        };

        let thumbnail_url = self.thumbnail_url();
        let colors = self
            .color_family
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.name);
        let tags = self.category_tags.unwrap_or_default();

        Some(
            ProductRecord::new(self.name, price)
                .with_colors(colors)
                .with_tags(tags)
                .with_thumbnail_url(thumbnail_url),
        )
    }
}

/// Image hosts hand out `//host/path` URLs; pin them to https.
fn resolve_protocol_relative(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

fn records_from(document: ExportDocument) -> Vec<ProductRecord> {
    document
        .data
        .all_contentful_product_page
        .edges
        .into_iter()
        .filter_map(|edge| edge.node.into_record())
        .collect()
}

/// Parse an export document from a string.
///
/// Products without a usable price are skipped (and logged); only a document
/// that is not the expected JSON shape at all is an error.
pub fn parse_export(json: &str) -> Result<Vec<ProductRecord>, ExportError> {
    let document: ExportDocument = serde_json::from_str(json)?;
    Ok(records_from(document))
}

/// Read an export document and build a catalog snapshot from it.
pub fn load_export<R: Read>(reader: R) -> Result<Catalog, ExportError> {
    let document: ExportDocument = serde_json::from_reader(reader)?;
    let records = records_from(document);
    tracing::debug!(products = records.len(), "catalog export loaded");
    Ok(Catalog::new(records))
}
