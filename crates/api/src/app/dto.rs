use serde::{Deserialize, Serialize};

use catalog_core::Price;
use catalog_products::{Facets, PriceLimits, ProductRecord};

/// One page of filtered products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub list: Vec<ProductRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetsResponse {
    pub colors: Vec<String>,
    pub tags: Vec<String>,
    pub prices: Vec<Price>,
    pub price_limits: PriceLimits,
}

impl FacetsResponse {
    pub fn new(facets: &Facets, limits: PriceLimits) -> Self {
        Self {
            colors: facets.colors.clone(),
            tags: facets.tags.clone(),
            prices: facets.prices.clone(),
            price_limits: limits,
        }
    }
}
