use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use catalog_products::{Catalog, load_export};

/// Shared state behind every handler: one immutable catalog snapshot.
#[derive(Debug, Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
}

impl AppServices {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Read and parse an export document from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let catalog = load_export(BufReader::new(file))
            .with_context(|| format!("failed to load catalog export {}", path.display()))?;
        Ok(Self::new(catalog))
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}
