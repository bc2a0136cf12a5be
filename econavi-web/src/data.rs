//! Catalog loading from embedded static assets
//!
//! Two catalog configurations ship with the app: the seasonal-backgrounds
//! table (the default) and the higher-priced deluxe theme table. Both are
//! embedded at compile time and parsed once per session.

use econavi_rewards::{Catalog, CatalogSource};
use once_cell::sync::Lazy;

static SEASONAL: Lazy<Result<Catalog, String>> = Lazy::new(|| {
    Catalog::from_json(include_str!("../static/assets/data/catalog.json"))
        .map_err(|e| e.to_string())
});

static DELUXE: Lazy<Result<Catalog, String>> = Lazy::new(|| {
    Catalog::from_json(include_str!("../static/assets/data/catalog-deluxe.json"))
        .map_err(|e| e.to_string())
});

/// Which embedded catalog configuration to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogVariant {
    #[default]
    Seasonal,
    Deluxe,
}

#[derive(Debug, thiserror::Error)]
pub enum WebCatalogError {
    #[error("embedded catalog is invalid: {0}")]
    Invalid(String),
}

/// Catalog source over the embedded JSON assets.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebCatalogLoader {
    variant: CatalogVariant,
}

impl WebCatalogLoader {
    #[must_use]
    pub const fn new(variant: CatalogVariant) -> Self {
        Self { variant }
    }
}

impl CatalogSource for WebCatalogLoader {
    type Error = WebCatalogError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        let parsed = match self.variant {
            CatalogVariant::Seasonal => &*SEASONAL,
            CatalogVariant::Deluxe => &*DELUXE,
        };
        parsed
            .clone()
            .map_err(WebCatalogError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalogs_parse_and_validate() {
        let seasonal = WebCatalogLoader::new(CatalogVariant::Seasonal)
            .load_catalog()
            .unwrap();
        assert_eq!(seasonal.items().len(), 10);
        assert!(seasonal.find_item("bg-new-year").is_some());

        let deluxe = WebCatalogLoader::new(CatalogVariant::Deluxe)
            .load_catalog()
            .unwrap();
        assert_eq!(deluxe.items().len(), 5);
        assert_eq!(deluxe.find_item("color-fresh-leaf").unwrap().price, 0);
    }
}
