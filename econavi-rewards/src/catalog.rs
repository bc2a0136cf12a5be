//! Catalog data and seasonal availability
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Sales window for seasonal catalog items.
///
/// Months are 0-indexed (January = 0) to match the host page's date source.
/// Each season covers a fixed three-month band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Whether the given 0-indexed month falls inside this season's band.
    #[must_use]
    pub const fn contains_month0(self, month0: u32) -> bool {
        match self {
            Season::Spring => matches!(month0, 2..=4),
            Season::Summer => matches!(month0, 5..=7),
            Season::Autumn => matches!(month0, 8..=10),
            Season::Winter => matches!(month0, 11 | 0 | 1),
        }
    }
}

/// What a catalog item changes when applied as a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Cosmetic theme color, applied as a body class only
    Color,
    /// Background image, applied as a body class plus an inline image
    Background,
}

/// A single purchasable item. Static configuration, never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    /// Price in points; zero is legal (free default themes)
    pub price: u32,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Image path, required for background items
    #[serde(default)]
    pub image: Option<String>,
    /// Sales window; absent means always available
    #[serde(default)]
    pub season: Option<Season>,
}

impl CatalogItem {
    /// Whether this item is purchasable in the given 0-indexed month.
    #[must_use]
    pub fn available_in(&self, month0: u32) -> bool {
        self.season.is_none_or(|s| s.contains_month0(month0))
    }
}

/// Validation failures raised when constructing a [`Catalog`].
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate item id: {id}")]
    DuplicateId { id: String },
    #[error("background item {id} has no image")]
    MissingImage { id: String },
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// An ordered list of catalog items.
///
/// Order is meaningful: the store renders items in catalog order, so the
/// serialized form is an array rather than a keyed map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogDoc")]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

#[derive(Deserialize)]
struct CatalogDoc {
    items: Vec<CatalogItem>,
}

impl TryFrom<CatalogDoc> for Catalog {
    type Error = CatalogError;

    fn try_from(doc: CatalogDoc) -> Result<Self, Self::Error> {
        Catalog::new(doc.items)
    }
}

impl Catalog {
    /// Build a catalog from an item list, validating unique ids and that
    /// background items carry an image.
    ///
    /// # Errors
    ///
    /// Returns an error for a duplicate id or a background item without an
    /// image path.
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: item.id.clone(),
                });
            }
            if item.kind == ItemKind::Background && item.image.is_none() {
                return Err(CatalogError::MissingImage {
                    id: item.id.clone(),
                });
            }
        }
        Ok(Self { items })
    }

    /// Load a catalog from a JSON document of the form `{ "items": [...] }`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// All items in catalog order.
    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Find an item by id.
    #[must_use]
    pub fn find_item(&self, item_id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Items purchasable in the given 0-indexed month, catalog order
    /// preserved. An empty result is a valid state the caller must handle.
    #[must_use]
    pub fn available_items(&self, month0: u32) -> Vec<&CatalogItem> {
        self.items
            .iter()
            .filter(|item| item.available_in(month0))
            .collect()
    }

    /// The built-in seasonal-backgrounds configuration: four always-on
    /// seasonal backgrounds plus six season-windowed event backgrounds.
    #[must_use]
    pub fn default_config() -> Self {
        fn bg(id: &str, name: &str, price: u32, image: &str, season: Option<Season>) -> CatalogItem {
            CatalogItem {
                id: id.to_string(),
                name: name.to_string(),
                price,
                kind: ItemKind::Background,
                image: Some(image.to_string()),
                season,
            }
        }

        let items = vec![
            bg("bg-spring", "Seasonal Background: Spring", 10, "images/spring.png", None),
            bg("bg-summer", "Seasonal Background: Summer", 10, "images/summer.png", None),
            bg("bg-fall", "Seasonal Background: Fall", 10, "images/fall.png", None),
            bg("bg-winter", "Seasonal Background: Winter", 10, "images/winter.png", None),
            bg(
                "bg-fresh-green",
                "Event Background: Fresh Green",
                20,
                "images/fresh-green.png",
                Some(Season::Spring),
            ),
            bg(
                "bg-fireworks",
                "Event Background: Fireworks",
                20,
                "images/fireworks.png",
                Some(Season::Summer),
            ),
            bg(
                "bg-summer-clouds",
                "Event Background: Thunderhead Clouds",
                20,
                "images/summer-clouds.png",
                Some(Season::Summer),
            ),
            bg(
                "bg-autumn-reading",
                "Event Background: Autumn Reading",
                20,
                "images/autumn-reading.png",
                Some(Season::Autumn),
            ),
            bg(
                "bg-snowy",
                "Event Background: Snowy Landscape",
                20,
                "images/snowy-landscape.png",
                Some(Season::Winter),
            ),
            bg(
                "bg-new-year",
                "Event Background: New Year",
                20,
                "images/new-year.png",
                Some(Season::Winter),
            ),
        ];
        Self::new(items).expect("built-in catalog is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_json() {
        let json = r#"{
            "items": [
                { "id": "color-mint", "name": "Theme Color: Mint", "price": 0, "type": "color" },
                { "id": "bg-dunes", "name": "Background: Dunes", "price": 20, "type": "background",
                  "image": "images/dunes.png", "season": "summer" }
            ]
        }"#;

        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.items().len(), 2);
        let dunes = catalog.find_item("bg-dunes").unwrap();
        assert_eq!(dunes.kind, ItemKind::Background);
        assert_eq!(dunes.season, Some(Season::Summer));
        assert_eq!(catalog.find_item("color-mint").unwrap().price, 0);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let item = CatalogItem {
            id: "twin".to_string(),
            name: "Twin".to_string(),
            price: 5,
            kind: ItemKind::Color,
            image: None,
            season: None,
        };
        let err = Catalog::new(vec![item.clone(), item]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { id } if id == "twin"));
    }

    #[test]
    fn rejects_background_without_image() {
        let item = CatalogItem {
            id: "bg-hole".to_string(),
            name: "Hole".to_string(),
            price: 5,
            kind: ItemKind::Background,
            image: None,
            season: None,
        };
        let err = Catalog::new(vec![item]).unwrap_err();
        assert!(matches!(err, CatalogError::MissingImage { id } if id == "bg-hole"));
    }

    #[test]
    fn season_bands_cover_expected_months() {
        assert!(Season::Spring.contains_month0(2));
        assert!(Season::Spring.contains_month0(4));
        assert!(!Season::Spring.contains_month0(5));
        assert!(Season::Summer.contains_month0(7));
        assert!(Season::Autumn.contains_month0(8));
        // Winter wraps the year boundary.
        assert!(Season::Winter.contains_month0(11));
        assert!(Season::Winter.contains_month0(0));
        assert!(Season::Winter.contains_month0(1));
        assert!(!Season::Winter.contains_month0(2));
    }

    #[test]
    fn items_without_season_are_always_available() {
        let catalog = Catalog::default_config();
        let spring_bg = catalog.find_item("bg-spring").unwrap();
        for month0 in 0..12 {
            assert!(spring_bg.available_in(month0));
        }
    }

    #[test]
    fn available_items_preserves_catalog_order() {
        let catalog = Catalog::default_config();
        let december = catalog.available_items(11);
        let ids: Vec<&str> = december.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(
            ids,
            ["bg-spring", "bg-summer", "bg-fall", "bg-winter", "bg-snowy", "bg-new-year"]
        );
    }
}
