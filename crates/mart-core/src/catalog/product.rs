use serde::{Deserialize, Serialize};

/// One entry in the product database.
///
/// The SKU doubles as the expected scanned barcode value. Records are
/// immutable once the catalog is loaded; `image` is an opaque asset
/// reference resolved by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Filled from the map key when the catalog file is parsed.
    #[serde(skip)]
    pub sku: String,
    pub name: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

impl ProductRecord {
    pub fn new(sku: &str, name: &str, price: f64, category: &str) -> Self {
        Self {
            sku: sku.to_string(),
            name: name.to_string(),
            price,
            category: category.to_string(),
            description: String::new(),
            image: String::new(),
        }
    }
}
