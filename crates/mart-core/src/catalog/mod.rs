//! Product catalog: SKU -> product records plus single-digit shortcut aliases.
//!
//! Loaded once at startup and read-only for the rest of the session. A
//! malformed database degrades to an empty catalog at the call site rather
//! than crashing the cabinet.

mod csv;
mod product;

pub use product::ProductRecord;

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};

/// On-disk shape of `products.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    skus: HashMap<String, ProductRecord>,
    #[serde(default)]
    keyboard_shortcuts: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: HashMap<String, ProductRecord>,
    /// Single-digit key -> SKU. Every target SKU exists in `products`.
    shortcuts: HashMap<char, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the catalog from a JSON database file.
    ///
    /// A missing file falls back to the built-in demo catalog (and writes it
    /// back so the manager tools have something to edit). A malformed file is
    /// a `CatalogLoad` error; callers degrade to an empty catalog.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "Product database {:?} not found, using built-in defaults",
                    path.as_ref()
                );
                let catalog = Self::default_products();
                if let Err(e) = catalog.save(&path) {
                    warn!("Failed to write default product database: {}", e);
                }
                Ok(catalog)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: CatalogFile =
            serde_json::from_str(content).map_err(|e| Error::CatalogLoad(e.to_string()))?;
        Ok(Self::from_parts(file.skus, file.keyboard_shortcuts))
    }

    /// Build a catalog from raw maps, enforcing the shortcut invariant:
    /// a shortcut must be a single digit and its target SKU must exist.
    /// Violations are dropped with a warning, never fatal.
    fn from_parts(
        mut products: HashMap<String, ProductRecord>,
        raw_shortcuts: HashMap<String, String>,
    ) -> Self {
        for (sku, record) in products.iter_mut() {
            record.sku = sku.clone();
        }

        let mut shortcuts = HashMap::new();
        for (key, sku) in raw_shortcuts {
            let mut chars = key.chars();
            let digit = match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_digit() => c,
                _ => {
                    warn!("Dropping invalid shortcut key {:?}", key);
                    continue;
                }
            };
            if !products.contains_key(&sku) {
                warn!("Dropping shortcut {:?} -> unknown SKU {}", key, sku);
                continue;
            }
            shortcuts.insert(digit, sku);
        }

        Self {
            products,
            shortcuts,
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = CatalogFile {
            skus: self.products.clone(),
            keyboard_shortcuts: self
                .shortcuts
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        };
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    /// Direct SKU lookup.
    pub fn get(&self, sku: &str) -> Option<&ProductRecord> {
        self.products.get(sku)
    }

    /// Whether `code` is a known SKU (used by the disambiguator's
    /// short-code fast path).
    pub fn contains(&self, code: &str) -> bool {
        self.products.contains_key(code)
    }

    /// Resolve a completed code or shortcut key to a product.
    ///
    /// Shortcut indirection is checked first so a single digit always means
    /// the aliased product, then direct SKU lookup. Returns the resolved SKU
    /// so cart lines are keyed by the real product, not the alias.
    pub fn lookup(&self, code: &str) -> Option<(&str, &ProductRecord)> {
        let mut chars = code.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && let Some(sku) = self.shortcuts.get(&c)
        {
            return self.products.get(sku).map(|p| (sku.as_str(), p));
        }
        self.products
            .get_key_value(code)
            .map(|(sku, p)| (sku.as_str(), p))
    }

    pub fn has_shortcut(&self, key: char) -> bool {
        self.shortcuts.contains_key(&key)
    }

    pub fn products(&self) -> impl Iterator<Item = &ProductRecord> {
        self.products.values()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The built-in demo catalog used when no database file exists yet.
    pub fn default_products() -> Self {
        let items: [(&str, &str, f64, &str, &str, &str); 10] = [
            ("7501234567890", "White Bread", 2.20, "Bakery", "Fresh white bread loaf", "images/bread.png"),
            ("7501234567891", "Whole Milk", 2.80, "Dairy", "1 liter whole milk", "images/milk.png"),
            ("7501234567892", "Red Apples", 1.50, "Produce", "Fresh red apples per kg", "images/apples.png"),
            ("7501234567893", "Spaghetti Pasta", 1.30, "Pantry", "500g spaghetti pasta", "images/pasta.png"),
            ("7501234567894", "Cheddar Cheese", 3.90, "Dairy", "Sharp cheddar cheese block", "images/cheese.png"),
            ("7501234567895", "Bananas", 0.80, "Produce", "Fresh bananas per kg", "images/bananas.png"),
            ("7501234567896", "Corn Flakes", 4.50, "Breakfast", "Large box corn flakes cereal", "images/cereal.png"),
            ("7501234567897", "Greek Yogurt", 2.60, "Dairy", "Plain Greek yogurt 500g", "images/yogurt.png"),
            ("7501234567898", "Wheat Crackers", 2.90, "Snacks", "Whole wheat crackers", "images/crackers.png"),
            ("7501234567899", "Orange Juice", 2.40, "Beverages", "Fresh orange juice 1L", "images/juice.png"),
        ];

        let mut products = HashMap::new();
        let mut shortcuts = HashMap::new();
        for (i, (sku, name, price, category, description, image)) in items.iter().enumerate() {
            let mut record = ProductRecord::new(sku, name, *price, category);
            record.description = description.to_string();
            record.image = image.to_string();
            products.insert(sku.to_string(), record);

            // 1..9 then 0, matching the demo cabinet layout
            let key = char::from_digit(((i + 1) % 10) as u32, 10).unwrap();
            shortcuts.insert(key, sku.to_string());
        }

        Self {
            products,
            shortcuts,
        }
    }
}
