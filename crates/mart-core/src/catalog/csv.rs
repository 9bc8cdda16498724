//! CSV import/export for the product database.
//!
//! Format: `SKU,Name,Price,Category,Description,Image` with a header row.
//! Fields containing commas or quotes are double-quoted on export and
//! unquoted on import, so round-trips are lossless.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};

use super::{Catalog, ProductRecord};

const HEADER: &str = "SKU,Name,Price,Category,Description,Image";

impl Catalog {
    /// Render the catalog as CSV, one product per row.
    pub fn to_csv(&self) -> String {
        let mut rows: Vec<&ProductRecord> = self.products().collect();
        rows.sort_by(|a, b| a.sku.cmp(&b.sku));

        let mut out = String::from(HEADER);
        out.push('\n');
        for p in rows {
            out.push_str(&format!(
                "{},{},{},{},{},{}\n",
                quote(&p.sku),
                quote(&p.name),
                p.price,
                quote(&p.category),
                quote(&p.description),
                quote(&p.image),
            ));
        }
        out
    }

    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(&path, self.to_csv())?;
        info!("Exported {} products to {:?}", self.len(), path.as_ref());
        Ok(())
    }

    /// Replace the product map with the contents of a CSV string.
    ///
    /// Shortcuts whose target SKU no longer exists are pruned to keep the
    /// catalog invariant. Returns the number of imported products.
    pub fn apply_csv(&mut self, content: &str) -> Result<usize> {
        let mut products = HashMap::new();

        for (idx, line) in content.lines().enumerate() {
            if idx == 0 || line.trim().is_empty() {
                continue;
            }
            let fields = split_row(line);
            if fields.len() < 4 {
                return Err(Error::CsvParse {
                    line: idx + 1,
                    message: format!("expected at least 4 fields, got {}", fields.len()),
                });
            }

            let price: f64 = fields[2].parse().map_err(|_| Error::CsvParse {
                line: idx + 1,
                message: format!("invalid price {:?}", fields[2]),
            })?;

            let mut record = ProductRecord::new(&fields[0], &fields[1], price, &fields[3]);
            record.description = fields.get(4).cloned().unwrap_or_default();
            record.image = fields.get(5).cloned().unwrap_or_default();
            products.insert(record.sku.clone(), record);
        }

        self.products = products;
        self.shortcuts
            .retain(|_, sku| self.products.contains_key(sku));

        Ok(self.products.len())
    }

    pub fn import_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let content = fs::read_to_string(&path)?;
        let count = self.apply_csv(&content)?;
        info!("Imported {} products from {:?}", count, path.as_ref());
        Ok(count)
    }
}

fn quote(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split one CSV row honoring double-quoted fields.
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
