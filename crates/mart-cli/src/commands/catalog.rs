//! Product database import/export commands.

use std::path::Path;

use anyhow::{Context, Result};
use mart_core::{Catalog, KioskConfig};

pub fn export(catalog: &Catalog, output: &Path) -> Result<()> {
    catalog
        .export_csv(output)
        .with_context(|| format!("exporting products to {}", output.display()))?;
    println!("Exported {} products to {}", catalog.len(), output.display());
    Ok(())
}

/// Replace the product database from CSV and persist the result.
pub fn import(mut catalog: Catalog, config: &KioskConfig, input: &Path) -> Result<()> {
    let count = catalog
        .import_csv(input)
        .with_context(|| format!("importing products from {}", input.display()))?;
    catalog
        .save(&config.products_path)
        .with_context(|| format!("saving {}", config.products_path.display()))?;
    println!(
        "Imported {} products into {}",
        count,
        config.products_path.display()
    );
    Ok(())
}
