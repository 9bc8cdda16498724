//! Kiosk configuration.
//!
//! Loaded once at startup from a JSON file. Every field has a default so a
//! missing or partial file never blocks the cabinet from booting.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Timing constants for the barcode input path.
///
/// `buffer_timeout_ms` must stay above the worst-case human inter-keystroke
/// gap or manual shortcut entry becomes unusable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanTuning {
    /// Buffer is invalidated if it was started longer ago than this.
    pub buffer_timeout_ms: u64,
    /// Characters arriving faster than this are treated as scanner-origin.
    pub scanner_speed_threshold_ms: u64,
    /// Minimum time between two accepted scans, shared across all sources.
    pub scan_cooldown_ms: u64,
    /// Short codes resolve at this length when they match a known SKU.
    pub short_code_len: usize,
    /// Full-length barcodes resolve at this length regardless of the catalog.
    pub long_code_len: usize,
}

impl Default for ScanTuning {
    fn default() -> Self {
        Self {
            buffer_timeout_ms: 1000,
            scanner_speed_threshold_ms: 100,
            scan_cooldown_ms: 1000,
            short_code_len: 8,
            long_code_len: 13,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    pub scan: ScanTuning,
    /// Product database path.
    pub products_path: PathBuf,
    /// Directory that completed-checkout receipts are written to.
    pub receipts_dir: PathBuf,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            scan: ScanTuning::default(),
            products_path: PathBuf::from("products.json"),
            receipts_dir: PathBuf::from("."),
        }
    }
}

impl KioskConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
