use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::error::Result;

/// Writes completed-checkout receipts as plain text files.
///
/// One line per receipt line, no machine-parseable structure. Files are
/// named `receipt_<unix_ts>.txt` inside the configured directory.
#[derive(Debug, Clone)]
pub struct ReceiptWriter {
    dir: PathBuf,
}

impl ReceiptWriter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn write(&self, lines: &[String]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self
            .dir
            .join(format!("receipt_{}.txt", Local::now().timestamp()));
        fs::write(&path, lines.join("\n"))?;
        info!("Wrote receipt to {:?}", path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_receipt() {
        let dir = TempDir::new().unwrap();
        let writer = ReceiptWriter::new(dir.path());

        let lines = vec!["ASTRID MART".to_string(), "TOTAL: €5.80".to_string()];
        let path = writer.write(&lines).unwrap();

        assert!(path.exists());
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "ASTRID MART\nTOTAL: €5.80");
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let writer = ReceiptWriter::new(dir.path().join("receipts"));
        let path = writer.write(&["x".to_string()]).unwrap();
        assert!(path.exists());
    }
}
