use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to load catalog: {0}")]
    CatalogLoad(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("CSV parse error on line {line}: {message}")]
    CsvParse { line: usize, message: String },

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
