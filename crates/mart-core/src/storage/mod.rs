//! Persistence collaborators: receipt files.

mod receipts;

pub use receipts::ReceiptWriter;
