//! Barcode input path: disambiguation, routing, and device listening.

mod disambiguator;
mod listener;
mod router;

pub use disambiguator::Disambiguator;
pub use listener::{DeviceListener, ScanSource, assemble_frame};
pub use router::{ScanMode, ScanOutcome, ScanRouter};
