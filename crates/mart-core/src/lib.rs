pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod learning;
pub mod scan;
pub mod session;
pub mod storage;

pub use cart::{Cart, CartLine, ReceiptEntry, RemovedLine};
pub use catalog::{Catalog, ProductRecord};
pub use config::{KioskConfig, ScanTuning};
pub use error::{Error, Result};
pub use learning::{EvalOutcome, LearningSession};
pub use scan::{
    DeviceListener, Disambiguator, ScanMode, ScanOutcome, ScanRouter, ScanSource, assemble_frame,
};
pub use session::{GameButton, GameClock, InputEvent, Kiosk, Mode, PaymentStep};
pub use storage::ReceiptWriter;
