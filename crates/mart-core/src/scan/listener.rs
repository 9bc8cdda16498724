//! Background listener for serial barcode devices.
//!
//! The listener thread only assembles raw device chunks into candidate codes
//! and pushes them onto a channel. It never touches catalog, cart, or
//! session state; the game loop drains the channel once per tick and routes
//! each code like a keyboard completion event.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

/// Minimum length a device frame must reach to count as a barcode.
const MIN_CODE_LEN: usize = 8;

/// A raw chunk source, usually a serial port.
///
/// `read_chunk` returns `Ok(None)` when no data is waiting; it must not
/// block for long, the listener sleeps between polls itself.
pub trait ScanSource: Send {
    fn read_chunk(&mut self) -> io::Result<Option<String>>;
}

/// Assemble device chunks into complete codes.
///
/// A chunk that already looks like a whole barcode passes through directly;
/// partial frames accumulate in `pending` until the total qualifies. Noise
/// (short non-alphanumeric fragments) poisons the pending buffer until the
/// next qualifying read, matching scanner firmware that interleaves frames.
pub fn assemble_frame(pending: &mut String, chunk: &str) -> Option<String> {
    let text = chunk.trim();
    if text.is_empty() {
        return None;
    }

    if text.len() >= MIN_CODE_LEN && text.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Some(text.to_string());
    }

    pending.push_str(text);
    if pending.len() >= MIN_CODE_LEN && pending.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Some(std::mem::take(pending));
    }
    None
}

/// Handle to a spawned device listener thread.
pub struct DeviceListener {
    rx: Receiver<String>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl DeviceListener {
    pub fn spawn<S: ScanSource + 'static>(mut source: S) -> Self {
        let (tx, rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::spawn(move || {
            let mut pending = String::new();
            while flag.load(Ordering::Relaxed) {
                match source.read_chunk() {
                    Ok(Some(chunk)) => {
                        if let Some(code) = assemble_frame(&mut pending, &chunk) {
                            debug!(code = %code, "device listener queued barcode");
                            if tx.send(code).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(None) => thread::sleep(Duration::from_millis(10)),
                    Err(e) => {
                        warn!("scan device read error: {}", e);
                        thread::sleep(Duration::from_millis(100));
                    }
                }
            }
        });

        Self {
            rx,
            running,
            handle: Some(handle),
        }
    }

    /// Drain all queued codes without blocking. Empty queue yields an empty
    /// vec and the caller proceeds immediately.
    pub fn try_drain(&self) -> Vec<String> {
        self.rx.try_iter().collect()
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for DeviceListener {
    fn drop(&mut self) {
        self.shutdown();
    }
}
