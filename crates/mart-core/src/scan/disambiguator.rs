//! Barcode input disambiguation.
//!
//! Scanner devices emulate very fast keyboard input and some firmware never
//! sends a terminator, so the same character stream can mean "human pressing
//! keys" or "scanner burst". Classification is by cadence: characters
//! arriving faster than `scanner_speed_threshold_ms` are scanner-origin and
//! accumulate; a slow keystroke over a non-empty buffer restarts it as
//! manual entry.
//!
//! ## Completion rules
//!
//! - buffer reaches `short_code_len` (8) *and* exactly matches a known SKU:
//!   emit immediately (demo codes resolve without waiting for full length)
//! - buffer reaches `long_code_len` (13): emit regardless of the catalog,
//!   lookup failure is handled downstream
//! - explicit submit (Enter/ack): strip noise, accept only known codes
//!
//! A human typing two digits inside the threshold is misclassified as a
//! scanner burst. Accepted for cabinet usage patterns, not a defect.

use tracing::debug;

use crate::catalog::Catalog;
use crate::config::ScanTuning;

#[derive(Debug, Clone)]
pub struct Disambiguator {
    tuning: ScanTuning,
    buffer: String,
    /// When the current buffer was (re)started.
    started_ms: u64,
    /// When the previous character was appended.
    last_char_ms: u64,
}

impl Disambiguator {
    pub fn new(tuning: ScanTuning) -> Self {
        Self {
            tuning,
            buffer: String::new(),
            started_ms: 0,
            last_char_ms: 0,
        }
    }

    /// Current partial buffer, for "Scanning: ..." feedback.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Feed one character event. Returns a completed code at most once per
    /// physical scan; the buffer is cleared on emission.
    pub fn on_character(&mut self, ch: char, now_ms: u64, catalog: &Catalog) -> Option<String> {
        if !self.buffer.is_empty()
            && now_ms.saturating_sub(self.started_ms) > self.tuning.buffer_timeout_ms
        {
            debug!(buffer = %self.buffer, "barcode buffer timed out, clearing");
            self.buffer.clear();
        }

        // Device noise and control characters never touch the buffer
        if !ch.is_ascii_alphanumeric() {
            return None;
        }

        let is_fast =
            now_ms.saturating_sub(self.last_char_ms) < self.tuning.scanner_speed_threshold_ms;

        if self.buffer.is_empty() || is_fast {
            if self.buffer.is_empty() {
                self.started_ms = now_ms;
            }
            self.buffer.push(ch);
            self.last_char_ms = now_ms;

            if self.buffer.len() >= self.tuning.short_code_len {
                if catalog.contains(&self.buffer) {
                    debug!(code = %self.buffer, "short code matched catalog");
                    return Some(std::mem::take(&mut self.buffer));
                }
                if self.buffer.len() >= self.tuning.long_code_len {
                    debug!(code = %self.buffer, "full-length barcode complete");
                    return Some(std::mem::take(&mut self.buffer));
                }
            }
            None
        } else {
            // Slow keystroke over a partial buffer: the partial scan is
            // abandoned and this press starts fresh manual entry
            debug!(discarded = %self.buffer, "manual keystroke, restarting buffer");
            self.buffer.clear();
            self.buffer.push(ch);
            self.started_ms = now_ms;
            self.last_char_ms = now_ms;
            None
        }
    }

    /// Explicit completion signal (Enter or device acknowledgement).
    ///
    /// Strips non-alphanumeric noise from `raw`; accepts only codes of at
    /// least short length that the catalog knows. On rejection the caller
    /// reports the unknown code and clears the buffer itself.
    pub fn on_submit(&mut self, raw: &str, catalog: &Catalog) -> Option<String> {
        let clean: String = raw.chars().filter(char::is_ascii_alphanumeric).collect();
        if clean.len() >= self.tuning.short_code_len && catalog.contains(&clean) {
            self.buffer.clear();
            Some(clean)
        } else {
            None
        }
    }
}
