//! Item name generation
//!
//! Names look like `block_core_lq3k8z2a_00f`: a prefix, a base-36 epoch taken
//! once when the generator is built, and a 3-digit base-36 sequence number.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of unique item names, passed explicitly to construction sites
pub trait IdGenerator {
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Process-local sequential names
#[derive(Debug, Clone)]
pub struct SequentialIds {
    epoch: String,
    seq: u32,
}

impl SequentialIds {
    /// Stamp names with the current wall-clock time in milliseconds
    pub fn new() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self::with_epoch(millis)
    }

    /// Stamp names with a fixed epoch (deterministic names for tests and replays)
    pub fn with_epoch(epoch_ms: u64) -> Self {
        Self {
            epoch: to_base36(epoch_ms),
            seq: 0,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        let seq = to_base36(u64::from(self.seq & 0xFFFF));
        self.seq = self.seq.wrapping_add(1);
        format!("{}_{}_{:0>3}", prefix, self.epoch, seq)
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
