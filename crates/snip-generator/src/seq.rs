use crate::Generator;
use snip_core::shortcode::{ALPHABET, CODE_LENGTH};
use snip_core::ShortCode;
use std::sync::atomic::{AtomicU64, Ordering};

/// Size of the code space: 52^4.
pub const CODE_SPACE: u64 = 52 * 52 * 52 * 52;

/// A deterministic generator that walks the code space in order.
///
/// Produces `AAAA`, `AAAB`, ... `zzzz` and then wraps around. Useful for
/// reproducible tests and for seeding a fresh single-node deployment.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
        }
    }
}

impl SeqGenerator {
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    /// Creates a generator starting from a specific position in the code space.
    pub fn with_offset(offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
        }
    }

    fn encode(mut index: u64) -> String {
        let base = ALPHABET.len() as u64;
        let mut buf = [0u8; CODE_LENGTH];
        for slot in buf.iter_mut().rev() {
            *slot = ALPHABET[(index % base) as usize];
            index /= base;
        }
        buf.iter().map(|&b| b as char).collect()
    }
}

impl Default for SeqGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for SeqGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        ShortCode::new_unchecked(Self::encode(count % CODE_SPACE))
    }
}
