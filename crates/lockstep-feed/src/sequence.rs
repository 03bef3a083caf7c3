#![forbid(unsafe_code)]

//! Monotonic key generator for freshly fetched items.
//!
//! Server payloads cannot be trusted to carry stable, unique ids across
//! pages (the same record can appear twice, or ids can collide between
//! sources). Re-keying every incoming item through one sequence makes
//! reconciliation identity a local guarantee.

use lockstep_core::Key;

/// Hands out [`Key::Int`] values 1, 2, 3, … — never the same one twice.
#[derive(Debug)]
pub struct IdSequence {
    next: i64,
}

impl IdSequence {
    /// A fresh sequence starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// The next key. Monotonically increasing.
    pub fn next(&mut self) -> Key {
        let key = Key::Int(self.next);
        self.next += 1;
        key
    }

    /// How many keys have been handed out so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        (self.next - 1) as u64
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
