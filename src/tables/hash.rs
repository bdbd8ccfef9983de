// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Double-hashing probe sequences.
//!
//! The primary hash folds the key one byte at a time, multiplying by a
//! constant and adding the byte, reduced modulo the table size. The constant
//! is a prime close to 2^20.5, which spaces successive multiples about
//! size/sqrt(2) apart for any power-of-two size.
//!
//! The step accumulates twice each intermediate hash onto 1, so it is always
//! odd. With a power-of-two table an odd step is coprime to the size and the
//! probe visits every slot exactly once before repeating.

/// Hash multiplier, prime close to 2^20.5.
pub const HASH_CONST: u64 = 1_482_907;

/// Probe positions for one key, at most `size` of them.
#[derive(Debug, Clone)]
pub struct Probe {
    pos: u64,
    step: u64,
    mask: u64,
    remaining: usize,
}

/// Start the probe sequence for `key` in a table of `size` slots.
///
/// `size` must be a power of two.
pub fn probe(key: &[u8], size: usize) -> Probe {
    debug_assert!(size.is_power_of_two());
    let mask = size as u64 - 1;

    let mut hash: u64 = 0;
    let mut step: u64 = 1;
    for &byte in key {
        hash = (hash.wrapping_mul(HASH_CONST).wrapping_add(u64::from(byte))) & mask;
        step = step.wrapping_add(2 * hash);
    }

    Probe {
        pos: hash,
        step,
        mask,
        remaining: size,
    }
}

impl Iterator for Probe {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.pos;
        self.pos = self.pos.wrapping_add(self.step) & self.mask;
        Some(current as usize)
    }
}
