//! Lowest-set-bit extraction.
//!
//! The generated flag-decomposition step and the tests that pin down its
//! behavior share this one definition: each step extracts the lowest set
//! bit of the working value and clears it, so the remaining set-bit count
//! strictly shrinks and decomposition always terminates.

/// Extract and clear the lowest set bit of `working`.
///
/// Returns `None` once the working value is exhausted (zero).
pub fn decompose_step(working: &mut u128) -> Option<u128> {
    if *working == 0 {
        return None;
    }
    let lowest = *working & working.wrapping_neg();
    *working &= !lowest;
    Some(lowest)
}

/// Iterator over the set bits of a value, lowest first.
///
/// This is the in-pipeline model of the two-state iterator the emitter
/// generates: `Some` while bits remain, `None` once exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetBits {
    remaining: u128,
}

impl SetBits {
    pub fn new(value: u128) -> Self {
        Self { remaining: value }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

impl Iterator for SetBits {
    type Item = u128;

    fn next(&mut self) -> Option<u128> {
        decompose_step(&mut self.remaining)
    }
}
