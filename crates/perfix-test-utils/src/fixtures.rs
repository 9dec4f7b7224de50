//! Reusable operation and frame-sequence fixtures.
//!
//! - [`CountingOperation`]: counts runs and records gate side effects.
//! - [`SleepOperation`]: "takes" a fixed time by advancing a [`ManualClock`].
//! - [`jittered_frames`]: seeded frame-time sequences.

use std::rc::Rc;

use perfix_core::{CallAttrs, HostEffect, Operation};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ManualClock;

/// Operation that counts how often it ran and which effects it received.
#[derive(Debug, Default)]
pub struct CountingOperation {
    pub runs: usize,
    pub effects: Vec<HostEffect>,
    pub attrs: CallAttrs,
}

impl CountingOperation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attrs(attrs: CallAttrs) -> Self {
        Self {
            attrs,
            ..Self::default()
        }
    }
}

impl Operation for CountingOperation {
    type Output = usize;

    fn run(&mut self) -> usize {
        self.runs += 1;
        self.runs
    }

    fn attrs(&self) -> CallAttrs {
        self.attrs
    }

    fn apply(&mut self, effect: HostEffect) {
        self.effects.push(effect);
    }
}

/// Operation whose run advances a shared [`ManualClock`] by `ms`.
pub struct SleepOperation {
    clock: Rc<ManualClock>,
    ms: f64,
    pub runs: usize,
}

impl SleepOperation {
    pub fn new(clock: Rc<ManualClock>, ms: f64) -> Self {
        Self { clock, ms, runs: 0 }
    }
}

impl Operation for SleepOperation {
    type Output = ();

    fn run(&mut self) {
        self.clock.advance_ms(self.ms);
        self.runs += 1;
    }
}

/// `n` frame durations of `base_ms ± jitter_ms`, reproducible from `seed`.
///
/// Values are clamped at zero.
pub fn jittered_frames(seed: u64, n: usize, base_ms: f64, jitter_ms: f64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let unit = (rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
            (base_ms + (unit * 2.0 - 1.0) * jitter_ms).max(0.0)
        })
        .collect()
}
