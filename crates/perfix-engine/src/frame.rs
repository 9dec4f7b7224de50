//! Dual-timebase frame clock.
//!
//! Wall time between ticks shows real stutter, including stalls outside
//! the simulation; simulated time shows logical-time drift. Both are kept
//! so a slowdown can be attributed to compute or to the environment.

use std::time::Instant;

use perfix_core::elapsed_ms;

use crate::spike::SpikeDetector;

/// Frame-time accumulators for the current reporting interval.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameTimingState {
    wall_total: f64,
    wall_min: Option<f64>,
    wall_max: f64,
    wall_count: u32,
    sim_total: f64,
    sim_max: f64,
    sim_count: u32,
}

impl FrameTimingState {
    /// Fold in one wall frame duration.
    pub fn record_wall(&mut self, ms: f64) {
        self.wall_total += ms;
        self.wall_count += 1;
        self.wall_max = self.wall_max.max(ms);
        self.wall_min = Some(self.wall_min.map_or(ms, |m| m.min(ms)));
    }

    /// Fold in one simulated frame duration.
    pub fn record_sim(&mut self, ms: f64) {
        self.sim_total += ms;
        self.sim_count += 1;
        self.sim_max = self.sim_max.max(ms);
    }

    /// Average wall frame time, or 0 with no samples.
    pub fn avg_wall_ms(&self) -> f64 {
        mean(self.wall_total, self.wall_count)
    }

    /// Average simulated frame time, or 0 with no samples.
    pub fn avg_sim_ms(&self) -> f64 {
        mean(self.sim_total, self.sim_count)
    }

    /// Shortest wall frame, or 0 with no samples.
    pub fn min_wall_ms(&self) -> f64 {
        self.wall_min.unwrap_or(0.0)
    }

    /// Longest wall frame, or 0 with no samples.
    pub fn max_wall_ms(&self) -> f64 {
        self.wall_max
    }

    /// Longest simulated frame, or 0 with no samples.
    pub fn max_sim_ms(&self) -> f64 {
        self.sim_max
    }

    /// Wall samples folded in since the last reset.
    pub fn wall_count(&self) -> u32 {
        self.wall_count
    }

    /// Simulated samples folded in since the last reset.
    pub fn sim_count(&self) -> u32 {
        self.sim_count
    }

    /// Sum of wall frame durations.
    pub fn wall_total_ms(&self) -> f64 {
        self.wall_total
    }

    /// Sum of simulated frame durations.
    pub fn sim_total_ms(&self) -> f64 {
        self.sim_total
    }

    /// Clear every accumulator.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn mean(total: f64, count: u32) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / f64::from(count)
    }
}

/// Samples wall and simulated time once per tick.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    state: FrameTimingState,
    last: Option<Instant>,
}

impl FrameClock {
    /// Create a clock with no prior timestamp.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample wall time at `now`.
    ///
    /// The very first sample only stores the timestamp. Later samples
    /// feed the delta to the interval state and to `spikes`, and return it.
    pub fn sample_wall(&mut self, now: Instant, spikes: &mut SpikeDetector) -> Option<f64> {
        let delta = self.last.map(|prev| elapsed_ms(prev, now));
        if let Some(ms) = delta {
            self.state.record_wall(ms);
            spikes.record(ms);
        }
        self.last = Some(now);
        delta
    }

    /// Record the engine-supplied simulated delta (seconds).
    ///
    /// Non-finite or negative deltas are recorded as zero.
    pub fn sample_sim(&mut self, dt_secs: f64) {
        let ms = if dt_secs.is_finite() && dt_secs > 0.0 {
            dt_secs * 1000.0
        } else {
            0.0
        };
        self.state.record_sim(ms);
    }

    /// Whether a prior wall timestamp exists.
    pub fn has_prior_timestamp(&self) -> bool {
        self.last.is_some()
    }

    /// Interval accumulators.
    pub fn state(&self) -> &FrameTimingState {
        &self.state
    }

    /// Clear the interval accumulators.
    ///
    /// The prior timestamp is kept so the frame in flight across the
    /// reset is still measured.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Clear the accumulators and forget the prior timestamp, so the next
    /// wall sample starts a fresh measurement instead of spanning a pause.
    pub fn suspend(&mut self) {
        self.state.reset();
        self.last = None;
    }
}
