//! Derived statistics for one reporting interval.
//!
//! [`IntervalMetrics`] is the snapshot the report formatter renders and
//! the host receives from `end_tick` when a report is emitted. It is
//! computed once per interval, just before the accumulators reset.

use perfix_core::{Category, TickId, TriggerKind};

use crate::counters::{Counter, OptimizationCounters};
use crate::frame::FrameTimingState;
use crate::scene::SceneStats;
use crate::spike::{Grade, SpikeDetector, SpikeStatus};
use crate::timing::CategoryTimings;

/// Frames per second for an average frame time, or 0 when the average is 0.
pub fn fps(avg_ms: f64) -> f64 {
    if avg_ms > 0.0 {
        1000.0 / avg_ms
    } else {
        0.0
    }
}

/// `value` as a percentage of `total`, or 0 when `total` is not positive.
pub fn percentage(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        value / total * 100.0
    } else {
        0.0
    }
}

/// Statistics for one closed reporting interval.
#[derive(Clone, Debug, Default)]
pub struct IntervalMetrics {
    /// Tick on which the interval closed.
    pub tick: TickId,
    /// Average wall frame time, in milliseconds.
    pub avg_wall_ms: f64,
    /// Shortest wall frame, in milliseconds.
    pub min_wall_ms: f64,
    /// Longest wall frame, in milliseconds.
    pub max_wall_ms: f64,
    /// Average simulated frame time, in milliseconds.
    pub avg_sim_ms: f64,
    /// Longest simulated frame, in milliseconds.
    pub max_sim_ms: f64,
    /// Wall samples in the interval.
    pub wall_samples: u32,
    /// Simulated samples in the interval.
    pub sim_samples: u32,
    /// Wall-clock frame rate.
    pub fps_wall: f64,
    /// Simulated frame rate.
    pub fps_sim: f64,
    /// Letter grade of the average wall frame time.
    pub grade: Grade,
    /// Worst spike class in the interval.
    pub spike_status: SpikeStatus,
    /// Frames over the warn threshold.
    pub warn_spikes: u32,
    /// Frames over the severe threshold.
    pub severe_spikes: u32,
    /// Warn threshold, in milliseconds.
    pub warn_threshold_ms: f64,
    /// Severe threshold, in milliseconds.
    pub severe_threshold_ms: f64,
    /// Mean of the rolling spike window.
    pub window_mean_ms: f64,
    /// Largest sample in the rolling spike window.
    pub window_max_ms: f64,
    /// Samples in the rolling spike window.
    pub window_len: usize,
    /// Per-category timings.
    pub timings: CategoryTimings,
    /// Skip counts and tallies.
    pub counters: OptimizationCounters,
    /// Scene counts from the latest tick.
    pub scene: SceneStats,
    /// Particle systems updated in the latest tick.
    pub particle_systems: u32,
    /// Estimated draw calls in the latest tick.
    pub draw_calls: u32,
}

/// Interval accumulators to derive [`IntervalMetrics`] from.
pub struct IntervalSources<'a> {
    /// Frame-time accumulators.
    pub frames: &'a FrameTimingState,
    /// Spike window and counters.
    pub spikes: &'a SpikeDetector,
    /// Category timings.
    pub timings: &'a CategoryTimings,
    /// Optimization counters.
    pub counters: &'a OptimizationCounters,
    /// Latest scene counts.
    pub scene: &'a SceneStats,
}

impl IntervalMetrics {
    /// Derive the interval statistics.
    pub fn collect(
        tick: TickId,
        src: IntervalSources<'_>,
        warn_threshold_ms: f64,
        severe_threshold_ms: f64,
        shader_draw_call_cost: u32,
    ) -> Self {
        let avg_wall_ms = src.frames.avg_wall_ms();
        let avg_sim_ms = src.frames.avg_sim_ms();
        let particle_systems = src.counters.particle_systems();
        Self {
            tick,
            avg_wall_ms,
            min_wall_ms: src.frames.min_wall_ms(),
            max_wall_ms: src.frames.max_wall_ms(),
            avg_sim_ms,
            max_sim_ms: src.frames.max_sim_ms(),
            wall_samples: src.frames.wall_count(),
            sim_samples: src.frames.sim_count(),
            fps_wall: fps(avg_wall_ms),
            fps_sim: fps(avg_sim_ms),
            grade: src.spikes.grade(avg_wall_ms),
            spike_status: src.spikes.status(),
            warn_spikes: src.spikes.warn_count(),
            severe_spikes: src.spikes.severe_count(),
            warn_threshold_ms,
            severe_threshold_ms,
            window_mean_ms: src.spikes.window_mean(),
            window_max_ms: src.spikes.window_max(),
            window_len: src.spikes.len(),
            timings: src.timings.clone(),
            counters: src.counters.clone(),
            scene: *src.scene,
            particle_systems,
            draw_calls: src
                .scene
                .draw_call_estimate(particle_systems, shader_draw_call_cost),
        }
    }

    /// Move plus rotation action time.
    pub fn core_actions_ms(&self) -> f64 {
        self.timings
            .sum(&[Category::MoveActions, Category::RotationActions])
    }

    /// All four action categories.
    pub fn all_actions_ms(&self) -> f64 {
        self.timings.sum(&[
            Category::MoveActions,
            Category::RotationActions,
            Category::TransformActions,
            Category::AreaActions,
        ])
    }

    /// Denominator of the detail breakdown: main update plus shader visit.
    pub fn breakdown_total_ms(&self) -> f64 {
        self.timings
            .sum(&[Category::Update, Category::ShaderVisit])
    }

    /// `ms` as a share of [`breakdown_total_ms`](Self::breakdown_total_ms).
    pub fn share(&self, ms: f64) -> f64 {
        percentage(ms, self.breakdown_total_ms())
    }

    /// Skip count for `counter`.
    pub fn skipped(&self, counter: Counter) -> u32 {
        self.counters.get(counter)
    }

    /// Trigger tally for `kind`.
    pub fn triggers(&self, kind: TriggerKind) -> u32 {
        self.counters.trigger_count(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(
        frames: &FrameTimingState,
        spikes: &SpikeDetector,
        timings: &CategoryTimings,
        counters: &OptimizationCounters,
    ) -> IntervalMetrics {
        IntervalMetrics::collect(
            TickId(30),
            IntervalSources {
                frames,
                spikes,
                timings,
                counters,
                scene: &SceneStats::default(),
            },
            20.0,
            33.33,
            5,
        )
    }

    #[test]
    fn fps_of_zero_is_zero() {
        assert_eq!(fps(0.0), 0.0);
        assert!((fps(16.0) - 62.5).abs() < 1e-9);
    }

    #[test]
    fn percentage_of_empty_total_is_zero() {
        assert_eq!(percentage(3.0, 0.0), 0.0);
        assert_eq!(percentage(3.0, -1.0), 0.0);
        assert!((percentage(1.0, 4.0) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn empty_interval_derives_zeroes() {
        let m = collect(
            &FrameTimingState::default(),
            &SpikeDetector::new(60, 20.0, 33.33),
            &CategoryTimings::default(),
            &OptimizationCounters::new(),
        );
        assert_eq!(m.fps_wall, 0.0);
        assert_eq!(m.fps_sim, 0.0);
        assert_eq!(m.grade, Grade::S);
        assert_eq!(m.spike_status, SpikeStatus::Clean);
        assert_eq!(m.share(m.timings.get(Category::Particle)), 0.0);
        assert_eq!(m.draw_calls, 0);
    }

    #[test]
    fn derived_values_follow_accumulators() {
        let mut frames = FrameTimingState::default();
        let mut spikes = SpikeDetector::new(60, 20.0, 33.33);
        for ms in [10.0, 30.0] {
            frames.record_wall(ms);
            spikes.record(ms);
        }
        frames.record_sim(1000.0 / 60.0);
        let mut timings = CategoryTimings::default();
        timings.record(Category::Update, 6.0);
        timings.record(Category::ShaderVisit, 2.0);
        timings.record(Category::Particle, 2.0);
        let m = collect(&frames, &spikes, &timings, &OptimizationCounters::new());
        assert!((m.avg_wall_ms - 20.0).abs() < 1e-9);
        assert!((m.fps_wall - 50.0).abs() < 1e-9);
        assert!((m.fps_sim - 60.0).abs() < 1e-6);
        assert_eq!(m.grade, Grade::C);
        assert_eq!(m.spike_status, SpikeStatus::Warn);
        assert!((m.share(m.timings.get(Category::Particle)) - 25.0).abs() < 1e-9);
    }
}
