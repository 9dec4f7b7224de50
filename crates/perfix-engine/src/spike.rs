//! Rolling spike detection and performance grading.
//!
//! [`SpikeDetector`] keeps a bounded FIFO of recent wall frame durations
//! plus interval counters of frames over the warn and severe thresholds.
//! Resetting clears only the counters: the window keeps rolling across
//! report boundaries so trends survive while interval statistics restart.

use std::collections::VecDeque;
use std::fmt;

// ── Grade ──────────────────────────────────────────────────────────

/// Letter grade for an average wall frame time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    /// Average ≤ 8 ms.
    #[default]
    S,
    /// Average in (8, 12] ms.
    A,
    /// Average in (12, 16.67] ms.
    B,
    /// Average in (16.67, 25] ms.
    C,
    /// Average in (25, 33.33] ms.
    D,
    /// Average > 33.33 ms.
    F,
}

/// Ascending grade thresholds (ms) and the grade earned by exceeding each.
const GRADE_STEPS: [(f64, Grade); 5] = [
    (8.0, Grade::A),
    (12.0, Grade::B),
    (16.67, Grade::C),
    (25.0, Grade::D),
    (33.33, Grade::F),
];

impl Grade {
    /// Grade of the highest threshold strictly exceeded by `avg_wall_ms`.
    pub fn classify(avg_wall_ms: f64) -> Self {
        GRADE_STEPS
            .iter()
            .take_while(|(threshold, _)| avg_wall_ms > *threshold)
            .last()
            .map_or(Grade::S, |(_, grade)| *grade)
    }

    /// The grade letter.
    pub fn letter(self) -> char {
        match self {
            Self::S => 'S',
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::F => 'F',
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

// ── SpikeStatus ────────────────────────────────────────────────────

/// Worst spike class seen during the current interval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum SpikeStatus {
    /// No frame crossed the warn threshold.
    #[default]
    Clean,
    /// At least one frame crossed the warn threshold, none the severe one.
    Warn,
    /// At least one frame crossed the severe threshold.
    Severe,
}

impl SpikeStatus {
    /// Tag appended to the report title.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Clean => "",
            Self::Warn => " [!]",
            Self::Severe => " [!!!]",
        }
    }
}

// ── SpikeDetector ──────────────────────────────────────────────────

/// Rolling window of wall frame durations with interval spike counters.
#[derive(Clone, Debug)]
pub struct SpikeDetector {
    window: VecDeque<f64>,
    capacity: usize,
    warn_ms: f64,
    severe_ms: f64,
    warn_count: u32,
    severe_count: u32,
}

impl SpikeDetector {
    /// Create a detector keeping `capacity` samples (at least one).
    pub fn new(capacity: usize, warn_ms: f64, severe_ms: f64) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            warn_ms,
            severe_ms,
            warn_count: 0,
            severe_count: 0,
        }
    }

    /// Record one wall frame duration.
    pub fn record(&mut self, wall_ms: f64) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(wall_ms);
        if wall_ms > self.warn_ms {
            self.warn_count += 1;
        }
        if wall_ms > self.severe_ms {
            self.severe_count += 1;
        }
    }

    /// Frames over the warn threshold since the last reset.
    pub fn warn_count(&self) -> u32 {
        self.warn_count
    }

    /// Frames over the severe threshold since the last reset.
    pub fn severe_count(&self) -> u32 {
        self.severe_count
    }

    /// Worst spike class since the last reset.
    pub fn status(&self) -> SpikeStatus {
        if self.severe_count > 0 {
            SpikeStatus::Severe
        } else if self.warn_count > 0 {
            SpikeStatus::Warn
        } else {
            SpikeStatus::Clean
        }
    }

    /// Grade for `avg_wall_ms`. See [`Grade::classify`].
    pub fn grade(&self, avg_wall_ms: f64) -> Grade {
        Grade::classify(avg_wall_ms)
    }

    /// Zero the interval counters. The window is kept.
    pub fn reset(&mut self) {
        self.warn_count = 0;
        self.severe_count = 0;
    }

    /// Samples currently in the window, oldest first.
    pub fn window(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.window.iter().copied()
    }

    /// Number of samples in the window.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Mean of the window, or 0 when empty.
    pub fn window_mean(&self) -> f64 {
        if self.window.is_empty() {
            0.0
        } else {
            self.window.iter().sum::<f64>() / self.window.len() as f64
        }
    }

    /// Largest sample in the window, or 0 when empty.
    pub fn window_max(&self) -> f64 {
        self.window.iter().copied().fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn detector() -> SpikeDetector {
        SpikeDetector::new(60, 20.0, 33.33)
    }

    #[test]
    fn counts_example_sequence() {
        let mut d = detector();
        for ms in [10.0, 15.0, 25.0, 40.0] {
            d.record(ms);
        }
        assert_eq!(d.warn_count(), 2);
        assert_eq!(d.severe_count(), 1);
        assert_eq!(d.status(), SpikeStatus::Severe);
    }

    #[test]
    fn thresholds_are_strict() {
        let mut d = detector();
        d.record(20.0);
        d.record(33.33);
        assert_eq!(d.warn_count(), 1);
        assert_eq!(d.severe_count(), 0);
        assert_eq!(d.status(), SpikeStatus::Warn);
    }

    #[test]
    fn grade_table() {
        assert_eq!(Grade::classify(5.0), Grade::S);
        assert_eq!(Grade::classify(10.0), Grade::A);
        assert_eq!(Grade::classify(14.0), Grade::B);
        assert_eq!(Grade::classify(20.0), Grade::C);
        assert_eq!(Grade::classify(22.5), Grade::C);
        assert_eq!(Grade::classify(30.0), Grade::D);
        assert_eq!(Grade::classify(40.0), Grade::F);
    }

    #[test]
    fn grade_boundaries_belong_below() {
        assert_eq!(Grade::classify(8.0), Grade::S);
        assert_eq!(Grade::classify(16.67), Grade::B);
        assert_eq!(Grade::classify(33.33), Grade::D);
        assert_eq!(Grade::classify(0.0), Grade::S);
    }

    #[test]
    fn window_evicts_oldest() {
        let mut d = SpikeDetector::new(3, 20.0, 33.33);
        for ms in [1.0, 2.0, 3.0, 4.0] {
            d.record(ms);
        }
        assert_eq!(d.window().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(d.window_max(), 4.0);
        assert!((d.window_mean() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn zero_capacity_keeps_latest_sample() {
        let mut d = SpikeDetector::new(0, 20.0, 33.33);
        d.record(5.0);
        d.record(9.0);
        assert_eq!(d.window().collect::<Vec<_>>(), vec![9.0]);
    }

    #[test]
    fn reset_keeps_history() {
        let mut d = detector();
        d.record(50.0);
        d.record(25.0);
        d.reset();
        assert_eq!(d.warn_count(), 0);
        assert_eq!(d.severe_count(), 0);
        assert_eq!(d.status(), SpikeStatus::Clean);
        assert_eq!(d.len(), 2);
        assert_eq!(d.window_max(), 50.0);
    }

    #[test]
    fn empty_window_stats_are_zero() {
        let d = detector();
        assert!(d.is_empty());
        assert_eq!(d.window_mean(), 0.0);
        assert_eq!(d.window_max(), 0.0);
    }

    #[test]
    fn status_tags() {
        assert_eq!(SpikeStatus::Clean.tag(), "");
        assert_eq!(SpikeStatus::Warn.tag(), " [!]");
        assert_eq!(SpikeStatus::Severe.tag(), " [!!!]");
    }

    proptest! {
        #[test]
        fn counters_match_filters(samples in prop::collection::vec(0.0f64..100.0, 0..300)) {
            let mut d = detector();
            for &ms in &samples {
                d.record(ms);
            }
            let warn = samples.iter().filter(|&&ms| ms > 20.0).count() as u32;
            let severe = samples.iter().filter(|&&ms| ms > 33.33).count() as u32;
            prop_assert_eq!(d.warn_count(), warn);
            prop_assert_eq!(d.severe_count(), severe);
            prop_assert!(d.severe_count() <= d.warn_count());
            prop_assert!(d.len() <= 60);
        }

        #[test]
        fn grade_is_monotonic(a in 0.0f64..100.0, b in 0.0f64..100.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(Grade::classify(lo) <= Grade::classify(hi));
        }
    }
}
