//! Per-category stopwatch accumulation.
//!
//! Two measurement styles are offered:
//!
//! - [`TimingAggregator::begin`] returns a [`TimingGuard`] that must be
//!   handed back to [`TimingAggregator::end`]. The guard is not `Copy`,
//!   so a measurement cannot be ended twice.
//! - [`ScopedTimer`] records on drop, so an early return cannot lose the
//!   measurement.

use std::time::Instant;

use perfix_core::{elapsed_ms, Accumulation, Category, MonotonicClock};

// ── CategoryTimings ────────────────────────────────────────────────

/// Accumulated milliseconds per [`Category`] for the current interval.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryTimings {
    ms: [f64; Category::COUNT],
}

impl CategoryTimings {
    /// Fold `ms` into `category` according to its [`Accumulation`].
    ///
    /// Negative or non-finite inputs are treated as zero.
    pub fn record(&mut self, category: Category, ms: f64) {
        let ms = if ms.is_finite() && ms > 0.0 { ms } else { 0.0 };
        let slot = &mut self.ms[category.index()];
        match category.accumulation() {
            Accumulation::Additive => *slot += ms,
            Accumulation::Assign => *slot = ms,
        }
    }

    /// Current total for `category`.
    #[inline]
    pub fn get(&self, category: Category) -> f64 {
        self.ms[category.index()]
    }

    /// Sum of several categories.
    pub fn sum(&self, categories: &[Category]) -> f64 {
        categories.iter().map(|c| self.get(*c)).sum()
    }

    /// Force `category` back to zero.
    pub fn clear(&mut self, category: Category) {
        self.ms[category.index()] = 0.0;
    }

    /// `(category, ms)` pairs in category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.iter().map(|c| (*c, self.get(*c)))
    }

    /// Zero every category.
    pub fn reset(&mut self) {
        self.ms = [0.0; Category::COUNT];
    }
}

// ── TimingAggregator ───────────────────────────────────────────────

/// Start timestamp of an in-flight measurement.
#[must_use = "a timing guard records nothing until passed to `end`"]
#[derive(Debug)]
pub struct TimingGuard {
    start: Instant,
}

/// Named-category stopwatch accumulator.
#[derive(Clone, Debug, Default)]
pub struct TimingAggregator {
    timings: CategoryTimings,
}

impl TimingAggregator {
    /// Create an aggregator with every category at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture a start timestamp.
    #[inline]
    pub fn begin(&self, clock: &dyn MonotonicClock) -> TimingGuard {
        TimingGuard { start: clock.now() }
    }

    /// Close a measurement, fold it into `category`, and return the
    /// elapsed milliseconds.
    #[inline]
    pub fn end(
        &mut self,
        guard: TimingGuard,
        category: Category,
        clock: &dyn MonotonicClock,
    ) -> f64 {
        let ms = elapsed_ms(guard.start, clock.now());
        self.timings.record(category, ms);
        ms
    }

    /// Fold an externally measured duration into `category`.
    pub fn record(&mut self, category: Category, ms: f64) {
        self.timings.record(category, ms);
    }

    /// Force `category` to zero for this interval.
    pub fn clear(&mut self, category: Category) {
        self.timings.clear(category);
    }

    /// Current totals.
    pub fn timings(&self) -> &CategoryTimings {
        &self.timings
    }

    /// Zero every category.
    pub fn reset(&mut self) {
        self.timings.reset();
    }
}

// ── ScopedTimer ────────────────────────────────────────────────────

/// Measurement that records into its category when dropped.
pub struct ScopedTimer<'a> {
    aggregator: &'a mut TimingAggregator,
    clock: &'a dyn MonotonicClock,
    category: Category,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    /// Start measuring `category`.
    pub fn new(
        aggregator: &'a mut TimingAggregator,
        clock: &'a dyn MonotonicClock,
        category: Category,
    ) -> Self {
        let start = clock.now();
        Self {
            aggregator,
            clock,
            category,
            start,
        }
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        let ms = elapsed_ms(self.start, self.clock.now());
        self.aggregator.record(self.category, ms);
    }
}
