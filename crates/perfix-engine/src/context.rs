//! The profiler context owned by the host integration.
//!
//! [`ProfilerContext`] holds every piece of profiler state and is passed
//! by `&mut` into each wrapped call. A tick looks like:
//!
//! 1. [`begin_tick`](ProfilerContext::begin_tick): settings refresh, then
//!    wall/sim frame sampling.
//! 2. Any number of [`invoke`](ProfilerContext::invoke) calls, each gated
//!    and timed per its [`CallSite`] policy.
//! 3. [`end_tick`](ProfilerContext::end_tick): scene stats, and on the
//!    report cadence, rendering followed by the interval reset.

use perfix_core::{
    CallAttrs, Category, ConfigSnapshot, ConfigSource, DisplaySurface, MonotonicClock, Operation,
    OptionKey, TickId,
};
use tracing::info;

use crate::config::{ConfigError, ProfilerConfig};
use crate::counters::OptimizationCounters;
use crate::frame::{FrameClock, FrameTimingState};
use crate::gate::{GateVerdict, ThrottleGate};
use crate::metrics::{IntervalMetrics, IntervalSources};
use crate::ops::{chain, Invoke};
use crate::report::ReportFormatter;
use crate::scene::SceneStats;
use crate::settings::SettingsCache;
use crate::sites::{CallSite, Tally, TimingSpec};
use crate::spike::SpikeDetector;
use crate::timing::{CategoryTimings, ScopedTimer, TimingAggregator, TimingGuard};

/// All profiler state for one simulation.
pub struct ProfilerContext {
    config: ProfilerConfig,
    clock: Box<dyn MonotonicClock>,
    settings: SettingsCache,
    frame: FrameClock,
    spikes: SpikeDetector,
    timings: TimingAggregator,
    gate: ThrottleGate,
    counters: OptimizationCounters,
    report: ReportFormatter,
    scene: SceneStats,
    tick: TickId,
    enabled: bool,
    panels_shown: bool,
}

impl ProfilerContext {
    /// Validate `config` and build a context.
    ///
    /// Settings are read from `source` immediately so the first tick's
    /// gate decisions already see a populated snapshot.
    pub fn new(
        config: ProfilerConfig,
        clock: impl MonotonicClock + 'static,
        source: &dyn ConfigSource,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut settings = SettingsCache::new(config.settings_refresh_secs);
        settings.refresh_now(source);
        let enabled = settings.get(OptionKey::ShowProfiler);
        info!(
            report_interval = config.report_interval_secs,
            refresh_interval = config.settings_refresh_secs,
            enabled,
            "profiler context created"
        );
        Ok(Self {
            spikes: SpikeDetector::new(
                config.spike_window_len,
                config.warn_threshold_ms,
                config.severe_threshold_ms,
            ),
            gate: ThrottleGate::new(config.spawn_min_gap),
            report: ReportFormatter::new(config.report_interval_secs),
            clock: Box::new(clock),
            settings,
            frame: FrameClock::new(),
            timings: TimingAggregator::new(),
            counters: OptimizationCounters::new(),
            scene: SceneStats::default(),
            tick: TickId::default(),
            enabled,
            panels_shown: false,
            config,
        })
    }

    // ── Tick lifecycle ─────────────────────────────────────────────

    /// Start a tick with simulated delta `dt` (seconds).
    ///
    /// Advances the tick counter, refreshes settings if due, and, when
    /// the profiler is shown, samples simulated and wall frame time.
    pub fn begin_tick(&mut self, dt: f64, source: &dyn ConfigSource) {
        self.tick = self.tick.next();
        self.settings.refresh_if_due(dt, source);
        self.counters.begin_tick();
        self.gate.prune(self.tick);

        let enabled = self.settings.get(OptionKey::ShowProfiler);
        if enabled != self.enabled {
            info!(enabled, tick = self.tick.0, "profiler display toggled");
            if enabled {
                // Gating and timing kept accumulating while hidden.
                self.reset_interval();
                self.report.restart();
            } else {
                self.frame.suspend();
            }
            self.enabled = enabled;
        }

        if self.enabled {
            self.frame.sample_sim(dt);
            let now = self.clock.now();
            self.frame.sample_wall(now, &mut self.spikes);
        }
    }

    /// Finish a tick.
    ///
    /// Stores `scene`, and when a reporting interval closes renders the
    /// panels to `surface`, resets the interval accumulators and returns
    /// the interval's metrics. While the profiler is hidden, the panels
    /// are hidden once and nothing is reported.
    pub fn end_tick(
        &mut self,
        dt: f64,
        scene: SceneStats,
        surface: &mut dyn DisplaySurface,
    ) -> Option<IntervalMetrics> {
        self.scene = scene;

        if !self.enabled {
            if self.panels_shown {
                surface.hide_primary();
                surface.hide_detail();
                self.panels_shown = false;
            }
            return None;
        }

        if !self.report.advance(dt) {
            return None;
        }

        let metrics = self.collect_metrics();
        let detail = self.settings.get(OptionKey::ShowDetailedProfiler);
        self.report.render(&metrics, detail, surface);
        self.panels_shown = true;
        self.reset_interval();
        Some(metrics)
    }

    /// Derive metrics from the current accumulators without resetting.
    pub fn collect_metrics(&self) -> IntervalMetrics {
        IntervalMetrics::collect(
            self.tick,
            IntervalSources {
                frames: self.frame.state(),
                spikes: &self.spikes,
                timings: self.timings.timings(),
                counters: &self.counters,
                scene: &self.scene,
            },
            self.config.warn_threshold_ms,
            self.config.severe_threshold_ms,
            self.config.shader_draw_call_cost,
        )
    }

    /// Zero frame stats, category timings, counters and spike counts.
    ///
    /// The spike window, the prior wall timestamp and the throttle
    /// markers are kept.
    pub fn reset_interval(&mut self) {
        self.frame.reset();
        self.timings.reset();
        self.counters.reset();
        self.spikes.reset();
    }

    // ── Gated calls ────────────────────────────────────────────────

    /// Gate decision for one call at `site`, with tallies, counters and
    /// skip-time zeroing applied.
    pub fn decide(&mut self, site: CallSite, attrs: CallAttrs) -> GateVerdict {
        let policy = site.policy();
        match policy.tally {
            Some(Tally::ParticleUpdate) => self.counters.note_particle_update(),
            Some(Tally::ParticleAdd) => self.counters.note_particle_add(),
            Some(Tally::Trigger) => match attrs.trigger {
                Some(kind) => self.counters.record_trigger(kind),
                None => self.counters.record_activation(),
            },
            Some(Tally::SpawnGroup) => self.counters.record_spawn_group(),
            None => {}
        }

        let verdict = self
            .gate
            .decide(site, &attrs, self.settings.current(), self.tick);
        if let Some(counter) = verdict.counter {
            self.counters.bump(counter);
        }
        if !verdict.decision.runs() {
            if let Some(category) = policy.zero_on_skip {
                self.timings.clear(category);
            }
        }
        verdict
    }

    /// Run `op` through the gate and timing policy of `site`.
    ///
    /// Returns the operation's output, or `None` if the gate skipped it.
    pub fn invoke<O: Operation>(&mut self, site: CallSite, op: O) -> Option<O::Output> {
        chain(site, op).invoke(self)
    }

    // ── Timing ─────────────────────────────────────────────────────

    /// Start a measurement.
    pub fn begin_timing(&self) -> TimingGuard {
        self.timings.begin(&*self.clock)
    }

    /// Close a measurement into `spec`'s category and its rollup.
    pub fn end_timing(&mut self, guard: TimingGuard, spec: TimingSpec) -> f64 {
        let ms = self.timings.end(guard, spec.category, &*self.clock);
        if let Some(parent) = spec.rollup {
            self.timings.record(parent, ms);
        }
        ms
    }

    /// Measurement into `category` that records when dropped.
    pub fn scoped(&mut self, category: Category) -> ScopedTimer<'_> {
        ScopedTimer::new(&mut self.timings, &*self.clock, category)
    }

    /// Time `f` into `category`.
    pub fn time<R>(&mut self, category: Category, f: impl FnOnce() -> R) -> R {
        let guard = self.timings.begin(&*self.clock);
        let out = f();
        self.timings.end(guard, category, &*self.clock);
        out
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// Current tick.
    pub fn tick(&self) -> TickId {
        self.tick
    }

    /// Validated configuration.
    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Cached settings snapshot.
    pub fn settings(&self) -> &ConfigSnapshot {
        self.settings.current()
    }

    /// Cached value of `key`.
    pub fn option(&self, key: OptionKey) -> bool {
        self.settings.get(key)
    }

    /// Settings refreshes performed so far.
    pub fn settings_refreshes(&self) -> u64 {
        self.settings.refresh_count()
    }

    /// Whether the profiler display is on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Interval frame-time accumulators.
    pub fn frame_state(&self) -> &FrameTimingState {
        self.frame.state()
    }

    /// Spike window and counters.
    pub fn spikes(&self) -> &SpikeDetector {
        &self.spikes
    }

    /// Interval category timings.
    pub fn timings(&self) -> &CategoryTimings {
        self.timings.timings()
    }

    /// Interval counters.
    pub fn counters(&self) -> &OptimizationCounters {
        &self.counters
    }

    /// Latest scene statistics.
    pub fn scene(&self) -> &SceneStats {
        &self.scene
    }

    /// Throttle gate state.
    pub fn gate(&self) -> &ThrottleGate {
        &self.gate
    }

    /// Report formatter state.
    pub fn report(&self) -> &ReportFormatter {
        &self.report
    }
}
