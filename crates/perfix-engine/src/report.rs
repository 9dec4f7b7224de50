//! Report cadence and panel rendering.
//!
//! [`ReportFormatter`] keeps its own simulated-time accumulator. When an
//! interval closes it renders [`PrimaryPanel`] (and [`DetailPanel`] in
//! detail mode) into owned text buffers and hands them to the host's
//! [`DisplaySurface`]. Resetting the interval accumulators is the
//! context's job and happens right after rendering.

use std::fmt;

use perfix_core::{Category, DisplaySurface, TriggerKind};
use tracing::{debug, warn};

use crate::counters::Counter;
use crate::metrics::IntervalMetrics;

// ── Panels ─────────────────────────────────────────────────────────

/// Summary panel: frame rate, grade, scene counts, timings, skips.
pub struct PrimaryPanel<'a>(pub &'a IntervalMetrics);

impl fmt::Display for PrimaryPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0;
        let t = &m.timings;
        let s = &m.scene;
        writeln!(f, "Perfix{}", m.spike_status.tag())?;
        writeln!(
            f,
            "FPS: {:.0} (sim {:.0}) | Grade: {}",
            m.fps_wall, m.fps_sim, m.grade
        )?;
        writeln!(
            f,
            "Frame: {:.2}ms (min {:.1} / max {:.1})",
            m.avg_wall_ms, m.min_wall_ms, m.max_wall_ms
        )?;
        writeln!(
            f,
            "Spikes: {} (>{:.0}ms) | {} (>{:.0}ms)",
            m.warn_spikes, m.warn_threshold_ms, m.severe_spikes, m.severe_threshold_ms
        )?;
        writeln!(f)?;

        writeln!(f, "Objects")?;
        writeln!(
            f,
            "Total: {} | Visible: {}/{}",
            s.total_objects, s.visible_objects, s.visible_objects_secondary
        )?;
        writeln!(
            f,
            "Sections: [{}-{}]x[{}-{}]",
            s.sections.left, s.sections.right, s.sections.bottom, s.sections.top
        )?;
        writeln!(f)?;

        writeln!(f, "Timings")?;
        writeln!(
            f,
            "Update: {:.2}ms | Shader: {:.2}ms",
            t.get(Category::Update),
            t.get(Category::ShaderVisit)
        )?;
        writeln!(
            f,
            "Particle: {:.2}ms | Effects: {:.2}ms",
            t.get(Category::Particle),
            t.get(Category::Effect)
        )?;
        writeln!(
            f,
            "Visibility: {:.2}ms | Collision: {:.2}ms",
            t.get(Category::Visibility),
            t.get(Category::Collision)
        )?;
        writeln!(
            f,
            "Camera: {:.2}ms | Actions: {:.2}ms",
            t.get(Category::Camera),
            m.core_actions_ms()
        )?;
        writeln!(f)?;

        writeln!(f, "Rendering")?;
        writeln!(
            f,
            "BatchNodes: {} | DrawCalls: ~{}",
            s.batch_nodes, m.draw_calls
        )?;
        writeln!(
            f,
            "Gradients: {} | Particles: {}",
            s.active_gradients, m.particle_systems
        )?;
        writeln!(f)?;

        writeln!(f, "Optimizations")?;
        f.write_str("Skip:")?;
        for counter in Counter::ALL {
            write!(f, " {}{}", counter.short(), m.skipped(counter))?;
        }
        writeln!(f)?;
        write!(
            f,
            "Triggers: {} (S{} P{} M{})",
            m.counters.triggers_activated(),
            m.triggers(TriggerKind::Spawn),
            m.triggers(TriggerKind::Pulse),
            m.triggers(TriggerKind::Move)
        )
    }
}

/// Detail panel: percentage breakdown against update + shader time.
pub struct DetailPanel<'a>(pub &'a IntervalMetrics);

impl fmt::Display for DetailPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0;
        let t = &m.timings;
        writeln!(f, "Breakdown")?;
        writeln!(f, "Shader: {:.1}%", m.share(t.get(Category::ShaderVisit)))?;
        writeln!(f, "Effects: {:.1}%", m.share(t.get(Category::Effect)))?;
        for cat in [Category::PulseEffect, Category::OpacityEffect] {
            sub(f, cat, t.get(cat))?;
        }
        writeln!(f, "Actions: {:.1}%", m.share(m.all_actions_ms()))?;
        for cat in [
            Category::MoveActions,
            Category::RotationActions,
            Category::TransformActions,
            Category::AreaActions,
        ] {
            sub(f, cat, t.get(cat))?;
        }
        writeln!(f, "Particles: {:.1}%", m.share(t.get(Category::Particle)))?;
        writeln!(f)?;

        writeln!(f, "Other")?;
        for cat in [
            Category::Visibility,
            Category::Collision,
            Category::Camera,
            Category::ShaderCalc,
            Category::PostUpdate,
            Category::Audio,
        ] {
            sub(f, cat, t.get(cat))?;
        }
        writeln!(f)?;

        writeln!(f, "History")?;
        write!(
            f,
            "  avg: {:.2}ms | max: {:.2}ms ({} frames)",
            m.window_mean_ms, m.window_max_ms, m.window_len
        )
    }
}

fn sub(f: &mut fmt::Formatter<'_>, cat: Category, ms: f64) -> fmt::Result {
    writeln!(f, "  {}: {:.2}ms", cat, ms)
}

// ── ReportFormatter ────────────────────────────────────────────────

/// Fixed-cadence panel renderer.
#[derive(Debug)]
pub struct ReportFormatter {
    interval: f64,
    accum: f64,
    primary: String,
    detail: String,
    emitted: u64,
}

impl ReportFormatter {
    /// Create a formatter reporting every `interval_secs` of simulated time.
    pub fn new(interval_secs: f64) -> Self {
        Self {
            interval: interval_secs,
            accum: 0.0,
            primary: String::new(),
            detail: String::new(),
            emitted: 0,
        }
    }

    /// Accumulate `simulated_dt`. Returns `true` and restarts the
    /// accumulator when an interval has closed.
    pub fn advance(&mut self, simulated_dt: f64) -> bool {
        if simulated_dt.is_finite() && simulated_dt > 0.0 {
            self.accum += simulated_dt;
        }
        if self.accum >= self.interval {
            self.accum = 0.0;
            true
        } else {
            false
        }
    }

    /// Drop any partial interval so the next report covers a full one.
    pub fn restart(&mut self) {
        self.accum = 0.0;
    }

    /// Render the panels for `metrics` onto `surface`.
    ///
    /// The detail panel is shown when `detail` is set and hidden otherwise.
    pub fn render(
        &mut self,
        metrics: &IntervalMetrics,
        detail: bool,
        surface: &mut dyn DisplaySurface,
    ) {
        self.primary = PrimaryPanel(metrics).to_string();
        surface.show_primary(&self.primary);

        if detail {
            self.detail = DetailPanel(metrics).to_string();
            surface.show_detail(&self.detail);
        } else {
            surface.hide_detail();
        }

        self.emitted += 1;
        debug!(
            tick = metrics.tick.0,
            fps = metrics.fps_wall,
            fps_sim = metrics.fps_sim,
            grade = %metrics.grade,
            warn = metrics.warn_spikes,
            severe = metrics.severe_spikes,
            "profiler report"
        );
        if metrics.severe_spikes > 0 {
            warn!(
                severe = metrics.severe_spikes,
                max_ms = metrics.max_wall_ms,
                "severe frame spikes in reporting interval"
            );
        }
    }

    /// Text of the last rendered primary panel.
    pub fn primary_text(&self) -> &str {
        &self.primary
    }

    /// Text of the last rendered detail panel; empty if never rendered.
    pub fn detail_text(&self) -> &str {
        &self.detail
    }

    /// Reports emitted so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}
