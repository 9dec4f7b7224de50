//! Integration test: whole ticks through a manually driven clock.
//!
//! Drives `ProfilerContext` the way a host does (begin, wrapped calls,
//! end) and checks report cadence, frame statistics, spike counting and
//! the interval reset.

use std::rc::Rc;

use perfix_core::{Category, FnOperation, OptionKey};
use perfix_engine::{
    CallSite, Counter, Grade, IntervalMetrics, ProfilerConfig, ProfilerContext, SceneStats,
    SpikeStatus,
};
use perfix_test_utils::{
    jittered_frames, ManualClock, MapConfigSource, RecordingDisplay, SleepOperation,
};
use proptest::prelude::*;

// Exact in binary, so 32 ticks close a 0.5 s interval with no drift.
const DT: f64 = 1.0 / 64.0;

fn shown() -> MapConfigSource {
    MapConfigSource::new()
        .with(OptionKey::ShowProfiler.name(), true)
        .with(OptionKey::ShowDetailedProfiler.name(), true)
}

struct Harness {
    ctx: ProfilerContext,
    clock: Rc<ManualClock>,
    src: MapConfigSource,
    display: RecordingDisplay,
}

impl Harness {
    fn new(src: MapConfigSource) -> Self {
        let clock = Rc::new(ManualClock::new());
        let ctx = ProfilerContext::new(ProfilerConfig::default(), Rc::clone(&clock), &src)
            .expect("default config is valid");
        Self {
            ctx,
            clock,
            src,
            display: RecordingDisplay::new(),
        }
    }

    /// One tick whose wall duration is `frame_ms`, spent inside the main
    /// update. Returns the report if one closed.
    fn tick(&mut self, frame_ms: f64) -> Option<IntervalMetrics> {
        self.ctx.begin_tick(DT, &self.src);
        let update = SleepOperation::new(Rc::clone(&self.clock), frame_ms * 0.5);
        self.ctx.invoke(CallSite::GameUpdate, update);
        let c = Rc::clone(&self.clock);
        self.ctx.invoke(
            CallSite::ParticleUpdate,
            FnOperation::new(move || c.advance_ms(frame_ms * 0.25)),
        );
        self.clock.advance_ms(frame_ms * 0.25);
        let scene = SceneStats {
            total_objects: 500,
            batch_nodes: 4,
            ..SceneStats::default()
        };
        self.ctx.end_tick(DT, scene, &mut self.display)
    }
}

#[test]
fn reports_every_half_second_of_simulated_time() {
    let mut h = Harness::new(shown());
    let reported: Vec<u32> = (1..=128)
        .filter_map(|i| h.tick(16.0).map(|_| i))
        .collect();
    assert_eq!(reported, vec![32, 64, 96, 128]);
    assert_eq!(h.display.primary_updates(), 4);
    assert_eq!(h.display.detail_updates(), 4);
}

#[test]
fn steady_frames_grade_and_fps() {
    let mut h = Harness::new(shown());
    // The first tick only stores a timestamp.
    let m = (0..40).find_map(|_| h.tick(10.0)).expect("a report closes");
    assert!((m.avg_wall_ms - 10.0).abs() < 1e-6);
    assert!((m.fps_wall - 100.0).abs() < 1e-3);
    assert!((m.fps_sim - 64.0).abs() < 1e-9);
    assert_eq!(m.grade, Grade::A);
    assert_eq!(m.spike_status, SpikeStatus::Clean);
    assert_eq!(m.particle_systems, 1);
    assert_eq!(m.draw_calls, 4 + 1);
    assert!(h.display.primary_text().starts_with("Perfix\nFPS: 100 (sim 64) | Grade: A"));
}

#[test]
fn spikes_flag_the_report() {
    let mut h = Harness::new(shown());
    let mut frames = vec![16.0; 40];
    frames[5] = 25.0;
    frames[9] = 45.0;
    let m = frames
        .into_iter()
        .find_map(|ms| h.tick(ms))
        .expect("a report closes");
    assert_eq!(m.warn_spikes, 2);
    assert_eq!(m.severe_spikes, 1);
    assert!(h.display.primary_text().starts_with("Perfix [!!!]"));
}

#[test]
fn interval_reset_is_total() {
    let mut h = Harness::new(shown());
    let m = (0..40).find_map(|_| h.tick(20.0)).expect("a report closes");
    assert!(m.timings.get(Category::Update) > 0.0);
    assert!(m.timings.get(Category::Particle) > 0.0);

    assert_eq!(h.ctx.frame_state().wall_count(), 0);
    assert_eq!(h.ctx.frame_state().sim_count(), 0);
    assert!(h.ctx.timings().iter().all(|(_, ms)| ms == 0.0));
    assert_eq!(h.ctx.counters().particle_update_calls(), 0);
    assert_eq!(h.ctx.spikes().warn_count(), 0);
    assert_eq!(h.ctx.spikes().severe_count(), 0);
    // History survives.
    assert!(!h.ctx.spikes().is_empty());

    let after = h.ctx.collect_metrics();
    assert_eq!(after.share(after.timings.get(Category::ShaderVisit)), 0.0);
    assert_eq!(after.share(after.all_actions_ms()), 0.0);
    assert_eq!(after.share(after.timings.get(Category::Particle)), 0.0);
}

#[test]
fn frame_in_flight_across_reset_is_measured() {
    let mut h = Harness::new(shown());
    while h.tick(16.0).is_none() {}
    h.tick(16.0);
    assert_eq!(h.ctx.frame_state().wall_count(), 1);
}

#[test]
fn report_after_reenable_covers_only_visible_ticks() {
    let src = shown().with(OptionKey::DisableParticles.name(), true);
    let mut h = Harness::new(src);
    for _ in 0..40 {
        h.tick(10.0);
    }
    h.src.set_key(OptionKey::ShowProfiler, false);
    for _ in 0..320 {
        assert!(h.tick(10.0).is_none());
    }
    assert!(!h.ctx.is_enabled());

    h.src.set_key(OptionKey::ShowProfiler, true);
    let mut visible = 0;
    let m = loop {
        let report = h.tick(10.0);
        if h.ctx.is_enabled() {
            visible += 1;
        }
        if let Some(m) = report {
            break m;
        }
    };
    // A full interval, none of it carried over from before the hide.
    assert_eq!(visible, 32);
    assert_eq!(m.skipped(Counter::ParticlesSkipped), 32);
    assert_eq!(m.counters.particle_update_calls(), 32);
    // The first visible tick has no prior timestamp to measure against.
    assert_eq!(m.wall_samples, 31);
    assert_eq!(m.sim_samples, 32);
}

#[test]
fn detail_panel_hidden_without_detail_option() {
    let src = MapConfigSource::new().with(OptionKey::ShowProfiler.name(), true);
    let mut h = Harness::new(src);
    while h.tick(16.0).is_none() {}
    assert!(h.display.primary_visible());
    assert!(!h.display.detail_visible());
    assert_eq!(h.display.detail_updates(), 0);
}

#[test]
fn jittered_run_counts_match_filters() {
    let frames = jittered_frames(42, 200, 18.0, 20.0);
    let mut h = Harness::new(shown());
    let mut warn = 0;
    let mut severe = 0;
    for &ms in &frames {
        if let Some(m) = h.tick(ms) {
            warn += m.warn_spikes;
            severe += m.severe_spikes;
        }
    }
    let leftover = h.ctx.collect_metrics();
    warn += leftover.warn_spikes;
    severe += leftover.severe_spikes;
    // Each wall sample measures the previous tick, so the last frame is
    // never sampled.
    let sampled = &frames[..frames.len() - 1];
    let expected_warn = sampled.iter().filter(|&&ms| ms > 20.0).count() as u32;
    let expected_severe = sampled.iter().filter(|&&ms| ms > 33.33).count() as u32;
    assert_eq!(warn, expected_warn);
    assert_eq!(severe, expected_severe);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn reset_zeroes_every_accumulator(frames in prop::collection::vec(1.0f64..60.0, 32..90)) {
        let mut h = Harness::new(shown());
        let mut reported = false;
        for ms in frames {
            if h.tick(ms).is_some() {
                reported = true;
                prop_assert!(h.ctx.timings().iter().all(|(_, v)| v == 0.0));
                prop_assert_eq!(h.ctx.frame_state().wall_count(), 0);
                prop_assert_eq!(h.ctx.spikes().warn_count(), 0);
                prop_assert_eq!(h.ctx.counters().particle_update_calls(), 0);
            }
        }
        prop_assert!(reported);
    }
}
