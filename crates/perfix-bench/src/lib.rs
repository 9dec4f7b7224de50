//! Benchmark profiles and utilities for the Perfix frame profiler.
//!
//! Provides pre-built option sets and a representative host tick:
//!
//! - [`quiet_options`]: profiler shown, no throttles
//! - [`aggressive_options`]: every disable and experimental throttle on
//! - [`reference_tick`]: one host tick touching every call-site family

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::rc::Rc;

use perfix_core::{CallAttrs, FnOperation, OptionKey, TriggerKind};
use perfix_engine::{CallSite, IntervalMetrics, ProfilerConfig, ProfilerContext, SceneStats};
use perfix_test_utils::{ManualClock, MapConfigSource, RecordingDisplay};

/// Simulated delta of one reference tick.
pub const TICK_DT: f64 = 1.0 / 256.0;

/// Profiler shown with the detail panel, nothing throttled.
pub fn quiet_options() -> MapConfigSource {
    MapConfigSource::new()
        .with(OptionKey::ShowProfiler.name(), true)
        .with(OptionKey::ShowDetailedProfiler.name(), true)
}

/// Every option on.
pub fn aggressive_options() -> MapConfigSource {
    OptionKey::ALL
        .iter()
        .fold(MapConfigSource::new(), |src, key| src.with(key.name(), true))
}

/// A context over a shared manual clock.
pub fn bench_context(src: &MapConfigSource) -> (ProfilerContext, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::new());
    let ctx = ProfilerContext::new(ProfilerConfig::default(), Rc::clone(&clock), src)
        .unwrap_or_else(|e| panic!("default profiler config rejected: {e}"));
    (ctx, clock)
}

/// Scene counts of a mid-sized level.
pub fn reference_scene() -> SceneStats {
    SceneStats {
        total_objects: 8_000,
        visible_objects: 600,
        visible_objects_secondary: 120,
        active_gradients: 2,
        shader_layer_present: true,
        batch_nodes: 24,
        ..SceneStats::default()
    }
}

/// One host tick: main update, shader pass, `particles` particle systems,
/// action processing, a few triggers and a spawn group.
pub fn reference_tick(
    ctx: &mut ProfilerContext,
    clock: &ManualClock,
    src: &MapConfigSource,
    display: &mut RecordingDisplay,
    particles: u32,
) -> Option<IntervalMetrics> {
    ctx.begin_tick(TICK_DT, src);
    ctx.invoke(CallSite::GameUpdate, FnOperation::new(|| clock.advance_ms(1.0)));
    ctx.invoke(CallSite::ShaderLayerUpdate, FnOperation::new(|| ()));
    ctx.invoke(CallSite::ShaderVisit, FnOperation::new(|| clock.advance_ms(0.3)));
    for _ in 0..particles {
        ctx.invoke(CallSite::ParticleUpdate, FnOperation::new(|| clock.advance_ms(0.01)));
        ctx.invoke(CallSite::ParticleAdd, FnOperation::new(|| true));
    }
    for site in [
        CallSite::MoveActions,
        CallSite::RotationActions,
        CallSite::TransformActions,
        CallSite::AreaActions,
        CallSite::FollowActions,
        CallSite::PulseEffects,
        CallSite::OpacityEffects,
        CallSite::UpdateVisibility,
        CallSite::CheckCollisions,
        CallSite::UpdateCamera,
        CallSite::GradientLayers,
        CallSite::PostUpdate,
    ] {
        ctx.invoke(site, FnOperation::new(|| clock.advance_ms(0.02)));
    }
    for kind in [TriggerKind::Move, TriggerKind::Pulse, TriggerKind::Shake] {
        ctx.invoke(
            CallSite::TriggerActivated,
            FnOperation::with_attrs(|| (), CallAttrs::trigger(kind)),
        );
    }
    ctx.invoke(CallSite::SpawnGroup, FnOperation::new(|| ()));
    ctx.end_tick(TICK_DT, reference_scene(), display)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_tick_reports_on_cadence() {
        let src = quiet_options();
        let (mut ctx, clock) = bench_context(&src);
        let mut display = RecordingDisplay::new();
        let reports = (0..256)
            .filter(|_| reference_tick(&mut ctx, &clock, &src, &mut display, 8).is_some())
            .count();
        assert_eq!(reports, 2);
        assert!(display.primary_text().contains("Particles: 8"));
    }

    #[test]
    fn aggressive_options_skip_work() {
        let src = aggressive_options();
        let (mut ctx, clock) = bench_context(&src);
        let mut display = RecordingDisplay::new();
        reference_tick(&mut ctx, &clock, &src, &mut display, 4);
        assert_eq!(
            ctx.counters()
                .get(perfix_engine::Counter::ParticlesSkipped),
            4
        );
    }
}
