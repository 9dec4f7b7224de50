//! Optimization tallies for the current reporting interval.

use indexmap::IndexMap;
use perfix_core::TriggerKind;

/// A skip/disable event class counted by the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Counter {
    /// Particle updates skipped (disabled or down-sampled).
    ParticlesSkipped,
    /// Glow sprites hidden.
    GlowsDisabled,
    /// High-detail object activations skipped.
    HighDetailSkipped,
    /// Trail snapshots skipped.
    TrailSnapshotsSkipped,
    /// Camera shakes skipped.
    ShakesSkipped,
}

impl Counter {
    /// Number of counters.
    pub const COUNT: usize = 5;

    /// Every counter, in discriminant order.
    pub const ALL: [Counter; Self::COUNT] = [
        Self::ParticlesSkipped,
        Self::GlowsDisabled,
        Self::HighDetailSkipped,
        Self::TrailSnapshotsSkipped,
        Self::ShakesSkipped,
    ];

    /// One-letter label used in the compact report line.
    pub fn short(self) -> char {
        match self {
            Self::ParticlesSkipped => 'P',
            Self::GlowsDisabled => 'G',
            Self::HighDetailSkipped => 'H',
            Self::TrailSnapshotsSkipped => 'T',
            Self::ShakesSkipped => 'C',
        }
    }
}

/// Skip counts, call tallies, and trigger activations.
///
/// Everything here is interval-scoped and zeroed by [`reset`](Self::reset),
/// except the per-tick particle system count which restarts every tick.
#[derive(Clone, Debug, Default)]
pub struct OptimizationCounters {
    skips: [u32; Counter::COUNT],
    particle_update_calls: u32,
    particle_add_calls: u32,
    triggers_activated: u32,
    by_kind: IndexMap<TriggerKind, u32>,
    particle_systems: u32,
}

impl OptimizationCounters {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one event of `counter`.
    #[inline]
    pub fn bump(&mut self, counter: Counter) {
        self.skips[counter as usize] += 1;
    }

    /// Events of `counter` since the last reset.
    pub fn get(&self, counter: Counter) -> u32 {
        self.skips[counter as usize]
    }

    /// Count one particle system update call.
    pub fn note_particle_update(&mut self) {
        self.particle_update_calls += 1;
        self.particle_systems += 1;
    }

    /// Count one particle emission call.
    pub fn note_particle_add(&mut self) {
        self.particle_add_calls += 1;
    }

    /// Count one trigger activation of `kind`.
    pub fn record_trigger(&mut self, kind: TriggerKind) {
        self.record_activation();
        *self.by_kind.entry(kind).or_insert(0) += 1;
    }

    /// Count one trigger activation of unknown kind.
    pub fn record_activation(&mut self) {
        self.triggers_activated += 1;
    }

    /// Count one spawn-group request. Tallied with spawn triggers but not
    /// as an activation.
    pub fn record_spawn_group(&mut self) {
        *self.by_kind.entry(TriggerKind::Spawn).or_insert(0) += 1;
    }

    /// Trigger activations since the last reset.
    pub fn triggers_activated(&self) -> u32 {
        self.triggers_activated
    }

    /// Tally for `kind` since the last reset.
    pub fn trigger_count(&self, kind: TriggerKind) -> u32 {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// `(kind, tally)` pairs in first-seen order.
    pub fn trigger_tallies(&self) -> impl Iterator<Item = (TriggerKind, u32)> + '_ {
        self.by_kind.iter().map(|(k, v)| (*k, *v))
    }

    /// Particle update calls since the last reset.
    pub fn particle_update_calls(&self) -> u32 {
        self.particle_update_calls
    }

    /// Particle emission calls since the last reset.
    pub fn particle_add_calls(&self) -> u32 {
        self.particle_add_calls
    }

    /// Particle systems updated during the current tick.
    pub fn particle_systems(&self) -> u32 {
        self.particle_systems
    }

    /// Restart per-tick tallies.
    pub fn begin_tick(&mut self) {
        self.particle_systems = 0;
    }

    /// Zero every interval tally. Trigger kinds already seen keep their
    /// slot so report ordering is stable across intervals.
    pub fn reset(&mut self) {
        self.skips = [0; Counter::COUNT];
        self.particle_update_calls = 0;
        self.particle_add_calls = 0;
        self.triggers_activated = 0;
        for v in self.by_kind.values_mut() {
            *v = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_and_get() {
        let mut c = OptimizationCounters::new();
        c.bump(Counter::GlowsDisabled);
        c.bump(Counter::GlowsDisabled);
        c.bump(Counter::ShakesSkipped);
        assert_eq!(c.get(Counter::GlowsDisabled), 2);
        assert_eq!(c.get(Counter::ShakesSkipped), 1);
        assert_eq!(c.get(Counter::ParticlesSkipped), 0);
    }

    #[test]
    fn trigger_tallies_keep_first_seen_order() {
        let mut c = OptimizationCounters::new();
        c.record_trigger(TriggerKind::Pulse);
        c.record_trigger(TriggerKind::Move);
        c.record_trigger(TriggerKind::Pulse);
        c.record_spawn_group();
        assert_eq!(c.triggers_activated(), 3);
        assert_eq!(
            c.trigger_tallies().collect::<Vec<_>>(),
            vec![
                (TriggerKind::Pulse, 2),
                (TriggerKind::Move, 1),
                (TriggerKind::Spawn, 1)
            ]
        );
    }

    #[test]
    fn reset_zeroes_everything_interval_scoped() {
        let mut c = OptimizationCounters::new();
        for counter in Counter::ALL {
            c.bump(counter);
        }
        c.note_particle_update();
        c.note_particle_add();
        c.record_trigger(TriggerKind::Shake);
        c.reset();
        assert!(Counter::ALL.iter().all(|k| c.get(*k) == 0));
        assert_eq!(c.particle_update_calls(), 0);
        assert_eq!(c.particle_add_calls(), 0);
        assert_eq!(c.triggers_activated(), 0);
        assert_eq!(c.trigger_count(TriggerKind::Shake), 0);
        assert!(c.trigger_tallies().all(|(_, n)| n == 0));
    }

    #[test]
    fn particle_systems_are_per_tick() {
        let mut c = OptimizationCounters::new();
        c.note_particle_update();
        c.note_particle_update();
        assert_eq!(c.particle_systems(), 2);
        c.reset();
        assert_eq!(c.particle_systems(), 2);
        c.begin_tick();
        assert_eq!(c.particle_systems(), 0);
        assert_eq!(c.particle_update_calls(), 0);
    }

    #[test]
    fn unseen_trigger_counts_zero() {
        let c = OptimizationCounters::new();
        assert_eq!(c.trigger_count(TriggerKind::Other(7)), 0);
    }
}
