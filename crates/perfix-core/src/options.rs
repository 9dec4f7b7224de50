//! The enumerated option set and the immutable [`ConfigSnapshot`].
//!
//! Every option is a named boolean supplied by the host's configuration
//! backend through [`ConfigSource`]. Options the backend cannot supply
//! read as `false`.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseOptionError;

/// A named boolean option understood by the profiler.
///
/// The discriminant doubles as the index into [`ConfigSnapshot`]'s flag
/// table, so the variant order must match [`OptionKey::ALL`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum OptionKey {
    /// Render the primary profiler panel (`show-profiler`).
    ShowProfiler,
    /// Render the detail breakdown panel (`show-detailed-profiler`).
    ShowDetailedProfiler,
    /// Skip every shader-layer pass (`disable-shaders`).
    DisableShaders,
    /// Skip player trail snapshots (`disable-trails`).
    DisableTrails,
    /// Skip particle updates and emission (`disable-particles`).
    DisableParticles,
    /// Skip glow sprite updates (`disable-glow`).
    DisableGlow,
    /// Skip pulse effects and pulse triggers (`disable-pulse`).
    DisablePulse,
    /// Skip camera shakes and shake triggers (`disable-shake`).
    DisableShake,
    /// Skip activation of high-detail objects (`disable-high-detail`).
    DisableHighDetail,
    /// Skip opacity effect updates (`disable-move-effects`).
    DisableMoveEffects,
    /// Update particle systems every other tick (`reduced-particles`).
    ReducedParticles,
    /// Run move and rotate actions every other tick (`exp-throttle-actions`).
    ExpThrottleActions,
    /// Skip area actions entirely (`exp-skip-area-effects`).
    ExpSkipAreaEffects,
    /// Run transform actions every other tick (`exp-throttle-transforms`).
    ExpThrottleTransforms,
    /// Enforce a minimum gap between spawn groups (`exp-throttle-spawns`).
    ExpThrottleSpawns,
    /// Read but inert; see the collision call site (`exp-reduce-collisions`).
    ExpReduceCollisions,
    /// Read but inert (`exp-aggressive-culling`).
    ExpAggressiveCulling,
    /// Skip follow actions entirely (`exp-skip-follow-actions`).
    ExpSkipFollowActions,
    /// Read but inert (`exp-reduce-color-updates`).
    ExpReduceColorUpdates,
    /// Update gradient layers every third tick (`exp-throttle-gradients`).
    ExpThrottleGradients,
    /// Update the wave trail every other tick (`exp-reduce-wave-trail`).
    ExpReduceWaveTrail,
    /// Run advanced follow every other tick (`exp-throttle-advanced-follow`).
    ExpThrottleAdvancedFollow,
    /// Run dynamic object actions every other tick (`exp-throttle-dynamic-objects`).
    ExpThrottleDynamicObjects,
    /// Run player follow every other tick (`exp-throttle-player-follow`).
    ExpThrottlePlayerFollow,
    /// Run enter effects every other tick (`exp-limit-enter-effects`).
    ExpLimitEnterEffects,
    /// Update text labels every fifth tick (`exp-throttle-labels`).
    ExpThrottleLabels,
}

impl OptionKey {
    /// Number of options in the enumerated set.
    pub const COUNT: usize = 26;

    /// Every option, in discriminant order.
    pub const ALL: [OptionKey; Self::COUNT] = [
        Self::ShowProfiler,
        Self::ShowDetailedProfiler,
        Self::DisableShaders,
        Self::DisableTrails,
        Self::DisableParticles,
        Self::DisableGlow,
        Self::DisablePulse,
        Self::DisableShake,
        Self::DisableHighDetail,
        Self::DisableMoveEffects,
        Self::ReducedParticles,
        Self::ExpThrottleActions,
        Self::ExpSkipAreaEffects,
        Self::ExpThrottleTransforms,
        Self::ExpThrottleSpawns,
        Self::ExpReduceCollisions,
        Self::ExpAggressiveCulling,
        Self::ExpSkipFollowActions,
        Self::ExpReduceColorUpdates,
        Self::ExpThrottleGradients,
        Self::ExpReduceWaveTrail,
        Self::ExpThrottleAdvancedFollow,
        Self::ExpThrottleDynamicObjects,
        Self::ExpThrottlePlayerFollow,
        Self::ExpLimitEnterEffects,
        Self::ExpThrottleLabels,
    ];

    /// Index into a flag table of length [`COUNT`](Self::COUNT).
    pub fn index(self) -> usize {
        self as usize
    }

    /// The backend key for this option.
    pub fn name(self) -> &'static str {
        match self {
            Self::ShowProfiler => "show-profiler",
            Self::ShowDetailedProfiler => "show-detailed-profiler",
            Self::DisableShaders => "disable-shaders",
            Self::DisableTrails => "disable-trails",
            Self::DisableParticles => "disable-particles",
            Self::DisableGlow => "disable-glow",
            Self::DisablePulse => "disable-pulse",
            Self::DisableShake => "disable-shake",
            Self::DisableHighDetail => "disable-high-detail",
            Self::DisableMoveEffects => "disable-move-effects",
            Self::ReducedParticles => "reduced-particles",
            Self::ExpThrottleActions => "exp-throttle-actions",
            Self::ExpSkipAreaEffects => "exp-skip-area-effects",
            Self::ExpThrottleTransforms => "exp-throttle-transforms",
            Self::ExpThrottleSpawns => "exp-throttle-spawns",
            Self::ExpReduceCollisions => "exp-reduce-collisions",
            Self::ExpAggressiveCulling => "exp-aggressive-culling",
            Self::ExpSkipFollowActions => "exp-skip-follow-actions",
            Self::ExpReduceColorUpdates => "exp-reduce-color-updates",
            Self::ExpThrottleGradients => "exp-throttle-gradients",
            Self::ExpReduceWaveTrail => "exp-reduce-wave-trail",
            Self::ExpThrottleAdvancedFollow => "exp-throttle-advanced-follow",
            Self::ExpThrottleDynamicObjects => "exp-throttle-dynamic-objects",
            Self::ExpThrottlePlayerFollow => "exp-throttle-player-follow",
            Self::ExpLimitEnterEffects => "exp-limit-enter-effects",
            Self::ExpThrottleLabels => "exp-throttle-labels",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptionKey {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| ParseOptionError { name: s.to_string() })
    }
}

/// Key → bool lookup supplied by the host's configuration backend.
///
/// Returning `None` means the backend does not know the key or could not
/// read it; the profiler then uses `false`. Lookups never fail the tick.
pub trait ConfigSource {
    /// Look up the boolean value stored under `name`.
    fn lookup(&self, name: &str) -> Option<bool>;
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn lookup(&self, name: &str) -> Option<bool> {
        (**self).lookup(name)
    }
}

/// Immutable snapshot of every option at one refresh.
///
/// Built whole by [`ConfigSnapshot::capture`] and swapped in by the
/// settings cache, so readers never observe a half-refreshed set.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigSnapshot {
    flags: [bool; OptionKey::COUNT],
    valid: bool,
    refreshed_at: f64,
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            flags: [false; OptionKey::COUNT],
            valid: false,
            refreshed_at: 0.0,
        }
    }
}

impl ConfigSnapshot {
    /// Read every enumerated option from `source`.
    ///
    /// `at_secs` is the simulated time of the refresh. Missing keys take
    /// the default `false`. The returned snapshot is always valid.
    pub fn capture(source: &dyn ConfigSource, at_secs: f64) -> Self {
        let mut flags = [false; OptionKey::COUNT];
        for key in OptionKey::ALL {
            flags[key.index()] = source.lookup(key.name()).unwrap_or(false);
        }
        Self {
            flags,
            valid: true,
            refreshed_at: at_secs,
        }
    }

    /// Return a copy with `key` forced to `value`. Marks the copy valid.
    pub fn with(mut self, key: OptionKey, value: bool) -> Self {
        self.flags[key.index()] = value;
        self.valid = true;
        self
    }

    /// Value of `key` in this snapshot.
    #[inline]
    pub fn get(&self, key: OptionKey) -> bool {
        self.flags[key.index()]
    }

    /// Whether this snapshot was populated from a source.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Simulated time (seconds) at which this snapshot was captured.
    pub fn refreshed_at(&self) -> f64 {
        self.refreshed_at
    }

    /// Options currently set, in discriminant order.
    pub fn enabled(&self) -> impl Iterator<Item = OptionKey> + '_ {
        OptionKey::ALL.into_iter().filter(|k| self.get(*k))
    }

    /// Whether `other` holds the same option values, ignoring timestamps.
    pub fn same_flags(&self, other: &ConfigSnapshot) -> bool {
        self.flags == other.flags
    }
}
