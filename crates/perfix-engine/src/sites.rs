//! Call-site policy table.
//!
//! Every wrapped host operation is a [`CallSite`]. Its [`CallPolicy`] is
//! static data: the gate rules evaluated before the call, the effect
//! applied when it runs, the timing category it feeds, and the tallies
//! it bumps. The context reads the table; nothing here has state.

use perfix_core::{Category, HostEffect, OptionKey, TriggerKind};

use crate::counters::Counter;
use crate::gate::{Condition, EveryNth, GateRule};

/// A wrapped host operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallSite {
    /// The simulation's main per-tick update.
    GameUpdate,
    /// Shader layer state update.
    ShaderLayerUpdate,
    /// Shader layer render visit.
    ShaderVisit,
    /// Shader uniform calculations.
    ShaderCalculations,
    /// Shader pipeline setup.
    ShaderSetup,
    /// Camera shake request.
    CameraShake,
    /// Object visibility pass.
    UpdateVisibility,
    /// Post-update bookkeeping.
    PostUpdate,
    /// Collision checks.
    CheckCollisions,
    /// Camera update.
    UpdateCamera,
    /// Ghost trail snapshot.
    TrailSnapshot,
    /// Particle system update.
    ParticleUpdate,
    /// Particle emission.
    ParticleAdd,
    /// Object glow colour update.
    GlowColor,
    /// Player glow colour update.
    PlayerGlow,
    /// Object activation.
    ActivateObject,
    /// Pulse effect update.
    PulseEffects,
    /// Opacity effect update.
    OpacityEffects,
    /// Trigger activation.
    TriggerActivated,
    /// Move actions.
    MoveActions,
    /// Rotation actions.
    RotationActions,
    /// Transform actions.
    TransformActions,
    /// Area actions.
    AreaActions,
    /// Follow actions.
    FollowActions,
    /// Advanced follow actions.
    AdvancedFollow,
    /// Player follow actions.
    PlayerFollow,
    /// Dynamic object actions.
    DynamicObjects,
    /// Enter effects.
    EnterEffects,
    /// Wave trail stroke update.
    WaveTrail,
    /// Spawn-group request.
    SpawnGroup,
    /// Gradient layer update.
    GradientLayers,
    /// Text label update.
    LabelUpdate,
}

/// Where a measured call's milliseconds go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingSpec {
    /// Category the measurement is recorded into.
    pub category: Category,
    /// Parent category that also receives the measurement.
    pub rollup: Option<Category>,
}

/// Per-call tally bumped whether or not the call runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tally {
    /// Particle update call and particle system count.
    ParticleUpdate,
    /// Particle emission call.
    ParticleAdd,
    /// Trigger activation, by the call's trigger kind.
    Trigger,
    /// Spawn-group request.
    SpawnGroup,
}

/// Static gate, timing and tally policy of one call site.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CallPolicy {
    /// Rules evaluated in order; the first one that skips wins.
    pub rules: &'static [GateRule],
    /// Effect applied whenever the call is allowed to run.
    pub on_run: Option<HostEffect>,
    /// Timing category, for measured calls.
    pub timing: Option<TimingSpec>,
    /// Tally bumped before the gate decides.
    pub tally: Option<Tally>,
    /// Category forced to zero when the call is skipped.
    pub zero_on_skip: Option<Category>,
}

impl CallPolicy {
    const fn new(rules: &'static [GateRule]) -> Self {
        Self {
            rules,
            on_run: None,
            timing: None,
            tally: None,
            zero_on_skip: None,
        }
    }

    const fn timed(mut self, category: Category) -> Self {
        self.timing = Some(TimingSpec {
            category,
            rollup: None,
        });
        self
    }

    const fn rolled_into(mut self, category: Category, parent: Category) -> Self {
        self.timing = Some(TimingSpec {
            category,
            rollup: Some(parent),
        });
        self
    }

    const fn tallied(mut self, tally: Tally) -> Self {
        self.tally = Some(tally);
        self
    }
}

// ── Rule tables ────────────────────────────────────────────────────

const EVERY_2ND: EveryNth = EveryNth::new(2, 1);
const EVERY_3RD: EveryNth = EveryNth::new(3, 0);
const EVERY_5TH: EveryNth = EveryNth::new(5, 0);

const fn disable(flag: OptionKey) -> GateRule {
    GateRule::Disable {
        flag,
        when: Condition::Always,
        counter: None,
        effect: None,
    }
}

const fn every(flag: OptionKey, every: EveryNth) -> GateRule {
    GateRule::Periodic {
        flag,
        every,
        counter: None,
    }
}

const NONE: &[GateRule] = &[];
const SHADERS: &[GateRule] = &[disable(OptionKey::DisableShaders)];
const SHADER_LAYER: &[GateRule] = &[GateRule::Disable {
    flag: OptionKey::DisableShaders,
    when: Condition::Always,
    counter: None,
    effect: Some(HostEffect::SetShaderLayerVisible(false)),
}];
const SHADER_VISIT: &[GateRule] = &[GateRule::Disable {
    flag: OptionKey::DisableShaders,
    when: Condition::Always,
    counter: None,
    effect: Some(HostEffect::VisitChildrenOnly),
}];
const CAMERA_SHAKE: &[GateRule] = &[GateRule::Disable {
    flag: OptionKey::DisableShake,
    when: Condition::Always,
    counter: Some(Counter::ShakesSkipped),
    effect: None,
}];
const VISIBILITY: &[GateRule] = &[
    GateRule::SideEffect {
        flag: OptionKey::DisableParticles,
        effect: HostEffect::DisableGravityEffect,
    },
    GateRule::Inert {
        flag: OptionKey::ExpAggressiveCulling,
    },
];
const COLLISIONS: &[GateRule] = &[GateRule::Inert {
    flag: OptionKey::ExpReduceCollisions,
}];
const TRAILS: &[GateRule] = &[GateRule::Disable {
    flag: OptionKey::DisableTrails,
    when: Condition::Always,
    counter: Some(Counter::TrailSnapshotsSkipped),
    effect: None,
}];
const PARTICLE_UPDATE: &[GateRule] = &[
    GateRule::Disable {
        flag: OptionKey::DisableParticles,
        when: Condition::Always,
        counter: Some(Counter::ParticlesSkipped),
        effect: Some(HostEffect::HideParticleSystem),
    },
    GateRule::Periodic {
        flag: OptionKey::ReducedParticles,
        every: EVERY_2ND,
        counter: Some(Counter::ParticlesSkipped),
    },
];
const PARTICLE_ADD: &[GateRule] = &[disable(OptionKey::DisableParticles)];
const GLOW_COLOR: &[GateRule] = &[GateRule::Disable {
    flag: OptionKey::DisableGlow,
    when: Condition::Always,
    counter: Some(Counter::GlowsDisabled),
    effect: Some(HostEffect::HideGlowSprite),
}];
const PLAYER_GLOW: &[GateRule] = &[disable(OptionKey::DisableGlow)];
const ACTIVATE_OBJECT: &[GateRule] = &[GateRule::Disable {
    flag: OptionKey::DisableHighDetail,
    when: Condition::HighDetail,
    counter: Some(Counter::HighDetailSkipped),
    effect: None,
}];
const PULSE: &[GateRule] = &[
    disable(OptionKey::DisablePulse),
    GateRule::Inert {
        flag: OptionKey::ExpReduceColorUpdates,
    },
];
const OPACITY: &[GateRule] = &[disable(OptionKey::DisableMoveEffects)];
const TRIGGER: &[GateRule] = &[
    GateRule::Disable {
        flag: OptionKey::DisableShake,
        when: Condition::Trigger(TriggerKind::Shake),
        counter: None,
        effect: None,
    },
    GateRule::Disable {
        flag: OptionKey::DisablePulse,
        when: Condition::Trigger(TriggerKind::Pulse),
        counter: None,
        effect: None,
    },
];
const ACTIONS: &[GateRule] = &[every(OptionKey::ExpThrottleActions, EVERY_2ND)];
const TRANSFORMS: &[GateRule] = &[every(OptionKey::ExpThrottleTransforms, EVERY_2ND)];
const AREA: &[GateRule] = &[disable(OptionKey::ExpSkipAreaEffects)];
const FOLLOW: &[GateRule] = &[disable(OptionKey::ExpSkipFollowActions)];
const ADVANCED_FOLLOW: &[GateRule] = &[every(OptionKey::ExpThrottleAdvancedFollow, EVERY_2ND)];
const PLAYER_FOLLOW: &[GateRule] = &[every(OptionKey::ExpThrottlePlayerFollow, EVERY_2ND)];
const DYNAMIC_OBJECTS: &[GateRule] = &[every(OptionKey::ExpThrottleDynamicObjects, EVERY_2ND)];
const ENTER_EFFECTS: &[GateRule] = &[every(OptionKey::ExpLimitEnterEffects, EVERY_2ND)];
const WAVE_TRAIL: &[GateRule] = &[every(OptionKey::ExpReduceWaveTrail, EVERY_2ND)];
const SPAWN: &[GateRule] = &[GateRule::MinInterval {
    flag: OptionKey::ExpThrottleSpawns,
}];
const GRADIENTS: &[GateRule] = &[every(OptionKey::ExpThrottleGradients, EVERY_3RD)];
const LABELS: &[GateRule] = &[every(OptionKey::ExpThrottleLabels, EVERY_5TH)];

impl CallSite {
    /// Every call site.
    pub const ALL: [CallSite; 32] = [
        Self::GameUpdate,
        Self::ShaderLayerUpdate,
        Self::ShaderVisit,
        Self::ShaderCalculations,
        Self::ShaderSetup,
        Self::CameraShake,
        Self::UpdateVisibility,
        Self::PostUpdate,
        Self::CheckCollisions,
        Self::UpdateCamera,
        Self::TrailSnapshot,
        Self::ParticleUpdate,
        Self::ParticleAdd,
        Self::GlowColor,
        Self::PlayerGlow,
        Self::ActivateObject,
        Self::PulseEffects,
        Self::OpacityEffects,
        Self::TriggerActivated,
        Self::MoveActions,
        Self::RotationActions,
        Self::TransformActions,
        Self::AreaActions,
        Self::FollowActions,
        Self::AdvancedFollow,
        Self::PlayerFollow,
        Self::DynamicObjects,
        Self::EnterEffects,
        Self::WaveTrail,
        Self::SpawnGroup,
        Self::GradientLayers,
        Self::LabelUpdate,
    ];

    /// Static policy for this site.
    pub const fn policy(self) -> CallPolicy {
        match self {
            Self::GameUpdate => CallPolicy::new(NONE).timed(Category::Update),
            Self::ShaderLayerUpdate => {
                let mut p = CallPolicy::new(SHADER_LAYER);
                p.on_run = Some(HostEffect::SetShaderLayerVisible(true));
                p
            }
            Self::ShaderVisit => {
                let mut p = CallPolicy::new(SHADER_VISIT).timed(Category::ShaderVisit);
                p.zero_on_skip = Some(Category::ShaderVisit);
                p
            }
            Self::ShaderCalculations => CallPolicy::new(SHADERS).timed(Category::ShaderCalc),
            Self::ShaderSetup => CallPolicy::new(SHADERS),
            Self::CameraShake => CallPolicy::new(CAMERA_SHAKE),
            Self::UpdateVisibility => CallPolicy::new(VISIBILITY).timed(Category::Visibility),
            Self::PostUpdate => CallPolicy::new(NONE).timed(Category::PostUpdate),
            Self::CheckCollisions => CallPolicy::new(COLLISIONS).timed(Category::Collision),
            Self::UpdateCamera => CallPolicy::new(NONE).timed(Category::Camera),
            Self::TrailSnapshot => CallPolicy::new(TRAILS),
            Self::ParticleUpdate => CallPolicy::new(PARTICLE_UPDATE)
                .timed(Category::Particle)
                .tallied(Tally::ParticleUpdate),
            Self::ParticleAdd => CallPolicy::new(PARTICLE_ADD).tallied(Tally::ParticleAdd),
            Self::GlowColor => CallPolicy::new(GLOW_COLOR),
            Self::PlayerGlow => CallPolicy::new(PLAYER_GLOW),
            Self::ActivateObject => CallPolicy::new(ACTIVATE_OBJECT),
            Self::PulseEffects => {
                CallPolicy::new(PULSE).rolled_into(Category::PulseEffect, Category::Effect)
            }
            Self::OpacityEffects => {
                CallPolicy::new(OPACITY).rolled_into(Category::OpacityEffect, Category::Effect)
            }
            Self::TriggerActivated => CallPolicy::new(TRIGGER).tallied(Tally::Trigger),
            Self::MoveActions => CallPolicy::new(ACTIONS).timed(Category::MoveActions),
            Self::RotationActions => CallPolicy::new(ACTIONS).timed(Category::RotationActions),
            Self::TransformActions => CallPolicy::new(TRANSFORMS).timed(Category::TransformActions),
            Self::AreaActions => CallPolicy::new(AREA).timed(Category::AreaActions),
            Self::FollowActions => CallPolicy::new(FOLLOW).timed(Category::TransformActions),
            Self::AdvancedFollow => CallPolicy::new(ADVANCED_FOLLOW),
            Self::PlayerFollow => CallPolicy::new(PLAYER_FOLLOW),
            Self::DynamicObjects => CallPolicy::new(DYNAMIC_OBJECTS),
            Self::EnterEffects => CallPolicy::new(ENTER_EFFECTS),
            Self::WaveTrail => CallPolicy::new(WAVE_TRAIL),
            Self::SpawnGroup => CallPolicy::new(SPAWN).tallied(Tally::SpawnGroup),
            Self::GradientLayers => CallPolicy::new(GRADIENTS),
            Self::LabelUpdate => CallPolicy::new(LABELS),
        }
    }

    /// Option flags consulted by this site's rules.
    pub fn flags(self) -> impl Iterator<Item = OptionKey> {
        self.policy().rules.iter().map(GateRule::flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_option_except_display_is_consulted_somewhere() {
        for key in OptionKey::ALL {
            if matches!(key, OptionKey::ShowProfiler | OptionKey::ShowDetailedProfiler) {
                continue;
            }
            assert!(
                CallSite::ALL.iter().any(|s| s.flags().any(|f| f == key)),
                "{key} is not consulted by any call site"
            );
        }
    }

    #[test]
    fn additive_and_assign_timing_categories() {
        assert_eq!(
            CallSite::GameUpdate.policy().timing.map(|t| t.category),
            Some(Category::Update)
        );
        assert_eq!(
            CallSite::FollowActions.policy().timing.map(|t| t.category),
            Some(Category::TransformActions)
        );
        let pulse = CallSite::PulseEffects.policy().timing;
        assert_eq!(
            pulse,
            Some(TimingSpec {
                category: Category::PulseEffect,
                rollup: Some(Category::Effect),
            })
        );
    }

    #[test]
    fn shader_visit_zeroes_on_skip() {
        let p = CallSite::ShaderVisit.policy();
        assert_eq!(p.zero_on_skip, Some(Category::ShaderVisit));
        assert_eq!(CallSite::ShaderCalculations.policy().zero_on_skip, None);
    }

    #[test]
    fn ungated_sites_have_no_rules() {
        for site in [
            CallSite::GameUpdate,
            CallSite::PostUpdate,
            CallSite::UpdateCamera,
        ] {
            assert!(site.policy().rules.is_empty());
        }
    }
}
