//! Per-call facts the throttle gate needs and the host effects it requests.

use std::fmt;

/// Kind of trigger object being activated.
///
/// Known kinds are identified by their object id; everything else is
/// carried through as [`TriggerKind::Other`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    /// Move trigger (object 901).
    Move,
    /// Pulse trigger (object 1006).
    Pulse,
    /// Spawn trigger (object 1268).
    Spawn,
    /// Shake trigger (object 1520).
    Shake,
    /// Any other trigger object id.
    Other(u32),
}

impl TriggerKind {
    /// Classify a trigger by its object id.
    pub fn from_object_id(id: u32) -> Self {
        match id {
            901 => Self::Move,
            1006 => Self::Pulse,
            1268 => Self::Spawn,
            1520 => Self::Shake,
            other => Self::Other(other),
        }
    }

    /// Object id of this kind.
    pub fn object_id(self) -> u32 {
        match self {
            Self::Move => 901,
            Self::Pulse => 1006,
            Self::Spawn => 1268,
            Self::Shake => 1520,
            Self::Other(id) => id,
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move => f.write_str("move"),
            Self::Pulse => f.write_str("pulse"),
            Self::Spawn => f.write_str("spawn"),
            Self::Shake => f.write_str("shake"),
            Self::Other(id) => write!(f, "#{id}"),
        }
    }
}

/// Facts about one call that a gate rule may depend on.
///
/// Supplied by the wrapped [`Operation`](crate::Operation). The defaults
/// describe an ordinary call with its target present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallAttrs {
    /// The collaborator the call acts on exists this tick. A call whose
    /// target is absent is never counted as disabled.
    pub target_present: bool,
    /// The target object is flagged high-detail.
    pub high_detail: bool,
    /// Trigger kind, for trigger activations.
    pub trigger: Option<TriggerKind>,
    /// Instance key for minimum-interval rules; calls with different keys
    /// keep separate last-run markers.
    pub instance: u64,
}

impl Default for CallAttrs {
    fn default() -> Self {
        Self {
            target_present: true,
            high_detail: false,
            trigger: None,
            instance: 0,
        }
    }
}

impl CallAttrs {
    /// Attributes for a call whose target is missing.
    pub fn absent() -> Self {
        Self {
            target_present: false,
            ..Self::default()
        }
    }

    /// Attributes for a trigger activation of `kind`.
    pub fn trigger(kind: TriggerKind) -> Self {
        Self {
            trigger: Some(kind),
            ..Self::default()
        }
    }

    /// Mark the target as high-detail.
    pub fn with_high_detail(mut self, high_detail: bool) -> Self {
        self.high_detail = high_detail;
        self
    }

    /// Set the minimum-interval instance key.
    pub fn with_instance(mut self, instance: u64) -> Self {
        self.instance = instance;
        self
    }
}

/// A state change the host must apply as part of a gate decision.
///
/// These are the documented per-operation side effects of gating; generic
/// rules never produce them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEffect {
    /// Show or hide the shader layer node.
    SetShaderLayerVisible(bool),
    /// Render the layer's children without the shader pass.
    VisitChildrenOnly,
    /// Hide the particle system being skipped.
    HideParticleSystem,
    /// Hide the object's glow sprite.
    HideGlowSprite,
    /// Force the gravity-effect flag off before the visibility pass.
    DisableGravityEffect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_object_ids_round_trip() {
        for kind in [
            TriggerKind::Move,
            TriggerKind::Pulse,
            TriggerKind::Spawn,
            TriggerKind::Shake,
            TriggerKind::Other(31),
        ] {
            assert_eq!(TriggerKind::from_object_id(kind.object_id()), kind);
        }
    }

    #[test]
    fn default_attrs_have_target() {
        let a = CallAttrs::default();
        assert!(a.target_present);
        assert!(!a.high_detail);
        assert_eq!(a.trigger, None);
        assert!(!CallAttrs::absent().target_present);
    }

    #[test]
    fn trigger_attrs_carry_kind() {
        let a = CallAttrs::trigger(TriggerKind::Shake).with_instance(4);
        assert_eq!(a.trigger, Some(TriggerKind::Shake));
        assert_eq!(a.instance, 4);
    }
}
