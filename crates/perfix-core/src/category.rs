//! Timing categories and how measurements fold into them.

use std::fmt;

/// How repeated measurements of one category combine within an interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accumulation {
    /// Every measurement is added to the running total
    /// (e.g. particle updates summed over many systems).
    Additive,
    /// Each measurement overwrites the previous one
    /// (e.g. the single shader visit of a frame).
    Assign,
}

/// A named bucket of measured milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Category {
    /// The host's main update call.
    Update,
    /// Shader layer visit (render pass).
    ShaderVisit,
    /// Shader parameter calculations.
    ShaderCalc,
    /// Particle system updates.
    Particle,
    /// Rollup of all effect passes.
    Effect,
    /// Pulse effect pass.
    PulseEffect,
    /// Opacity effect pass.
    OpacityEffect,
    /// Visibility / culling pass.
    Visibility,
    /// Collision checks.
    Collision,
    /// Camera update.
    Camera,
    /// Move actions.
    MoveActions,
    /// Rotation actions.
    RotationActions,
    /// Transform and follow actions.
    TransformActions,
    /// Area actions.
    AreaActions,
    /// Audio processing, measured by the host with its own scopes.
    Audio,
    /// Post-update pass.
    PostUpdate,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 16;

    /// Every category, in discriminant order.
    pub const ALL: [Category; Self::COUNT] = [
        Self::Update,
        Self::ShaderVisit,
        Self::ShaderCalc,
        Self::Particle,
        Self::Effect,
        Self::PulseEffect,
        Self::OpacityEffect,
        Self::Visibility,
        Self::Collision,
        Self::Camera,
        Self::MoveActions,
        Self::RotationActions,
        Self::TransformActions,
        Self::AreaActions,
        Self::Audio,
        Self::PostUpdate,
    ];

    /// Index into a table of length [`COUNT`](Self::COUNT).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short lowercase label used in reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::ShaderVisit => "shader",
            Self::ShaderCalc => "shader-calc",
            Self::Particle => "particle",
            Self::Effect => "effects",
            Self::PulseEffect => "pulse",
            Self::OpacityEffect => "opacity",
            Self::Visibility => "visibility",
            Self::Collision => "collision",
            Self::Camera => "camera",
            Self::MoveActions => "move",
            Self::RotationActions => "rotate",
            Self::TransformActions => "transform",
            Self::AreaActions => "area",
            Self::Audio => "audio",
            Self::PostUpdate => "post-update",
        }
    }

    /// How measurements of this category combine.
    ///
    /// The main update and the shader visit happen once per frame and
    /// keep only the latest value; everything else is summed.
    pub fn accumulation(self) -> Accumulation {
        match self {
            Self::Update | Self::ShaderVisit => Accumulation::Assign,
            _ => Accumulation::Additive,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
