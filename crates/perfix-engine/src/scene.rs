//! Host-supplied scene statistics.

/// Active section index range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionBounds {
    /// Leftmost active section.
    pub left: i32,
    /// Rightmost active section.
    pub right: i32,
    /// Bottom active section.
    pub bottom: i32,
    /// Top active section.
    pub top: i32,
}

/// Scene counts gathered by the host after the main update.
///
/// Anything the host cannot supply stays at its zero default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneStats {
    /// All objects in the scene.
    pub total_objects: u32,
    /// Objects in the primary visible set.
    pub visible_objects: u32,
    /// Objects in the secondary visible set.
    pub visible_objects_secondary: u32,
    /// Active gradient layers.
    pub active_gradients: u32,
    /// A shader layer exists.
    pub shader_layer_present: bool,
    /// Active section range.
    pub sections: SectionBounds,
    /// Batch nodes in the render tree.
    pub batch_nodes: u32,
}

impl SceneStats {
    /// Estimated draw calls: one per batch node, particle system and
    /// gradient, plus `shader_cost` when a shader layer exists.
    pub fn draw_call_estimate(&self, particle_systems: u32, shader_cost: u32) -> u32 {
        let shader = if self.shader_layer_present {
            shader_cost
        } else {
            0
        };
        self.batch_nodes
            .saturating_add(particle_systems)
            .saturating_add(shader)
            .saturating_add(self.active_gradients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_calls_sum_components() {
        let s = SceneStats {
            batch_nodes: 12,
            active_gradients: 2,
            shader_layer_present: true,
            ..SceneStats::default()
        };
        assert_eq!(s.draw_call_estimate(4, 5), 12 + 4 + 5 + 2);
    }

    #[test]
    fn no_shader_layer_no_shader_cost() {
        let s = SceneStats {
            batch_nodes: 3,
            ..SceneStats::default()
        };
        assert_eq!(s.draw_call_estimate(0, 5), 3);
        assert_eq!(SceneStats::default().draw_call_estimate(0, 5), 0);
    }
}
