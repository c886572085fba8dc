//! NPC-specific components.
use bevy::prelude::*;

/// Marker for the NPC the player is walking toward.
#[derive(Component, Debug)]
pub struct Npc;

/// Display data shown on the NPC's name tag.
#[derive(Component, Debug, Clone)]
pub struct Identity {
    pub display_name: String,
}

impl Identity {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }
}

/// Axis-aligned hit rectangle centred on the NPC's translation.
#[derive(Component, Debug, Clone, Copy)]
pub struct NpcHitRegion {
    pub half_extent: Vec2,
}

impl NpcHitRegion {
    pub fn from_size(size: f32) -> Self {
        Self {
            half_extent: Vec2::splat(size.max(0.0) * 0.5),
        }
    }

    /// Whether `point` lies inside the rectangle grown by `margin` on every side.
    pub fn contains_with_margin(&self, center: Vec2, point: Vec2, margin: f32) -> bool {
        let reach = self.half_extent + Vec2::splat(margin.max(0.0));
        let offset = (point - center).abs();
        offset.x <= reach.x && offset.y <= reach.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_region_grows_by_margin() {
        let region = NpcHitRegion::from_size(32.0);
        let center = Vec2::new(100.0, 50.0);

        assert!(region.contains_with_margin(center, center, 0.0));
        assert!(region.contains_with_margin(center, center + Vec2::new(16.0, -16.0), 0.0));
        assert!(!region.contains_with_margin(center, center + Vec2::new(30.0, 0.0), 0.0));
        assert!(region.contains_with_margin(center, center + Vec2::new(30.0, 0.0), 40.0));
        assert!(!region.contains_with_margin(center, center + Vec2::new(57.0, 0.0), 40.0));
    }

    #[test]
    fn negative_margin_is_ignored() {
        let region = NpcHitRegion::from_size(20.0);
        assert!(region.contains_with_margin(Vec2::ZERO, Vec2::new(10.0, 10.0), -5.0));
    }
}
