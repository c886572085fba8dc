//! Eased visibility value shared by prompts, bubbles and labels.

/// Opacity-like value that moves toward 0 or 1 over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    value: f32,
    duration: f32,
}

impl Fade {
    /// Starts fully hidden.
    pub fn hidden(duration: f32) -> Self {
        Self {
            value: 0.0,
            duration: duration.max(0.0),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Advances toward `visible` and returns the new value.
    ///
    /// A zero duration snaps straight to the target.
    pub fn step(&mut self, visible: bool, delta_seconds: f32) -> f32 {
        let target = if visible { 1.0 } else { 0.0 };
        if self.duration <= f32::EPSILON {
            self.value = target;
            return self.value;
        }

        let rate = (delta_seconds / self.duration).max(0.0);
        self.value = if self.value < target {
            (self.value + rate).min(target)
        } else {
            (self.value - rate).max(target)
        };
        self.value
    }

    pub fn snap(&mut self, visible: bool) {
        self.value = if visible { 1.0 } else { 0.0 };
    }

    /// Smoothstep of the raw value, used for scale pops.
    pub fn eased(&self) -> f32 {
        let t = self.value.clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t)
    }
}
