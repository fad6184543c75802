//! Interpolation system for animatable values.
//!
//! Eased progress may leave `[0, 1]` (overshoot curves), so every
//! implementation here extrapolates linearly instead of clamping.

use super::types::{AnimatableValue, Vec2, Vec3};

/// Trait for types that can be interpolated between two values.
pub trait Interpolate: Sized {
    /// Interpolate between self and another value.
    ///
    /// When t = 0.0, returns self.
    /// When t = 1.0, returns to.
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

#[inline]
fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        lerp(*self, *to, t)
    }
}

impl Interpolate for Vec2 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Vec2::new(lerp(self.x, to.x, t), lerp(self.y, to.y, t))
    }
}

impl Interpolate for Vec3 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Vec3::new(lerp(self.x, to.x, t), lerp(self.y, to.y, t), lerp(self.z, to.z, t))
    }
}

impl Interpolate for AnimatableValue {
    /// Both values must be of the same variant. If they differ, returns self unchanged.
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        match (self, to) {
            (Self::Float { value: from }, Self::Float { value: to_val }) => Self::Float {
                value: from.interpolate(to_val, t),
            },
            (Self::Vec2 { value: from }, Self::Vec2 { value: to_val }) => Self::Vec2 {
                value: from.interpolate(to_val, t),
            },
            (Self::Vec3 { value: from }, Self::Vec3 { value: to_val }) => Self::Vec3 {
                value: from.interpolate(to_val, t),
            },
            _ => *self,
        }
    }
}
