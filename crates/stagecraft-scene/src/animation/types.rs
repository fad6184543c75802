//! Core animation types and data structures.
//!
//! This module defines the fundamental types for the animation system:
//! - `Vec2` / `Vec3`: Plain vector values used by layout properties
//! - `AnimatableValue`: Enum for all animatable property values
//! - `AnimatableProperty`: Enum naming the properties a tween can drive
//! - `AnimationId`: Unique identifier for timelines
//! - `AnimationState`: Current state of a timeline

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a timeline instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl AnimationId {
    /// Generate a new unique animation ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for AnimationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Current state of a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    /// Timeline is playing (or waiting for its parent to reach it).
    Running,
    /// Timeline reached its end naturally.
    Finished,
    /// Timeline was killed before reaching its end.
    Cancelled,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::Running
    }
}

/// Two-component vector (anchored position, size delta, pivot, anchors).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn splat(v: f32) -> Self {
        Self::new(v, v)
    }
}

/// Three-component vector (local scale).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }
}

/// Enum representing all animatable value types.
///
/// This enum wraps the different types of values that can be animated,
/// allowing timelines to handle them uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimatableValue {
    /// Scalar value (opacity).
    Float { value: f32 },
    /// Two-component value (position, size, pivot, anchors).
    Vec2 {
        #[serde(flatten)]
        value: Vec2,
    },
    /// Three-component value (scale).
    Vec3 {
        #[serde(flatten)]
        value: Vec3,
    },
}

impl AnimatableValue {
    /// Try to extract a scalar value.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float { value } => Some(*value),
            _ => None,
        }
    }

    /// Try to extract a two-component value.
    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            Self::Vec2 { value } => Some(*value),
            _ => None,
        }
    }

    /// Try to extract a three-component value.
    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            Self::Vec3 { value } => Some(*value),
            _ => None,
        }
    }
}

impl From<f32> for AnimatableValue {
    fn from(v: f32) -> Self {
        Self::Float { value: v }
    }
}

impl From<Vec2> for AnimatableValue {
    fn from(v: Vec2) -> Self {
        Self::Vec2 { value: v }
    }
}

impl From<Vec3> for AnimatableValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3 { value: v }
    }
}

/// Properties of a UI element that a tween can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimatableProperty {
    /// Local scale of the element's rect.
    Scale,
    /// Opacity of the element's canvas group.
    Alpha,
    AnchoredPosition,
    SizeDelta,
    Pivot,
    AnchorMin,
    AnchorMax,
}

impl AnimatableProperty {
    /// The rect layout properties, in the order they are tweened.
    pub const LAYOUT: [Self; 5] = [
        Self::AnchoredPosition,
        Self::SizeDelta,
        Self::Pivot,
        Self::AnchorMin,
        Self::AnchorMax,
    ];

    /// Get the snake_case name of this property.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scale => "scale",
            Self::Alpha => "alpha",
            Self::AnchoredPosition => "anchored_position",
            Self::SizeDelta => "size_delta",
            Self::Pivot => "pivot",
            Self::AnchorMin => "anchor_min",
            Self::AnchorMax => "anchor_max",
        }
    }

    /// Check if animating this property moves or resizes the element.
    pub fn affects_layout(&self) -> bool {
        Self::LAYOUT.contains(self)
    }
}
