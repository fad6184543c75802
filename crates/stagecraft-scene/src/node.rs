//! UI primitives driven by animatables.
//!
//! These are the minimal retained-mode pieces a screen needs: a
//! [`RectTransform`] for layout and scale, a [`CanvasGroup`] for opacity and a
//! [`Canvas`] that can be shown or hidden. They are shared through
//! [`Shared`] handles; tweens only ever hold weak references, so dropping a
//! node silently ends every tween on it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::animation::timeline::Tween;
use crate::animation::types::{AnimatableProperty, AnimatableValue, Vec2, Vec3};

/// Single-threaded shared handle.
pub type Shared<T> = Rc<RefCell<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// The layout part of a [`RectTransform`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectLayout {
    pub anchored_position: Vec2,
    pub size_delta: Vec2,
    pub pivot: Vec2,
    pub anchor_min: Vec2,
    pub anchor_max: Vec2,
}

impl Default for RectLayout {
    fn default() -> Self {
        Self {
            anchored_position: Vec2::ZERO,
            size_delta: Vec2::splat(100.0),
            pivot: Vec2::splat(0.5),
            anchor_min: Vec2::splat(0.5),
            anchor_max: Vec2::splat(0.5),
        }
    }
}

impl RectLayout {
    pub fn get(&self, property: AnimatableProperty) -> Option<Vec2> {
        match property {
            AnimatableProperty::AnchoredPosition => Some(self.anchored_position),
            AnimatableProperty::SizeDelta => Some(self.size_delta),
            AnimatableProperty::Pivot => Some(self.pivot),
            AnimatableProperty::AnchorMin => Some(self.anchor_min),
            AnimatableProperty::AnchorMax => Some(self.anchor_max),
            AnimatableProperty::Scale | AnimatableProperty::Alpha => None,
        }
    }
}

/// Position, size and scale of a UI element relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectTransform {
    pub anchored_position: Vec2,
    pub size_delta: Vec2,
    pub pivot: Vec2,
    pub anchor_min: Vec2,
    pub anchor_max: Vec2,
    pub scale: Vec3,
}

impl Default for RectTransform {
    fn default() -> Self {
        Self::from_layout(RectLayout::default())
    }
}

impl RectTransform {
    pub fn from_layout(layout: RectLayout) -> Self {
        Self {
            anchored_position: layout.anchored_position,
            size_delta: layout.size_delta,
            pivot: layout.pivot,
            anchor_min: layout.anchor_min,
            anchor_max: layout.anchor_max,
            scale: Vec3::ONE,
        }
    }

    /// Read a property. Returns `None` for properties a rect does not own.
    pub fn get(&self, property: AnimatableProperty) -> Option<AnimatableValue> {
        match property {
            AnimatableProperty::Scale => Some(self.scale.into()),
            AnimatableProperty::Alpha => None,
            layout => self.layout().get(layout).map(AnimatableValue::from),
        }
    }

    /// Write a property. Returns `false` if the rect does not own the
    /// property or the value has the wrong shape.
    pub fn set(&mut self, property: AnimatableProperty, value: AnimatableValue) -> bool {
        if let AnimatableProperty::Scale = property {
            return match value.as_vec3() {
                Some(scale) => {
                    self.scale = scale;
                    true
                }
                None => false,
            };
        }

        let Some(v) = value.as_vec2() else {
            return false;
        };
        let field = match property {
            AnimatableProperty::AnchoredPosition => &mut self.anchored_position,
            AnimatableProperty::SizeDelta => &mut self.size_delta,
            AnimatableProperty::Pivot => &mut self.pivot,
            AnimatableProperty::AnchorMin => &mut self.anchor_min,
            AnimatableProperty::AnchorMax => &mut self.anchor_max,
            AnimatableProperty::Scale | AnimatableProperty::Alpha => return false,
        };
        *field = v;
        true
    }

    pub fn layout(&self) -> RectLayout {
        RectLayout {
            anchored_position: self.anchored_position,
            size_delta: self.size_delta,
            pivot: self.pivot,
            anchor_min: self.anchor_min,
            anchor_max: self.anchor_max,
        }
    }

    /// Overwrite every layout field, keeping the scale.
    pub fn apply_layout(&mut self, layout: &RectLayout) {
        self.anchored_position = layout.anchored_position;
        self.size_delta = layout.size_delta;
        self.pivot = layout.pivot;
        self.anchor_min = layout.anchor_min;
        self.anchor_max = layout.anchor_max;
    }
}

/// Opacity shared by an element and its children.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasGroup {
    pub alpha: f32,
}

impl Default for CanvasGroup {
    fn default() -> Self {
        Self { alpha: 1.0 }
    }
}

/// Root of a screen; disabled canvases are not drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Canvas {
    pub enabled: bool,
}

/// Tween a rect property towards `to`.
pub fn tween_rect(
    rect: &Shared<RectTransform>,
    property: AnimatableProperty,
    to: AnimatableValue,
    duration: f32,
) -> Tween {
    let read: Weak<RefCell<RectTransform>> = Rc::downgrade(rect);
    let write = read.clone();
    Tween::new(
        move || {
            let rect = read.upgrade()?;
            let value = rect.borrow().get(property);
            value
        },
        move |value| {
            if let Some(rect) = write.upgrade() {
                rect.borrow_mut().set(property, value);
            }
        },
        to,
        duration,
    )
}

/// Tween a canvas group's alpha towards `to`.
pub fn tween_alpha(group: &Shared<CanvasGroup>, to: f32, duration: f32) -> Tween {
    let read: Weak<RefCell<CanvasGroup>> = Rc::downgrade(group);
    let write = read.clone();
    Tween::new(
        move || {
            let group = read.upgrade()?;
            let alpha = group.borrow().alpha;
            Some(alpha.into())
        },
        move |value| {
            if let (Some(group), Some(alpha)) = (write.upgrade(), value.as_f32()) {
                group.borrow_mut().alpha = alpha;
            }
        },
        to.into(),
        duration,
    )
}
