//! Multi-property animatable for UI elements.
//!
//! A [`PropertyAnimatable`] drives up to three independently toggled
//! property groups of one element:
//! - **scale** of its [`RectTransform`]
//! - **fade** of its [`CanvasGroup`]
//! - **rect** layout (anchored position, size delta, pivot and anchors)
//!
//! Each group has its own start/end values, duration and easing. All enabled
//! groups are joined into the same timeline, so a play lasts as long as the
//! slowest group. Reverse plays head for the start values and run the
//! inverted easing curve.
//!
//! # Example
//!
//! ```
//! use stagecraft_scene::animation::{AnimationRuntime, FadeSettings, PropertyAnimatable};
//! use stagecraft_scene::animation::Animatable;
//! use stagecraft_scene::node::{shared, CanvasGroup};
//!
//! let runtime = AnimationRuntime::new();
//! let group = shared(CanvasGroup::default());
//! let mut panel = PropertyAnimatable::new(runtime.clone())
//!     .with_group(&group)
//!     .with_fade(FadeSettings { enabled: true, ..Default::default() });
//!
//! panel.set_to_start();
//! assert_eq!(group.borrow().alpha, 0.0);
//!
//! panel.animate(false);
//! runtime.update(1.0);
//! assert_eq!(group.borrow().alpha, 1.0);
//! ```

use serde::{Deserialize, Serialize};

use super::animatable::{Animatable, Boundary, TimelineSlot};
use super::easing::EasingFunction;
use super::runtime::AnimationRuntime;
use super::timeline::Timeline;
use super::types::{AnimatableProperty, Vec3};
use crate::node::{CanvasGroup, RectLayout, RectTransform, Shared, tween_alpha, tween_rect};

const DEFAULT_DURATION: f32 = 0.5;

/// Scale of the element's rect, pops in with an overshoot by default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleSettings {
    pub enabled: bool,
    pub start: Vec3,
    pub end: Vec3,
    pub duration: f32,
    pub easing: EasingFunction,
}

impl Default for ScaleSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            start: Vec3::ZERO,
            end: Vec3::ONE,
            duration: DEFAULT_DURATION,
            easing: EasingFunction::OutBack,
        }
    }
}

/// Opacity of the element's canvas group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeSettings {
    pub enabled: bool,
    pub start: f32,
    pub end: f32,
    pub duration: f32,
    pub easing: EasingFunction,
}

impl Default for FadeSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            start: 0.0,
            end: 1.0,
            duration: DEFAULT_DURATION,
            easing: EasingFunction::OutQuad,
        }
    }
}

/// Layout of the element's rect. The five layout properties share one
/// duration and easing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectSettings {
    pub enabled: bool,
    pub start: RectLayout,
    pub end: RectLayout,
    pub duration: f32,
    pub easing: EasingFunction,
}

impl Default for RectSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            start: RectLayout::default(),
            end: RectLayout::default(),
            duration: DEFAULT_DURATION,
            easing: EasingFunction::OutQuad,
        }
    }
}

/// Authored settings of a [`PropertyAnimatable`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertySettings {
    pub scale: ScaleSettings,
    pub fade: FadeSettings,
    pub rect: RectSettings,
}

impl PropertySettings {
    /// Duration of a play: the longest enabled group, zero if none is enabled.
    pub fn duration(&self) -> f32 {
        [
            (self.scale.enabled, self.scale.duration),
            (self.fade.enabled, self.fade.duration),
            (self.rect.enabled, self.rect.duration),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, duration)| duration.max(0.0))
        .fold(0.0, f32::max)
    }
}

/// Animatable driving scale, opacity and layout of one UI element.
#[derive(Debug)]
pub struct PropertyAnimatable {
    settings: PropertySettings,
    rect: Option<Shared<RectTransform>>,
    group: Option<Shared<CanvasGroup>>,
    slot: TimelineSlot,
}

impl PropertyAnimatable {
    /// Create an animatable with every property group disabled.
    pub fn new(runtime: AnimationRuntime) -> Self {
        Self {
            settings: PropertySettings::default(),
            rect: None,
            group: None,
            slot: TimelineSlot::new(runtime),
        }
    }

    /// Create an animatable whose rect start and end layouts are both the
    /// rect's current layout.
    pub fn from_current(
        runtime: AnimationRuntime,
        rect: &Shared<RectTransform>,
        group: Option<&Shared<CanvasGroup>>,
    ) -> Self {
        let layout = rect.borrow().layout();
        let mut animatable = Self::new(runtime).with_rect(rect);
        animatable.settings.rect.start = layout;
        animatable.settings.rect.end = layout;
        animatable.group = group.cloned();
        animatable
    }

    pub fn with_rect(mut self, rect: &Shared<RectTransform>) -> Self {
        self.rect = Some(rect.clone());
        self
    }

    pub fn with_group(mut self, group: &Shared<CanvasGroup>) -> Self {
        self.group = Some(group.clone());
        self
    }

    pub fn with_scale(mut self, scale: ScaleSettings) -> Self {
        self.settings.scale = scale;
        self
    }

    pub fn with_fade(mut self, fade: FadeSettings) -> Self {
        self.settings.fade = fade;
        self
    }

    pub fn with_rect_layout(mut self, rect: RectSettings) -> Self {
        self.settings.rect = rect;
        self
    }

    pub fn with_settings(mut self, settings: PropertySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &PropertySettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut PropertySettings {
        &mut self.settings
    }

    pub fn rect(&self) -> Option<&Shared<RectTransform>> {
        self.rect.as_ref()
    }

    pub fn group(&self) -> Option<&Shared<CanvasGroup>> {
        self.group.as_ref()
    }

    /// Capture the rect's live layout as the start layout.
    pub fn copy_current_to_start(&mut self) {
        if let Some(rect) = &self.rect {
            self.settings.rect.start = rect.borrow().layout();
        }
    }

    /// Capture the rect's live layout as the end layout.
    pub fn copy_current_to_end(&mut self) {
        if let Some(rect) = &self.rect {
            self.settings.rect.end = rect.borrow().layout();
        }
    }
}

impl Animatable for PropertyAnimatable {
    fn slot(&self) -> &TimelineSlot {
        &self.slot
    }

    fn slot_mut(&mut self) -> &mut TimelineSlot {
        &mut self.slot
    }

    fn apply_boundary(&mut self, boundary: Boundary) {
        let PropertySettings { scale, fade, rect } = &self.settings;

        if scale.enabled {
            match &self.rect {
                Some(target) => target.borrow_mut().scale = boundary.pick(scale.start, scale.end),
                None => log::debug!("scale enabled without a rect; skipped"),
            }
        }

        if fade.enabled {
            match &self.group {
                Some(group) => group.borrow_mut().alpha = boundary.pick(fade.start, fade.end),
                None => log::debug!("fade enabled without a canvas group; skipped"),
            }
        }

        if rect.enabled {
            match &self.rect {
                Some(target) => target
                    .borrow_mut()
                    .apply_layout(boundary.pick(&rect.start, &rect.end)),
                None => log::debug!("rect enabled without a rect; skipped"),
            }
        }
    }

    fn populate(&mut self, timeline: &Timeline, reverse: bool) {
        let boundary = Boundary::target(reverse);
        let PropertySettings { scale, fade, rect } = &self.settings;

        if scale.enabled {
            if let Some(target) = &self.rect {
                let to = boundary.pick(scale.start, scale.end);
                timeline.join(
                    tween_rect(target, AnimatableProperty::Scale, to.into(), scale.duration)
                        .with_easing(scale.easing.for_direction(reverse)),
                );
            } else {
                log::debug!("scale enabled without a rect; skipped");
            }
        }

        if fade.enabled {
            if let Some(group) = &self.group {
                let to = boundary.pick(fade.start, fade.end);
                timeline.join(
                    tween_alpha(group, to, fade.duration)
                        .with_easing(fade.easing.for_direction(reverse)),
                );
            } else {
                log::debug!("fade enabled without a canvas group; skipped");
            }
        }

        if rect.enabled {
            if let Some(target) = &self.rect {
                let layout = boundary.pick(&rect.start, &rect.end);
                let easing = rect.easing.for_direction(reverse);
                for property in AnimatableProperty::LAYOUT {
                    let Some(to) = layout.get(property) else {
                        continue;
                    };
                    timeline.join(
                        tween_rect(target, property, to.into(), rect.duration)
                            .with_easing(easing),
                    );
                }
            } else {
                log::debug!("rect enabled without a rect; skipped");
            }
        }
    }
}
