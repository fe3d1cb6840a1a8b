//! Overlay appearance shared by every tier
//!
//! Opacity and size are the only user-adjustable parameters. They are
//! described declaratively as `SliderConfig`s so the same two controls work
//! unchanged in the model viewer, the AR session and the camera overlay.

mod renderer;
mod tilt;

pub use renderer::{
    trigger_button, CaptureFlash, GroundingShadow, HudFrame, Motion, OverlayFrame,
    OverlayRenderer, OverlayVisual, Pivot, ReticuleFrame, SceneFrame, TriggerButton,
};
pub use tilt::TiltOffset;

use crate::config::{OverlayConfig, SliderRange};

/// Which overlay parameter a slider drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderKind {
    Opacity,
    Scale,
}

/// Declarative description of one user-adjustable parameter
#[derive(Debug, Clone, Copy)]
pub struct SliderConfig {
    pub kind: SliderKind,
    pub label: &'static str,
    pub value: f32,
    pub default: f32,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub format: fn(f32) -> String,
}

impl SliderConfig {
    /// Current value rendered for display
    pub fn formatted(&self) -> String {
        (self.format)(self.value)
    }
}

/// Render a fraction as a whole percentage, e.g. `0.85` as `"85%"`
pub fn format_percent(value: f32) -> String {
    format!("{}%", (value * 100.0).round() as i32)
}

/// Current opacity and size of the overlay
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySettings {
    opacity: f32,
    scale: f32,
    ranges: OverlayConfig,
}

impl OverlaySettings {
    pub fn new(ranges: OverlayConfig) -> Self {
        Self {
            opacity: ranges.opacity.default,
            scale: ranges.scale.default,
            ranges,
        }
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    fn range(&self, kind: SliderKind) -> SliderRange {
        match kind {
            SliderKind::Opacity => self.ranges.opacity,
            SliderKind::Scale => self.ranges.scale,
        }
    }

    /// Set a parameter, clamped to its range and snapped to its step.
    /// Returns the value actually stored.
    pub fn set(&mut self, kind: SliderKind, value: f32) -> f32 {
        let range = self.range(kind);
        let value = snap(value, range);
        match kind {
            SliderKind::Opacity => self.opacity = value,
            SliderKind::Scale => self.scale = value,
        }
        value
    }

    pub fn get(&self, kind: SliderKind) -> f32 {
        match kind {
            SliderKind::Opacity => self.opacity,
            SliderKind::Scale => self.scale,
        }
    }

    /// Restore both parameters to their defaults
    pub fn reset(&mut self) {
        self.opacity = self.ranges.opacity.default;
        self.scale = self.ranges.scale.default;
    }

    /// The slider descriptions, opacity first
    pub fn sliders(&self) -> [SliderConfig; 2] {
        [
            self.slider(SliderKind::Opacity, "Opacity"),
            self.slider(SliderKind::Scale, "Size"),
        ]
    }

    fn slider(&self, kind: SliderKind, label: &'static str) -> SliderConfig {
        let range = self.range(kind);
        SliderConfig {
            kind,
            label,
            value: self.get(kind),
            default: range.default,
            min: range.min,
            max: range.max,
            step: range.step,
            format: format_percent,
        }
    }
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}

fn snap(value: f32, range: SliderRange) -> f32 {
    if !value.is_finite() {
        return range.default;
    }
    let clamped = value.clamp(range.min, range.max);
    if range.step <= 0.0 {
        return clamped;
    }
    let steps = ((clamped - range.min) / range.step).round();
    (range.min + steps * range.step).clamp(range.min, range.max)
}
