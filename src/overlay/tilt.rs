//! Tilt-driven parallax for the camera overlay.

use glam::Vec2;

use crate::config::TiltConfig;
use crate::platform::OrientationReading;

/// Pixel offset applied to the overlay in the camera tier
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TiltOffset {
    pub x: f32,
    pub y: f32,
}

impl TiltOffset {
    pub const ZERO: TiltOffset = TiltOffset { x: 0.0, y: 0.0 };

    /// Offset proportional to tilt, saturating at the configured angle.
    ///
    /// Left/right tilt (gamma) moves the overlay horizontally, front/back
    /// tilt (beta) vertically. Missing angles count as level.
    pub fn from_reading(reading: OrientationReading, config: &TiltConfig) -> Self {
        let max_angle = config.max_angle_deg.max(f32::EPSILON);
        let gamma = reading.gamma.unwrap_or(0.0).clamp(-max_angle, max_angle);
        let beta = reading.beta.unwrap_or(0.0).clamp(-max_angle, max_angle);
        Self {
            x: gamma / max_angle * config.max_offset_x,
            y: beta / max_angle * config.max_offset_y,
        }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}
