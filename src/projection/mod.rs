//! World-to-screen projection for hit-test anchoring
//!
//! Projects a world-space point through a hardware-supplied view into
//! normalized device coordinates, then into percentage-of-viewport space.
//! Everything here is pure math with no I/O.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Clip-space `w` magnitudes below this are treated as "at or behind the eye".
pub const CLIP_W_EPSILON: f32 = 1e-6;

/// A point in percentage-of-viewport units (0 = left/top, 100 = right/bottom).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    /// Centre of the viewport
    pub const CENTER: ScreenPoint = ScreenPoint { x: 50.0, y: 50.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Convert to pixels for a viewport of the given size
    pub fn to_pixels(self, width: f32, height: f32) -> Vec2 {
        Vec2::new(self.x / 100.0 * width, self.y / 100.0 * height)
    }

    /// Linear interpolation towards `target` (t = 0 keeps self, t = 1 reaches target)
    pub fn lerp(self, target: ScreenPoint, t: f32) -> ScreenPoint {
        let t = t.clamp(0.0, 1.0);
        ScreenPoint {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }
}

/// The pair of matrices describing one camera view for a single frame.
///
/// Supplied by the XR runtime and never mutated here. `inverse_view` maps
/// world space into eye space (the inverse of the viewer's transform).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub inverse_view: Mat4,
    pub projection: Mat4,
}

impl ViewTransform {
    pub fn new(inverse_view: Mat4, projection: Mat4) -> Self {
        Self {
            inverse_view,
            projection,
        }
    }

    /// Build from column-major float arrays as handed out by XR runtimes
    pub fn from_column_major(inverse_view: &[f32; 16], projection: &[f32; 16]) -> Self {
        Self {
            inverse_view: Mat4::from_cols_array(inverse_view),
            projection: Mat4::from_cols_array(projection),
        }
    }
}

/// Project a world-space point into normalized device coordinates.
///
/// Returns `None` when the clip-space `w` is too close to zero to divide by.
pub fn world_to_ndc(position: Vec3, view: &ViewTransform) -> Option<Vec2> {
    let eye = view.inverse_view * position.extend(1.0);
    let clip = view.projection * eye;
    if clip.w.abs() < CLIP_W_EPSILON {
        return None;
    }
    Some(Vec2::new(clip.x / clip.w, clip.y / clip.w))
}

/// Map NDC (`[-1, 1]` on both axes, Y up) to screen percentage (Y down).
pub fn ndc_to_screen(ndc: Vec2) -> ScreenPoint {
    ScreenPoint {
        x: (ndc.x + 1.0) * 50.0,
        y: (1.0 - ndc.y) * 50.0,
    }
}

/// Project a world-space point all the way to percentage-of-viewport space.
pub fn project_to_screen(position: Vec3, view: &ViewTransform) -> Option<ScreenPoint> {
    world_to_ndc(position, view).map(ndc_to_screen)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perspective_view() -> ViewTransform {
        let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        ViewTransform::new(Mat4::IDENTITY, projection)
    }

    #[test]
    fn test_point_straight_ahead_lands_in_center() {
        let point = project_to_screen(Vec3::new(0.0, 0.0, -5.0), &perspective_view()).unwrap();
        assert!((point.x - 50.0).abs() < 1e-4);
        assert!((point.y - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_vertical_axis_is_inverted() {
        assert_eq!(ndc_to_screen(Vec2::new(0.0, 1.0)), ScreenPoint::new(50.0, 0.0));
        assert_eq!(ndc_to_screen(Vec2::new(0.0, -1.0)), ScreenPoint::new(50.0, 100.0));
        assert_eq!(ndc_to_screen(Vec2::new(-1.0, 0.0)), ScreenPoint::new(0.0, 50.0));
        assert_eq!(ndc_to_screen(Vec2::new(1.0, 0.0)), ScreenPoint::new(100.0, 50.0));
    }

    #[test]
    fn test_ndc_inside_unit_square_stays_in_percent_range() {
        let steps = [-1.0, -0.75, -0.3, 0.0, 0.4, 0.9, 1.0];
        for &x in &steps {
            for &y in &steps {
                let p = ndc_to_screen(Vec2::new(x, y));
                assert!((0.0..=100.0).contains(&p.x), "x out of range for {x}");
                assert!((0.0..=100.0).contains(&p.y), "y out of range for {y}");
            }
        }
    }

    #[test]
    fn test_point_in_eye_plane_is_rejected() {
        // Perspective projection puts -z_eye into w, so z = 0 gives w = 0
        assert!(project_to_screen(Vec3::new(1.0, 1.0, 0.0), &perspective_view()).is_none());
    }

    #[test]
    fn test_tiny_w_is_rejected() {
        let mut cols = Mat4::IDENTITY.to_cols_array();
        // Scale w down below the epsilon
        cols[15] = 1e-8;
        let view = ViewTransform::from_column_major(&Mat4::IDENTITY.to_cols_array(), &cols);
        assert!(world_to_ndc(Vec3::ZERO, &view).is_none());
    }

    #[test]
    fn test_view_matrix_is_applied_before_projection() {
        // Camera moved 2 units right: a point at x = 2 should appear centred
        let camera = Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0));
        let view = ViewTransform::new(camera.inverse(), perspective_view().projection);
        let point = project_to_screen(Vec3::new(2.0, 0.0, -3.0), &view).unwrap();
        assert!((point.x - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_point_above_center_maps_to_upper_half() {
        let point = project_to_screen(Vec3::new(0.0, 1.0, -5.0), &perspective_view()).unwrap();
        assert!(point.y < 50.0);
    }

    #[test]
    fn test_column_major_layout_matches_glam() {
        let translation = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let view = ViewTransform::from_column_major(
            &translation.to_cols_array(),
            &Mat4::IDENTITY.to_cols_array(),
        );
        assert_eq!(view.inverse_view, translation);
    }

    #[test]
    fn test_lerp_clamps_factor() {
        let a = ScreenPoint::new(0.0, 0.0);
        let b = ScreenPoint::new(10.0, 20.0);
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, 0.5), ScreenPoint::new(5.0, 10.0));
    }
}
