//! Immersive AR session interfaces
//!
//! Modelled on the shape of hit-testing AR runtimes: a runtime hands out a
//! graphics context and sessions, a session hands out reference spaces, a
//! hit-test source and one frame per animation callback.

use async_trait::async_trait;
use glam::{Quat, Vec3};

use super::{CapabilityProbe, PlatformError};
use crate::projection::ViewTransform;

/// Optional or required session capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XrFeature {
    HitTest,
    DomOverlay,
}

/// Parameters of an immersive AR session request
#[derive(Debug, Clone, PartialEq)]
pub struct XrSessionRequest {
    pub required_features: Vec<XrFeature>,
    pub optional_features: Vec<XrFeature>,
}

impl XrSessionRequest {
    /// Hit-testing is required; the DOM overlay is requested when asked for
    pub fn hit_test(dom_overlay: bool) -> Self {
        let optional_features = if dom_overlay {
            vec![XrFeature::DomOverlay]
        } else {
            Vec::new()
        };
        Self {
            required_features: vec![XrFeature::HitTest],
            optional_features,
        }
    }
}

/// Base layer the XR compositor renders into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseLayerConfig {
    pub alpha: bool,
    pub framebuffer_scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSpaceKind {
    /// Stable, world-anchored space
    Local,
    /// Rigidly attached to the viewer
    Viewer,
}

/// Handle to a reference space owned by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceSpace {
    pub id: u32,
    pub kind: ReferenceSpaceKind,
}

/// Handle to a hit-test source owned by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTestSource {
    pub id: u32,
}

/// Rigid transform in some reference space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }
}

/// The viewer's pose for one frame, one view per eye/display
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerPose {
    pub views: Vec<ViewTransform>,
}

/// One ray/surface intersection reported by the runtime
pub trait HitTestResult {
    fn pose(&self, space: ReferenceSpace) -> Option<Pose>;
}

/// Per-frame snapshot handed to the animation callback
pub trait XrFrame {
    fn viewer_pose(&self, space: ReferenceSpace) -> Option<ViewerPose>;
    fn hit_test_results(&self, source: HitTestSource) -> Vec<Box<dyn HitTestResult + '_>>;
}

/// Render-capable graphics context used by the XR compositor
#[async_trait(?Send)]
pub trait XrGraphics {
    async fn make_xr_compatible(&mut self) -> Result<(), PlatformError>;

    /// Clear the current framebuffer to fully transparent
    fn clear_transparent(&mut self);
}

/// A running immersive AR session
#[async_trait(?Send)]
pub trait XrSession {
    fn attach_base_layer(
        &mut self,
        graphics: &mut dyn XrGraphics,
        config: BaseLayerConfig,
    ) -> Result<(), PlatformError>;

    async fn request_reference_space(
        &mut self,
        kind: ReferenceSpaceKind,
    ) -> Result<ReferenceSpace, PlatformError>;

    async fn request_hit_test_source(
        &mut self,
        space: ReferenceSpace,
    ) -> Result<HitTestSource, PlatformError>;

    /// Wait for the next animation callback.
    ///
    /// Returns `None` once the session has ended, whether through `end` or
    /// because the platform terminated it.
    async fn next_frame(&mut self) -> Option<Box<dyn XrFrame>>;

    /// End the session. Ending an already-ended session is not an error.
    fn end(&mut self) -> Result<(), PlatformError>;
}

/// Entry point to the platform's immersive AR support
#[async_trait(?Send)]
pub trait XrRuntime {
    /// Does the platform advertise immersive AR with hit-testing?
    async fn probe_immersive_ar(&self) -> CapabilityProbe;

    async fn create_graphics(&self) -> Result<Box<dyn XrGraphics>, PlatformError>;

    async fn request_session(
        &self,
        request: &XrSessionRequest,
    ) -> Result<Box<dyn XrSession>, PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_test_request_features() {
        let request = XrSessionRequest::hit_test(true);
        assert_eq!(request.required_features, vec![XrFeature::HitTest]);
        assert_eq!(request.optional_features, vec![XrFeature::DomOverlay]);

        let request = XrSessionRequest::hit_test(false);
        assert!(request.optional_features.is_empty());
    }
}
