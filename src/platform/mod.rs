//! Hardware seams used by the preview
//!
//! Every platform capability the preview touches (immersive AR, camera,
//! orientation sensor, file download) sits behind a trait here. The session
//! controller only ever talks to these traits, so the same state machine runs
//! against a browser shim, a desktop camera or the scripted test platform.

mod camera;
mod desktop;
mod download;
#[cfg(test)]
pub mod mock;
#[cfg(feature = "native-camera")]
mod native_camera;
mod sensor;
mod xr;

pub use camera::{CameraProvider, CameraStream, StreamConstraints, VideoFrame};
pub use desktop::{NoOrientationSensor, NoXrRuntime, StillFrameCamera};
pub use download::{DirectoryDownloader, Downloader};
#[cfg(feature = "native-camera")]
pub use native_camera::NokhwaCameraProvider;
pub use sensor::{OrientationReading, OrientationSensor, SensorSubscription};
pub use xr::{
    BaseLayerConfig, HitTestResult, HitTestSource, Pose, ReferenceSpace, ReferenceSpaceKind,
    ViewerPose, XrFeature, XrFrame, XrGraphics, XrRuntime, XrSession, XrSessionRequest,
};

/// Failure reported by a platform capability
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// The capability does not exist on this device
    #[error("Not supported: {0}")]
    NotSupported(String),
    /// The user or OS refused access
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    /// No matching hardware was found
    #[error("Device not found: {0}")]
    NotFound(String),
    /// Hardware exists but is held by another consumer
    #[error("Device busy: {0}")]
    Busy(String),
    /// The request was aborted before it completed
    #[error("Aborted: {0}")]
    Aborted(String),
    #[error("{0}")]
    Failed(String),
}

impl PlatformError {
    /// The user or OS explicitly refused access
    pub fn is_permission_denial(&self) -> bool {
        matches!(self, PlatformError::PermissionDenied(_))
    }

    /// The capability or hardware is simply missing
    pub fn is_absence(&self) -> bool {
        matches!(self, PlatformError::NotSupported(_) | PlatformError::NotFound(_))
    }

    /// A retry later could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, PlatformError::Busy(_) | PlatformError::Aborted(_))
    }
}

/// Answer to "does this platform offer capability X?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityProbe {
    Supported,
    Unsupported,
    /// The platform cannot say up front; the only way to know is to try
    Indeterminate,
}

/// The set of platform capabilities handed to a session controller.
pub struct PlatformServices {
    pub xr: Box<dyn XrRuntime>,
    pub camera: Box<dyn CameraProvider>,
    pub orientation: Box<dyn OrientationSensor>,
}

impl PlatformServices {
    pub fn new(
        xr: Box<dyn XrRuntime>,
        camera: Box<dyn CameraProvider>,
        orientation: Box<dyn OrientationSensor>,
    ) -> Self {
        Self {
            xr,
            camera,
            orientation,
        }
    }

    /// Desktop platform: no immersive AR, no tilt sensor, and a camera fed
    /// from a still image.
    pub fn desktop(still_frame: Option<std::path::PathBuf>) -> Self {
        Self::new(
            Box::new(NoXrRuntime),
            Box::new(StillFrameCamera::new(still_frame)),
            Box::new(NoOrientationSensor),
        )
    }

    /// Desktop platform backed by a live capture device.
    #[cfg(feature = "native-camera")]
    pub fn native(camera_index: u32) -> Self {
        Self::new(
            Box::new(NoXrRuntime),
            Box::new(NokhwaCameraProvider::new(camera_index)),
            Box::new(NoOrientationSensor),
        )
    }
}
