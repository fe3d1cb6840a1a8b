//! Desktop stand-ins for capabilities a desktop machine lacks.

use std::cell::Cell;
use std::path::PathBuf;

use async_trait::async_trait;

use super::{
    CameraProvider, CameraStream, CapabilityProbe, OrientationSensor, PlatformError,
    SensorSubscription, StreamConstraints, VideoFrame, XrGraphics, XrRuntime, XrSession,
    XrSessionRequest,
};

/// Runtime for platforms without immersive AR
pub struct NoXrRuntime;

#[async_trait(?Send)]
impl XrRuntime for NoXrRuntime {
    async fn probe_immersive_ar(&self) -> CapabilityProbe {
        CapabilityProbe::Unsupported
    }

    async fn create_graphics(&self) -> Result<Box<dyn XrGraphics>, PlatformError> {
        Err(PlatformError::NotSupported("immersive AR".to_string()))
    }

    async fn request_session(
        &self,
        _request: &XrSessionRequest,
    ) -> Result<Box<dyn XrSession>, PlatformError> {
        Err(PlatformError::NotSupported("immersive AR".to_string()))
    }
}

/// Orientation sensor for devices without one
pub struct NoOrientationSensor;

impl OrientationSensor for NoOrientationSensor {
    fn subscribe(&self) -> Result<SensorSubscription, PlatformError> {
        Err(PlatformError::NotSupported("device orientation".to_string()))
    }
}

/// Camera that serves a single still image as its only frame
pub struct StillFrameCamera {
    path: Option<PathBuf>,
}

impl StillFrameCamera {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait(?Send)]
impl CameraProvider for StillFrameCamera {
    async fn open_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn CameraStream>, PlatformError> {
        let Some(path) = &self.path else {
            return Err(PlatformError::NotFound("no camera configured".to_string()));
        };

        let image = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(io) => {
                PlatformError::NotFound(format!("{}: {}", path.display(), io))
            }
            other => PlatformError::Failed(format!("{}: {}", path.display(), other)),
        })?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        log::info!(
            "Still frame camera opened: {} ({}x{}, requested {}x{})",
            path.display(),
            width,
            height,
            constraints.ideal_width,
            constraints.ideal_height
        );

        Ok(Box::new(StillFrameStream {
            frame: VideoFrame::new(rgba.into_raw(), width, height, 0),
            live: Cell::new(true),
        }))
    }
}

struct StillFrameStream {
    frame: VideoFrame,
    live: Cell<bool>,
}

impl CameraStream for StillFrameStream {
    fn latest_frame(&self) -> Option<VideoFrame> {
        self.live.get().then(|| self.frame.clone())
    }

    fn is_live(&self) -> bool {
        self.live.get()
    }

    fn stop(&mut self) {
        if self.live.replace(false) {
            log::info!("Still frame camera stopped");
        }
    }
}
