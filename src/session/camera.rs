//! Camera overlay tier: stream, tilt parallax and still capture.

use std::time::{Duration, Instant};

use image::RgbaImage;

use super::{ActiveResource, DenialReason, Phase, SessionController};
use crate::capture::{CaptureCompositor, CaptureError, CaptureOutput};
use crate::negotiator::Tier;
use crate::overlay::{CaptureFlash, TiltOffset};
use crate::platform::{CameraStream, Downloader, SensorSubscription, StreamConstraints};

/// Handles owned while the camera overlay runs
pub(super) struct CameraResources {
    stream: Box<dyn CameraStream>,
    tilt: Option<SensorSubscription>,
}

impl CameraResources {
    /// Stop every track and drop the tilt listener
    pub(super) fn release(mut self) {
        self.stream.stop();
        if let Some(tilt) = self.tilt.take() {
            tilt.unsubscribe();
        }
        log::info!("Camera released");
    }
}

impl SessionController {
    /// Open the camera, or settle in `Denied` with a reason
    pub(super) async fn start_camera(&mut self) {
        let constraints = StreamConstraints::from(&self.config.camera);
        let stream = match self.platform.camera.open_stream(&constraints).await {
            Ok(stream) => stream,
            Err(err) => {
                log::warn!("Camera unavailable: {}", err);
                self.denial = Some(DenialReason::from_error(&err));
                self.transition(Phase::Denied);
                return;
            }
        };

        let tilt = match self.platform.orientation.subscribe() {
            Ok(subscription) => Some(subscription),
            Err(e) => {
                log::debug!("No tilt parallax: {}", e);
                None
            }
        };

        log::info!(
            "Camera stream opened ({:?}, ideal {}x{})",
            constraints.facing,
            constraints.ideal_width,
            constraints.ideal_height
        );
        self.resource = ActiveResource::Camera(CameraResources { stream, tilt });
        self.tier = Some(Tier::CameraOverlay);
        self.transition(Phase::ActiveCamera);
    }

    /// Fold pending tilt readings into the parallax offset and expire the
    /// capture flash. Call before each paint.
    pub fn pump_sensors(&mut self, now: Instant) -> TiltOffset {
        if let ActiveResource::Camera(CameraResources {
            tilt: Some(subscription),
            ..
        }) = &self.resource
        {
            if let Some(reading) = subscription.latest() {
                self.tilt = TiltOffset::from_reading(reading, &self.config.tilt);
            }
        }
        if self.flash.is_some_and(|flash| flash.is_finished(now)) {
            self.flash = None;
        }
        self.tilt
    }

    /// Composite the current frame with `overlay` and hand it to `downloader`.
    ///
    /// Only available in the camera tier. `overlay` is the decoded creature
    /// image; without one the bare frame is saved.
    pub fn capture(
        &mut self,
        overlay: Option<&RgbaImage>,
        downloader: &dyn Downloader,
    ) -> Result<CaptureOutput, CaptureError> {
        let ActiveResource::Camera(camera) = &self.resource else {
            return Err(CaptureError::NotActive);
        };
        let frame = camera.stream.latest_frame().ok_or(CaptureError::NoFrame)?;
        let name = self
            .creature
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or_default();

        let output = CaptureCompositor::new(self.config.capture.clone()).capture(
            &frame,
            overlay,
            self.settings.opacity(),
            self.settings.scale(),
            name,
        )?;
        downloader
            .download(&output.file_name, output.content_type, &output.bytes)
            .map_err(CaptureError::Download)?;

        log::info!(
            "Captured {} ({}x{}, {} bytes)",
            output.file_name,
            output.width,
            output.height,
            output.bytes.len()
        );
        self.flash = Some(CaptureFlash::new(
            Instant::now(),
            Duration::from_millis(self.config.capture.flash_duration_ms),
        ));
        Ok(output)
    }
}
