//! Live camera backed by nokhwa
//!
//! Frames are captured on a background thread into a triple buffer and the
//! latest one is handed out on request. Opening happens on the capture
//! thread too; its outcome is reported back once over a oneshot channel so
//! `open_stream` can be awaited without blocking the UI thread.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nokhwa::pixel_format::RgbAFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::{Camera, NokhwaError};
use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::{CameraProvider, CameraStream, PlatformError, StreamConstraints, VideoFrame};

type FrameSlots = [Arc<Mutex<Option<VideoFrame>>>; 3];

/// Camera provider for a local capture device
pub struct NokhwaCameraProvider {
    index: u32,
}

impl NokhwaCameraProvider {
    /// `index` 0 is the system default camera
    pub fn new(index: u32) -> Self {
        Self { index }
    }
}

#[async_trait(?Send)]
impl CameraProvider for NokhwaCameraProvider {
    async fn open_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn CameraStream>, PlatformError> {
        let frames: FrameSlots = [
            Arc::new(Mutex::new(None)),
            Arc::new(Mutex::new(None)),
            Arc::new(Mutex::new(None)),
        ];
        let latest_frame_idx = Arc::new(AtomicU64::new(0));
        let running = Arc::new(AtomicBool::new(true));
        let (opened_tx, opened_rx) = oneshot::channel();

        let worker = CaptureWorker {
            index: self.index,
            ideal: Resolution::new(constraints.ideal_width, constraints.ideal_height),
            frames: frames.clone(),
            latest_frame_idx: latest_frame_idx.clone(),
            running: running.clone(),
        };
        let thread_handle = std::thread::Builder::new()
            .name("camera-capture".to_string())
            .spawn(move || worker.run(opened_tx))
            .map_err(|e| PlatformError::Failed(format!("spawn capture thread: {}", e)))?;

        let opened = opened_rx
            .await
            .unwrap_or_else(|_| Err(PlatformError::Aborted("capture thread exited".to_string())));

        let mut stream = NokhwaStream {
            frames,
            latest_frame_idx,
            running,
            thread_handle: Some(thread_handle),
        };
        match opened {
            Ok(()) => Ok(Box::new(stream)),
            Err(e) => {
                stream.stop();
                Err(e)
            }
        }
    }
}

/// State moved onto the capture thread
struct CaptureWorker {
    index: u32,
    ideal: Resolution,
    frames: FrameSlots,
    latest_frame_idx: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
}

impl CaptureWorker {
    fn run(self, opened: oneshot::Sender<Result<(), PlatformError>>) {
        log::info!("Starting camera capture thread (camera {})", self.index);

        let mut camera = match self.open_camera() {
            Ok(camera) => camera,
            Err(e) => {
                self.running.store(false, Ordering::Release);
                let _ = opened.send(Err(e));
                return;
            }
        };

        log::info!(
            "Camera opened: {} ({}x{})",
            camera.info().human_name(),
            camera.resolution().width(),
            camera.resolution().height()
        );
        let _ = opened.send(Ok(()));

        let mut write_idx: u64 = 0;
        while self.running.load(Ordering::Acquire) {
            match camera.frame() {
                Ok(buffer) => match buffer.decode_image::<RgbAFormat>() {
                    Ok(image) => {
                        let frame = VideoFrame::new(
                            image.into_raw(),
                            buffer.resolution().width(),
                            buffer.resolution().height(),
                            write_idx,
                        );
                        let slot = (write_idx % 3) as usize;
                        *self.frames[slot].lock() = Some(frame);
                        self.latest_frame_idx.store(write_idx, Ordering::Release);
                        write_idx = write_idx.wrapping_add(1);
                    }
                    Err(e) => log::warn!("Failed to decode frame: {:?}", e),
                },
                Err(e) => {
                    log::warn!("Failed to capture frame: {:?}", e);
                    std::thread::sleep(Duration::from_millis(10));
                }
            }
        }

        if let Err(e) = camera.stop_stream() {
            log::warn!("Failed to stop camera stream: {:?}", e);
        }
        log::info!("Camera capture thread stopped");
    }

    /// Closest match to the ideal size, then any high resolution, then anything
    fn open_camera(&self) -> Result<Camera, PlatformError> {
        let index = CameraIndex::Index(self.index);
        let attempts = [
            RequestedFormatType::Closest(CameraFormat::new(self.ideal, FrameFormat::MJPEG, 30)),
            RequestedFormatType::HighestResolution(Resolution::new(640, 480)),
            RequestedFormatType::None,
        ];

        let mut last_err = None;
        for requested in attempts {
            let label = format!("{:?}", requested);
            let format = RequestedFormat::new::<RgbAFormat>(requested);
            match Camera::new(index.clone(), format) {
                Ok(mut camera) => match camera.open_stream() {
                    Ok(()) => return Ok(camera),
                    Err(e) => {
                        log::warn!("Failed to open camera stream: {:?}", e);
                        last_err = Some(e);
                    }
                },
                Err(e) => {
                    log::warn!("Failed to open camera with {}: {:?}", label, e);
                    last_err = Some(e);
                }
            }
        }

        Err(last_err
            .map(|e| classify(&e))
            .unwrap_or_else(|| PlatformError::Failed("no camera format accepted".to_string())))
    }
}

/// Map a nokhwa failure onto the platform taxonomy
fn classify(err: &NokhwaError) -> PlatformError {
    let message = err.to_string();
    let lower = message.to_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized")
    {
        PlatformError::PermissionDenied(message)
    } else if lower.contains("busy") || lower.contains("in use") {
        PlatformError::Busy(message)
    } else if matches!(err, NokhwaError::OpenDeviceError(..)) {
        PlatformError::NotFound(message)
    } else {
        PlatformError::Failed(message)
    }
}

/// Running capture; `stop` joins the capture thread
struct NokhwaStream {
    frames: FrameSlots,
    latest_frame_idx: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    thread_handle: Option<std::thread::JoinHandle<()>>,
}

impl CameraStream for NokhwaStream {
    fn latest_frame(&self) -> Option<VideoFrame> {
        let idx = self.latest_frame_idx.load(Ordering::Acquire);
        let slot = (idx % 3) as usize;
        self.frames[slot].lock().clone()
    }

    fn is_live(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for NokhwaStream {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_open_failure_as_missing_device() {
        let err = NokhwaError::OpenDeviceError("0".to_string(), "no such device".to_string());
        assert!(matches!(classify(&err), PlatformError::NotFound(_)));
    }

    #[test]
    fn test_classify_permission_failure() {
        let err = NokhwaError::OpenStreamError("Permission denied".to_string());
        assert!(classify(&err).is_permission_denial());
    }
}
