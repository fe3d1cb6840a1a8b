//! Camera stream interfaces

use std::time::Instant;

use async_trait::async_trait;

use super::PlatformError;
use crate::config::{CameraConfig, FacingMode};

/// Camera frame data
#[derive(Clone, Debug)]
pub struct VideoFrame {
    /// RGBA pixel data
    pub data: Vec<u8>,
    /// Native frame width
    pub width: u32,
    /// Native frame height
    pub height: u32,
    /// Frame number
    pub frame_number: u64,
    /// Frame timestamp
    pub timestamp: Instant,
}

impl VideoFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, frame_number: u64) -> Self {
        Self {
            data,
            width,
            height,
            frame_number,
            timestamp: Instant::now(),
        }
    }

    /// Single-colour frame, handy for placeholders
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Self::new(data, width, height, 0)
    }
}

/// What the preview asks of the camera
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConstraints {
    pub facing: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub audio: bool,
}

impl From<&CameraConfig> for StreamConstraints {
    fn from(config: &CameraConfig) -> Self {
        Self {
            facing: config.facing,
            ideal_width: config.ideal_width,
            ideal_height: config.ideal_height,
            audio: false,
        }
    }
}

/// An open, exclusively-held video stream
pub trait CameraStream {
    /// Latest frame, if one has arrived
    fn latest_frame(&self) -> Option<VideoFrame>;

    /// Whether the stream still delivers frames
    fn is_live(&self) -> bool;

    /// Stop every track. Safe to call more than once.
    fn stop(&mut self);
}

/// Permissioned access to a camera
#[async_trait(?Send)]
pub trait CameraProvider {
    async fn open_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn CameraStream>, PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_frame_layout() {
        let frame = VideoFrame::solid(3, 2, [1, 2, 3, 4]);
        assert_eq!(frame.data.len(), 24);
        assert_eq!(&frame.data[20..24], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_constraints_never_request_audio() {
        let constraints = StreamConstraints::from(&CameraConfig::default());
        assert!(!constraints.audio);
        assert_eq!(constraints.facing, FacingMode::Environment);
        assert_eq!((constraints.ideal_width, constraints.ideal_height), (1920, 1080));
    }
}
