//! Still capture of the camera overlay
//!
//! Composites the current camera frame with the creature image at the
//! current opacity and size, then encodes the result as a JPEG named after
//! the creature.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

use crate::config::CaptureConfig;
use crate::creature::slugify;
use crate::platform::{PlatformError, VideoFrame};

/// Content type of every capture
pub const CAPTURE_CONTENT_TYPE: &str = "image/jpeg";

/// Capture errors
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Capture is only available while the camera overlay is active")]
    NotActive,
    #[error("No camera frame available yet")]
    NoFrame,
    #[error("Camera frame has no pixels")]
    EmptyFrame,
    #[error("Camera frame holds {len} bytes, expected {expected} for {width}x{height} RGBA")]
    InvalidFrame {
        width: u32,
        height: u32,
        len: usize,
        expected: usize,
    },
    #[error("Failed to encode capture: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Failed to save capture: {0}")]
    Download(#[source] PlatformError),
}

/// An encoded capture ready to hand to the user
#[derive(Debug, Clone)]
pub struct CaptureOutput {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// `<prefix>-<slug>.jpg`, or `<slug>.jpg` with an empty prefix
pub fn capture_file_name(prefix: &str, creature_name: &str) -> String {
    let slug = slugify(creature_name);
    if prefix.is_empty() {
        format!("{}.jpg", slug)
    } else {
        format!("{}-{}.jpg", prefix, slug)
    }
}

/// Where the overlay lands on the frame, in frame pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayRect {
    pub left: i64,
    pub top: i64,
    pub width: u32,
    pub height: u32,
}

/// Composites camera frames with the creature overlay
pub struct CaptureCompositor {
    config: CaptureConfig,
}

impl CaptureCompositor {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    /// Centred, aspect-preserving box for an `image_w`×`image_h` overlay.
    ///
    /// The overlay may take `overlay_fraction * scale` of each frame axis; the
    /// tighter axis wins so the image is never stretched.
    pub fn overlay_rect(
        &self,
        frame_w: u32,
        frame_h: u32,
        image_w: u32,
        image_h: u32,
        scale: f32,
    ) -> OverlayRect {
        let budget = self.config.overlay_fraction * scale;
        let ratio = f32::min(
            frame_w as f32 * budget / image_w.max(1) as f32,
            frame_h as f32 * budget / image_h.max(1) as f32,
        );
        let width = (image_w as f32 * ratio).round().max(1.0) as u32;
        let height = (image_h as f32 * ratio).round().max(1.0) as u32;
        OverlayRect {
            left: (frame_w as i64 - width as i64) / 2,
            top: (frame_h as i64 - height as i64) / 2,
            width,
            height,
        }
    }

    /// Draw `overlay` over `frame` at native frame resolution
    pub fn compose(
        &self,
        frame: &VideoFrame,
        overlay: Option<&RgbaImage>,
        opacity: f32,
        scale: f32,
    ) -> Result<RgbaImage, CaptureError> {
        if frame.width == 0 || frame.height == 0 {
            return Err(CaptureError::EmptyFrame);
        }
        let expected = frame.width as usize * frame.height as usize * 4;
        if frame.data.len() != expected {
            return Err(CaptureError::InvalidFrame {
                width: frame.width,
                height: frame.height,
                len: frame.data.len(),
                expected,
            });
        }

        let mut canvas = RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
            .ok_or(CaptureError::EmptyFrame)?;
        for pixel in canvas.pixels_mut() {
            pixel[3] = 255;
        }

        if let Some(overlay) = overlay.filter(|o| o.width() > 0 && o.height() > 0) {
            let rect = self.overlay_rect(
                frame.width,
                frame.height,
                overlay.width(),
                overlay.height(),
                scale,
            );
            let scaled = imageops::resize(overlay, rect.width, rect.height, FilterType::Triangle);
            blend_over(&mut canvas, &scaled, rect.left, rect.top, opacity.clamp(0.0, 1.0));
        }

        Ok(canvas)
    }

    /// Encode as JPEG at the configured quality
    pub fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, CaptureError> {
        let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
        let mut bytes = Vec::new();
        let mut encoder =
            JpegEncoder::new_with_quality(&mut bytes, self.config.jpeg_quality.clamp(1, 100));
        encoder.encode_image(&rgb)?;
        Ok(bytes)
    }

    /// Compose, encode and name a capture
    pub fn capture(
        &self,
        frame: &VideoFrame,
        overlay: Option<&RgbaImage>,
        opacity: f32,
        scale: f32,
        creature_name: &str,
    ) -> Result<CaptureOutput, CaptureError> {
        let composed = self.compose(frame, overlay, opacity, scale)?;
        let bytes = self.encode(&composed)?;
        Ok(CaptureOutput {
            file_name: capture_file_name(&self.config.file_prefix, creature_name),
            content_type: CAPTURE_CONTENT_TYPE,
            bytes,
            width: composed.width(),
            height: composed.height(),
        })
    }
}

/// Source-over blend of `src` onto `dst` with a global alpha, clipped to `dst`
fn blend_over(dst: &mut RgbaImage, src: &RgbaImage, left: i64, top: i64, global_alpha: f32) {
    let (dst_w, dst_h) = (dst.width() as i64, dst.height() as i64);
    for (sx, sy, src_px) in src.enumerate_pixels() {
        let x = left + sx as i64;
        let y = top + sy as i64;
        if x < 0 || y < 0 || x >= dst_w || y >= dst_h {
            continue;
        }
        let alpha = src_px[3] as f32 / 255.0 * global_alpha;
        if alpha <= 0.0 {
            continue;
        }
        let dst_px = dst.get_pixel_mut(x as u32, y as u32);
        for c in 0..3 {
            let blended = src_px[c] as f32 * alpha + dst_px[c] as f32 * (1.0 - alpha);
            dst_px[c] = blended.round().clamp(0.0, 255.0) as u8;
        }
    }
}
