//! Preview configuration and CLI request loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::creature::CreatureAsset;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Tunables for every tier of the preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PreviewConfig {
    pub camera: CameraConfig,
    pub xr: XrConfig,
    pub tilt: TiltConfig,
    pub overlay: OverlayConfig,
    pub capture: CaptureConfig,
}

/// Which way the requested camera should face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    #[default]
    Environment,
    User,
}

/// Camera stream request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub facing: FacingMode,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            ideal_width: 1920,
            ideal_height: 1080,
            facing: FacingMode::Environment,
        }
    }
}

/// Immersive AR session request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XrConfig {
    /// Render target scale relative to the native framebuffer
    pub framebuffer_scale: f32,
    /// Ask for a DOM overlay region to host the HUD
    pub request_dom_overlay: bool,
}

impl Default for XrConfig {
    fn default() -> Self {
        Self {
            framebuffer_scale: 0.5,
            request_dom_overlay: true,
        }
    }
}

/// Parallax derived from device tilt (camera tier)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Tilt angle in degrees that produces the full offset
    pub max_angle_deg: f32,
    /// Horizontal offset in pixels at full tilt
    pub max_offset_x: f32,
    /// Vertical offset in pixels at full tilt
    pub max_offset_y: f32,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            max_angle_deg: 45.0,
            max_offset_x: 20.0,
            max_offset_y: 12.0,
        }
    }
}

/// Range and default of one slider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    pub default: f32,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

/// Overlay appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub opacity: SliderRange,
    pub scale: SliderRange,
    /// Duration of the smoothing applied while the overlay follows the reticule
    pub tracking_transition_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            opacity: SliderRange {
                default: 0.85,
                min: 0.1,
                max: 1.0,
                step: 0.05,
            },
            scale: SliderRange {
                default: 1.0,
                min: 0.3,
                max: 2.2,
                step: 0.05,
            },
            tracking_transition_ms: 80,
        }
    }
}

/// Still capture output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Overlay box as a fraction of each frame axis, before the size slider
    pub overlay_fraction: f32,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// Prefix of the downloaded file name
    pub file_prefix: String,
    /// Duration of the white flash shown after a capture
    pub flash_duration_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            overlay_fraction: 0.65,
            jpeg_quality: 92,
            file_prefix: "localore".to_string(),
            flash_duration_ms: 250,
        }
    }
}

/// One-shot summon request read by the command-line tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummonRequest {
    pub creature: CreatureAsset,
    #[serde(default)]
    pub preview: PreviewConfig,
    /// Opacity slider value to apply before capturing
    #[serde(default)]
    pub opacity: Option<f32>,
    /// Size slider value to apply before capturing
    #[serde(default)]
    pub scale: Option<f32>,
    /// Still image standing in for the camera feed
    #[serde(default)]
    pub still_frame: Option<PathBuf>,
    /// Directory that receives the captured image
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a preview configuration from JSON. Missing fields take defaults.
pub fn load_config(path: &Path) -> Result<PreviewConfig, ConfigError> {
    read_json(path)
}

/// Load a summon request from JSON.
pub fn load_request(path: &Path) -> Result<SummonRequest, ConfigError> {
    read_json(path)
}
