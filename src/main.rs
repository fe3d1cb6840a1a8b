//! AR Summon - command-line entry point
//!
//! Runs one preview from a JSON summon request. On a desktop the camera
//! overlay tier is fed from a still image (or a live camera with the
//! `native-camera` feature) and a single capture is written to the output
//! directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use ar_summon::capture::CaptureError;
use ar_summon::config::{load_request, SummonRequest};
use ar_summon::overlay::SliderKind;
use ar_summon::platform::{DirectoryDownloader, PlatformServices};
use ar_summon::{Phase, SessionController};

/// Wait between polls for the first camera frame
const FRAME_WAIT: Duration = Duration::from_millis(50);
const FRAME_ATTEMPTS: u32 = 40;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("AR Summon v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: ar-summon <request.json>")?;
    let request =
        load_request(&path).with_context(|| format!("loading request {}", path.display()))?;
    pollster::block_on(summon(request))
}

fn platform_for(request: &SummonRequest) -> PlatformServices {
    #[cfg(feature = "native-camera")]
    if request.still_frame.is_none() {
        return PlatformServices::native(0);
    }
    PlatformServices::desktop(request.still_frame.clone())
}

async fn summon(request: SummonRequest) -> Result<()> {
    let mut controller = SessionController::new(platform_for(&request), request.preview.clone());

    match controller.start(&request.creature).await {
        Phase::ActiveModel => {
            if let Some(viewer) = controller.model_viewer() {
                log::info!("Model viewer ready:");
                for (name, value) in viewer.attributes() {
                    log::info!("  {}=\"{}\"", name, value);
                }
            }
        }
        Phase::ActiveCamera => capture_once(&mut controller, &request)?,
        Phase::Denied => {
            let message = controller
                .denial()
                .map(|d| d.message())
                .unwrap_or("Camera unavailable");
            bail!("Preview of {} denied: {}", request.creature.name, message);
        }
        other => log::info!("Preview of {} settled in {}", request.creature.name, other),
    }

    controller.stop();
    Ok(())
}

fn capture_once(controller: &mut SessionController, request: &SummonRequest) -> Result<()> {
    if let Some(opacity) = request.opacity {
        controller.set_slider(SliderKind::Opacity, opacity);
    }
    if let Some(scale) = request.scale {
        controller.set_slider(SliderKind::Scale, scale);
    }

    let overlay = request
        .creature
        .ar_image_url()
        .and_then(|source| load_overlay(Path::new(source)));
    let downloader = DirectoryDownloader::new(&request.output_dir);

    for _ in 0..FRAME_ATTEMPTS {
        match controller.capture(overlay.as_ref(), &downloader) {
            Ok(output) => {
                log::info!(
                    "Saved {} to {}",
                    output.file_name,
                    request.output_dir.display()
                );
                return Ok(());
            }
            Err(CaptureError::NoFrame) => std::thread::sleep(FRAME_WAIT),
            Err(e) => return Err(e).context("capture failed"),
        }
    }
    bail!("No camera frame arrived")
}

/// Decode the creature image when it is a local file
fn load_overlay(path: &Path) -> Option<image::RgbaImage> {
    if !path.is_file() {
        log::warn!(
            "Overlay image {} is not a local file, capturing the bare frame",
            path.display()
        );
        return None;
    }
    match image::open(path) {
        Ok(image) => Some(image.to_rgba8()),
        Err(e) => {
            log::warn!("Failed to load overlay {}: {}", path.display(), e);
            None
        }
    }
}
