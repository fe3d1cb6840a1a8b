//! egui front end for the preview
//!
//! Paints the `SceneFrame` built by the overlay renderer and exposes the
//! controls that feed user actions back into the session controller.
//!
//! The host application owns the egui window and event loop. It calls
//! `OverlayRenderer::frame` and `paint_scene` once per repaint, and passes
//! the actions returned by `hud` to `apply_actions`. The `ar-summon` binary
//! is headless and only drives the session and capture.

mod scene;
mod widgets;

pub use scene::{overlay_rect, paint_scene};
pub use widgets::{denial_notice, hud, resettable_slider, trigger, HudAction};

use crate::session::SessionController;

/// Apply HUD actions to the controller. Capture is left to the caller since
/// it needs the decoded overlay image and a downloader.
pub fn apply_actions(controller: &mut SessionController, actions: &[HudAction]) -> bool {
    let mut capture_requested = false;
    for action in actions {
        match *action {
            HudAction::Stop => controller.stop(),
            HudAction::Place => {
                controller.place();
            }
            HudAction::Reposition => controller.reposition(),
            HudAction::SetSlider(kind, value) => {
                controller.set_slider(kind, value);
            }
            HudAction::Capture => capture_requested = true,
        }
    }
    capture_requested
}
