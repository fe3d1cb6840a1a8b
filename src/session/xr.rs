//! Hit-test AR tier: session setup, the per-frame step and placement.

use super::{ActiveResource, Phase, SessionController};
use crate::config::XrConfig;
use crate::negotiator::Tier;
use crate::platform::{
    BaseLayerConfig, HitTestSource, PlatformError, ReferenceSpace, ReferenceSpaceKind, XrFrame,
    XrGraphics, XrSession, XrSessionRequest,
};
use crate::projection::{project_to_screen, ScreenPoint};

/// Handles owned while an immersive session runs
pub(super) struct XrResources {
    pub(super) session: Box<dyn XrSession>,
    graphics: Box<dyn XrGraphics>,
    local: ReferenceSpace,
    hit_source: HitTestSource,
}

/// Result of one `on_xr_frame` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A frame was processed
    Tracked { surface_found: bool },
    /// The platform ended the session; the controller is back to idle
    SessionEnded,
    /// No AR session is running
    Inactive,
}

/// What the hit test saw this frame
enum SurfaceHit {
    None,
    /// A hit without a local pose or one that does not project; nothing changes
    Unresolved,
    At(ScreenPoint),
}

impl SessionController {
    /// Acquire an immersive session with a viewer-anchored hit-test source.
    ///
    /// On failure nothing stays acquired: a session that was granted but
    /// could not be fully set up is ended before returning.
    pub(super) async fn start_xr(&mut self) -> Result<(), PlatformError> {
        let mut graphics = self.platform.xr.create_graphics().await?;
        graphics.make_xr_compatible().await?;

        let request = XrSessionRequest::hit_test(self.config.xr.request_dom_overlay);
        let mut session = self.platform.xr.request_session(&request).await?;

        let (local, hit_source) =
            match prepare_session(session.as_mut(), graphics.as_mut(), &self.config.xr).await {
                Ok(handles) => handles,
                Err(err) => {
                    if let Err(end_err) = session.end() {
                        log::warn!("Failed to end half-started AR session: {}", end_err);
                    }
                    return Err(err);
                }
            };

        log::info!("AR session started");
        self.resource = ActiveResource::Xr(XrResources {
            session,
            graphics,
            local,
            hit_source,
        });
        self.tier = Some(Tier::HitTestAr);
        self.transition(Phase::ActiveXr);
        Ok(())
    }

    /// Wait for the next hardware frame and process it.
    ///
    /// Call once per animation callback. Each call handles exactly one frame.
    pub async fn on_xr_frame(&mut self) -> FrameOutcome {
        let ActiveResource::Xr(xr) = &mut self.resource else {
            return FrameOutcome::Inactive;
        };

        let Some(frame) = xr.session.next_frame().await else {
            log::info!("AR session ended by the platform");
            self.stop();
            return FrameOutcome::SessionEnded;
        };

        xr.graphics.clear_transparent();
        let was_found = self.anchor.surface_found();

        match locate_surface(frame.as_ref(), xr.local, xr.hit_source) {
            SurfaceHit::At(point) => self.anchor.observe_surface(point),
            SurfaceHit::Unresolved => {}
            SurfaceHit::None => self.anchor.lose_surface(),
        }

        let surface_found = self.anchor.surface_found();
        if surface_found != was_found {
            log::debug!(
                "Surface {}",
                if surface_found { "found" } else { "lost" }
            );
        }
        FrameOutcome::Tracked { surface_found }
    }

    /// Reset the AR-specific state after a session has ended, however it ended
    pub(super) fn on_session_ended(&mut self) {
        self.anchor.reset();
        log::info!("AR session ended");
    }

    /// Lock the creature at the reticule. Only in the AR tier, once per placement.
    pub fn place(&mut self) -> bool {
        if self.phase != Phase::ActiveXr {
            return false;
        }
        let placed = self.anchor.place();
        if let Some(at) = self.anchor.placed().filter(|_| placed) {
            log::info!("Creature placed at ({:.1}%, {:.1}%)", at.x, at.y);
        }
        placed
    }

    /// Clear the placement and resume live tracking
    pub fn reposition(&mut self) {
        if self.phase == Phase::ActiveXr && self.anchor.is_placed() {
            self.anchor.reposition();
            log::info!("Placement cleared, tracking resumed");
        }
    }
}

async fn prepare_session(
    session: &mut dyn XrSession,
    graphics: &mut dyn XrGraphics,
    config: &XrConfig,
) -> Result<(ReferenceSpace, HitTestSource), PlatformError> {
    session.attach_base_layer(
        graphics,
        BaseLayerConfig {
            alpha: true,
            framebuffer_scale: config.framebuffer_scale,
        },
    )?;
    let local = session
        .request_reference_space(ReferenceSpaceKind::Local)
        .await?;
    let viewer = session
        .request_reference_space(ReferenceSpaceKind::Viewer)
        .await?;
    let hit_source = session.request_hit_test_source(viewer).await?;
    Ok((local, hit_source))
}

/// First hit of the frame, projected through the first view
fn locate_surface(
    frame: &dyn XrFrame,
    local: ReferenceSpace,
    source: HitTestSource,
) -> SurfaceHit {
    let Some(viewer) = frame.viewer_pose(local) else {
        return SurfaceHit::None;
    };
    let hits = frame.hit_test_results(source);
    let Some(hit) = hits.first() else {
        return SurfaceHit::None;
    };
    let Some(pose) = hit.pose(local) else {
        return SurfaceHit::Unresolved;
    };
    match viewer
        .views
        .first()
        .and_then(|view| project_to_screen(pose.position, view))
    {
        Some(point) => SurfaceHit::At(point),
        None => SurfaceHit::Unresolved,
    }
}
