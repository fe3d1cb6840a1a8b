//! Preview session lifecycle
//!
//! `SessionController` owns the phase machine and whichever hardware resource
//! the negotiated tier holds: nothing for the model viewer, an immersive
//! session plus hit-test source for AR, or a camera stream plus tilt
//! subscription for the overlay. Every acquisition failure is turned into a
//! phase change here; nothing from the platform escapes `start`.
//!
//! `stop` is the one teardown path. It runs on explicit stop, on a
//! platform-initiated session end and when the controller is dropped.

mod anchor;
mod camera;
mod phase;
mod xr;

pub use anchor::AnchorState;
pub use phase::Phase;
pub use xr::FrameOutcome;

use std::fmt;

use camera::CameraResources;
use xr::XrResources;

use crate::config::PreviewConfig;
use crate::creature::CreatureAsset;
use crate::negotiator::{CapabilityNegotiator, Tier, TierPlan};
use crate::overlay::{CaptureFlash, OverlaySettings, SliderKind, TiltOffset};
use crate::platform::PlatformError;
use crate::platform::PlatformServices;

/// Attributes for the embedded model viewer in the model tier
#[derive(Debug, Clone, PartialEq)]
pub struct ModelViewerSpec {
    pub src: String,
    pub alt: String,
    /// Shown while the model loads
    pub poster: Option<String>,
    /// AR hand-off modes, most capable first
    pub ar_modes: [&'static str; 3],
    pub ar_scale: &'static str,
    pub camera_controls: bool,
    pub auto_rotate: bool,
    pub auto_rotate_delay_ms: u32,
    pub shadow_intensity: f32,
    pub exposure: f32,
}

impl ModelViewerSpec {
    pub fn new(model_url: impl Into<String>, creature: &CreatureAsset) -> Self {
        Self {
            src: model_url.into(),
            alt: format!("3D model of {}", creature.name),
            poster: creature.ar_image_url().map(str::to_string),
            ar_modes: ["webxr", "scene-viewer", "quick-look"],
            ar_scale: "auto",
            camera_controls: true,
            auto_rotate: true,
            auto_rotate_delay_ms: 2000,
            shadow_intensity: 1.0,
            exposure: 0.8,
        }
    }

    /// Flattened `name="value"` attribute pairs; boolean attributes carry an empty value
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![
            ("src", self.src.clone()),
            ("alt", self.alt.clone()),
            ("ar", String::new()),
            ("ar-modes", self.ar_modes.join(" ")),
            ("ar-scale", self.ar_scale.to_string()),
        ];
        if let Some(poster) = &self.poster {
            attrs.push(("poster", poster.clone()));
        }
        if self.camera_controls {
            attrs.push(("camera-controls", String::new()));
        }
        if self.auto_rotate {
            attrs.push(("auto-rotate", String::new()));
            attrs.push(("auto-rotate-delay", self.auto_rotate_delay_ms.to_string()));
        }
        attrs.push(("shadow-intensity", self.shadow_intensity.to_string()));
        attrs.push(("exposure", self.exposure.to_string()));
        attrs
    }
}

/// Why the camera tier ended in `Denied`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    PermissionDenied,
    NoCamera,
    CameraBusy,
    Failed(String),
}

impl DenialReason {
    pub fn from_error(err: &PlatformError) -> Self {
        match err {
            PlatformError::PermissionDenied(_) => DenialReason::PermissionDenied,
            PlatformError::NotFound(_) | PlatformError::NotSupported(_) => DenialReason::NoCamera,
            PlatformError::Busy(_) => DenialReason::CameraBusy,
            PlatformError::Aborted(msg) | PlatformError::Failed(msg) => {
                DenialReason::Failed(msg.clone())
            }
        }
    }

    /// Short user-facing message
    pub fn message(&self) -> &'static str {
        match self {
            DenialReason::PermissionDenied => "Camera access denied. Check browser settings.",
            DenialReason::NoCamera => "No camera was found on this device.",
            DenialReason::CameraBusy => "The camera is in use by another app. Close it and try again.",
            DenialReason::Failed(_) => "The camera could not be started. Try again.",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// The one hardware resource held at a time
enum ActiveResource {
    None,
    Model(ModelViewerSpec),
    Xr(XrResources),
    Camera(CameraResources),
}

impl ActiveResource {
    fn name(&self) -> &'static str {
        match self {
            ActiveResource::None => "none",
            ActiveResource::Model(_) => "model viewer",
            ActiveResource::Xr(_) => "AR session",
            ActiveResource::Camera(_) => "camera stream",
        }
    }
}

/// Drives one preview at a time through its tier's lifecycle
pub struct SessionController {
    platform: PlatformServices,
    config: PreviewConfig,
    negotiator: CapabilityNegotiator,
    phase: Phase,
    tier: Option<Tier>,
    resource: ActiveResource,
    anchor: AnchorState,
    tilt: TiltOffset,
    settings: OverlaySettings,
    creature: Option<CreatureAsset>,
    denial: Option<DenialReason>,
    last_xr_failure: Option<PlatformError>,
    flash: Option<CaptureFlash>,
}

impl SessionController {
    pub fn new(platform: PlatformServices, config: PreviewConfig) -> Self {
        let settings = OverlaySettings::new(config.overlay.clone());
        Self {
            platform,
            config,
            negotiator: CapabilityNegotiator::new(),
            phase: Phase::Idle,
            tier: None,
            resource: ActiveResource::None,
            anchor: AnchorState::new(),
            tilt: TiltOffset::ZERO,
            settings,
            creature: None,
            denial: None,
            last_xr_failure: None,
            flash: None,
        }
    }

    /// Start a preview of `creature` and return the phase it settled in.
    ///
    /// Ignored unless the controller is idle or denied. Immersive AR failures
    /// of any kind fall through to the camera overlay; the failure is kept in
    /// `last_xr_failure` so a host can offer its own retry for transient ones.
    pub async fn start(&mut self, creature: &CreatureAsset) -> Phase {
        if !self.phase.can_start() {
            log::warn!("Ignoring start of {} while {}", creature.name, self.phase);
            return self.phase;
        }

        self.denial = None;
        self.last_xr_failure = None;
        self.creature = Some(creature.clone());
        self.transition(Phase::Requesting);

        let plan = self
            .negotiator
            .plan(creature, self.platform.xr.as_ref())
            .await;
        log::info!("Summoning {} via {}", creature.name, plan.first_tier());

        match plan {
            TierPlan::Model { model_url } => self.start_model(creature, model_url),
            TierPlan::TryHitTestAr { .. } => {
                if let Err(err) = self.start_xr().await {
                    log::warn!(
                        "Immersive AR failed ({}), falling back to {}",
                        err,
                        Tier::CameraOverlay
                    );
                    self.last_xr_failure = Some(err);
                    self.start_camera().await;
                }
            }
            TierPlan::CameraOverlay => self.start_camera().await,
        }

        self.phase
    }

    fn start_model(&mut self, creature: &CreatureAsset, model_url: String) {
        self.resource = ActiveResource::Model(ModelViewerSpec::new(model_url, creature));
        self.tier = Some(Tier::Model);
        self.transition(Phase::ActiveModel);
    }

    /// Tear down everything and return to `Idle`. Safe in any phase, any number of times.
    pub fn stop(&mut self) {
        let was = self.phase;
        let resource = std::mem::replace(&mut self.resource, ActiveResource::None);
        let released = resource.name();

        match resource {
            ActiveResource::Xr(mut xr) => {
                if let Err(e) = xr.session.end() {
                    log::warn!("Failed to end AR session: {}", e);
                }
                self.on_session_ended();
            }
            ActiveResource::Camera(camera) => camera.release(),
            ActiveResource::Model(_) | ActiveResource::None => {}
        }

        self.phase = Phase::Idle;
        self.tier = None;
        self.anchor.reset();
        self.tilt = TiltOffset::ZERO;
        self.settings.reset();
        self.creature = None;
        self.denial = None;
        self.last_xr_failure = None;
        self.flash = None;

        if was != Phase::Idle {
            log::info!("Preview stopped from {} (released {})", was, released);
        }
    }

    /// Apply a transition if the phase table allows it
    fn transition(&mut self, next: Phase) -> bool {
        if !self.phase.can_transition_to(next) {
            log::warn!("Rejected phase transition {} -> {}", self.phase, next);
            return false;
        }
        log::info!("Phase {} -> {}", self.phase, next);
        self.phase = next;
        true
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Tier currently held, if any
    pub fn tier(&self) -> Option<Tier> {
        self.tier
    }

    /// Creature being previewed (kept through `Denied` for the retry)
    pub fn creature(&self) -> Option<&CreatureAsset> {
        self.creature.as_ref()
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn anchor(&self) -> &AnchorState {
        &self.anchor
    }

    pub fn tilt(&self) -> TiltOffset {
        self.tilt
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    /// Update a slider; returns the value actually stored
    pub fn set_slider(&mut self, kind: SliderKind, value: f32) -> f32 {
        self.settings.set(kind, value)
    }

    pub fn reset_slider(&mut self, kind: SliderKind) -> f32 {
        let default = self
            .settings
            .sliders()
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.default)
            .unwrap_or_else(|| self.settings.get(kind));
        self.settings.set(kind, default)
    }

    /// Viewer attributes while in the model tier
    pub fn model_viewer(&self) -> Option<&ModelViewerSpec> {
        match &self.resource {
            ActiveResource::Model(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn denial(&self) -> Option<&DenialReason> {
        self.denial.as_ref()
    }

    /// Why immersive AR was skipped on the last start, if it was attempted and failed
    pub fn last_xr_failure(&self) -> Option<&PlatformError> {
        self.last_xr_failure.as_ref()
    }

    pub fn flash(&self) -> Option<&CaptureFlash> {
        self.flash.as_ref()
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.stop();
    }
}
