//! Overlay layout for each paint
//!
//! The renderer reads the controller's current state right before a paint
//! and turns it into a `SceneFrame`: where the creature goes, how big, how
//! opaque, whether it glides or snaps, and what the HUD shows. Painting the
//! frame is left to the UI layer.

use std::time::{Duration, Instant};

use glam::Vec2;

use super::SliderConfig;
use crate::creature::{BuiltinTypeStyles, CreatureAsset, IconGlyph, TypeStyleLookup};
use crate::projection::ScreenPoint;
use crate::session::{Phase, SessionController};

/// Reticule position used before any surface has been seen
const RETICULE_REST: ScreenPoint = ScreenPoint { x: 50.0, y: 65.0 };
/// Ease time of the tilt parallax in the camera tier
const PARALLAX_TRANSITION: Duration = Duration::from_millis(150);
/// Peak opacity of the capture flash
const FLASH_PEAK: f32 = 0.9;

/// What is drawn for the creature
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayVisual {
    Image { url: String },
    Icon { glyph: IconGlyph, label: &'static str },
}

/// Which point of the creature sits on the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pivot {
    /// Feet on the anchor, so the creature stands on the surface
    BottomCenter,
    Center,
}

/// How the overlay moves towards a new anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Smooth(Duration),
    Snap,
}

/// Soft ellipse under the creature, in vmin units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundingShadow {
    pub width_vmin: f32,
    pub height_vmin: f32,
}

/// Placement and appearance of the creature for one paint
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    pub visual: OverlayVisual,
    /// Glow colour as unmultiplied RGBA
    pub glow: [u8; 4],
    pub anchor: ScreenPoint,
    pub pivot: Pivot,
    /// Extra pixel offset (tilt parallax)
    pub offset_px: Vec2,
    /// Image bounds as percentages of viewport height/width
    pub max_height_vh: f32,
    pub max_width_vw: f32,
    /// Icon edge length as a percentage of the shorter viewport side
    pub icon_vmin: f32,
    pub opacity: f32,
    pub shadow: Option<GroundingShadow>,
    pub motion: Motion,
}

/// Scanning indicator shown until the creature is placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReticuleFrame {
    pub position: ScreenPoint,
    pub highlighted: bool,
}

/// Heads-up display contents
#[derive(Debug, Clone)]
pub struct HudFrame {
    pub badge: &'static str,
    pub creature_name: String,
    pub hint: Option<&'static str>,
    /// Shown when the camera tier falls back to the category icon
    pub sigil_label: Option<&'static str>,
    pub can_place: bool,
    pub can_reposition: bool,
    pub can_capture: bool,
    pub sliders: [SliderConfig; 2],
}

/// Everything needed to paint one frame of an active preview
#[derive(Debug, Clone)]
pub struct SceneFrame {
    pub phase: Phase,
    pub overlay: Option<OverlayFrame>,
    pub reticule: Option<ReticuleFrame>,
    pub hud: HudFrame,
    /// Opacity of the full-screen capture flash (0 when none)
    pub flash_alpha: f32,
}

/// The button that starts a preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerButton {
    pub label: &'static str,
    pub enabled: bool,
}

/// Cosmetic white flash after a capture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureFlash {
    started: Instant,
    duration: Duration,
}

impl CaptureFlash {
    pub fn new(started: Instant, duration: Duration) -> Self {
        Self { started, duration }
    }

    /// Flash opacity at `now`, fading linearly to zero
    pub fn alpha(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 0.0;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        let t = (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        FLASH_PEAK * (1.0 - t)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

/// Label and state of the preview trigger for a creature
pub fn trigger_button(phase: Phase, creature: &CreatureAsset) -> TriggerButton {
    let label = if phase == Phase::Requesting {
        "Requesting…"
    } else if creature.model().is_some() {
        "3D / AR"
    } else {
        "AR Summon"
    };
    TriggerButton {
        label,
        enabled: phase != Phase::Requesting,
    }
}

/// Turns controller state into paintable frames
pub struct OverlayRenderer {
    styles: Box<dyn TypeStyleLookup>,
    /// Anchor actually drawn last frame, trailing the target while tracking
    displayed: Option<ScreenPoint>,
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new(BuiltinTypeStyles)
    }
}

impl OverlayRenderer {
    pub fn new(styles: impl TypeStyleLookup + 'static) -> Self {
        Self {
            styles: Box::new(styles),
            displayed: None,
        }
    }

    /// Build the frame to paint. `dt` is the time since the previous paint.
    /// Returns `None` when no preview is active.
    pub fn frame(
        &mut self,
        controller: &SessionController,
        dt: Duration,
        now: Instant,
    ) -> Option<SceneFrame> {
        let phase = controller.phase();
        let Some(creature) = controller.creature().filter(|_| phase.is_active()) else {
            self.displayed = None;
            return None;
        };

        let style = self.styles.style_for(creature.creature_type);
        let visual = match creature.ar_image_url() {
            Some(url) => OverlayVisual::Image {
                url: url.to_string(),
            },
            None => OverlayVisual::Icon {
                glyph: style.icon,
                label: style.label,
            },
        };
        let has_image = matches!(visual, OverlayVisual::Image { .. });

        let settings = controller.settings();
        let scale = settings.scale();
        let anchor = controller.anchor();

        let (overlay, reticule, badge, hint) = match phase {
            Phase::ActiveXr => {
                let transition =
                    Duration::from_millis(controller.config().overlay.tracking_transition_ms);
                let overlay = anchor.visible_anchor().map(|target| {
                    let placed = anchor.is_placed();
                    let position = self.follow(target, placed, dt, transition);
                    OverlayFrame {
                        visual: visual.clone(),
                        glow: style.glow,
                        anchor: position,
                        pivot: Pivot::BottomCenter,
                        offset_px: Vec2::ZERO,
                        max_height_vh: 50.0 * scale,
                        max_width_vw: 60.0 * scale,
                        icon_vmin: 25.0 * scale,
                        opacity: settings.opacity(),
                        shadow: Some(GroundingShadow {
                            width_vmin: 18.0 * scale,
                            height_vmin: 2.5 * scale,
                        }),
                        motion: if placed {
                            Motion::Snap
                        } else {
                            Motion::Smooth(transition)
                        },
                    }
                });
                if overlay.is_none() {
                    self.displayed = None;
                }

                let reticule = (!anchor.is_placed()).then(|| ReticuleFrame {
                    position: anchor.reticule().unwrap_or(RETICULE_REST),
                    highlighted: anchor.surface_found(),
                });

                let hint = if anchor.is_placed() {
                    "📍 Anchored, move around it"
                } else if anchor.surface_found() {
                    "Surface detected, tap to place"
                } else {
                    "Aim at a floor or table…"
                };
                (overlay, reticule, "WebXR · LocaLore", Some(hint))
            }
            Phase::ActiveCamera => {
                self.displayed = None;
                let overlay = OverlayFrame {
                    visual: visual.clone(),
                    glow: style.glow,
                    anchor: ScreenPoint::CENTER,
                    pivot: Pivot::Center,
                    offset_px: controller.tilt().as_vec2(),
                    max_height_vh: 65.0 * scale,
                    max_width_vw: 75.0 * scale,
                    icon_vmin: 30.0 * scale,
                    opacity: settings.opacity(),
                    shadow: None,
                    motion: Motion::Smooth(PARALLAX_TRANSITION),
                };
                (Some(overlay), None, "AR Overlay · LocaLore", None)
            }
            _ => {
                self.displayed = None;
                (
                    None,
                    None,
                    "3D Model · LocaLore",
                    Some("Drag to rotate · Pinch to zoom · Tap AR to place in your world"),
                )
            }
        };

        let hud = HudFrame {
            badge,
            creature_name: creature.name.clone(),
            hint,
            sigil_label: (phase == Phase::ActiveCamera && !has_image).then_some(style.label),
            can_place: phase == Phase::ActiveXr && anchor.can_place(),
            can_reposition: phase == Phase::ActiveXr && anchor.is_placed(),
            can_capture: phase == Phase::ActiveCamera,
            sliders: settings.sliders(),
        };

        Some(SceneFrame {
            phase,
            overlay,
            reticule,
            hud,
            flash_alpha: controller.flash().map(|f| f.alpha(now)).unwrap_or(0.0),
        })
    }

    /// Move the drawn anchor towards `target`, or jump straight there when snapping
    fn follow(
        &mut self,
        target: ScreenPoint,
        snap: bool,
        dt: Duration,
        transition: Duration,
    ) -> ScreenPoint {
        let next = match self.displayed {
            Some(current) if !snap && !transition.is_zero() => {
                current.lerp(target, dt.as_secs_f32() / transition.as_secs_f32())
            }
            _ => target,
        };
        self.displayed = Some(next);
        next
    }
}
