//! Reticule and placement anchor for the hit-test tier.

use crate::projection::ScreenPoint;

/// Where the creature is drawn in the hit-test tier.
///
/// `reticule` follows the surface while scanning. `placed` is frozen once the
/// user commits and stays put until `reposition`; while it is set, reticule
/// updates are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnchorState {
    reticule: Option<ScreenPoint>,
    placed: Option<ScreenPoint>,
    surface_found: bool,
}

impl AnchorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reticule(&self) -> Option<ScreenPoint> {
        self.reticule
    }

    pub fn placed(&self) -> Option<ScreenPoint> {
        self.placed
    }

    pub fn surface_found(&self) -> bool {
        self.surface_found
    }

    pub fn is_placed(&self) -> bool {
        self.placed.is_some()
    }

    /// Point the creature is drawn at: the placement if locked, else the reticule
    pub fn visible_anchor(&self) -> Option<ScreenPoint> {
        self.placed.or(self.reticule)
    }

    /// A surface was hit this frame at `point`
    pub fn observe_surface(&mut self, point: ScreenPoint) {
        self.surface_found = true;
        if self.placed.is_none() {
            self.reticule = Some(point);
        }
    }

    /// No surface this frame. The reticule stays where it was.
    pub fn lose_surface(&mut self) {
        self.surface_found = false;
    }

    /// Whether `place` would succeed right now
    pub fn can_place(&self) -> bool {
        self.surface_found && self.placed.is_none() && self.reticule.is_some()
    }

    /// Lock the creature at the current reticule. Returns whether it was placed.
    pub fn place(&mut self) -> bool {
        if !self.can_place() {
            return false;
        }
        self.placed = self.reticule;
        true
    }

    /// Unlock the placement and resume live tracking
    pub fn reposition(&mut self) {
        self.placed = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
