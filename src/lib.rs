//! AR Summon - tiered augmented-reality creature preview
//!
//! Lets a user place a folklore creature's image or model into their
//! surroundings with the best AR the device offers:
//! - an embedded model viewer when the creature has a 3D model
//! - immersive AR with surface hit-testing and tap-to-place
//! - a live camera feed with a tilt-parallax overlay and still capture

pub mod capture;
pub mod config;
pub mod creature;
pub mod negotiator;
pub mod overlay;
pub mod platform;
pub mod projection;
pub mod session;
pub mod ui;

pub use config::PreviewConfig;
pub use creature::{CreatureAsset, CreatureType};
pub use overlay::OverlayRenderer;
pub use session::{Phase, SessionController};
