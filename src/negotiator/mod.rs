//! Tier selection
//!
//! Picks the richest presentation a device can offer, cheapest check first:
//! a packaged model needs only an existence check, immersive AR needs an
//! asynchronous probe, and the camera overlay is the universal fallback.

use std::fmt;

use crate::creature::CreatureAsset;
use crate::platform::{CapabilityProbe, XrRuntime};

/// One of the three mutually exclusive presentation strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Embedded model viewer, which delegates AR to the OS itself
    Model,
    /// Immersive AR with surface hit-testing
    HitTestAr,
    /// Live camera feed with a parallax overlay
    CameraOverlay,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Model => write!(f, "model viewer"),
            Tier::HitTestAr => write!(f, "hit-test AR"),
            Tier::CameraOverlay => write!(f, "camera overlay"),
        }
    }
}

/// Outcome of negotiation: what to attempt first
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierPlan {
    /// Commit to the model viewer for this model reference
    Model { model_url: String },
    /// Try immersive AR; fall back to the camera overlay if the attempt fails
    TryHitTestAr { probe: CapabilityProbe },
    /// Go straight to the camera overlay
    CameraOverlay,
}

impl TierPlan {
    /// Tier this plan attempts first
    pub fn first_tier(&self) -> Tier {
        match self {
            TierPlan::Model { .. } => Tier::Model,
            TierPlan::TryHitTestAr { .. } => Tier::HitTestAr,
            TierPlan::CameraOverlay => Tier::CameraOverlay,
        }
    }

    /// Tier to try when the first attempt fails
    pub fn fallback(&self) -> Option<Tier> {
        match self {
            TierPlan::TryHitTestAr { .. } => Some(Tier::CameraOverlay),
            TierPlan::Model { .. } | TierPlan::CameraOverlay => None,
        }
    }
}

/// Decides which tier a preview attempt starts with
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityNegotiator;

impl CapabilityNegotiator {
    pub fn new() -> Self {
        Self
    }

    /// Plan a preview for `creature`.
    ///
    /// With a model reference this returns immediately without touching the
    /// XR runtime. Otherwise the runtime is probed once; an indeterminate
    /// answer is treated as "try it and see".
    pub async fn plan(&self, creature: &CreatureAsset, xr: &dyn XrRuntime) -> TierPlan {
        if let Some(model_url) = creature.model() {
            log::debug!("Model reference present, committing to model tier");
            return TierPlan::Model {
                model_url: model_url.to_string(),
            };
        }

        let probe = xr.probe_immersive_ar().await;
        log::debug!("Immersive AR probe: {:?}", probe);
        match probe {
            CapabilityProbe::Supported | CapabilityProbe::Indeterminate => {
                TierPlan::TryHitTestAr { probe }
            }
            CapabilityProbe::Unsupported => TierPlan::CameraOverlay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockPlatform;

    #[tokio::test]
    async fn test_model_reference_skips_probe() {
        let platform = MockPlatform {
            probe: CapabilityProbe::Supported,
            ..Default::default()
        };
        let services = platform.services();
        let creature = CreatureAsset::new("Kappa").with_model("kappa.glb");

        let plan = CapabilityNegotiator::new()
            .plan(&creature, services.xr.as_ref())
            .await;

        assert_eq!(
            plan,
            TierPlan::Model {
                model_url: "kappa.glb".to_string()
            }
        );
        assert_eq!(platform.recorded().probes, 0);
    }

    #[tokio::test]
    async fn test_supported_and_indeterminate_try_ar() {
        for probe in [CapabilityProbe::Supported, CapabilityProbe::Indeterminate] {
            let platform = MockPlatform {
                probe,
                ..Default::default()
            };
            let services = platform.services();
            let plan = CapabilityNegotiator::new()
                .plan(&CreatureAsset::new("Kappa"), services.xr.as_ref())
                .await;
            assert_eq!(plan, TierPlan::TryHitTestAr { probe });
            assert_eq!(plan.fallback(), Some(Tier::CameraOverlay));
        }
    }

    #[tokio::test]
    async fn test_unsupported_goes_to_camera() {
        let platform = MockPlatform::default();
        let services = platform.services();
        let plan = CapabilityNegotiator::new()
            .plan(&CreatureAsset::new("Kappa"), services.xr.as_ref())
            .await;
        assert_eq!(plan, TierPlan::CameraOverlay);
        assert_eq!(plan.first_tier(), Tier::CameraOverlay);
        assert_eq!(plan.fallback(), None);
        assert_eq!(platform.recorded().probes, 1);
    }
}
