//! Creature inputs consumed by the preview
//!
//! These are read-only values handed over by the content side of the site.
//! The preview never mutates them and never needs more than what is here.

mod style;

pub use style::{BuiltinTypeStyles, IconGlyph, TypeStyle, TypeStyleLookup};

use serde::{Deserialize, Serialize};

/// Creature category, used to pick a fallback icon and glow colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CreatureType {
    Spirit,
    Demon,
    Trickster,
    WaterCreature,
    Shapeshifter,
    Undead,
    #[default]
    #[serde(other)]
    Other,
}

impl CreatureType {
    pub const ALL: [CreatureType; 7] = [
        CreatureType::Spirit,
        CreatureType::Demon,
        CreatureType::Trickster,
        CreatureType::WaterCreature,
        CreatureType::Shapeshifter,
        CreatureType::Undead,
        CreatureType::Other,
    ];
}

/// Everything the preview needs to know about one creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureAsset {
    /// Display name
    pub name: String,
    /// Primary image reference
    #[serde(default)]
    pub image_url: Option<String>,
    /// First gallery image; preferred over the primary image for AR
    #[serde(default)]
    pub secondary_image_url: Option<String>,
    /// Optional packaged 3D model (GLB/GLTF)
    #[serde(default)]
    pub model_url: Option<String>,
    #[serde(default)]
    pub creature_type: CreatureType,
}

impl CreatureAsset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_url: None,
            secondary_image_url: None,
            model_url: None,
            creature_type: CreatureType::Other,
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_secondary_image(mut self, url: impl Into<String>) -> Self {
        self.secondary_image_url = Some(url.into());
        self
    }

    pub fn with_model(mut self, url: impl Into<String>) -> Self {
        self.model_url = Some(url.into());
        self
    }

    pub fn with_type(mut self, creature_type: CreatureType) -> Self {
        self.creature_type = creature_type;
        self
    }

    /// Image shown in AR: the gallery image if present, else the primary one.
    /// Empty strings count as absent.
    pub fn ar_image_url(&self) -> Option<&str> {
        non_empty(&self.secondary_image_url).or_else(|| non_empty(&self.image_url))
    }

    /// Model reference, if one is packaged
    pub fn model(&self) -> Option<&str> {
        non_empty(&self.model_url)
    }

    pub fn has_image(&self) -> bool {
        self.ar_image_url().is_some()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Turn a display name into a lower-case, hyphen-separated slug.
///
/// Runs of non-alphanumeric characters collapse into a single hyphen and
/// leading/trailing hyphens are dropped. Names with no alphanumerics at all
/// produce `"creature"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        slug.push_str("creature");
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_parenthetical_name() {
        assert_eq!(slugify("Kappa (River Spirit)"), "kappa-river-spirit");
    }

    #[test]
    fn test_slugify_collapses_runs_and_trims() {
        assert_eq!(slugify("  --Black   Shuck!! "), "black-shuck");
        assert_eq!(slugify("Mothman"), "mothman");
        assert_eq!(slugify("Will-o'-the-Wisp"), "will-o-the-wisp");
        assert_eq!(slugify("snake_case_name"), "snake-case-name");
    }

    #[test]
    fn test_slugify_empty_falls_back() {
        assert_eq!(slugify(""), "creature");
        assert_eq!(slugify("???"), "creature");
    }

    #[test]
    fn test_secondary_image_preferred_for_ar() {
        let asset = CreatureAsset::new("Kappa")
            .with_image("primary.png")
            .with_secondary_image("gallery.png");
        assert_eq!(asset.ar_image_url(), Some("gallery.png"));

        let asset = CreatureAsset::new("Kappa").with_image("primary.png");
        assert_eq!(asset.ar_image_url(), Some("primary.png"));
    }

    #[test]
    fn test_blank_references_count_as_absent() {
        let mut asset = CreatureAsset::new("Kappa").with_model("  ");
        asset.secondary_image_url = Some(String::new());
        assert!(asset.model().is_none());
        assert!(!asset.has_image());
    }

    #[test]
    fn test_unknown_type_deserializes_as_other() {
        let asset: CreatureAsset =
            serde_json::from_str(r#"{"name":"X","creature_type":"cryptid"}"#).unwrap();
        assert_eq!(asset.creature_type, CreatureType::Other);

        let asset: CreatureAsset =
            serde_json::from_str(r#"{"name":"X","creature_type":"water_creature"}"#).unwrap();
        assert_eq!(asset.creature_type, CreatureType::WaterCreature);
    }
}
