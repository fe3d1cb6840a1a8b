//! Category to icon/glow lookup
//!
//! The site owns the real mapping; the preview only asks for a style by
//! category. `BuiltinTypeStyles` mirrors the site's table so the preview
//! works standalone.

use super::CreatureType;

/// Icon glyph drawn in place of a missing creature image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconGlyph {
    Sparkles,
    Flame,
    Zap,
    Waves,
    Shuffle,
    Skull,
    Eye,
}

impl IconGlyph {
    /// Text symbol used when painting the glyph with a font
    pub fn symbol(&self) -> &'static str {
        match self {
            IconGlyph::Sparkles => "✨",
            IconGlyph::Flame => "🔥",
            IconGlyph::Zap => "⚡",
            IconGlyph::Waves => "🌊",
            IconGlyph::Shuffle => "🔀",
            IconGlyph::Skull => "💀",
            IconGlyph::Eye => "👁",
        }
    }
}

/// Visual style of one creature category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeStyle {
    pub icon: IconGlyph,
    /// Human readable category label
    pub label: &'static str,
    /// Glow colour as unmultiplied RGBA
    pub glow: [u8; 4],
}

/// Lookup from category to style
pub trait TypeStyleLookup {
    fn style_for(&self, creature_type: CreatureType) -> TypeStyle;
}

/// The site's default category table
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTypeStyles;

impl TypeStyleLookup for BuiltinTypeStyles {
    fn style_for(&self, creature_type: CreatureType) -> TypeStyle {
        match creature_type {
            CreatureType::Spirit => TypeStyle {
                icon: IconGlyph::Sparkles,
                label: "Spirit",
                glow: [125, 211, 252, 102],
            },
            CreatureType::Demon => TypeStyle {
                icon: IconGlyph::Flame,
                label: "Demon",
                glow: [248, 113, 113, 102],
            },
            CreatureType::Trickster => TypeStyle {
                icon: IconGlyph::Zap,
                label: "Trickster",
                glow: [250, 204, 21, 102],
            },
            CreatureType::WaterCreature => TypeStyle {
                icon: IconGlyph::Waves,
                label: "Water Creature",
                glow: [34, 211, 238, 102],
            },
            CreatureType::Shapeshifter => TypeStyle {
                icon: IconGlyph::Shuffle,
                label: "Shapeshifter",
                glow: [167, 139, 250, 102],
            },
            CreatureType::Undead => TypeStyle {
                icon: IconGlyph::Skull,
                label: "Undead",
                glow: [161, 161, 170, 77],
            },
            CreatureType::Other => TypeStyle {
                icon: IconGlyph::Eye,
                label: "Unknown Entity",
                glow: [200, 168, 75, 64],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_every_category_has_distinct_icon() {
        let styles = BuiltinTypeStyles;
        let icons: HashSet<IconGlyph> = CreatureType::ALL
            .iter()
            .map(|t| styles.style_for(*t).icon)
            .collect();
        assert_eq!(icons.len(), CreatureType::ALL.len());
    }

    #[test]
    fn test_other_is_unknown_entity() {
        let style = BuiltinTypeStyles.style_for(CreatureType::Other);
        assert_eq!(style.label, "Unknown Entity");
        assert_eq!(style.icon, IconGlyph::Eye);
    }
}
