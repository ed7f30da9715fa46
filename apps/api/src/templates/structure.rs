//! Template descriptors and the structure rules embedded in them.
//!
//! A `ContentStructure` is the positioning ruleset the layout generator consumes.
//! A `TemplateDescriptor` bundles one structure with the font, color and spacing
//! values used to restyle blocks.

use serde::{Deserialize, Serialize};

use crate::document::models::BlockType;

// ────────────────────────────────────────────────────────────────────────────
// Structure rules
// ────────────────────────────────────────────────────────────────────────────

/// Horizontal alignment keyword, shared by block formatting and structure rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Named spacing class. Resolves paragraph height in the grid and line height in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpacingClass {
    Compact,
    #[default]
    Normal,
    Relaxed,
    Spacious,
}

/// Where contact details sit in the letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPlacement {
    #[default]
    Header,
    Footer,
}

/// Alignment and positioning rules per block role.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStructure {
    pub header_alignment: Alignment,
    pub date_position: Alignment,
    pub paragraph_spacing: SpacingClass,
    pub signature_alignment: Alignment,
    pub contact_info_position: ContactPlacement,
}

// ────────────────────────────────────────────────────────────────────────────
// Template descriptor
// ────────────────────────────────────────────────────────────────────────────

/// Font sizes in px for each typographic role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeScale {
    pub header: u16,
    pub subheader: u16,
    pub body: u16,
    /// Dates, contact lines and other small print.
    pub caption: u16,
}

impl TypeScale {
    /// Font size for a block type. Custom types use the body size.
    pub fn size_for(&self, block_type: &BlockType) -> u16 {
        match block_type {
            BlockType::Header => self.header,
            BlockType::Subheader => self.subheader,
            BlockType::Date | BlockType::ContactInfo => self.caption,
            _ => self.body,
        }
    }
}

/// An immutable entry in the template registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Gated behind a paid subscription in the front-end.
    pub premium: bool,
    pub structure: ContentStructure,
    pub font_family: String,
    pub primary_color: String,
    pub background_color: String,
    pub spacing: SpacingClass,
    pub type_scale: TypeScale,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_serializes_camel_case_keywords() {
        let structure = ContentStructure {
            header_alignment: Alignment::Center,
            date_position: Alignment::Right,
            paragraph_spacing: SpacingClass::Relaxed,
            signature_alignment: Alignment::Left,
            contact_info_position: ContactPlacement::Footer,
        };
        let value = serde_json::to_value(&structure).unwrap();
        assert_eq!(value["headerAlignment"], "center");
        assert_eq!(value["datePosition"], "right");
        assert_eq!(value["paragraphSpacing"], "relaxed");
        assert_eq!(value["contactInfoPosition"], "footer");
    }

    #[test]
    fn test_type_scale_routes_roles() {
        let scale = TypeScale {
            header: 28,
            subheader: 18,
            body: 14,
            caption: 12,
        };
        assert_eq!(scale.size_for(&BlockType::Header), 28);
        assert_eq!(scale.size_for(&BlockType::Subheader), 18);
        assert_eq!(scale.size_for(&BlockType::Date), 12);
        assert_eq!(scale.size_for(&BlockType::Greeting), 14);
        assert_eq!(scale.size_for(&BlockType::Custom("pull_quote".into())), 14);
    }
}
