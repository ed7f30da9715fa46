//! Static template catalog. Eight fixed templates; unknown ids resolve to `professional`.

use std::sync::OnceLock;

use crate::templates::structure::{
    Alignment, ContactPlacement, ContentStructure, SpacingClass, TemplateDescriptor, TypeScale,
};

pub const FALLBACK_TEMPLATE_ID: &str = "professional";

static CATALOG: OnceLock<Vec<TemplateDescriptor>> = OnceLock::new();

/// Returns every template in catalog order.
pub fn all_templates() -> &'static [TemplateDescriptor] {
    CATALOG.get_or_init(build_catalog)
}

/// Looks up a template by id, falling back to `professional` for unknown ids.
pub fn get_template(id: &str) -> &'static TemplateDescriptor {
    let catalog = all_templates();
    catalog
        .iter()
        .find(|t| t.id == id)
        .or_else(|| catalog.iter().find(|t| t.id == FALLBACK_TEMPLATE_ID))
        .unwrap_or(&catalog[0])
}

struct Spec {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    premium: bool,
    header: Alignment,
    date: Alignment,
    signature: Alignment,
    contact: ContactPlacement,
    spacing: SpacingClass,
    font_family: &'static str,
    primary_color: &'static str,
    background_color: &'static str,
    scale: [u16; 4],
}

const SPECS: &[Spec] = &[
    Spec {
        id: "modern",
        name: "Modern",
        description: "Clean sans-serif layout with a left-aligned masthead",
        premium: false,
        header: Alignment::Left,
        date: Alignment::Right,
        signature: Alignment::Left,
        contact: ContactPlacement::Header,
        spacing: SpacingClass::Normal,
        font_family: "Inter, sans-serif",
        primary_color: "#1f2937",
        background_color: "#ffffff",
        scale: [26, 18, 14, 12],
    },
    Spec {
        id: "executive",
        name: "Executive",
        description: "Centered serif masthead for senior leadership roles",
        premium: true,
        header: Alignment::Center,
        date: Alignment::Right,
        signature: Alignment::Left,
        contact: ContactPlacement::Header,
        spacing: SpacingClass::Relaxed,
        font_family: "Georgia, serif",
        primary_color: "#0f172a",
        background_color: "#fdfcf8",
        scale: [30, 20, 15, 12],
    },
    Spec {
        id: "creative",
        name: "Creative",
        description: "Bold accent color with contact details in the footer",
        premium: true,
        header: Alignment::Left,
        date: Alignment::Left,
        signature: Alignment::Right,
        contact: ContactPlacement::Footer,
        spacing: SpacingClass::Spacious,
        font_family: "Montserrat, sans-serif",
        primary_color: "#7c3aed",
        background_color: "#faf5ff",
        scale: [32, 20, 14, 12],
    },
    Spec {
        id: "minimalist",
        name: "Minimalist",
        description: "Compact, quiet typography with generous whitespace",
        premium: false,
        header: Alignment::Left,
        date: Alignment::Left,
        signature: Alignment::Left,
        contact: ContactPlacement::Footer,
        spacing: SpacingClass::Compact,
        font_family: "Verdana, sans-serif",
        primary_color: "#374151",
        background_color: "#ffffff",
        scale: [22, 16, 13, 11],
    },
    Spec {
        id: "traditional",
        name: "Traditional",
        description: "Classic business letter with right-aligned date",
        premium: false,
        header: Alignment::Center,
        date: Alignment::Right,
        signature: Alignment::Right,
        contact: ContactPlacement::Header,
        spacing: SpacingClass::Normal,
        font_family: "Times New Roman, serif",
        primary_color: "#000000",
        background_color: "#ffffff",
        scale: [24, 16, 14, 12],
    },
    Spec {
        id: "professional",
        name: "Professional",
        description: "Balanced default suitable for most applications",
        premium: false,
        header: Alignment::Left,
        date: Alignment::Left,
        signature: Alignment::Left,
        contact: ContactPlacement::Header,
        spacing: SpacingClass::Normal,
        font_family: "Arial, sans-serif",
        primary_color: "#1e3a8a",
        background_color: "#ffffff",
        scale: [24, 18, 14, 12],
    },
    Spec {
        id: "academic",
        name: "Academic",
        description: "Formal serif letter for faculty and research positions",
        premium: false,
        header: Alignment::Center,
        date: Alignment::Left,
        signature: Alignment::Left,
        contact: ContactPlacement::Header,
        spacing: SpacingClass::Relaxed,
        font_family: "Garamond, serif",
        primary_color: "#292524",
        background_color: "#fffef9",
        scale: [24, 17, 14, 12],
    },
    Spec {
        id: "technical",
        name: "Technical",
        description: "Monospace accents for engineering roles",
        premium: true,
        header: Alignment::Left,
        date: Alignment::Right,
        signature: Alignment::Left,
        contact: ContactPlacement::Footer,
        spacing: SpacingClass::Compact,
        font_family: "Roboto Mono, monospace",
        primary_color: "#0f766e",
        background_color: "#f8fafc",
        scale: [22, 16, 13, 11],
    },
];

fn build_catalog() -> Vec<TemplateDescriptor> {
    SPECS
        .iter()
        .map(|s| TemplateDescriptor {
            id: s.id.to_string(),
            name: s.name.to_string(),
            description: s.description.to_string(),
            premium: s.premium,
            structure: ContentStructure {
                header_alignment: s.header,
                date_position: s.date,
                paragraph_spacing: s.spacing,
                signature_alignment: s.signature,
                contact_info_position: s.contact,
            },
            font_family: s.font_family.to_string(),
            primary_color: s.primary_color.to_string(),
            background_color: s.background_color.to_string(),
            spacing: s.spacing,
            type_scale: TypeScale {
                header: s.scale[0],
                subheader: s.scale[1],
                body: s.scale[2],
                caption: s.scale[3],
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_eight_templates_in_order() {
        let ids: Vec<&str> = all_templates().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "modern",
                "executive",
                "creative",
                "minimalist",
                "traditional",
                "professional",
                "academic",
                "technical"
            ]
        );
    }

    #[test]
    fn test_get_template_known_id() {
        let t = get_template("minimalist");
        assert_eq!(t.id, "minimalist");
        assert_eq!(t.font_family, "Verdana, sans-serif");
    }

    #[test]
    fn test_get_template_unknown_falls_back_to_professional() {
        assert_eq!(get_template("does-not-exist").id, "professional");
        assert_eq!(get_template("").id, "professional");
    }

    #[test]
    fn test_spacing_matches_paragraph_spacing() {
        for t in all_templates() {
            assert_eq!(t.spacing, t.structure.paragraph_spacing, "{}", t.id);
        }
    }
}
