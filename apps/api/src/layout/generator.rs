//! Layout Generator — computes grid placements from a template's structure rules.
//!
//! # Algorithm
//! A single forward cursor walks a fixed role sequence:
//! header → contact info (header placement) → date → greeting → body paragraphs
//! → closing → signature → contact info (footer placement).
//! Every block matching the current role gets one entry at the cursor, then the
//! cursor advances by the entry's height. There is no packing or collision handling.
//!
//! Blocks whose type is not in the sequence (subheader, divider, custom types)
//! receive no entry.

use crate::document::models::{Block, BlockType, LayoutEntry};
use crate::layout::grid::{x_for_alignment, DEFAULT_MIN_SIZE, GRID_COLUMNS};
use crate::templates::{Alignment, ContactPlacement, ContentStructure, SpacingClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Header,
    ContactInfo,
    Date,
    Greeting,
    Body,
    Closing,
    Signature,
}

impl Role {
    fn matches(self, block_type: &BlockType) -> bool {
        match self {
            Role::Header => *block_type == BlockType::Header,
            Role::ContactInfo => *block_type == BlockType::ContactInfo,
            Role::Date => *block_type == BlockType::Date,
            Role::Greeting => *block_type == BlockType::Greeting,
            Role::Body => block_type.is_body(),
            Role::Closing => *block_type == BlockType::Closing,
            Role::Signature => *block_type == BlockType::Signature,
        }
    }

    fn width(self) -> i32 {
        match self {
            Role::Date => 4,
            Role::Closing | Role::Signature => 6,
            _ => GRID_COLUMNS,
        }
    }

    fn height(self, structure: &ContentStructure) -> i32 {
        match self {
            Role::Header if structure.header_alignment == Alignment::Center => 3,
            Role::Header | Role::ContactInfo | Role::Signature => 2,
            Role::Date | Role::Greeting | Role::Closing => 1,
            Role::Body => paragraph_height(structure.paragraph_spacing),
        }
    }
}

fn role_sequence(structure: &ContentStructure) -> Vec<Role> {
    let mut roles = vec![Role::Header];
    if structure.contact_info_position == ContactPlacement::Header {
        roles.push(Role::ContactInfo);
    }
    roles.extend([
        Role::Date,
        Role::Greeting,
        Role::Body,
        Role::Closing,
        Role::Signature,
    ]);
    if structure.contact_info_position == ContactPlacement::Footer {
        roles.push(Role::ContactInfo);
    }
    roles
}

/// Grid rows occupied by one body paragraph.
pub fn paragraph_height(spacing: SpacingClass) -> i32 {
    match spacing {
        SpacingClass::Compact => 2,
        SpacingClass::Normal => 3,
        SpacingClass::Relaxed => 4,
        SpacingClass::Spacious => 5,
    }
}

/// Text line height for a spacing class.
pub fn line_height_for(spacing: SpacingClass) -> f32 {
    match spacing {
        SpacingClass::Compact => 1.4,
        SpacingClass::Normal => 1.6,
        SpacingClass::Relaxed => 1.8,
        SpacingClass::Spacious => 2.0,
    }
}

/// Alignment a block type takes under a structure. Used for both grid `x` and `textAlign`.
pub fn alignment_for(block_type: &BlockType, structure: &ContentStructure) -> Alignment {
    match block_type {
        BlockType::Header | BlockType::Subheader => structure.header_alignment,
        BlockType::ContactInfo => match structure.contact_info_position {
            ContactPlacement::Header => structure.header_alignment,
            ContactPlacement::Footer => Alignment::Center,
        },
        BlockType::Date => structure.date_position,
        BlockType::Closing | BlockType::Signature => structure.signature_alignment,
        _ => Alignment::Left,
    }
}

/// Computes a fresh layout for `blocks` under `structure`.
pub fn generate_layout(structure: &ContentStructure, blocks: &[Block]) -> Vec<LayoutEntry> {
    let mut entries = Vec::with_capacity(blocks.len());
    let mut cursor = 0;

    for role in role_sequence(structure) {
        for block in blocks.iter().filter(|b| role.matches(&b.block_type)) {
            let w = role.width();
            let h = role.height(structure);
            entries.push(LayoutEntry {
                i: block.id.clone(),
                x: x_for_alignment(alignment_for(&block.block_type, structure), w),
                y: cursor,
                w,
                h,
                min_w: Some(DEFAULT_MIN_SIZE),
                min_h: Some(1),
            });
            cursor += h;
        }
    }

    tracing::debug!(
        blocks = blocks.len(),
        entries = entries.len(),
        "generated layout"
    );
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::models::Formatting;

    fn block(id: &str, block_type: BlockType) -> Block {
        Block {
            id: id.to_string(),
            block_type,
            content: String::new(),
            custom_name: None,
            formatting: Formatting::default(),
        }
    }

    fn structure() -> ContentStructure {
        ContentStructure {
            header_alignment: Alignment::Center,
            date_position: Alignment::Right,
            paragraph_spacing: SpacingClass::Normal,
            signature_alignment: Alignment::Right,
            contact_info_position: ContactPlacement::Header,
        }
    }

    fn ids(entries: &[LayoutEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.i.as_str()).collect()
    }

    #[test]
    fn test_empty_blocks_empty_layout() {
        assert!(generate_layout(&structure(), &[]).is_empty());
    }

    #[test]
    fn test_roles_follow_fixed_sequence_not_block_order() {
        let blocks = vec![
            block("sig", BlockType::Signature),
            block("p1", BlockType::Content),
            block("hdr", BlockType::Header),
            block("greet", BlockType::Greeting),
            block("date", BlockType::Date),
            block("contact", BlockType::ContactInfo),
            block("close", BlockType::Closing),
            block("p2", BlockType::BodyParagraph),
        ];
        let layout = generate_layout(&structure(), &blocks);
        assert_eq!(
            ids(&layout),
            vec!["hdr", "contact", "date", "greet", "p1", "p2", "close", "sig"]
        );
    }

    #[test]
    fn test_cursor_accumulates_heights() {
        let blocks = vec![
            block("hdr", BlockType::Header),
            block("date", BlockType::Date),
            block("p1", BlockType::Content),
            block("p2", BlockType::Content),
            block("sig", BlockType::Signature),
        ];
        let layout = generate_layout(&structure(), &blocks);
        let ys: Vec<i32> = layout.iter().map(|e| e.y).collect();
        let hs: Vec<i32> = layout.iter().map(|e| e.h).collect();
        // centered header = 3, date = 1, normal paragraphs = 3 each, signature = 2
        assert_eq!(hs, vec![3, 1, 3, 3, 2]);
        assert_eq!(ys, vec![0, 3, 4, 7, 10]);
    }

    #[test]
    fn test_alignment_drives_x() {
        let blocks = vec![
            block("hdr", BlockType::Header),
            block("date", BlockType::Date),
            block("sig", BlockType::Signature),
            block("p", BlockType::Content),
        ];
        let layout = generate_layout(&structure(), &blocks);
        let x = |id: &str| layout.iter().find(|e| e.i == id).unwrap().x;
        assert_eq!(x("hdr"), 0); // full width, centered -> (12-12)/2
        assert_eq!(x("date"), 8); // right, w=4
        assert_eq!(x("sig"), 6); // right, w=6
        assert_eq!(x("p"), 0);
    }

    #[test]
    fn test_left_header_is_two_rows() {
        let mut s = structure();
        s.header_alignment = Alignment::Left;
        let layout = generate_layout(&s, &[block("hdr", BlockType::Header)]);
        assert_eq!(layout[0].h, 2);
    }

    #[test]
    fn test_paragraph_height_by_spacing() {
        for (spacing, expected) in [
            (SpacingClass::Compact, 2),
            (SpacingClass::Normal, 3),
            (SpacingClass::Relaxed, 4),
            (SpacingClass::Spacious, 5),
        ] {
            let mut s = structure();
            s.paragraph_spacing = spacing;
            let layout = generate_layout(&s, &[block("p", BlockType::Content)]);
            assert_eq!(layout[0].h, expected, "{spacing:?}");
        }
    }

    #[test]
    fn test_footer_contact_comes_after_signature() {
        let mut s = structure();
        s.contact_info_position = ContactPlacement::Footer;
        let blocks = vec![
            block("contact", BlockType::ContactInfo),
            block("hdr", BlockType::Header),
            block("sig", BlockType::Signature),
        ];
        let layout = generate_layout(&s, &blocks);
        assert_eq!(ids(&layout), vec!["hdr", "sig", "contact"]);
    }

    #[test]
    fn test_unsequenced_types_get_no_entry() {
        let blocks = vec![
            block("hdr", BlockType::Header),
            block("sub", BlockType::Subheader),
            block("div", BlockType::Divider),
            block("custom", BlockType::Custom("pull_quote".into())),
        ];
        let layout = generate_layout(&structure(), &blocks);
        assert_eq!(ids(&layout), vec!["hdr"]);
    }

    #[test]
    fn test_alignment_for_roles() {
        let s = structure();
        assert_eq!(alignment_for(&BlockType::Subheader, &s), Alignment::Center);
        assert_eq!(alignment_for(&BlockType::Closing, &s), Alignment::Right);
        assert_eq!(alignment_for(&BlockType::Quote, &s), Alignment::Left);

        let mut footer = s.clone();
        footer.contact_info_position = ContactPlacement::Footer;
        assert_eq!(alignment_for(&BlockType::ContactInfo, &footer), Alignment::Center);
    }

    #[test]
    fn test_line_height_for_spacing() {
        assert_eq!(line_height_for(SpacingClass::Compact), 1.4);
        assert_eq!(line_height_for(SpacingClass::Spacious), 2.0);
    }
}
