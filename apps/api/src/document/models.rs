//! Cover-letter document model. JSON shape matches the editor front-end (camelCase keys).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::document::ids::generate_block_id;
use crate::layout::grid::{row_for, DEFAULT_BLOCK_HEIGHT, DEFAULT_BLOCK_WIDTH, DEFAULT_MIN_SIZE};
use crate::templates::{Alignment, ContentStructure};

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterDocument {
    pub id: String,
    pub title: String,
    pub content: DocumentContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContent {
    /// Reading order. Layout rebuilds walk this list.
    #[serde(default)]
    pub blocks: Vec<Block>,
    /// One entry per block, keyed by `LayoutEntry::i`. Order is not significant.
    #[serde(default)]
    pub layout: Vec<LayoutEntry>,
    /// Active template id.
    pub style: String,
    /// Structure copied from the template at the time it was last applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<ContentStructure>,
}

impl DocumentContent {
    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn block_index(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    pub fn layout_entry(&self, id: &str) -> Option<&LayoutEntry> {
        self.layout.iter().find(|e| e.i == id)
    }

    pub fn layout_entry_mut(&mut self, id: &str) -> Option<&mut LayoutEntry> {
        self.layout.iter_mut().find(|e| e.i == id)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Blocks
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    #[serde(default)]
    pub formatting: Formatting,
}

impl Block {
    /// The user-supplied label, or the type's default display name.
    pub fn display_name(&self) -> String {
        match &self.custom_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => self.block_type.display_name(),
        }
    }
}

/// Block type vocabulary. Strings outside the known set are kept verbatim as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    Header,
    Subheader,
    Content,
    BulletList,
    NumberedList,
    Quote,
    Divider,
    ContactInfo,
    Date,
    Greeting,
    Introduction,
    BodyParagraph,
    Conclusion,
    Closing,
    Signature,
    Custom(String),
}

impl BlockType {
    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Header => "header",
            BlockType::Subheader => "subheader",
            BlockType::Content => "content",
            BlockType::BulletList => "bullet_list",
            BlockType::NumberedList => "numbered_list",
            BlockType::Quote => "quote",
            BlockType::Divider => "divider",
            BlockType::ContactInfo => "contact_info",
            BlockType::Date => "date",
            BlockType::Greeting => "greeting",
            BlockType::Introduction => "introduction",
            BlockType::BodyParagraph => "body_paragraph",
            BlockType::Conclusion => "conclusion",
            BlockType::Closing => "closing",
            BlockType::Signature => "signature",
            BlockType::Custom(s) => s.as_str(),
        }
    }

    /// Paragraph-like blocks that flow in the letter body.
    pub fn is_body(&self) -> bool {
        matches!(
            self,
            BlockType::Content
                | BlockType::Introduction
                | BlockType::BodyParagraph
                | BlockType::Conclusion
                | BlockType::BulletList
                | BlockType::NumberedList
                | BlockType::Quote
        )
    }

    /// Title-cased type name, e.g. `bullet_list` -> `Bullet List`.
    pub fn display_name(&self) -> String {
        self.as_str()
            .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut c = w.chars();
                match c.next() {
                    None => String::new(),
                    Some(f) => f.to_uppercase().to_string() + c.as_str(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<String> for BlockType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "header" => BlockType::Header,
            "subheader" => BlockType::Subheader,
            "content" => BlockType::Content,
            "bullet_list" => BlockType::BulletList,
            "numbered_list" => BlockType::NumberedList,
            "quote" => BlockType::Quote,
            "divider" => BlockType::Divider,
            "contact_info" => BlockType::ContactInfo,
            "date" => BlockType::Date,
            "greeting" => BlockType::Greeting,
            "introduction" => BlockType::Introduction,
            "body_paragraph" => BlockType::BodyParagraph,
            "conclusion" => BlockType::Conclusion,
            "closing" => BlockType::Closing,
            "signature" => BlockType::Signature,
            _ => BlockType::Custom(s),
        }
    }
}

impl From<BlockType> for String {
    fn from(t: BlockType) -> Self {
        match t {
            BlockType::Custom(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

/// Style properties recognized on a block. Absent fields are left to the renderer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formatting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

/// Grid placement for one block. `min_w`/`min_h` are advisory for the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEntry {
    pub i: String,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<i32>,
}

impl LayoutEntry {
    /// Default entry for a block at `index` that has no placement yet.
    pub fn fallback(block_id: &str, index: usize) -> Self {
        LayoutEntry {
            i: block_id.to_string(),
            x: 0,
            y: row_for(index),
            w: DEFAULT_BLOCK_WIDTH,
            h: DEFAULT_BLOCK_HEIGHT,
            min_w: Some(DEFAULT_MIN_SIZE),
            min_h: Some(DEFAULT_MIN_SIZE),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Mutation payloads
// ────────────────────────────────────────────────────────────────────────────

/// A block as submitted by the editor. `id` is generated when absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlock {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub custom_name: Option<String>,
    #[serde(default)]
    pub formatting: Formatting,
}

impl NewBlock {
    pub fn new(block_type: BlockType, content: impl Into<String>) -> Self {
        NewBlock {
            id: None,
            block_type,
            content: content.into(),
            custom_name: None,
            formatting: Formatting::default(),
        }
    }

    pub fn into_block(self, now: DateTime<Utc>) -> Block {
        Block {
            id: self
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| generate_block_id(now)),
            block_type: self.block_type,
            content: self.content,
            custom_name: self.custom_name,
            formatting: self.formatting,
        }
    }
}

/// Shallow update for a block. `formatting` replaces the whole bag when present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
    #[serde(default, rename = "type")]
    pub block_type: Option<BlockType>,
    #[serde(default)]
    pub content: Option<String>,
    /// `null` clears the label, an absent key leaves it alone.
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub custom_name: Option<Option<String>>,
    #[serde(default)]
    pub formatting: Option<Formatting>,
}

impl BlockPatch {
    pub fn apply_to(self, block: &mut Block) {
        if let Some(block_type) = self.block_type {
            block.block_type = block_type;
        }
        if let Some(content) = self.content {
            block.content = content;
        }
        if let Some(name) = self.custom_name {
            block.custom_name = name;
        }
        if let Some(formatting) = self.formatting {
            block.formatting = formatting;
        }
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from a missing key (`None`, via `default`).
fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Shallow update for a layout entry. Values are applied as given, unclamped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPatch {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub w: Option<i32>,
    pub h: Option<i32>,
    pub min_w: Option<i32>,
    pub min_h: Option<i32>,
}

impl LayoutPatch {
    pub fn apply_to(self, entry: &mut LayoutEntry) {
        if let Some(x) = self.x {
            entry.x = x;
        }
        if let Some(y) = self.y {
            entry.y = y;
        }
        if let Some(w) = self.w {
            entry.w = w;
        }
        if let Some(h) = self.h {
            entry.h = h;
        }
        if self.min_w.is_some() {
            entry.min_w = self.min_w;
        }
        if self.min_h.is_some() {
            entry.min_h = self.min_h;
        }
    }
}

/// Explicit grid placement for `add_block_at_position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    #[serde(default = "default_width")]
    pub w: i32,
    #[serde(default = "default_height")]
    pub h: i32,
}

#[cfg(test)]
impl Placement {
    pub fn at(x: i32, y: i32) -> Self {
        Placement {
            x,
            y,
            w: DEFAULT_BLOCK_WIDTH,
            h: DEFAULT_BLOCK_HEIGHT,
        }
    }
}

fn default_width() -> i32 {
    DEFAULT_BLOCK_WIDTH
}

fn default_height() -> i32 {
    DEFAULT_BLOCK_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_type_known_and_custom_strings() {
        let t: BlockType = serde_json::from_value(json!("bullet_list")).unwrap();
        assert_eq!(t, BlockType::BulletList);

        let custom: BlockType = serde_json::from_value(json!("pull_quote")).unwrap();
        assert_eq!(custom, BlockType::Custom("pull_quote".to_string()));
        assert_eq!(serde_json::to_value(&custom).unwrap(), json!("pull_quote"));
    }

    #[test]
    fn test_display_name_prefers_custom_name() {
        let mut block = Block {
            id: "b1".into(),
            block_type: BlockType::BulletList,
            content: String::new(),
            custom_name: None,
            formatting: Formatting::default(),
        };
        assert_eq!(block.display_name(), "Bullet List");

        block.custom_name = Some("Key Wins".into());
        assert_eq!(block.display_name(), "Key Wins");

        block.custom_name = Some("   ".into());
        assert_eq!(block.display_name(), "Bullet List");
    }

    #[test]
    fn test_formatting_omits_absent_keys() {
        let f = Formatting {
            font_size: Some(14),
            text_align: Some(Alignment::Center),
            ..Default::default()
        };
        let value = serde_json::to_value(&f).unwrap();
        assert_eq!(value, json!({ "fontSize": 14, "textAlign": "center" }));
    }

    #[test]
    fn test_layout_entry_wire_keys() {
        let entry = LayoutEntry::fallback("b1", 2);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({ "i": "b1", "x": 0, "y": 8, "w": 6, "h": 4, "minW": 2, "minH": 2 })
        );
    }

    #[test]
    fn test_new_block_generates_id_when_missing_or_empty() {
        let now = Utc::now();
        let generated = NewBlock::new(BlockType::Content, "x").into_block(now);
        assert!(generated.id.starts_with("block-"));

        let mut supplied = NewBlock::new(BlockType::Content, "x");
        supplied.id = Some("keep-me".into());
        assert_eq!(supplied.into_block(now).id, "keep-me");

        let mut empty = NewBlock::new(BlockType::Content, "x");
        empty.id = Some(String::new());
        assert!(empty.into_block(now).id.starts_with("block-"));
    }

    #[test]
    fn test_block_patch_null_clears_custom_name() {
        let mut block = NewBlock::new(BlockType::Quote, "q").into_block(Utc::now());

        let rename: BlockPatch =
            serde_json::from_value(json!({ "customName": "Pull quote" })).unwrap();
        rename.apply_to(&mut block);
        assert_eq!(block.custom_name.as_deref(), Some("Pull quote"));

        let untouched: BlockPatch = serde_json::from_value(json!({ "content": "new" })).unwrap();
        untouched.apply_to(&mut block);
        assert_eq!(block.custom_name.as_deref(), Some("Pull quote"));

        let cleared: BlockPatch = serde_json::from_value(json!({ "customName": null })).unwrap();
        cleared.apply_to(&mut block);
        assert_eq!(block.custom_name, None);
        assert_eq!(block.display_name(), "Quote");
    }

    #[test]
    fn test_placement_defaults_size() {
        let p: Placement = serde_json::from_value(json!({ "x": 3, "y": 7 })).unwrap();
        assert_eq!(p, Placement::at(3, 7));
    }

    #[test]
    fn test_document_deserializes_front_end_shape() {
        let doc: CoverLetterDocument = serde_json::from_value(json!({
            "id": "cl-1",
            "title": "Acme application",
            "content": {
                "blocks": [
                    {
                        "id": "a",
                        "type": "header",
                        "content": "Jane Doe",
                        "formatting": { "fontSize": 24 }
                    }
                ],
                "layout": [ { "i": "a", "x": 0, "y": 0, "w": 12, "h": 2 } ],
                "style": "modern"
            },
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-02T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(doc.content.blocks[0].block_type, BlockType::Header);
        assert_eq!(doc.content.layout_entry("a").map(|e| e.w), Some(12));
        assert!(doc.content.structure.is_none());
    }
}
