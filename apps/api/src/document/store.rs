//! Document Store — the single mutation surface for one cover-letter document.
//!
//! # Contract
//! - Every operation is synchronous and all-or-nothing under `&mut self`.
//! - An `Err` means nothing changed: document, selection, `updatedAt` and revision
//!   are exactly as before the call. Callers that relied on silent no-ops can
//!   ignore the error.
//! - Clamping (insert positions, grid sizes) never produces an error.
//! - Every successful call bumps the revision published to subscribers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use crate::document::clock::{Clock, SystemClock};
use crate::document::ids::generate_block_id;
use crate::document::models::{
    Block, BlockPatch, BlockType, CoverLetterDocument, DocumentContent, LayoutEntry, LayoutPatch,
    NewBlock, Placement,
};
use crate::document::validation::{audit, AuditReport};
use crate::layout::grid::{
    clamp_width, clamp_x, fit_within_grid, floor_height, row_for, DEFAULT_MIN_SIZE,
};
use crate::layout::{alignment_for, generate_layout, line_height_for};
use crate::templates::{get_template, ContentStructure, TemplateDescriptor};

// ────────────────────────────────────────────────────────────────────────────
// Operation types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("No cover letter is loaded")]
    NoDocument,

    #[error("Block {0} not found")]
    BlockNotFound(String),

    #[error("Block {0} has no layout entry")]
    LayoutEntryMissing(String),

    #[error("Block {block_id} cannot move {direction}")]
    AtBoundary {
        block_id: String,
        direction: Direction,
    },

    #[error("Index {index} out of range for {len} blocks")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Block id {0} is already in use")]
    DuplicateBlockId(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => f.write_str("up"),
            Direction::Down => f.write_str("down"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Width,
    Height,
}

/// How reorder operations treat existing placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Reordering re-flows every block to `y = index * 4`, keeping x/w/h.
    #[default]
    AutoFlow,
    /// Reordering changes reading order only; placements are untouched.
    FreeForm,
}

impl std::str::FromStr for LayoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto_flow" | "auto" => Ok(LayoutMode::AutoFlow),
            "free_form" | "free" => Ok(LayoutMode::FreeForm),
            other => Err(format!("unknown layout mode '{other}'")),
        }
    }
}

/// How much of a template `apply_template` applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    /// Font family and colors only. Layout is kept.
    BasicRestyle,
    /// Full restyle from the template, then a layout regenerated from its structure.
    #[default]
    StructuralReflow,
}

/// Read model handed to callers after each operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub document: Option<CoverLetterDocument>,
    pub selected_block: Option<String>,
    pub layout_mode: LayoutMode,
    pub revision: u64,
}

// ────────────────────────────────────────────────────────────────────────────
// Store
// ────────────────────────────────────────────────────────────────────────────

pub struct DocumentStore {
    document: Option<CoverLetterDocument>,
    selected_block: Option<String>,
    layout_mode: LayoutMode,
    clock: Arc<dyn Clock>,
    revision: watch::Sender<u64>,
}

impl DocumentStore {
    pub fn new(layout_mode: LayoutMode) -> Self {
        Self::with_clock(layout_mode, Arc::new(SystemClock))
    }

    pub fn with_clock(layout_mode: LayoutMode, clock: Arc<dyn Clock>) -> Self {
        let (revision, _) = watch::channel(0);
        DocumentStore {
            document: None,
            selected_block: None,
            layout_mode,
            clock,
            revision,
        }
    }

    // ── reads ───────────────────────────────────────────────────────────────

    pub fn document(&self) -> Option<&CoverLetterDocument> {
        self.document.as_ref()
    }

    pub fn selected_block(&self) -> Option<&str> {
        self.selected_block.as_deref()
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Receives the new revision after every successful mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            document: self.document().cloned(),
            selected_block: self.selected_block().map(str::to_owned),
            layout_mode: self.layout_mode(),
            revision: self.revision(),
        }
    }

    pub fn audit(&self) -> Result<AuditReport, StoreError> {
        let doc = self.document.as_ref().ok_or(StoreError::NoDocument)?;
        Ok(audit(&doc.content))
    }

    // ── whole-document and selection ────────────────────────────────────────

    /// Replaces the document wholesale. No validation or normalization.
    pub fn set_cover_letter(&mut self, document: CoverLetterDocument) {
        self.document = Some(document);
        self.publish();
    }

    pub fn set_selected_block(&mut self, block_id: Option<String>) {
        self.selected_block = block_id;
        self.publish();
    }

    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.layout_mode = mode;
        self.publish();
    }

    // ── block edits ─────────────────────────────────────────────────────────

    pub fn update_block(&mut self, block_id: &str, patch: BlockPatch) -> Result<(), StoreError> {
        let content = self.content_mut()?;
        let block = content
            .blocks
            .iter_mut()
            .find(|b| b.id == block_id)
            .ok_or_else(|| StoreError::BlockNotFound(block_id.to_string()))?;
        patch.apply_to(block);
        self.touch();
        Ok(())
    }

    /// Merges into an existing layout entry. A block without an entry is not given one.
    pub fn update_block_layout(
        &mut self,
        block_id: &str,
        patch: LayoutPatch,
    ) -> Result<(), StoreError> {
        let content = self.content_mut()?;
        let entry = content
            .layout_entry_mut(block_id)
            .ok_or_else(|| StoreError::LayoutEntryMissing(block_id.to_string()))?;
        patch.apply_to(entry);
        self.touch();
        Ok(())
    }

    /// Inserts at `position` (clamped to the end) or appends. Returns the block id.
    ///
    /// The layout is rebuilt in block order: existing entries are reused verbatim,
    /// blocks without one get the fallback entry for their index.
    pub fn add_block(
        &mut self,
        new_block: NewBlock,
        position: Option<usize>,
    ) -> Result<String, StoreError> {
        let now = self.clock.now();
        let content = self.content_mut()?;
        let block = new_block.into_block(now);
        if content.block(&block.id).is_some() {
            return Err(StoreError::DuplicateBlockId(block.id));
        }

        let id = block.id.clone();
        let len = content.blocks.len();
        let index = position.map_or(len, |p| p.min(len));
        content.blocks.insert(index, block);
        let layout = layout_in_block_order(content, |entry, _| entry);
        content.layout = layout;

        self.selected_block = Some(id.clone());
        self.touch();
        Ok(id)
    }

    /// Appends a block with an explicit placement. `x` and `w` are clamped to the
    /// grid, `h` is floored at 1, `y` is used as given.
    pub fn add_block_at_position(
        &mut self,
        new_block: NewBlock,
        placement: Placement,
    ) -> Result<String, StoreError> {
        let now = self.clock.now();
        let content = self.content_mut()?;
        let block = new_block.into_block(now);
        if content.block(&block.id).is_some() {
            return Err(StoreError::DuplicateBlockId(block.id));
        }

        let id = block.id.clone();
        content.layout.push(LayoutEntry {
            i: id.clone(),
            x: clamp_x(placement.x),
            y: placement.y,
            w: clamp_width(placement.w),
            h: floor_height(placement.h),
            min_w: Some(DEFAULT_MIN_SIZE),
            min_h: Some(DEFAULT_MIN_SIZE),
        });
        content.blocks.push(block);

        self.selected_block = Some(id.clone());
        self.touch();
        Ok(id)
    }

    /// Removes the block and its layout entry. Removing an id that is in neither is an error.
    pub fn remove_block(&mut self, block_id: &str) -> Result<(), StoreError> {
        let content = self.content_mut()?;
        let had_block = content.block(block_id).is_some();
        let had_entry = content.layout_entry(block_id).is_some();
        if !had_block && !had_entry {
            return Err(StoreError::BlockNotFound(block_id.to_string()));
        }

        content.blocks.retain(|b| b.id != block_id);
        content.layout.retain(|e| e.i != block_id);

        if self.selected_block.as_deref() == Some(block_id) {
            self.selected_block = None;
        }
        self.touch();
        Ok(())
    }

    /// Clones a block one cell down and right of the original and selects the clone.
    pub fn duplicate_block(&mut self, block_id: &str) -> Result<String, StoreError> {
        let now = self.clock.now();
        let content = self.content_mut()?;
        let original = content
            .block(block_id)
            .ok_or_else(|| StoreError::BlockNotFound(block_id.to_string()))?;
        let entry = content
            .layout_entry(block_id)
            .ok_or_else(|| StoreError::LayoutEntryMissing(block_id.to_string()))?;

        let id = generate_block_id(now);
        let clone = Block {
            id: id.clone(),
            ..original.clone()
        };
        let clone_entry = LayoutEntry {
            i: id.clone(),
            x: entry.x.saturating_add(1),
            y: entry.y.saturating_add(1),
            ..entry.clone()
        };
        content.blocks.push(clone);
        content.layout.push(clone_entry);

        self.selected_block = Some(id.clone());
        self.touch();
        Ok(id)
    }

    // ── ordering ────────────────────────────────────────────────────────────

    /// Swaps a block with its neighbor.
    pub fn move_block(&mut self, block_id: &str, direction: Direction) -> Result<(), StoreError> {
        let mode = self.layout_mode;
        let content = self.content_mut()?;
        let index = content
            .block_index(block_id)
            .ok_or_else(|| StoreError::BlockNotFound(block_id.to_string()))?;
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|t| *t < content.blocks.len()),
        }
        .ok_or_else(|| StoreError::AtBoundary {
            block_id: block_id.to_string(),
            direction,
        })?;

        content.blocks.swap(index, target);
        if mode == LayoutMode::AutoFlow {
            reflow_rows(content);
        }
        self.touch();
        Ok(())
    }

    /// Moves the block at `source` to `destination` (clamped to the last index).
    pub fn reorder_blocks(&mut self, source: usize, destination: usize) -> Result<(), StoreError> {
        let mode = self.layout_mode;
        let content = self.content_mut()?;
        let len = content.blocks.len();
        if source >= len {
            return Err(StoreError::IndexOutOfRange { index: source, len });
        }

        let block = content.blocks.remove(source);
        content.blocks.insert(destination.min(len - 1), block);
        if mode == LayoutMode::AutoFlow {
            reflow_rows(content);
        }
        self.touch();
        Ok(())
    }

    /// Width is clamped to `[1, 12]` and `x` pulled left if the block would overflow.
    /// Height is floored at 1.
    pub fn resize_block(
        &mut self,
        block_id: &str,
        dimension: Dimension,
        value: i32,
    ) -> Result<(), StoreError> {
        let content = self.content_mut()?;
        let entry = content
            .layout_entry_mut(block_id)
            .ok_or_else(|| StoreError::LayoutEntryMissing(block_id.to_string()))?;
        match dimension {
            Dimension::Width => {
                entry.w = clamp_width(value);
                entry.x = fit_within_grid(entry.x, entry.w);
            }
            Dimension::Height => entry.h = floor_height(value),
        }
        self.touch();
        Ok(())
    }

    // ── templates and structure ─────────────────────────────────────────────

    pub fn apply_template(
        &mut self,
        template: &TemplateDescriptor,
        mode: ApplyMode,
    ) -> Result<(), StoreError> {
        let content = self.content_mut()?;
        content.style = template.id.clone();
        content.structure = Some(template.structure.clone());
        for block in &mut content.blocks {
            restyle(block, template, mode);
        }
        if mode == ApplyMode::StructuralReflow {
            content.layout = generate_layout(&template.structure, &content.blocks);
        }
        self.touch();
        Ok(())
    }

    /// Registry lookup (unknown ids resolve to `professional`) followed by `apply_template`.
    pub fn apply_template_by_id(
        &mut self,
        template_id: &str,
        mode: ApplyMode,
    ) -> Result<(), StoreError> {
        self.apply_template(get_template(template_id), mode)
    }

    /// Stores `structure` on the document and regenerates the layout from it.
    pub fn update_content_structure(
        &mut self,
        structure: ContentStructure,
    ) -> Result<(), StoreError> {
        let content = self.content_mut()?;
        content.layout = generate_layout(&structure, &content.blocks);
        content.structure = Some(structure);
        self.touch();
        Ok(())
    }

    /// Replaces the layout wholesale. Uses `structure`, else the stored structure,
    /// else the structure of the document's current template.
    pub fn regenerate_layout(
        &mut self,
        structure: Option<ContentStructure>,
    ) -> Result<(), StoreError> {
        let content = self.content_mut()?;
        let structure = structure
            .or_else(|| content.structure.clone())
            .unwrap_or_else(|| get_template(&content.style).structure.clone());
        content.layout = generate_layout(&structure, &content.blocks);
        self.touch();
        Ok(())
    }

    /// Discards all blocks and starts over from a header + content skeleton.
    pub fn reset_to_template(&mut self, template: &TemplateDescriptor) -> Result<(), StoreError> {
        let now = self.clock.now();
        let content = self.content_mut()?;

        let mut blocks = vec![
            NewBlock::new(BlockType::Header, "Your Name").into_block(now),
            NewBlock::new(
                BlockType::Content,
                "Dear Hiring Manager,\n\nStart writing your cover letter here.",
            )
            .into_block(now),
        ];
        for block in &mut blocks {
            restyle(block, template, ApplyMode::StructuralReflow);
        }

        *content = DocumentContent {
            layout: generate_layout(&template.structure, &blocks),
            blocks,
            style: template.id.clone(),
            structure: Some(template.structure.clone()),
        };

        self.selected_block = None;
        self.touch();
        Ok(())
    }

    // ── internals ───────────────────────────────────────────────────────────

    fn content_mut(&mut self) -> Result<&mut DocumentContent, StoreError> {
        self.document
            .as_mut()
            .map(|doc| &mut doc.content)
            .ok_or(StoreError::NoDocument)
    }

    /// Refreshes `updatedAt` without ever moving it backwards, then publishes.
    fn touch(&mut self) {
        if let Some(doc) = self.document.as_mut() {
            doc.updated_at = self.clock.now().max(doc.updated_at);
        }
        self.publish();
    }

    fn publish(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

/// Rebuilds `layout` in block order, one entry per block. `adjust` receives the
/// reused-or-fallback entry and the block's index.
fn layout_in_block_order(
    content: &DocumentContent,
    adjust: impl Fn(LayoutEntry, usize) -> LayoutEntry,
) -> Vec<LayoutEntry> {
    content
        .blocks
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let entry = content
                .layout_entry(&block.id)
                .cloned()
                .unwrap_or_else(|| LayoutEntry::fallback(&block.id, index));
            adjust(entry, index)
        })
        .collect()
}

/// Auto-flow: `y = index * 4` for every block. Other placement fields are kept.
fn reflow_rows(content: &mut DocumentContent) {
    let layout = layout_in_block_order(content, |mut entry, index| {
        entry.y = row_for(index);
        entry
    });
    content.layout = layout;
}

fn restyle(block: &mut Block, template: &TemplateDescriptor, mode: ApplyMode) {
    let f = &mut block.formatting;
    f.font_family = Some(template.font_family.clone());
    f.color = Some(template.primary_color.clone());
    f.background_color = Some(template.background_color.clone());
    if mode == ApplyMode::StructuralReflow {
        f.font_size = Some(template.type_scale.size_for(&block.block_type));
        f.text_align = Some(alignment_for(&block.block_type, &template.structure));
        f.line_height = Some(line_height_for(template.spacing));
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
