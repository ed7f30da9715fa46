use std::collections::HashSet;

use serde::Serialize;

use crate::document::models::DocumentContent;
use crate::layout::grid::GRID_COLUMNS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditIssue {
    /// A block with no layout entry. It will not render in the grid.
    /// `label` is the block's display name for the editor's warning list.
    MissingLayout { block_id: String, label: String },
    /// A layout entry whose block no longer exists.
    OrphanLayout { block_id: String },
    DuplicateBlockId { block_id: String },
    DuplicateLayoutEntry { block_id: String },
    /// `x` outside `[0, 12)` or `x + w` past the last column.
    OutOfGrid { block_id: String, x: i32, w: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub consistent: bool,
    pub issues: Vec<AuditIssue>,
}

/// Reports every blocks/layout inconsistency in `content` without changing it.
///
/// Issues are listed in block order first, then in layout order.
pub fn audit(content: &DocumentContent) -> AuditReport {
    let mut issues = Vec::new();

    let mut seen_blocks = HashSet::new();
    for block in &content.blocks {
        if !seen_blocks.insert(block.id.as_str()) {
            issues.push(AuditIssue::DuplicateBlockId {
                block_id: block.id.clone(),
            });
        } else if content.layout_entry(&block.id).is_none() {
            issues.push(AuditIssue::MissingLayout {
                block_id: block.id.clone(),
                label: block.display_name(),
            });
        }
    }

    let mut seen_entries = HashSet::new();
    for entry in &content.layout {
        if !seen_entries.insert(entry.i.as_str()) {
            issues.push(AuditIssue::DuplicateLayoutEntry {
                block_id: entry.i.clone(),
            });
            continue;
        }
        if !seen_blocks.contains(entry.i.as_str()) {
            issues.push(AuditIssue::OrphanLayout {
                block_id: entry.i.clone(),
            });
        }
        let right_edge = entry.x.saturating_add(entry.w);
        if entry.x < 0 || entry.x >= GRID_COLUMNS || right_edge > GRID_COLUMNS {
            issues.push(AuditIssue::OutOfGrid {
                block_id: entry.i.clone(),
                x: entry.x,
                w: entry.w,
            });
        }
    }

    AuditReport {
        consistent: issues.is_empty(),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::models::{Block, BlockType, Formatting, LayoutEntry};

    fn block(id: &str) -> Block {
        Block {
            id: id.to_string(),
            block_type: BlockType::Content,
            content: String::new(),
            custom_name: None,
            formatting: Formatting::default(),
        }
    }

    fn entry(id: &str, x: i32, w: i32) -> LayoutEntry {
        LayoutEntry {
            i: id.to_string(),
            x,
            y: 0,
            w,
            h: 2,
            min_w: None,
            min_h: None,
        }
    }

    fn content(blocks: Vec<Block>, layout: Vec<LayoutEntry>) -> DocumentContent {
        DocumentContent {
            blocks,
            layout,
            style: "professional".to_string(),
            structure: None,
        }
    }

    #[test]
    fn test_consistent_document_passes() {
        let report = audit(&content(
            vec![block("a"), block("b")],
            vec![entry("b", 6, 6), entry("a", 0, 6)],
        ));
        assert!(report.consistent);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_empty_document_passes() {
        assert!(audit(&content(vec![], vec![])).consistent);
    }

    #[test]
    fn test_reports_missing_and_orphan_entries() {
        let report = audit(&content(
            vec![block("a"), block("b")],
            vec![entry("a", 0, 6), entry("ghost", 0, 6)],
        ));
        assert!(!report.consistent);
        assert_eq!(
            report.issues,
            vec![
                AuditIssue::MissingLayout {
                    block_id: "b".into(),
                    label: "Content".into(),
                },
                AuditIssue::OrphanLayout {
                    block_id: "ghost".into()
                },
            ]
        );
    }

    #[test]
    fn test_reports_duplicates() {
        let report = audit(&content(
            vec![block("a"), block("a")],
            vec![entry("a", 0, 6), entry("a", 0, 6)],
        ));
        assert_eq!(
            report.issues,
            vec![
                AuditIssue::DuplicateBlockId {
                    block_id: "a".into()
                },
                AuditIssue::DuplicateLayoutEntry {
                    block_id: "a".into()
                },
            ]
        );
    }

    #[test]
    fn test_reports_out_of_grid() {
        let report = audit(&content(
            vec![block("a"), block("b")],
            vec![entry("a", 12, 1), entry("b", 8, 6)],
        ));
        assert_eq!(report.issues.len(), 2);
        assert!(report
            .issues
            .iter()
            .all(|i| matches!(i, AuditIssue::OutOfGrid { .. })));
    }

    #[test]
    fn test_extreme_coordinates_are_reported_not_panicking() {
        let report = audit(&content(
            vec![block("a"), block("b")],
            vec![entry("a", 6, i32::MAX), entry("b", i32::MAX, i32::MAX)],
        ));
        assert_eq!(
            report.issues,
            vec![
                AuditIssue::OutOfGrid {
                    block_id: "a".into(),
                    x: 6,
                    w: i32::MAX,
                },
                AuditIssue::OutOfGrid {
                    block_id: "b".into(),
                    x: i32::MAX,
                    w: i32::MAX,
                },
            ]
        );
    }

    #[test]
    fn test_missing_layout_uses_custom_label() {
        let mut named = block("a");
        named.custom_name = Some("Opening hook".into());
        let report = audit(&content(vec![named], vec![]));
        let value = serde_json::to_value(&report.issues[0]).unwrap();
        assert_eq!(value["kind"], "missing_layout");
        assert_eq!(value["label"], "Opening hook");
    }

    #[test]
    fn test_issue_serializes_with_kind_tag() {
        let value = serde_json::to_value(AuditIssue::OrphanLayout {
            block_id: "x".into(),
        })
        .unwrap();
        assert_eq!(value["kind"], "orphan_layout");
        assert_eq!(value["block_id"], "x");
    }
}
