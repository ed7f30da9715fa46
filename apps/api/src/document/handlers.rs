use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::document::models::{BlockPatch, CoverLetterDocument, LayoutPatch, NewBlock, Placement};
use crate::document::store::{ApplyMode, Dimension, Direction, LayoutMode, StoreSnapshot};
use crate::document::validation::AuditReport;
use crate::errors::AppError;
use crate::state::AppState;
use crate::templates::{get_template, ContentStructure};

// ────────────────────────────────────────────────────────────────────────────
// Request bodies
// ────────────────────────────────────────────────────────────────────────────

/// How long a change poll waits before answering with the current revision.
const CHANGE_POLL_TIMEOUT: Duration = Duration::from_secs(25);

#[derive(Deserialize)]
pub struct ChangesQuery {
    /// Last revision the client has seen.
    #[serde(default)]
    pub after: u64,
}

#[derive(Serialize)]
pub struct ChangesResponse {
    pub revision: u64,
    pub changed: bool,
}

#[derive(Deserialize)]
pub struct SelectionRequest {
    pub block_id: Option<String>,
}

#[derive(Deserialize)]
pub struct LayoutModeRequest {
    pub mode: LayoutMode,
}

/// `placement` switches from ordered insertion to free grid placement.
#[derive(Deserialize)]
pub struct AddBlockRequest {
    pub block: NewBlock,
    #[serde(default)]
    pub position: Option<usize>,
    #[serde(default)]
    pub placement: Option<Placement>,
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub direction: Direction,
}

#[derive(Deserialize)]
pub struct ResizeRequest {
    pub dimension: Dimension,
    pub value: i32,
}

#[derive(Deserialize)]
pub struct ReorderRequest {
    pub source_index: usize,
    pub destination_index: usize,
}

#[derive(Deserialize)]
pub struct ApplyTemplateRequest {
    pub template_id: String,
    #[serde(default)]
    pub mode: ApplyMode,
}

#[derive(Deserialize, Default)]
pub struct RegenerateRequest {
    #[serde(default)]
    pub structure: Option<ContentStructure>,
}

#[derive(Deserialize)]
pub struct ResetRequest {
    pub template_id: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Document lifecycle
// ────────────────────────────────────────────────────────────────────────────

/// PUT /api/v1/cover-letters/:id
pub async fn handle_load(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(document): Json<CoverLetterDocument>,
) -> Result<Json<StoreSnapshot>, AppError> {
    if document.id != id {
        return Err(AppError::Validation(format!(
            "Body id '{}' does not match path id '{id}'",
            document.id
        )));
    }
    let snapshot = state.sessions.open(document, |s| s.snapshot()).await?;
    Ok(Json(snapshot))
}

/// GET /api/v1/cover-letters/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoreSnapshot>, AppError> {
    let snapshot = state.sessions.read(&id, |s| s.snapshot()).await?;
    Ok(Json(snapshot))
}

/// DELETE /api/v1/cover-letters/:id
pub async fn handle_close(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.sessions.close(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/cover-letters/:id/audit
pub async fn handle_audit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AuditReport>, AppError> {
    let report = state.sessions.read(&id, |s| s.audit()).await??;
    Ok(Json(report))
}

/// GET /api/v1/cover-letters/:id/changes?after=N
/// Long-polls until the store revision passes `after`, or the poll times out.
pub async fn handle_changes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ChangesQuery>,
) -> Result<Json<ChangesResponse>, AppError> {
    let mut rx = state.sessions.read(&id, |s| s.subscribe()).await?;

    let waited = tokio::time::timeout(CHANGE_POLL_TIMEOUT, async {
        rx.wait_for(|rev| *rev > query.after).await.map(|rev| *rev)
    })
    .await;
    let revision = match waited {
        Ok(Ok(rev)) => rev,
        // Session closed while waiting.
        Ok(Err(_)) => return Err(AppError::NotFound(format!("Cover letter {id} is not open"))),
        Err(_) => *rx.borrow(),
    };

    Ok(Json(ChangesResponse {
        revision,
        changed: revision > query.after,
    }))
}

/// PUT /api/v1/cover-letters/:id/selection
pub async fn handle_select(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SelectionRequest>,
) -> Result<Json<StoreSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .write(&id, |s| {
            s.set_selected_block(req.block_id);
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// PUT /api/v1/cover-letters/:id/mode
pub async fn handle_set_mode(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<LayoutModeRequest>,
) -> Result<Json<StoreSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .write(&id, |s| {
            s.set_layout_mode(req.mode);
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

// ────────────────────────────────────────────────────────────────────────────
// Blocks
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cover-letters/:id/blocks
pub async fn handle_add_block(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddBlockRequest>,
) -> Result<(StatusCode, Json<StoreSnapshot>), AppError> {
    let snapshot = state
        .sessions
        .write(&id, |s| {
            match req.placement {
                Some(placement) => s.add_block_at_position(req.block, placement)?,
                None => s.add_block(req.block, req.position)?,
            };
            Ok(s.snapshot())
        })
        .await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// PATCH /api/v1/cover-letters/:id/blocks/:block_id
pub async fn handle_update_block(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(String, String)>,
    Json(patch): Json<BlockPatch>,
) -> Result<Json<StoreSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .write(&id, |s| {
            s.update_block(&block_id, patch)?;
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// DELETE /api/v1/cover-letters/:id/blocks/:block_id
pub async fn handle_remove_block(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(String, String)>,
) -> Result<Json<StoreSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .write(&id, |s| {
            s.remove_block(&block_id)?;
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// PATCH /api/v1/cover-letters/:id/blocks/:block_id/layout
pub async fn handle_update_layout(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(String, String)>,
    Json(patch): Json<LayoutPatch>,
) -> Result<Json<StoreSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .write(&id, |s| {
            s.update_block_layout(&block_id, patch)?;
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/cover-letters/:id/blocks/:block_id/duplicate
pub async fn handle_duplicate_block(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<StoreSnapshot>), AppError> {
    let snapshot = state
        .sessions
        .write(&id, |s| {
            s.duplicate_block(&block_id)?;
            Ok(s.snapshot())
        })
        .await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// POST /api/v1/cover-letters/:id/blocks/:block_id/move
pub async fn handle_move_block(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(String, String)>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<StoreSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .write(&id, |s| {
            s.move_block(&block_id, req.direction)?;
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/cover-letters/:id/blocks/:block_id/resize
pub async fn handle_resize_block(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(String, String)>,
    Json(req): Json<ResizeRequest>,
) -> Result<Json<StoreSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .write(&id, |s| {
            s.resize_block(&block_id, req.dimension, req.value)?;
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/cover-letters/:id/reorder
pub async fn handle_reorder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<StoreSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .write(&id, |s| {
            s.reorder_blocks(req.source_index, req.destination_index)?;
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

// ────────────────────────────────────────────────────────────────────────────
// Templates and layout
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cover-letters/:id/template
pub async fn handle_apply_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ApplyTemplateRequest>,
) -> Result<Json<StoreSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .write(&id, |s| {
            s.apply_template_by_id(&req.template_id, req.mode)?;
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// PUT /api/v1/cover-letters/:id/structure
pub async fn handle_update_structure(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(structure): Json<ContentStructure>,
) -> Result<Json<StoreSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .write(&id, |s| {
            s.update_content_structure(structure)?;
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/cover-letters/:id/layout/regenerate
pub async fn handle_regenerate_layout(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RegenerateRequest>,
) -> Result<Json<StoreSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .write(&id, |s| {
            s.regenerate_layout(req.structure)?;
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/cover-letters/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ResetRequest>,
) -> Result<Json<StoreSnapshot>, AppError> {
    let template = get_template(&req.template_id);
    let snapshot = state
        .sessions
        .write(&id, |s| {
            s.reset_to_template(template)?;
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}
