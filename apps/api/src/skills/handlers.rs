//! Axum route handlers for the skill board API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::skills::identity::{identity, SkillIdentity};
use crate::skills::models::{
    CustomSkill, NewCustomSkill, ProfileContext, RecommendedSkill, SkillPatch,
};
use crate::skills::pool::{BoardView, GenerateOutcome, MergeIntent, SkillBoard, SkillHandoff};
use crate::skills::session::SessionToken;
use crate::skills::store::MirrorView;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    #[serde(default)]
    pub profile: ProfileContext,
    #[serde(default)]
    pub custom_skills: Vec<NewCustomSkill>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub intent: MergeIntent,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub outcome: GenerateOutcome,
    pub board: BoardView,
}

/// A recommended skill addressed by name and category.
#[derive(Debug, Deserialize)]
pub struct SkillRef {
    pub name: String,
    #[serde(default)]
    pub category: String,
}

impl SkillRef {
    fn identity(&self) -> SkillIdentity {
        identity(&self.name, &self.category)
    }
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    /// New value of the flag, `null` when no candidate matched.
    pub selected: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    #[serde(flatten)]
    pub target: SkillRef,
    pub patch: SkillPatch,
}

#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub removed: usize,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub session_token: SessionToken,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/boards
///
/// Opens a board for one wizard instance with the user's profile and any
/// custom skills saved by an earlier visit.
pub async fn handle_create_board(
    State(state): State<AppState>,
    Json(request): Json<CreateBoardRequest>,
) -> Result<(StatusCode, Json<BoardView>), AppError> {
    let board = SkillBoard::open(
        request.profile,
        request.custom_skills,
        state.generator.clone(),
        state.store.clone(),
        state.config.recommendation_count,
    )
    .await?;
    let board = state.boards.insert(board).await;
    Ok((StatusCode::CREATED, Json(board.view().await)))
}

/// GET /api/v1/boards/:id
pub async fn handle_get_board(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<BoardView>, AppError> {
    let board = state.boards.get(board_id).await?;
    Ok(Json(board.view().await))
}

/// DELETE /api/v1/boards/:id
pub async fn handle_delete_board(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.boards.remove(board_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/boards/:id/generate
///
/// Service failures do not surface as errors: the response carries the
/// fallback source and an advisory message instead.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateResponse>, AppError> {
    let board = state.boards.get(board_id).await?;
    let outcome = board.generate(body.intent).await?;
    Ok(Json(GenerateResponse {
        outcome,
        board: board.view().await,
    }))
}

/// POST /api/v1/boards/:id/recommended/toggle
pub async fn handle_toggle(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Json(target): Json<SkillRef>,
) -> Result<Json<ToggleResponse>, AppError> {
    let board = state.boards.get(board_id).await?;
    let selected = board.toggle_selection(&target.identity()).await?;
    Ok(Json(ToggleResponse { selected }))
}

/// PATCH /api/v1/boards/:id/recommended
///
/// An empty patch refreshes a missing description.
pub async fn handle_edit(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Json(request): Json<EditRequest>,
) -> Result<Json<RecommendedSkill>, AppError> {
    let board = state.boards.get(board_id).await?;
    let edited = board
        .edit_candidate(&request.target.identity(), request.patch)
        .await?;
    Ok(Json(edited))
}

/// DELETE /api/v1/boards/:id/recommended/selected
pub async fn handle_remove_selected(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<RemovedResponse>, AppError> {
    let board = state.boards.get(board_id).await?;
    let removed = board.remove_selected_recommended().await?;
    Ok(Json(RemovedResponse { removed }))
}

/// DELETE /api/v1/boards/:id/recommended
///
/// Clears recommendations and history and starts a new session.
pub async fn handle_clear_recommended(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<ResetResponse>, AppError> {
    let board = state.boards.get(board_id).await?;
    let session_token = board.clear_all_recommended().await?;
    Ok(Json(ResetResponse { session_token }))
}

/// POST /api/v1/boards/:id/custom
pub async fn handle_add_custom(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Json(skill): Json<NewCustomSkill>,
) -> Result<(StatusCode, Json<CustomSkill>), AppError> {
    let board = state.boards.get(board_id).await?;
    let added = board.add_custom(skill).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

/// DELETE /api/v1/boards/:id/custom/:skill_id
pub async fn handle_remove_custom(
    State(state): State<AppState>,
    Path((board_id, skill_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CustomSkill>, AppError> {
    let board = state.boards.get(board_id).await?;
    Ok(Json(board.remove_custom(skill_id).await?))
}

/// GET /api/v1/boards/:id/selection
///
/// Payload for the next wizard step.
pub async fn handle_selection(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<SkillHandoff>, AppError> {
    let board = state.boards.get(board_id).await?;
    Ok(Json(board.handoff().await))
}

/// GET /api/v1/boards/:id/mirror
///
/// What the persistence mirror currently holds for this board.
pub async fn handle_mirror(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<MirrorView>, AppError> {
    let board = state.boards.get(board_id).await?;
    Ok(Json(board.mirror_view().await?))
}
