use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{self, AuthUser};
use crate::board;
use crate::db;
use crate::error::{Error, Result};
use crate::roles::Role;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateJournalInput {
    pub name: String,
    #[serde(default)]
    pub issn: String,
}

/// POST /journals — staff only; provisions permissions and role slots.
pub async fn create_journal(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateJournalInput>,
) -> Result<impl IntoResponse> {
    auth::require_staff(&user)?;
    let journal = board::create_and_provision(&state.pool, &input.name, &input.issn).await?;
    Ok((StatusCode::CREATED, Json(journal)))
}

#[derive(Deserialize)]
pub struct TransferChiefInput {
    pub editor_id: Uuid,
}

/// POST /journals/{id}/chief — staff only; fills the chief slot once.
pub async fn transfer_chief(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(journal_id): Path<Uuid>,
    Json(input): Json<TransferChiefInput>,
) -> Result<impl IntoResponse> {
    auth::require_staff(&user)?;
    let member = board::transfer_chief(&state.pool, journal_id, input.editor_id).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

#[derive(Deserialize)]
pub struct AssignRoleInput {
    pub editor_id: Uuid,
    pub role: Role,
}

/// POST /journals/{id}/roles — chief only; chief itself is transfer-only.
pub async fn assign_role(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(journal_id): Path<Uuid>,
    Json(input): Json<AssignRoleInput>,
) -> Result<impl IntoResponse> {
    let actor = auth::require_editor(&state.pool, &user).await?;
    auth::require_chief(&state.pool, journal_id, actor.id).await?;

    board::assign_role(&state.pool, journal_id, input.editor_id, input.role).await?;
    Ok(Json(serde_json::json!({ "message": "success" })))
}

#[derive(Serialize)]
pub struct BoardSlotView {
    pub id: Uuid,
    pub role: Role,
    pub editor_id: Option<Uuid>,
    pub permissions: Vec<String>,
}

/// GET /journals/{id}/board
pub async fn get_board(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(journal_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    db::find_journal(&*state.pool, journal_id)
        .await?
        .ok_or(Error::NotFound { entity: "journal" })?;

    let mut views = Vec::new();
    for member in db::board_members(&*state.pool, journal_id).await? {
        let permissions = db::board_member_permission_codes(&*state.pool, member.id).await?;
        views.push(BoardSlotView {
            id: member.id,
            role: member.role,
            editor_id: member.editor_id,
            permissions,
        });
    }
    Ok(Json(views))
}

/// GET /journals/{id}/board/{role}
pub async fn get_board_member(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path((journal_id, role)): Path<(Uuid, Role)>,
) -> Result<impl IntoResponse> {
    let editor = board::board_member(&state.pool, journal_id, role)
        .await?
        .ok_or(Error::NotFound { entity: "editor" })?;
    Ok(Json(editor))
}

#[derive(Deserialize)]
pub struct CreateQuestionInput {
    pub question: String,
    #[serde(default)]
    pub hint: String,
    #[serde(default)]
    pub has_long_answer: bool,
}

/// POST /journals/{id}/questions — chief only.
pub async fn create_report_question(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(journal_id): Path<Uuid>,
    Json(input): Json<CreateQuestionInput>,
) -> Result<impl IntoResponse> {
    let actor = auth::require_editor(&state.pool, &user).await?;
    auth::require_chief(&state.pool, journal_id, actor.id).await?;

    let question = db::insert_report_question(
        &*state.pool,
        journal_id,
        &input.question,
        &input.hint,
        input.has_long_answer,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// GET /journals/{id}/questions — the journal's ordered questionnaire.
pub async fn list_report_questions(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(journal_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let questions = db::list_report_questions(&*state.pool, journal_id).await?;
    Ok(Json(questions))
}

#[derive(Deserialize)]
pub struct RegisterEditorInput {
    pub email: String,
    #[serde(default)]
    pub affiliation: String,
    #[serde(default)]
    pub specialisation: String,
}

/// POST /editors — create the caller's editor profile.
pub async fn register_editor(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<RegisterEditorInput>,
) -> Result<impl IntoResponse> {
    if !user.has_group(auth::EDITORS_GROUP) {
        return Err(Error::PermissionDenied("an editor account is required"));
    }
    let editor = db::insert_editor(
        &*state.pool,
        user.user_id,
        &input.email,
        &input.affiliation,
        &input.specialisation,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(editor)))
}

#[derive(Deserialize)]
pub struct RegisterReviewerInput {
    pub email: String,
    #[serde(default)]
    pub affiliation: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

/// POST /reviewers — create the caller's reviewer profile.
pub async fn register_reviewer(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<RegisterReviewerInput>,
) -> Result<impl IntoResponse> {
    if !user.has_group(auth::REVIEWERS_GROUP) {
        return Err(Error::PermissionDenied("a reviewer account is required"));
    }
    let reviewer = db::insert_reviewer(
        &*state.pool,
        user.user_id,
        &input.email,
        &input.affiliation,
        input.is_anonymous,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(reviewer)))
}
