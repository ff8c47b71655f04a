use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{self, AuthUser};
use crate::db;
use crate::error::{Error, Result};
use crate::roles::Role;
use crate::state::AppState;
use crate::workflow;

#[derive(Deserialize)]
pub struct CreateSubmissionInput {
    pub author_submission_id: Uuid,
    pub journal_id: Uuid,
}

/// POST /submissions — promote an accepted author submission into the
/// peer-review workflow. Ownership of the author submission is vouched
/// for by the upstream submission portal.
pub async fn create_submission(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateSubmissionInput>,
) -> Result<impl IntoResponse> {
    let submission =
        workflow::create_submission(&state.pool, input.author_submission_id, input.journal_id)
            .await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

#[derive(Serialize)]
pub struct TeamMemberView {
    pub id: Uuid,
    pub role: Role,
    pub editor_id: Option<Uuid>,
    pub permissions: Vec<String>,
}

#[derive(Serialize)]
pub struct SubmissionView {
    #[serde(flatten)]
    pub submission: db::Submission,
    pub team: Vec<TeamMemberView>,
}

/// GET /submissions/{id} — the submission with its editorial team and
/// each member's current permission grants.
pub async fn get_submission(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(submission_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let submission = db::find_submission(&*state.pool, submission_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "submission",
        })?;

    let mut team = Vec::new();
    for member in db::team_members(&*state.pool, submission_id).await? {
        let permissions = db::team_member_permission_codes(&*state.pool, member.id).await?;
        team.push(TeamMemberView {
            id: member.id,
            role: member.role,
            editor_id: member.editor_id,
            permissions,
        });
    }

    Ok(Json(SubmissionView { submission, team }))
}

#[derive(Deserialize)]
pub struct EditorAssignment {
    pub editor_id: Uuid,
    pub role: Role,
}

#[derive(Deserialize)]
pub struct AssignEditorsInput {
    pub editors: Vec<EditorAssignment>,
}

/// POST /submissions/{id}/editors — chief only; bulk-bind editors to the
/// submission team's role slots.
pub async fn assign_editors(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(submission_id): Path<Uuid>,
    Json(input): Json<AssignEditorsInput>,
) -> Result<impl IntoResponse> {
    let actor = auth::require_editor(&state.pool, &user).await?;
    let submission = db::find_submission(&*state.pool, submission_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "submission",
        })?;
    auth::require_chief(&state.pool, submission.journal_id, actor.id).await?;

    let assignments: Vec<(Uuid, Role)> = input
        .editors
        .iter()
        .map(|a| (a.editor_id, a.role))
        .collect();
    let team = workflow::assign_handling_editors(&state.pool, submission_id, &assignments).await?;
    Ok(Json(team))
}

#[derive(Deserialize)]
pub struct HandoffInput {
    pub team_member_id: Uuid,
}

/// POST /submissions/{id}/handoff — move the handling permissions to the
/// target team member. The capability check runs inside the transfer
/// transaction.
pub async fn transfer_handling(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(submission_id): Path<Uuid>,
    Json(input): Json<HandoffInput>,
) -> Result<impl IntoResponse> {
    let actor = auth::require_editor(&state.pool, &user).await?;
    let submission =
        workflow::transfer_handling(&state, submission_id, input.team_member_id, &actor).await?;
    Ok(Json(submission))
}

#[derive(Deserialize)]
pub struct DecisionInput {
    pub accepted: bool,
}

/// POST /submissions/{id}/decision — chief only.
pub async fn decide(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(submission_id): Path<Uuid>,
    Json(input): Json<DecisionInput>,
) -> Result<impl IntoResponse> {
    let actor = auth::require_editor(&state.pool, &user).await?;
    let submission = db::find_submission(&*state.pool, submission_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "submission",
        })?;
    auth::require_chief(&state.pool, submission.journal_id, actor.id).await?;

    let submission = workflow::decide(&state.pool, submission_id, input.accepted).await?;
    Ok(Json(submission))
}

#[derive(Deserialize)]
pub struct EditorReportInput {
    pub report: String,
}

/// POST /submissions/{id}/editor-reports — current handler only.
pub async fn create_editor_report(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(submission_id): Path<Uuid>,
    Json(input): Json<EditorReportInput>,
) -> Result<impl IntoResponse> {
    let actor = auth::require_editor(&state.pool, &user).await?;
    auth::require_handling(&state.pool, submission_id, actor.id).await?;

    let report =
        workflow::create_editor_report(&state.pool, submission_id, &actor, &input.report).await?;
    Ok((StatusCode::CREATED, Json(report)))
}
