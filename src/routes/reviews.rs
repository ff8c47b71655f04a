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
use crate::review::{self, ReportSectionInput};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct InviteInput {
    pub email_addresses: Vec<String>,
}

/// POST /submissions/{id}/invitations — current handler only.
pub async fn invite_reviewers(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(submission_id): Path<Uuid>,
    Json(input): Json<InviteInput>,
) -> Result<impl IntoResponse> {
    let actor = auth::require_editor(&state.pool, &user).await?;
    auth::require_handling(&state.pool, submission_id, actor.id).await?;

    review::invite_reviewers(&state, submission_id, input.email_addresses).await?;
    Ok(Json(serde_json::json!({ "message": "success" })))
}

#[derive(Deserialize)]
pub struct AcceptInvitationInput {
    pub token: String,
}

/// POST /invitations/accept — redeem an invitation token as a reviewer.
pub async fn accept_invitation(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<AcceptInvitationInput>,
) -> Result<impl IntoResponse> {
    let reviewer = auth::require_reviewer(&state.pool, &user).await?;
    let submission = review::accept_invitation(
        &state.pool,
        &input.token,
        &state.config.app_secret,
        &reviewer,
    )
    .await?;
    Ok(Json(submission))
}

#[derive(Deserialize)]
pub struct SubmitReportInput {
    pub sections: Vec<ReportSectionInput>,
}

#[derive(Serialize)]
pub struct ReportView {
    #[serde(flatten)]
    pub report: db::ReviewerReport,
    pub sections: Vec<db::ReportSection>,
}

/// POST /submissions/{id}/reviewer-reports — assigned reviewers only,
/// one report per reviewer per submission.
pub async fn submit_report(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(submission_id): Path<Uuid>,
    Json(input): Json<SubmitReportInput>,
) -> Result<impl IntoResponse> {
    let reviewer = auth::require_reviewer(&state.pool, &user).await?;
    auth::require_assigned_reviewer(&state.pool, submission_id, reviewer.id).await?;

    let (report, sections) =
        review::submit_report(&state.pool, submission_id, &reviewer, &input.sections).await?;
    Ok((StatusCode::CREATED, Json(ReportView { report, sections })))
}

/// GET /submissions/{id}/reviewer-reports — the calling reviewer's own
/// report with its sections in submitted order.
pub async fn get_my_report(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(submission_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let reviewer = auth::require_reviewer(&state.pool, &user).await?;

    let report = db::find_reviewer_report(&*state.pool, submission_id, reviewer.id)
        .await?
        .ok_or(Error::NotFound {
            entity: "reviewer report",
        })?;
    let sections = db::report_sections(&*state.pool, report.id).await?;
    Ok(Json(ReportView { report, sections }))
}
