//! Submission lifecycle: creation with team provisioning, the
//! handling-permission handoff protocol, editor assignment, decisions,
//! and editor reports.

use chrono::Utc;
use sqlx::PgPool;
use tera::Context;
use uuid::Uuid;

use crate::db::{self, Editor, EditorReport, Submission, TeamMember};
use crate::error::{Error, Result};
use crate::mail::OutboundEmail;
use crate::roles::{PermissionCode, Role};
use crate::state::AppState;
use crate::templates;

pub const INITIAL_STAGE: &str = "initial submission";

/// Create a journal submission for an accepted author submission and
/// provision its editorial team in the same transaction: one member per
/// non-chief role, editor copied from the journal board's current holder,
/// granted only `view_submissions`. Handling permissions start nowhere.
pub async fn create_submission(
    pool: &PgPool,
    author_submission_id: Uuid,
    journal_id: Uuid,
) -> Result<Submission> {
    let mut tx = pool.begin().await?;

    db::find_journal(&mut *tx, journal_id)
        .await?
        .ok_or(Error::NotFound { entity: "journal" })?;

    let submission =
        db::insert_submission(&mut *tx, author_submission_id, journal_id, INITIAL_STAGE).await?;

    let view =
        db::permissions_by_codes(&mut *tx, journal_id, &[PermissionCode::ViewSubmissions]).await?;
    let view = view.first().ok_or_else(|| {
        Error::InvalidState("journal permissions are not provisioned".to_string())
    })?;

    for role in Role::NON_CHIEF {
        let editor_id = db::board_slot(&mut *tx, journal_id, role)
            .await?
            .and_then(|slot| slot.editor_id);
        let member = db::insert_team_member(&mut *tx, submission.id, role, editor_id).await?;
        db::grant_team_permission(&mut *tx, member.id, view.id).await?;
    }

    tx.commit().await?;

    tracing::info!("Created submission {} for journal {}", submission.id, journal_id);
    Ok(submission)
}

/// Record the chief's accept/reject decision. Accepting stamps the current
/// time; rejecting clears it back to null. Repeating a decision is a
/// no-op transition, and deciding does not lock the submission against
/// further handoffs.
pub async fn decide(pool: &PgPool, submission_id: Uuid, accepted: bool) -> Result<Submission> {
    db::find_submission(pool, submission_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "submission",
        })?;

    let is_accepted = if accepted { Some(Utc::now()) } else { None };
    Ok(db::set_decision(pool, submission_id, is_accepted).await?)
}

/// Bulk-bind editors to submission team slots by role. This only changes
/// who sits in each slot; it never moves handling permissions.
pub async fn assign_handling_editors(
    pool: &PgPool,
    submission_id: Uuid,
    assignments: &[(Uuid, Role)],
) -> Result<Vec<TeamMember>> {
    let mut tx = pool.begin().await?;

    db::lock_submission(&mut *tx, submission_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "submission",
        })?;

    for (editor_id, role) in assignments {
        if *role == Role::Chief {
            return Err(Error::InvalidState(
                "a submission team has no chief slot".to_string(),
            ));
        }
        db::find_editor(&mut *tx, *editor_id)
            .await?
            .ok_or(Error::NotFound { entity: "editor" })?;
        let bound = db::bind_team_role(&mut *tx, submission_id, *role, *editor_id).await?;
        if bound == 0 {
            return Err(Error::NotFound {
                entity: "team role slot",
            });
        }
    }

    tx.commit().await?;
    Ok(db::team_members(pool, submission_id).await?)
}

/// The handoff protocol: move `give_reports` + `edit_submissions` from the
/// current holder to the target team member, update the stage label, and
/// notify the incoming editor.
///
/// Grant, revoke, and stage update run in one transaction with the
/// submission row locked, so no reader ever sees zero or two holders and
/// concurrent transfers cannot race past each other. The acting editor
/// must be the current holder; when nobody holds the pair yet, the
/// journal's chief may seed the chain.
pub async fn transfer_handling(
    state: &AppState,
    submission_id: Uuid,
    target_member_id: Uuid,
    acting: &Editor,
) -> Result<Submission> {
    let mut tx = state.pool.begin().await?;

    let submission = db::lock_submission(&mut *tx, submission_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "submission",
        })?;

    let current = db::current_handler(&mut *tx, submission_id).await?;
    match &current {
        Some(holder) if holder.editor_id == Some(acting.id) => {}
        Some(_) => {
            return Err(Error::PermissionDenied(
                "you do not have permission to handle this submission",
            ));
        }
        None => {
            let chief = db::board_slot(&mut *tx, submission.journal_id, Role::Chief).await?;
            if chief.and_then(|slot| slot.editor_id) != Some(acting.id) {
                return Err(Error::PermissionDenied(
                    "only the editor-in-chief may start the handling chain",
                ));
            }
        }
    }

    let target = db::lock_team_member(&mut *tx, submission_id, target_member_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "editorial team member",
        })?;

    db::grant_team_permissions_by_code(
        &mut *tx,
        target.id,
        submission.journal_id,
        &PermissionCode::HANDLING,
    )
    .await?;

    if let Some(holder) = &current {
        if holder.id != target.id {
            db::revoke_team_permissions_by_code(
                &mut *tx,
                holder.id,
                submission.journal_id,
                &PermissionCode::HANDLING,
            )
            .await?;
        }
    }

    let stage = format!("with {}", target.role.display_name());
    db::set_stage(&mut *tx, submission_id, &stage).await?;

    tx.commit().await?;

    tracing::info!(
        "Submission {} handed off to {} slot",
        submission_id,
        target.role.display_name()
    );

    notify_incoming_editor(state, &target).await;

    db::find_submission(&*state.pool, submission_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "submission",
        })
}

/// Post-commit notification. Failures here are logged and never undo the
/// committed transfer.
async fn notify_incoming_editor(state: &AppState, target: &TeamMember) {
    let Some(editor_id) = target.editor_id else {
        tracing::warn!(
            "Team member {} has no editor bound; skipping handoff notification",
            target.id
        );
        return;
    };

    let editor = match db::find_editor(&*state.pool, editor_id).await {
        Ok(Some(editor)) => editor,
        Ok(None) => {
            tracing::warn!("Editor {} missing; skipping handoff notification", editor_id);
            return;
        }
        Err(e) => {
            tracing::error!("Editor lookup for notification failed: {}", e);
            return;
        }
    };

    let mut ctx = Context::new();
    ctx.insert("role_name", target.role.display_name());
    let html_body = match templates::get_tera().render("handoff_notification.html", &ctx) {
        Ok(html) => html,
        Err(e) => {
            tracing::error!("Notification template failed: {}", e);
            return;
        }
    };

    state.mailer.send(OutboundEmail {
        from: format!("review@{}", state.config.mail_from_domain),
        to: vec![editor.email],
        subject: "Dispatched journal submission".to_string(),
        text_body: "A manuscript was transferred to you for processing.".to_string(),
        html_body,
    });
}

/// File a free-text editor report against the submission. Exact duplicate
/// resubmissions are rejected by the unique constraint.
pub async fn create_editor_report(
    pool: &PgPool,
    submission_id: Uuid,
    editor: &Editor,
    report: &str,
) -> Result<EditorReport> {
    db::find_submission(pool, submission_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "submission",
        })?;

    Ok(db::insert_editor_report(pool, submission_id, editor.id, report).await?)
}
