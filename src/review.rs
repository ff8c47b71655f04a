//! Reviewer sub-flow: invitation by email, invitation acceptance, and
//! structured report submission. Independent of the editor handoff chain,
//! but scoped to the same submission.

use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;
use tera::Context;
use uuid::Uuid;

use crate::db::{self, ReportSection, Reviewer, ReviewerReport, Submission};
use crate::error::{Error, Result};
use crate::mail::OutboundEmail;
use crate::state::AppState;
use crate::templates;
use crate::tokens;

#[derive(Debug, Deserialize)]
pub struct ReportSectionInput {
    pub question_id: Uuid,
    pub response: String,
}

/// Invite reviewers by email address. Signs one invitation token scoped to
/// {journal, submission}, renders the invitation (with the manuscript
/// abstract when the content service yields one), and hands delivery to
/// the mail relay. Mutates nothing.
pub async fn invite_reviewers(
    state: &AppState,
    submission_id: Uuid,
    addresses: Vec<String>,
) -> Result<()> {
    let submission = db::find_submission(&*state.pool, submission_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "submission",
        })?;
    let journal = db::find_journal(&*state.pool, submission.journal_id)
        .await?
        .ok_or(Error::NotFound { entity: "journal" })?;

    let token = tokens::sign_invitation(
        journal.id,
        submission.id,
        &state.config.app_secret,
        state.config.invitation_ttl_hours,
    )?;
    let invite_url = format!("/peer-review/invite?token={token}");

    let mut ctx = Context::new();
    ctx.insert("journal_name", &journal.name);
    ctx.insert("invite_url", &invite_url);
    if let Some(text) = fetch_abstract(state, submission.author_submission_id).await {
        ctx.insert("abstract", &text);
    }
    let html_body = templates::get_tera().render("reviewer_invitation.html", &ctx)?;

    state.mailer.send(OutboundEmail {
        from: format!("{}@{}", journal.slug, state.config.mail_from_domain),
        to: addresses,
        subject: format!("Invitation to be a reviewer for the {} journal", journal.name),
        text_body: "We are inviting you to review a manuscript.".to_string(),
        html_body,
    });

    Ok(())
}

/// The manuscript body lives with the external content service; a missing
/// or failing lookup just drops the abstract from the invitation.
async fn fetch_abstract(state: &AppState, author_submission_id: Uuid) -> Option<String> {
    let base = state.config.content_service_url.as_ref()?;
    let url = format!("{base}/manuscripts/{author_submission_id}/abstract");

    match reqwest::get(&url).await {
        Ok(resp) if resp.status().is_success() => resp.text().await.ok(),
        Ok(resp) => {
            tracing::warn!("Content service returned {} for {}", resp.status(), url);
            None
        }
        Err(e) => {
            tracing::warn!("Content service unreachable: {}", e);
            None
        }
    }
}

/// Redeem an invitation token: verify it, resolve the submission inside
/// the token's journal scope, and add the reviewer to the submission's
/// reviewer set. Accepting twice is a no-op.
pub async fn accept_invitation(
    pool: &PgPool,
    token: &str,
    secret: &str,
    reviewer: &Reviewer,
) -> Result<Submission> {
    let claims = tokens::verify_invitation(token, secret)?;

    let submission = db::find_submission(pool, claims.submission_id)
        .await?
        .filter(|s| s.journal_id == claims.journal_id)
        .ok_or(Error::NotFound {
            entity: "submission",
        })?;

    db::add_reviewer(pool, submission.id, reviewer.id).await?;
    Ok(submission)
}

/// Submit the reviewer's structured report: one section per journal
/// report question, in the order given. The caller must already be on the
/// submission's reviewer set, and may only report once.
pub async fn submit_report(
    pool: &PgPool,
    submission_id: Uuid,
    reviewer: &Reviewer,
    sections: &[ReportSectionInput],
) -> Result<(ReviewerReport, Vec<ReportSection>)> {
    let submission = db::find_submission(pool, submission_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "submission",
        })?;

    if db::find_reviewer_report(pool, submission_id, reviewer.id)
        .await?
        .is_some()
    {
        return Err(Error::InvalidState(
            "a report already exists for this submission".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let report = db::insert_reviewer_report(&mut *tx, submission_id, reviewer.id).await?;

    let ids: Vec<Uuid> = sections.iter().map(|s| s.question_id).collect();
    let questions = db::questions_by_ids(&mut *tx, submission.journal_id, &ids).await?;
    // Every input must resolve to a distinct journal question; a mismatch
    // is a caller error, never silently truncated.
    if questions.len() != sections.len() {
        return Err(Error::InvalidState(
            "report sections do not match the journal's report questions".to_string(),
        ));
    }
    let by_id: HashMap<Uuid, _> = questions.iter().map(|q| (q.id, q)).collect();

    for (position, section) in sections.iter().enumerate() {
        let question = by_id.get(&section.question_id).ok_or_else(|| {
            Error::InvalidState(
                "report sections do not match the journal's report questions".to_string(),
            )
        })?;
        db::insert_report_section(
            &mut *tx,
            report.id,
            question.id,
            &section.response,
            position as i32,
        )
        .await?;
    }

    tx.commit().await?;

    let stored = db::report_sections(pool, report.id).await?;
    Ok((report, stored))
}
