use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

use super::models::{Submission, TeamMember};
use crate::roles::{PermissionCode, Role};

pub async fn insert_submission(
    ex: impl PgExecutor<'_>,
    author_submission_id: Uuid,
    journal_id: Uuid,
    stage: &str,
) -> sqlx::Result<Submission> {
    sqlx::query_as::<_, Submission>(
        "INSERT INTO journal_submissions (author_submission_id, journal_id, stage)
         VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(author_submission_id)
    .bind(journal_id)
    .bind(stage)
    .fetch_one(ex)
    .await
}

pub async fn find_submission(
    ex: impl PgExecutor<'_>,
    id: Uuid,
) -> sqlx::Result<Option<Submission>> {
    sqlx::query_as::<_, Submission>("SELECT * FROM journal_submissions WHERE id = $1")
        .bind(id)
        .fetch_optional(ex)
        .await
}

/// Row-lock the submission for the duration of the enclosing transaction.
/// Handoffs serialize on this lock, which makes the single-holder check
/// safe against concurrent transfers.
pub async fn lock_submission(
    ex: impl PgExecutor<'_>,
    id: Uuid,
) -> sqlx::Result<Option<Submission>> {
    sqlx::query_as::<_, Submission>("SELECT * FROM journal_submissions WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(ex)
        .await
}

pub async fn insert_team_member(
    ex: impl PgExecutor<'_>,
    submission_id: Uuid,
    role: Role,
    editor_id: Option<Uuid>,
) -> sqlx::Result<TeamMember> {
    sqlx::query_as::<_, TeamMember>(
        "INSERT INTO submission_team_members (submission_id, role, editor_id)
         VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(submission_id)
    .bind(role)
    .bind(editor_id)
    .fetch_one(ex)
    .await
}

pub async fn team_members(
    ex: impl PgExecutor<'_>,
    submission_id: Uuid,
) -> sqlx::Result<Vec<TeamMember>> {
    sqlx::query_as::<_, TeamMember>(
        "SELECT * FROM submission_team_members WHERE submission_id = $1 ORDER BY created_at",
    )
    .bind(submission_id)
    .fetch_all(ex)
    .await
}

/// Fetch one team member by id, scoped to the submission, locked.
pub async fn lock_team_member(
    ex: impl PgExecutor<'_>,
    submission_id: Uuid,
    member_id: Uuid,
) -> sqlx::Result<Option<TeamMember>> {
    sqlx::query_as::<_, TeamMember>(
        "SELECT * FROM submission_team_members WHERE id = $1 AND submission_id = $2 FOR UPDATE",
    )
    .bind(member_id)
    .bind(submission_id)
    .fetch_optional(ex)
    .await
}

/// The current handler: the team member holding BOTH handling permissions.
/// The single-holder invariant means this returns at most one row.
pub async fn current_handler(
    ex: impl PgExecutor<'_>,
    submission_id: Uuid,
) -> sqlx::Result<Option<TeamMember>> {
    sqlx::query_as::<_, TeamMember>(
        "SELECT tm.* FROM submission_team_members tm
         WHERE tm.submission_id = $1
           AND (SELECT COUNT(*) FROM team_member_permissions tp
                JOIN journal_permissions p ON p.id = tp.permission_id
                WHERE tp.team_member_id = tm.id
                  AND p.code_name IN ('give_reports', 'edit_submissions')) = 2
         FOR UPDATE OF tm",
    )
    .bind(submission_id)
    .fetch_optional(ex)
    .await
}

/// True when the editor's team slot on this submission holds both handling
/// permissions. A capability-set test, not a role test.
pub async fn editor_has_handling(
    ex: impl PgExecutor<'_>,
    submission_id: Uuid,
    editor_id: Uuid,
) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM submission_team_members tm
         JOIN team_member_permissions tp ON tp.team_member_id = tm.id
         JOIN journal_permissions p ON p.id = tp.permission_id
         WHERE tm.submission_id = $1 AND tm.editor_id = $2
           AND p.code_name IN ('give_reports', 'edit_submissions')",
    )
    .bind(submission_id)
    .bind(editor_id)
    .fetch_one(ex)
    .await?;
    Ok(count == 2)
}

pub async fn grant_team_permission(
    ex: impl PgExecutor<'_>,
    member_id: Uuid,
    permission_id: Uuid,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO team_member_permissions (team_member_id, permission_id)
         VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(member_id)
    .bind(permission_id)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn grant_team_permissions_by_code(
    ex: impl PgExecutor<'_>,
    member_id: Uuid,
    journal_id: Uuid,
    codes: &[PermissionCode],
) -> sqlx::Result<()> {
    let names: Vec<String> = codes.iter().map(|c| c.code_name().to_string()).collect();
    sqlx::query(
        "INSERT INTO team_member_permissions (team_member_id, permission_id)
         SELECT $1, id FROM journal_permissions
         WHERE journal_id = $2 AND code_name = ANY($3)
         ON CONFLICT DO NOTHING",
    )
    .bind(member_id)
    .bind(journal_id)
    .bind(&names)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn revoke_team_permissions_by_code(
    ex: impl PgExecutor<'_>,
    member_id: Uuid,
    journal_id: Uuid,
    codes: &[PermissionCode],
) -> sqlx::Result<()> {
    let names: Vec<String> = codes.iter().map(|c| c.code_name().to_string()).collect();
    sqlx::query(
        "DELETE FROM team_member_permissions
         WHERE team_member_id = $1
           AND permission_id IN (SELECT id FROM journal_permissions
                                 WHERE journal_id = $2 AND code_name = ANY($3))",
    )
    .bind(member_id)
    .bind(journal_id)
    .bind(&names)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn team_member_permission_codes(
    ex: impl PgExecutor<'_>,
    member_id: Uuid,
) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        "SELECT p.code_name FROM team_member_permissions tp
         JOIN journal_permissions p ON p.id = tp.permission_id
         WHERE tp.team_member_id = $1 ORDER BY p.code_name",
    )
    .bind(member_id)
    .fetch_all(ex)
    .await
}

pub async fn set_stage(ex: impl PgExecutor<'_>, submission_id: Uuid, stage: &str) -> sqlx::Result<()> {
    sqlx::query("UPDATE journal_submissions SET stage = $2, updated_at = now() WHERE id = $1")
        .bind(submission_id)
        .bind(stage)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn set_decision(
    ex: impl PgExecutor<'_>,
    submission_id: Uuid,
    is_accepted: Option<DateTime<Utc>>,
) -> sqlx::Result<Submission> {
    sqlx::query_as::<_, Submission>(
        "UPDATE journal_submissions SET is_accepted = $2, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(submission_id)
    .bind(is_accepted)
    .fetch_one(ex)
    .await
}

/// Bind an editor to the team slot for `role`; returns how many slots
/// matched (zero when the team has no such role).
pub async fn bind_team_role(
    ex: impl PgExecutor<'_>,
    submission_id: Uuid,
    role: Role,
    editor_id: Uuid,
) -> sqlx::Result<u64> {
    let result = sqlx::query(
        "UPDATE submission_team_members SET editor_id = $3 WHERE submission_id = $1 AND role = $2",
    )
    .bind(submission_id)
    .bind(role)
    .bind(editor_id)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

/// Idempotent: adding an already-assigned reviewer is a no-op.
pub async fn add_reviewer(
    ex: impl PgExecutor<'_>,
    submission_id: Uuid,
    reviewer_id: Uuid,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO submission_reviewers (submission_id, reviewer_id)
         VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(submission_id)
    .bind(reviewer_id)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn is_assigned_reviewer(
    ex: impl PgExecutor<'_>,
    submission_id: Uuid,
    reviewer_id: Uuid,
) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM submission_reviewers WHERE submission_id = $1 AND reviewer_id = $2",
    )
    .bind(submission_id)
    .bind(reviewer_id)
    .fetch_one(ex)
    .await?;
    Ok(count > 0)
}

pub async fn reviewer_count(ex: impl PgExecutor<'_>, submission_id: Uuid) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM submission_reviewers WHERE submission_id = $1")
        .bind(submission_id)
        .fetch_one(ex)
        .await
}
