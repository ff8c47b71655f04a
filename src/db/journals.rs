use sqlx::PgExecutor;
use uuid::Uuid;

use super::models::{Editor, EditorialMember, Journal, JournalPermission, ReportQuestion, Reviewer};
use crate::roles::{PermissionCode, Role};

pub async fn insert_journal(
    ex: impl PgExecutor<'_>,
    name: &str,
    slug: &str,
    issn: &str,
) -> sqlx::Result<Journal> {
    sqlx::query_as::<_, Journal>(
        "INSERT INTO journals (name, slug, issn) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(name)
    .bind(slug)
    .bind(issn)
    .fetch_one(ex)
    .await
}

pub async fn find_journal(ex: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<Option<Journal>> {
    sqlx::query_as::<_, Journal>("SELECT * FROM journals WHERE id = $1")
        .bind(id)
        .fetch_optional(ex)
        .await
}

/// Row-lock the journal; chief transfers serialize on this so two
/// concurrent transfers cannot both pass the no-chief-yet check.
pub async fn lock_journal(ex: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<Option<Journal>> {
    sqlx::query_as::<_, Journal>("SELECT * FROM journals WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(ex)
        .await
}

pub async fn insert_permission(
    ex: impl PgExecutor<'_>,
    journal_id: Uuid,
    code: PermissionCode,
) -> sqlx::Result<JournalPermission> {
    sqlx::query_as::<_, JournalPermission>(
        "INSERT INTO journal_permissions (journal_id, code_name, label)
         VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(journal_id)
    .bind(code.code_name())
    .bind(code.label())
    .fetch_one(ex)
    .await
}

pub async fn journal_permissions(
    ex: impl PgExecutor<'_>,
    journal_id: Uuid,
) -> sqlx::Result<Vec<JournalPermission>> {
    sqlx::query_as::<_, JournalPermission>(
        "SELECT * FROM journal_permissions WHERE journal_id = $1 ORDER BY code_name",
    )
    .bind(journal_id)
    .fetch_all(ex)
    .await
}

pub async fn permissions_by_codes(
    ex: impl PgExecutor<'_>,
    journal_id: Uuid,
    codes: &[PermissionCode],
) -> sqlx::Result<Vec<JournalPermission>> {
    let names: Vec<String> = codes.iter().map(|c| c.code_name().to_string()).collect();
    sqlx::query_as::<_, JournalPermission>(
        "SELECT * FROM journal_permissions WHERE journal_id = $1 AND code_name = ANY($2)",
    )
    .bind(journal_id)
    .bind(&names)
    .fetch_all(ex)
    .await
}

pub async fn insert_board_slot(
    ex: impl PgExecutor<'_>,
    journal_id: Uuid,
    role: Role,
    editor_id: Option<Uuid>,
    access_login: &str,
) -> sqlx::Result<EditorialMember> {
    sqlx::query_as::<_, EditorialMember>(
        "INSERT INTO editorial_members (journal_id, role, editor_id, access_login)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(journal_id)
    .bind(role)
    .bind(editor_id)
    .bind(access_login)
    .fetch_one(ex)
    .await
}

pub async fn grant_board_permission(
    ex: impl PgExecutor<'_>,
    member_id: Uuid,
    permission_id: Uuid,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO editorial_member_permissions (member_id, permission_id)
         VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(member_id)
    .bind(permission_id)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn board_members(
    ex: impl PgExecutor<'_>,
    journal_id: Uuid,
) -> sqlx::Result<Vec<EditorialMember>> {
    sqlx::query_as::<_, EditorialMember>(
        "SELECT * FROM editorial_members WHERE journal_id = $1 ORDER BY created_at",
    )
    .bind(journal_id)
    .fetch_all(ex)
    .await
}

pub async fn board_slot(
    ex: impl PgExecutor<'_>,
    journal_id: Uuid,
    role: Role,
) -> sqlx::Result<Option<EditorialMember>> {
    sqlx::query_as::<_, EditorialMember>(
        "SELECT * FROM editorial_members WHERE journal_id = $1 AND role = $2",
    )
    .bind(journal_id)
    .bind(role)
    .fetch_optional(ex)
    .await
}

pub async fn board_member_permission_codes(
    ex: impl PgExecutor<'_>,
    member_id: Uuid,
) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        "SELECT p.code_name FROM editorial_member_permissions mp
         JOIN journal_permissions p ON p.id = mp.permission_id
         WHERE mp.member_id = $1 ORDER BY p.code_name",
    )
    .bind(member_id)
    .fetch_all(ex)
    .await
}

/// Clear the editor from whichever board slot they currently occupy.
pub async fn unbind_board_editor(
    ex: impl PgExecutor<'_>,
    journal_id: Uuid,
    editor_id: Uuid,
) -> sqlx::Result<()> {
    sqlx::query("UPDATE editorial_members SET editor_id = NULL WHERE journal_id = $1 AND editor_id = $2")
        .bind(journal_id)
        .bind(editor_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Bind an editor to the slot for `role`; returns how many slots matched.
pub async fn bind_board_role(
    ex: impl PgExecutor<'_>,
    journal_id: Uuid,
    role: Role,
    editor_id: Uuid,
) -> sqlx::Result<u64> {
    let result =
        sqlx::query("UPDATE editorial_members SET editor_id = $3 WHERE journal_id = $1 AND role = $2")
            .bind(journal_id)
            .bind(role)
            .bind(editor_id)
            .execute(ex)
            .await?;
    Ok(result.rows_affected())
}

pub async fn insert_editor(
    ex: impl PgExecutor<'_>,
    user_id: Uuid,
    email: &str,
    affiliation: &str,
    specialisation: &str,
) -> sqlx::Result<Editor> {
    sqlx::query_as::<_, Editor>(
        "INSERT INTO editors (user_id, email, affiliation, specialisation)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(user_id)
    .bind(email)
    .bind(affiliation)
    .bind(specialisation)
    .fetch_one(ex)
    .await
}

pub async fn find_editor(ex: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<Option<Editor>> {
    sqlx::query_as::<_, Editor>("SELECT * FROM editors WHERE id = $1")
        .bind(id)
        .fetch_optional(ex)
        .await
}

pub async fn find_editor_by_user(
    ex: impl PgExecutor<'_>,
    user_id: Uuid,
) -> sqlx::Result<Option<Editor>> {
    sqlx::query_as::<_, Editor>("SELECT * FROM editors WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(ex)
        .await
}

pub async fn insert_reviewer(
    ex: impl PgExecutor<'_>,
    user_id: Uuid,
    email: &str,
    affiliation: &str,
    is_anonymous: bool,
) -> sqlx::Result<Reviewer> {
    sqlx::query_as::<_, Reviewer>(
        "INSERT INTO reviewers (user_id, email, affiliation, is_anonymous)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(user_id)
    .bind(email)
    .bind(affiliation)
    .bind(is_anonymous)
    .fetch_one(ex)
    .await
}

pub async fn find_reviewer_by_user(
    ex: impl PgExecutor<'_>,
    user_id: Uuid,
) -> sqlx::Result<Option<Reviewer>> {
    sqlx::query_as::<_, Reviewer>("SELECT * FROM reviewers WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(ex)
        .await
}

pub async fn insert_report_question(
    ex: impl PgExecutor<'_>,
    journal_id: Uuid,
    question: &str,
    hint: &str,
    has_long_answer: bool,
) -> sqlx::Result<ReportQuestion> {
    sqlx::query_as::<_, ReportQuestion>(
        "INSERT INTO journal_report_questions (journal_id, question, hint, has_long_answer, position)
         SELECT $1, $2, $3, $4, COALESCE(MAX(position), 0) + 1
         FROM journal_report_questions WHERE journal_id = $1
         RETURNING *",
    )
    .bind(journal_id)
    .bind(question)
    .bind(hint)
    .bind(has_long_answer)
    .fetch_one(ex)
    .await
}

pub async fn list_report_questions(
    ex: impl PgExecutor<'_>,
    journal_id: Uuid,
) -> sqlx::Result<Vec<ReportQuestion>> {
    sqlx::query_as::<_, ReportQuestion>(
        "SELECT * FROM journal_report_questions WHERE journal_id = $1 ORDER BY position",
    )
    .bind(journal_id)
    .fetch_all(ex)
    .await
}

pub async fn questions_by_ids(
    ex: impl PgExecutor<'_>,
    journal_id: Uuid,
    ids: &[Uuid],
) -> sqlx::Result<Vec<ReportQuestion>> {
    sqlx::query_as::<_, ReportQuestion>(
        "SELECT * FROM journal_report_questions WHERE journal_id = $1 AND id = ANY($2)",
    )
    .bind(journal_id)
    .bind(ids)
    .fetch_all(ex)
    .await
}
