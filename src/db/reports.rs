use sqlx::PgExecutor;
use uuid::Uuid;

use super::models::{EditorReport, ReportSection, ReviewerReport};

pub async fn insert_editor_report(
    ex: impl PgExecutor<'_>,
    submission_id: Uuid,
    editor_id: Uuid,
    report: &str,
) -> sqlx::Result<EditorReport> {
    sqlx::query_as::<_, EditorReport>(
        "INSERT INTO editor_reports (submission_id, editor_id, report)
         VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(submission_id)
    .bind(editor_id)
    .bind(report)
    .fetch_one(ex)
    .await
}

pub async fn insert_reviewer_report(
    ex: impl PgExecutor<'_>,
    submission_id: Uuid,
    reviewer_id: Uuid,
) -> sqlx::Result<ReviewerReport> {
    sqlx::query_as::<_, ReviewerReport>(
        "INSERT INTO reviewer_reports (submission_id, reviewer_id)
         VALUES ($1, $2) RETURNING *",
    )
    .bind(submission_id)
    .bind(reviewer_id)
    .fetch_one(ex)
    .await
}

pub async fn find_reviewer_report(
    ex: impl PgExecutor<'_>,
    submission_id: Uuid,
    reviewer_id: Uuid,
) -> sqlx::Result<Option<ReviewerReport>> {
    sqlx::query_as::<_, ReviewerReport>(
        "SELECT * FROM reviewer_reports WHERE submission_id = $1 AND reviewer_id = $2",
    )
    .bind(submission_id)
    .bind(reviewer_id)
    .fetch_optional(ex)
    .await
}

pub async fn insert_report_section(
    ex: impl PgExecutor<'_>,
    report_id: Uuid,
    question_id: Uuid,
    response: &str,
    position: i32,
) -> sqlx::Result<ReportSection> {
    sqlx::query_as::<_, ReportSection>(
        "INSERT INTO reviewer_report_sections (report_id, question_id, response, position)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(report_id)
    .bind(question_id)
    .bind(response)
    .bind(position)
    .fetch_one(ex)
    .await
}

/// Sections in the order they were submitted.
pub async fn report_sections(
    ex: impl PgExecutor<'_>,
    report_id: Uuid,
) -> sqlx::Result<Vec<ReportSection>> {
    sqlx::query_as::<_, ReportSection>(
        "SELECT * FROM reviewer_report_sections WHERE report_id = $1 ORDER BY position",
    )
    .bind(report_id)
    .fetch_all(ex)
    .await
}
