use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::roles::Role;

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Journal {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub issn: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct JournalPermission {
    pub id: Uuid,
    pub journal_id: Uuid,
    pub code_name: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Editor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub affiliation: String,
    pub specialisation: String,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Reviewer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub affiliation: String,
    pub is_anonymous: bool,
    pub started_at: DateTime<Utc>,
}

/// A journal-board role slot. `editor_id` is empty until someone is
/// assigned; `access_login` is only populated on the chief slot.
#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct EditorialMember {
    pub id: Uuid,
    pub journal_id: Uuid,
    pub role: Role,
    pub editor_id: Option<Uuid>,
    #[serde(skip_serializing)]
    pub access_login: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct ReportQuestion {
    pub id: Uuid,
    pub journal_id: Uuid,
    pub question: String,
    pub hint: String,
    pub has_long_answer: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// One manuscript's journey through a journal. `is_accepted` doubles as
/// the decision flag: null means undecided or not accepted, a timestamp
/// means accepted at that time.
#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub author_submission_id: Uuid,
    pub journal_id: Uuid,
    pub stage: String,
    pub is_accepted: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submission-scoped role slot mirroring the journal board's non-chief
/// roles.
#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub role: Role,
    pub editor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct EditorReport {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub editor_id: Uuid,
    pub report: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct ReviewerReport {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub reviewer_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct ReportSection {
    pub id: Uuid,
    pub report_id: Uuid,
    pub question_id: Uuid,
    pub response: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}
