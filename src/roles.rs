use serde::{Deserialize, Serialize};

/// Editorial role slots. The same closed set is used by the journal-level
/// board and the per-submission editorial team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum Role {
    Chief,
    Line,
    Copy,
    Section,
}

impl Role {
    /// Every role except chief. Board and team slots are provisioned for
    /// these; the chief slot only comes into existence via a management
    /// transfer.
    pub const NON_CHIEF: [Role; 3] = [Role::Line, Role::Copy, Role::Section];

    /// Human-readable label, also used to build submission stage text.
    pub fn display_name(self) -> &'static str {
        match self {
            Role::Chief => "Editor in chief",
            Role::Line => "Line editor",
            Role::Copy => "Copy editor",
            Role::Section => "Section editor",
        }
    }
}

/// The fixed catalog of capability codes a journal can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum PermissionCode {
    ViewSubmissions,
    GiveReports,
    AssignEditors,
    AssignReviewers,
    DeleteSubmissions,
    EditSubmissions,
}

impl PermissionCode {
    pub const CATALOG: [PermissionCode; 6] = [
        PermissionCode::ViewSubmissions,
        PermissionCode::GiveReports,
        PermissionCode::AssignEditors,
        PermissionCode::AssignReviewers,
        PermissionCode::DeleteSubmissions,
        PermissionCode::EditSubmissions,
    ];

    /// The pair that marks the single active handler of a submission.
    pub const HANDLING: [PermissionCode; 2] =
        [PermissionCode::GiveReports, PermissionCode::EditSubmissions];

    pub fn code_name(self) -> &'static str {
        match self {
            PermissionCode::ViewSubmissions => "view_submissions",
            PermissionCode::GiveReports => "give_reports",
            PermissionCode::AssignEditors => "assign_editors",
            PermissionCode::AssignReviewers => "assign_reviewers",
            PermissionCode::DeleteSubmissions => "delete_submissions",
            PermissionCode::EditSubmissions => "edit_submissions",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PermissionCode::ViewSubmissions => "Can view submissions",
            PermissionCode::GiveReports => "Can give submission reports",
            PermissionCode::AssignEditors => "Can assign editors",
            PermissionCode::AssignReviewers => "Can assign reviewers",
            PermissionCode::DeleteSubmissions => "Can delete submissions",
            PermissionCode::EditSubmissions => "Can edit submissions",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_labels_match_role_display_names() {
        assert_eq!(Role::Chief.display_name(), "Editor in chief");
        assert_eq!(Role::Section.display_name(), "Section editor");
        assert_eq!(format!("with {}", Role::Line.display_name()), "with Line editor");
    }

    #[test]
    fn non_chief_roles_exclude_chief() {
        assert_eq!(Role::NON_CHIEF.len(), 3);
        assert!(!Role::NON_CHIEF.contains(&Role::Chief));
    }

    #[test]
    fn catalog_has_six_codes_and_handling_is_a_subset() {
        assert_eq!(PermissionCode::CATALOG.len(), 6);
        for code in PermissionCode::HANDLING {
            assert!(PermissionCode::CATALOG.contains(&code));
        }
    }
}
