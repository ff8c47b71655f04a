//! Journal-scope editorial board operations.
//!
//! Provisioning happens synchronously inside the journal-creation
//! transaction, so a journal can never be observed with permissions but no
//! role slots (or vice versa).

use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{self, Editor, EditorialMember, Journal};
use crate::error::{Error, Result};
use crate::roles::{PermissionCode, Role};

/// Create a journal and provision its permission catalog and non-chief
/// role slots in one transaction. Every slot starts unbound, holding only
/// `view_submissions`.
pub async fn create_and_provision(pool: &PgPool, name: &str, issn: &str) -> Result<Journal> {
    let slug = slugify(name);
    let mut tx = pool.begin().await?;

    let journal = db::insert_journal(&mut *tx, name, &slug, issn).await?;

    let view = db::insert_permission(&mut *tx, journal.id, PermissionCode::ViewSubmissions).await?;
    for code in PermissionCode::CATALOG {
        if code != PermissionCode::ViewSubmissions {
            db::insert_permission(&mut *tx, journal.id, code).await?;
        }
    }

    for role in Role::NON_CHIEF {
        let slot = db::insert_board_slot(&mut *tx, journal.id, role, None, "").await?;
        db::grant_board_permission(&mut *tx, slot.id, view.id).await?;
    }

    tx.commit().await?;

    tracing::info!("Provisioned journal \"{}\" ({})", journal.name, journal.id);
    Ok(journal)
}

/// Fill the chief slot. The chief is transfer-only: the slot is created
/// here exactly once, bound to the editor, with a fresh opaque access
/// credential and every journal permission granted.
pub async fn transfer_chief(
    pool: &PgPool,
    journal_id: Uuid,
    editor_id: Uuid,
) -> Result<EditorialMember> {
    let mut tx = pool.begin().await?;

    db::lock_journal(&mut *tx, journal_id)
        .await?
        .ok_or(Error::NotFound { entity: "journal" })?;
    db::find_editor(&mut *tx, editor_id)
        .await?
        .ok_or(Error::NotFound { entity: "editor" })?;

    if db::board_slot(&mut *tx, journal_id, Role::Chief).await?.is_some() {
        return Err(Error::InvalidState(
            "an editor-in-chief already exists".to_string(),
        ));
    }

    let access_login = random_access_login();
    let member =
        db::insert_board_slot(&mut *tx, journal_id, Role::Chief, Some(editor_id), &access_login)
            .await?;

    for permission in db::journal_permissions(&mut *tx, journal_id).await? {
        db::grant_board_permission(&mut *tx, member.id, permission.id).await?;
    }

    tx.commit().await?;

    tracing::info!("Journal {} management transferred to editor {}", journal_id, editor_id);
    Ok(member)
}

/// Move an editor onto the board slot for `role`. The chief slot is
/// excluded; it only changes hands via [`transfer_chief`].
pub async fn assign_role(
    pool: &PgPool,
    journal_id: Uuid,
    editor_id: Uuid,
    role: Role,
) -> Result<()> {
    if role == Role::Chief {
        return Err(Error::InvalidState(
            "action forbidden: cannot make editor a chief".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    db::lock_journal(&mut *tx, journal_id)
        .await?
        .ok_or(Error::NotFound { entity: "journal" })?;
    db::find_editor(&mut *tx, editor_id)
        .await?
        .ok_or(Error::NotFound { entity: "editor" })?;

    // The chief slot never empties through reassignment; a journal with a
    // vacated chief slot could not be recovered, since transfer_chief only
    // runs once.
    let chief = db::board_slot(&mut *tx, journal_id, Role::Chief).await?;
    if chief.and_then(|slot| slot.editor_id) == Some(editor_id) {
        return Err(Error::InvalidState(
            "action forbidden: cannot reassign the editor-in-chief".to_string(),
        ));
    }

    // Unbind from any slot the editor already holds, then bind the target
    // slot. Both inside the transaction so no partial state is observable.
    db::unbind_board_editor(&mut *tx, journal_id, editor_id).await?;
    let bound = db::bind_board_role(&mut *tx, journal_id, role, editor_id).await?;
    if bound == 0 {
        return Err(Error::NotFound { entity: "role slot" });
    }

    tx.commit().await?;
    Ok(())
}

/// The editor currently holding `role` on the journal's board, if any.
pub async fn board_member(pool: &PgPool, journal_id: Uuid, role: Role) -> Result<Option<Editor>> {
    let slot = db::board_slot(pool, journal_id, role).await?;
    match slot.and_then(|s| s.editor_id) {
        Some(editor_id) => Ok(db::find_editor(pool, editor_id).await?),
        None => Ok(None),
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Opaque secret for the legacy per-journal login slot.
fn random_access_login() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_punctuation_and_case() {
        assert_eq!(slugify("Acta Exemplaria"), "acta-exemplaria");
        assert_eq!(slugify("Journal of X -- Applied"), "journal-of-x-applied");
        assert_eq!(slugify("Trailing!"), "trailing");
    }

    #[test]
    fn access_logins_are_distinct() {
        assert_ne!(random_access_login(), random_access_login());
        assert_eq!(random_access_login().len(), 24);
    }
}
