//! Bearer-claims extraction and the authorization guard chain.
//!
//! The identity provider is external; it issues HS256 tokens whose claims
//! carry the user id, group membership, and a staff flag. Handlers run the
//! guards below in a fixed order before touching any state — each failure
//! short-circuits with `PermissionDenied`.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{self, Editor, Reviewer};
use crate::error::{Error, Result};
use crate::roles::Role;
use crate::state::AppState;

pub const EDITORS_GROUP: &str = "editors";
pub const REVIEWERS_GROUP: &str = "reviewers";

/// Token payload issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// External user id.
    pub sub: Uuid,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub is_staff: bool,
    pub exp: i64,
}

/// Encode claims the way the identity provider does. Used by tests and
/// local tooling.
pub fn encode_claims(claims: &Claims, secret: &str) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| Error::Unauthorized)
}

/// The acting identity, decoded from the Authorization header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub groups: Vec<String>,
    pub is_staff: bool,
}

impl AuthUser {
    pub fn has_group(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g == name)
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> std::result::Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(Error::Unauthorized)?;
        let token = header.strip_prefix("Bearer ").ok_or(Error::Unauthorized)?;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.config.app_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| Error::Unauthorized)?;

        Ok(AuthUser {
            user_id: data.claims.sub,
            groups: data.claims.groups,
            is_staff: data.claims.is_staff,
        })
    }
}

pub fn require_staff(user: &AuthUser) -> Result<()> {
    if user.is_staff {
        Ok(())
    } else {
        Err(Error::PermissionDenied("staff account is required"))
    }
}

/// Group membership plus an editor profile row.
pub async fn require_editor(pool: &PgPool, user: &AuthUser) -> Result<Editor> {
    if !user.has_group(EDITORS_GROUP) {
        return Err(Error::PermissionDenied("an editor account is required"));
    }
    db::find_editor_by_user(pool, user.user_id)
        .await?
        .ok_or(Error::PermissionDenied("an editor profile is required"))
}

/// Group membership plus a reviewer profile row.
pub async fn require_reviewer(pool: &PgPool, user: &AuthUser) -> Result<Reviewer> {
    if !user.has_group(REVIEWERS_GROUP) {
        return Err(Error::PermissionDenied("a reviewer account is required"));
    }
    db::find_reviewer_by_user(pool, user.user_id)
        .await?
        .ok_or(Error::PermissionDenied("a reviewer profile is required"))
}

/// The editor must hold the chief slot on the journal's board.
pub async fn require_chief(pool: &PgPool, journal_id: Uuid, editor_id: Uuid) -> Result<()> {
    let chief = db::board_slot(pool, journal_id, Role::Chief).await?;
    match chief {
        Some(slot) if slot.editor_id == Some(editor_id) => Ok(()),
        _ => Err(Error::PermissionDenied(
            "only the editor-in-chief may perform this action",
        )),
    }
}

/// The editor's team slot must currently hold both handling permissions.
pub async fn require_handling(pool: &PgPool, submission_id: Uuid, editor_id: Uuid) -> Result<()> {
    if db::editor_has_handling(pool, submission_id, editor_id).await? {
        Ok(())
    } else {
        Err(Error::PermissionDenied(
            "you do not have permission to handle this submission",
        ))
    }
}

/// The reviewer must be on the submission's reviewer set.
pub async fn require_assigned_reviewer(
    pool: &PgPool,
    submission_id: Uuid,
    reviewer_id: Uuid,
) -> Result<()> {
    if db::is_assigned_reviewer(pool, submission_id, reviewer_id).await? {
        Ok(())
    } else {
        Err(Error::PermissionDenied(
            "you are not assigned to review this submission",
        ))
    }
}
