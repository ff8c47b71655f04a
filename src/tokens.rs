use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Claims carried by a reviewer invitation token: the journal and
/// submission it is scoped to, plus the usual expiry/issue pair.
#[derive(Debug, Serialize, Deserialize)]
pub struct InvitationClaims {
    pub journal_id: Uuid,
    pub submission_id: Uuid,
    pub exp: i64,
    pub iat: i64,
}

/// Sign an opaque invitation token for one submission.
pub fn sign_invitation(
    journal_id: Uuid,
    submission_id: Uuid,
    secret: &str,
    ttl_hours: i64,
) -> Result<String, Error> {
    let now = Utc::now();
    let claims = InvitationClaims {
        journal_id,
        submission_id,
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| Error::InvalidToken)
}

/// Verify an invitation token; tampered, foreign, or expired tokens all
/// come back as `InvalidToken`.
pub fn verify_invitation(token: &str, secret: &str) -> Result<InvitationClaims, Error> {
    decode::<InvitationClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| Error::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SECRET: &str = "test-secret";

    #[test]
    fn sign_then_verify_round_trips_the_scope() {
        let journal_id = Uuid::new_v4();
        let submission_id = Uuid::new_v4();

        let token = sign_invitation(journal_id, submission_id, SECRET, 72).unwrap();
        let claims = verify_invitation(&token, SECRET).unwrap();

        assert_eq!(claims.journal_id, journal_id);
        assert_eq!(claims.submission_id, submission_id);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = sign_invitation(Uuid::new_v4(), Uuid::new_v4(), SECRET, 72).unwrap();
        let mut tampered = token.into_bytes();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        assert_matches!(verify_invitation(&tampered, SECRET), Err(Error::InvalidToken));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_invitation(Uuid::new_v4(), Uuid::new_v4(), SECRET, 72).unwrap();
        assert_matches!(
            verify_invitation(&token, "other-secret"),
            Err(Error::InvalidToken)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = sign_invitation(Uuid::new_v4(), Uuid::new_v4(), SECRET, -1).unwrap();
        assert_matches!(verify_invitation(&token, SECRET), Err(Error::InvalidToken));
    }
}
