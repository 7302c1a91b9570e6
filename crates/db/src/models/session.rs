//! Sign-in sessions backing the `agendizo_session` token.

use sqlx::FromRow;
use agendizo_core::types::{DbId, Timestamp};

/// One sign-in. The session token carries this row's id; revoking the row
/// ends the session even though the token itself is still validly signed.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    /// Browser that signed in, for the owner's own records.
    pub user_agent: Option<String>,
    /// First `X-Forwarded-For` hop seen at sign-in.
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

pub struct CreateSession {
    pub user_id: DbId,
    pub expires_at: Timestamp,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}
