//! Owner profile: display name, contact phone and UI preferences.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use agendizo_core::types::{DbId, Timestamp};

pub const THEMES: [&str; 3] = ["light", "dark", "system"];

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub user_id: DbId,
    pub full_name: String,
    pub phone: Option<String>,
    pub theme: String,
    pub locale: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for updating a profile. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub theme: Option<String>,
    pub locale: Option<String>,
}
