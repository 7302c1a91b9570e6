//! Public feedback left on a business's booking page.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use agendizo_core::types::{DbId, Timestamp};

/// A row from the `feedback` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feedback {
    pub id: DbId,
    pub business_id: DbId,
    pub client_name: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating feedback.
#[derive(Debug, Deserialize)]
pub struct CreateFeedback {
    pub client_name: String,
    pub rating: i16,
    pub comment: Option<String>,
}
