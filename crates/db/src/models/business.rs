//! Business (tenant) model, DTOs and weekly working hours.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use agendizo_core::types::{DbId, Timestamp};

/// A row from the `businesses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Business {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub utc_offset_minutes: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a business. The slug has already been resolved.
#[derive(Debug)]
pub struct CreateBusiness {
    pub owner_id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub utc_offset_minutes: Option<i32>,
}

/// DTO for updating a business. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBusiness {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub utc_offset_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

/// A row from the `business_hours` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BusinessHours {
    pub id: DbId,
    pub business_id: DbId,
    pub weekday: i16,
    pub opens_at: Option<NaiveTime>,
    pub closes_at: Option<NaiveTime>,
    pub is_closed: bool,
}

/// One day of the week in a working-hours replacement request.
#[derive(Debug, Clone, Deserialize)]
pub struct DayHours {
    pub weekday: i16,
    pub opens_at: Option<NaiveTime>,
    pub closes_at: Option<NaiveTime>,
    #[serde(default)]
    pub is_closed: bool,
}
