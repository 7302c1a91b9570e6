//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod appointment;
pub mod business;
pub mod client;
pub mod feedback;
pub mod notification;
pub mod profile;
pub mod service;
pub mod session;
pub mod subscription;
pub mod user;
