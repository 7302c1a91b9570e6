//! Domain primitives shared by every Agendizo crate.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the event/notification layer and the HTTP server alike.

pub mod appointment;
pub mod error;
pub mod money;
pub mod notification;
pub mod phone;
pub mod rating;
pub mod slug;
pub mod types;
