//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- signed session tokens.
//! - [`cookie`] -- the `agendizo_session` cookie.

pub mod cookie;
pub mod jwt;
pub mod password;
