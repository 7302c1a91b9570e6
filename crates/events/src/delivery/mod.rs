//! Outbound delivery transports.

pub mod smtp;
