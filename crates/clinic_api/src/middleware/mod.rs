//! Router middleware: access logging and bearer authentication.

pub mod access_log;
pub mod auth;
