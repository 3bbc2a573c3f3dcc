//! Middleware module
//!
//! Contains Tower middleware for session authentication.

pub mod auth;
