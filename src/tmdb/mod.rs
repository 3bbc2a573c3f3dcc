//! TMDB integration module
//!
//! Provides the provider client and the cached catalog built on top of it.

pub mod catalog;
pub mod client;
pub mod models;

pub use catalog::Catalog;
pub use client::TmdbClient;
pub use models::*;
