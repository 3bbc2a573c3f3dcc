//! Mock infrastructure for testing external services
//!
//! - TMDB API (catalog resources)
//!
//! The library store needs no mock: tests run against the in-memory backend.


pub use tmdb::*;
