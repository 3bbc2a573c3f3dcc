//! Cache module
//!
//! Provides the in-process TTL cache that fronts the metadata provider.

pub mod gateway;
pub mod keys;

pub use self::gateway::GatewayCache;
