//! Credentials module
//!
//! Session token issuing/verification and password hashing.

pub mod password;
pub mod session;

pub use password::PasswordHasher;
pub use session::{IssuedToken, SessionClaims, SessionVerifier};
