//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`bootstrap`] -- creation of the initial admin account.

pub mod bootstrap;
pub mod jwt;
pub mod password;
