/// Messagely credential handling.
///
/// Passwords are stored as Argon2id PHC strings. The work factor is set once
/// per `CredentialStore` and embedded in every hash it produces, so stored
/// hashes keep verifying after the configured cost changes.

pub mod password;

pub use password::{CredentialError, CredentialStore, WorkFactor};
