use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{self, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Plaintext hashed once at construction; unknown usernames are checked
/// against it so they cost the same as a wrong password.
const DUMMY_PASSWORD: &[u8] = b"messagely-timing-parity";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("invalid work factor: {0}")]
    InvalidWorkFactor(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("stored password hash is malformed")]
    MalformedHash,
}

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkFactor {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for WorkFactor {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Clone)]
pub struct CredentialStore {
    argon2: Argon2<'static>,
    dummy_hash: Arc<str>,
}

impl CredentialStore {
    pub fn new(work_factor: WorkFactor) -> Result<Self, CredentialError> {
        let params = Params::new(
            work_factor.memory_kib,
            work_factor.iterations,
            work_factor.parallelism,
            None,
        )
        .map_err(|e| CredentialError::InvalidWorkFactor(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy_hash = hash_with(&argon2, DUMMY_PASSWORD)?;

        Ok(Self {
            argon2,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        hash_with(&self.argon2, plaintext.as_bytes())
    }

    /// `Ok(false)` on mismatch. Only a stored value that is not a valid PHC
    /// string is an error.
    pub fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(hash).map_err(|_| CredentialError::MalformedHash)?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(_) => Err(CredentialError::MalformedHash),
        }
    }

    /// Burn one verification for a user that does not exist.
    pub fn verify_dummy(&self, plaintext: &str) {
        let _ = self.verify(plaintext, &self.dummy_hash);
    }
}

fn hash_with(argon2: &Argon2<'_>, plaintext: &[u8]) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(plaintext, &salt)
        .map_err(|e| CredentialError::Hash(e.to_string()))?
        .to_string();
    Ok(hash)
}
