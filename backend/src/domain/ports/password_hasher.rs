//! Port for one-way password hashing.

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing failed or the stored hash could not be parsed.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Hashes new passwords and checks candidates against stored hashes.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted hash of `password`.
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError>;

    /// Whether `candidate` matches `hash`.
    fn verify(&self, candidate: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError>;
}
