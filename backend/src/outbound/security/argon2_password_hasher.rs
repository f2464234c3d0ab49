//! Argon2id implementation of the `PasswordHasher` port.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    self, PasswordHash as ParsedHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::Argon2;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{Password, PasswordHash};

/// Hashes passwords into PHC strings with a fresh random salt each time.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|hash| PasswordHash::new(hash.to_string()))
            .map_err(|err| PasswordHasherError::hash(err.to_string()))
    }

    fn verify(&self, candidate: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        let parsed = ParsedHash::new(hash.as_str())
            .map_err(|err| PasswordHasherError::hash(format!("stored hash unreadable: {err}")))?;
        match self.argon2.verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHasherError::hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::new()
    }

    fn password(raw: &str) -> Password {
        Password::new(raw).expect("valid password")
    }

    #[rstest]
    fn hash_is_a_phc_string_not_the_password(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash(&password("Qwerty123")).expect("hash");
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(!hash.as_str().contains("Qwerty123"));
    }

    #[rstest]
    #[case("Qwerty123", true)]
    #[case("qwerty123", false)]
    fn verify_matches_only_the_original(
        hasher: Argon2PasswordHasher,
        #[case] candidate: &str,
        #[case] expected: bool,
    ) {
        let hash = hasher.hash(&password("Qwerty123")).expect("hash");
        assert_eq!(hasher.verify(candidate, &hash).expect("verify"), expected);
    }

    #[rstest]
    fn salts_differ_between_hashes(hasher: Argon2PasswordHasher) {
        let first = hasher.hash(&password("Qwerty123")).expect("hash");
        let second = hasher.hash(&password("Qwerty123")).expect("hash");
        assert_ne!(first, second);
    }

    #[rstest]
    fn garbage_hash_is_an_error(hasher: Argon2PasswordHasher) {
        let result = hasher.verify("Qwerty123", &PasswordHash::new("not-a-hash"));
        assert!(matches!(result, Err(PasswordHasherError::Hash { .. })));
    }
}
