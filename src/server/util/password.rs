//! Password hashing with bcrypt.
//!
//! Stored values are standard `$2b$` bcrypt strings carrying their own salt and cost.

use crate::server::error::AppError;

#[cfg(not(test))]
const COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const COST: u32 = 4;

/// Hashes a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, COST).map_err(|e| AppError::InternalError(e.to_string()))
}

/// Checks a password against a stored bcrypt hash.
///
/// Malformed stored values never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_matching_password() {
        let stored = hash_password("s3cret!").unwrap();

        assert!(verify_password("s3cret!", &stored));
        assert!(!verify_password("s3cret", &stored));
    }

    #[test]
    fn salts_every_hash() {
        assert_ne!(
            hash_password("same").unwrap(),
            hash_password("same").unwrap()
        );
    }

    #[test]
    fn rejects_malformed_stored_value() {
        assert!(!verify_password("anything", "!"));
        assert!(!verify_password("anything", "zz$abc"));
    }
}
