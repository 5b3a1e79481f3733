use argon2::{
	password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
	Argon2,
};
use rand_core::OsRng;

use crate::error::{Error, Result};

/// Argon2id PHC string for `plain`, salted per call.
pub fn hash_password(plain: &str) -> Result<String> {
	let salt = SaltString::generate(&mut OsRng);
	Argon2::default()
		.hash_password(plain.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| Error::Password(e.to_string()))
}

#[cfg(test)]
pub fn verify_password(plain: &str, hash: &str) -> bool {
	let Ok(parsed) = PasswordHash::new(hash) else {
		return false;
	};
	Argon2::default()
		.verify_password(plain.as_bytes(), &parsed)
		.is_ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hashes_are_salted_and_verify() {
		let a = hash_password("p1").unwrap();
		let b = hash_password("p1").unwrap();
		assert_ne!(a, b);
		assert!(a.starts_with("$argon2id$"));
		assert!(verify_password("p1", &a));
		assert!(!verify_password("p2", &a));
	}

	#[test]
	fn garbage_hash_never_verifies() {
		assert!(!verify_password("p1", "p1"));
	}
}
