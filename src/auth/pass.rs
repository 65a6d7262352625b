use libreauth::pass::{Algorithm, HashBuilder, Hasher};

use crate::error::*;

pub const PWD_ALGORITHM: Algorithm = Algorithm::Argon2;
pub const PWD_SCHEME_VERSION: usize = 1;

// If the Hasher changes, make sure to increment PWD_SCHEME_VERSION
fn hasher() -> Result<Hasher> {
  HashBuilder::new()
    .algorithm(PWD_ALGORITHM)
    .version(PWD_SCHEME_VERSION)
    .finalize()
    .map_err(|err| Error::PasswordError(format!("{:?}", err)))
}

/// Check `password` against a stored PHC string.
pub fn check_password(stored: &str, password: &str) -> Result<bool> {
  let checker = HashBuilder::from_phc(stored)
    .map_err(|err| Error::PasswordError(format!("{:?}", err)))?;
  Ok(checker.is_valid(password))
}

pub fn hash_password(password: &str) -> Result<String> {
  hasher()?.hash(password)
    .map_err(|err| Error::PasswordError(format!("{:?}", err)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_check() {
    let stored = hash_password("password").unwrap();
    assert!(check_password(&stored, "password").unwrap());
    assert!(!check_password(&stored, "Password").unwrap());
  }

  #[test]
  fn bad_phc_is_an_error() {
    assert!(check_password("not a phc string", "password").is_err());
  }
}
