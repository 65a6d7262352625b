use crate::error::*;
use crate::auth::pass;

/// Print a PHC hash of `password` for use as `auth.password_hash`.
pub fn execute(password: &str) -> Result<()> {
  println!("{}", pass::hash_password(password)?);
  Ok(())
}
