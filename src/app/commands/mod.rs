pub mod serve;
pub mod hash_password;
