use log::*;

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::*;
use crate::app::AppConfig;

pub mod pass;

const BASIC_SCHEME: &str = "Basic";

/// Decoded HTTP Basic credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
  pub username: String,
  pub password: String,
}

impl BasicCredentials {
  /// Parse an `Authorization` header value.
  pub fn from_header(value: &str) -> Result<Self> {
    let (scheme, encoded) = value.split_once(' ')
      .ok_or_else(|| Error::Unauthorized("malformed authorization header".to_string()))?;
    if scheme != BASIC_SCHEME {
      return Err(Error::Unauthorized(format!("unsupported scheme: {}", scheme)));
    }
    let decoded = STANDARD.decode(encoded)
      .map_err(|err| Error::Unauthorized(format!("invalid base64: {}", err)))?;
    let decoded = String::from_utf8(decoded)
      .map_err(|_| Error::Unauthorized("credentials are not utf-8".to_string()))?;
    let (username, password) = decoded.split_once(':')
      .ok_or_else(|| Error::Unauthorized("missing ':' in credentials".to_string()))?;
    Ok(Self {
      username: username.to_string(),
      password: password.to_string(),
    })
  }

  /// `Authorization` header value for these credentials.
  pub fn to_header(&self) -> String {
    let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
    format!("{} {}", BASIC_SCHEME, encoded)
  }
}

/// Decides whether a username/password pair may use the service.
pub trait CredentialVerifier: Send + Sync {
  fn verify(&self, credentials: &BasicCredentials) -> bool;
}

#[derive(Debug, Clone)]
enum Secret {
  Plain(String),
  /// libreauth PHC string.
  Hashed(String),
}

/// A single account read from configuration.
#[derive(Debug, Clone)]
pub struct ConfiguredAccount {
  username: String,
  secret: Secret,
}

impl ConfiguredAccount {
  pub fn plain(username: &str, password: &str) -> Self {
    Self {
      username: username.to_string(),
      secret: Secret::Plain(password.to_string()),
    }
  }

  pub fn hashed(username: &str, phc: &str) -> Self {
    Self {
      username: username.to_string(),
      secret: Secret::Hashed(phc.to_string()),
    }
  }

  /// Reads `auth.username` and one of `auth.password_hash` / `auth.password`.
  pub fn from_config(config: &AppConfig) -> Result<Self> {
    let username = config.get_str("auth.username")?
      .ok_or_else(|| Error::Configuration("auth.username must be set".to_string()))?;
    if let Some(phc) = config.get_str("auth.password_hash")? {
      return Ok(Self::hashed(&username, &phc));
    }
    match config.get_str("auth.password")? {
      Some(password) => Ok(Self::plain(&username, &password)),
      None => Err(Error::Configuration(
        "auth.password or auth.password_hash must be set".to_string())),
    }
  }
}

impl CredentialVerifier for ConfiguredAccount {
  fn verify(&self, credentials: &BasicCredentials) -> bool {
    if credentials.username != self.username {
      return false;
    }
    match &self.secret {
      Secret::Plain(password) => *password == credentials.password,
      Secret::Hashed(phc) => match pass::check_password(phc, &credentials.password) {
        Ok(valid) => valid,
        Err(err) => {
          error!("Stored password hash unusable: {}", err);
          false
        },
      },
    }
  }
}
