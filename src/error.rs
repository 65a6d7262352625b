use log::*;

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  // 401
  #[error("authorization failed: {0}")]
  Unauthorized(String),

  // 404
  #[error("{0}")]
  NotFound(String),

  // 422
  #[error("{0}")]
  ValidationFailure(String),

  // 500
  #[error("article already exists in database, {0}")]
  DuplicateArticle(i32),

  #[error("failed to store article: {0}")]
  PersistenceFailure(String),

  #[error("failed to establish connection to the article store: {0}")]
  ConnectionFailure(String),

  #[error("configuration error: {0}")]
  Configuration(String),

  // Json error
  #[error("Json error: {source}")]
  JsonError {
    #[from]
    source: serde_json::Error,
  },

  // Password error
  #[error("Password error: {0}")]
  PasswordError(String),

  #[error("postgres error: {source}")]
  PgError {
    #[from]
    source: tokio_postgres::error::Error,
  },

  #[error("std io error")]
  IOError {
    #[from]
    source: std::io::Error,
  },

  #[error("config error: {source}")]
  ConfigError {
    #[from]
    source: config::ConfigError,
  },

  #[error(transparent)]
  Other(#[from] anyhow::Error),
}

impl Error {
  /// Short machine readable name used in the error envelope.
  pub fn kind(&self) -> &'static str {
    match self {
      Error::Unauthorized(_) => "unauthorized",
      Error::NotFound(_) => "not_found",
      Error::ValidationFailure(_) => "validation_failure",
      Error::DuplicateArticle(_) => "duplicate_article",
      Error::PersistenceFailure(_) => "persistence_failure",
      Error::ConnectionFailure(_) => "connection_failure",
      _ => "internal",
    }
  }

  /// Lookup routes answer every failure with 404.
  pub fn into_lookup_failure(self) -> Self {
    match self {
      Error::NotFound(_) => self,
      err => {
        error!("Lookup failed: {:?}", err);
        Error::NotFound(err.to_string())
      },
    }
  }

  fn public_message(&self) -> String {
    match self {
      Error::Unauthorized(_) => "authorization failed".to_string(),
      Error::NotFound(_) | Error::ValidationFailure(_) |
      Error::DuplicateArticle(_) | Error::PersistenceFailure(_) |
      Error::ConnectionFailure(_) => self.to_string(),
      _ => "internal server error".to_string(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// the ResponseError trait lets us convert errors to http responses with appropriate data
// https://actix.rs/docs/errors/
impl ResponseError for Error {
  fn status_code(&self) -> StatusCode {
    match self {
      Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::ValidationFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status == StatusCode::INTERNAL_SERVER_ERROR {
      error!("InternalServerError: {:?}", self);
    } else {
      debug!("{}: {}", status, self);
    }
    HttpResponse::build(status).json(serde_json::json!({
      "error": {
        "kind": self.kind(),
        "message": self.public_message(),
      }
    }))
  }
}
