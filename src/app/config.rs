use serde::de::DeserializeOwned;

use config::{
  builder::DefaultState,
  Config, ConfigBuilder, ConfigError, Environment, File,
};

use crate::error::*;

pub const DEFAULT_PORT: u16 = 8984;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub conf: Config
}

/// Built-in defaults, lowest priority of every config source.
pub fn defaults() -> Result<ConfigBuilder<DefaultState>> {
  Ok(Config::builder()
    .set_default("debug", false)?
    .set_default("server.host", "0.0.0.0")?
    .set_default("server.port", DEFAULT_PORT as i64)?
    .set_default("server.json_limit", 1_048_576i64)?
    .set_default("server.services", vec!["Article", "Tag"])?
    .set_default("db.backend", "postgres")?
    .set_default("db.url", "postgres://postgres@localhost/articles")?
    .set_default("db.init_schema", true)?)
}

impl AppConfig {
  /// Load defaults, config files and environment overrides.
  pub fn load(config_file: Option<&str>) -> Result<Self> {
    let mut builder = defaults()?
      .add_source(File::with_name("conf/default").required(false));

    if let Some(config_file) = config_file {
      builder = builder.add_source(File::with_name(config_file));
    } else {
      // Get RUN_MODE from environment
      let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
      builder = builder.add_source(File::with_name(&format!("conf/{}", env)).required(false));
    }

    // Allow overrides from environment
    builder = builder.add_source(Environment::with_prefix("APP")
      .prefix_separator("_")
      .separator("__")
      .try_parsing(true));

    // PORT wins over every other source.
    if let Ok(port) = std::env::var("PORT") {
      if !port.is_empty() {
        let port: i64 = port.parse().map_err(|_| {
          Error::Configuration(format!("PORT is not a number: {:?}", port))
        })?;
        builder = builder.set_override("server.port", port)?;
      }
    }

    Ok(AppConfig {
      conf: builder.build()?,
    })
  }

  pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
    Ok(AppConfig {
      conf: builder.build()?,
    })
  }

  pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
    Ok(self.conf.get(key).map(Some).or_else(|e| {
      match e {
        ConfigError::NotFound(_) => Ok(None),
        err => Err(err),
      }
    })?)
  }

  pub fn get_str(&self, key: &str) -> Result<Option<String>> {
    self.get(key)
  }

  pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
    self.get(key)
  }

  pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
    self.get(key)
  }

  pub fn get_str_list(&self, key: &str) -> Result<Option<Vec<String>>> {
    self.get(key)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn built_in_defaults() {
    let config = AppConfig::from_builder(defaults().unwrap()).unwrap();
    assert_eq!(config.get_int("server.port").unwrap(), Some(8984));
    assert_eq!(config.get_int("server.json_limit").unwrap(), Some(1_048_576));
    assert_eq!(config.get_str("db.backend").unwrap().as_deref(), Some("postgres"));
    assert_eq!(config.get_str_list("server.services").unwrap(),
      Some(vec!["Article".to_string(), "Tag".to_string()]));
    assert_eq!(config.get_str("auth.username").unwrap(), None);
  }

  #[test]
  fn overrides_win() {
    let builder = defaults().unwrap()
      .set_override("db.backend", "memory").unwrap()
      .set_override("server.port", 9000i64).unwrap();
    let config = AppConfig::from_builder(builder).unwrap();
    assert_eq!(config.get_str("db.backend").unwrap().as_deref(), Some("memory"));
    assert_eq!(config.get_int("server.port").unwrap(), Some(9000));
  }
}
