use log::*;

use std::collections::HashSet;

use actix_web::web;

use crate::error::*;
use crate::app::*;
use crate::db::{ArticleRepository, StoreBackend};

mod article;
mod tag;

const DEFAULT_JSON_LIMIT: usize = 1_048_576;

type BoxService = Box<dyn Service>;

pub trait Service: ServiceClone + Send {
  /// Load Service config from AppConfig.
  fn load_app_config(&mut self, config: &AppConfig) -> Result<()>;

  /// Setup Service endpoints.
  fn web_config(&self, _web: &mut web::ServiceConfig) {
  }
}

pub trait ServiceClone {
  fn clone_box(&self) -> BoxService;
}

impl<T> ServiceClone for T
where
    T: 'static + Service + Clone,
{
  fn clone_box(&self) -> BoxService {
    Box::new(self.clone())
  }
}

impl Clone for BoxService {
  fn clone(&self) -> BoxService {
    self.clone_box()
  }
}

/// Everything a worker needs to build its routes.
#[derive(Clone)]
pub struct Services {
  backend: StoreBackend,
  json_limit: usize,
  services: Vec<BoxService>,
}

impl Services {
  fn load_service(name: &str, config: &AppConfig) -> Result<BoxService> {
    let mut service: BoxService = match name {
      "Article" => Box::new(article::new_factory()),
      "Tag" => Box::new(tag::new_factory()),
      _ => {
        return Err(Error::Configuration(format!("Unknown Service: {}", name)));
      },
    };

    service.load_app_config(config)?;
    Ok(service)
  }

  /// Load Service config from AppConfig.
  pub fn load_app_config(config: &AppConfig) -> Result<Self> {
    let backend = StoreBackend::from_config(config)?;
    let json_limit = match config.get_int("server.json_limit")? {
      Some(limit) => usize::try_from(limit)
        .map_err(|_| Error::Configuration(format!("invalid server.json_limit: {}", limit)))?,
      None => DEFAULT_JSON_LIMIT,
    };

    let mut loaded = HashSet::new();
    let mut services = Vec::new();
    let list = config.get_str_list("server.services")?
      .ok_or_else(|| Error::Configuration("missing list of services.".to_string()))?;
    for name in list.iter() {
      info!("Loading {}Service config", name);
      if !loaded.insert(name.clone()) {
        return Err(Error::Configuration(format!("can't load service {} multiple times.", name)));
      }
      services.push(Self::load_service(name, config)?);
    }

    Ok(Services {
      backend,
      json_limit,
      services,
    })
  }

  pub fn backend(&self) -> &StoreBackend {
    &self.backend
  }

  /// Setup Service endpoints.
  pub fn web_config(&self, web: &mut web::ServiceConfig) {
    // Repository for this worker.
    let repository = ArticleRepository::new(self.backend.open());
    web
      .app_data(web::Data::new(repository))
      .app_data(json_config(self.json_limit))
      .app_data(path_config());

    for service in self.services.iter() {
      service.web_config(web);
    }
  }
}

/// Oversized or unparsable bodies are answered with 422.
fn json_config(limit: usize) -> web::JsonConfig {
  web::JsonConfig::default()
    .limit(limit)
    .content_type_required(false)
    .error_handler(|err, _req| {
      Error::ValidationFailure(format!("unable to parse article: {}", err)).into()
    })
}

/// Path segments that fail to parse, such as a non-numeric id, are answered with 422.
fn path_config() -> web::PathConfig {
  web::PathConfig::default()
    .error_handler(|err, _req| {
      Error::ValidationFailure(format!("invalid path: {}", err)).into()
    })
}

pub fn config_services(config: &AppConfig) -> Result<Services> {
  Services::load_app_config(config)
}
