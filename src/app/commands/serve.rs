use log::*;

use std::sync::Arc;

use actix_cors::Cors;
use actix_rt::System;
use actix_web::{middleware, App, HttpServer};

use crate::{
  error::*,
  app::*,
  auth::{ConfiguredAccount, CredentialVerifier},
  middleware::BasicAuth,
  services::config_services,
};

fn worker_count(config: &AppConfig) -> Result<usize> {
  match config.get_int("server.workers")? {
    Some(workers) if workers > 0 => usize::try_from(workers)
      .map_err(|_| Error::Configuration(format!("invalid server.workers: {}", workers))),
    Some(workers) => {
      Err(Error::Configuration(format!("server.workers must be > 0, got {}", workers)))
    },
    None => Ok(num_cpus::get()),
  }
}

fn listen_backlog(config: &AppConfig) -> Result<Option<u32>> {
  config.get_int("server.backlog")?
    .map(|backlog| u32::try_from(backlog)
      .map_err(|_| Error::Configuration(format!("invalid server.backlog: {}", backlog))))
    .transpose()
}

pub fn execute(config: AppConfig) -> Result<()> {
  System::new().block_on(run_server(config))
}

async fn run_server(config: AppConfig) -> Result<()> {
  let debug = config.get_bool("debug")?.unwrap_or(false);
  debug!("Debug = {:?}", debug);

  let verifier: Arc<dyn CredentialVerifier> = Arc::new(ConfiguredAccount::from_config(&config)?);

  // configure services
  info!("Serve.Services: configure services.");
  let services = config_services(&config)?;

  // Create the schema and check the prepared statements before accepting requests.
  services.backend().prepare().await?;

  // Start http server
  let mut server = HttpServer::new(move || {
    App::new()
      .wrap(BasicAuth::new(verifier.clone()))
      // preflight requests are answered before the auth check.
      .wrap(Cors::permissive())
      .wrap(middleware::Compress::default())
      .wrap(middleware::Logger::default())
      .configure(|web| services.web_config(web))
  });

  // workers
  let workers = worker_count(&config)?;
  info!("Workers: {}", workers);
  server = server.workers(workers);

  // listen backlog
  if let Some(backlog) = listen_backlog(&config)? {
    info!("Listen backlog: {}", backlog);
    server = server.backlog(backlog);
  }

  // setup binds.
  let host = config.get_str("server.host")?.unwrap_or_else(|| "0.0.0.0".to_string());
  let port = config.get_int("server.port")?.unwrap_or(DEFAULT_PORT as i64);
  let port = u16::try_from(port)
    .map_err(|_| Error::Configuration(format!("invalid server.port: {}", port)))?;
  info!("Article services listening on: {}:{}", host, port);
  server = server.bind((host.as_str(), port))?;

  // run server future
  server.run().await?;
  info!("Server stopped.");
  Ok(())
}
