use log::*;

use std::rc::Rc;
use std::cell::RefCell;
use std::time::Duration;

use tokio::time::sleep;

use anyhow::Context;

use tokio_postgres::{
  connect, Client, Statement, Row, NoTls,
  types::ToSql,
};

use crate::error::*;
use crate::app::AppConfig;

use super::{setup_article_store, ArticleStore, MemoryStore, PgArticleStore};

const MAX_RETRIES: u32 = 10;
const RETRY_DELAY: Duration = Duration::from_millis(100);
const RECONNECT_DELAY: Duration = Duration::from_millis(500);

pub type RefClient = Rc<(u64, Client)>;

/// Client connected state
#[derive(Clone)]
pub enum ClientState {
  Connecting(u64),
  Connected(RefClient),
  Closed,
}

/// A postgres client shared by the statements of one worker.
/// Each time the client reconnects a new version number is generated.
#[derive(Clone)]
pub struct SharedClient {
  state: Rc<RefCell<ClientState>>,
}

impl SharedClient {
  /// Spawn the background connection task on the current actix runtime.
  pub fn new(url: &str) -> Self {
    let shared_cl = Self {
      state: Rc::new(RefCell::new(ClientState::Connecting(0))),
    };
    let task_cl = shared_cl.clone();
    let url = url.to_string();
    actix_rt::spawn(async move {
      task_cl.run_connection(url).await;
      debug!("client background task stopped.");
    });
    shared_cl
  }

  async fn run_connection(&self, url: String) {
    let mut version = 0;
    loop {
      version += 1;
      debug!("client task: Connecting: ver={}", version);
      self.set_state(ClientState::Connecting(version));
      let (cl, conn) = loop {
        match connect(&url, NoTls).await {
          Ok(pair) => break pair,
          Err(e) => {
            debug!("client task: ver={}: connect error: {}", version, e);
            sleep(RECONNECT_DELAY).await;
          },
        }
      };
      debug!("client task: ver={}: Connecting -> Connected", version);
      self.set_state(ClientState::Connected(Rc::new((version, cl))));

      // Drive the connection until it drops.
      match conn.await {
        Err(e) => {
          info!("article store connection error: {}", e);
        },
        Ok(()) => {
          debug!("article store connection closed.");
          self.set_state(ClientState::Closed);
          return;
        },
      }
      sleep(RECONNECT_DELAY).await;
    }
  }

  pub async fn get_client(&self) -> Result<RefClient> {
    for _ in 0..MAX_RETRIES {
      match self.get_state() {
        ClientState::Connected(cl) => return Ok(cl),
        ClientState::Connecting(version) => {
          debug!("get_client: ver={}: Connecting..", version);
          sleep(RETRY_DELAY).await;
        },
        ClientState::Closed => break,
      }
    }
    Err(Error::ConnectionFailure("failed to connect to database".to_string()))
  }

  /// Check client version.
  pub fn check_version(&self, version: u64) -> bool {
    match &*self.state.borrow() {
      ClientState::Connected(cl) => cl.0 == version,
      _ => false,
    }
  }

  fn get_state(&self) -> ClientState {
    self.state.borrow().clone()
  }

  fn set_state(&self, state: ClientState) {
    self.state.replace(state);
  }
}

/// A prepared statement bound to the client version it was prepared on.
pub struct ClientStatement {
  cl: RefClient,
  statement: Statement,
}

/// Prepares `query` lazily and again after every reconnect.
pub struct VersionedStatement {
  shared_cl: SharedClient,
  prepared: RefCell<Option<Rc<ClientStatement>>>,
  query: String,
}

macro_rules! impl_client_method {
  ($method:ident, $res_ty:ty) => {
    pub async fn $method(&self, params: &[&(dyn ToSql + Sync)]) -> Result<$res_ty> {
      for _ in 0..MAX_RETRIES {
        let prepared = self.get_statement().await?;
        match prepared.cl.1.$method(&prepared.statement, params).await {
          Ok(res) => return Ok(res),
          Err(err) if err.is_closed() => {
            // connection to the DB was closed, try again.
            info!("DB connection closed, retry query.");
            self.prepared.replace(None);
            sleep(RETRY_DELAY).await;
          },
          Err(err) => {
            error!("Postgres error: {}, query=[[{}]]", err, self.query);
            return Err(err.into());
          },
        }
      }
      Err(Error::ConnectionFailure("failed to connect to database".to_string()))
    }
  };
}

impl VersionedStatement {
  pub fn new(shared_cl: SharedClient, query: &str) -> Self {
    Self {
      shared_cl,
      prepared: RefCell::new(None),
      query: query.to_string(),
    }
  }

  async fn get_statement(&self) -> Result<Rc<ClientStatement>> {
    let current = self.prepared.borrow().clone();
    if let Some(prepared) = current {
      if self.shared_cl.check_version(prepared.cl.0) {
        return Ok(prepared);
      }
      debug!("get_statement: ver={}: stale, prepare again", prepared.cl.0);
    }

    let cl = self.shared_cl.get_client().await?;
    let statement = cl.1.prepare(&self.query).await.map_err(|err| {
      error!("Postgres prepare error: {}, query=[[{}]]", err, self.query);
      if err.is_closed() {
        Error::ConnectionFailure(err.to_string())
      } else {
        err.into()
      }
    })?;
    let prepared = Rc::new(ClientStatement { cl, statement });
    self.prepared.replace(Some(prepared.clone()));
    Ok(prepared)
  }

  impl_client_method!(query, Vec<Row>);
  impl_client_method!(query_opt, Option<Row>);
  impl_client_method!(query_one, Row);
  impl_client_method!(execute, u64);
}

/// Which article store the server talks to.
#[derive(Clone)]
pub enum StoreBackend {
  /// One collection shared by every worker.
  Memory(MemoryStore),
  /// Each worker opens its own connection.
  Postgres { url: String, init_schema: bool },
}

impl StoreBackend {
  pub fn from_config(config: &AppConfig) -> Result<Self> {
    let backend = config.get_str("db.backend")?.unwrap_or_else(|| "postgres".to_string());
    match backend.as_str() {
      "memory" => Ok(StoreBackend::Memory(MemoryStore::new())),
      "postgres" => {
        let url = config.get_str("db.url")?
          .ok_or_else(|| Error::Configuration("db.url must be set".to_string()))?;
        let init_schema = config.get_bool("db.init_schema")?.unwrap_or(true);
        Ok(StoreBackend::Postgres { url, init_schema })
      },
      other => Err(Error::Configuration(format!("unknown db.backend: {}", other))),
    }
  }

  /// Run once at startup, before any worker opens the store.
  pub async fn prepare(&self) -> Result<()> {
    match self {
      StoreBackend::Memory(_) => Ok(()),
      StoreBackend::Postgres { url, init_schema } => {
        setup_article_store(url, *init_schema).await
          .context("preparing the postgres article store")?;
        Ok(())
      },
    }
  }

  /// Open the store for one worker.  Must run inside an actix runtime.
  pub fn open(&self) -> Box<dyn ArticleStore> {
    match self {
      StoreBackend::Memory(store) => Box::new(store.clone()),
      StoreBackend::Postgres { url, .. } => Box::new(PgArticleStore::new(url)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[actix_rt::test]
  async fn memory_backend_needs_no_setup() {
    assert!(StoreBackend::Memory(MemoryStore::new()).prepare().await.is_ok());
  }

  #[actix_rt::test]
  async fn postgres_setup_failure_names_the_store() {
    let backend = StoreBackend::Postgres {
      url: "not a connection string".to_string(),
      init_schema: true,
    };
    match backend.prepare().await {
      Err(Error::Other(err)) => {
        assert!(err.to_string().contains("preparing the postgres article store"));
        assert!(err.chain().count() > 1);
      },
      other => panic!("expected setup failure, got {:?}", other),
    }
  }
}
