use log::*;

use async_trait::async_trait;

use tokio_postgres::{connect, NoTls, Row};

use crate::error::*;
use crate::models::Article;
use crate::forms::article::ArticlePayload;

use crate::db::*;
use crate::db::util::*;

lazy_static! {
  static ref ARTICLE_COLUMNS: ColumnMappers = {
    ColumnMappers {
      table_name: "articles",
      columns: vec![
        column("id"),
        column("title"),
        quoted("date"),
        column("body"),
        column("tags"),
      ],
    }
  };

  static ref ARTICLE_QUERIES: ArticleQueries = ArticleQueries::build();
}

/// SQL text of every statement `PgArticleStore` prepares.
struct ArticleQueries {
  find_duplicate: String,
  find_tag_on_date: String,
  article_by_id: String,
  store_article: String,
  delete_article: String,
}

impl ArticleQueries {
  fn build() -> Self {
    let select = ARTICLE_COLUMNS.build_select_query();
    let date = ARTICLE_COLUMNS.column("date");

    Self {
      find_duplicate: format!(
        "{} WHERE {} = $1 AND title = $2 AND body = $3 AND tags && $4 ORDER BY id LIMIT 1",
        select, date),
      find_tag_on_date: format!("{} WHERE {} = $1 AND $2 = ANY(tags) ORDER BY id", select, date),
      article_by_id: format!("{} WHERE id = $1", select),
      store_article: ARTICLE_COLUMNS.build_insert_query(),
      delete_article: "DELETE FROM articles WHERE id = $1".to_string(),
    }
  }

  fn all(&self) -> [&str; 6] {
    [
      self.find_duplicate.as_str(),
      self.find_tag_on_date.as_str(),
      self.article_by_id.as_str(),
      NEXT_ID,
      self.store_article.as_str(),
      self.delete_article.as_str(),
    ]
  }
}

const SEQUENCE_NAME: &str = "articles";

static SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS articles (
  id INTEGER PRIMARY KEY,
  title TEXT NOT NULL,
  "date" TEXT NOT NULL,
  body TEXT NOT NULL,
  tags TEXT[] NOT NULL DEFAULT '{}'
);
CREATE INDEX IF NOT EXISTS articles_date_idx ON articles("date");
CREATE TABLE IF NOT EXISTS article_sequence (
  name TEXT PRIMARY KEY,
  value INTEGER NOT NULL
);
"#;

// Bumps the counter row in one statement; never falls behind ids already stored.
static NEXT_ID: &str = r#"
INSERT INTO article_sequence(name, value)
  VALUES($1, (SELECT COALESCE(MAX(id), 0) + 1 FROM articles))
ON CONFLICT (name) DO UPDATE
  SET value = GREATEST(article_sequence.value, (SELECT COALESCE(MAX(id), 0) FROM articles)) + 1
RETURNING value
"#;

fn article_from_row(row: &Row) -> Result<Article> {
  Ok(Article {
    id: row.try_get(0)?,
    title: row.try_get(1)?,
    date: row.try_get(2)?,
    body: row.try_get(3)?,
    tags: row.try_get(4)?,
  })
}

/// Create the tables (when `init_schema` is set) and check that every article
/// statement prepares, on a connection that is closed again afterwards.
pub async fn setup_article_store(url: &str, init_schema: bool) -> Result<()> {
  let (cl, conn) = connect(url, NoTls).await?;
  let conn = actix_rt::spawn(async move {
    if let Err(e) = conn.await {
      info!("article store setup connection error: {}", e);
    }
  });

  if init_schema {
    info!("Creating article store schema.");
    cl.batch_execute(SCHEMA).await?;
  }
  for query in ARTICLE_QUERIES.all().iter() {
    cl.prepare(query).await.map_err(|err| {
      error!("Postgres prepare error: {}, query=[[{}]]", err, query);
      err
    })?;
  }

  // The connection task ends once the client is gone.
  drop(cl);
  if let Err(e) = conn.await {
    debug!("article store setup task: {}", e);
  }
  Ok(())
}

/// Article store backed by a postgres table with a `TEXT[]` tags column.
pub struct PgArticleStore {
  find_duplicate: VersionedStatement,
  find_tag_on_date: VersionedStatement,
  article_by_id: VersionedStatement,
  next_id: VersionedStatement,
  store_article: VersionedStatement,
  delete_article: VersionedStatement,
}

impl PgArticleStore {
  pub fn new(url: &str) -> Self {
    let cl = SharedClient::new(url);
    let queries = &*ARTICLE_QUERIES;

    Self {
      find_duplicate: VersionedStatement::new(cl.clone(), &queries.find_duplicate),
      find_tag_on_date: VersionedStatement::new(cl.clone(), &queries.find_tag_on_date),
      article_by_id: VersionedStatement::new(cl.clone(), &queries.article_by_id),
      next_id: VersionedStatement::new(cl.clone(), NEXT_ID),
      store_article: VersionedStatement::new(cl.clone(), &queries.store_article),
      delete_article: VersionedStatement::new(cl, &queries.delete_article),
    }
  }
}

#[async_trait(?Send)]
impl ArticleStore for PgArticleStore {
  async fn find_duplicate(&self, payload: &ArticlePayload) -> Result<Option<Article>> {
    let row = self.find_duplicate.query_opt(&[
      &payload.date, &payload.title, &payload.body, &payload.tags,
    ]).await?;
    row.as_ref().map(article_from_row).transpose()
  }

  async fn find_tag_on_date(&self, tag: &str, date: &str) -> Result<Vec<Article>> {
    let rows = self.find_tag_on_date.query(&[&date, &tag]).await?;
    rows.iter().map(article_from_row).collect()
  }

  async fn find_by_id(&self, id: i32) -> Result<Option<Article>> {
    let row = self.article_by_id.query_opt(&[&id]).await?;
    row.as_ref().map(article_from_row).transpose()
  }

  async fn next_id(&self) -> Result<i32> {
    let row = self.next_id.query_one(&[&SEQUENCE_NAME]).await?;
    Ok(row.try_get(0)?)
  }

  async fn insert(&self, article: &Article) -> Result<()> {
    self.store_article.execute(&[
      &article.id, &article.title, &article.date, &article.body, &article.tags,
    ]).await?;
    Ok(())
  }

  async fn delete_by_id(&self, id: i32) -> Result<bool> {
    Ok(self.delete_article.execute(&[&id]).await? > 0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn queries_use_quoted_date() {
    let queries = ArticleQueries::build();
    assert_eq!(queries.find_tag_on_date,
      r#"SELECT id, title, "date", body, tags FROM articles WHERE "date" = $1 AND $2 = ANY(tags) ORDER BY id"#);
    assert!(queries.find_duplicate.ends_with("tags && $4 ORDER BY id LIMIT 1"));
    assert_eq!(queries.all().len(), 6);
  }
}
