use log::*;

use crate::error::*;
use crate::models::*;
use crate::forms::article::*;

use crate::db::*;

/// Duplicate detection and id assignment on top of an `ArticleStore`.
///
/// Ids come from the store's own sequence, so several repositories (one per
/// worker, or one per process) never hand out the same id.
///
/// The duplicate check and the write are separate store calls: two concurrent
/// inserts of the same article can both pass the check and both be stored.
pub struct ArticleRepository {
  store: Box<dyn ArticleStore>,
}

impl ArticleRepository {
  pub fn new(store: Box<dyn ArticleStore>) -> Self {
    Self { store }
  }

  /// Store a new article and return its id.
  pub async fn insert(&self, payload: &ArticlePayload) -> Result<i32> {
    if let Some(existing) = self.store.find_duplicate(payload).await? {
      info!("Article already exists with id: {}", existing.id);
      return Err(Error::DuplicateArticle(existing.id));
    }

    let id = self.store.next_id().await?;
    let article = payload.clone().into_article(id);
    self.store.insert(&article).await.map_err(|err| match err {
      Error::PersistenceFailure(_) => err,
      err => Error::PersistenceFailure(err.to_string()),
    })?;

    info!("Added new article with id: {}", id);
    Ok(id)
  }

  pub async fn fetch_by_id(&self, id: i32) -> Result<Article> {
    match self.store.find_by_id(id).await? {
      Some(article) => {
        debug!("Retrieved article with id: {}", id);
        Ok(article)
      },
      None => Err(Error::NotFound(format!("failed to retrieve the article with id {}", id))),
    }
  }

  /// Articles on `date` tagged `tag`, oldest first.  No match is an empty list.
  pub async fn fetch_by_tag_and_date(&self, tag: &str, date: &str) -> Result<Vec<Article>> {
    self.store.find_tag_on_date(tag, date).await
  }

  /// Delete the article `payload` would be a duplicate of.
  pub async fn delete(&self, payload: &ArticlePayload) -> Result<bool> {
    let target = self.store.find_duplicate(payload).await?
      .ok_or_else(|| Error::NotFound("article not found in database".to_string()))?;
    self.delete_by_id(target.id).await
  }

  pub async fn delete_by_id(&self, id: i32) -> Result<bool> {
    if !self.store.delete_by_id(id).await? {
      return Err(Error::NotFound(format!("no article with id {}", id)));
    }
    info!("Removed the article with id: {}", id);
    Ok(true)
  }
}
