use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::*;
use crate::models::Article;
use crate::forms::article::ArticlePayload;

use super::{ArticleMatch, ArticleStore};

#[derive(Debug, Default)]
struct Collection {
  /// Kept in insertion order.
  articles: Vec<Article>,
  /// Last id handed out by `next_id`.
  sequence: i32,
}

/// In-process article store.  Clones share the same collection, so one
/// instance can back every server worker.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Collection>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Default::default()
  }

  #[cfg(test)]
  pub(crate) fn len(&self) -> Result<usize> {
    Ok(self.lock()?.articles.len())
  }

  #[cfg(test)]
  pub(crate) fn is_empty(&self) -> Result<bool> {
    Ok(self.len()? == 0)
  }

  fn lock(&self) -> Result<MutexGuard<'_, Collection>> {
    self.inner.lock()
      .map_err(|_| Error::ConnectionFailure("memory store lock poisoned".to_string()))
  }
}

#[async_trait(?Send)]
impl ArticleStore for MemoryStore {
  async fn find_duplicate(&self, payload: &ArticlePayload) -> Result<Option<Article>> {
    let filter = ArticleMatch::duplicate_of(payload);
    Ok(self.lock()?.articles.iter()
      .find(|article| filter.matches(article))
      .cloned())
  }

  async fn find_tag_on_date(&self, tag: &str, date: &str) -> Result<Vec<Article>> {
    let filter = ArticleMatch::tag_on_date(tag, date);
    Ok(self.lock()?.articles.iter()
      .filter(|article| filter.matches(article))
      .cloned()
      .collect())
  }

  async fn find_by_id(&self, id: i32) -> Result<Option<Article>> {
    Ok(self.lock()?.articles.iter()
      .find(|article| article.id == id)
      .cloned())
  }

  async fn next_id(&self) -> Result<i32> {
    let mut collection = self.lock()?;
    let max_id = collection.articles.iter().map(|a| a.id).max().unwrap_or(0);
    collection.sequence = collection.sequence.max(max_id) + 1;
    Ok(collection.sequence)
  }

  async fn insert(&self, article: &Article) -> Result<()> {
    let mut collection = self.lock()?;
    if collection.articles.iter().any(|a| a.id == article.id) {
      return Err(Error::PersistenceFailure(
        format!("duplicate key error, id {}", article.id)));
    }
    collection.articles.push(article.clone());
    Ok(())
  }

  async fn delete_by_id(&self, id: i32) -> Result<bool> {
    let mut collection = self.lock()?;
    let before = collection.articles.len();
    collection.articles.retain(|article| article.id != id);
    Ok(collection.articles.len() < before)
  }
}
