use async_trait::async_trait;

use crate::error::*;
use crate::models::Article;
use crate::forms::article::ArticlePayload;

/// Article predicates evaluated by stores that scan their records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleMatch {
  /// Same date, title and body, sharing at least one tag.
  Duplicate {
    date: String,
    title: String,
    body: String,
    tags: Vec<String>,
  },
  /// Articles on `date` carrying `tag`.
  TagOnDate {
    tag: String,
    date: String,
  },
}

impl ArticleMatch {
  pub fn duplicate_of(payload: &ArticlePayload) -> Self {
    ArticleMatch::Duplicate {
      date: payload.date.clone(),
      title: payload.title.clone(),
      body: payload.body.clone(),
      tags: payload.tags.clone(),
    }
  }

  pub fn tag_on_date(tag: &str, date: &str) -> Self {
    ArticleMatch::TagOnDate {
      tag: tag.to_string(),
      date: date.to_string(),
    }
  }

  pub fn matches(&self, article: &Article) -> bool {
    match self {
      ArticleMatch::Duplicate { date, title, body, tags } => {
        article.date == *date && article.title == *title && article.body == *body
          && article.tags.iter().any(|tag| tags.contains(tag))
      },
      ArticleMatch::TagOnDate { tag, date } => {
        article.date == *date && article.tags.contains(tag)
      },
    }
  }
}

/// Client for the document store holding articles.
///
/// Results come back in store order, which is ascending id (insertion order).
#[async_trait(?Send)]
pub trait ArticleStore {
  /// First stored article that `payload` would duplicate.
  async fn find_duplicate(&self, payload: &ArticlePayload) -> Result<Option<Article>>;

  /// Every article on `date` carrying `tag`.
  async fn find_tag_on_date(&self, tag: &str, date: &str) -> Result<Vec<Article>>;

  async fn find_by_id(&self, id: i32) -> Result<Option<Article>>;

  /// Atomically take the next article id from the store-owned sequence.
  async fn next_id(&self) -> Result<i32>;

  async fn insert(&self, article: &Article) -> Result<()>;

  /// Returns `false` when no record had `id`.
  async fn delete_by_id(&self, id: i32) -> Result<bool>;
}

#[cfg(test)]
mod tests {
  use super::*;

  fn stored() -> Article {
    Article {
      id: 3,
      title: "ABC".into(),
      date: "2018-10-04".into(),
      body: "My ABC".into(),
      tags: vec!["aaa".into(), "bbb".into(), "ccc".into()],
    }
  }

  fn payload(tags: &[&str]) -> ArticlePayload {
    ArticlePayload {
      title: "ABC".into(),
      date: "2018-10-04".into(),
      body: "My ABC".into(),
      tags: tags.iter().map(|t| t.to_string()).collect(),
    }
  }

  #[test]
  fn duplicate_needs_one_shared_tag() {
    assert!(ArticleMatch::duplicate_of(&payload(&["zzz", "bbb"])).matches(&stored()));
    assert!(!ArticleMatch::duplicate_of(&payload(&["zzz"])).matches(&stored()));
    assert!(!ArticleMatch::duplicate_of(&payload(&[])).matches(&stored()));
  }

  #[test]
  fn duplicate_needs_exact_fields() {
    let mut other = payload(&["aaa"]);
    other.body = "My ABC ".into();
    assert!(!ArticleMatch::duplicate_of(&other).matches(&stored()));

    let mut other = payload(&["aaa"]);
    other.date = "2018-10-05".into();
    assert!(!ArticleMatch::duplicate_of(&other).matches(&stored()));
  }

  #[test]
  fn tag_on_date() {
    assert!(ArticleMatch::tag_on_date("ccc", "2018-10-04").matches(&stored()));
    assert!(!ArticleMatch::tag_on_date("ccc", "2018-10-05").matches(&stored()));
    assert!(!ArticleMatch::tag_on_date("nnn", "2018-10-04").matches(&stored()));
  }
}
