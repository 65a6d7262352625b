use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Most recent article ids listed in a tag/date view.
pub const VIEW_ARTICLE_LIMIT: usize = 10;

/// A stored article.  `id` is assigned by the store, never by the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
  pub id: i32,
  pub title: String,
  pub date: String,
  pub body: String,
  pub tags: Vec<String>,
}

/// Summary of the articles carrying `tag` on one date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleTagDateView {
  pub tag: String,
  pub count: usize,
  pub articles: Vec<String>,
  pub related_tags: Vec<String>,
}

impl ArticleTagDateView {
  /// Build the view from matches in store order (oldest first).
  ///
  /// "Newest" is taken to be the tail of `matches`, which only holds while the
  /// store returns articles in insertion order.
  /// Returns `None` when nothing matched.
  pub fn build(tag: &str, matches: &[Article]) -> Option<Self> {
    if matches.is_empty() {
      return None;
    }

    let articles = matches.iter().rev()
      .take(VIEW_ARTICLE_LIMIT)
      .map(|article| article.id.to_string())
      .collect();

    let mut seen = HashSet::new();
    let related_tags = matches.iter()
      .flat_map(|article| article.tags.iter())
      .filter(|other| other.as_str() != tag)
      .filter(|other| seen.insert(other.as_str()))
      .cloned()
      .collect();

    Some(Self {
      tag: tag.to_string(),
      count: matches.len(),
      articles,
      related_tags,
    })
  }
}
