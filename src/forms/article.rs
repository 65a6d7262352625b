use serde::{Deserialize, Deserializer, Serialize};

use crate::models::Article;

/// Article as sent by clients on insert and delete.
/// Any `id` in the request is ignored, missing or `null` fields are empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ArticlePayload {
  #[serde(deserialize_with = "null_as_default")]
  pub title: String,
  #[serde(deserialize_with = "null_as_default")]
  pub date: String,
  #[serde(deserialize_with = "null_as_default")]
  pub body: String,
  #[serde(deserialize_with = "null_as_default")]
  pub tags: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ArticlePayload {
  pub fn into_article(self, id: i32) -> Article {
    Article {
      id,
      title: self.title,
      date: self.date,
      body: self.body,
      tags: self.tags,
    }
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedArticle {
  pub id: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedArticle {
  pub deleted: bool,
}
