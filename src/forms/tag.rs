use serde::{Deserialize, Serialize};

use crate::error::*;

/// Path segments of `/tag/{tagName}/{date}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagDatePath {
  #[serde(rename = "tagName")]
  pub tag_name: String,
  pub date: String,
}

impl TagDatePath {
  /// Stored form of the `YYYYMMDD` path date.
  pub fn store_date(&self) -> Result<String> {
    store_date(&self.date)
  }
}

/// Split an 8 character `YYYYMMDD` segment into `YYYY-MM-DD`.
///
/// Only the length is checked: "20229999" is accepted as "2022-99-99".
pub fn store_date(segment: &str) -> Result<String> {
  let chars: Vec<char> = segment.chars().collect();
  if chars.len() != 8 {
    return Err(Error::ValidationFailure(format!("invalid date entered: {:?}", segment)));
  }
  let year: String = chars[..4].iter().collect();
  let month: String = chars[4..6].iter().collect();
  let day: String = chars[6..].iter().collect();
  Ok(format!("{}-{}-{}", year, month, day))
}
