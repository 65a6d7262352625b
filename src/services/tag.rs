use log::*;

use actix_web::{
  get, web, HttpResponse,
  Error
};

use crate::error::*;
use crate::app::*;
use crate::util::pretty_json;
use crate::models::*;
use crate::forms::tag::*;
use crate::db::ArticleRepository;

/// Summary of the articles carrying a tag on one date.
#[get("/tag/{tagName}/{date}")]
async fn articles_by_tag_and_date(
  repo: web::Data<ArticleRepository>,
  path: web::Path<TagDatePath>,
) -> Result<HttpResponse, Error> {
  let date = path.store_date()?;
  debug!("Tag - tag={:?}, date={}", path.tag_name, date);

  let matches = repo.fetch_by_tag_and_date(&path.tag_name, &date).await
    .map_err(|err| err.into_lookup_failure())?;

  let view = ArticleTagDateView::build(&path.tag_name, &matches).ok_or_else(|| {
    crate::error::Error::NotFound(
      format!("no articles tagged {:?} on {}", path.tag_name, date))
  })?;

  Ok(pretty_json(&mut HttpResponse::Ok(), &view)?)
}

#[derive(Debug, Clone, Default)]
pub struct TagService {
}

impl super::Service for TagService {
  fn load_app_config(&mut self, _config: &AppConfig) -> Result<()> {
    Ok(())
  }

  fn web_config(&self, web: &mut web::ServiceConfig) {
    web.service(articles_by_tag_and_date);
  }
}

pub fn new_factory() -> TagService {
  Default::default()
}
