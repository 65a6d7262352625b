use log::*;

use actix_web::{
  get, post, delete, web, HttpResponse,
  http::header::LOCATION,
  Error
};

use crate::error::*;
use crate::app::*;
use crate::util::pretty_json;
use crate::forms::article::*;
use crate::db::ArticleRepository;

/// post new article
#[post("/articles")]
async fn store_article(
  repo: web::Data<ArticleRepository>,
  article: web::Json<ArticlePayload>,
) -> Result<HttpResponse, Error> {
  debug!("Article - new article: {:?}", article);
  let id = repo.insert(&article).await?;

  Ok(pretty_json(
    HttpResponse::Created().insert_header((LOCATION, format!("articles/{}", id))),
    &CreatedArticle { id },
  )?)
}

/// get article by id
#[get("/articles/{id}")]
async fn get_article(
  repo: web::Data<ArticleRepository>,
  id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
  let article = repo.fetch_by_id(id.into_inner()).await
    .map_err(|err| err.into_lookup_failure())?;

  Ok(pretty_json(&mut HttpResponse::Ok(), &article)?)
}

/// delete the article matching the posted one
#[delete("/article")]
async fn delete_article(
  repo: web::Data<ArticleRepository>,
  article: web::Json<ArticlePayload>,
) -> Result<HttpResponse, Error> {
  debug!("Article - delete article: {:?}", article);
  let deleted = repo.delete(&article).await?;

  Ok(pretty_json(&mut HttpResponse::Ok(), &DeletedArticle { deleted })?)
}

/// delete an article by id
#[delete("/articles/{id}")]
async fn delete_article_by_id(
  repo: web::Data<ArticleRepository>,
  id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
  let deleted = repo.delete_by_id(id.into_inner()).await?;

  Ok(pretty_json(&mut HttpResponse::Ok(), &DeletedArticle { deleted })?)
}

#[derive(Debug, Clone, Default)]
pub struct ArticleService {
  pub allow_delete_by_id: bool,
}

impl super::Service for ArticleService {
  fn load_app_config(&mut self, config: &AppConfig) -> Result<()> {
    self.allow_delete_by_id = config.get_bool("article.allow_delete_by_id")?.unwrap_or(true);
    Ok(())
  }

  fn web_config(&self, web: &mut web::ServiceConfig) {
    web
      .service(store_article)
      .service(get_article)
      .service(delete_article);
    if self.allow_delete_by_id {
      web.service(delete_article_by_id);
    }
  }
}

pub fn new_factory() -> ArticleService {
  Default::default()
}
