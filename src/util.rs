use serde::Serialize;

use actix_web::{
  http::header::CONTENT_TYPE,
  HttpResponse, HttpResponseBuilder,
};

use crate::error::*;

pub const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Indented JSON body, the form every success response uses.
pub fn pretty_json<T: Serialize>(builder: &mut HttpResponseBuilder, value: &T) -> Result<HttpResponse> {
  let body = serde_json::to_string_pretty(value)?;
  Ok(builder
    .insert_header((CONTENT_TYPE, JSON_UTF8))
    .body(body))
}
