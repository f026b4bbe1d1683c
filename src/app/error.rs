use actix_web::{
  error::ResponseError,
  HttpResponse
};
use derive_more::Display;
use log::error;

// The error taxonomy the API surfaces. Validation messages are
// meant for the author filling the form, so those display in
// full. Database details only ever go to the logs, random
// internet people don't get to read them.
#[derive(Debug, Display)]
pub enum Error {
  #[display(fmt = "Database Error")]
  DatabaseError(String),
  #[display(fmt = "Forbidden: {}", _0)]
  Forbidden(String),
  #[display(fmt = "Not Found: {}", _0)]
  NotFound(String),
  #[display(fmt = "Bad Request (check request params)")]
  BadRequest(String),
  // Form validation messages, joined with newlines:
  #[display(fmt = "{}", _0)]
  ValidationError(String),
  #[display(fmt = "Too Many Requests")]
  TooManyRequests
}

impl ResponseError for Error {
  fn error_response(&self) -> HttpResponse {
    match self {
      Error::DatabaseError(_) =>
        HttpResponse::InternalServerError().body(self.to_string()),
      Error::Forbidden(_) => HttpResponse::Forbidden().body(self.to_string()),
      Error::NotFound(_) => HttpResponse::NotFound().body(self.to_string()),
      Error::BadRequest(_) | Error::ValidationError(_) =>
        HttpResponse::BadRequest().body(self.to_string()),
      Error::TooManyRequests =>
        HttpResponse::TooManyRequests().body(self.to_string())
    }
  }
}

// Most db functions return eyre Reports, this logs the real
// cause and hands back the sanitized variant.
pub fn map_db_error<E: std::fmt::Display>(e: E) -> Error {
  error!("Database error - {}", e);
  Error::DatabaseError(e.to_string())
}
