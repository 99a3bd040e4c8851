use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

use crate::{beszel, widget};

pub const AUTH_FAILED: &str = "Failed to obtain authentication token";
pub const FETCH_FAILED: &str = "Failed to fetch systems data";
pub const AUTH_FAILED_FRAGMENT: &str = "Failed to authenticate with Beszel";
pub const RENDER_FAILED_FRAGMENT: &str = "Failed to render the systems widget";

pub type Result<T> = actix_web::Result<T, Error>;

/// Endpoint failures. Each variant carries a short message and selects the response shape,
/// upstream details are only ever logged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `{"error": message}`
    #[error("{0}")]
    Json(String),

    /// `{"html": error fragment}`
    #[error("{0}")]
    WidgetJson(String),

    /// Bare HTML error fragment
    #[error("{0}")]
    Html(String),
}

impl Error {
    pub fn json(error: &beszel::error::Error) -> Self {
        Self::Json(
            match error {
                beszel::error::Error::Auth(_) => AUTH_FAILED,
                beszel::error::Error::Fetch(_) => FETCH_FAILED,
            }
            .to_string(),
        )
    }

    pub fn widget_json(error: &beszel::error::Error) -> Self {
        Self::WidgetJson(fragment_message(error).to_string())
    }

    pub fn html(error: &beszel::error::Error) -> Self {
        Self::Html(fragment_message(error).to_string())
    }
}

fn fragment_message(error: &beszel::error::Error) -> &'static str {
    match error {
        beszel::error::Error::Auth(_) => AUTH_FAILED_FRAGMENT,
        beszel::error::Error::Fetch(_) => FETCH_FAILED,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            Self::Json(message) => response.json(json!({ "error": message })),
            Self::WidgetJson(message) => {
                response.json(json!({ "html": widget::render_error(message) }))
            }
            Self::Html(message) => response
                .content_type(actix_web::http::header::ContentType::html())
                .body(widget::render_error(message)),
        }
    }
}
