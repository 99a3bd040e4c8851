use actix_web::{
    http::header::ContentType,
    web::{self, Json},
    HttpRequest, HttpResponse,
};
use serde::Serialize;
use serde_json::Value;
use tracing::*;

use crate::{
    beszel::types::SystemRecord,
    server::{
        error::{Error, Result, RENDER_FAILED_FRAGMENT},
        manager::AppState,
    },
    widget,
};

pub const WIDGET_HTML_PATH: &str = "/widget-html";

#[derive(Debug, Serialize)]
pub struct WidgetResponse {
    pub html: String,
    pub timestamp: String,
    pub systems_count: usize,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
    pub beszel_url: String,
    pub reload_interval: u64,
}

#[derive(Debug, Serialize)]
pub struct Info {
    pub name: String,
    pub version: String,
    pub authors: String,
}

fn timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}

/// Absolute URL of `path` as seen by the client. Only used when the fragment is embedded on another origin.
fn absolute_url(req: &HttpRequest, path: &str) -> String {
    let connection = req.connection_info();
    format!("{}://{}{path}", connection.scheme(), connection.host())
}

/// Raw systems listing as returned by Beszel
pub async fn systems(state: web::Data<AppState>) -> Result<Json<Value>> {
    let payload = state
        .beszel
        .systems()
        .await
        .map_err(|error| Error::json(&error))?;

    Ok(Json(payload))
}

/// Rendered widget wrapped in JSON, for dashboards that inject the fragment themselves
pub async fn widget(req: HttpRequest, state: web::Data<AppState>) -> Result<Json<WidgetResponse>> {
    let payload = state
        .beszel
        .systems()
        .await
        .map_err(|error| Error::widget_json(&error))?;

    let records = SystemRecord::list_from_payload(&payload);
    let html = widget::render(
        &records,
        &state.display,
        &absolute_url(&req, WIDGET_HTML_PATH),
    )
    .map_err(|error| {
        error!("Failed to render widget: {error}");
        Error::WidgetJson(RENDER_FAILED_FRAGMENT.to_string())
    })?;

    Ok(Json(WidgetResponse {
        html,
        timestamp: timestamp(),
        systems_count: records.len(),
    }))
}

/// Rendered widget as a bare HTML fragment
pub async fn widget_html(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let payload = state
        .beszel
        .systems()
        .await
        .map_err(|error| Error::html(&error))?;

    let records = SystemRecord::list_from_payload(&payload);
    // Polls its own path, relative to the page
    let html = widget::render(&records, &state.display, req.path())
        .map_err(|error| {
            error!("Failed to render widget: {error}");
            Error::Html(RENDER_FAILED_FRAGMENT.to_string())
        })?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(html))
}

pub async fn health(state: web::Data<AppState>) -> Json<Health> {
    Json(Health {
        status: "healthy",
        timestamp: timestamp(),
        beszel_url: state.beszel_url.clone(),
        reload_interval: state.display.reload_interval,
    })
}

/// Provide information about the running service
pub async fn info() -> Json<Info> {
    Json(Info {
        name: env!("CARGO_PKG_NAME").into(),
        version: env!("CARGO_PKG_VERSION").into(),
        authors: env!("CARGO_PKG_AUTHORS").into(),
    })
}
