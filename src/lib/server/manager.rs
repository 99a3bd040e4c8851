use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing::*;
use tracing_actix_web::TracingLogger;

use super::pages;
use crate::{beszel, widget::DisplayConfig};

/// Shared by every worker, the token cache lives inside `beszel`.
pub struct AppState {
    pub beszel: beszel::manager::Manager,
    pub display: DisplayConfig,
    pub beszel_url: String,
}

// Start REST API server with the desired address
pub async fn run(server_address: &str, state: web::Data<AppState>) -> Result<(), std::io::Error> {
    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET"])
                    .allow_any_header()
                    .send_wildcard()
                    .max_age(3600),
            )
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind(server_address)?;

    info!("Server running at {server_address}");

    server.run().await
}

/// Register all routes on a `ServiceConfig`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/systems", web::get().to(pages::systems))
        .route("/widget", web::get().to(pages::widget))
        .route(pages::WIDGET_HTML_PATH, web::get().to(pages::widget_html))
        .route("/", web::get().to(pages::widget_html))
        .route("/health", web::get().to(pages::health))
        .route("/info", web::get().to(pages::info));
}
