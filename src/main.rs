use std::sync::Arc;

use actix_web::web;
use anyhow::Context;
use tracing::*;

use beszel_widget_proxy::{
    beszel::{client::BeszelClient, manager::Manager},
    cli, logger,
    server::{self, manager::AppState},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // CLI should be started before logger to allow control over verbosity
    cli::manager::init();
    // Logger should start before everything else to register any log information
    logger::manager::init();

    let Some(credentials) = cli::manager::credentials() else {
        error!("BESZEL_EMAIL and BESZEL_PASSWORD must be configured");
        std::process::exit(1);
    };

    let beszel_url = cli::manager::beszel_url();
    let display_config = cli::manager::display_config();

    info!("Beszel URL: {beszel_url}");
    info!(
        "Redirect URL: {}",
        display_config.redirect_url.as_deref().unwrap_or("<disabled>")
    );
    info!("Auto-reload: {} seconds", display_config.reload_interval);

    let client = BeszelClient::try_new(&beszel_url)?;
    let state = web::Data::new(AppState {
        beszel: Manager::new(Arc::new(client), credentials),
        display: display_config,
        beszel_url,
    });

    let server_address = cli::manager::server_address();
    server::manager::run(&server_address, state)
        .await
        .with_context(|| format!("Failed starting web API at {server_address}"))
}
