mod api;
mod app;
mod application;
mod config;
mod domain;
mod localization;
mod ui;
mod utils;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Cli;

fn main() -> iced::Result {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_filter)),
        )
        .init();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    info!(backend = %config.api.base_url, locale = ?config.locale, "starting");

    iced::application(
        move || app::GrabberApp::new(config.clone()),
        app::update,
        app::view,
    )
    .title(app::GrabberApp::title)
    .window_size((560.0, 720.0))
    .run()
}
