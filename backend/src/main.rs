mod auth;
mod config;
mod database;
mod job_controller;
mod services;

use crate::config::ServerConfig;
use crate::job_controller::state::{start_job_pruner, start_job_updater, JobsState};
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use tokio::sync::mpsc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = ServerConfig::from_env();

    database::init(&config.database_path).map_err(std::io::Error::other)?;
    std::fs::create_dir_all(&config.reports_dir)?;

    // Initialize job controller state
    let (tx, rx) = mpsc::channel(100);
    let jobs_state = JobsState::new(tx);

    let updater_state = jobs_state.clone();
    tokio::spawn(async move {
        start_job_updater(updater_state, rx).await;
    });
    tokio::spawn(start_job_pruner(jobs_state.clone(), config.job_retention));

    info!(
        "Export server running at http://{}:{} (database {}, reports in {})",
        config.host,
        config.port,
        config.database_path.display(),
        config.reports_dir.display()
    );

    let bind = (config.host.clone(), config.port);
    let config = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(1024 * 1024))
            .app_data(web::Data::new(jobs_state.clone()))
            .app_data(config.clone())
            .configure(services::configure)
    })
        .bind(bind)?
        .run()
        .await
}
