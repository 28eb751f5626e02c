use actix_web::web;

pub mod export;
pub mod files;
pub mod tasks;


/// Registers every API scope on an app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(export::configure_routes())
        .service(files::configure_routes())
        .service(tasks::configure_routes());
}
