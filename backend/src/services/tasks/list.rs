use crate::job_controller::state::JobsState;
use actix_web::{web, HttpResponse, Responder};

pub(crate) async fn process(state: web::Data<JobsState>) -> impl Responder {
    HttpResponse::Ok().json(state.summaries().await)
}
