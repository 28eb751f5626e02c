use crate::auth;
use crate::job_controller::state::{CancelOutcome, JobsState};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::model::task::TaskStatus;
use log::info;

pub(crate) async fn process(
    req: HttpRequest,
    id: web::Path<String>,
    state: web::Data<JobsState>,
) -> impl Responder {
    if let Err(unauthorized) = auth::require_bearer(&req) {
        return unauthorized;
    }
    let id = id.into_inner();
    match state.cancel(&id).await {
        CancelOutcome::Cancelled => {
            info!("task {} cancelled", id);
            HttpResponse::Ok().json(serde_json::json!({
                "task_id": id,
                "status": TaskStatus::Cancelled.as_str(),
            }))
        }
        CancelOutcome::AlreadyFinished(status) => HttpResponse::Ok().json(serde_json::json!({
            "task_id": id,
            "status": status.task_status().as_str(),
            "msg": "Task already finished",
        })),
        CancelOutcome::NotFound => {
            HttpResponse::NotFound().json(serde_json::json!({ "msg": "Task not found" }))
        }
    }
}
