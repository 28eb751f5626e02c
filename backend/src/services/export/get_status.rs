use crate::job_controller::state::JobsState;
use actix_web::{web, HttpResponse, Responder};

pub(crate) async fn process(task_id: web::Path<String>, state: web::Data<JobsState>) -> impl Responder {
    let task_id = task_id.into_inner();
    match state.status(&task_id).await {
        Some(status) => HttpResponse::Ok().json(status.to_export_status(&task_id)),
        None => HttpResponse::NotFound().json(serde_json::json!({ "msg": "Task not found" })),
    }
}
