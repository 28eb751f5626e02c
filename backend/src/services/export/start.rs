//! `POST /api/user/export-csv`
//!
//! Registers the job as `Pending`, answers with its id straight away and
//! leaves the work to a spawned task. The task runs
//! [`history::export_history`] on the blocking pool and forwards its
//! progress callbacks to the job updater as `InProgress` updates.

use super::{history, EXPORT_JOB_NAME};
use crate::auth;
use crate::config::ServerConfig;
use crate::job_controller::state::{JobUpdate, JobsState};
use crate::services::files;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::jobs::JobStatus;
use common::model::export::TaskAccepted;
use common::requests::ExportCsvRequest;
use log::{info, warn};
use tokio::sync::mpsc;
use uuid::Uuid;

pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<JobsState>,
    config: web::Data<ServerConfig>,
    payload: web::Json<ExportCsvRequest>,
) -> impl Responder {
    if let Err(unauthorized) = auth::require_bearer(&req) {
        return unauthorized;
    }
    match schedule_export_job(state, config, payload.into_inner()).await {
        Ok(task_id) => HttpResponse::Ok().json(TaskAccepted { task_id }),
        Err(err) => HttpResponse::InternalServerError().body(err),
    }
}

async fn schedule_export_job(
    state: web::Data<JobsState>,
    config: web::Data<ServerConfig>,
    request: ExportCsvRequest,
) -> Result<String, String> {
    let task_id = Uuid::new_v4().to_string();
    state.register(&task_id, EXPORT_JOB_NAME).await;
    info!(
        "export {} scheduled (user {:?}, {:?}..{:?})",
        task_id, request.user_id, request.start_date, request.end_date
    );

    let tx = state.tx.clone();
    let database = config.database_path.clone();
    let reports_dir = config.reports_dir.clone();
    let job_id = task_id.clone();

    tokio::spawn(async move {
        let (progress_tx, mut progress_rx) = mpsc::channel::<u32>(16);

        let forward_tx = tx.clone();
        let forward_id = job_id.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(pct) = progress_rx.recv().await {
                let _ = forward_tx
                    .send(JobUpdate {
                        job_id: forward_id.clone(),
                        status: JobStatus::InProgress(pct),
                    })
                    .await;
            }
        });

        let blocking_id = job_id.clone();
        let handle = tokio::task::spawn_blocking(move || {
            history::export_history(&database, &reports_dir, &blocking_id, &request, |pct| {
                let _ = progress_tx.blocking_send(pct);
            })
        });

        let status = match handle.await {
            Ok(Ok(file_name)) => {
                info!("export {} written to {}", job_id, file_name);
                JobStatus::Completed(files::download_url(&file_name))
            }
            Ok(Err(e)) => {
                warn!("export {} failed: {}", job_id, e);
                JobStatus::Failed(e)
            }
            Err(e) => JobStatus::Failed(format!("Task join error: {}", e)),
        };

        // Progress must land before the terminal status.
        let _ = forwarder.await;
        let _ = tx.send(JobUpdate { job_id, status }).await;
    });

    Ok(task_id)
}
