//! Background task administration (`/tasks`).

use common::model::task::TaskSummary;
use serde_json::Value;

use crate::error::GatewayError;
use crate::gateway::{Gateway, Params};

#[derive(Clone)]
pub struct TaskService {
    gateway: Gateway,
}

impl TaskService {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<TaskSummary>, GatewayError> {
        self.gateway.get_json("/tasks", Params::new()).await
    }

    pub async fn cancel(&self, task_id: &str) -> Result<Value, GatewayError> {
        let path = format!("/tasks/{}/cancel", urlencoding::encode(task_id));
        self.gateway.get_json(&path, Params::new()).await
    }

    /// Queues a named task. `args` and `kwargs` travel in the query string;
    /// empty ones are left out.
    pub async fn run(
        &self,
        task_name: &str,
        args: Vec<Value>,
        kwargs: Params,
    ) -> Result<Value, GatewayError> {
        let mut params = Params::new();
        params.insert("task".to_string(), Value::String(task_name.to_string()));
        params.insert("args".to_string(), Value::Array(args));
        params.insert("kwargs".to_string(), Value::Object(kwargs));
        self.gateway.get_json("/tasks/run", params).await
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use serde_json::json;

    use super::*;
    use crate::gateway::mock::ScriptedTransport;
    use crate::session::MemorySession;

    fn service() -> (Rc<ScriptedTransport>, TaskService) {
        let transport = Rc::new(ScriptedTransport::new());
        let session = MemorySession::with_token("tok");
        session.update_search(|s| s.set_search_type(""));
        let gateway = Gateway::new("http://api.test/api", transport.clone(), Rc::new(session));
        (transport, TaskService::new(gateway))
    }

    #[tokio::test]
    async fn list_decodes_summaries() {
        let (transport, service) = service();
        transport.json(
            200,
            json!([{"id": "t1", "name": "export_user_history_csv", "status": "completed", "result": "/api/files/history_t1.csv"}]),
        );

        let tasks = service.list().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, "completed");
        assert_eq!(transport.urls(), vec!["http://api.test/api/tasks"]);
    }

    #[tokio::test]
    async fn cancel_targets_task_path() {
        let (transport, service) = service();
        transport.json(200, json!({"task_id": "t 9", "status": "cancelled"}));

        service.cancel("t 9").await.unwrap();
        assert_eq!(transport.urls(), vec!["http://api.test/api/tasks/t%209/cancel"]);
    }

    #[tokio::test]
    async fn run_encodes_args_and_kwargs() {
        let (transport, service) = service();
        transport.json(200, json!({"task_id": "t2"}));

        let mut kwargs = Params::new();
        kwargs.insert("channels".into(), json!(["email"]));
        service.run("send_user_reminder", vec![json!(7)], kwargs).await.unwrap();

        assert_eq!(
            transport.urls(),
            vec!["http://api.test/api/tasks/run?task=send_user_reminder&args=7&kwargs=%7B%22channels%22%3A%5B%22email%22%5D%7D"]
        );
    }

    #[tokio::test]
    async fn run_without_arguments_sends_only_task_name() {
        let (transport, service) = service();
        transport.json(200, json!({"task_id": "t3"}));

        service.run("nightly", vec![], Params::new()).await.unwrap();

        assert_eq!(transport.urls(), vec!["http://api.test/api/tasks/run?task=nightly"]);
    }
}
