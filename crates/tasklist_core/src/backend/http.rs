use crate::backend::TaskBackend;
use crate::error::AppError;
use crate::model::{CreatedTask, NewTask, StatusPatch, Task, TaskStatus};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/tasks";

pub struct HttpBackend {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(AppError::invalid_input(format!(
                "api_url must be an http(s) URL, got '{base_url}'"
            )));
        }

        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Ok(Self {
            agent,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn task_url(&self, id: u64) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

impl TaskBackend for HttpBackend {
    fn list(&self) -> Result<Vec<Task>, AppError> {
        tracing::debug!(url = %self.base_url, "GET tasks");
        let response = self.agent.get(&self.base_url).call().map_err(call_error)?;
        response
            .into_json::<Vec<Task>>()
            .map_err(|err| AppError::invalid_data(format!("invalid task list: {err}")))
    }

    fn create(&self, task: &NewTask) -> Result<CreatedTask, AppError> {
        tracing::debug!(url = %self.base_url, title = %task.title, "POST task");
        let response = self
            .agent
            .post(&self.base_url)
            .send_json(task)
            .map_err(call_error)?;
        response
            .into_json::<CreatedTask>()
            .map_err(|err| AppError::invalid_data(format!("invalid created task: {err}")))
    }

    fn update_status(&self, id: u64, status: TaskStatus) -> Result<(), AppError> {
        let url = self.task_url(id);
        tracing::debug!(%url, ?status, "PATCH task status");
        self.agent
            .request("PATCH", &url)
            .send_json(StatusPatch { status })
            .map_err(call_error)?;
        Ok(())
    }

    fn delete(&self, id: u64) -> Result<(), AppError> {
        let url = self.task_url(id);
        tracing::debug!(%url, "DELETE task");
        self.agent.delete(&url).call().map_err(call_error)?;
        Ok(())
    }
}

fn call_error(err: ureq::Error) -> AppError {
    match err {
        ureq::Error::Status(code, _) => {
            AppError::operation_failed(format!("server returned {code}"))
        }
        ureq::Error::Transport(transport) => AppError::connectivity(transport.to_string()),
    }
}
