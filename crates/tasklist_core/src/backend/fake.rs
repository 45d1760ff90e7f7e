use crate::backend::TaskBackend;
use crate::error::AppError;
use crate::model::{CreatedTask, NewTask, Task, TaskStatus};
use std::cell::RefCell;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Create(serde_json::Value),
    UpdateStatus(u64, TaskStatus),
    Delete(u64),
}

/// Replays queued responses per endpoint and records every call made.
#[derive(Default)]
pub struct ScriptedBackend {
    lists: RefCell<VecDeque<Result<Vec<Task>, AppError>>>,
    creates: RefCell<VecDeque<Result<serde_json::Value, AppError>>>,
    updates: RefCell<VecDeque<Result<(), AppError>>>,
    deletes: RefCell<VecDeque<Result<(), AppError>>>,
    calls: RefCell<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn push_list(&self, result: Result<Vec<Task>, AppError>) {
        self.lists.borrow_mut().push_back(result);
    }

    pub fn push_create(&self, result: Result<serde_json::Value, AppError>) {
        self.creates.borrow_mut().push_back(result);
    }

    pub fn push_update(&self, result: Result<(), AppError>) {
        self.updates.borrow_mut().push_back(result);
    }

    pub fn push_delete(&self, result: Result<(), AppError>) {
        self.deletes.borrow_mut().push_back(result);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn unscripted(endpoint: &str) -> AppError {
        AppError::connectivity(format!("no scripted response for {endpoint}"))
    }
}

impl TaskBackend for ScriptedBackend {
    fn list(&self) -> Result<Vec<Task>, AppError> {
        self.calls.borrow_mut().push(Call::List);
        self.lists
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted("GET /tasks")))
    }

    fn create(&self, task: &NewTask) -> Result<CreatedTask, AppError> {
        let body = serde_json::to_value(task).map_err(|err| AppError::invalid_data(err.to_string()))?;
        self.calls.borrow_mut().push(Call::Create(body));
        let response = self
            .creates
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted("POST /tasks")))?;
        serde_json::from_value(response).map_err(|err| AppError::invalid_data(err.to_string()))
    }

    fn update_status(&self, id: u64, status: TaskStatus) -> Result<(), AppError> {
        self.calls.borrow_mut().push(Call::UpdateStatus(id, status));
        self.updates
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted("PATCH /tasks/{id}")))
    }

    fn delete(&self, id: u64) -> Result<(), AppError> {
        self.calls.borrow_mut().push(Call::Delete(id));
        self.deletes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted("DELETE /tasks/{id}")))
    }
}
