use crate::error::AppError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub status: TaskStatus,
    pub user_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
}

/// Encoded on the wire as `0` (pending) and `1` (done).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskStatus {
    Pending,
    Done,
}

impl TaskStatus {
    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Done,
            Self::Done => Self::Pending,
        }
    }

    pub fn is_done(self) -> bool {
        self == Self::Done
    }
}

impl TryFrom<u8> for TaskStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Done),
            other => Err(format!("unknown task status {other}")),
        }
    }
}

impl From<TaskStatus> for u8 {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Pending => 0,
            TaskStatus::Done => 1,
        }
    }
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub status: TaskStatus,
    pub user_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
}

/// Response of `POST /tasks`, before the server-assigned id is checked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedTask {
    #[serde(default)]
    pub id: Option<u64>,
    pub title: String,
    pub status: TaskStatus,
    pub user_id: u64,
    #[serde(default)]
    pub category_id: Option<u64>,
}

impl CreatedTask {
    pub fn into_task(self) -> Result<Task, AppError> {
        let id = match self.id {
            Some(id) if id > 0 => id,
            _ => return Err(AppError::invalid_data("server did not return a task id")),
        };

        Ok(Task {
            id,
            title: self.title,
            status: self.status,
            user_id: self.user_id,
            category_id: self.category_id,
        })
    }
}

/// Body of `PATCH /tasks/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusPatch {
    pub status: TaskStatus,
}

/// Raw values typed into the creation form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub user_id: String,
    pub category_id: String,
}

impl TaskForm {
    pub fn new<T, U>(title: T, user_id: U) -> Self
    where
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            title: title.into(),
            user_id: user_id.into(),
            category_id: String::new(),
        }
    }

    pub fn with_category<C: Into<String>>(mut self, category_id: C) -> Self {
        self.category_id = category_id.into();
        self
    }

    pub fn validate(&self) -> Result<NewTask, AppError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_input("Enter a task title"));
        }

        let user_id = parse_positive_id(&self.user_id)
            .ok_or_else(|| AppError::invalid_input("Enter a valid user ID"))?;

        let category_id = if self.category_id.trim().is_empty() {
            None
        } else {
            Some(
                parse_positive_id(&self.category_id)
                    .ok_or_else(|| AppError::invalid_input("Enter a valid category ID"))?,
            )
        };

        Ok(NewTask {
            title: title.to_string(),
            status: TaskStatus::Pending,
            user_id,
            category_id,
        })
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.user_id.clear();
        self.category_id.clear();
    }
}

fn parse_positive_id(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|value| *value >= 1)
}
