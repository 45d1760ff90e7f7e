use crate::error::AppError;
use crate::model::TaskStatus;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Done,
}

impl StatusFilter {
    pub fn matches(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status == TaskStatus::Pending,
            Self::Done => status == TaskStatus::Done,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All tasks",
            Self::Pending => "Active tasks",
            Self::Done => "Completed tasks",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" | "active" | "0" => Ok(Self::Pending),
            "done" | "completed" | "1" => Ok(Self::Done),
            other => Err(AppError::invalid_input(format!("unknown filter '{other}'"))),
        }
    }
}
