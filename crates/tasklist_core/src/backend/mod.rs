use crate::error::AppError;
use crate::model::{CreatedTask, NewTask, Task, TaskStatus};

#[cfg(test)]
pub(crate) mod fake;
mod http;

pub use http::{DEFAULT_API_URL, HttpBackend};

/// The remote `/tasks` collection.
///
/// Every method maps one REST call; any non-success outcome is an error and
/// implementations never retry.
pub trait TaskBackend {
    fn list(&self) -> Result<Vec<Task>, AppError>;

    fn create(&self, task: &NewTask) -> Result<CreatedTask, AppError>;

    fn update_status(&self, id: u64, status: TaskStatus) -> Result<(), AppError>;

    fn delete(&self, id: u64) -> Result<(), AppError>;
}

impl<B: TaskBackend + ?Sized> TaskBackend for &B {
    fn list(&self) -> Result<Vec<Task>, AppError> {
        (**self).list()
    }

    fn create(&self, task: &NewTask) -> Result<CreatedTask, AppError> {
        (**self).create(task)
    }

    fn update_status(&self, id: u64, status: TaskStatus) -> Result<(), AppError> {
        (**self).update_status(id, status)
    }

    fn delete(&self, id: u64) -> Result<(), AppError> {
        (**self).delete(id)
    }
}
