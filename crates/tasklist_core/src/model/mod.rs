mod filter;
mod task;

pub use filter::StatusFilter;
pub use task::{CreatedTask, NewTask, StatusPatch, Task, TaskForm, TaskStatus};
