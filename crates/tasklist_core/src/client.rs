use crate::backend::TaskBackend;
use crate::error::AppError;
use crate::model::{StatusFilter, Task, TaskForm, TaskStatus};
use crate::notify::{Toast, ToastSlot};
use crate::state::{ClientState, ConnectionState, LoadState};
use crate::view::TaskView;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Ask before deleting a task.
    pub confirm_delete: bool,
    /// Re-render everything after a failed toggle instead of only reverting the card.
    pub rerender_on_toggle_failure: bool,
    pub exit_animation: Duration,
    pub filter_settle: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            confirm_delete: true,
            rerender_on_toggle_failure: true,
            exit_animation: Duration::from_millis(260),
            filter_settle: Duration::from_millis(300),
        }
    }
}

/// Work the rendering adapter has to carry out, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Re-render the whole view once `after` has elapsed.
    Render { after: Duration },
    /// Update one card's badge and the counters without touching list membership.
    PatchCard { id: u64, status: TaskStatus },
    RemovalCue { id: u64, active: bool },
    Toast(Toast),
}

impl Effect {
    pub fn render_now() -> Self {
        Self::Render {
            after: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Loaded { count: usize },
    Created(Task),
    Deleted { id: u64 },
    StatusChanged { id: u64, status: TaskStatus },
    /// The remote call failed; local state is back where it was.
    Failed(AppError),
    /// The user declined the confirmation prompt.
    Cancelled,
}

impl Outcome {
    pub fn failure(&self) -> Option<&AppError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

pub trait Confirmer {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirmer for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub struct AlwaysConfirm;

impl Confirmer for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

pub const DELETE_PROMPT: &str = "Delete this task?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimisticOp {
    ToggleStatus { id: u64 },
    Delete { id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applied {
    Status { from: TaskStatus, to: TaskStatus },
    RemovalCue,
}

/// A local change that has been applied and awaits the server's verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending mutation must be settled"]
pub struct PendingMutation {
    id: u64,
    applied: Applied,
}

impl PendingMutation {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn target_status(&self) -> Option<TaskStatus> {
        match self.applied {
            Applied::Status { to, .. } => Some(to),
            Applied::RemovalCue => None,
        }
    }

    pub fn send<B: TaskBackend + ?Sized>(&self, backend: &B) -> Result<(), AppError> {
        match self.applied {
            Applied::Status { to, .. } => backend.update_status(self.id, to),
            Applied::RemovalCue => backend.delete(self.id),
        }
    }
}

/// View-model of one task list session, kept in sync with the remote collection.
#[derive(Debug, Default)]
pub struct TaskListClient {
    state: ClientState,
    options: ClientOptions,
    effects: Vec<Effect>,
    toast: ToastSlot,
}

impl TaskListClient {
    pub fn new(options: ClientOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn filter(&self) -> StatusFilter {
        self.state.filter
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn view(&self) -> TaskView {
        TaskView::derive(&self.state)
    }

    pub fn toast_slot(&self) -> &ToastSlot {
        &self.toast
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn load<B: TaskBackend + ?Sized>(&mut self, backend: &B) -> Outcome {
        self.state.load_state = LoadState::Loading;
        self.state.connection = ConnectionState::Checking;

        match backend.list() {
            Ok(tasks) => {
                self.state.replace_tasks(tasks);
                let count = self.state.tasks.len();
                self.state.load_state = LoadState::Loaded;
                self.state.connection = ConnectionState::Online { loaded: count };
                tracing::info!(count, "loaded tasks");
                self.effects.push(Effect::render_now());
                Outcome::Loaded { count }
            }
            Err(err) => {
                tracing::warn!(error = %err, "initial load failed");
                self.state.replace_tasks(Vec::new());
                self.state.load_state = LoadState::Unavailable;
                self.state.connection = ConnectionState::Offline;
                self.effects.push(Effect::render_now());
                Outcome::Failed(err)
            }
        }
    }

    /// Reloads the collection, keeping the current cache if the server cannot be reached.
    pub fn refresh<B: TaskBackend + ?Sized>(&mut self, backend: &B) -> Outcome {
        match backend.list() {
            Ok(tasks) => {
                self.state.replace_tasks(tasks);
                let count = self.state.tasks.len();
                self.state.load_state = LoadState::Loaded;
                self.state.connection = ConnectionState::Online { loaded: count };
                self.effects.push(Effect::render_now());
                Outcome::Loaded { count }
            }
            Err(err) => {
                tracing::warn!(error = %err, "refresh failed");
                self.show_toast(Toast::error("Failed to load tasks"));
                Outcome::Failed(err)
            }
        }
    }

    pub fn create<B: TaskBackend + ?Sized>(
        &mut self,
        backend: &B,
        form: &mut TaskForm,
    ) -> Result<Outcome, AppError> {
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(err) => {
                self.show_toast(Toast::error(err.message()));
                return Err(err);
            }
        };

        let created = backend.create(&draft).and_then(|created| created.into_task());
        let task = match created {
            Ok(task) => task,
            Err(err) => {
                tracing::warn!(error = %err, title = %draft.title, "create failed");
                self.show_toast(Toast::error(format!("Error: {}", err.message())));
                return Ok(Outcome::Failed(err));
            }
        };

        tracing::debug!(id = task.id, "created task");
        self.state.insert_front(task.clone());
        form.clear();
        if !self.state.filter.matches(TaskStatus::Pending) {
            self.state.filter = StatusFilter::All;
        }
        self.effects.push(Effect::render_now());
        self.show_toast(Toast::success("Task added"));
        Ok(Outcome::Created(task))
    }

    pub fn delete<B, C>(&mut self, backend: &B, id: u64, confirmer: &C) -> Result<Outcome, AppError>
    where
        B: TaskBackend + ?Sized,
        C: Confirmer + ?Sized,
    {
        self.ensure_known(id)?;
        if self.options.confirm_delete && !confirmer.confirm(DELETE_PROMPT) {
            return Ok(Outcome::Cancelled);
        }

        let pending = self.begin(OptimisticOp::Delete { id })?;
        let result = pending.send(backend);
        Ok(self.settle(pending, result))
    }

    pub fn toggle_status<B: TaskBackend + ?Sized>(
        &mut self,
        backend: &B,
        id: u64,
    ) -> Result<Outcome, AppError> {
        let pending = self.begin(OptimisticOp::ToggleStatus { id })?;
        let result = pending.send(backend);
        Ok(self.settle(pending, result))
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.state.filter = filter;
        self.effects.push(Effect::render_now());
    }

    /// Applies `op` to the cache before the server has answered.
    pub fn begin(&mut self, op: OptimisticOp) -> Result<PendingMutation, AppError> {
        match op {
            OptimisticOp::ToggleStatus { id } => {
                let task = self.known_mut(id)?;
                let from = task.status;
                let to = from.toggled();
                task.status = to;
                self.effects.push(Effect::PatchCard { id, status: to });
                Ok(PendingMutation {
                    id,
                    applied: Applied::Status { from, to },
                })
            }
            OptimisticOp::Delete { id } => {
                self.ensure_known(id)?;
                self.state.removing.insert(id);
                self.effects.push(Effect::RemovalCue { id, active: true });
                Ok(PendingMutation {
                    id,
                    applied: Applied::RemovalCue,
                })
            }
        }
    }

    /// Commits or rolls back a mutation started with [`TaskListClient::begin`].
    ///
    /// Settling is unordered: when two mutations of the same task race, the
    /// one settled last decides the local state.
    pub fn settle(&mut self, pending: PendingMutation, result: Result<(), AppError>) -> Outcome {
        let id = pending.id;
        match (pending.applied, result) {
            (Applied::Status { to, .. }, Ok(())) => {
                let message = match to {
                    TaskStatus::Done => "Marked as done",
                    TaskStatus::Pending => "Moved back to pending",
                };
                self.show_toast(Toast::success(message));
                self.schedule_filter_settle();
                Outcome::StatusChanged { id, status: to }
            }
            (Applied::Status { from, .. }, Err(err)) => {
                tracing::warn!(id, error = %err, "status update failed, rolling back");
                if let Some(task) = self.state.task_mut(id) {
                    task.status = from;
                }
                if self.options.rerender_on_toggle_failure {
                    self.effects.push(Effect::render_now());
                } else {
                    self.effects.push(Effect::PatchCard { id, status: from });
                }
                self.show_toast(Toast::error("Could not update status"));
                self.schedule_filter_settle();
                Outcome::Failed(err)
            }
            (Applied::RemovalCue, Ok(())) => {
                self.state.removing.remove(&id);
                self.state.remove(id);
                self.effects.push(Effect::Render {
                    after: self.options.exit_animation,
                });
                self.show_toast(Toast::success("Task deleted"));
                Outcome::Deleted { id }
            }
            (Applied::RemovalCue, Err(err)) => {
                tracing::warn!(id, error = %err, "delete failed, restoring card");
                self.state.removing.remove(&id);
                self.effects.push(Effect::RemovalCue { id, active: false });
                self.show_toast(Toast::error(format!("Delete failed: {}", err.message())));
                Outcome::Failed(err)
            }
        }
    }

    fn schedule_filter_settle(&mut self) {
        if self.state.filter != StatusFilter::All {
            self.effects.push(Effect::Render {
                after: self.options.filter_settle,
            });
        }
    }

    fn show_toast(&mut self, toast: Toast) {
        self.toast.show(toast.clone());
        self.effects.push(Effect::Toast(toast));
    }

    fn ensure_known(&mut self, id: u64) -> Result<(), AppError> {
        self.known_mut(id).map(|_| ())
    }

    fn known_mut(&mut self, id: u64) -> Result<&mut Task, AppError> {
        if self.state.task(id).is_none() {
            self.show_toast(Toast::error("Task not found"));
            return Err(AppError::invalid_input(format!("task {id} not found")));
        }
        self.state
            .task_mut(id)
            .ok_or_else(|| AppError::invalid_input(format!("task {id} not found")))
    }
}
