use crate::model::{StatusFilter, Task};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Uninitialized,
    Loading,
    Loaded,
    /// The last load failed; stays until the next successful load.
    Unavailable,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Unknown,
    Checking,
    Online {
        loaded: usize,
    },
    Offline,
}

impl ConnectionState {
    pub fn banner(self) -> String {
        match self {
            Self::Unknown => String::new(),
            Self::Checking => "Connecting to server...".to_string(),
            Self::Online { loaded } => format!("Server is up, loaded {loaded} tasks"),
            Self::Offline => "Server unavailable".to_string(),
        }
    }
}

/// Everything the view is derived from.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClientState {
    pub tasks: Vec<Task>,
    pub filter: StatusFilter,
    pub load_state: LoadState,
    pub connection: ConnectionState,
    /// Cards whose exit cue is showing while a delete is in flight.
    pub removing: BTreeSet<u64>,
}

impl ClientState {
    pub fn task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub(crate) fn task_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    pub(crate) fn remove(&mut self, id: u64) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Replaces the cache wholesale, dropping repeated ids.
    pub(crate) fn replace_tasks(&mut self, tasks: Vec<Task>) {
        let mut seen = HashSet::with_capacity(tasks.len());
        let mut unique = Vec::with_capacity(tasks.len());
        for task in tasks {
            if seen.insert(task.id) {
                unique.push(task);
            } else {
                tracing::warn!(id = task.id, "server returned a duplicate task id, ignoring");
            }
        }

        self.tasks = unique;
        self.removing.clear();
    }

    pub(crate) fn insert_front(&mut self, task: Task) {
        self.remove(task.id);
        self.tasks.insert(0, task);
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientState, ConnectionState};
    use crate::model::{Task, TaskStatus};

    fn task(id: u64, title: &str) -> Task {
        Task {
            id,
            title: title.to_string(),
            status: TaskStatus::Pending,
            user_id: 1,
            category_id: None,
        }
    }

    #[test]
    fn replace_tasks_keeps_first_of_duplicate_ids() {
        let mut state = ClientState::default();
        state.removing.insert(9);
        state.replace_tasks(vec![task(1, "first"), task(2, "second"), task(1, "again")]);

        let titles: Vec<_> = state.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
        assert!(state.removing.is_empty());
    }

    #[test]
    fn insert_front_replaces_existing_id() {
        let mut state = ClientState::default();
        state.replace_tasks(vec![task(1, "one"), task(2, "two")]);
        state.insert_front(task(2, "two, renamed"));

        let ids: Vec<_> = state.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, [2, 1]);
        assert_eq!(state.task(2).unwrap().title, "two, renamed");
    }

    #[test]
    fn banner_reports_loaded_count() {
        assert_eq!(
            ConnectionState::Online { loaded: 3 }.banner(),
            "Server is up, loaded 3 tasks"
        );
        assert_eq!(ConnectionState::Offline.banner(), "Server unavailable");
    }
}
