//! Pure derivation of what the task list shows.
//!
//! Nothing here touches the cache; rendering the same state twice yields the
//! same view.

use crate::model::{StatusFilter, Task, TaskStatus};
use crate::state::{ClientState, LoadState};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskCard {
    pub id: u64,
    pub title: String,
    pub status: TaskStatus,
    pub user_id: u64,
    pub category_id: Option<u64>,
    pub badge: &'static str,
    pub toggle_hint: &'static str,
    pub removing: bool,
}

impl TaskCard {
    pub fn from_task(task: &Task, removing: bool) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            status: task.status,
            user_id: task.user_id,
            category_id: task.category_id,
            badge: badge(task.status),
            toggle_hint: toggle_hint(task.status),
            removing,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }

    pub fn meta(&self) -> Vec<String> {
        let mut chips = vec![format!("User {}", self.user_id)];
        if let Some(category_id) = self.category_id {
            chips.push(format!("Category {category_id}"));
        }
        chips.push(format!("#{}", self.id));
        chips
    }
}

pub fn badge(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "● Pending",
        TaskStatus::Done => "✓ Done",
    }
}

pub fn toggle_hint(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "Mark as done",
        TaskStatus::Done => "Mark as pending",
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub all: usize,
    pub done: usize,
    pub pending: usize,
}

impl Counts {
    pub fn of(tasks: &[Task]) -> Self {
        let done = tasks.iter().filter(|task| task.status.is_done()).count();
        Self {
            all: tasks.len(),
            done,
            pending: tasks.len() - done,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub title: &'static str,
    pub subtitle: &'static str,
}

impl EmptyState {
    pub const DISCONNECTED: Self = Self {
        title: "No connection",
        subtitle: "Start the task server and reload",
    };

    pub fn for_filter(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::All => Self {
                title: "No tasks",
                subtitle: "Add your first task with `add`",
            },
            StatusFilter::Pending => Self {
                title: "No active tasks",
                subtitle: "All tasks are done 🎉",
            },
            StatusFilter::Done => Self {
                title: "No completed tasks",
                subtitle: "Mark a task done with `toggle <id>`",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub filter: StatusFilter,
    pub filter_label: &'static str,
    pub status_line: String,
    pub cards: Vec<TaskCard>,
    pub counts: Counts,
    pub empty: Option<EmptyState>,
    pub show_hint: bool,
}

impl TaskView {
    pub fn derive(state: &ClientState) -> Self {
        let cards: Vec<TaskCard> = state
            .tasks
            .iter()
            .filter(|task| state.filter.matches(task.status))
            .map(|task| TaskCard::from_task(task, state.removing.contains(&task.id)))
            .collect();

        let empty = if !cards.is_empty() {
            None
        } else if state.load_state == LoadState::Unavailable {
            Some(EmptyState::DISCONNECTED)
        } else {
            Some(EmptyState::for_filter(state.filter))
        };

        Self {
            filter: state.filter,
            filter_label: state.filter.label(),
            status_line: state.connection.banner(),
            counts: Counts::of(&state.tasks),
            show_hint: !state.tasks.is_empty(),
            cards,
            empty,
        }
    }

    pub fn card(&self, id: u64) -> Option<&TaskCard> {
        self.cards.iter().find(|card| card.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Counts, EmptyState, TaskView};
    use crate::model::{StatusFilter, Task, TaskStatus};
    use crate::state::{ClientState, ConnectionState, LoadState};

    fn task(id: u64, status: TaskStatus) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            status,
            user_id: 1,
            category_id: None,
        }
    }

    fn loaded(tasks: Vec<Task>) -> ClientState {
        ClientState {
            load_state: LoadState::Loaded,
            connection: ConnectionState::Online { loaded: tasks.len() },
            tasks,
            ..ClientState::default()
        }
    }

    #[test]
    fn counts_cover_whole_cache_regardless_of_filter() {
        let mut state = loaded(vec![
            task(1, TaskStatus::Pending),
            task(2, TaskStatus::Done),
            task(3, TaskStatus::Pending),
        ]);
        state.filter = StatusFilter::Done;

        let view = TaskView::derive(&state);
        assert_eq!(view.cards.len(), 1);
        assert_eq!(
            view.counts,
            Counts {
                all: 3,
                done: 1,
                pending: 2
            }
        );
        assert_eq!(view.filter_label, "Completed tasks");
    }

    #[test]
    fn filtering_preserves_cache_order() {
        let mut state = loaded(vec![
            task(5, TaskStatus::Pending),
            task(2, TaskStatus::Done),
            task(9, TaskStatus::Pending),
        ]);
        state.filter = StatusFilter::Pending;

        let ids: Vec<_> = TaskView::derive(&state).cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, [5, 9]);
    }

    #[test]
    fn empty_state_depends_on_filter() {
        let mut state = loaded(vec![task(1, TaskStatus::Done)]);
        state.filter = StatusFilter::Pending;

        let view = TaskView::derive(&state);
        assert_eq!(view.empty, Some(EmptyState::for_filter(StatusFilter::Pending)));
        assert_eq!(view.empty.unwrap().title, "No active tasks");
        assert!(view.show_hint);

        let view = TaskView::derive(&loaded(Vec::new()));
        assert_eq!(view.empty.unwrap().title, "No tasks");
        assert!(!view.show_hint);
    }

    #[test]
    fn unavailable_shows_connectivity_state() {
        let state = ClientState {
            load_state: LoadState::Unavailable,
            connection: ConnectionState::Offline,
            ..ClientState::default()
        };

        let view = TaskView::derive(&state);
        assert!(view.cards.is_empty());
        assert_eq!(view.empty, Some(EmptyState::DISCONNECTED));
        assert_eq!(view.status_line, "Server unavailable");
    }

    #[test]
    fn cards_added_while_unavailable_replace_connectivity_state() {
        let state = ClientState {
            tasks: vec![task(7, TaskStatus::Pending)],
            load_state: LoadState::Unavailable,
            connection: ConnectionState::Offline,
            ..ClientState::default()
        };

        let view = TaskView::derive(&state);
        assert_eq!(view.empty, None);
        assert_eq!(view.cards.len(), 1);
        assert_eq!(view.status_line, "Server unavailable");

        let mut filtered = state.clone();
        filtered.filter = StatusFilter::Done;
        assert_eq!(
            TaskView::derive(&filtered).empty,
            Some(EmptyState::DISCONNECTED)
        );
    }

    #[test]
    fn cards_carry_badges_and_removal_cue() {
        let mut state = loaded(vec![task(1, TaskStatus::Done), task(2, TaskStatus::Pending)]);
        state.tasks[1].category_id = Some(4);
        state.removing.insert(2);

        let view = TaskView::derive(&state);
        let done = view.card(1).unwrap();
        assert_eq!(done.badge, "✓ Done");
        assert_eq!(done.toggle_hint, "Mark as pending");
        assert!(!done.removing);

        let pending = view.card(2).unwrap();
        assert_eq!(pending.badge, "● Pending");
        assert!(pending.removing);
        assert_eq!(pending.meta(), ["User 1", "Category 4", "#2"]);
    }

    #[test]
    fn derive_is_idempotent() {
        let state = loaded(vec![task(1, TaskStatus::Done), task(2, TaskStatus::Pending)]);
        let before = state.clone();

        assert_eq!(TaskView::derive(&state), TaskView::derive(&state));
        assert_eq!(state, before);
    }
}
