use tabled::builder::Builder;
use tabled::settings::Style;
use tasklist_core::config::Palette;
use tasklist_core::error::AppError;
use tasklist_core::model::Task;
use tasklist_core::notify::{Notifier, Toast, ToastKind};
use tasklist_core::view::{Counts, TaskCard, TaskView};

const HINT: &str = "toggle <id> switches a task's status, delete <id> removes it";

pub struct Renderer {
    palette: Palette,
    json: bool,
}

impl Renderer {
    pub fn new(palette: Palette, json: bool) -> Self {
        Self { palette, json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn view(&self, view: &TaskView) -> Result<String, AppError> {
        if self.json {
            return serde_json::to_string(view).map_err(|err| AppError::invalid_data(err.to_string()));
        }

        let mut out = Vec::new();
        if !view.status_line.is_empty() {
            out.push(self.palette.mutedize(&view.status_line));
        }
        out.push(format!(
            "{}  {}",
            self.palette.accentize(view.filter_label),
            counts_line(&view.counts)
        ));

        match view.empty {
            Some(empty) => {
                out.push(empty.title.to_string());
                out.push(self.palette.mutedize(empty.subtitle));
            }
            None => out.push(cards_table(&view.cards)),
        }

        if view.show_hint {
            out.push(self.palette.mutedize(HINT));
        }

        Ok(out.join("\n"))
    }

    /// Partial update of one card after an optimistic change.
    pub fn patched_card(&self, card: &TaskCard, counts: &Counts) -> String {
        format!(
            "{} #{} {}  ({})\n{}",
            marker(card),
            card.id,
            card.title,
            self.palette.accentize(card.badge),
            counts_line(counts)
        )
    }

    pub fn removal_cue(&self, card: &TaskCard, active: bool) -> String {
        if active {
            self.palette
                .mutedize(&format!("Removing #{} {}...", card.id, card.title))
        } else {
            format!("Restored #{} {}", card.id, card.title)
        }
    }

    pub fn created(&self, task: &Task) -> Result<String, AppError> {
        if self.json {
            return serde_json::to_string(task).map_err(|err| AppError::invalid_data(err.to_string()));
        }
        Ok(format!("Added task: {} (#{})", task.title, task.id))
    }

    pub fn toast(&self, toast: &Toast) -> String {
        match toast.kind {
            ToastKind::Success => format!("✓ {}", toast.message),
            ToastKind::Error => self.palette.dangerize(&format!("✗ {}", toast.message)),
        }
    }
}

/// Successes go to stdout and errors to stderr; with `--json` everything goes
/// to stderr.
impl Notifier for Renderer {
    fn notify(&self, toast: &Toast) -> Result<(), AppError> {
        let line = self.toast(toast);
        if toast.is_error() || self.json {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
        Ok(())
    }
}

pub fn counts_line(counts: &Counts) -> String {
    format!(
        "All {} · Done {} · Pending {}",
        counts.all, counts.done, counts.pending
    )
}

fn marker(card: &TaskCard) -> &'static str {
    if card.is_done() { "[✓]" } else { "[ ]" }
}

/// Meta chips without the trailing `#id`, which has its own column.
fn details(card: &TaskCard) -> String {
    let mut chips = card.meta();
    chips.pop();
    chips.join(", ")
}

fn cards_table(cards: &[TaskCard]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["", "#", "Title", "Details", "Status"]);
    for card in cards {
        let status = if card.removing {
            "removing...".to_string()
        } else {
            card.badge.to_string()
        };
        builder.push_record([
            marker(card).to_string(),
            card.id.to_string(),
            card.title.clone(),
            details(card),
            status,
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}
