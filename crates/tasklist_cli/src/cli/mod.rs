use clap::{Parser, Subcommand};
use tasklist_core::config::{ConfigKey, ConfigOverrides, canonicalize_key};
use tasklist_core::error::AppError;
use tasklist_core::model::StatusFilter;

#[derive(Parser, Debug)]
#[command(name = "tasklist", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load tasks from the server and show them
    ///
    /// Example: tasklist list --filter pending
    List {
        #[arg(long, short = 'f')]
        filter: Option<StatusFilter>,
    },
    /// Reload tasks, clearing the list if the server is unreachable
    ///
    /// Example: tasklist load
    Load,
    /// Reload tasks, keeping the current list if the server is unreachable
    ///
    /// Example: tasklist refresh
    Refresh,
    /// Create a task
    ///
    /// Example: tasklist add "Buy milk" --user 1
    /// Example: tasklist add "Buy milk" --user 1 --category 2
    Add {
        title: Option<String>,
        #[arg(long, short = 'u', value_name = "ID")]
        user: Option<String>,
        #[arg(long, short = 'c', value_name = "ID")]
        category: Option<String>,
    },
    /// Switch a task between pending and done
    ///
    /// Example: tasklist toggle 7
    Toggle { id: u64 },
    /// Delete a task
    ///
    /// Example: tasklist delete 7
    /// Example: tasklist delete 7 --yes
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show only tasks with a given status
    ///
    /// Example: tasklist filter done
    Filter { filter: StatusFilter },
}

impl Command {
    /// Commands that work on the cached collection and need it loaded first.
    pub fn needs_cache(&self) -> bool {
        matches!(
            self,
            Self::List { .. } | Self::Toggle { .. } | Self::Delete { .. } | Self::Filter { .. }
        )
    }
}

/// Flag name used to identify config override arguments by the runtime.
pub const CONFIG_OVERRIDE_FLAG: &str = "--config-override";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub key: ConfigKey,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let canonical = canonicalize_key(key_raw);
    if canonical.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    let key = ConfigKey::from_canonical(&canonical)
        .ok_or_else(|| format!("unknown config field '{canonical}'"))?;

    Ok(ParsedConfigOverride {
        key,
        value: value_raw.trim().to_string(),
    })
}

pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)
            .map_err(|err| AppError::invalid_input(format!("{CONFIG_OVERRIDE_FLAG}: {err}")))?;
        overrides.set(parsed.key, &parsed.value)?;
    }
    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, collect_overrides, parse_config_override};
    use clap::Parser;
    use tasklist_core::config::ConfigKey;
    use tasklist_core::model::StatusFilter;

    #[test]
    fn parse_config_override_canonicalizes_field_names() {
        let parsed = parse_config_override(" Confirm-Delete = false ").unwrap();
        assert_eq!(parsed.key, ConfigKey::ConfirmDelete);
        assert_eq!(parsed.value, "false");
    }

    #[test]
    fn parse_config_override_keeps_url_values_intact() {
        let parsed = parse_config_override("api_url=http://host:8000/tasks?x=1").unwrap();
        assert_eq!(parsed.key, ConfigKey::ApiUrl);
        assert_eq!(parsed.value, "http://host:8000/tasks?x=1");
    }

    #[test]
    fn parse_config_override_rejects_unknown_fields() {
        let err = parse_config_override("unknown.field=value").unwrap_err();
        assert!(err.contains("unknown config field"));
    }

    #[test]
    fn parse_config_override_rejects_missing_equals() {
        let err = parse_config_override("themenoir").unwrap_err();
        assert!(err.contains("KEY=VALUE"));
    }

    #[test]
    fn collect_overrides_reports_bad_values() {
        let err = collect_overrides(&["toast_ms=later".to_string()]).unwrap_err();
        assert_eq!(err.code(), "invalid_input");

        let overrides =
            collect_overrides(&["theme=noir".to_string(), "exit-animation-ms=0".to_string()])
                .unwrap();
        assert_eq!(overrides.theme.as_deref(), Some("noir"));
        assert_eq!(overrides.exit_animation_ms, Some(0));
    }

    #[test]
    fn filter_arguments_parse_aliases() {
        let cli = Cli::try_parse_from(["tasklist", "list", "--filter", "active"]).unwrap();
        match cli.command {
            Command::List { filter } => assert_eq!(filter, Some(StatusFilter::Pending)),
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from(["tasklist", "filter", "someday"]).is_err());
    }

    #[test]
    fn add_keeps_raw_ids_for_validation() {
        let cli = Cli::try_parse_from(["tasklist", "add", "Buy milk", "--user", "zero"]).unwrap();
        match cli.command {
            Command::Add { title, user, category } => {
                assert_eq!(title.as_deref(), Some("Buy milk"));
                assert_eq!(user.as_deref(), Some("zero"));
                assert_eq!(category, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
