use clap::{CommandFactory, Parser};
use std::io::{self, Write};
use tasklist_cli::cli::{Cli, Command, collect_overrides};
use tasklist_cli::render::Renderer;
use tasklist_core::TaskListClient;
use tasklist_core::backend::HttpBackend;
use tasklist_core::client::{AlwaysConfirm, Confirmer, Effect, Outcome};
use tasklist_core::config::{Config, load_config_with_fallback, merge_overrides, palette_for_theme};
use tasklist_core::error::AppError;
use tasklist_core::model::{Task, TaskForm};
use tasklist_core::notify::{Notifier, desktop_notifier_from_env};
use tasklist_core::view::TaskCard;
use time::{Duration, OffsetDateTime};
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "TASKLIST_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    OneShot,
    Interactive,
}

struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = io::stdout().flush();

        let mut answer = String::new();
        match io::stdin().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(err) => {
                tracing::warn!(error = %err, "could not read confirmation");
                false
            }
        }
    }
}

struct Session {
    client: TaskListClient,
    backend: HttpBackend,
    renderer: Renderer,
    desktop: Option<Box<dyn Notifier>>,
    mode: Mode,
    loaded: bool,
    toast_ttl: Duration,
}

impl Session {
    fn new(config: &Config, json: bool, mode: Mode) -> Result<Self, AppError> {
        let backend = HttpBackend::new(&config.api_url, config.timeout())?;
        let desktop = if config.desktop_notifications {
            Some(desktop_notifier_from_env(config.toast_ms)?)
        } else {
            None
        };

        Ok(Self {
            client: TaskListClient::new(config.client_options()),
            backend,
            renderer: Renderer::new(palette_for_theme(config.theme.as_deref()), json),
            desktop,
            mode,
            loaded: false,
            toast_ttl: config.toast_ttl(),
        })
    }

    fn load(&mut self) -> Outcome {
        let outcome = self.client.load(&self.backend);
        self.loaded = outcome.failure().is_none();
        outcome
    }

    fn ensure_loaded(&mut self) -> Result<(), AppError> {
        if self.loaded {
            return Ok(());
        }

        match self.load() {
            Outcome::Failed(err) => {
                self.flush()?;
                Err(err)
            }
            _ => {
                if self.mode == Mode::OneShot {
                    self.client.drain_effects();
                } else {
                    self.flush()?;
                }
                Ok(())
            }
        }
    }

    fn run(&mut self, command: Command) -> Result<(), AppError> {
        if command.needs_cache() {
            self.ensure_loaded()?;
        }

        let outcome = match command {
            Command::List { filter } => {
                if let Some(filter) = filter {
                    self.client.set_filter(filter);
                } else {
                    self.client.drain_effects();
                    self.print(&self.renderer.view(&self.client.view())?);
                    if self.mode == Mode::Interactive
                        && let Some(toast) = self
                            .client
                            .toast_slot()
                            .visible(OffsetDateTime::now_utc(), self.toast_ttl)
                    {
                        self.print(&self.renderer.toast(toast));
                    }
                    return Ok(());
                }
                None
            }
            Command::Load => Some(self.load()),
            Command::Refresh => {
                let outcome = self.client.refresh(&self.backend);
                if outcome.failure().is_none() {
                    self.loaded = true;
                }
                Some(outcome)
            }
            Command::Add {
                title,
                user,
                category,
            } => {
                let mut form = TaskForm {
                    title: title.unwrap_or_default(),
                    user_id: user.unwrap_or_default(),
                    category_id: category.unwrap_or_default(),
                };
                let outcome = self.guard(|session| {
                    session.client.create(&session.backend, &mut form)
                })?;
                if let Outcome::Created(task) = &outcome
                    && self.mode == Mode::OneShot
                {
                    self.client.drain_effects();
                    self.print(&self.renderer.created(task)?);
                    return Ok(());
                }
                Some(outcome)
            }
            Command::Toggle { id } => {
                Some(self.guard(|session| session.client.toggle_status(&session.backend, id))?)
            }
            Command::Delete { id, yes } => Some(self.guard(|session| {
                if yes {
                    session.client.delete(&session.backend, id, &AlwaysConfirm)
                } else {
                    session.client.delete(&session.backend, id, &StdinConfirmer)
                }
            })?),
            Command::Filter { filter } => {
                self.client.set_filter(filter);
                None
            }
        };

        let failed = match outcome {
            Some(Outcome::Failed(err)) => Some(err),
            Some(Outcome::Cancelled) => {
                self.print("Cancelled");
                None
            }
            _ => None,
        };

        self.flush()?;
        match (failed, self.mode) {
            (Some(err), Mode::OneShot) => Err(err),
            _ => Ok(()),
        }
    }

    /// Runs a client operation, discarding its error toast when the error itself
    /// is going to be reported.
    fn guard<F>(&mut self, op: F) -> Result<Outcome, AppError>
    where
        F: FnOnce(&mut Self) -> Result<Outcome, AppError>,
    {
        match op(self) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.client.drain_effects();
                Err(err)
            }
        }
    }

    /// Carries out pending effects. Interactive sessions replay them in order,
    /// one-shot runs print toasts and a single final view.
    fn flush(&mut self) -> Result<(), AppError> {
        let effects = self.client.drain_effects();
        let mut render = false;

        for effect in effects {
            match effect {
                Effect::Toast(toast) => {
                    self.renderer.notify(&toast)?;
                    if let Some(desktop) = self.desktop.as_ref()
                        && let Err(err) = desktop.notify(&toast)
                    {
                        tracing::warn!(error = %err, "desktop notification failed");
                    }
                }
                Effect::Render { after } => {
                    if self.mode == Mode::Interactive {
                        std::thread::sleep(after);
                        self.print(&self.renderer.view(&self.client.view())?);
                    } else {
                        render = true;
                    }
                }
                Effect::PatchCard { id, status } => {
                    if self.mode == Mode::Interactive && !self.renderer.is_json() {
                        if let Some(task) = self.client.state().task(id) {
                            let patched = Task {
                                status,
                                ..task.clone()
                            };
                            let card = TaskCard::from_task(&patched, false);
                            let counts = self.client.view().counts;
                            self.print(&self.renderer.patched_card(&card, &counts));
                        }
                    } else {
                        render = true;
                    }
                }
                Effect::RemovalCue { id, active } => {
                    if self.mode == Mode::Interactive && !self.renderer.is_json() {
                        let view = self.client.view();
                        if let Some(card) = view.card(id) {
                            self.print(&self.renderer.removal_cue(card, active));
                        }
                    } else if !active {
                        render = true;
                    }
                }
            }
        }

        if render {
            self.print(&self.renderer.view(&self.client.view())?);
        }
        Ok(())
    }

    fn print(&self, text: &str) {
        println!("{text}");
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_config(raw_overrides: &[String]) -> Result<Config, AppError> {
    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error.as_ref() {
        tracing::warn!(error = %err, "using default configuration");
    }
    let overrides = collect_overrides(raw_overrides)?;
    Ok(merge_overrides(&loaded.config, &overrides))
}

fn run_one_shot(cli: Cli) -> Result<(), AppError> {
    let config = resolve_config(&cli.config_override)?;
    let mut session = Session::new(&config, cli.json, Mode::OneShot)?;
    session.run(cli.command)
}

fn run_interactive() -> Result<(), AppError> {
    let config = resolve_config(&[])?;
    let mut session = Session::new(&config, false, Mode::Interactive)?;
    if let Err(err) = session.ensure_loaded() {
        eprintln!("ERROR: {}", err);
    }

    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        input.clear();
        let bytes = stdin
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("tasklist".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = session.run(cli.command) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    init_logging();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive() {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) {
                let _ = err.print();
                return;
            }
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_one_shot(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
