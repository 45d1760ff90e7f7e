use crate::error::AppError;
use serde::Serialize;
use time::{Duration, OffsetDateTime};

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxNotifier;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsNotifier;

pub const APP_NAME: &str = "tasklist";
pub const DEFAULT_TOAST_MS: u64 = 2800;
const DISABLE_ENV_VAR: &str = "TASKLIST_DISABLE_NOTIFICATIONS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Error,
}

/// A transient, auto-dismissing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub raised_at: OffsetDateTime,
}

impl Toast {
    pub fn success<M: Into<String>>(message: M) -> Self {
        Self::raised_now(ToastKind::Success, message.into())
    }

    pub fn error<M: Into<String>>(message: M) -> Self {
        Self::raised_now(ToastKind::Error, message.into())
    }

    fn raised_now(kind: ToastKind, message: String) -> Self {
        Self {
            kind,
            message,
            raised_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }

    pub fn is_visible_at(&self, now: OffsetDateTime, ttl: Duration) -> bool {
        now >= self.raised_at && now - self.raised_at < ttl
    }
}

/// Single toast slot: a newer toast replaces whatever is showing.
#[derive(Debug, Clone, Default)]
pub struct ToastSlot {
    current: Option<Toast>,
}

impl ToastSlot {
    pub fn show(&mut self, toast: Toast) {
        self.current = Some(toast);
    }

    pub fn visible(&self, now: OffsetDateTime, ttl: Duration) -> Option<&Toast> {
        self.current
            .as_ref()
            .filter(|toast| toast.is_visible_at(now, ttl))
    }
}

pub trait Notifier {
    fn notify(&self, toast: &Toast) -> Result<(), AppError>;
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _toast: &Toast) -> Result<(), AppError> {
        Ok(())
    }
}

/// Desktop notifier shown for `toast_ms`, or a no-op when notifications are
/// disabled through the environment or unsupported here.
pub fn desktop_notifier_from_env(toast_ms: u64) -> Result<Box<dyn Notifier>, AppError> {
    if std::env::var(DISABLE_ENV_VAR).is_ok() {
        return Ok(Box::new(NoopNotifier));
    }

    match platform_notifier(toast_ms) {
        Ok(notifier) => Ok(notifier),
        Err(err) => match err {
            AppError::InvalidData(_) => Ok(Box::new(NoopNotifier)),
            other => Err(other),
        },
    }
}

#[cfg(target_os = "linux")]
pub fn platform_notifier(toast_ms: u64) -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(LinuxNotifier::new(toast_ms)))
}

#[cfg(windows)]
pub fn platform_notifier(toast_ms: u64) -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(WindowsNotifier::new(toast_ms)))
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_notifier(_toast_ms: u64) -> Result<Box<dyn Notifier>, AppError> {
    Err(AppError::invalid_data(
        "notifications are not supported on this platform",
    ))
}

fn summary(toast: &Toast) -> String {
    match toast.kind {
        ToastKind::Success => APP_NAME.to_string(),
        ToastKind::Error => format!("{APP_NAME}: error"),
    }
}
