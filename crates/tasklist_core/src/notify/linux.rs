use crate::error::AppError;
use crate::notify::{Notifier, Toast, ToastKind, summary};
use notify_rust::{Notification, Urgency};

pub struct LinuxNotifier {
    timeout_ms: i32,
}

impl LinuxNotifier {
    pub fn new(toast_ms: u64) -> Self {
        Self {
            timeout_ms: i32::try_from(toast_ms).unwrap_or(i32::MAX),
        }
    }

    pub fn timeout_ms(&self) -> i32 {
        self.timeout_ms
    }
}

impl Notifier for LinuxNotifier {
    fn notify(&self, toast: &Toast) -> Result<(), AppError> {
        let urgency = match toast.kind {
            ToastKind::Success => Urgency::Low,
            ToastKind::Error => Urgency::Normal,
        };

        Notification::new()
            .appname(super::APP_NAME)
            .summary(&summary(toast))
            .body(&toast.message)
            .urgency(urgency)
            .timeout(self.timeout_ms)
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;

        Ok(())
    }
}
