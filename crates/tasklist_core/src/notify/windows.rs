use crate::error::AppError;
use crate::notify::{Notifier, Toast, summary};
use tauri_winrt_notification::{Duration, Toast as WinToast};

/// Toasts shorter than this use the short system duration.
const LONG_TOAST_MS: u64 = 7000;

pub struct WindowsNotifier {
    long: bool,
}

impl WindowsNotifier {
    pub fn new(toast_ms: u64) -> Self {
        Self {
            long: toast_ms >= LONG_TOAST_MS,
        }
    }
}

impl Notifier for WindowsNotifier {
    fn notify(&self, toast: &Toast) -> Result<(), AppError> {
        WinToast::new(WinToast::POWERSHELL_APP_ID)
            .title(&summary(toast))
            .text1(&toast.message)
            .duration(if self.long { Duration::Long } else { Duration::Short })
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
