use crate::error::AppError;
use crate::model::{Status, TaskRecord};
use crate::store::TaskStore;
use time::Date;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxNotifier;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsNotifier;

/// A record is called out as urgent from this priority upward.
pub const URGENT_PRIORITY: u8 = 8;

const STARTUP_PREVIEW: usize = 5;
const CLOSE_PREVIEW: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub title: String,
    pub body: String,
}

/// Tasks active today that are not done yet; the input for both the startup
/// reminder and the close confirmation.
pub fn open_today(store: &TaskStore, today: Date) -> Vec<TaskRecord> {
    store
        .for_date(today)
        .into_iter()
        .filter(|record| record.status != Status::Done)
        .collect()
}

fn task_line(record: &TaskRecord) -> String {
    if record.priority >= URGENT_PRIORITY {
        format!("- {} [urgent]", record.name)
    } else {
        format!("- {}", record.name)
    }
}

/// Composes the startup digest, or `None` when nothing is open today.
pub fn startup_reminder(store: &TaskStore, today: Date) -> Option<Reminder> {
    let open = open_today(store, today);
    if open.is_empty() {
        return None;
    }

    let mut body = format!("You have {} open task(s) today:\n", open.len());
    for record in open.iter().take(STARTUP_PREVIEW) {
        body.push_str(&task_line(record));
        body.push('\n');
    }
    if open.len() > STARTUP_PREVIEW {
        body.push_str(&format!("... and {} more\n", open.len() - STARTUP_PREVIEW));
    }

    Some(Reminder {
        title: "Today's tasks".to_string(),
        body,
    })
}

/// Composes the shutdown-intent prompt, or `None` when closing needs no
/// confirmation. The caller decides whether to actually block.
pub fn close_confirmation(store: &TaskStore, today: Date) -> Option<String> {
    let open = open_today(store, today);
    if open.is_empty() {
        return None;
    }

    let mut message = format!("{} task(s) due today are not done yet:\n\n", open.len());
    for record in open.iter().take(CLOSE_PREVIEW) {
        message.push_str(&task_line(record));
        message.push('\n');
    }
    if open.len() > CLOSE_PREVIEW {
        message.push_str(&format!("... and {} more\n", open.len() - CLOSE_PREVIEW));
    }
    message.push_str("\nClose anyway?");

    Some(message)
}

pub trait Notifier {
    fn notify(&self, reminder: &Reminder) -> Result<(), AppError>;
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _reminder: &Reminder) -> Result<(), AppError> {
        Ok(())
    }
}

pub fn notifier_from_env() -> Result<Box<dyn Notifier>, AppError> {
    if std::env::var("TODOCAL_DISABLE_NOTIFICATIONS").is_ok() {
        return Ok(Box::new(NoopNotifier));
    }

    match platform_notifier() {
        Ok(notifier) => Ok(notifier),
        Err(err) => match err {
            AppError::InvalidInput(_) => Ok(Box::new(NoopNotifier)),
            other => Err(other),
        },
    }
}

#[cfg(target_os = "linux")]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(LinuxNotifier))
}

#[cfg(windows)]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(WindowsNotifier))
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Err(AppError::invalid_input(
        "notifications are not supported on this platform",
    ))
}
