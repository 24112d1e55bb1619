pub mod countdown;
pub mod defaults;
pub mod exam;
pub mod reminder;
pub mod settings;

pub use countdown::TimeLeft;
pub use exam::ExamEntry;
pub use reminder::{ReminderKind, ReminderSubscription};
pub use settings::{FieldGroup, SettingsUpdate, SyncReport, SyncStatus, TargetDate, UiConfig};
