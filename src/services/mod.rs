pub mod auth;
pub mod countdown;
pub mod export;
pub mod progress;
pub mod reminder;
pub mod scheduler;
pub mod sync_service;

pub use progress::{ProgressStore, ProgressSummary};
pub use reminder::{ReminderEvaluator, SubscriptionStore, TickReport};
pub use scheduler::{Clock, PeriodicTask, Scheduler, SystemClock};
pub use sync_service::{HydrationStats, SettingsSynchronizer};
