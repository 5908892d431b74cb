//! Completion notifications.
//!
//! Each enabled channel gets one short message per successful automatic
//! run. Sends are not retried and a failed send never fails the run.
//!
//! # Example
//!
//! ```ignore
//! use shortbox_core::notify::{build_notifiers, NotificationMessage};
//!
//! let message = NotificationMessage::download_complete("Saga", "2012", "5");
//! for notifier in build_notifiers(&config.notifications)? {
//!     if let Err(e) = notifier.notify(&message).await {
//!         tracing::warn!(channel = notifier.name(), error = %e, "notification failed");
//!     }
//! }
//! ```

mod config;
mod error;
mod http;
mod traits;
mod types;

pub use config::{NmaConfig, NotificationsConfig, ProwlConfig, PushoverConfig};
pub use error::NotifyError;
pub use http::{build_notifiers, NmaNotifier, ProwlNotifier, PushoverNotifier};
pub use traits::Notifier;
pub use types::{NotificationMessage, DOWNLOAD_COMPLETE_TITLE};
