//! Publish/subscribe bus for user-facing notifications.
//!
//! The bus keeps the newest notifications first and never holds more than
//! [`MAX_VISIBLE`]. Expiry is driven by the caller through [`NotificationBus::expire`].

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Most notifications retained at once.
pub const MAX_VISIBLE: usize = 5;
/// Lifetime of a notification in milliseconds.
pub const NOTIFICATION_TTL_MS: i64 = 5_000;

const DEFAULT_ERROR_TITLE: &str = "Error";
const DEFAULT_NOTIFICATION_TITLE: &str = "Notification";
const SYSTEM_ERROR_TITLE: &str = "System Error";
const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

/// Visual category of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Something failed.
    Error,
    /// Something completed.
    Success,
    /// Something needs attention.
    Warning,
    /// Neutral information.
    #[default]
    Info,
}

impl NotificationKind {
    /// Lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification held by the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique id, used for dismissal.
    pub id: String,
    /// Category.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

/// Events accepted by the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "detail", rename_all = "camelCase")]
pub enum AppEvent {
    /// An error to show the user.
    ShowError {
        /// Headline, `Error` when absent.
        #[serde(default)]
        title: Option<String>,
        /// Body text.
        message: String,
    },
    /// A general notification.
    ShowNotification {
        /// Headline, `Notification` when absent.
        #[serde(default)]
        title: Option<String>,
        /// Body text.
        message: String,
        /// Category, `info` when absent.
        #[serde(default, rename = "type")]
        kind: Option<NotificationKind>,
    },
    /// An internal failure worth surfacing.
    LogError {
        /// What was being attempted.
        action: String,
        /// Error text.
        #[serde(default)]
        error: String,
        /// When the failure happened.
        timestamp: DateTime<Utc>,
    },
}

impl AppEvent {
    /// Convenience constructor for [`AppEvent::LogError`] stamped now.
    pub fn log_error(action: impl Into<String>, error: impl Into<String>) -> Self {
        Self::LogError {
            action: action.into(),
            error: error.into(),
            timestamp: Utc::now(),
        }
    }

    fn into_notification(self, now: DateTime<Utc>) -> Notification {
        let (kind, title, message) = match self {
            Self::ShowError { title, message } => (
                NotificationKind::Error,
                title.unwrap_or_else(|| DEFAULT_ERROR_TITLE.to_string()),
                message,
            ),
            Self::ShowNotification {
                title,
                message,
                kind,
            } => (
                kind.unwrap_or_default(),
                title.unwrap_or_else(|| DEFAULT_NOTIFICATION_TITLE.to_string()),
                message,
            ),
            Self::LogError { error, .. } => {
                let message = if error.is_empty() {
                    FALLBACK_ERROR_MESSAGE.to_string()
                } else {
                    error
                };
                (NotificationKind::Error, SYSTEM_ERROR_TITLE.to_string(), message)
            }
        };
        Notification {
            id: Uuid::new_v4().to_string(),
            kind,
            title,
            message,
            timestamp: now,
        }
    }
}

/// Handle returned by [`NotificationBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&Notification) + Send + Sync>;

#[derive(Default)]
struct BusState {
    visible: VecDeque<Notification>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

/// Shared notification state. Clone to hand out further handles.
#[derive(Clone, Default)]
pub struct NotificationBus {
    state: Arc<Mutex<BusState>>,
}

impl fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("NotificationBus")
            .field("visible", &state.visible.len())
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl NotificationBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an event stamped with the current time.
    pub fn publish(&self, event: AppEvent) -> Notification {
        self.publish_at(event, Utc::now())
    }

    /// Publish an event stamped with `now`. Listeners run after the bus is updated.
    pub fn publish_at(&self, event: AppEvent, now: DateTime<Utc>) -> Notification {
        let notification = event.into_notification(now);
        let listeners: Vec<Listener> = {
            let mut state = self.lock();
            state.visible.push_front(notification.clone());
            state.visible.truncate(MAX_VISIBLE);
            state
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };
        for listener in listeners {
            listener(&notification);
        }
        notification
    }

    /// Current notifications, newest first.
    pub fn visible(&self) -> Vec<Notification> {
        self.lock().visible.iter().cloned().collect()
    }

    /// Drop notifications older than the lifetime at `now`. Returns how many were removed.
    pub fn expire(&self, now: DateTime<Utc>) -> usize {
        let ttl = Duration::milliseconds(NOTIFICATION_TTL_MS);
        let mut state = self.lock();
        let before = state.visible.len();
        state
            .visible
            .retain(|notification| now - notification.timestamp < ttl);
        before - state.visible.len()
    }

    /// Remove one notification. Returns whether it was present.
    pub fn dismiss(&self, id: &str) -> bool {
        let mut state = self.lock();
        let before = state.visible.len();
        state.visible.retain(|notification| notification.id != id);
        state.visible.len() != before
    }

    /// Remove every notification.
    pub fn clear(&self) {
        self.lock().visible.clear();
    }

    /// Register a listener called for every published notification.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let mut state = self.lock();
        let id = SubscriptionId(state.next_subscription);
        state.next_subscription += 1;
        state.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.lock();
        let before = state.listeners.len();
        state.listeners.retain(|(existing, _)| *existing != id);
        state.listeners.len() != before
    }

    fn lock(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::{Duration, TimeZone, Utc};

    use super::{AppEvent, MAX_VISIBLE, NotificationBus, NotificationKind};

    fn info(message: &str) -> AppEvent {
        AppEvent::ShowNotification {
            title: None,
            message: message.to_string(),
            kind: None,
        }
    }

    #[test]
    fn default_titles_and_kinds() {
        let bus = NotificationBus::new();

        let error = bus.publish(AppEvent::ShowError {
            title: None,
            message: "boom".to_string(),
        });
        assert_eq!(error.kind, NotificationKind::Error);
        assert_eq!(error.title, "Error");

        let note = bus.publish(info("hello"));
        assert_eq!(note.kind, NotificationKind::Info);
        assert_eq!(note.title, "Notification");

        let logged = bus.publish(AppEvent::log_error("analysis_failed", ""));
        assert_eq!(logged.kind, NotificationKind::Error);
        assert_eq!(logged.title, "System Error");
        assert_eq!(logged.message, "An error occurred");
    }

    #[test]
    fn sixth_notification_evicts_the_oldest() {
        let bus = NotificationBus::new();
        for index in 0..=MAX_VISIBLE {
            bus.publish(info(&format!("n{index}")));
        }

        let visible = bus.visible();
        assert_eq!(visible.len(), MAX_VISIBLE);
        assert_eq!(visible[0].message, "n5");
        assert!(visible.iter().all(|n| n.message != "n0"));
    }

    #[test]
    fn notifications_expire_after_five_seconds() {
        let bus = NotificationBus::new();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        bus.publish_at(info("old"), start);
        bus.publish_at(info("new"), start + Duration::seconds(3));

        assert_eq!(bus.expire(start + Duration::milliseconds(4_999)), 0);
        assert_eq!(bus.expire(start + Duration::seconds(5)), 1);
        let visible = bus.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].message, "new");
    }

    #[test]
    fn dismiss_and_clear() {
        let bus = NotificationBus::new();
        let first = bus.publish(info("a"));
        bus.publish(info("b"));

        assert!(bus.dismiss(&first.id));
        assert!(!bus.dismiss(&first.id));
        assert_eq!(bus.visible().len(), 1);

        bus.clear();
        assert!(bus.visible().is_empty());
    }

    #[test]
    fn listeners_receive_until_unsubscribed() {
        let bus = NotificationBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let id = bus.subscribe(move |n| sink.lock().expect("seen").push(n.message.clone()));

        bus.publish(info("first"));
        assert!(bus.unsubscribe(id));
        bus.publish(info("second"));

        assert_eq!(*seen.lock().expect("seen"), vec!["first".to_string()]);
    }

    #[test]
    fn listeners_may_read_the_bus() {
        let bus = NotificationBus::new();
        let handle = bus.clone();
        let counts = Arc::new(Mutex::new(Vec::new()));
        let sink = counts.clone();
        bus.subscribe(move |_| sink.lock().expect("counts").push(handle.visible().len()));

        bus.publish(info("a"));
        bus.publish(info("b"));

        assert_eq!(*counts.lock().expect("counts"), vec![1, 2]);
    }

    #[test]
    fn events_use_tagged_json() {
        let json = r#"{"event":"showNotification","detail":{"message":"saved","type":"success"}}"#;
        let event: AppEvent = serde_json::from_str(json).expect("event");
        assert_eq!(
            event,
            AppEvent::ShowNotification {
                title: None,
                message: "saved".to_string(),
                kind: Some(NotificationKind::Success),
            }
        );
    }
}
