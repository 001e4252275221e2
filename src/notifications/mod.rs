//! In-app notification log, persisted next to the token and cache entries.

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

pub const NOTIFICATIONS_KEY: &str = "notifications";
pub const MAX_NOTIFICATIONS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

pub struct NotificationLog {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl NotificationLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// All notifications, newest first.
    pub fn all(&self) -> Vec<Notification> {
        let raw = match self.store.get(NOTIFICATIONS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return vec![],
            Err(e) => {
                warn!(error = %e, "failed to read notifications");
                return vec![];
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "malformed notification log, starting empty");
            vec![]
        })
    }

    pub fn unread_count(&self) -> usize {
        self.all().iter().filter(|n| !n.read).count()
    }

    /// Record a new notification at the head of the log, dropping the oldest past the cap.
    pub fn add(&self, kind: &str, title: &str, message: &str, link: Option<&str>) -> Result<Notification> {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            kind: kind.to_string(),
            title: title.to_string(),
            message: message.to_string(),
            timestamp: self.clock.now(),
            read: false,
            link: link.map(str::to_string),
        };

        let mut notifications = self.all();
        notifications.insert(0, notification.clone());
        notifications.truncate(MAX_NOTIFICATIONS);
        self.save(&notifications)?;
        Ok(notification)
    }

    /// Returns false when no notification has this id.
    pub fn mark_as_read(&self, id: &str) -> Result<bool> {
        let mut notifications = self.all();
        let Some(notification) = notifications.iter_mut().find(|n| n.id == id) else {
            return Ok(false);
        };
        notification.read = true;
        self.save(&notifications)?;
        Ok(true)
    }

    pub fn mark_all_as_read(&self) -> Result<()> {
        let mut notifications = self.all();
        for notification in &mut notifications {
            notification.read = true;
        }
        self.save(&notifications)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let mut notifications = self.all();
        notifications.retain(|n| n.id != id);
        self.save(&notifications)
    }

    pub fn clear(&self) -> Result<()> {
        self.save(&[])
    }

    fn save(&self, notifications: &[Notification]) -> Result<()> {
        self.store
            .set(NOTIFICATIONS_KEY, &serde_json::to_string(notifications)?)
    }
}
