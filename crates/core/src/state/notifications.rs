use serde::Serialize;
use uuid::Uuid;

use crate::models::notification::{AlertMessage, NotificationKind, NotificationRecord};

use super::feed::{push_front_capped, FEED_CAPACITY};

/// In-memory, newest-first notification log capped at [`FEED_CAPACITY`].
/// Not persisted; it starts empty on every run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationLog {
    items: Vec<NotificationRecord>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a message as a fresh unread record at the head.
    pub fn append(&mut self, message: AlertMessage) -> &NotificationRecord {
        let now = chrono::Utc::now().timestamp_millis();
        let record = NotificationRecord {
            id: new_id(now),
            kind: message.kind,
            timestamp: now,
            read: false,
            data: message.data,
        };
        push_front_capped(&mut self.items, record, FEED_CAPACITY);
        &self.items[0]
    }

    /// Returns `false` if no record has this id.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for n in &mut self.items {
            n.read = true;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[NotificationRecord] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    pub fn by_kind(&self, kind: NotificationKind) -> Vec<&NotificationRecord> {
        self.items.iter().filter(|n| n.kind == kind).collect()
    }
}

/// Timestamp plus a short random suffix.
fn new_id(millis: i64) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("notification-{millis}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price_alert(n: usize) -> AlertMessage {
        AlertMessage::new(NotificationKind::PriceAlert, format!("alert {n}"), "moved")
    }

    #[test]
    fn append_is_newest_first_and_unread() {
        let mut log = NotificationLog::new();
        log.append(price_alert(1));
        log.append(price_alert(2));
        assert_eq!(log.items()[0].data.title, "alert 2");
        assert!(log.items().iter().all(|n| !n.read));
        assert!(log.items()[0].id.starts_with("notification-"));
    }

    #[test]
    fn mark_read_unknown_id_is_noop() {
        let mut log = NotificationLog::new();
        log.append(price_alert(1));
        assert!(!log.mark_read("missing"));
        assert_eq!(log.unread_count(), 1);
    }
}
