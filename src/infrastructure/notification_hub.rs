use crate::domain::ports::Notifier;
use crate::domain::types::{Notification, NotificationKind};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Receives every notification the hub fans out. The toast renderer is one
/// of these; tests subscribe counters.
pub trait NotificationListener: Send + Sync {
    fn on_notification(&self, notification: &Notification);
}

/// Fan-out hub behind the `Notifier` port. Every emitted notification is
/// traced and delivered to all subscribed listeners.
pub struct NotificationHub {
    listeners: Arc<RwLock<Vec<Arc<dyn NotificationListener>>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn subscribe(&self, listener: Arc<dyn NotificationListener>) {
        self.listeners.write().await.push(listener);
    }

    /// Get count of subscribers (for testing)
    pub async fn subscriber_count(&self) -> usize {
        self.listeners.read().await.len()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for NotificationHub {
    fn clone(&self) -> Self {
        Self {
            listeners: Arc::clone(&self.listeners),
        }
    }
}

#[async_trait]
impl Notifier for NotificationHub {
    async fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Info => info!(
                "[notify] {}: {}",
                notification.title, notification.description
            ),
            NotificationKind::Destructive => warn!(
                "[notify] {}: {}",
                notification.title, notification.description
            ),
        }

        let listeners = self.listeners.read().await;
        for listener in listeners.iter() {
            listener.on_notification(&notification);
        }
    }
}
