//! In-process fan-out of realtime events to connected WebSocket sessions.
//!
//! Services never talk to sockets. Controllers publish a `PushEvent` after the
//! transaction that produced it has committed; every socket task subscribes to the hub
//! and forwards the envelopes addressed to its user. Delivery is best effort: a lagging
//! subscriber skips the events it missed.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

use crate::model::{
    broadcast::ReceivedBroadcastDto, chat::ChatMessageDto, memo::MemoDto,
    notification::NotificationDto,
};

const CHANNEL_CAPACITY: usize = 1024;

/// Server-to-client frames.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushEvent {
    Connected { user_id: i32 },
    OnlineCount { count: usize },
    Pong,
    Notification { data: NotificationDto },
    Memo { data: MemoDto },
    Broadcast { data: ReceivedBroadcastDto },
    ChatMessage { data: ChatMessageDto },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Recipients {
    All,
    Users(Vec<i32>),
}

impl Recipients {
    pub fn includes(&self, user_id: i32) -> bool {
        match self {
            Self::All => true,
            Self::Users(ids) => ids.contains(&user_id),
        }
    }
}

#[derive(Debug)]
pub struct PushEnvelope {
    pub recipients: Recipients,
    pub event: PushEvent,
}

#[derive(Clone)]
pub struct PushHub {
    sender: broadcast::Sender<Arc<PushEnvelope>>,
    online: Arc<RwLock<HashMap<i32, usize>>>,
}

impl PushHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            online: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<PushEnvelope>> {
        self.sender.subscribe()
    }

    fn publish(&self, recipients: Recipients, event: PushEvent) {
        // No receivers simply means nobody is connected.
        if self
            .sender
            .send(Arc::new(PushEnvelope { recipients, event }))
            .is_err()
        {
            tracing::trace!("push event dropped, no connected sessions");
        }
    }

    pub fn send_to_users(&self, user_ids: Vec<i32>, event: PushEvent) {
        if user_ids.is_empty() {
            return;
        }
        self.publish(Recipients::Users(user_ids), event);
    }

    pub fn send_to_all(&self, event: PushEvent) {
        self.publish(Recipients::All, event);
    }

    pub fn notify(&self, notifications: Vec<NotificationDto>) {
        for notification in notifications {
            self.send_to_users(
                vec![notification.user_id],
                PushEvent::Notification { data: notification },
            );
        }
    }

    /// Registers a socket of `user_id` and broadcasts the new online count.
    pub async fn connect(&self, user_id: i32) -> usize {
        let count = {
            let mut online = self.online.write().await;
            *online.entry(user_id).or_default() += 1;
            online.len()
        };
        self.send_to_all(PushEvent::OnlineCount { count });
        count
    }

    /// Unregisters a socket of `user_id` and broadcasts the new online count.
    pub async fn disconnect(&self, user_id: i32) -> usize {
        let count = {
            let mut online = self.online.write().await;
            if let Some(sockets) = online.get_mut(&user_id) {
                *sockets -= 1;
                if *sockets == 0 {
                    online.remove(&user_id);
                }
            }
            online.len()
        };
        self.send_to_all(PushEvent::OnlineCount { count });
        count
    }

    /// Number of distinct users with at least one open socket.
    pub async fn online_count(&self) -> usize {
        self.online.read().await.len()
    }
}

impl Default for PushHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn delivers_only_addressed_events() {
        let hub = PushHub::new();
        let mut receiver = hub.subscribe();

        hub.send_to_users(vec![7], PushEvent::Pong);
        hub.send_to_users(Vec::new(), PushEvent::Pong);

        let envelope = receiver.recv().await.unwrap();
        assert!(envelope.recipients.includes(7));
        assert!(!envelope.recipients.includes(8));
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn counts_distinct_users() {
        let hub = PushHub::new();
        let mut receiver = hub.subscribe();

        assert_eq!(hub.connect(1).await, 1);
        assert_eq!(hub.connect(1).await, 1);
        assert_eq!(hub.connect(2).await, 2);
        assert_eq!(hub.disconnect(1).await, 2);
        assert_eq!(hub.disconnect(1).await, 1);
        assert_eq!(hub.online_count().await, 1);

        let first = receiver.recv().await.unwrap();
        assert_eq!(first.recipients, Recipients::All);
        assert_eq!(first.event, PushEvent::OnlineCount { count: 1 });
    }

    #[test]
    fn events_serialize_with_type_tag() {
        assert_eq!(
            serde_json::to_value(PushEvent::Connected { user_id: 3 }).unwrap(),
            json!({"type": "connected", "user_id": 3})
        );
        assert_eq!(
            serde_json::to_value(PushEvent::OnlineCount { count: 2 }).unwrap(),
            json!({"type": "online_count", "count": 2})
        );
        assert_eq!(
            serde_json::to_value(PushEvent::Pong).unwrap(),
            json!({"type": "pong"})
        );
    }
}
