use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

const TOPIC_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    PostCreated { post_id: Uuid, guest_id: Uuid },
    PostLiked { post_id: Uuid, guest_id: Uuid },
    CommentAdded { post_id: Uuid, comment_id: Uuid, guest_id: Uuid },
    StoryCreated { story_id: Uuid, guest_id: Uuid },
    StoryDeleted { story_id: Uuid, guest_id: Uuid },
}

/// Per-wedding-event broadcast topics. Connected clients of one event receive
/// feed activity for that event only.
pub struct EventHub {
    topics: DashMap<Uuid, broadcast::Sender<FeedEvent>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self { topics: DashMap::new() }
    }

    /// Subscribe to a wedding event topic, creating the channel lazily.
    pub fn subscribe(&self, wedding_event_id: Uuid) -> broadcast::Receiver<FeedEvent> {
        self.topics
            .entry(wedding_event_id)
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .subscribe()
    }

    /// Fire-and-forget publish: with no connected subscribers the event is dropped.
    pub fn publish(&self, wedding_event_id: Uuid, event: FeedEvent) {
        if let Some(tx) = self.topics.get(&wedding_event_id) {
            let _ = tx.send(event);
        }
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let hub = EventHub::new();
        let event_id = Uuid::new_v4();
        let mut rx = hub.subscribe(event_id);

        let story_id = Uuid::new_v4();
        let guest_id = Uuid::new_v4();
        hub.publish(event_id, FeedEvent::StoryCreated { story_id, guest_id });

        match rx.recv().await.unwrap() {
            FeedEvent::StoryCreated { story_id: sid, .. } => assert_eq!(sid, story_id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn topics_are_isolated_per_event() {
        let hub = EventHub::new();
        let event_a = Uuid::new_v4();
        let event_b = Uuid::new_v4();
        let mut rx_a = hub.subscribe(event_a);
        let _rx_b = hub.subscribe(event_b);

        hub.publish(event_b, FeedEvent::PostCreated { post_id: Uuid::new_v4(), guest_id: Uuid::new_v4() });
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_dropped() {
        let hub = EventHub::new();
        // no panic, no channel created as a side effect of publish
        hub.publish(Uuid::new_v4(), FeedEvent::PostLiked { post_id: Uuid::new_v4(), guest_id: Uuid::new_v4() });
    }
}
