use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug)]
pub struct StoryCreate {
    pub media_url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, FromRow)]
pub struct StoryDto {
    pub id: Uuid,
    pub wedding_event_id: Uuid,
    pub guest_id: Uuid,
    pub media_url: String,
    pub is_image: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

// row shape for the grouped feed: story columns joined with its author
#[derive(Debug, FromRow)]
pub struct StoryFeedRow {
    pub id: Uuid,
    pub wedding_event_id: Uuid,
    pub guest_id: Uuid,
    pub media_url: String,
    pub is_image: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoryGroup {
    pub guest_id: Uuid,
    pub guest_name: String,
    pub guest_avatar: Option<String>,
    pub stories: Vec<StoryDto>,
}

/// Groups a flat, creation-ordered story list by author: one group per guest
/// with at least one story. Group order follows each guest's first (earliest)
/// story and the within-group order of the input is preserved, never re-sorted.
pub fn group_stories(rows: Vec<StoryFeedRow>) -> Vec<StoryGroup> {
    let mut groups: Vec<StoryGroup> = Vec::new();
    for row in rows {
        let story = StoryDto {
            id: row.id,
            wedding_event_id: row.wedding_event_id,
            guest_id: row.guest_id,
            media_url: row.media_url,
            is_image: row.is_image,
            created_at: row.created_at,
            expires_at: row.expires_at,
        };
        match groups.iter_mut().find(|g| g.guest_id == story.guest_id) {
            Some(group) => group.stories.push(story),
            None => groups.push(StoryGroup {
                guest_id: story.guest_id,
                guest_name: row.display_name,
                guest_avatar: row.avatar_url,
                stories: vec![story],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn feed_row(guest: Uuid, name: &str, minutes_ago: i64) -> StoryFeedRow {
        let created = Utc::now() - Duration::minutes(minutes_ago);
        StoryFeedRow {
            id: Uuid::new_v4(),
            wedding_event_id: Uuid::new_v4(),
            guest_id: guest,
            media_url: "/uploads/a.jpg".to_string(),
            is_image: true,
            created_at: created,
            expires_at: created + Duration::hours(24),
            display_name: name.to_string(),
            avatar_url: None,
        }
    }

    #[test]
    fn one_group_per_guest_in_first_seen_order() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let rows = vec![
            feed_row(alice, "Alice", 30),
            feed_row(bob, "Bob", 20),
            feed_row(alice, "Alice", 10),
        ];

        let groups = group_stories(rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].guest_id, alice);
        assert_eq!(groups[0].stories.len(), 2);
        assert_eq!(groups[1].guest_id, bob);
        assert_eq!(groups[1].stories.len(), 1);
    }

    #[test]
    fn within_group_order_is_preserved() {
        let alice = Uuid::new_v4();
        let rows = vec![
            feed_row(alice, "Alice", 30),
            feed_row(alice, "Alice", 20),
            feed_row(alice, "Alice", 10),
        ];

        let groups = group_stories(rows);
        let stories = &groups[0].stories;
        assert!(stories[0].created_at < stories[1].created_at);
        assert!(stories[1].created_at < stories[2].created_at);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_stories(vec![]).is_empty());
    }
}
