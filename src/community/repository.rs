//! Community data access
//!
//! [`CommunityRepository`] is handed to every screen and to the HTTP server.
//! [`InMemoryRepository`] keeps everything for the lifetime of the process.

use crate::community::requests::{NewEvent, NewPost, NewTransfer};
use crate::community::{Event, Post, PostKind, Transfer, TransferKind, User, UserStats};
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use chrono::{Duration, Utc};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Source of community posts, events, transfers and users
pub trait CommunityRepository: Send + Sync {
    /// The signed-in user, author of everything created through this repository
    fn current_user(&self) -> User;

    fn users(&self) -> Vec<User>;

    /// Posts, newest first
    fn posts(&self) -> Vec<Post>;

    fn events(&self) -> Vec<Event>;

    /// Transfer listings, newest first
    fn transfers(&self) -> Vec<Transfer>;

    fn create_post(&self, post: NewPost) -> Result<Post>;

    fn create_event(&self, event: NewEvent) -> Result<Event>;

    fn create_transfer(&self, transfer: NewTransfer) -> Result<Transfer>;

    /// Set the like flag on a post, adjusting its like count when the flag changes
    fn set_post_liked(&self, id: &str, liked: bool) -> Result<Post>;

    /// Set the join flag on an event, adjusting its participant count when the flag changes
    fn set_event_joined(&self, id: &str, joined: bool) -> Result<Event>;

    /// Flip the like flag on a post in one step
    fn toggle_post_like(&self, id: &str) -> Result<Post>;

    /// Flip the join flag on an event in one step
    fn toggle_event_join(&self, id: &str) -> Result<Event>;
}

#[derive(Debug, Default)]
struct Store {
    users: Vec<User>,
    posts: Vec<Post>,
    events: Vec<Event>,
    transfers: Vec<Transfer>,
}

/// Repository kept in memory
#[derive(Debug)]
pub struct InMemoryRepository {
    current_user: User,
    store: RwLock<Store>,
}

impl InMemoryRepository {
    /// Empty repository with the given signed-in user
    pub fn new(current_user: User) -> Self {
        let store = Store {
            users: vec![current_user.clone()],
            ..Store::default()
        };
        Self {
            current_user,
            store: RwLock::new(store),
        }
    }

    /// Repository filled with a small local community
    pub fn seeded() -> Self {
        let users = seed_users();
        let now = Utc::now();
        let hours_ago = |h: i64| now - Duration::hours(h);
        let days_ahead = |d: i64| now + Duration::days(d);

        let posts = vec![
            Post {
                id: "1".to_string(),
                user: users[0].clone(),
                content: "Great training session today! Ready for the weekend match 💪⚽"
                    .to_string(),
                kind: PostKind::Text,
                media: Vec::new(),
                timestamp: hours_ago(2),
                likes: 24,
                comments: 5,
                is_liked: false,
            },
            Post {
                id: "2".to_string(),
                user: users[1].clone(),
                content: "Match highlights from yesterday's game!".to_string(),
                kind: PostKind::Video,
                media: vec![
                    "https://images.unsplash.com/photo-1574629810360-7efbbe195018?w=400&h=300&fit=crop"
                        .to_string(),
                ],
                timestamp: hours_ago(5),
                likes: 45,
                comments: 12,
                is_liked: true,
            },
            Post {
                id: "3".to_string(),
                user: users[2].clone(),
                content: "Clean sheet today! Team defense was incredible 🥅".to_string(),
                kind: PostKind::Image,
                media: vec![
                    "https://images.unsplash.com/photo-1551698618-1dfe5d97d256?w=400&h=300&fit=crop"
                        .to_string(),
                ],
                timestamp: hours_ago(8),
                likes: 32,
                comments: 8,
                is_liked: false,
            },
        ];

        let events = vec![
            Event {
                id: "1".to_string(),
                user: users[0].clone(),
                title: "Weekend Match".to_string(),
                club: "SG Hassendorf/Bötersen".to_string(),
                address: "Am weissen Moor".to_string(),
                game: "SG Hassendorf/Bötersen vs. SG Reeßum/Taaken".to_string(),
                date: days_ahead(2),
                location: Some(Coordinates::new(53.2194, 9.4083)),
                participants: 18,
                is_joined: false,
            },
            Event {
                id: "2".to_string(),
                user: users[1].clone(),
                title: "Training Session".to_string(),
                club: "SG Reeßum/Taaken".to_string(),
                address: "Sportplatz Reeßum".to_string(),
                game: "Team Training".to_string(),
                date: days_ahead(1),
                location: Some(Coordinates::new(53.1894, 9.3583)),
                participants: 12,
                is_joined: true,
            },
        ];

        let transfers = vec![
            Transfer {
                id: "1".to_string(),
                user: users[0].clone(),
                kind: TransferKind::PlayerSeeking,
                position: Some("Midfielder".to_string()),
                description: "Experienced midfielder looking for new team. Available for training 3x per week."
                    .to_string(),
                timestamp: hours_ago(24),
                location: Some("Bremen Area".to_string()),
            },
            Transfer {
                id: "2".to_string(),
                user: users[1].clone(),
                kind: TransferKind::TeamSeeking,
                position: Some("Defender".to_string()),
                description: "SG Reeßum/Taaken looking for experienced defender for upcoming season."
                    .to_string(),
                timestamp: hours_ago(72),
                location: Some("Reeßum".to_string()),
            },
        ];

        Self {
            current_user: users[0].clone(),
            store: RwLock::new(Store {
                users,
                posts,
                events,
                transfers,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(|p| p.into_inner())
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::seeded()
    }
}

fn seed_users() -> Vec<User> {
    let user = |id: &str, name: &str, club: &str, position: &str, avatar: &str, stats: (u32, u32, u32)| User {
        id: id.to_string(),
        name: name.to_string(),
        club: club.to_string(),
        position: position.to_string(),
        avatar: Some(format!(
            "https://images.unsplash.com/{}?w=150&h=150&fit=crop&crop=face",
            avatar
        )),
        stats: UserStats {
            played_games: stats.0,
            goals: stats.1,
            assists: stats.2,
        },
    };

    vec![
        user(
            "1",
            "Max Müller",
            "SG Hassendorf/Bötersen",
            "Midfielder",
            "photo-1507003211169-0a1dd7228f2d",
            (25, 8, 12),
        ),
        user(
            "2",
            "Anna Schmidt",
            "SG Reeßum/Taaken",
            "Forward",
            "photo-1494790108755-2616b612b786",
            (22, 15, 6),
        ),
        user(
            "3",
            "Tom Weber",
            "FC Bremen Nord",
            "Goalkeeper",
            "photo-1472099645785-5658abf4ff4e",
            (28, 0, 2),
        ),
    ]
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl CommunityRepository for InMemoryRepository {
    fn current_user(&self) -> User {
        self.current_user.clone()
    }

    fn users(&self) -> Vec<User> {
        self.read().users.clone()
    }

    fn posts(&self) -> Vec<Post> {
        self.read().posts.clone()
    }

    fn events(&self) -> Vec<Event> {
        self.read().events.clone()
    }

    fn transfers(&self) -> Vec<Transfer> {
        self.read().transfers.clone()
    }

    fn create_post(&self, post: NewPost) -> Result<Post> {
        let post = Post {
            id: new_id(),
            user: self.current_user.clone(),
            content: post.content,
            kind: post.kind,
            media: Vec::new(),
            timestamp: Utc::now(),
            likes: 0,
            comments: 0,
            is_liked: false,
        };
        self.write().posts.insert(0, post.clone());
        tracing::debug!(id = %post.id, "created post");
        Ok(post)
    }

    fn create_event(&self, event: NewEvent) -> Result<Event> {
        let event = Event {
            id: new_id(),
            user: self.current_user.clone(),
            title: event.title,
            club: event.club,
            address: event.address,
            game: event.game,
            date: event.date,
            location: None,
            participants: 1,
            is_joined: true,
        };
        self.write().events.push(event.clone());
        tracing::debug!(id = %event.id, "created event");
        Ok(event)
    }

    fn create_transfer(&self, transfer: NewTransfer) -> Result<Transfer> {
        let transfer = Transfer {
            id: new_id(),
            user: self.current_user.clone(),
            kind: transfer.kind,
            position: transfer.position,
            description: transfer.description,
            timestamp: Utc::now(),
            location: transfer.location,
        };
        self.write().transfers.insert(0, transfer.clone());
        tracing::debug!(id = %transfer.id, "created transfer");
        Ok(transfer)
    }

    fn set_post_liked(&self, id: &str, liked: bool) -> Result<Post> {
        let mut store = self.write();
        let post = find_post(&mut store, id)?;
        mark_liked(post, liked);
        Ok(post.clone())
    }

    fn set_event_joined(&self, id: &str, joined: bool) -> Result<Event> {
        let mut store = self.write();
        let event = find_event(&mut store, id)?;
        mark_joined(event, joined);
        Ok(event.clone())
    }

    fn toggle_post_like(&self, id: &str) -> Result<Post> {
        let mut store = self.write();
        let post = find_post(&mut store, id)?;
        let liked = !post.is_liked;
        mark_liked(post, liked);
        Ok(post.clone())
    }

    fn toggle_event_join(&self, id: &str) -> Result<Event> {
        let mut store = self.write();
        let event = find_event(&mut store, id)?;
        let joined = !event.is_joined;
        mark_joined(event, joined);
        Ok(event.clone())
    }
}

fn find_post<'a>(store: &'a mut Store, id: &str) -> Result<&'a mut Post> {
    store
        .posts
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| Error::NotFound(format!("Post not found: {}", id)))
}

fn find_event<'a>(store: &'a mut Store, id: &str) -> Result<&'a mut Event> {
    store
        .events
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or_else(|| Error::NotFound(format!("Event not found: {}", id)))
}

/// Counts only move when the flag actually changes
fn mark_liked(post: &mut Post, liked: bool) {
    if post.is_liked != liked {
        post.is_liked = liked;
        post.likes = if liked {
            post.likes + 1
        } else {
            post.likes.saturating_sub(1)
        };
    }
}

fn mark_joined(event: &mut Event, joined: bool) {
    if event.is_joined != joined {
        event.is_joined = joined;
        event.participants = if joined {
            event.participants + 1
        } else {
            event.participants.saturating_sub(1)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_repository() {
        let repo = InMemoryRepository::seeded();
        assert_eq!(repo.current_user().name, "Max Müller");
        assert_eq!(repo.users().len(), 3);
        assert_eq!(repo.posts().len(), 3);
        assert_eq!(repo.transfers().len(), 2);

        let events = repo.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].participants, 12);
        assert!(events[1].is_joined);
    }

    #[test]
    fn test_create_post_goes_first() {
        let repo = InMemoryRepository::seeded();
        let post = repo
            .create_post(NewPost {
                content: "Derby on Sunday".to_string(),
                kind: PostKind::Text,
            })
            .unwrap();

        let posts = repo.posts();
        assert_eq!(posts[0].id, post.id);
        assert_eq!(post.user.id, "1");
        assert_eq!(post.likes, 0);
    }

    #[test]
    fn test_create_event_joins_author() {
        let repo = InMemoryRepository::new(seed_users().remove(2));
        let event = repo
            .create_event(NewEvent {
                title: "Keeper Training".to_string(),
                club: "FC Bremen Nord".to_string(),
                address: "Vegesack".to_string(),
                game: "Training".to_string(),
                date: Utc::now(),
            })
            .unwrap();

        assert!(event.is_joined);
        assert_eq!(event.participants, 1);
        assert_eq!(event.user.name, "Tom Weber");
        assert_eq!(repo.events().len(), 1);
    }

    #[test]
    fn test_like_adjusts_count_once() {
        let repo = InMemoryRepository::seeded();
        let post = repo.set_post_liked("1", true).unwrap();
        assert_eq!(post.likes, 25);

        // Setting the same flag again is a no-op
        let post = repo.set_post_liked("1", true).unwrap();
        assert_eq!(post.likes, 25);

        let post = repo.set_post_liked("1", false).unwrap();
        assert!(!post.is_liked);
        assert_eq!(post.likes, 24);
    }

    #[test]
    fn test_leave_event() {
        let repo = InMemoryRepository::seeded();
        let event = repo.set_event_joined("2", false).unwrap();
        assert!(!event.is_joined);
        assert_eq!(event.participants, 11);
    }

    #[test]
    fn test_unknown_ids() {
        let repo = InMemoryRepository::seeded();
        assert!(matches!(
            repo.set_post_liked("missing", true),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            repo.set_event_joined("missing", true),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_toggle_twice_restores_post() {
        let repo = InMemoryRepository::seeded();

        let post = repo.toggle_post_like("1").unwrap();
        assert!(post.is_liked);
        assert_eq!(post.likes, 25);

        let post = repo.toggle_post_like("1").unwrap();
        assert!(!post.is_liked);
        assert_eq!(post.likes, 24);
    }

    #[test]
    fn test_toggle_twice_restores_event() {
        let repo = InMemoryRepository::seeded();

        let event = repo.toggle_event_join("2").unwrap();
        assert!(!event.is_joined);
        assert_eq!(event.participants, 11);

        let event = repo.toggle_event_join("2").unwrap();
        assert!(event.is_joined);
        assert_eq!(event.participants, 12);
    }

    #[test]
    fn test_concurrent_toggles_are_not_lost() {
        let repo = InMemoryRepository::seeded();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        repo.toggle_post_like("1").unwrap();
                        repo.toggle_event_join("1").unwrap();
                    }
                });
            }
        });

        // 200 toggles each: every flag ends where it started
        let post = repo.posts().into_iter().find(|p| p.id == "1").unwrap();
        assert!(!post.is_liked);
        assert_eq!(post.likes, 24);
        let event = repo.events().into_iter().find(|e| e.id == "1").unwrap();
        assert!(!event.is_joined);
        assert_eq!(event.participants, 18);
    }

    #[test]
    fn test_toggle_unknown_ids() {
        let repo = InMemoryRepository::seeded();
        assert!(matches!(repo.toggle_post_like("missing"), Err(Error::NotFound(_))));
        assert!(matches!(repo.toggle_event_join("missing"), Err(Error::NotFound(_))));
    }
}
