//! Community data: feed posts, events, transfer listings and users
//!
//! Screens receive a [`CommunityRepository`] when they are built; nothing in
//! this module reaches for shared global data.

pub mod optimistic;
pub mod repository;
pub mod requests;
pub mod screens;

use crate::geo::Coordinates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use repository::{CommunityRepository, InMemoryRepository};
pub use requests::{CreateEventRequest, CreatePostRequest, CreateTransferRequest};

/// Season statistics shown on a profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub played_games: u32,
    pub goals: u32,
    pub assists: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub club: String,
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub stats: UserStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    #[default]
    Text,
    Image,
    Video,
    Reel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub user: User,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: PostKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub likes: u32,
    pub comments: u32,
    pub is_liked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub user: User,
    pub title: String,
    pub club: String,
    pub address: String,
    /// Fixture or session description, e.g. "Team Training"
    pub game: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinates>,
    pub participants: u32,
    pub is_joined: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    /// A player looking for a team
    PlayerSeeking,
    /// A team looking for players
    TeamSeeking,
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferKind::PlayerSeeking => write!(f, "player_seeking"),
            TransferKind::TeamSeeking => write!(f, "team_seeking"),
        }
    }
}

impl FromStr for TransferKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "player_seeking" | "player" => Ok(TransferKind::PlayerSeeking),
            "team_seeking" | "team" => Ok(TransferKind::TeamSeeking),
            _ => Err(format!("Unknown transfer type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: String,
    pub user: User,
    #[serde(rename = "type")]
    pub kind: TransferKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// One hit of a community search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum SearchHit {
    Post(Post),
    User(User),
    Event(Event),
    Transfer(Transfer),
}
