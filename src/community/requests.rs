//! Create requests for posts, events and transfers
//!
//! Each action has its own request type. `validate` trims the input, turns
//! blank optionals into `None`, and is the only way to obtain the validated
//! form the repository accepts.

use crate::community::{PostKind, TransferKind};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

fn required(value: &str, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::Validation(message.to_string()))
    } else {
        Ok(trimmed.to_string())
    }
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Create-post form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(default, rename = "type")]
    pub kind: PostKind,
}

/// Validated post
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub content: String,
    pub kind: PostKind,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<NewPost> {
        Ok(NewPost {
            content: required(&self.content, "Please enter some content for your post")?,
            kind: self.kind,
        })
    }
}

/// Create-event form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub club: String,
    pub address: String,
    pub game: String,
    /// Defaults to the time of creation
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Validated event
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub club: String,
    pub address: String,
    pub game: String,
    pub date: DateTime<Utc>,
}

impl CreateEventRequest {
    pub fn validate(&self) -> Result<NewEvent> {
        const MISSING: &str = "Please fill in all required fields";
        Ok(NewEvent {
            title: required(&self.title, MISSING)?,
            club: required(&self.club, MISSING)?,
            address: required(&self.address, MISSING)?,
            game: required(&self.game, MISSING)?,
            date: self.date.unwrap_or_else(Utc::now),
        })
    }
}

/// Create-transfer form
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransferRequest {
    #[serde(rename = "type")]
    pub kind: TransferKind,
    #[serde(default)]
    pub position: Option<String>,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// Validated transfer listing
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransfer {
    pub kind: TransferKind,
    pub position: Option<String>,
    pub description: String,
    pub location: Option<String>,
}

impl CreateTransferRequest {
    pub fn validate(&self) -> Result<NewTransfer> {
        Ok(NewTransfer {
            kind: self.kind,
            position: optional(self.position.as_deref()),
            description: required(&self.description, "Please provide a description")?,
            location: optional(self.location.as_deref()),
        })
    }
}
