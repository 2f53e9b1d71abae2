//! Core data structures for the tidynotes application.
//!
//! This module contains the primary types used throughout the application:
//! the Note and Folder records, their opaque style attributes, and the
//! entity-kind discriminator used when a bare id must be resolved against
//! both collections.
//!
//! All fields serialize in camelCase so the persisted form and the
//! export envelope share one shape.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Returns the current time as integer milliseconds since the Unix epoch.
///
/// Every `created_at`/`updated_at` value in the data model uses this
/// representation.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Discriminates the two entity kinds sharing the id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Note,
    Folder,
}

/// Opaque color attribute carried on notes and folders.
///
/// The core never interprets these beyond round-tripping them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleColor {
    #[default]
    Yellow,
    Blue,
    Green,
    Pink,
    Purple,
    Orange,
}

/// Opaque shape attribute carried on notes and folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleShape {
    #[default]
    Square,
    Rounded,
    Circle,
}

/// Opaque icon attribute carried on notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleIcon {
    #[default]
    Document,
    Idea,
    Task,
    Star,
    Heart,
}

/// Represents a single note in our system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier for the note, assigned at creation, immutable
    pub id: Uuid,
    /// Note title, may be empty
    pub title: String,
    /// Note content as a markup string, opaque to the core
    pub content: String,
    /// Containing folder, or None for a root note
    pub folder_id: Option<Uuid>,
    /// Marks the note as a favorite
    pub is_pinned: bool,
    /// Marks the note as trashed
    pub is_deleted: bool,
    /// Opaque style attributes
    pub color: StyleColor,
    pub shape: StyleShape,
    pub icon: StyleIcon,
    /// When the note was created (epoch milliseconds)
    pub created_at: i64,
    /// Last modification time (epoch milliseconds), refreshed on every
    /// mutating operation
    pub updated_at: i64,
}

impl Note {
    /// Creates a new empty note in the given folder (or at root).
    pub fn new(folder_id: Option<Uuid>) -> Self {
        let now = now_ms();

        Note {
            id: Uuid::new_v4(),
            title: String::new(),
            content: String::new(),
            folder_id,
            is_pinned: false,
            is_deleted: false,
            color: StyleColor::default(),
            shape: StyleShape::default(),
            icon: StyleIcon::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// True when the title or content contains `needle`, case-insensitively.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
    }
}

/// Represents a folder grouping notes. Folders are flat: a folder cannot
/// contain another folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique identifier for the folder
    pub id: Uuid,
    /// Folder display name
    pub name: String,
    /// Marks the folder as a favorite
    pub is_pinned: bool,
    /// Marks the folder as trashed
    pub is_deleted: bool,
    /// Opaque style attributes
    pub color: StyleColor,
    pub shape: StyleShape,
}

impl Folder {
    /// Creates a new folder with the default name and style.
    pub fn new() -> Self {
        Self::named("New Folder")
    }

    /// Creates a new folder with the given name and default style.
    pub fn named(name: &str) -> Self {
        Folder {
            id: Uuid::new_v4(),
            name: name.to_string(),
            is_pinned: false,
            is_deleted: false,
            color: StyleColor::default(),
            shape: StyleShape::default(),
        }
    }

    /// The folders seeded into an empty workspace on first run.
    pub fn seed() -> Vec<Folder> {
        vec![Folder::named("Personal"), Folder::named("Work")]
    }

    /// True when the name contains `needle`, case-insensitively.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl Default for Folder {
    fn default() -> Self {
        Self::new()
    }
}
