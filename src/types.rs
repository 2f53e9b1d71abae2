//! Shared type aliases and the CLI command surface for tidynotes.

use std::path::PathBuf;

use clap::Subcommand;
use uuid::Uuid;

use crate::{Tab, TidyError};

/// A specialized Result type for tidynotes operations.
pub type Result<T> = std::result::Result<T, TidyError>;

/// Available subcommands for the tidynotes application
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note
    New {
        /// Folder to create the note in (root if omitted)
        #[clap(short, long)]
        folder: Option<Uuid>,

        /// Title of the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// Content of the note, stored as an opaque markup string
        #[clap(short, long)]
        content: Option<String>,

        /// Open content in editor before saving
        #[clap(short, long)]
        edit: bool,
    },

    /// Create a new folder
    NewFolder {
        /// Name for the folder (defaults to "New Folder")
        name: Option<String>,
    },

    /// Edit an existing note
    Edit {
        /// ID of the note to edit
        id: Uuid,

        /// New title for the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New content for the note
        #[clap(short, long)]
        content: Option<String>,

        /// Open the existing content in the editor
        #[clap(short, long)]
        edit: bool,
    },

    /// Rename a folder
    Rename {
        /// ID of the folder to rename
        id: Uuid,

        /// New folder name
        name: String,
    },

    /// Move notes into a folder (or to root)
    Move {
        /// IDs of the notes to move (folder ids are ignored)
        #[clap(required = true)]
        ids: Vec<Uuid>,

        /// Target folder (root if omitted)
        #[clap(short, long)]
        folder: Option<Uuid>,
    },

    /// Toggle the favorite flag on a group of notes and folders
    Pin {
        /// IDs of the entities to toggle
        #[clap(required = true)]
        ids: Vec<Uuid>,
    },

    /// Move notes and folders into the trash
    Delete {
        /// IDs of the entities to trash
        #[clap(required = true)]
        ids: Vec<Uuid>,

        /// Skip the confirmation prompt
        #[clap(short = 'F', long)]
        force: bool,
    },

    /// Restore entities from the trash
    Restore {
        /// IDs of the entities to restore
        #[clap(required = true)]
        ids: Vec<Uuid>,
    },

    /// Permanently delete trashed entities
    Purge {
        /// IDs of the trashed entities to remove forever
        #[clap(required = true)]
        ids: Vec<Uuid>,

        /// Skip the confirmation prompt
        #[clap(short = 'F', long)]
        force: bool,
    },

    /// List the visible notes and folders for a view
    List {
        /// View tab to compute
        #[clap(short, long, value_enum, default_value_t = Tab::All)]
        tab: Tab,

        /// Search query (case-insensitive substring)
        #[clap(short, long)]
        query: Option<String>,

        /// Show only the notes contained in this folder
        #[clap(long)]
        folder: Option<Uuid>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Search notes and folders by substring
    Search {
        /// Search query text
        query: String,

        /// View tab to search within
        #[clap(short, long, value_enum, default_value_t = Tab::All)]
        tab: Tab,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Export all notes and folders to a JSON envelope
    Export {
        /// Path for the envelope file (stdout if omitted)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a JSON envelope, replacing all notes and folders
    Import {
        /// Path to the envelope file
        input: PathBuf,

        /// Skip the confirmation prompt
        #[clap(short = 'F', long)]
        force: bool,
    },

    /// Show or change persisted preferences
    Config {
        /// Show current preferences
        #[clap(short = 'S', long)]
        show: bool,

        /// Enable or disable the dark theme
        #[clap(long)]
        dark_theme: Option<bool>,

        /// Suppress the delete confirmation prompt
        #[clap(long)]
        suppress_delete_confirm: Option<bool>,
    },
}
