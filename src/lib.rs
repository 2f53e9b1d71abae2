//! Personal note-organizing library
//!
//! This library provides the entity lifecycle and view-computation engine
//! behind tidynotes: notes and folders with pinned favorites, a soft-delete
//! trash with folder-to-note cascading, batch operations over mixed
//! selections, a pure view/filter pipeline, JSON persistence, and a
//! versioned import/export envelope.

mod cli;
mod envelope;
mod errors;
mod lifecycle;
mod model;
mod save_scheduler;
mod selection;
mod store;
mod types;
mod view;
mod workspace;

// Re-export key components
pub use cli::*;
pub use envelope::*;
pub use errors::*;
pub use lifecycle::*;
pub use model::*;
pub use save_scheduler::*;
pub use selection::*;
pub use store::*;
pub use types::*;
pub use view::*;
pub use workspace::*;
