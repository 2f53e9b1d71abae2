//! The application composition root.
//!
//! A [`Workspace`] owns every named store, the in-memory entity universe,
//! the selection state, and the user preferences. All mutations funnel
//! through it: the universe is updated synchronously, then the affected
//! collections are persisted. In-memory state stays authoritative; a
//! failed write is logged and the next successful write supersedes it.
//!
//! There are no ambient singletons; whoever constructs the workspace owns
//! all of its state.

use std::path::Path;

use log::{error, info};
use tokio::time::Duration;
use uuid::Uuid;

use crate::{
    Envelope, EntityKind, Folder, FolderPatch, JsonStore, Note, NotePatch, Result,
    SaveScheduler, Selection, Universe,
};

/// Persistence key for the note collection.
const KEY_NOTES: &str = "notes";
/// Persistence key for the folder collection.
const KEY_FOLDERS: &str = "folders";
/// Persistence key for the dark-theme flag.
const KEY_THEME: &str = "theme";
/// Persistence key for the delete-confirmation suppression flag.
const KEY_SUPPRESS_DELETE_CONFIRM: &str = "suppress_delete_confirm";

/// Idle window for coalescing rapid content edits into one write.
const CONTENT_SAVE_DEBOUNCE: Duration = Duration::from_millis(800);

/// Owns the stores, the universe, the selection, and the preferences.
pub struct Workspace {
    store: JsonStore,
    universe: Universe,
    /// Current multi-selection state
    pub selection: Selection,
    dark_theme: bool,
    suppress_delete_confirm: bool,
    saver: SaveScheduler,
}

impl Workspace {
    /// Opens the workspace rooted at `dir`, loading each key independently
    /// with its own default. A corrupt key degrades to its default without
    /// touching the others.
    pub fn open(dir: &Path) -> Result<Self> {
        Self::open_with_debounce(dir, CONTENT_SAVE_DEBOUNCE)
    }

    /// As [`Workspace::open`], with an explicit debounce window.
    pub fn open_with_debounce(dir: &Path, debounce: Duration) -> Result<Self> {
        let store = JsonStore::open(dir)?;

        let notes: Vec<Note> = store.load(KEY_NOTES, Vec::new());
        let folders: Vec<Folder> = store.load(KEY_FOLDERS, Folder::seed());
        let dark_theme = store.load(KEY_THEME, false);
        let suppress_delete_confirm = store.load(KEY_SUPPRESS_DELETE_CONFIRM, false);

        info!(
            "Workspace opened with {} notes and {} folders at {}",
            notes.len(),
            folders.len(),
            dir.display()
        );

        Ok(Self {
            store,
            universe: Universe::new(notes, folders),
            selection: Selection::default(),
            dark_theme,
            suppress_delete_confirm,
            saver: SaveScheduler::new(debounce),
        })
    }

    /// Read access to the entity universe.
    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn dark_theme(&self) -> bool {
        self.dark_theme
    }

    pub fn suppress_delete_confirm(&self) -> bool {
        self.suppress_delete_confirm
    }

    /// Creates a note in `folder_id` (or at root) and persists.
    pub fn create_note(&mut self, folder_id: Option<Uuid>) -> Note {
        let note = self.universe.create_note(folder_id);
        self.persist_notes();
        note
    }

    /// Creates a folder and persists.
    pub fn create_folder(&mut self) -> Folder {
        let folder = self.universe.create_folder();
        self.persist_folders();
        folder
    }

    /// Applies `patch` to a note and persists immediately.
    pub fn update_note(&mut self, id: Uuid, patch: NotePatch) {
        self.universe.update_note(id, patch);
        self.persist_notes();
    }

    /// Applies a content edit to a note, persisting on a debounce.
    ///
    /// The in-memory universe updates immediately; the write to storage is
    /// deferred until the edits go quiet. A new edit inside the window
    /// discards the previously pending write, and so does any other
    /// mutation that persists the notes immediately.
    ///
    /// Requires an active tokio runtime.
    pub fn edit_note_content(&mut self, id: Uuid, content: String) {
        self.universe.update_note(
            id,
            NotePatch {
                content: Some(content),
                ..Default::default()
            },
        );

        let store = self.store.clone();
        let notes = self.universe.notes.clone();
        self.saver.schedule(move || {
            if let Err(e) = store.save(KEY_NOTES, &notes) {
                error!("Deferred note save failed: {}", e);
            }
        });
    }

    /// Applies `patch` to a folder and persists.
    pub fn update_folder(&mut self, id: Uuid, patch: FolderPatch) {
        self.universe.update_folder(id, patch);
        self.persist_folders();
    }

    /// Soft-deletes an entity (folders cascade) and persists.
    pub fn soft_delete(&mut self, kind: EntityKind, id: Uuid) {
        self.universe.soft_delete(kind, id);
        self.persist_all();
    }

    /// Restores an entity from the trash and persists.
    pub fn restore(&mut self, kind: EntityKind, id: Uuid) {
        self.universe.restore(kind, id);
        self.persist_all();
    }

    /// Permanently deletes an entity and persists.
    pub fn permanent_delete(&mut self, kind: EntityKind, id: Uuid) {
        self.universe.permanent_delete(kind, id);
        self.persist_all();
    }

    /// Moves every selected note to `target_folder_id`, then exits
    /// selection mode.
    pub fn batch_move(&mut self, target_folder_id: Option<Uuid>) {
        self.universe
            .batch_move(self.selection.ids(), target_folder_id);
        self.selection.clear();
        self.persist_notes();
    }

    /// Deletes the whole selection (soft, or permanent when `in_trash`),
    /// then exits selection mode.
    pub fn batch_delete(&mut self, in_trash: bool) {
        self.universe.batch_delete(self.selection.ids(), in_trash);
        self.selection.clear();
        self.persist_all();
    }

    /// Group-toggles the favorite flag over the selection, then exits
    /// selection mode.
    pub fn batch_toggle_favorite(&mut self) {
        self.universe.batch_toggle_favorite(self.selection.ids());
        self.selection.clear();
        self.persist_all();
    }

    pub fn set_dark_theme(&mut self, on: bool) {
        self.dark_theme = on;
        if let Err(e) = self.store.save(KEY_THEME, &on) {
            error!("Failed to save theme preference: {}", e);
        }
    }

    pub fn set_suppress_delete_confirm(&mut self, on: bool) {
        self.suppress_delete_confirm = on;
        if let Err(e) = self.store.save(KEY_SUPPRESS_DELETE_CONFIRM, &on) {
            error!("Failed to save delete-confirmation preference: {}", e);
        }
    }

    /// Serializes the full universe into an envelope JSON string.
    pub fn export_json(&self) -> Result<String> {
        Envelope::export(&self.universe).to_json()
    }

    /// Validates `raw` and, on success, replaces the entire universe with
    /// the envelope's contents and persists. A rejected envelope leaves
    /// existing state untouched.
    pub fn import_json(&mut self, raw: &str) -> Result<()> {
        let envelope = Envelope::from_json(raw)?;
        self.universe = envelope.into_universe();
        self.selection.clear();
        self.persist_all();
        info!(
            "Imported {} notes and {} folders",
            self.universe.notes.len(),
            self.universe.folders.len()
        );
        Ok(())
    }

    /// Performs any pending debounced write immediately. Called at
    /// shutdown.
    pub fn flush_pending_saves(&mut self) {
        self.saver.flush();
    }

    fn persist_notes(&mut self) {
        // Writes run after every mutation and must not block interaction;
        // failures are logged and in-memory state stays authoritative.
        // An immediate write supersedes any pending deferred one: the
        // snapshot written here already carries the coalesced content, so
        // letting the older deferred write fire later would clobber it.
        self.saver.cancel();
        if let Err(e) = self.store.save(KEY_NOTES, &self.universe.notes) {
            error!("Failed to save notes: {}", e);
        }
    }

    fn persist_folders(&self) {
        if let Err(e) = self.store.save(KEY_FOLDERS, &self.universe.folders) {
            error!("Failed to save folders: {}", e);
        }
    }

    fn persist_all(&mut self) {
        self.persist_notes();
        self.persist_folders();
    }
}
