//! Entity lifecycle management.
//!
//! The [`Universe`] owns the full in-memory collections of notes and folders
//! and implements the state-transition rules: creation, attribute updates,
//! soft-deletion into the trash (with the folder-to-note cascade),
//! restoration, and permanent deletion.
//!
//! Every operation here is synchronous, touches nothing but the collections,
//! and treats a missing target id as a silent no-op. Persistence is layered
//! on top by the workspace.

use log::{debug, trace};
use uuid::Uuid;

use crate::{now_ms, EntityKind, Folder, Note, StyleColor, StyleIcon, StyleShape};

/// A partial update for a note. `None` fields are left untouched.
///
/// `folder_id` is doubly optional: the outer `Option` is "change it or not",
/// the inner one is "root or a folder".
#[derive(Debug, Clone, Default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub folder_id: Option<Option<Uuid>>,
    pub is_pinned: Option<bool>,
    pub color: Option<StyleColor>,
    pub shape: Option<StyleShape>,
    pub icon: Option<StyleIcon>,
}

/// A partial update for a folder. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct FolderPatch {
    pub name: Option<String>,
    pub is_pinned: Option<bool>,
    pub color: Option<StyleColor>,
    pub shape: Option<StyleShape>,
}

/// The complete entity universe: every note and folder, live or trashed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Universe {
    /// All notes, newest-first by insertion
    pub notes: Vec<Note>,
    /// All folders, in creation order
    pub folders: Vec<Folder>,
}

impl Universe {
    pub fn new(notes: Vec<Note>, folders: Vec<Folder>) -> Self {
        Self { notes, folders }
    }

    /// Looks up a note by id.
    pub fn note(&self, id: Uuid) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Looks up a folder by id.
    pub fn folder(&self, id: Uuid) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Resolves which collection an id belongs to by probing both.
    pub fn kind_of(&self, id: Uuid) -> Option<EntityKind> {
        if self.note(id).is_some() {
            Some(EntityKind::Note)
        } else if self.folder(id).is_some() {
            Some(EntityKind::Folder)
        } else {
            None
        }
    }

    /// Creates a new empty note in `folder_id` (or at root) and inserts it
    /// at the head of the collection.
    pub fn create_note(&mut self, folder_id: Option<Uuid>) -> Note {
        let note = Note::new(folder_id);
        debug!("Creating note {} in folder {:?}", note.id, folder_id);
        self.notes.insert(0, note.clone());
        note
    }

    /// Creates a new folder named "New Folder" and appends it to the end of
    /// the collection.
    pub fn create_folder(&mut self) -> Folder {
        let folder = Folder::new();
        debug!("Creating folder {}", folder.id);
        self.folders.push(folder.clone());
        folder
    }

    /// Merges `patch` into the note matching `id` and refreshes its
    /// `updated_at`. No-op if the id is absent.
    pub fn update_note(&mut self, id: Uuid, patch: NotePatch) {
        let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
            trace!("update_note: {} not found, ignoring", id);
            return;
        };

        if let Some(title) = patch.title {
            note.title = title;
        }
        if let Some(content) = patch.content {
            note.content = content;
        }
        if let Some(folder_id) = patch.folder_id {
            note.folder_id = folder_id;
        }
        if let Some(is_pinned) = patch.is_pinned {
            note.is_pinned = is_pinned;
        }
        if let Some(color) = patch.color {
            note.color = color;
        }
        if let Some(shape) = patch.shape {
            note.shape = shape;
        }
        if let Some(icon) = patch.icon {
            note.icon = icon;
        }
        note.updated_at = now_ms();
    }

    /// Merges `patch` into the folder matching `id`. Folders track no
    /// modification time. No-op if the id is absent.
    pub fn update_folder(&mut self, id: Uuid, patch: FolderPatch) {
        let Some(folder) = self.folders.iter_mut().find(|f| f.id == id) else {
            trace!("update_folder: {} not found, ignoring", id);
            return;
        };

        if let Some(name) = patch.name {
            folder.name = name;
        }
        if let Some(is_pinned) = patch.is_pinned {
            folder.is_pinned = is_pinned;
        }
        if let Some(color) = patch.color {
            folder.color = color;
        }
        if let Some(shape) = patch.shape {
            folder.shape = shape;
        }
    }

    /// Moves the matching record into the trash.
    ///
    /// Soft-deleting a folder first spills its notes to root (clearing
    /// their `folder_id`), then marks the folder deleted. The notes
    /// themselves stay live. No-op if the id is absent.
    pub fn soft_delete(&mut self, kind: EntityKind, id: Uuid) {
        match kind {
            EntityKind::Note => {
                if let Some(note) = self.notes.iter_mut().find(|n| n.id == id) {
                    debug!("Soft-deleting note {}", id);
                    note.is_deleted = true;
                    note.updated_at = now_ms();
                }
            }
            EntityKind::Folder => {
                let now = now_ms();
                let mut spilled = 0;
                for note in self
                    .notes
                    .iter_mut()
                    .filter(|n| n.folder_id == Some(id))
                {
                    note.folder_id = None;
                    note.updated_at = now;
                    spilled += 1;
                }
                if let Some(folder) = self.folders.iter_mut().find(|f| f.id == id) {
                    debug!("Soft-deleting folder {}, spilled {} notes to root", id, spilled);
                    folder.is_deleted = true;
                }
            }
        }
    }

    /// Brings the matching record back out of the trash.
    ///
    /// Restoring a folder does not re-associate previously spilled notes;
    /// the spill is permanent. No-op if the id is absent.
    pub fn restore(&mut self, kind: EntityKind, id: Uuid) {
        match kind {
            EntityKind::Note => {
                if let Some(note) = self.notes.iter_mut().find(|n| n.id == id) {
                    debug!("Restoring note {}", id);
                    note.is_deleted = false;
                    note.updated_at = now_ms();
                }
            }
            EntityKind::Folder => {
                if let Some(folder) = self.folders.iter_mut().find(|f| f.id == id) {
                    debug!("Restoring folder {}", id);
                    folder.is_deleted = false;
                }
            }
        }
    }

    /// Removes the matching record from the universe entirely.
    ///
    /// Reachable only from the trash view; never cascades (a trashed
    /// folder's former notes were already spilled at soft-delete time).
    /// No-op if the id is absent.
    pub fn permanent_delete(&mut self, kind: EntityKind, id: Uuid) {
        match kind {
            EntityKind::Note => {
                let before = self.notes.len();
                self.notes.retain(|n| n.id != id);
                if self.notes.len() < before {
                    debug!("Permanently deleted note {}", id);
                }
            }
            EntityKind::Folder => {
                let before = self.folders.len();
                self.folders.retain(|f| f.id != id);
                if self.folders.len() < before {
                    debug!("Permanently deleted folder {}", id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_note_inserts_at_head() {
        let mut universe = Universe::default();
        let first = universe.create_note(None);
        let second = universe.create_note(None);

        assert_eq!(universe.notes[0].id, second.id);
        assert_eq!(universe.notes[1].id, first.id);
        assert_eq!(second.folder_id, None);
        assert!(!second.is_deleted);
        assert!(!second.is_pinned);
    }

    #[test]
    fn create_folder_appends_at_tail() {
        let mut universe = Universe::default();
        let first = universe.create_folder();
        let second = universe.create_folder();

        assert_eq!(universe.folders[0].id, first.id);
        assert_eq!(universe.folders[1].id, second.id);
        assert_eq!(second.name, "New Folder");
    }

    #[test]
    fn update_note_merges_patch_and_refreshes_timestamp() {
        let mut universe = Universe::default();
        let note = universe.create_note(None);

        universe.update_note(
            note.id,
            NotePatch {
                title: Some("Groceries".to_string()),
                is_pinned: Some(true),
                ..Default::default()
            },
        );

        let updated = universe.note(note.id).unwrap();
        assert_eq!(updated.title, "Groceries");
        assert!(updated.is_pinned);
        assert!(updated.updated_at >= note.updated_at);
        // Untouched fields survive.
        assert_eq!(updated.content, "");
        assert_eq!(updated.created_at, note.created_at);
    }

    #[test]
    fn update_with_unknown_id_is_a_no_op() {
        let mut universe = Universe::default();
        universe.create_note(None);
        let snapshot = universe.clone();

        universe.update_note(
            Uuid::new_v4(),
            NotePatch {
                title: Some("ghost".to_string()),
                ..Default::default()
            },
        );
        universe.update_folder(
            Uuid::new_v4(),
            FolderPatch {
                name: Some("ghost".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(universe, snapshot);
    }

    #[test]
    fn folder_soft_delete_spills_notes_but_does_not_delete_them() {
        let mut universe = Universe::default();
        let folder = universe.create_folder();
        let n1 = universe.create_note(Some(folder.id));
        let n2 = universe.create_note(Some(folder.id));
        let outside = universe.create_note(None);

        universe.soft_delete(EntityKind::Folder, folder.id);

        assert!(universe.folder(folder.id).unwrap().is_deleted);
        for id in [n1.id, n2.id] {
            let note = universe.note(id).unwrap();
            assert_eq!(note.folder_id, None);
            assert!(!note.is_deleted);
        }
        assert_eq!(universe.note(outside.id).unwrap().folder_id, None);
    }

    #[test]
    fn restore_does_not_reattach_spilled_notes() {
        let mut universe = Universe::default();
        let folder = universe.create_folder();
        let note = universe.create_note(Some(folder.id));

        universe.soft_delete(EntityKind::Folder, folder.id);
        universe.restore(EntityKind::Folder, folder.id);

        assert!(!universe.folder(folder.id).unwrap().is_deleted);
        // The spill is permanent: the note stays at root.
        assert_eq!(universe.note(note.id).unwrap().folder_id, None);
    }

    #[test]
    fn restore_note_clears_deleted_flag() {
        let mut universe = Universe::default();
        let note = universe.create_note(None);

        universe.soft_delete(EntityKind::Note, note.id);
        assert!(universe.note(note.id).unwrap().is_deleted);

        universe.restore(EntityKind::Note, note.id);
        assert!(!universe.note(note.id).unwrap().is_deleted);
    }

    #[test]
    fn permanent_delete_removes_record_without_cascading() {
        let mut universe = Universe::default();
        let folder = universe.create_folder();
        let note = universe.create_note(Some(folder.id));

        universe.soft_delete(EntityKind::Folder, folder.id);
        universe.permanent_delete(EntityKind::Folder, folder.id);

        assert!(universe.folder(folder.id).is_none());
        assert!(universe.note(note.id).is_some());
    }

    #[test]
    fn permanent_delete_of_unknown_id_is_a_no_op() {
        let mut universe = Universe::default();
        universe.create_note(None);
        universe.create_folder();
        let snapshot = universe.clone();

        universe.permanent_delete(EntityKind::Note, Uuid::new_v4());
        universe.permanent_delete(EntityKind::Folder, Uuid::new_v4());

        assert_eq!(universe, snapshot);
    }

    #[test]
    fn kind_of_probes_both_collections() {
        let mut universe = Universe::default();
        let note = universe.create_note(None);
        let folder = universe.create_folder();

        assert_eq!(universe.kind_of(note.id), Some(EntityKind::Note));
        assert_eq!(universe.kind_of(folder.id), Some(EntityKind::Folder));
        assert_eq!(universe.kind_of(Uuid::new_v4()), None);
    }
}
