//! The view/filter engine.
//!
//! [`compute_view`] derives the visible note and folder lists for a given
//! (tab, search query) pair. It holds no caches: every call is a pure
//! function of the universe and its arguments.
//!
//! The pipeline:
//! 1. partition by trash membership,
//! 2. narrow by tab (favorites / folders-only / notes-only),
//! 3. narrow by case-insensitive substring search,
//! 4. sort notes by `updated_at` descending (stable); folders keep
//!    creation order.

use clap::ValueEnum;
use uuid::Uuid;

use crate::{Folder, Note, Universe};

/// The active view tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Tab {
    #[default]
    All,
    Favorites,
    Folders,
    Notes,
    Trash,
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tab::All => "all",
            Tab::Favorites => "favorites",
            Tab::Folders => "folders",
            Tab::Notes => "notes",
            Tab::Trash => "trash",
        };
        f.write_str(name)
    }
}

/// The visible slice of the universe for one (tab, query) pair.
#[derive(Debug, Clone, Default)]
pub struct ViewSlice {
    /// Visible notes, most recently modified first
    pub notes: Vec<Note>,
    /// Visible folders, in creation order
    pub folders: Vec<Folder>,
}

/// Computes the visible notes and folders for `tab` and `query`.
pub fn compute_view(universe: &Universe, tab: Tab, query: &str) -> ViewSlice {
    let in_trash = tab == Tab::Trash;

    // Step 1: trash partition. The trash shows only deleted records; every
    // other tab shows only live ones.
    let mut notes: Vec<Note> = universe
        .notes
        .iter()
        .filter(|n| n.is_deleted == in_trash)
        .cloned()
        .collect();
    let mut folders: Vec<Folder> = universe
        .folders
        .iter()
        .filter(|f| f.is_deleted == in_trash)
        .cloned()
        .collect();

    // Step 2: tab narrowing.
    match tab {
        Tab::Favorites => {
            notes.retain(|n| n.is_pinned);
            folders.retain(|f| f.is_pinned);
        }
        Tab::Folders => notes.clear(),
        Tab::Notes => folders.clear(),
        Tab::All | Tab::Trash => {}
    }

    // Step 3: search narrowing. Notes match on title or content, folders
    // on name, each list independently.
    if !query.is_empty() {
        match tab {
            Tab::Folders => folders.retain(|f| f.matches(query)),
            Tab::Notes => notes.retain(|n| n.matches(query)),
            _ => {
                notes.retain(|n| n.matches(query));
                folders.retain(|f| f.matches(query));
            }
        }
    }

    // Step 4: stable sort, most recently modified first. Folders are left
    // in creation order.
    notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    ViewSlice { notes, folders }
}

/// The live notes contained in `folder_id`, most recently modified first.
///
/// Applied to the deletion-filtered but tab-unfiltered collection, per the
/// containment-split contract.
pub fn notes_of(universe: &Universe, folder_id: Uuid) -> Vec<Note> {
    let mut notes: Vec<Note> = universe
        .notes
        .iter()
        .filter(|n| !n.is_deleted && n.folder_id == Some(folder_id))
        .cloned()
        .collect();
    notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    notes
}

/// Splits out the notes of `slice` that render at root.
///
/// A note renders at root when it has no folder, or when its `folder_id`
/// dangles (the folder is gone or trashed). Dangling references are
/// tolerated for display and never repaired here.
pub fn root_notes<'a>(slice: &'a ViewSlice, universe: &Universe) -> Vec<&'a Note> {
    slice
        .notes
        .iter()
        .filter(|n| match n.folder_id {
            None => true,
            Some(folder_id) => !universe
                .folders
                .iter()
                .any(|f| f.id == folder_id && !f.is_deleted),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntityKind, NotePatch};

    fn note_with(universe: &mut Universe, title: &str, updated_at: i64) -> Uuid {
        let note = universe.create_note(None);
        universe.update_note(
            note.id,
            NotePatch {
                title: Some(title.to_string()),
                ..Default::default()
            },
        );
        // Pin the timestamp after the update refreshed it.
        universe
            .notes
            .iter_mut()
            .find(|n| n.id == note.id)
            .unwrap()
            .updated_at = updated_at;
        note.id
    }

    #[test]
    fn all_tab_orders_notes_by_updated_at_descending() {
        let mut universe = Universe::default();
        note_with(&mut universe, "Shopping", 100);
        note_with(&mut universe, "Work plan", 200);

        let slice = compute_view(&universe, Tab::All, "");
        let titles: Vec<&str> = slice.notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Work plan", "Shopping"]);
    }

    #[test]
    fn trash_tab_shows_only_deleted_records() {
        let mut universe = Universe::default();
        let live = universe.create_note(None);
        let dead = universe.create_note(None);
        universe.soft_delete(EntityKind::Note, dead.id);

        let trash = compute_view(&universe, Tab::Trash, "");
        assert_eq!(trash.notes.len(), 1);
        assert_eq!(trash.notes[0].id, dead.id);

        // Live records never leak into the trash, search or not.
        let searched = compute_view(&universe, Tab::Trash, "anything");
        assert!(searched.notes.iter().all(|n| n.id != live.id));

        // And deleted records never leak out of it.
        let all = compute_view(&universe, Tab::All, "");
        assert!(all.notes.iter().all(|n| n.id != dead.id));
    }

    #[test]
    fn favorites_tab_keeps_only_pinned_records() {
        let mut universe = Universe::default();
        let pinned = universe.create_note(None);
        universe.create_note(None);
        universe.update_note(
            pinned.id,
            NotePatch {
                is_pinned: Some(true),
                ..Default::default()
            },
        );
        let folder = universe.create_folder();
        universe.create_folder();
        universe
            .folders
            .iter_mut()
            .find(|f| f.id == folder.id)
            .unwrap()
            .is_pinned = true;

        let slice = compute_view(&universe, Tab::Favorites, "");
        assert_eq!(slice.notes.len(), 1);
        assert_eq!(slice.notes[0].id, pinned.id);
        assert_eq!(slice.folders.len(), 1);
        assert_eq!(slice.folders[0].id, folder.id);
    }

    #[test]
    fn folders_tab_hides_notes_and_notes_tab_hides_folders() {
        let mut universe = Universe::default();
        universe.create_note(None);
        universe.create_folder();

        let folders_view = compute_view(&universe, Tab::Folders, "");
        assert!(folders_view.notes.is_empty());
        assert_eq!(folders_view.folders.len(), 1);

        let notes_view = compute_view(&universe, Tab::Notes, "");
        assert!(notes_view.folders.is_empty());
        assert_eq!(notes_view.notes.len(), 1);
    }

    #[test]
    fn search_filters_notes_and_folders_independently() {
        let mut universe = Universe::default();
        note_with(&mut universe, "groceries", 10);
        note_with(&mut universe, "meeting agenda", 20);
        let folder = universe.create_folder();
        universe.update_folder(
            folder.id,
            crate::FolderPatch {
                name: Some("Grocery runs".to_string()),
                ..Default::default()
            },
        );

        let slice = compute_view(&universe, Tab::All, "GROCER");
        assert_eq!(slice.notes.len(), 1);
        assert_eq!(slice.notes[0].title, "groceries");
        // The folder matches on its own, with no matching note required.
        assert_eq!(slice.folders.len(), 1);
    }

    #[test]
    fn search_matches_note_content_too() {
        let mut universe = Universe::default();
        let note = universe.create_note(None);
        universe.update_note(
            note.id,
            NotePatch {
                content: Some("remember the *milk*".to_string()),
                ..Default::default()
            },
        );

        let slice = compute_view(&universe, Tab::Notes, "Milk");
        assert_eq!(slice.notes.len(), 1);
    }

    #[test]
    fn folders_keep_creation_order() {
        let mut universe = Universe::default();
        let a = universe.create_folder();
        let b = universe.create_folder();
        let c = universe.create_folder();

        let slice = compute_view(&universe, Tab::All, "");
        let order: Vec<Uuid> = slice.folders.iter().map(|f| f.id).collect();
        assert_eq!(order, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn notes_of_returns_live_contained_notes_newest_first() {
        let mut universe = Universe::default();
        let folder = universe.create_folder();
        let older = note_with(&mut universe, "older", 10);
        let newer = note_with(&mut universe, "newer", 20);
        let trashed = universe.create_note(Some(folder.id));
        universe.soft_delete(EntityKind::Note, trashed.id);
        for id in [older, newer] {
            universe
                .notes
                .iter_mut()
                .find(|n| n.id == id)
                .unwrap()
                .folder_id = Some(folder.id);
        }

        let contained = notes_of(&universe, folder.id);
        let ids: Vec<Uuid> = contained.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![newer, older]);
    }

    #[test]
    fn dangling_folder_references_render_at_root() {
        let mut universe = Universe::default();
        let note = universe.create_note(Some(Uuid::new_v4()));

        let slice = compute_view(&universe, Tab::All, "");
        let roots = root_notes(&slice, &universe);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id, note.id);
        // The dangling reference itself is left alone.
        assert!(universe.note(note.id).unwrap().folder_id.is_some());
    }
}
