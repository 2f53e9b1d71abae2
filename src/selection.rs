//! Multi-selection state and the batch operations applied over it.
//!
//! A selection is a set of entity ids mixed across notes and folders, plus
//! an "active" flag for selection mode. Batch operations resolve each id
//! against both collections and degrade to a no-op for ids that no longer
//! resolve (stale selections are expected after concurrent deletions).

use std::collections::HashSet;

use log::debug;
use uuid::Uuid;

use crate::{now_ms, EntityKind, Universe};

/// The set of currently selected entity ids and the selection-mode flag.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: HashSet<Uuid>,
    active: bool,
}

impl Selection {
    /// Whether selection mode is active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The selected ids.
    pub fn ids(&self) -> &HashSet<Uuid> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    /// Selects `id` and enters selection mode as a single atomic action
    /// (the long-press contract).
    pub fn begin_with(&mut self, id: Uuid) {
        self.active = true;
        self.ids.insert(id);
    }

    /// Adds `id` if absent, removes it otherwise. Does not alter mode.
    pub fn toggle(&mut self, id: Uuid) {
        if !self.ids.insert(id) {
            self.ids.remove(&id);
        }
    }

    /// Exits selection mode and clears the set.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.active = false;
    }
}

impl Universe {
    /// Moves every selected note into `target_folder_id` (or to root).
    ///
    /// Folders among the selection are ignored: folders cannot be nested.
    pub fn batch_move(&mut self, selected: &HashSet<Uuid>, target_folder_id: Option<Uuid>) {
        let now = now_ms();
        let mut moved = 0;
        for note in self.notes.iter_mut().filter(|n| selected.contains(&n.id)) {
            note.folder_id = target_folder_id;
            note.updated_at = now;
            moved += 1;
        }
        debug!(
            "Batch move: {} of {} selected ids moved to {:?}",
            moved,
            selected.len(),
            target_folder_id
        );
    }

    /// Deletes every selected entity, resolving each id to its kind.
    ///
    /// Outside the trash this is a soft-delete (folders cascade as usual);
    /// inside the trash it is a permanent delete.
    pub fn batch_delete(&mut self, selected: &HashSet<Uuid>, in_trash: bool) {
        for &id in selected {
            let Some(kind) = self.kind_of(id) else {
                continue;
            };
            if in_trash {
                self.permanent_delete(kind, id);
            } else {
                self.soft_delete(kind, id);
            }
        }
        debug!(
            "Batch delete over {} ids (in_trash: {})",
            selected.len(),
            in_trash
        );
    }

    /// Group-toggles the favorite flag over the selection.
    ///
    /// If any resolved entity is still unpinned, the whole group becomes
    /// pinned; once everything is pinned, a further call unpins the whole
    /// group. Repeated calls therefore alternate between "all pinned" and
    /// "all unpinned", never a mixed state.
    pub fn batch_toggle_favorite(&mut self, selected: &HashSet<Uuid>) {
        let mut total = 0;
        let mut pinned = 0;
        for &id in selected {
            match self.kind_of(id) {
                Some(EntityKind::Note) => {
                    total += 1;
                    if self.note(id).is_some_and(|n| n.is_pinned) {
                        pinned += 1;
                    }
                }
                Some(EntityKind::Folder) => {
                    total += 1;
                    if self.folder(id).is_some_and(|f| f.is_pinned) {
                        pinned += 1;
                    }
                }
                None => {}
            }
        }

        let pin_all = pinned < total;
        debug!(
            "Batch favorite: {}/{} pinned, setting all to {}",
            pinned, total, pin_all
        );

        let now = now_ms();
        for note in self.notes.iter_mut().filter(|n| selected.contains(&n.id)) {
            note.is_pinned = pin_all;
            note.updated_at = now;
        }
        for folder in self
            .folders
            .iter_mut()
            .filter(|f| selected.contains(&f.id))
        {
            folder.is_pinned = pin_all;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[Uuid]) -> HashSet<Uuid> {
        list.iter().copied().collect()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = Selection::default();
        let id = Uuid::new_v4();

        selection.toggle(id);
        assert!(selection.contains(id));
        selection.toggle(id);
        assert!(!selection.contains(id));
    }

    #[test]
    fn begin_with_selects_and_activates_atomically() {
        let mut selection = Selection::default();
        let id = Uuid::new_v4();

        selection.begin_with(id);
        assert!(selection.is_active());
        assert!(selection.contains(id));

        selection.clear();
        assert!(!selection.is_active());
        assert!(selection.is_empty());
    }

    #[test]
    fn batch_move_skips_folders() {
        let mut universe = Universe::default();
        let target = universe.create_folder();
        let other = universe.create_folder();
        let note = universe.create_note(None);

        universe.batch_move(&ids(&[note.id, other.id]), Some(target.id));

        assert_eq!(universe.note(note.id).unwrap().folder_id, Some(target.id));
        // The selected folder is untouched (no nesting in this model).
        assert_eq!(universe.folder(other.id).unwrap(), &other);
    }

    #[test]
    fn batch_move_to_none_sends_notes_to_root() {
        let mut universe = Universe::default();
        let folder = universe.create_folder();
        let note = universe.create_note(Some(folder.id));

        universe.batch_move(&ids(&[note.id]), None);
        assert_eq!(universe.note(note.id).unwrap().folder_id, None);
    }

    #[test]
    fn batch_delete_soft_deletes_outside_trash() {
        let mut universe = Universe::default();
        let note = universe.create_note(None);
        let folder = universe.create_folder();
        let contained = universe.create_note(Some(folder.id));

        universe.batch_delete(&ids(&[note.id, folder.id]), false);

        assert!(universe.note(note.id).unwrap().is_deleted);
        assert!(universe.folder(folder.id).unwrap().is_deleted);
        // The folder cascade still applies per item.
        let contained = universe.note(contained.id).unwrap();
        assert_eq!(contained.folder_id, None);
        assert!(!contained.is_deleted);
    }

    #[test]
    fn batch_delete_purges_inside_trash() {
        let mut universe = Universe::default();
        let note = universe.create_note(None);
        universe.soft_delete(EntityKind::Note, note.id);

        universe.batch_delete(&ids(&[note.id]), true);
        assert!(universe.note(note.id).is_none());
    }

    #[test]
    fn batch_delete_ignores_stale_ids() {
        let mut universe = Universe::default();
        let note = universe.create_note(None);
        let snapshot = universe.clone();

        universe.batch_delete(&ids(&[Uuid::new_v4()]), false);
        assert_eq!(universe, snapshot);
        assert!(!universe.note(note.id).unwrap().is_deleted);
    }

    #[test]
    fn favorite_toggle_converges_then_flips_the_whole_group() {
        let mut universe = Universe::default();
        let pinned_note = universe.create_note(None);
        let plain_note = universe.create_note(None);
        let folder = universe.create_folder();
        universe.update_note(
            pinned_note.id,
            crate::NotePatch {
                is_pinned: Some(true),
                ..Default::default()
            },
        );

        let selected = ids(&[pinned_note.id, plain_note.id, folder.id]);

        // Mixed state: one pinned of three, so everything becomes pinned.
        universe.batch_toggle_favorite(&selected);
        assert!(universe.note(pinned_note.id).unwrap().is_pinned);
        assert!(universe.note(plain_note.id).unwrap().is_pinned);
        assert!(universe.folder(folder.id).unwrap().is_pinned);

        // All pinned: a second call unpins the whole group.
        universe.batch_toggle_favorite(&selected);
        assert!(!universe.note(pinned_note.id).unwrap().is_pinned);
        assert!(!universe.note(plain_note.id).unwrap().is_pinned);
        assert!(!universe.folder(folder.id).unwrap().is_pinned);
    }

    #[test]
    fn favorite_toggle_counts_only_resolvable_ids() {
        let mut universe = Universe::default();
        let note = universe.create_note(None);
        universe.update_note(
            note.id,
            crate::NotePatch {
                is_pinned: Some(true),
                ..Default::default()
            },
        );

        // A stale id must not count toward the total, so the sole resolved
        // entity is already all-pinned and gets unpinned.
        universe.batch_toggle_favorite(&ids(&[note.id, Uuid::new_v4()]));
        assert!(!universe.note(note.id).unwrap().is_pinned);
    }
}
