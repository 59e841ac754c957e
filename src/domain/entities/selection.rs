use std::collections::BTreeSet;

use crate::domain::entities::record::RecordId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<RecordId>,
}

impl SelectionSet {
    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    /// Returns whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: RecordId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn insert(&mut self, id: RecordId) {
        self.ids.insert(id);
    }

    pub fn remove(&mut self, id: RecordId) {
        self.ids.remove(&id);
    }

    pub fn retain(&mut self, mut keep: impl FnMut(RecordId) -> bool) {
        self.ids.retain(|id| keep(*id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.ids.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_reports_the_new_state() {
        let mut selection = SelectionSet::default();

        assert!(selection.toggle(RecordId(4)));
        assert!(selection.contains(RecordId(4)));
        assert!(!selection.toggle(RecordId(4)));
        assert!(selection.is_empty());
    }

    #[test]
    fn retain_drops_unknown_ids() {
        let mut selection = SelectionSet::default();
        selection.insert(RecordId(1));
        selection.insert(RecordId(2));

        selection.retain(|id| id != RecordId(2));

        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![RecordId(1)]);
    }
}
