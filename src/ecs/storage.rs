use std::collections::VecDeque;

use super::component::Component;
use super::EntityId;

/// Sparse set for one component kind.
///
/// `sparse[id]` holds the packed slot owned by entity `id`. Released slots go
/// on a FIFO free list and are handed out again before `packed` grows.
#[derive(Debug, Default)]
pub(crate) struct ComponentStore {
    packed: Vec<Component>,
    sparse: Vec<Option<usize>>,
    free: VecDeque<usize>,
}

impl ComponentStore {
    pub(crate) fn resize(&mut self, entities: usize) {
        self.sparse.resize(entities, None);
    }

    /// Stores `value` for `id`, replacing any existing value in place.
    pub(crate) fn insert(&mut self, id: EntityId, value: Component) {
        let i = id.index();
        debug_assert!(i < self.sparse.len(), "sparse array does not cover {id:?}");
        if let Some(slot) = self.sparse[i] {
            self.packed[slot] = value;
            return;
        }
        let slot = match self.free.pop_front() {
            Some(slot) => {
                self.packed[slot] = value;
                slot
            }
            None => {
                self.packed.push(value);
                self.packed.len() - 1
            }
        };
        self.sparse[i] = Some(slot);
    }

    pub(crate) fn remove(&mut self, id: EntityId) {
        if let Some(entry) = self.sparse.get_mut(id.index()) {
            if let Some(slot) = entry.take() {
                self.packed[slot] = Component::Empty;
                self.free.push_back(slot);
            }
        }
    }

    pub(crate) fn slot(&self, id: EntityId) -> Option<usize> {
        self.sparse.get(id.index()).copied().flatten()
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<&Component> {
        self.slot(id).map(|slot| &self.packed[slot])
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Component> {
        let slot = self.slot(id)?;
        Some(&mut self.packed[slot])
    }

    /// Length of the packed array, live and free slots included.
    pub(crate) fn capacity_used(&self) -> usize {
        self.packed.len()
    }

    pub(crate) fn free_slots(&self) -> usize {
        self.free.len()
    }
}
