use std::collections::VecDeque;

use super::component::{ComponentKind, ComponentType, Signature, KIND_COUNT};
use super::storage::ComponentStore;
use super::EntityId;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Entity {
    pub(crate) id: EntityId,
    pub(crate) sig: Signature,
    alive: bool,
}

impl Entity {
    pub(crate) fn has(&self, kind: ComponentKind) -> bool {
        self.sig.has(kind)
    }
}

/// Entity allocator plus one sparse-set store per component kind.
#[derive(Debug, Default)]
pub(crate) struct World {
    stores: [ComponentStore; KIND_COUNT],
    entities: Vec<Entity>,
    free: VecDeque<EntityId>,
}

impl World {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Allocates an entity, reusing a despawned id when one is available.
    pub(crate) fn spawn(&mut self) -> EntityId {
        if let Some(id) = self.free.pop_front() {
            let e = &mut self.entities[id.index()];
            e.alive = true;
            e.sig.reset();
            return id;
        }
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(Entity {
            id,
            sig: Signature::default(),
            alive: true,
        });
        let n = self.entities.len();
        for store in &mut self.stores {
            store.resize(n);
        }
        id
    }

    /// Starts a chain of component inserts on a fresh entity.
    pub(crate) fn build(&mut self) -> EntityBuilder<'_> {
        let id = self.spawn();
        EntityBuilder { world: self, id }
    }

    pub(crate) fn despawn(&mut self, id: EntityId) {
        let Some(e) = self.entities.get_mut(id.index()) else {
            return;
        };
        if !e.alive {
            return;
        }
        e.alive = false;
        e.sig.reset();
        for store in &mut self.stores {
            store.remove(id);
        }
        self.free.push_back(id);
    }

    pub(crate) fn insert<T: ComponentType>(&mut self, id: EntityId, value: T) {
        let Some(e) = self.entities.get_mut(id.index()).filter(|e| e.alive) else {
            log::warn!("insert {:?} on dead entity {id:?}", T::KIND);
            return;
        };
        e.sig.set(T::KIND);
        self.stores[T::KIND.index()].insert(id, value.wrap());
    }

    pub(crate) fn remove<T: ComponentType>(&mut self, id: EntityId) {
        if let Some(e) = self.entities.get_mut(id.index()) {
            e.sig.clear(T::KIND);
        }
        self.stores[T::KIND.index()].remove(id);
    }

    pub(crate) fn has<T: ComponentType>(&self, id: EntityId) -> bool {
        self.entity(id).is_some_and(|e| e.alive && e.has(T::KIND))
    }

    /// Typed read. `None` when the entity does not carry `T`.
    pub(crate) fn get<T: ComponentType>(&self, id: EntityId) -> Option<&T> {
        if !self.has::<T>(id) {
            return None;
        }
        self.stores[T::KIND.index()].get(id).and_then(T::peek)
    }

    pub(crate) fn get_mut<T: ComponentType>(&mut self, id: EntityId) -> Option<&mut T> {
        if !self.has::<T>(id) {
            return None;
        }
        self.stores[T::KIND.index()].get_mut(id).and_then(T::peek_mut)
    }

    pub(crate) fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    /// Live entities carrying `T`, in id order.
    pub(crate) fn with<T: ComponentType>(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities
            .iter()
            .filter(|e| e.alive && e.has(T::KIND))
            .map(|e| e.id)
    }

    pub(crate) fn all(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().filter(|e| e.alive).map(|e| e.id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entities.iter().filter(|e| e.alive).count()
    }

    pub(crate) fn store(&self, kind: ComponentKind) -> &ComponentStore {
        &self.stores[kind.index()]
    }
}

pub(crate) struct EntityBuilder<'w> {
    world: &'w mut World,
    id: EntityId,
}

impl EntityBuilder<'_> {
    pub(crate) fn with<T: ComponentType>(self, value: T) -> Self {
        self.world.insert(self.id, value);
        self
    }

    pub(crate) fn id(self) -> EntityId {
        self.id
    }
}
