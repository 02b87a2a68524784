mod component;
mod storage;
mod world;

pub(crate) use component::{Mass, Name, Orbital, Position, RenderCircle};
pub(crate) use world::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct EntityId(pub(crate) u32);

impl EntityId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
