//! Gravitational parent/child hierarchy.

use std::collections::HashMap;

use crate::ecs::{EntityId, Name, World};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug)]
pub(crate) struct OrbitNode {
    pub(crate) entity: EntityId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

/// Rooted tree of bodies stored as an arena; node 0 is the root.
#[derive(Debug)]
pub(crate) struct OrbitTree {
    nodes: Vec<OrbitNode>,
    by_entity: HashMap<EntityId, NodeId>,
}

impl OrbitTree {
    pub(crate) const ROOT: NodeId = NodeId(0);

    pub(crate) fn new(root: EntityId) -> Self {
        let mut by_entity = HashMap::new();
        by_entity.insert(root, Self::ROOT);
        Self {
            nodes: vec![OrbitNode {
                entity: root,
                parent: None,
                children: Vec::new(),
            }],
            by_entity,
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &OrbitNode {
        &self.nodes[id.0]
    }

    pub(crate) fn entity(&self, id: NodeId) -> EntityId {
        self.nodes[id.0].entity
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub(crate) fn node_of(&self, entity: EntityId) -> Option<NodeId> {
        self.by_entity.get(&entity).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn attach(&mut self, parent: NodeId, entity: EntityId) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(OrbitNode {
            entity,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        self.by_entity.insert(entity, id);
        id
    }

    /// Depth-first search by Name component; the first match in pre-order wins.
    pub(crate) fn find(&self, world: &World, name: &str) -> Option<NodeId> {
        self.find_from(Self::ROOT, world, name)
    }

    fn find_from(&self, at: NodeId, world: &World, name: &str) -> Option<NodeId> {
        let node = self.node(at);
        if world.get::<Name>(node.entity).is_some_and(|n| n.0 == name) {
            return Some(at);
        }
        node.children
            .iter()
            .find_map(|&child| self.find_from(child, world, name))
    }

    /// Parent lookup used while loading. Unknown names fall back to the root.
    pub(crate) fn parent_for(&self, world: &World, name: &str) -> (NodeId, bool) {
        match self.find(world, name) {
            Some(node) => (node, true),
            None => {
                log::warn!("parent body {name:?} not found, attaching to root");
                (Self::ROOT, false)
            }
        }
    }

    /// Pre-order walk: every parent precedes its children.
    pub(crate) fn pre_order(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: vec![Self::ROOT],
        }
    }
}

pub(crate) struct PreOrder<'t> {
    tree: &'t OrbitTree,
    stack: Vec<NodeId>,
}

impl Iterator for PreOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(world: &mut World, name: &str) -> EntityId {
        world.build().with(Name(name.to_string())).id()
    }

    fn sample() -> (World, OrbitTree) {
        let mut world = World::new();
        let sol = named(&mut world, "Sol");
        let mut tree = OrbitTree::new(sol);
        for (name, parent) in [("Earth", "Sol"), ("Luna", "Earth"), ("Mars", "Sol"), ("Phobos", "Mars")] {
            let (p, _) = tree.parent_for(&world, parent);
            let e = named(&mut world, name);
            tree.attach(p, e);
        }
        (world, tree)
    }

    #[test]
    fn finds_nested_bodies_by_name() {
        let (world, tree) = sample();
        let luna = tree.find(&world, "Luna").map(|n| tree.entity(n));
        assert_eq!(luna.and_then(|e| world.get::<Name>(e)).map(|n| n.0.as_str()), Some("Luna"));
        let phobos = tree.find(&world, "Phobos");
        assert_eq!(phobos.and_then(|n| tree.parent(n)), tree.find(&world, "Mars"));
        assert_eq!(tree.find(&world, "Pluto"), None);
    }

    #[test]
    fn unknown_parent_falls_back_to_root() {
        let (mut world, mut tree) = sample();
        let (parent, found) = tree.parent_for(&world, "Nibiru");
        assert!(!found);
        assert_eq!(parent, OrbitTree::ROOT);
        let e = named(&mut world, "Rogue");
        let node = tree.attach(parent, e);
        assert_eq!(tree.parent(node), Some(OrbitTree::ROOT));
        assert!(tree.children(OrbitTree::ROOT).contains(&node));
    }

    #[test]
    fn pre_order_visits_parents_first() {
        let (world, tree) = sample();
        let names: Vec<_> = tree
            .pre_order()
            .filter_map(|n| world.get::<Name>(tree.entity(n)).map(|n| n.0.clone()))
            .collect();
        assert_eq!(names, ["Sol", "Earth", "Luna", "Mars", "Phobos"]);
        assert_eq!(tree.len(), 5);
    }
}
