//! A star system: component world plus orbit tree, built from a catalog.

use glam::I64Vec2;

use crate::catalog::{Catalog, ROOT_NAME};
use crate::ecs::{EntityId, Mass, Name, Orbital, Position, RenderCircle, World};
use crate::error::CatalogError;
use crate::kepler::{self, PropagationReport};
use crate::orbit::{NodeId, OrbitTree};
use crate::units::{self, AU_KM, EARTH_MASS, EARTH_RADIUS_KM, SOL_MASS, SOL_RADIUS_KM};

/// Elements for one body, in simulation units apart from the angles.
#[derive(Clone, Debug)]
pub(crate) struct NewBody<'a> {
    pub(crate) name: &'a str,
    pub(crate) parent: &'a str,
    pub(crate) a_km: i64,
    pub(crate) e: f64,
    pub(crate) mass: units::Mass,
    pub(crate) radius_km: i64,
    pub(crate) mean_anomaly_deg: f64,
    pub(crate) periapsis_deg: f64,
}

pub(crate) struct System {
    pub(crate) world: World,
    pub(crate) tree: OrbitTree,
    root: EntityId,
    /// Bodies whose parent name was unknown and that now orbit the root.
    fallbacks: Vec<String>,
}

impl System {
    /// Central body only.
    pub(crate) fn empty() -> Self {
        let mut world = World::new();
        let root = world
            .build()
            .with(Position(I64Vec2::ZERO))
            .with(Mass(SOL_MASS))
            .with(RenderCircle(SOL_RADIUS_KM))
            .with(Name(ROOT_NAME.to_string()))
            .id();
        Self {
            world,
            tree: OrbitTree::new(root),
            root,
            fallbacks: Vec::new(),
        }
    }

    pub(crate) fn new(catalog: &Catalog) -> Result<Self, CatalogError> {
        catalog.validate()?;
        let mut system = Self::empty();
        for row in catalog.bodies() {
            system.add_orbital(NewBody {
                name: &row.name,
                parent: &row.parent,
                a_km: au_to_km(row.a_au),
                e: row.e,
                mass: EARTH_MASS * row.mass,
                radius_km: (row.radius * EARTH_RADIUS_KM) as i64,
                mean_anomaly_deg: row.mean_anomaly,
                periapsis_deg: row.periapsis,
            });
        }
        for row in &catalog.asteroids {
            system.add_orbital(NewBody {
                name: row.display_name(),
                parent: ROOT_NAME,
                a_km: au_to_km(row.a_au),
                e: row.e,
                mass: units::Mass::kg(0.0),
                radius_km: row.radius_km as i64,
                mean_anomaly_deg: row.mean_anomaly,
                periapsis_deg: row.periapsis,
            });
        }
        log::info!(
            "system built: {} bodies, {} parent fallbacks",
            system.tree.len(),
            system.fallbacks.len()
        );
        Ok(system)
    }

    /// Adds a body in orbit around `body.parent`, or around the root when
    /// no body has that name.
    pub(crate) fn add_orbital(&mut self, body: NewBody<'_>) -> EntityId {
        let (parent, found) = self.tree.parent_for(&self.world, body.parent);
        if !found {
            self.fallbacks.push(body.name.to_string());
        }
        let origin = self.tree.entity(parent);
        let id = self
            .world
            .build()
            .with(Position(I64Vec2::ZERO))
            .with(Mass(body.mass))
            .with(Orbital {
                origin,
                a: body.a_km,
                e: body.e,
                w: body.periapsis_deg.to_radians(),
                m: body.mean_anomaly_deg.to_radians(),
                period: 0.0,
                v: 0.0,
            })
            .with(RenderCircle(body.radius_km))
            .with(Name(body.name.to_string()))
            .id();
        self.tree.attach(parent, id);
        id
    }

    /// Propagates every body to `t` seconds after epoch.
    pub(crate) fn update(&mut self, t: f64) -> PropagationReport {
        kepler::propagate(&mut self.world, &self.tree, t)
    }

    pub(crate) fn root(&self) -> EntityId {
        self.root
    }

    pub(crate) fn fallbacks(&self) -> &[String] {
        &self.fallbacks
    }

    pub(crate) fn body_id_by_name(&self, name: &str) -> Option<EntityId> {
        self.tree.find(&self.world, name).map(|n| self.tree.entity(n))
    }

    pub(crate) fn name(&self, id: EntityId) -> &str {
        self.world.get::<Name>(id).map_or("?", |n| n.0.as_str())
    }

    pub(crate) fn position(&self, id: EntityId) -> I64Vec2 {
        self.world.get::<Position>(id).map_or(I64Vec2::ZERO, |p| p.0)
    }

    /// Changes a body's mass and drops every period that depended on it.
    pub(crate) fn set_mass(&mut self, id: EntityId, mass: units::Mass) {
        let Some(m) = self.world.get_mut::<Mass>(id) else {
            return;
        };
        m.0 = mass;
        let Some(node) = self.tree.node_of(id) else {
            return;
        };
        let mut stale: Vec<NodeId> = self.tree.children(node).to_vec();
        stale.push(node);
        for n in stale {
            let entity = self.tree.entity(n);
            if let Some(o) = self.world.get_mut::<Orbital>(entity) {
                o.period = 0.0;
            }
        }
    }
}

fn au_to_km(au: f64) -> i64 {
    (au * AU_KM as f64) as i64
}
