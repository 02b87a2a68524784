//! Two-body Keplerian propagation.

use std::f64::consts::TAU;

use glam::{DVec2, I64Vec2};

use crate::ecs::{Mass, Orbital, Position, World};
use crate::orbit::OrbitTree;
use crate::units::G;

pub(crate) const TOLERANCE: f64 = 1e-6;
pub(crate) const MAX_ITERATIONS: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct KeplerSolution {
    /// Eccentric anomaly, rad.
    pub(crate) eccentric: f64,
    pub(crate) iterations: u32,
    pub(crate) converged: bool,
}

/// Solves `E - e·sin(E) = M` by Newton-Raphson seeded at `E = M`.
///
/// Gives up after `MAX_ITERATIONS` and keeps the last finite estimate.
pub(crate) fn solve_kepler(mean: f64, e: f64) -> KeplerSolution {
    let mut eccentric = mean;
    for i in 1..=MAX_ITERATIONS {
        let slope = 1.0 - e * eccentric.cos();
        if slope == 0.0 || !slope.is_finite() {
            return KeplerSolution { eccentric, iterations: i, converged: false };
        }
        let step = (eccentric - e * eccentric.sin() - mean) / slope;
        let next = eccentric - step;
        if !next.is_finite() {
            return KeplerSolution { eccentric, iterations: i, converged: false };
        }
        eccentric = next;
        if step.abs() < TOLERANCE {
            return KeplerSolution { eccentric, iterations: i, converged: true };
        }
    }
    KeplerSolution {
        eccentric,
        iterations: MAX_ITERATIONS,
        converged: false,
    }
}

/// Kepler's third law. `a_km` in kilometers, `total_mass_kg` of both bodies.
pub(crate) fn orbital_period(a_km: i64, total_mass_kg: f64) -> f64 {
    let a_m = a_km as f64 * 1000.0;
    TAU * (a_m * a_m * a_m / (G * total_mass_kg)).sqrt()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct OrbitSample {
    /// Offset from the parent, km.
    pub(crate) offset: DVec2,
    /// True anomaly plus periapsis argument, rad.
    pub(crate) v: f64,
    pub(crate) converged: bool,
}

/// Position on the orbit at mean anomaly `mean`, relative to the parent.
pub(crate) fn sample_orbit(orbital: &Orbital, mean: f64) -> OrbitSample {
    let sol = solve_kepler(mean, orbital.e);
    let (x, y) = plane_coords(sol.eccentric, orbital.e);
    let v = y.atan2(x) + orbital.w;
    let r = (x * x + y * y).sqrt() * orbital.a as f64;
    OrbitSample {
        offset: DVec2::new(r * v.cos(), r * v.sin()),
        v,
        converged: sol.converged,
    }
}

/// Orbital-plane coordinates in units of `a`, focus at the origin.
pub(crate) fn plane_coords(eccentric: f64, e: f64) -> (f64, f64) {
    (eccentric.cos() - e, eccentric.sin() * (1.0 - e * e).sqrt())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PropagationReport {
    pub(crate) bodies: usize,
    pub(crate) unconverged: usize,
}

/// Moves every orbiting body to its position at `t` seconds after epoch.
///
/// Walks the tree root first so each parent already sits at its new position
/// when its children are offset from it.
pub(crate) fn propagate(world: &mut World, tree: &OrbitTree, t: f64) -> PropagationReport {
    let mut report = PropagationReport::default();
    for node in tree.pre_order() {
        let entity = tree.entity(node);
        if !world.has::<Orbital>(entity) {
            continue;
        }
        let Some(mut orbital) = world.get::<Orbital>(entity).copied() else {
            continue;
        };
        debug_assert_eq!(
            tree.parent(node).map(|p| tree.entity(p)),
            Some(orbital.origin),
            "orbit tree and Orbital.origin disagree"
        );

        let parent_pos = world
            .get::<Position>(orbital.origin)
            .map(|p| p.0)
            .unwrap_or(I64Vec2::ZERO);

        if orbital.period == 0.0 {
            let own = world.get::<Mass>(entity).map(|m| m.0.as_kg()).unwrap_or(0.0);
            let parent = world.get::<Mass>(orbital.origin).map(|m| m.0.as_kg()).unwrap_or(0.0);
            orbital.period = orbital_period(orbital.a, own + parent);
        }

        let mean = orbital.m + (TAU / orbital.period) * t;
        let sample = sample_orbit(&orbital, mean);
        if !sample.converged {
            report.unconverged += 1;
            log::debug!("kepler solve did not converge for {entity:?} (e = {})", orbital.e);
        }
        orbital.v = sample.v;

        let pos = parent_pos + sample.offset.round().as_i64vec2();
        if let Some(p) = world.get_mut::<Position>(entity) {
            p.0 = pos;
        }
        if let Some(o) = world.get_mut::<Orbital>(entity) {
            *o = orbital;
        }
        report.bodies += 1;
    }
    report
}
