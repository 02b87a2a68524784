//! Whole-system scenarios: catalog to propagation to the rendered view.

use glam::I64Vec2;

use crate::camera::Camera;
use crate::catalog;
use crate::ecs::Orbital;
use crate::keybind::Keybinds;
use crate::search::{Search, SearchOutcome};
use crate::surface::Screen;
use crate::system::{NewBody, System};
use crate::units::{self, AU_KM, EARTH_MASS, JULIAN_YEAR_SECONDS};

fn body<'a>(name: &'a str, parent: &'a str, a_km: i64) -> NewBody<'a> {
    NewBody {
        name,
        parent,
        a_km,
        e: 0.0,
        mass: EARTH_MASS,
        radius_km: 6_371,
        mean_anomaly_deg: 0.0,
        periapsis_deg: 0.0,
    }
}

fn period(system: &System, id: crate::ecs::EntityId) -> f64 {
    system.world.get::<Orbital>(id).map_or(0.0, |o| o.period)
}

#[test]
fn circular_planet_quarter_turn() {
    let mut system = System::empty();
    let planet = system.add_orbital(body("Terra", "Sol", AU_KM));

    system.update(0.0);
    assert_eq!(system.position(planet), I64Vec2::new(AU_KM, 0));
    let year = period(&system, planet);
    let rel = (year - JULIAN_YEAR_SECONDS).abs() / JULIAN_YEAR_SECONDS;
    assert!(rel < 1e-4, "period {year} s is {rel} off a Julian year");

    let t = period(&system, planet) / 4.0;
    system.update(t);
    let p = system.position(planet);
    assert!(p.x.abs() < 2, "x = {}", p.x);
    assert!((p.y - AU_KM).abs() < 2, "y = {}", p.y);
}

#[test]
fn moons_ride_along_with_their_planet() {
    let mut system = System::empty();
    let planet = system.add_orbital(body("Terra", "Sol", AU_KM));
    let moon = system.add_orbital(NewBody {
        mass: units::Mass::kg(7.342e22),
        ..body("Selene", "Terra", 384_400)
    });

    for t in [0.0, 1.0e6, 9.9e6] {
        system.update(t);
        let offset = (system.position(moon) - system.position(planet)).as_dvec2().length();
        assert!((offset - 384_400.0).abs() < 2.0, "t = {t}, offset = {offset}");
    }

    let o = system.world.get::<Orbital>(moon).copied().unwrap();
    let node = system.tree.node_of(moon).unwrap();
    let parent = system.tree.parent(node).unwrap();
    assert_eq!(system.tree.entity(parent), o.origin);
}

#[test]
fn heavier_parent_shortens_the_period() {
    let mut system = System::empty();
    let planet = system.add_orbital(body("Terra", "Sol", AU_KM));
    system.update(0.0);
    let before = period(&system, planet);

    let root = system.root();
    system.set_mass(root, units::SOL_MASS * 4.0);
    assert_eq!(period(&system, planet), 0.0);
    system.update(0.0);
    let after = period(&system, planet);
    assert!((before / after - 2.0).abs() < 1e-3, "{before} / {after}");
}

#[test]
fn search_with_no_match_keeps_only_the_path_to_focus() {
    let system = System::new(&catalog::sol()).unwrap();
    let binds = Keybinds::with_defaults();
    let luna = system.tree.find(&system.world, "Luna").unwrap();
    let mut search = Search::new(&system, luna);
    for ch in "zzz".chars() {
        assert_eq!(search.keypress(ch as i32, &binds, &system, luna), SearchOutcome::Pending);
    }
    let mut screen = Screen::new(30, 6);
    search.draw(&mut screen, &system);
    assert_eq!(screen.row_text(0).trim_end(), "Query: zzz");
    assert_eq!(screen.row_text(1).trim_end(), "[-] Sol");
    assert_eq!(screen.row_text(2).trim_end(), "[-] Earth");
    assert_eq!(screen.row_text(3).trim_end(), "");
    assert_eq!(
        search.keypress(10, &binds, &system, luna),
        SearchOutcome::Selected(luna)
    );
}

#[test]
fn the_sun_is_centred_in_a_fresh_view() {
    let mut system = System::new(&catalog::sol()).unwrap();
    system.update(0.0);
    let mut camera = Camera::new(1_000_000);
    let mut screen = Screen::new(41, 21);
    let root = system.root();
    camera.push(
        crate::geometry::Shape::Ellipse(crate::geometry::Ellipse::new(system.position(root), 1, 1)),
        crossterm::style::Color::Yellow,
        crossterm::style::Color::Black,
        '@',
    );
    let stats = camera.draw(&mut screen);
    assert_eq!(stats.drawn, 1);
    assert_eq!(screen.count('@'), 1);
    assert_eq!(screen.get(20, 10).map(|c| c.ch), Some('@'));
}
