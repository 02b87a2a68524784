//! Body catalog: the tabular orbital elements a system is built from.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

pub(crate) const ROOT_NAME: &str = "Sol";

/// Planet or satellite row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct BodyRow {
    pub(crate) name: String,
    pub(crate) parent: String,
    /// Semi-major axis, AU.
    pub(crate) a_au: f64,
    pub(crate) e: f64,
    /// Earth masses.
    pub(crate) mass: f64,
    /// Earth radii.
    pub(crate) radius: f64,
    /// Mean anomaly at epoch, degrees.
    pub(crate) mean_anomaly: f64,
    /// Argument of periapsis, degrees.
    pub(crate) periapsis: f64,
}

/// Minor body row. Always orbits the root and carries no mass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct AsteroidRow {
    pub(crate) name: String,
    pub(crate) a_au: f64,
    pub(crate) e: f64,
    pub(crate) radius_km: f64,
    pub(crate) mean_anomaly: f64,
    pub(crate) periapsis: f64,
    pub(crate) designation: String,
}

impl AsteroidRow {
    /// Unnamed objects are listed as "Missing" and go by their designation.
    pub(crate) fn display_name(&self) -> &str {
        if self.name == "Missing" {
            &self.designation
        } else {
            &self.name
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Catalog {
    pub(crate) planets: Vec<BodyRow>,
    pub(crate) satellites: Vec<BodyRow>,
    pub(crate) asteroids: Vec<AsteroidRow>,
}

impl Catalog {
    pub(crate) fn len(&self) -> usize {
        self.planets.len() + self.satellites.len() + self.asteroids.len()
    }

    /// Planets then satellites, in load order.
    pub(crate) fn bodies(&self) -> impl Iterator<Item = &BodyRow> {
        self.planets.iter().chain(self.satellites.iter())
    }

    /// Rejects catalogs the propagator cannot handle.
    pub(crate) fn validate(&self) -> Result<(), CatalogError> {
        let mut names: HashSet<&str> = HashSet::new();
        names.insert(ROOT_NAME);
        let mut masses: HashMap<&str, f64> = HashMap::new();
        masses.insert(ROOT_NAME, 1.0);

        for row in self.bodies() {
            check_elements(&row.name, row.a_au, row.e, row.mean_anomaly, row.periapsis)?;
            finite(&row.name, "mass", row.mass)?;
            finite(&row.name, "radius", row.radius)?;
            if !names.insert(&row.name) {
                return Err(CatalogError::DuplicateName(row.name.clone()));
            }
            masses.insert(&row.name, row.mass);
        }
        for row in &self.asteroids {
            let name = row.display_name();
            check_elements(name, row.a_au, row.e, row.mean_anomaly, row.periapsis)?;
            finite(name, "radius", row.radius_km)?;
            if !names.insert(name) {
                return Err(CatalogError::DuplicateName(name.to_string()));
            }
        }

        // Unknown parents fall back to the root at build time, so only
        // parents that exist are checked here.
        for row in self.bodies() {
            if let Some(&m) = masses.get(row.parent.as_str()) {
                if m <= 0.0 {
                    return Err(CatalogError::MasslessParent {
                        name: row.name.clone(),
                        parent: row.parent.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn finite(name: &str, field: &'static str, v: f64) -> Result<(), CatalogError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(CatalogError::NonFinite { name: name.to_string(), field })
    }
}

fn check_elements(name: &str, a: f64, e: f64, m: f64, w: f64) -> Result<(), CatalogError> {
    if name.trim().is_empty() {
        return Err(CatalogError::EmptyName);
    }
    finite(name, "semi-major axis", a)?;
    finite(name, "eccentricity", e)?;
    finite(name, "mean anomaly", m)?;
    finite(name, "argument of periapsis", w)?;
    if a <= 0.0 {
        return Err(CatalogError::SemiMajorAxis { name: name.to_string(), a });
    }
    if !(0.0..1.0).contains(&e) {
        return Err(CatalogError::Eccentricity { name: name.to_string(), e });
    }
    Ok(())
}

pub(crate) fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let text = fs::read_to_string(path)?;
    let catalog: Catalog = serde_json::from_str(&text)?;
    catalog.validate()?;
    log::info!("loaded {} bodies from {}", catalog.len(), path.display());
    Ok(catalog)
}

#[allow(clippy::too_many_arguments)]
fn body(name: &str, parent: &str, a_au: f64, e: f64, mass: f64, radius: f64, m: f64, w: f64) -> BodyRow {
    BodyRow {
        name: name.to_string(),
        parent: parent.to_string(),
        a_au,
        e,
        mass,
        radius,
        mean_anomaly: m,
        periapsis: w,
    }
}

fn asteroid(name: &str, a_au: f64, e: f64, radius_km: f64, m: f64, w: f64, designation: &str) -> AsteroidRow {
    AsteroidRow {
        name: name.to_string(),
        a_au,
        e,
        radius_km,
        mean_anomaly: m,
        periapsis: w,
        designation: designation.to_string(),
    }
}

/// Solar system at J2000, rounded.
pub(crate) fn sol() -> Catalog {
    Catalog {
        planets: vec![
            body("Mercury", "Sol", 0.387098, 0.205630, 0.0553, 0.3829, 174.796, 29.124),
            body("Venus", "Sol", 0.723332, 0.006772, 0.815, 0.9499, 50.115, 54.884),
            body("Earth", "Sol", 1.000001, 0.016709, 1.0, 1.0, 358.617, 114.208),
            body("Mars", "Sol", 1.523679, 0.093400, 0.107, 0.532, 19.412, 286.502),
            body("Jupiter", "Sol", 5.203800, 0.048900, 317.8, 10.973, 20.020, 273.867),
            body("Saturn", "Sol", 9.582600, 0.056500, 95.159, 9.140, 317.020, 339.392),
            body("Uranus", "Sol", 19.19126, 0.047170, 14.536, 3.981, 142.239, 96.999),
            body("Neptune", "Sol", 30.07000, 0.008678, 17.147, 3.865, 256.228, 273.187),
        ],
        satellites: vec![
            body("Luna", "Earth", 0.002570, 0.0549, 0.0123, 0.2727, 135.27, 318.15),
            body("Phobos", "Mars", 0.0000627, 0.0151, 1.78e-9, 0.00175, 91.0, 150.0),
            body("Deimos", "Mars", 0.0001568, 0.00033, 2.47e-10, 0.00097, 325.3, 290.5),
            body("Io", "Jupiter", 0.002819, 0.0041, 0.015, 0.286, 342.0, 84.1),
            body("Europa", "Jupiter", 0.004486, 0.009, 0.008, 0.245, 171.0, 88.97),
            body("Ganymede", "Jupiter", 0.007155, 0.0013, 0.025, 0.413, 317.5, 192.4),
            body("Callisto", "Jupiter", 0.012585, 0.0074, 0.018, 0.378, 181.4, 52.6),
            body("Titan", "Saturn", 0.008168, 0.0288, 0.0225, 0.404, 163.3, 186.6),
            body("Triton", "Neptune", 0.002371, 0.000016, 0.00359, 0.2124, 63.0, 0.0),
        ],
        asteroids: vec![
            asteroid("Ceres", 2.7675, 0.0758, 469.7, 95.99, 73.6, "1 Ceres"),
            asteroid("Pallas", 2.7723, 0.2303, 256.0, 78.2, 310.0, "2 Pallas"),
            asteroid("Vesta", 2.3615, 0.0887, 262.7, 205.5, 151.2, "4 Vesta"),
            asteroid("Hygiea", 3.1415, 0.1125, 216.5, 152.2, 312.3, "10 Hygiea"),
            asteroid("Missing", 1.0004, 0.1910, 0.15, 200.0, 45.9, "2010 TK7"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let c = sol();
        assert!(c.validate().is_ok());
        assert_eq!(c.len(), 22);
        assert!(c.asteroids.iter().any(|a| a.display_name() == "2010 TK7"));
    }

    #[test]
    fn rejects_unbound_orbits() {
        let mut c = sol();
        c.planets[0].e = 1.0;
        assert!(matches!(c.validate(), Err(CatalogError::Eccentricity { .. })));

        let mut c = sol();
        c.asteroids[1].e = -0.1;
        assert!(matches!(c.validate(), Err(CatalogError::Eccentricity { .. })));
    }

    #[test]
    fn rejects_bad_numbers_and_names() {
        let mut c = sol();
        c.satellites[0].a_au = 0.0;
        assert!(matches!(c.validate(), Err(CatalogError::SemiMajorAxis { .. })));

        let mut c = sol();
        c.planets[2].mean_anomaly = f64::NAN;
        assert!(matches!(
            c.validate(),
            Err(CatalogError::NonFinite { field: "mean anomaly", .. })
        ));

        let mut c = sol();
        c.planets[1].name = "Mercury".into();
        assert!(matches!(c.validate(), Err(CatalogError::DuplicateName(n)) if n == "Mercury"));

        let mut c = sol();
        c.planets[1].name = "  ".into();
        assert!(matches!(c.validate(), Err(CatalogError::EmptyName)));
    }

    #[test]
    fn rejects_children_of_massless_bodies() {
        let mut c = sol();
        c.planets[3].mass = 0.0;
        assert!(matches!(
            c.validate(),
            Err(CatalogError::MasslessParent { parent, .. }) if parent == "Mars"
        ));
    }

    #[test]
    fn parses_partial_json() {
        let json = r#"{
            "planets": [
                { "name": "Tatooine", "parent": "Sol", "a_au": 0.9, "e": 0.1, "mass": 1.2,
                  "radius": 0.8, "mean_anomaly": 0.0, "periapsis": 10.0 }
            ]
        }"#;
        let c: Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(c.planets.len(), 1);
        assert!(c.satellites.is_empty());
        assert!(c.validate().is_ok());
    }
}
