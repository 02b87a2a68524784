//! Catalog loading and validation errors.

/// Reasons a body catalog is rejected before the system is built.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog: {0}")]
    Read(#[from] std::io::Error),

    /// The catalog file is not valid catalog JSON.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("body with an empty name")]
    EmptyName,

    #[error("duplicate body name {0:?}")]
    DuplicateName(String),

    /// Only bound elliptic orbits are supported.
    #[error("{name}: eccentricity {e} outside [0, 1)")]
    Eccentricity { name: String, e: f64 },

    #[error("{name}: {field} is not a finite number")]
    NonFinite { name: String, field: &'static str },

    #[error("{name}: semi-major axis {a} AU must be positive")]
    SemiMajorAxis { name: String, a: f64 },

    /// A parent with no mass would give its children an infinite period.
    #[error("{name} orbits {parent}, which has no positive mass")]
    MasslessParent { name: String, parent: String },
}
