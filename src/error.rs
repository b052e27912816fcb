use thiserror::Error;

/// Top-level error type for the planar arrangement engine.
#[derive(Debug, Error)]
pub enum PlanarError {
    #[error(transparent)]
    Tolerance(#[from] ToleranceError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Errors raised when constructing a [`crate::math::Tolerance`].
#[derive(Debug, Error, PartialEq)]
pub enum ToleranceError {
    #[error("tolerance must be positive and finite, got {value}")]
    Invalid { value: f64 },
}

/// Errors related to geometry value construction.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("{kind} requires at least {required} distinct points, got {actual}")]
    TooFewPoints {
        kind: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
}

/// Errors related to arrangement mutation.
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("cannot insert non-finite coordinate ({x}, {y}) into mesh")]
    NonFinite { x: f64, y: f64 },

    #[error("vertex not found in mesh")]
    UnknownVertex,
}

/// Convenience type alias for results using [`PlanarError`].
pub type Result<T> = std::result::Result<T, PlanarError>;
