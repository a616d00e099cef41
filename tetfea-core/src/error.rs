//! Error types for tetfea operations.

use thiserror::Error;

/// Result type alias using the tetfea [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// A Jacobian whose determinant vanished (or nearly so) at one quadrature point.
///
/// Carries enough context to locate the offending element: the element index
/// in the geometry, the quadrature point index, and the signed determinant.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error(
    "degenerate Jacobian in element {element} at quadrature point {quadrature_point} (det J = {determinant:e})"
)]
pub struct DegenerateJacobian {
    /// Element index in the geometry.
    pub element: usize,
    /// Quadrature point index within the element's rule.
    pub quadrature_point: usize,
    /// Signed Jacobian determinant that failed the check.
    pub determinant: f64,
}

/// Errors that can occur while configuring or running the assembly engine.
#[derive(Error, Debug)]
pub enum Error {
    /// Unsupported element kind, quadrature order or inconsistent sizing.
    #[error("configuration error: {0}")]
    Config(String),

    /// Geometry or boundary data referencing something that does not exist.
    #[error("mesh error: {0}")]
    Mesh(String),

    /// Invalid material model or parameters.
    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    /// An element had one or more quadrature points with a degenerate Jacobian.
    #[error("element {element} is degenerate at {} quadrature point(s)", failures.len())]
    DegenerateElement {
        element: usize,
        failures: Vec<DegenerateJacobian>,
    },

    /// Malformed input document.
    #[error("input error: {0}")]
    Input(String),

    /// I/O errors while reading input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
