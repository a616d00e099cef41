//! Core numeric types shared across the engine.

use nalgebra::{DMatrix, Matrix3, Vector3};

/// A point in 3D space.
pub type Point3 = Vector3<f64>;

/// Jacobian of the local-to-global coordinate map.
///
/// Row `i` holds the derivatives of (x, y, z) with respect to local axis `i`.
pub type Jacobian = Matrix3<f64>;

/// Dense per-element stiffness matrix, (nodes × dof)².
pub type StiffnessMatrix = DMatrix<f64>;

/// Local coordinates (r, s, t) of the reference tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalCoords {
    pub r: f64,
    pub s: f64,
    pub t: f64,
}

impl LocalCoords {
    pub const fn new(r: f64, s: f64, t: f64) -> Self {
        Self { r, s, t }
    }

    /// The implicit fourth barycentric coordinate, 1 - r - s - t.
    #[inline]
    pub fn anchor(&self) -> f64 {
        1.0 - self.r - self.s - self.t
    }

    /// Whether the point lies inside (or on) the reference tetrahedron.
    pub fn in_reference_tetrahedron(&self) -> bool {
        let tol = 1e-12;
        self.r >= -tol && self.s >= -tol && self.t >= -tol && self.anchor() >= -tol
    }
}
