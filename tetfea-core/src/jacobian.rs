//! Jacobian of the isoparametric map and global shape-function gradients.
//!
//! For one element and one quadrature point:
//!
//! ```text
//!            dN_1            dN_n
//! J(i,j) =  ------ * x_1j + ... ------ * x_nj        (i = local axis r, s, t)
//!            dξ_i            dξ_i                    (j = global axis x, y, z)
//!
//! [ dN/dx ]           [ dN/dr ]
//! [ dN/dy ]  = J^-1 * [ dN/ds ]
//! [ dN/dz ]           [ dN/dt ]
//! ```
//!
//! The inverse is formed in closed form from the adjugate. A determinant at
//! or below machine epsilon in magnitude means the element is degenerate
//! (zero volume) and no gradients are produced.

use log::trace;
use nalgebra::{DMatrix, Matrix3};

use crate::database::GaussPoint;
use crate::error::DegenerateJacobian;
use crate::mesh::ElementView;
use crate::types::Jacobian;

/// Determinant of a 3×3 matrix by triple-product expansion.
pub fn determinant3(m: &Matrix3<f64>) -> f64 {
    m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
}

/// Adjugate (transposed cofactor matrix) of a 3×3 matrix.
pub fn adjugate3(m: &Matrix3<f64>) -> Matrix3<f64> {
    Matrix3::new(
        m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)],
        m[(0, 2)] * m[(2, 1)] - m[(0, 1)] * m[(2, 2)],
        m[(0, 1)] * m[(1, 2)] - m[(0, 2)] * m[(1, 1)],
        m[(1, 2)] * m[(2, 0)] - m[(1, 0)] * m[(2, 2)],
        m[(0, 0)] * m[(2, 2)] - m[(0, 2)] * m[(2, 0)],
        m[(0, 2)] * m[(1, 0)] - m[(0, 0)] * m[(1, 2)],
        m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)],
        m[(0, 1)] * m[(2, 0)] - m[(0, 0)] * m[(2, 1)],
        m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)],
    )
}

/// Whether a determinant is too small to invert.
#[inline]
pub fn is_degenerate(det: f64) -> bool {
    det.abs() <= f64::EPSILON
}

/// Closed-form inverse of a 3×3 matrix together with its determinant.
///
/// Returns `None` when the matrix is degenerate.
pub fn invert3(m: &Matrix3<f64>) -> Option<(Matrix3<f64>, f64)> {
    let det = determinant3(m);
    if is_degenerate(det) {
        return None;
    }
    Some((adjugate3(m) / det, det))
}

/// Jacobian of the local-to-global map at one quadrature point.
pub fn jacobian(element: &ElementView<'_>, point: &GaussPoint) -> Jacobian {
    let mut j = Jacobian::zeros();
    for i in 0..3 {
        for jj in 0..3 {
            j[(i, jj)] = (0..element.n_nodes())
                .map(|k| point.derivatives[(i, k)] * element.node_coord(k, jj))
                .sum();
        }
    }
    j
}

/// Global-coordinate gradients of every shape function at one quadrature point.
///
/// Layout of `grad` is `[axis, node]`: `grad[(i, a)] = dN_a / dX_i`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeGradients {
    pub grad: DMatrix<f64>,
    /// Signed determinant of the Jacobian. Negative means an inverted element.
    pub det_j: f64,
}

impl ShapeGradients {
    /// Transform the local derivatives at `point` into global gradients for `element`.
    ///
    /// # Errors
    ///
    /// Returns [`DegenerateJacobian`] if |det J| is at or below `f64::EPSILON`.
    pub fn compute(
        element: &ElementView<'_>,
        quadrature_point: usize,
        point: &GaussPoint,
    ) -> Result<Self, DegenerateJacobian> {
        let j = jacobian(element, point);
        let (j_inv, det_j) = invert3(&j).ok_or_else(|| DegenerateJacobian {
            element: element.index(),
            quadrature_point,
            determinant: determinant3(&j),
        })?;

        let n = element.n_nodes();
        let grad = DMatrix::from_fn(3, n, |i, a| {
            (0..3).map(|k| j_inv[(i, k)] * point.derivatives[(k, a)]).sum()
        });

        trace!(
            "element {} point {}: det J = {:.6e}, J^-1 = {}, grad = {}",
            element.index(),
            quadrature_point,
            det_j,
            j_inv,
            grad
        );

        Ok(Self { grad, det_j })
    }

    /// Integration measure |det J| · w for this point.
    #[inline]
    pub fn measure(&self, weight: f64) -> f64 {
        self.det_j.abs() * weight
    }
}
