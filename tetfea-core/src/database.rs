//! Gauss-point database.
//!
//! For every quadrature point of an element kind, the database stores the
//! weight, the shape-function value of each local node and the derivative of
//! each shape function along each local axis. None of this depends on the
//! element geometry, so it is computed once per solver and shared read-only
//! by every element during assembly.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::element::ElementKind;
use crate::error::{Error, Result};
use crate::types::LocalCoords;

/// Precomputed data for one quadrature point.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussPoint {
    /// Integration weight (already divided by the reference volume factor).
    pub weight: f64,
    /// Local coordinates of the point.
    pub coords: LocalCoords,
    /// Shape-function values, one per local node.
    pub values: DVector<f64>,
    /// Local derivatives, layout `[axis, node]`.
    pub derivatives: DMatrix<f64>,
}

/// Shape-function data at every quadrature point of one element kind.
#[derive(Debug, Clone, Default)]
pub struct GaussPointDatabase {
    kind: Option<ElementKind>,
    points: Vec<GaussPoint>,
}

impl GaussPointDatabase {
    /// Build a database for `kind` using the `n_points` quadrature rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `nodes_per_element` does not match the
    /// element kind or no rule with `n_points` points exists.
    pub fn new(kind: ElementKind, n_points: usize, nodes_per_element: usize) -> Result<Self> {
        let mut db = Self::default();
        db.build(kind, n_points, nodes_per_element)?;
        Ok(db)
    }

    /// Populate the database. Does nothing if it is already built.
    pub fn build(&mut self, kind: ElementKind, n_points: usize, nodes_per_element: usize) -> Result<()> {
        if self.is_built() {
            debug!("gauss-point database already built, skipping");
            return Ok(());
        }
        if nodes_per_element != kind.n_nodes() {
            return Err(Error::Config(format!(
                "{} has {} shape functions, but {} nodes per element were requested",
                kind,
                kind.n_nodes(),
                nodes_per_element
            )));
        }

        let rule = kind.quadrature(n_points)?;
        let n_axes = kind.dimension();

        self.points = rule
            .iter()
            .map(|qp| {
                let LocalCoords { r, s, t } = qp.coords;
                GaussPoint {
                    weight: qp.weight,
                    coords: qp.coords,
                    values: DVector::from_fn(nodes_per_element, |node, _| kind.shape(node, r, s, t)),
                    derivatives: DMatrix::from_fn(n_axes, nodes_per_element, |axis, node| {
                        kind.shape_derivative(node, axis, r, s, t)
                    }),
                }
            })
            .collect();
        self.kind = Some(kind);

        debug!(
            "built gauss-point database: {}, {} points x {} nodes",
            kind, n_points, nodes_per_element
        );
        Ok(())
    }

    /// Whether [`build`](Self::build) has completed.
    pub fn is_built(&self) -> bool {
        self.kind.is_some()
    }

    /// Element kind the database was built for.
    pub fn kind(&self) -> Option<ElementKind> {
        self.kind
    }

    /// Number of quadrature points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Data for quadrature point `q`.
    pub fn point(&self, q: usize) -> Option<&GaussPoint> {
        self.points.get(q)
    }

    /// All quadrature points, in rule order.
    pub fn points(&self) -> &[GaussPoint] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_build_tet10_database() {
        let db = GaussPointDatabase::new(ElementKind::Tetrahedra10, 4, 10).unwrap();
        assert!(db.is_built());
        assert_eq!(db.len(), 4);
        for gp in db.points() {
            assert_eq!(gp.values.len(), 10);
            assert_eq!(gp.derivatives.shape(), (3, 10));
            assert_relative_eq!(gp.values.sum(), 1.0, epsilon = 1e-14);
            assert_relative_eq!(gp.weight, 1.0 / 24.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_database_matches_shape_functions() {
        let kind = ElementKind::Tetrahedra10;
        let db = GaussPointDatabase::new(kind, 5, 10).unwrap();
        let gp = db.point(2).unwrap();
        let LocalCoords { r, s, t } = gp.coords;
        for node in 0..10 {
            assert_eq!(gp.values[node], kind.shape(node, r, s, t));
            for axis in 0..3 {
                assert_eq!(gp.derivatives[(axis, node)], kind.shape_derivative(node, axis, r, s, t));
            }
        }
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut db = GaussPointDatabase::new(ElementKind::Tetrahedra10, 4, 10).unwrap();
        let before = db.points().to_vec();
        // A second build, even with a different order, leaves the data alone.
        db.build(ElementKind::Tetrahedra10, 5, 10).unwrap();
        assert_eq!(db.len(), 4);
        assert_eq!(db.points(), &before[..]);
    }

    #[test]
    fn test_nodes_per_element_mismatch() {
        let err = GaussPointDatabase::new(ElementKind::Tetrahedra10, 4, 4).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unsupported_point_count() {
        let err = GaussPointDatabase::new(ElementKind::Tetrahedra10, 6, 10).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(!GaussPointDatabase::default().is_built());
    }
}
