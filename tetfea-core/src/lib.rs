//! tetfea core - element stiffness assembly for 10-node tetrahedra
//!
//! Computes dense local stiffness matrices of quadratic tetrahedral elements
//! for small-strain isotropic linear elasticity. Scattering into a global
//! system, boundary-condition application and the linear or nonlinear solve
//! belong to the caller.
//!
//! # Architecture
//!
//! Leaves first:
//!
//! - [`element`]: shape functions and quadrature tables per element kind
//! - [`database`]: shape values and local derivatives at every quadrature
//!   point, built once per solver
//! - [`jacobian`]: per-point Jacobian, closed-form inverse and global
//!   shape-function gradients
//! - [`material`]: rank-4 constitutive tensor
//! - [`assembly`]: the [`Solver`] that integrates local stiffness matrices,
//!   one element at a time or all of them in parallel
//!
//! Problems are described by a [`TaskConfig`], a [`Geometry`] and a set of
//! [`BoundaryConditions`], usually loaded together from JSON via
//! [`Problem::load`].

pub mod types;
pub mod element;
pub mod database;
pub mod jacobian;
pub mod material;
pub mod mesh;
pub mod boundary;
pub mod config;
pub mod assembly;
pub mod input;
pub mod error;

pub use types::{Jacobian, LocalCoords, Point3, StiffnessMatrix};
pub use element::{ElementKind, QuadraturePoint};
pub use database::{GaussPoint, GaussPointDatabase};
pub use jacobian::ShapeGradients;
pub use material::{ConstitutiveTensor, LinearElastic, MaterialModel};
pub use mesh::{ElementView, Geometry};
pub use boundary::{AxisMask, BoundaryConditions, PrescribedNode};
pub use config::{SolutionControl, SolutionSizing, TaskConfig};
pub use assembly::{AssemblyOptions, AssemblyReport, ElementStiffness, Solver};
pub use input::{InputDocument, Problem};
pub use error::{DegenerateJacobian, Error, Result};
