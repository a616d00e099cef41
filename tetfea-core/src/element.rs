//! Element kinds and their tables.
//!
//! [`ElementKind`] is the closed set of supported element kinds. Each variant
//! supplies its shape-function table, its derivative table and its quadrature
//! rules; adding an element kind means adding a variant here.
//!
//! # Submodules
//!
//! - [`gauss`] - Gauss quadrature rules for numerical integration
//! - [`tet10`] - Quadratic tetrahedron shape functions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod gauss;
pub mod tet10;

pub use gauss::{tetrahedron_rule, QuadraturePoint};
pub use tet10::Tet10;

/// Supported element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElementKind {
    /// 10-node tetrahedron (quadratic).
    #[default]
    Tetrahedra10,
}

impl ElementKind {
    /// Number of nodes (and shape functions) for this element kind.
    pub fn n_nodes(self) -> usize {
        match self {
            ElementKind::Tetrahedra10 => Tet10::N_NODES,
        }
    }

    /// Spatial dimension, which is also the number of local axes.
    pub fn dimension(self) -> usize {
        match self {
            ElementKind::Tetrahedra10 => Tet10::N_AXES,
        }
    }

    /// Shape function value for `node` at local coordinates (r, s, t).
    pub fn shape(self, node: usize, r: f64, s: f64, t: f64) -> f64 {
        match self {
            ElementKind::Tetrahedra10 => Tet10::shape(node, r, s, t),
        }
    }

    /// Shape function derivative for `node` along local `axis`.
    pub fn shape_derivative(self, node: usize, axis: usize, r: f64, s: f64, t: f64) -> f64 {
        match self {
            ElementKind::Tetrahedra10 => Tet10::shape_derivative(node, axis, r, s, t),
        }
    }

    /// Quadrature point counts with a tabulated rule for this kind.
    pub fn quadrature_sizes(self) -> &'static [usize] {
        match self {
            ElementKind::Tetrahedra10 => &gauss::TETRAHEDRON_RULE_SIZES,
        }
    }

    /// Quadrature rule with `n_points` points.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no rule with that many points exists.
    pub fn quadrature(self, n_points: usize) -> Result<&'static [QuadraturePoint]> {
        let rule = match self {
            ElementKind::Tetrahedra10 => tetrahedron_rule(n_points),
        };
        rule.ok_or_else(|| {
            Error::Config(format!(
                "no {}-point quadrature rule for {} (supported: {:?})",
                n_points,
                self,
                self.quadrature_sizes()
            ))
        })
    }

    /// Canonical name used in input documents.
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Tetrahedra10 => "TETRAHEDRA10",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("TETRAHEDRA10") {
            Ok(ElementKind::Tetrahedra10)
        } else {
            Err(Error::Config(format!("unsupported element kind '{}'", s.trim())))
        }
    }
}

impl TryFrom<String> for ElementKind {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        kind.name().to_string()
    }
}
