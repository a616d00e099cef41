//! Prescribed-displacement boundary conditions.
//!
//! The assembly engine does not apply these; they are validated against the
//! geometry and passed through to the global solve.

use serde::{Deserialize, Serialize};

use crate::config::MAX_DOF;
use crate::error::{Error, Result};

/// Bitmask of fixed axes: bit 0 = x, bit 1 = y, bit 2 = z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AxisMask(u8);

impl AxisMask {
    pub const FREE: AxisMask = AxisMask(0);
    pub const X: AxisMask = AxisMask(1);
    pub const Y: AxisMask = AxisMask(2);
    pub const Z: AxisMask = AxisMask(4);
    pub const XYZ: AxisMask = AxisMask(7);

    /// Mask from raw bits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Input`] if bits above z are set.
    pub fn from_bits(bits: u8) -> Result<Self> {
        if bits > Self::XYZ.0 {
            return Err(Error::Input(format!("axis mask {} out of range 0..=7", bits)));
        }
        Ok(Self(bits))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether `axis` (0 = x, 1 = y, 2 = z) is fixed.
    pub fn is_fixed(self, axis: usize) -> bool {
        axis < MAX_DOF && self.0 & (1 << axis) != 0
    }

    /// Fixed axes in ascending order.
    pub fn fixed_axes(self) -> impl Iterator<Item = usize> {
        (0..MAX_DOF).filter(move |&axis| self.is_fixed(axis))
    }
}

impl std::ops::BitOr for AxisMask {
    type Output = AxisMask;

    fn bitor(self, rhs: AxisMask) -> AxisMask {
        AxisMask(self.0 | rhs.0)
    }
}

impl TryFrom<u8> for AxisMask {
    type Error = Error;

    fn try_from(bits: u8) -> Result<Self> {
        Self::from_bits(bits)
    }
}

impl From<AxisMask> for u8 {
    fn from(mask: AxisMask) -> u8 {
        mask.0
    }
}

/// Prescribed displacement at one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrescribedNode {
    pub node: usize,
    /// Prescribed value per axis; only fixed axes are meaningful.
    #[serde(default)]
    pub values: [f64; MAX_DOF],
    #[serde(rename = "type")]
    pub mask: AxisMask,
}

/// Sparse set of prescribed boundary nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundaryConditions {
    nodes: Vec<PrescribedNode>,
}

impl BoundaryConditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: PrescribedNode) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrescribedNode> {
        self.nodes.iter()
    }

    /// Check every node index against a geometry of `n_nodes` nodes.
    pub fn validate(&self, n_nodes: usize) -> Result<()> {
        match self.nodes.iter().find(|p| p.node >= n_nodes) {
            Some(p) => Err(Error::Mesh(format!(
                "boundary condition references node {} (geometry has {} nodes)",
                p.node, n_nodes
            ))),
            None => Ok(()),
        }
    }

    /// Fixed global dof indices with their prescribed values.
    pub fn constrained_dofs(&self, dofs_per_node: usize) -> Vec<(usize, f64)> {
        self.nodes
            .iter()
            .flat_map(|p| {
                p.mask
                    .fixed_axes()
                    .filter(move |&axis| axis < dofs_per_node)
                    .map(move |axis| (p.node * dofs_per_node + axis, p.values[axis]))
            })
            .collect()
    }
}

impl FromIterator<PrescribedNode> for BoundaryConditions {
    fn from_iter<I: IntoIterator<Item = PrescribedNode>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}
