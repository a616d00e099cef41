//! Task configuration and derived solution sizing.

use serde::{Deserialize, Serialize};

use crate::element::ElementKind;
use crate::error::{Error, Result};
use crate::material::MaterialModel;
use crate::mesh::Geometry;

/// Largest supported number of degrees of freedom per node.
pub const MAX_DOF: usize = 3;

/// Kind of boundary-value problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaskType {
    #[default]
    #[serde(rename = "CARTESIAN3D", alias = "cartesian3d")]
    Cartesian3d,
}

/// Parameters of the outer incremental/Newton solve.
///
/// The assembly engine carries these unchanged for the external nonlinear
/// driver; nothing here is consumed during element assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SolutionControl {
    pub task_type: TaskType,
    /// Number of load increments.
    pub load_increments: usize,
    /// Desired energy tolerance.
    pub desired_tolerance: f64,
    /// Maximum number of line searches per iteration.
    pub line_search_max: usize,
    /// Maximum number of arc-length searches.
    pub arc_length_max: usize,
    /// Reuse the initial tangent (modified Newton) instead of refreshing it.
    pub modified_newton: bool,
}

impl Default for SolutionControl {
    fn default() -> Self {
        Self {
            task_type: TaskType::Cartesian3d,
            load_increments: 0,
            desired_tolerance: 1e-8,
            line_search_max: 0,
            arc_length_max: 0,
            modified_newton: true,
        }
    }
}

/// Problem definition independent of geometry and loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TaskConfig {
    pub element_kind: ElementKind,
    /// Degrees of freedom per node.
    pub dof: usize,
    pub material: MaterialModel,
    /// Number of quadrature points per element.
    pub quadrature_points: usize,
    pub solution: SolutionControl,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            element_kind: ElementKind::Tetrahedra10,
            dof: MAX_DOF,
            material: MaterialModel::default(),
            quadrature_points: 5,
            solution: SolutionControl::default(),
        }
    }
}

impl TaskConfig {
    /// Check the configuration against the element kind's fixed tables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on a dof count the element kind cannot use,
    /// or on a quadrature point count with no tabulated rule.
    pub fn validate(&self) -> Result<()> {
        let kind = self.element_kind;
        if self.dof == 0 || self.dof > MAX_DOF {
            return Err(Error::Config(format!(
                "dof per node must be in 1..={}, got {}",
                MAX_DOF, self.dof
            )));
        }
        if self.dof != kind.dimension() {
            return Err(Error::Config(format!(
                "{} is a {}-D element and needs {} dof per node, got {}",
                kind,
                kind.dimension(),
                kind.dimension(),
                self.dof
            )));
        }
        kind.quadrature(self.quadrature_points)?;
        Ok(())
    }
}

/// Sizes derived from a validated configuration and its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolutionSizing {
    pub nodes_per_element: usize,
    pub quadrature_points: usize,
    /// Size of the global system, node count × dof.
    pub system_size: usize,
}

impl SolutionSizing {
    /// Derive and validate the sizing for `config` applied to `geometry`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid or the
    /// geometry's nodes per element differs from the element kind's
    /// shape-function count.
    pub fn new(config: &TaskConfig, geometry: &Geometry) -> Result<Self> {
        config.validate()?;
        let kind = config.element_kind;
        if geometry.nodes_per_element() != kind.n_nodes() {
            return Err(Error::Config(format!(
                "geometry has {} nodes per element, {} needs {}",
                geometry.nodes_per_element(),
                kind,
                kind.n_nodes()
            )));
        }
        Ok(Self {
            nodes_per_element: kind.n_nodes(),
            quadrature_points: config.quadrature_points,
            system_size: geometry.n_nodes() * config.dof,
        })
    }

    /// Size of a local stiffness matrix, nodes per element × dof.
    pub fn local_size(&self, dof: usize) -> usize {
        self.nodes_per_element * dof
    }
}
