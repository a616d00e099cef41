//! JSON problem input.
//!
//! A problem file has three sections:
//!
//! ```json
//! {
//!   "task": {
//!     "model": { "name": "linear-elastic", "parameters": [100.0, 100.0] },
//!     "element": { "type": "TETRAHEDRA10", "quadrature-points": 4 },
//!     "solution": { "load-increments": 1 }
//!   },
//!   "geometry": {
//!     "nodes": [[0.0, 0.0, 0.0], ...],
//!     "elements": [[0, 1, 2, 3, 4, 5, 6, 7, 8, 9], ...]
//!   },
//!   "boundary_conditions": [
//!     { "node": 0, "values": [0.0, 0.0, 0.0], "type": 7 }
//!   ]
//! }
//! ```
//!
//! Loading checks everything that can be checked without building a solver.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryConditions;
use crate::config::{SolutionControl, TaskConfig, MAX_DOF};
use crate::element::ElementKind;
use crate::error::{Error, Result};
use crate::material::MaterialModel;
use crate::mesh::Geometry;
use crate::types::Point3;

/// Element section of the task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ElementSection {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(default = "default_quadrature_points")]
    pub quadrature_points: usize,
    /// Checked against the element kind when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes_per_element: Option<usize>,
}

fn default_quadrature_points() -> usize {
    TaskConfig::default().quadrature_points
}

fn default_dof() -> usize {
    MAX_DOF
}

/// Task section: material, element and solution control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSection {
    pub model: MaterialModel,
    pub element: ElementSection,
    #[serde(default = "default_dof")]
    pub dof: usize,
    #[serde(default)]
    pub solution: SolutionControl,
}

/// Geometry section: coordinate rows and connectivity rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometrySection {
    pub nodes: Vec<Vec<f64>>,
    pub elements: Vec<Vec<usize>>,
}

/// Whole input file as deserialized, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDocument {
    pub task: TaskSection,
    pub geometry: GeometrySection,
    #[serde(default)]
    pub boundary_conditions: BoundaryConditions,
}

impl InputDocument {
    /// Reads a JSON input file
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Writes the document as pretty-printed JSON, creating parent directories
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        Ok(())
    }
}

/// A validated problem ready for [`Solver::new`](crate::assembly::Solver::new).
#[derive(Debug, Clone)]
pub struct Problem {
    pub config: TaskConfig,
    pub geometry: Geometry,
    pub boundary: BoundaryConditions,
}

impl Problem {
    /// Load and validate a JSON problem file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] or [`Error::Json`] if the file cannot be read or parsed,
    /// then whatever [`from_document`](Self::from_document) reports.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_document(InputDocument::read_json(path)?)
    }

    /// Parse and validate a JSON problem held in memory.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_document(serde_json::from_str(json)?)
    }

    /// Validate a deserialized document.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] for an invalid task (dof, quadrature, nodes per element)
    /// - [`Error::Input`] for a coordinate row whose length is not the dof count
    /// - [`Error::Mesh`] for bad connectivity or boundary node indices
    pub fn from_document(doc: InputDocument) -> Result<Self> {
        let InputDocument {
            task,
            geometry: section,
            boundary_conditions: boundary,
        } = doc;

        let config = TaskConfig {
            element_kind: task.element.kind,
            dof: task.dof,
            material: task.model,
            quadrature_points: task.element.quadrature_points,
            solution: task.solution,
        };
        config.validate()?;

        let kind = config.element_kind;
        if let Some(npe) = task.element.nodes_per_element {
            if npe != kind.n_nodes() {
                return Err(Error::Config(format!(
                    "nodes-per-element {} does not match {} ({} nodes)",
                    npe,
                    kind,
                    kind.n_nodes()
                )));
            }
        }

        let mut geometry =
            Geometry::with_capacity(kind.n_nodes(), section.nodes.len(), section.elements.len());
        for (i, row) in section.nodes.iter().enumerate() {
            geometry.add_node(coordinate_row(i, row, config.dof)?);
        }
        for element in section.elements {
            geometry.add_element(element)?;
        }
        boundary.validate(geometry.n_nodes())?;

        Ok(Self {
            config,
            geometry,
            boundary,
        })
    }
}

fn coordinate_row(index: usize, row: &[f64], dof: usize) -> Result<Point3> {
    if row.len() != dof {
        return Err(Error::Input(format!(
            "node {} has {} coordinates, expected {}",
            index,
            row.len(),
            dof
        )));
    }
    if let Some(bad) = row.iter().find(|v| !v.is_finite()) {
        return Err(Error::Input(format!("node {} has non-finite coordinate {}", index, bad)));
    }
    let mut point = Point3::zeros();
    for (axis, &value) in row.iter().enumerate() {
        point[axis] = value;
    }
    Ok(point)
}
