//! Element stiffness assembly.
//!
//! A [`Solver`] validates the task against the geometry, builds the
//! Gauss-point database once, and then produces a dense local stiffness
//! matrix per element:
//!
//! ```text
//! K[a·dof+i][b·dof+j] += Σ_{k,l} grad[k][a] · C[i][k][j][l] · grad[l][b] · |det J| · w
//! ```
//!
//! summed over quadrature points. Scattering into a global matrix is left to
//! the caller, which receives the element's global dof indices alongside the
//! matrix. Elements share only read-only data, so [`Solver::assemble_all`]
//! runs them in parallel with Rayon.

use log::{debug, info, trace, warn};
use nalgebra::{DMatrix, Matrix3};
use rayon::prelude::*;

use crate::boundary::BoundaryConditions;
use crate::config::{SolutionSizing, TaskConfig};
use crate::database::GaussPointDatabase;
use crate::error::{DegenerateJacobian, Error, Result};
use crate::jacobian::ShapeGradients;
use crate::material::ConstitutiveTensor;
use crate::mesh::{ElementView, Geometry};
use crate::types::StiffnessMatrix;

/// Local stiffness of one element plus its local-to-global dof map.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStiffness {
    element: usize,
    matrix: StiffnessMatrix,
    dof_indices: Vec<usize>,
}

impl ElementStiffness {
    /// Element index in the geometry.
    pub fn element(&self) -> usize {
        self.element
    }

    /// Dense local stiffness matrix, (nodes × dof)².
    pub fn matrix(&self) -> &StiffnessMatrix {
        &self.matrix
    }

    /// Global dof index of every local row/column.
    pub fn dof_indices(&self) -> &[usize] {
        &self.dof_indices
    }

    /// Iterate `(global_row, global_col, value)` for scattering.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let n = self.dof_indices.len();
        (0..n).flat_map(move |i| {
            (0..n).map(move |j| (self.dof_indices[i], self.dof_indices[j], self.matrix[(i, j)]))
        })
    }

    pub fn into_parts(self) -> (StiffnessMatrix, Vec<usize>) {
        (self.matrix, self.dof_indices)
    }
}

/// Batch assembly options.
#[derive(Debug, Clone)]
pub struct AssemblyOptions {
    /// Assemble elements in parallel.
    pub parallel: bool,
    /// Number of parallel threads (0 = Rayon's global pool).
    pub n_threads: usize,
    /// Fail with the lowest-index degenerate element instead of cataloguing all of them.
    pub fail_fast: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            n_threads: 0,
            fail_fast: false,
        }
    }
}

/// Outcome of assembling every element.
#[derive(Debug, Clone, Default)]
pub struct AssemblyReport {
    /// Successfully assembled elements, in element order.
    pub elements: Vec<ElementStiffness>,
    /// Every degenerate quadrature point encountered, in element order.
    pub failures: Vec<DegenerateJacobian>,
}

impl AssemblyReport {
    /// Indices of elements that failed, without duplicates.
    pub fn degenerate_elements(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.failures.iter().map(|f| f.element).collect();
        ids.dedup();
        ids
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Element assembly engine for one task and geometry.
#[derive(Debug)]
pub struct Solver<'g> {
    config: TaskConfig,
    sizing: SolutionSizing,
    geometry: &'g Geometry,
    boundary: &'g BoundaryConditions,
    database: GaussPointDatabase,
    ctensor: ConstitutiveTensor,
}

impl<'g> Solver<'g> {
    /// Validate the task against the geometry and build the Gauss-point database.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unsupported element kind, dof count or
    /// quadrature order, and [`Error::Mesh`] if a boundary condition
    /// references a node outside the geometry.
    pub fn new(
        config: TaskConfig,
        geometry: &'g Geometry,
        boundary: &'g BoundaryConditions,
    ) -> Result<Self> {
        let sizing = SolutionSizing::new(&config, geometry)?;
        boundary.validate(geometry.n_nodes())?;

        let database = GaussPointDatabase::new(
            config.element_kind,
            sizing.quadrature_points,
            sizing.nodes_per_element,
        )?;

        // Reference configuration: the deformation gradient is the identity.
        let ctensor = config.material.constitutive_tensor(&Matrix3::identity());
        trace!("constitutive matrix (Voigt): {}", ctensor.to_voigt());

        info!(
            "solver ready: {} with {}-point quadrature, {} elements, {} nodes, system size {}",
            config.element_kind,
            sizing.quadrature_points,
            geometry.n_elements(),
            geometry.n_nodes(),
            sizing.system_size
        );

        Ok(Self {
            config,
            sizing,
            geometry,
            boundary,
            database,
            ctensor,
        })
    }

    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    pub fn sizing(&self) -> &SolutionSizing {
        &self.sizing
    }

    pub fn geometry(&self) -> &'g Geometry {
        self.geometry
    }

    /// Boundary conditions, untouched, for the global solve.
    pub fn boundary_conditions(&self) -> &'g BoundaryConditions {
        self.boundary
    }

    pub fn database(&self) -> &GaussPointDatabase {
        &self.database
    }

    /// Constitutive tensor used for every element.
    pub fn constitutive_tensor(&self) -> &ConstitutiveTensor {
        &self.ctensor
    }

    fn element_view(&self, element: usize) -> Result<ElementView<'g>> {
        self.geometry.element(element).ok_or_else(|| {
            Error::Mesh(format!(
                "element index {} out of bounds (geometry has {} elements)",
                element,
                self.geometry.n_elements()
            ))
        })
    }

    /// Global shape-function gradients of `element` at quadrature point `q`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `q` is not a point of the rule and
    /// [`Error::DegenerateElement`] carrying the single failed point if the
    /// Jacobian is degenerate there.
    pub fn gradients(&self, element: &ElementView<'_>, q: usize) -> Result<ShapeGradients> {
        let point = self.database.point(q).ok_or_else(|| {
            Error::Config(format!(
                "quadrature point {} out of range ({}-point rule)",
                q,
                self.database.len()
            ))
        })?;
        ShapeGradients::compute(element, q, point).map_err(|failure| Error::DegenerateElement {
            element: element.index(),
            failures: vec![failure],
        })
    }

    /// Integrate the local stiffness of `element`, skipping degenerate points.
    ///
    /// Returns the (possibly partial) matrix and every quadrature point that
    /// was skipped.
    pub fn integrate(&self, element: &ElementView<'_>) -> (StiffnessMatrix, Vec<DegenerateJacobian>) {
        let dof = self.config.dof;
        let n = element.n_nodes();
        let c = &self.ctensor;
        let mut k = DMatrix::zeros(n * dof, n * dof);
        let mut failures = Vec::new();

        for (q, gp) in self.database.points().iter().enumerate() {
            let grads = match ShapeGradients::compute(element, q, gp) {
                Ok(grads) => grads,
                Err(failure) => {
                    warn!("{}", failure);
                    failures.push(failure);
                    continue;
                }
            };
            if grads.det_j < 0.0 {
                warn!(
                    "inverted element {} at quadrature point {} (det J = {:e})",
                    element.index(),
                    q,
                    grads.det_j
                );
            }
            let g = &grads.grad;
            let dv = grads.measure(gp.weight);

            for a in 0..n {
                for b in 0..n {
                    for i in 0..dof {
                        for j in 0..dof {
                            let mut sum = 0.0;
                            for kk in 0..dof {
                                for l in 0..dof {
                                    sum += g[(kk, a)] * c.get(i, kk, j, l) * g[(l, b)];
                                }
                            }
                            k[(a * dof + i, b * dof + j)] += sum * dv;
                        }
                    }
                }
            }
        }

        (k, failures)
    }

    /// Assemble the local stiffness of element `element`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Mesh`] for an unknown element index and
    /// [`Error::DegenerateElement`] if any quadrature point had a degenerate
    /// Jacobian.
    pub fn assemble(&self, element: usize) -> Result<ElementStiffness> {
        let view = self.element_view(element)?;
        let (matrix, failures) = self.integrate(&view);
        if !failures.is_empty() {
            return Err(Error::DegenerateElement { element, failures });
        }
        trace!("local stiffness for element {}: {}", element, matrix);
        Ok(ElementStiffness {
            element,
            matrix,
            dof_indices: view.dof_indices(self.config.dof),
        })
    }

    /// Assemble every element of the geometry.
    ///
    /// Without `fail_fast`, degenerate elements are catalogued in the report
    /// and assembly continues with the rest.
    pub fn assemble_all(&self, options: &AssemblyOptions) -> Result<AssemblyReport> {
        if options.parallel && options.n_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(options.n_threads)
                .build()
                .map_err(|e| Error::Config(format!("cannot build thread pool: {}", e)))?;
            return pool.install(|| self.assemble_all_in_pool(options));
        }
        self.assemble_all_in_pool(options)
    }

    fn assemble_all_in_pool(&self, options: &AssemblyOptions) -> Result<AssemblyReport> {
        let n_elements = self.geometry.n_elements();

        if options.fail_fast {
            let elements = if options.parallel {
                // Collected in element order so the reported failure is the lowest index.
                (0..n_elements)
                    .into_par_iter()
                    .map(|e| self.assemble(e))
                    .collect::<Vec<_>>()
                    .into_iter()
                    .collect::<Result<Vec<_>>>()?
            } else {
                (0..n_elements).map(|e| self.assemble(e)).collect::<Result<Vec<_>>>()?
            };
            debug!("assembled {} elements", elements.len());
            return Ok(AssemblyReport {
                elements,
                failures: Vec::new(),
            });
        }

        let results: Vec<Result<ElementStiffness>> = if options.parallel {
            (0..n_elements).into_par_iter().map(|e| self.assemble(e)).collect()
        } else {
            (0..n_elements).map(|e| self.assemble(e)).collect()
        };

        let mut report = AssemblyReport::default();
        for result in results {
            match result {
                Ok(stiffness) => report.elements.push(stiffness),
                Err(Error::DegenerateElement { failures, .. }) => report.failures.extend(failures),
                Err(e) => return Err(e),
            }
        }
        debug!(
            "assembled {} elements, {} degenerate",
            report.elements.len(),
            report.degenerate_elements().len()
        );
        Ok(report)
    }

    /// Volume of element `element`, Σ |det J| · w over the quadrature points.
    ///
    /// # Errors
    ///
    /// Same as [`assemble`](Self::assemble).
    pub fn element_volume(&self, element: usize) -> Result<f64> {
        let view = self.element_view(element)?;
        let mut volume = 0.0;
        let mut failures = Vec::new();
        for (q, gp) in self.database.points().iter().enumerate() {
            match ShapeGradients::compute(&view, q, gp) {
                Ok(grads) => volume += grads.measure(gp.weight),
                Err(failure) => failures.push(failure),
            }
        }
        if !failures.is_empty() {
            return Err(Error::DegenerateElement { element, failures });
        }
        Ok(volume)
    }
}
