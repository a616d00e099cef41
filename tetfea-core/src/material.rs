//! Material models and the rank-4 constitutive tensor.
//!
//! Only isotropic linear elasticity is implemented. Its tensor
//!
//! ```text
//! C_ijkl = λ δ_ij δ_kl + μ δ_ik δ_jl + μ δ_il δ_jk
//! ```
//!
//! is constant over the domain. The builder still takes the deformation
//! gradient at the point so deformation-dependent models can slot in.

use std::ops::Index;

use nalgebra::{Matrix3, Matrix6};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Spatial dimension of the constitutive tensor.
pub const DIM: usize = 3;

/// Voigt index to tensor index pair: xx, yy, zz, xy, yz, xz.
pub const VOIGT_MAP: [(usize, usize); 6] = [(0, 0), (1, 1), (2, 2), (0, 1), (1, 2), (0, 2)];

#[inline]
fn delta(i: usize, j: usize) -> f64 {
    if i == j {
        1.0
    } else {
        0.0
    }
}

/// Rank-4 constitutive tensor `C[i][j][k][l]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstitutiveTensor {
    c: [[[[f64; DIM]; DIM]; DIM]; DIM],
}

impl ConstitutiveTensor {
    /// Build a tensor from a component function.
    pub fn from_fn(f: impl Fn(usize, usize, usize, usize) -> f64) -> Self {
        let mut c = [[[[0.0; DIM]; DIM]; DIM]; DIM];
        for (i, ci) in c.iter_mut().enumerate() {
            for (j, cij) in ci.iter_mut().enumerate() {
                for (k, cijk) in cij.iter_mut().enumerate() {
                    for (l, cijkl) in cijk.iter_mut().enumerate() {
                        *cijkl = f(i, j, k, l);
                    }
                }
            }
        }
        Self { c }
    }

    /// Isotropic linear-elastic tensor from the Lamé parameters.
    pub fn linear_isotropic(lambda: f64, mu: f64) -> Self {
        Self::from_fn(|i, j, k, l| {
            lambda * delta(i, j) * delta(k, l)
                + mu * delta(i, k) * delta(j, l)
                + mu * delta(i, l) * delta(j, k)
        })
    }

    /// Component `C[i][j][k][l]`.
    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize, l: usize) -> f64 {
        self.c[i][j][k][l]
    }

    /// 6×6 matrix in Voigt notation, rows and columns ordered by [`VOIGT_MAP`].
    pub fn to_voigt(&self) -> Matrix6<f64> {
        Matrix6::from_fn(|row, col| {
            let (i, j) = VOIGT_MAP[row];
            let (k, l) = VOIGT_MAP[col];
            self.c[i][j][k][l]
        })
    }

    /// Whether `C_ijkl = C_klij` and `C_ijkl = C_jikl = C_ijlk` hold within `tol`.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let mut ok = true;
        for i in 0..DIM {
            for j in 0..DIM {
                for k in 0..DIM {
                    for l in 0..DIM {
                        let v = self.c[i][j][k][l];
                        ok &= (v - self.c[k][l][i][j]).abs() <= tol;
                        ok &= (v - self.c[j][i][k][l]).abs() <= tol;
                        ok &= (v - self.c[i][j][l][k]).abs() <= tol;
                    }
                }
            }
        }
        ok
    }
}

impl Index<(usize, usize, usize, usize)> for ConstitutiveTensor {
    type Output = f64;

    fn index(&self, (i, j, k, l): (usize, usize, usize, usize)) -> &f64 {
        &self.c[i][j][k][l]
    }
}

/// Isotropic linear-elastic material given by its Lamé parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearElastic {
    /// Lamé's first parameter λ.
    pub lambda: f64,
    /// Lamé's second parameter μ (shear modulus).
    pub mu: f64,
}

impl LinearElastic {
    /// Create a material from λ and μ.
    ///
    /// # Errors
    ///
    /// Returns error if μ ≤ 0 or the bulk modulus λ + 2μ/3 is not positive.
    pub fn new(lambda: f64, mu: f64) -> Result<Self> {
        if !lambda.is_finite() || !mu.is_finite() {
            return Err(Error::InvalidMaterial("Lamé parameters must be finite".into()));
        }
        if mu <= 0.0 {
            return Err(Error::InvalidMaterial("shear modulus μ must be positive".into()));
        }
        if 3.0 * lambda + 2.0 * mu <= 0.0 {
            return Err(Error::InvalidMaterial(
                "bulk modulus λ + 2μ/3 must be positive".into(),
            ));
        }
        Ok(Self { lambda, mu })
    }

    /// Create a material from Young's modulus and Poisson's ratio.
    ///
    /// λ = Eν / ((1+ν)(1-2ν)), μ = E / (2(1+ν)).
    pub fn from_young_poisson(youngs_modulus: f64, poissons_ratio: f64) -> Result<Self> {
        if youngs_modulus <= 0.0 {
            return Err(Error::InvalidMaterial(
                "Young's modulus must be positive".into(),
            ));
        }
        if poissons_ratio <= -1.0 || poissons_ratio >= 0.5 {
            return Err(Error::InvalidMaterial(
                "Poisson's ratio must be in range (-1, 0.5)".into(),
            ));
        }
        let e = youngs_modulus;
        let nu = poissons_ratio;
        Self::new(e * nu / ((1.0 + nu) * (1.0 - 2.0 * nu)), e / (2.0 * (1.0 + nu)))
    }

    /// Young's modulus E = μ(3λ + 2μ) / (λ + μ).
    pub fn youngs_modulus(&self) -> f64 {
        self.mu * (3.0 * self.lambda + 2.0 * self.mu) / (self.lambda + self.mu)
    }

    /// Poisson's ratio ν = λ / (2(λ + μ)).
    pub fn poissons_ratio(&self) -> f64 {
        self.lambda / (2.0 * (self.lambda + self.mu))
    }

    /// Bulk modulus K = λ + 2μ/3.
    pub fn bulk_modulus(&self) -> f64 {
        self.lambda + 2.0 * self.mu / 3.0
    }
}

/// Material model variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MaterialSpec", into = "MaterialSpec")]
pub enum MaterialModel {
    /// Isotropic linear elasticity, parameters `[λ, μ]`.
    LinearElastic(LinearElastic),
}

impl Default for MaterialModel {
    fn default() -> Self {
        MaterialModel::LinearElastic(LinearElastic {
            lambda: 100.0,
            mu: 100.0,
        })
    }
}

impl MaterialModel {
    /// Build a model from its input name and ordered numeric parameters.
    ///
    /// `linear-elastic` (alias `A5`) takes exactly two parameters, λ and μ.
    pub fn from_parameters(name: &str, parameters: &[f64]) -> Result<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("linear-elastic") || name.eq_ignore_ascii_case("A5") {
            match parameters {
                &[lambda, mu] => Ok(MaterialModel::LinearElastic(LinearElastic::new(lambda, mu)?)),
                _ => Err(Error::InvalidMaterial(format!(
                    "model '{}' expects 2 parameters (λ, μ), got {}",
                    name,
                    parameters.len()
                ))),
            }
        } else {
            Err(Error::InvalidMaterial(format!("unknown material model '{}'", name)))
        }
    }

    /// Canonical model name.
    pub fn name(&self) -> &'static str {
        match self {
            MaterialModel::LinearElastic(_) => "linear-elastic",
        }
    }

    /// Ordered numeric parameters.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            MaterialModel::LinearElastic(m) => vec![m.lambda, m.mu],
        }
    }

    /// Constitutive tensor at a point with deformation gradient `_deformation_gradient`.
    pub fn constitutive_tensor(&self, _deformation_gradient: &Matrix3<f64>) -> ConstitutiveTensor {
        match self {
            MaterialModel::LinearElastic(m) => ConstitutiveTensor::linear_isotropic(m.lambda, m.mu),
        }
    }

    /// Whether the tensor is independent of the deformation gradient.
    pub fn is_constant(&self) -> bool {
        match self {
            MaterialModel::LinearElastic(_) => true,
        }
    }
}

/// Serialized form of a [`MaterialModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<f64>,
}

impl TryFrom<MaterialSpec> for MaterialModel {
    type Error = Error;

    fn try_from(spec: MaterialSpec) -> Result<Self> {
        MaterialModel::from_parameters(&spec.name, &spec.parameters)
    }
}

impl From<MaterialModel> for MaterialSpec {
    fn from(model: MaterialModel) -> Self {
        MaterialSpec {
            name: model.name().to_string(),
            parameters: model.parameters(),
        }
    }
}
