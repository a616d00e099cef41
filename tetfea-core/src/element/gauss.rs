//! Gauss quadrature rules for the reference tetrahedron.
//!
//! Points are given in local coordinates (r, s, t) of the reference
//! tetrahedron with vertices (0,0,0), (1,0,0), (0,1,0), (0,0,1). The fourth
//! barycentric coordinate is implicit: 1 - r - s - t.
//!
//! Weights already include the 1/6 volume of the reference tetrahedron, so
//! `∫f dV ≈ Σ w_q |det J_q| f(x_q)` with no further scaling.
//!
//! # Usage
//!
//! ```
//! use tetfea_core::element::gauss::tetrahedron_rule;
//!
//! let rule = tetrahedron_rule(4).unwrap();
//! let volume: f64 = rule.iter().map(|qp| qp.weight).sum();
//! assert!((volume - 1.0 / 6.0).abs() < 1e-15);
//! ```

use crate::types::LocalCoords;

/// A quadrature point with local coordinates and weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraturePoint {
    /// Integration weight, pre-divided by 6.
    pub weight: f64,
    /// Local coordinates (r, s, t).
    pub coords: LocalCoords,
}

impl QuadraturePoint {
    const fn new(weight: f64, r: f64, s: f64, t: f64) -> Self {
        Self {
            weight,
            coords: LocalCoords::new(r, s, t),
        }
    }
}

// a = (5 + 3√5) / 20, b = (5 - √5) / 20
const TET4_A: f64 = 0.585_410_196_624_968_5;
const TET4_B: f64 = 0.138_196_601_125_010_5;

/// 4-point rule, exact for polynomials up to degree 2.
pub static TETRAHEDRON_4: [QuadraturePoint; 4] = [
    QuadraturePoint::new((1.0 / 4.0) / 6.0, TET4_A, TET4_B, TET4_B),
    QuadraturePoint::new((1.0 / 4.0) / 6.0, TET4_B, TET4_A, TET4_B),
    QuadraturePoint::new((1.0 / 4.0) / 6.0, TET4_B, TET4_B, TET4_A),
    QuadraturePoint::new((1.0 / 4.0) / 6.0, TET4_B, TET4_B, TET4_B),
];

/// 5-point rule, exact for polynomials up to degree 3.
///
/// The centroid carries a negative weight.
pub static TETRAHEDRON_5: [QuadraturePoint; 5] = [
    QuadraturePoint::new((-4.0 / 5.0) / 6.0, 1.0 / 4.0, 1.0 / 4.0, 1.0 / 4.0),
    QuadraturePoint::new((9.0 / 20.0) / 6.0, 1.0 / 2.0, 1.0 / 6.0, 1.0 / 6.0),
    QuadraturePoint::new((9.0 / 20.0) / 6.0, 1.0 / 6.0, 1.0 / 2.0, 1.0 / 6.0),
    QuadraturePoint::new((9.0 / 20.0) / 6.0, 1.0 / 6.0, 1.0 / 6.0, 1.0 / 2.0),
    QuadraturePoint::new((9.0 / 20.0) / 6.0, 1.0 / 6.0, 1.0 / 6.0, 1.0 / 6.0),
];

/// Point counts with a tabulated tetrahedral rule.
pub const TETRAHEDRON_RULE_SIZES: [usize; 2] = [4, 5];

/// Tetrahedral quadrature rule with `n` points, if one is tabulated.
pub fn tetrahedron_rule(n: usize) -> Option<&'static [QuadraturePoint]> {
    match n {
        4 => Some(&TETRAHEDRON_4),
        5 => Some(&TETRAHEDRON_5),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Integrate a monomial r^a s^b t^c over the reference tetrahedron.
    fn integrate(rule: &[QuadraturePoint], a: i32, b: i32, c: i32) -> f64 {
        rule.iter()
            .map(|qp| qp.weight * qp.coords.r.powi(a) * qp.coords.s.powi(b) * qp.coords.t.powi(c))
            .sum()
    }

    /// Exact value a! b! c! / (a + b + c + 3)!.
    fn exact(a: u32, b: u32, c: u32) -> f64 {
        let fact = |n: u32| (1..=n).map(f64::from).product::<f64>();
        fact(a) * fact(b) * fact(c) / fact(a + b + c + 3)
    }

    #[test]
    fn test_weights_sum_to_reference_volume() {
        for n in TETRAHEDRON_RULE_SIZES {
            let rule = tetrahedron_rule(n).unwrap();
            let sum: f64 = rule.iter().map(|qp| qp.weight).sum();
            assert_relative_eq!(sum, 1.0 / 6.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_points_inside_reference_tetrahedron() {
        for n in TETRAHEDRON_RULE_SIZES {
            for qp in tetrahedron_rule(n).unwrap() {
                assert!(qp.coords.in_reference_tetrahedron(), "{:?}", qp);
            }
        }
    }

    #[test]
    fn test_four_point_rule_degree_two() {
        let rule = tetrahedron_rule(4).unwrap();
        for (a, b, c) in [(1, 0, 0), (0, 1, 0), (0, 0, 1), (2, 0, 0), (1, 1, 0), (0, 1, 1)] {
            assert_relative_eq!(
                integrate(rule, a, b, c),
                exact(a as u32, b as u32, c as u32),
                epsilon = 1e-14
            );
        }
    }

    #[test]
    fn test_five_point_rule_degree_three() {
        let rule = tetrahedron_rule(5).unwrap();
        for (a, b, c) in [(1, 0, 0), (2, 0, 0), (1, 1, 0), (3, 0, 0), (1, 1, 1), (2, 0, 1)] {
            assert_relative_eq!(
                integrate(rule, a, b, c),
                exact(a as u32, b as u32, c as u32),
                epsilon = 1e-14
            );
        }
    }

    #[test]
    fn test_unsupported_rule() {
        assert!(tetrahedron_rule(0).is_none());
        assert!(tetrahedron_rule(1).is_none());
        assert!(tetrahedron_rule(8).is_none());
    }
}
