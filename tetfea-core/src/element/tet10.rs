//! 10-node tetrahedron (Tet10) shape functions.
//!
//! The Tet10 is a quadratic 3D solid element with:
//! - 4 nodes at vertices
//! - 6 nodes at edge midpoints
//! - Quadratic shape functions in the local coordinates (r, s, t)
//!
//! Node 0 is the anchor corner, carried by the implicit coordinate
//! L0 = 1 - r - s - t.
//!
//! # Node Numbering
//!
//! ```text
//!              3
//!             /|\
//!            / | \
//!           7  |  9
//!          /   8   \
//!         /    |    \
//!        0-----6-----2
//!         \    |    /
//!          4   |   5
//!           \  |  /
//!            \ | /
//!              1
//!
//! Vertices (r, s, t):
//!   Node 0: (0, 0, 0)
//!   Node 1: (1, 0, 0)
//!   Node 2: (0, 1, 0)
//!   Node 3: (0, 0, 1)
//!
//! Edge midpoints:
//!   Node 4: edge 0-1
//!   Node 5: edge 1-2
//!   Node 6: edge 0-2
//!   Node 7: edge 0-3
//!   Node 8: edge 1-3
//!   Node 9: edge 2-3
//! ```

use crate::types::LocalCoords;

/// 10-node tetrahedral element (quadratic tetrahedron).
#[derive(Debug, Clone, Copy, Default)]
pub struct Tet10;

impl Tet10 {
    /// Number of nodes (and shape functions).
    pub const N_NODES: usize = 10;

    /// Number of local axes.
    pub const N_AXES: usize = 3;

    /// Local coordinates of every node, in local numbering.
    pub const NODE_COORDS: [LocalCoords; 10] = [
        LocalCoords::new(0.0, 0.0, 0.0),
        LocalCoords::new(1.0, 0.0, 0.0),
        LocalCoords::new(0.0, 1.0, 0.0),
        LocalCoords::new(0.0, 0.0, 1.0),
        LocalCoords::new(0.5, 0.0, 0.0),
        LocalCoords::new(0.5, 0.5, 0.0),
        LocalCoords::new(0.0, 0.5, 0.0),
        LocalCoords::new(0.0, 0.0, 0.5),
        LocalCoords::new(0.5, 0.0, 0.5),
        LocalCoords::new(0.0, 0.5, 0.5),
    ];

    /// Value of shape function `node` at (r, s, t).
    ///
    /// Returns 0.0 for a node index outside 0..10.
    pub fn shape(node: usize, r: f64, s: f64, t: f64) -> f64 {
        let l0 = 1.0 - r - s - t;
        match node {
            0 => (2.0 * l0 - 1.0) * l0,
            1 => (2.0 * r - 1.0) * r,
            2 => (2.0 * s - 1.0) * s,
            3 => (2.0 * t - 1.0) * t,
            4 => 4.0 * r * l0,
            5 => 4.0 * r * s,
            6 => 4.0 * s * l0,
            7 => 4.0 * t * l0,
            8 => 4.0 * r * t,
            9 => 4.0 * s * t,
            _ => 0.0,
        }
    }

    /// Derivative of shape function `node` with respect to local axis
    /// `axis` (0 = r, 1 = s, 2 = t) at (r, s, t).
    ///
    /// Returns 0.0 for a node index outside 0..10 or an axis outside 0..3.
    pub fn shape_derivative(node: usize, axis: usize, r: f64, s: f64, t: f64) -> f64 {
        match axis {
            0 => Self::d_dr(node, r, s, t),
            1 => Self::d_ds(node, r, s, t),
            2 => Self::d_dt(node, r, s, t),
            _ => 0.0,
        }
    }

    fn d_dr(node: usize, r: f64, s: f64, t: f64) -> f64 {
        match node {
            0 => 4.0 * (r + s + t) - 3.0,
            1 => 4.0 * r - 1.0,
            4 => 4.0 - 8.0 * r - 4.0 * s - 4.0 * t,
            5 => 4.0 * s,
            6 => -4.0 * s,
            7 => -4.0 * t,
            8 => 4.0 * t,
            _ => 0.0,
        }
    }

    fn d_ds(node: usize, r: f64, s: f64, t: f64) -> f64 {
        match node {
            0 => 4.0 * (r + s + t) - 3.0,
            2 => 4.0 * s - 1.0,
            4 => -4.0 * r,
            5 => 4.0 * r,
            6 => 4.0 - 4.0 * r - 8.0 * s - 4.0 * t,
            7 => -4.0 * t,
            9 => 4.0 * t,
            _ => 0.0,
        }
    }

    fn d_dt(node: usize, r: f64, s: f64, t: f64) -> f64 {
        match node {
            0 => 4.0 * (r + s + t) - 3.0,
            3 => 4.0 * t - 1.0,
            4 => -4.0 * r,
            6 => -4.0 * s,
            7 => 4.0 - 4.0 * r - 4.0 * s - 8.0 * t,
            8 => 4.0 * r,
            9 => 4.0 * s,
            _ => 0.0,
        }
    }
}
