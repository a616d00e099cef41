//! Geometry data structure.
//!
//! Stores nodal coordinates and element connectivity. Every element is an
//! ordered tuple of node indices whose order defines the element's local
//! node numbering.

use crate::error::{Error, Result};
use crate::types::Point3;

/// Nodal coordinates plus element connectivity for a single element kind.
#[derive(Debug, Clone)]
pub struct Geometry {
    /// Nodes per element; every connectivity tuple has this length.
    nodes_per_element: usize,
    /// Nodal coordinates.
    nodes: Vec<Point3>,
    /// Element connectivity (0-based node indices).
    elements: Vec<Vec<usize>>,
}

impl Geometry {
    /// Create an empty geometry for elements with `nodes_per_element` nodes.
    pub fn new(nodes_per_element: usize) -> Self {
        Self {
            nodes_per_element,
            nodes: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Create a geometry with pre-allocated capacity.
    pub fn with_capacity(nodes_per_element: usize, n_nodes: usize, n_elements: usize) -> Self {
        Self {
            nodes_per_element,
            nodes: Vec::with_capacity(n_nodes),
            elements: Vec::with_capacity(n_elements),
        }
    }

    /// Add a node, returning its index.
    pub fn add_node(&mut self, point: Point3) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(point);
        idx
    }

    /// Add multiple nodes at once.
    pub fn add_nodes(&mut self, points: impl IntoIterator<Item = Point3>) {
        self.nodes.extend(points);
    }

    /// Add an element, returning its index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Mesh`] if the tuple has the wrong length or
    /// references a node that does not exist.
    pub fn add_element(&mut self, nodes: Vec<usize>) -> Result<usize> {
        if nodes.len() != self.nodes_per_element {
            return Err(Error::Mesh(format!(
                "element {} requires {} nodes, got {}",
                self.elements.len(),
                self.nodes_per_element,
                nodes.len()
            )));
        }

        for &node_idx in &nodes {
            if node_idx >= self.nodes.len() {
                return Err(Error::Mesh(format!(
                    "element {}: node index {} out of bounds (geometry has {} nodes)",
                    self.elements.len(),
                    node_idx,
                    self.nodes.len()
                )));
            }
        }

        let idx = self.elements.len();
        self.elements.push(nodes);
        Ok(idx)
    }

    pub fn nodes_per_element(&self) -> usize {
        self.nodes_per_element
    }

    /// Number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements.
    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    /// Nodal coordinates.
    pub fn nodes(&self) -> &[Point3] {
        &self.nodes
    }

    /// A specific node's coordinates.
    pub fn node(&self, idx: usize) -> Option<&Point3> {
        self.nodes.get(idx)
    }

    /// Connectivity of a specific element.
    pub fn connectivity(&self, idx: usize) -> Option<&[usize]> {
        self.elements.get(idx).map(Vec::as_slice)
    }

    /// Borrowed view of element `idx` for coordinate lookup.
    pub fn element(&self, idx: usize) -> Option<ElementView<'_>> {
        let connectivity = self.elements.get(idx)?;
        Some(ElementView {
            index: idx,
            nodes: &self.nodes,
            connectivity,
        })
    }

    /// Iterator over views of every element.
    pub fn elements(&self) -> impl ExactSizeIterator<Item = ElementView<'_>> + '_ {
        self.elements
            .iter()
            .enumerate()
            .map(move |(index, connectivity)| ElementView {
                index,
                nodes: &self.nodes,
                connectivity,
            })
    }

    /// Bounding box of all nodes.
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        let (first, rest) = self.nodes.split_first()?;
        Some(rest.iter().fold((*first, *first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        }))
    }
}

/// Read-only view of a single element within a [`Geometry`].
#[derive(Debug, Clone, Copy)]
pub struct ElementView<'a> {
    index: usize,
    nodes: &'a [Point3],
    connectivity: &'a [usize],
}

impl<'a> ElementView<'a> {
    /// Element index within the geometry.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Global node indices in local order.
    pub fn connectivity(&self) -> &'a [usize] {
        self.connectivity
    }

    pub fn n_nodes(&self) -> usize {
        self.connectivity.len()
    }

    /// Coordinates of the `local`-th node.
    #[inline]
    pub fn node(&self, local: usize) -> &'a Point3 {
        &self.nodes[self.connectivity[local]]
    }

    /// Global coordinate `axis` of the `local`-th node.
    #[inline]
    pub fn node_coord(&self, local: usize, axis: usize) -> f64 {
        self.node(local)[axis]
    }

    /// Global degree-of-freedom indices, node-major.
    pub fn dof_indices(&self, dofs_per_node: usize) -> Vec<usize> {
        self.connectivity
            .iter()
            .flat_map(|&node| (0..dofs_per_node).map(move |d| node * dofs_per_node + d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn four_nodes() -> Geometry {
        let mut geometry = Geometry::new(4);
        geometry.add_node(Vector3::new(0.0, 0.0, 0.0));
        geometry.add_node(Vector3::new(1.0, 0.0, 0.0));
        geometry.add_node(Vector3::new(0.0, 1.0, 0.0));
        geometry.add_node(Vector3::new(0.0, 0.0, 1.0));
        geometry
    }

    #[test]
    fn test_geometry_creation() {
        let mut geometry = four_nodes();
        assert_eq!(geometry.n_nodes(), 4);

        geometry.add_element(vec![0, 1, 2, 3]).unwrap();
        assert_eq!(geometry.n_elements(), 1);
        assert_eq!(geometry.connectivity(0), Some(&[0, 1, 2, 3][..]));
    }

    #[test]
    fn test_invalid_element_node_count() {
        let mut geometry = four_nodes();
        let result = geometry.add_element(vec![0, 1, 2]);
        assert!(matches!(result, Err(Error::Mesh(_))));
    }

    #[test]
    fn test_invalid_node_index() {
        let mut geometry = four_nodes();
        let result = geometry.add_element(vec![0, 1, 2, 4]);
        assert!(matches!(result, Err(Error::Mesh(_))));
        assert_eq!(geometry.n_elements(), 0);
    }

    #[test]
    fn test_element_view_lookup() {
        let mut geometry = four_nodes();
        geometry.add_element(vec![3, 2, 1, 0]).unwrap();
        let element = geometry.element(0).unwrap();
        assert_eq!(element.index(), 0);
        assert_eq!(element.n_nodes(), 4);
        assert_eq!(element.node_coord(0, 2), 1.0);
        assert_eq!(element.node_coord(2, 0), 1.0);
        assert_eq!(element.dof_indices(3), vec![9, 10, 11, 6, 7, 8, 3, 4, 5, 0, 1, 2]);
        assert!(geometry.element(1).is_none());
    }

    #[test]
    fn test_bounds() {
        let mut geometry = Geometry::new(4);
        geometry.add_node(Vector3::new(-1.0, -2.0, -3.0));
        geometry.add_node(Vector3::new(1.0, 2.0, 3.0));
        geometry.add_node(Vector3::new(0.0, 0.0, 0.0));

        let (min, max) = geometry.bounds().unwrap();
        assert_eq!(min, Vector3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Vector3::new(1.0, 2.0, 3.0));
        assert!(Geometry::new(4).bounds().is_none());
    }
}
