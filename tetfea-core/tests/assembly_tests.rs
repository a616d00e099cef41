use std::path::PathBuf;

use approx::assert_relative_eq;
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use tetfea_core::{
    AssemblyOptions, BoundaryConditions, Geometry, LinearElastic, MaterialModel, Point3, Problem,
    Solver, TaskConfig,
};

/// Midside node pairs, local numbering.
const EDGES: [(usize, usize); 6] = [(0, 1), (1, 2), (0, 2), (0, 3), (1, 3), (2, 3)];

fn demo_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../demos/unit_tet10.json")
}

fn find_or_add(geometry: &mut Geometry, p: Point3) -> usize {
    match geometry.nodes().iter().position(|q| (q - p).norm() < 1e-12) {
        Some(idx) => idx,
        None => geometry.add_node(p),
    }
}

/// Add a straight-sided tet10 from four corners, sharing coincident nodes.
fn add_tet10(geometry: &mut Geometry, corners: [Point3; 4]) {
    let mut connectivity: Vec<usize> = corners.iter().map(|&c| find_or_add(geometry, c)).collect();
    for (a, b) in EDGES {
        let mid = (corners[a] + corners[b]) * 0.5;
        connectivity.push(find_or_add(geometry, mid));
    }
    geometry.add_element(connectivity).unwrap();
}

fn two_tet_geometry() -> Geometry {
    let o = Point3::new(0.0, 0.0, 0.0);
    let x = Point3::new(1.0, 0.0, 0.0);
    let y = Point3::new(0.0, 1.0, 0.0);
    let z = Point3::new(0.0, 0.0, 1.0);
    let w = Point3::new(1.0, 1.0, 1.0);
    let mut geometry = Geometry::new(10);
    add_tet10(&mut geometry, [o, x, y, z]);
    add_tet10(&mut geometry, [w, y, x, z]);
    geometry
}

fn config(points: usize) -> TaskConfig {
    TaskConfig {
        material: MaterialModel::LinearElastic(LinearElastic::new(100.0, 100.0).unwrap()),
        quadrature_points: points,
        ..TaskConfig::default()
    }
}

#[test]
fn demo_problem_assembles_symmetric_psd_matrix() {
    let problem = Problem::load(demo_path()).unwrap();
    let solver = Solver::new(problem.config, &problem.geometry, &problem.boundary).unwrap();
    let k = solver.assemble(0).unwrap().into_parts().0;
    assert_eq!(k.shape(), (30, 30));

    let k_max = k.amax();
    assert!((&k - k.transpose()).amax() <= k_max * 1e-12);

    let eigen = SymmetricEigen::new(k.clone());
    let tol = k_max * 1e-8;
    assert!(eigen.eigenvalues.iter().all(|&v| v > -tol), "negative eigenvalue");
    // Six rigid-body modes, every other mode carries strain energy.
    let zero_modes = eigen.eigenvalues.iter().filter(|v| v.abs() <= tol).count();
    assert_eq!(zero_modes, 6);

    let u = DVector::from_fn(30, |p, _| if p % 3 == 1 { 0.25 } else { 0.0 });
    assert_relative_eq!((&k * u).norm(), 0.0, epsilon = 1e-10);
}

#[test]
fn four_and_five_point_rules_agree_on_straight_elements() {
    let geometry = two_tet_geometry();
    let bcs = BoundaryConditions::new();
    let four = Solver::new(config(4), &geometry, &bcs).unwrap();
    let five = Solver::new(config(5), &geometry, &bcs).unwrap();
    for e in 0..geometry.n_elements() {
        let k4 = four.assemble(e).unwrap().into_parts().0;
        let k5 = five.assemble(e).unwrap().into_parts().0;
        assert_relative_eq!(k4, k5, epsilon = 1e-9 * k4.amax());
    }
}

#[test]
fn scattered_global_matrix_has_rigid_modes() {
    let geometry = two_tet_geometry();
    // 14 shared-corner/midside nodes: 10 + 10 - 6 on the common face.
    assert_eq!(geometry.n_nodes(), 14);

    let bcs = BoundaryConditions::new();
    let solver = Solver::new(config(5), &geometry, &bcs).unwrap();
    let n = solver.sizing().system_size;
    assert_eq!(n, 42);

    let report = solver.assemble_all(&AssemblyOptions::default()).unwrap();
    assert!(report.is_clean());

    let mut k = DMatrix::<f64>::zeros(n, n);
    for element in &report.elements {
        for (i, j, v) in element.entries() {
            k[(i, j)] += v;
        }
    }
    assert!((&k - k.transpose()).amax() <= k.amax() * 1e-12);

    let nodes = geometry.nodes();
    let rotation = DVector::from_fn(n, |p, _| {
        let x = nodes[p / 3];
        // u = ω × x with ω = (1, 2, 3)
        match p % 3 {
            0 => 2.0 * x.z - 3.0 * x.y,
            1 => 3.0 * x.x - x.z,
            _ => x.y - 2.0 * x.x,
        }
    });
    assert_relative_eq!((&k * rotation).norm(), 0.0, epsilon = 1e-9);

    let total: f64 = (0..geometry.n_elements())
        .map(|e| solver.element_volume(e).unwrap())
        .sum();
    assert_relative_eq!(total, 0.5, epsilon = 1e-12);
}

#[test]
fn boundary_conditions_pass_through_untouched() {
    let problem = Problem::load(demo_path()).unwrap();
    let solver = Solver::new(problem.config.clone(), &problem.geometry, &problem.boundary).unwrap();
    assert_eq!(solver.boundary_conditions(), &problem.boundary);
    let constrained = solver.boundary_conditions().constrained_dofs(3);
    assert_eq!(constrained.len(), 3 + 2 + 1 + 1);
    assert_eq!(constrained.last(), Some(&(11, -0.01)));
}
