use approx::{assert_relative_eq, assert_ulps_eq};
use rand::prelude::*;

use minimage::{BoxParameters, Matrix3, SimulationBox, Vector3D};
use minimage::systems::PointSet;
use minimage::systems::distance::{dmag, dvect};

mod utils;
use utils::{minimum_image_distance, strongly_tilted_cells};

fn random_cells() -> Vec<SimulationBox> {
    let mut cells = vec![
        SimulationBox::cubic(8.0).unwrap(),
        SimulationBox::orthorhombic(6.0, 9.0, 11.0).unwrap(),
        SimulationBox::triclinic(7.0, 8.0, 9.0, 75.0, 100.0, 115.0).unwrap(),
        SimulationBox::new(BoxParameters::Edges {
            lx: 10.0, ly: 8.0, lz: 9.0,
            xy: 2.5, xz: -3.0, yz: 1.5,
            origin: Vector3D::new(-1.0, 2.0, 0.5),
        }).unwrap(),
        SimulationBox::from_matrix(Matrix3::new([
            [0.0, 3.5, 3.5],
            [3.5, 0.0, 3.5],
            [3.5, 3.5, 0.0],
        ])).unwrap(),
    ];
    cells.extend(strongly_tilted_cells());
    return cells;
}

/// Random points inside `cell`
fn random_points(cell: &SimulationBox, rng: &mut StdRng, count: usize) -> Vec<Vector3D> {
    (0..count).map(|_| {
        let fractional = Vector3D::new(rng.gen(), rng.gen(), rng.gen());
        cell.fractional_to_cartesian(fractional)
    }).collect()
}

#[test]
fn antisymmetry() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for cell in random_cells() {
        let points = random_points(&cell, &mut rng, 30);
        for &p0 in &points {
            for &p1 in &points {
                let forward = cell.dvect(p0, p1);
                let backward = cell.dvect(p1, p0);
                assert_eq!(forward.norm2(), backward.norm2());
                assert_relative_eq!(forward, -backward, epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn never_longer_than_raw_difference() {
    let mut rng = StdRng::seed_from_u64(42);
    for cell in random_cells() {
        for pbc in [[true, true, true], [true, false, true], [false, true, false]] {
            let cell = cell.with_pbc(pbc);
            let points = random_points(&cell, &mut rng, 20);
            for &p0 in &points {
                for &p1 in &points {
                    let raw = (p1 - p0).norm();
                    assert!(cell.dmag(p0, p1) <= raw + 1e-12);
                }
            }
        }
    }
}

#[test]
fn shortest_image() {
    let mut rng = StdRng::seed_from_u64(0xcafe);
    for cell in random_cells() {
        for pbc in [[true, true, true], [true, true, false], [false, true, true], [true, false, false]] {
            let cell = cell.with_pbc(pbc);
            let points = random_points(&cell, &mut rng, 12);
            for &p0 in &points {
                for &p1 in &points {
                    let expected = minimum_image_distance(&cell, p0, p1);
                    assert_relative_eq!(cell.dmag(p0, p1), expected, epsilon = 1e-12, max_relative = 1e-10);
                }
            }
        }
    }
}

#[test]
fn strongly_tilted_box() {
    let cell = strongly_tilted_cells()[0];
    let p0 = cell.fractional_to_cartesian(Vector3D::new(0.2, 0.7, 0.4));

    // the image with all fractional coordinates in [-0.5, 0.5] is at 2.1
    let p1 = p0 + cell.fractional_to_cartesian(Vector3D::new(0.33, -0.615, 0.15));
    assert_relative_eq!(cell.dvect(p0, p1), Vector3D::new(0.0845, -0.23, 0.15), epsilon = 1e-12);
    assert_relative_eq!(cell.dvect(p1, p0), Vector3D::new(-0.0845, 0.23, -0.15), epsilon = 1e-12);

    // shifting along the non-periodic axis is no longer allowed
    let cell = cell.with_pbc([true, true, false]);
    let expected = minimum_image_distance(&cell, p0, p1);
    assert_relative_eq!(cell.dmag(p0, p1), expected, max_relative = 1e-12);
    assert_relative_eq!(cell.dvect(p0, p1)[2], 0.15, epsilon = 1e-12);
}

#[test]
fn differences_are_lattice_translations() {
    let mut rng = StdRng::seed_from_u64(1234);
    for cell in random_cells() {
        let points = random_points(&cell, &mut rng, 10);
        for &p0 in &points {
            for &p1 in &points {
                let shift = cell.vector_to_fractional(cell.dvect(p0, p1) - (p1 - p0));
                for i in 0..3 {
                    assert_relative_eq!(shift[i], shift[i].round(), epsilon = 1e-9);
                }
            }
        }
    }
}

#[test]
fn non_periodic() {
    let mut rng = StdRng::seed_from_u64(7);
    for cell in random_cells() {
        let cell = cell.with_pbc([false, false, false]);
        let points = random_points(&cell, &mut rng, 10);
        for &p0 in &points {
            // points far outside of the box
            let p1 = p0 + Vector3D::new(25.0, -40.0, 13.0);
            assert_eq!(cell.dvect(p0, p1), p1 - p0);
        }
    }
}

#[test]
fn face_diagonal() {
    let cell = SimulationBox::cubic(10.0).unwrap();
    let p0 = Vector3D::new(1.0, 1.0, 5.0);
    let p1 = Vector3D::new(9.0, 9.0, 5.0);

    assert_eq!(cell.dvect(p0, p1), Vector3D::new(-2.0, -2.0, 0.0));
    assert_ulps_eq!(cell.dmag(p0, p1), f64::sqrt(8.0));

    // only periodic along x
    let cell = cell.with_pbc([true, false, false]);
    assert_eq!(cell.dvect(p0, p1), Vector3D::new(-2.0, 8.0, 0.0));

    // half of the face diagonal in silicon
    let cell = SimulationBox::cubic(5.431).unwrap();
    let p1 = cell.fractional_to_cartesian(Vector3D::new(0.5, 0.5, 0.0));
    assert_relative_eq!(cell.dmag(Vector3D::zero(), p1), 5.431 * f64::sqrt(2.0) / 2.0, max_relative = 1e-12);
}

#[test]
fn point_sets() {
    let cell = SimulationBox::cubic(10.0).unwrap();
    let positions = [
        Vector3D::new(1.0, 1.0, 1.0),
        Vector3D::new(9.0, 1.0, 1.0),
        Vector3D::new(1.0, 6.0, 1.0),
    ];

    // one atom against all the others
    let distances = dmag(
        &cell,
        PointSet::Atom(0),
        PointSet::Atoms(&[1, 2]),
        Some(&positions[..]),
    ).unwrap();
    assert_eq!(distances, [2.0, 5.0]);

    // Cartesian points paired one by one
    let vectors = dvect(
        &cell,
        PointSet::from(&positions[..2]),
        PointSet::from(&positions[1..]),
        None,
    ).unwrap();
    assert_eq!(vectors, [Vector3D::new(-2.0, 0.0, 0.0), Vector3D::new(2.0, -5.0, 0.0)]);

    assert!(dvect(&cell, PointSet::Atoms(&[0, 1]), PointSet::Atoms(&[0, 1, 2]), Some(&positions[..])).is_err());
    assert!(dvect(&cell, PointSet::Atom(0), PointSet::Atom(1), None).is_err());
}
