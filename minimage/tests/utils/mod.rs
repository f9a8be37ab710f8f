#![allow(dead_code)]

use minimage::{BoxParameters, SimulationBox, Vector3D};

/// Boxes with tilt factors several times larger than the box lengths
pub fn strongly_tilted_cells() -> Vec<SimulationBox> {
    vec![
        SimulationBox::new(BoxParameters::Edges {
            lx: 1.0, ly: 1.0, lz: 1.0,
            xy: 3.7, xz: 2.2, yz: -4.1,
            origin: Vector3D::zero(),
        }).unwrap(),
        SimulationBox::new(BoxParameters::Bounds {
            xlo: -1.0, xhi: 4.0,
            ylo: 0.0, yhi: 4.0,
            zlo: 1.0, zhi: 5.0,
            xy: 11.0, xz: -7.0, yz: 9.0,
        }).unwrap(),
    ]
}

/// Shortest distance between `p0` and all the periodic images of `p1`,
/// by enumeration of every lattice shift that could give a shorter image
/// than a first guess.
///
/// The first guess is the shortest image close to the one with fractional
/// coordinates in [-0.5, 0.5]. An image shorter than this guess has a
/// fractional coordinate smaller than `guess / d` along an axis with
/// distance `d` between faces, which bounds the shifts to consider.
pub fn minimum_image_distance(cell: &SimulationBox, p0: Vector3D, p1: Vector3D) -> f64 {
    let pbc = cell.pbc();
    let mut fractional = cell.vector_to_fractional(p1 - p0);
    for i in 0..3 {
        if pbc[i] {
            fractional[i] -= fractional[i].round();
        }
    }
    let base = cell.vector_to_cartesian(fractional);

    let image_length = |n: [i64; 3]| -> f64 {
        let shift = Vector3D::new(n[0] as f64, n[1] as f64, n[2] as f64);
        (base + cell.vector_to_cartesian(shift)).norm()
    };

    let axis_range = |i: usize, n: i64| if pbc[i] { -n..=n } else { 0..=0 };

    let mut guess = f64::INFINITY;
    for i in axis_range(0, 1) {
        for j in axis_range(1, 1) {
            for k in axis_range(2, 1) {
                guess = f64::min(guess, image_length([i, j, k]));
            }
        }
    }

    let faces = cell.distances_between_faces();
    let extent = |i: usize| f64::ceil(guess / faces[i]) as i64 + 1;

    let mut best = guess;
    for i in axis_range(0, extent(0)) {
        for j in axis_range(1, extent(1)) {
            for k in axis_range(2, extent(2)) {
                best = f64::min(best, image_length([i, j, k]));
            }
        }
    }
    return best;
}
