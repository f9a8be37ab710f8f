//! Minimum image displacements between points in a `SimulationBox`.
use crate::{Error, Matrix3, Vector3D};
use crate::errors::check_index;

use super::{CellShape, SimulationBox};

/// Geometric operations using periodic boundary conditions
impl SimulationBox {
    /// Get the displacement `p1 - p0` following the minimum image convention:
    /// among all the images of `p1` obtained by lattice translations along
    /// the periodic axes, the closest to `p0` is used. Non-periodic axes keep
    /// the raw difference.
    pub fn dvect(&self, p0: Vector3D, p1: Vector3D) -> Vector3D {
        let mut vector = p1 - p0;
        let pbc = self.pbc();
        if !self.is_periodic() {
            return vector;
        }

        if self.shape() == CellShape::Orthorhombic {
            let lengths = self.vects();
            for i in 0..3 {
                if pbc[i] {
                    let length = lengths[i][i];
                    vector[i] -= f64::round(vector[i] / length) * length;
                }
            }
            return vector;
        }

        if self.is_orthogonal() {
            let mut fractional = self.vector_to_fractional(vector);
            for i in 0..3 {
                if pbc[i] {
                    fractional[i] -= f64::round(fractional[i]);
                }
            }
            return self.vector_to_cartesian(fractional);
        }

        // in skewed cells, the image inside [-0.5, 0.5] in fractional
        // coordinates is not always the shortest one
        return self.periodic_lattice().minimal_image(vector);
    }

    /// Get the distance between `p0` and `p1` following the minimum image
    /// convention. This is the norm of [`SimulationBox::dvect`].
    pub fn dmag(&self, p0: Vector3D, p1: Vector3D) -> f64 {
        self.dvect(p0, p1).norm()
    }
}

/// Lovász condition parameter for the basis reduction
const LOVASZ_FACTOR: f64 = 0.75;
/// Upper bound on the number of iterations of the basis reduction
const MAX_REDUCTION_STEPS: usize = 1000;

/// The lattice of translations along the periodic axes of a box, stored with a
/// reduced basis to search for minimal images in skewed boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PeriodicLattice {
    /// LLL-reduced basis vectors, only the first `size` are used
    vectors: [Vector3D; 3],
    /// Dual basis of `vectors` in the space they span: `dual[i] * vectors[j]`
    /// is 1 if `i == j` and 0 otherwise
    dual: [Vector3D; 3],
    /// Number of periodic axes
    size: usize,
}

impl PeriodicLattice {
    /// Create the lattice generated by the rows of `matrix` along the axes
    /// where `pbc` is true
    pub(crate) fn new(matrix: &Matrix3, pbc: [bool; 3]) -> PeriodicLattice {
        let mut basis = (0..3).filter(|&i| pbc[i]).map(|i| matrix.row(i)).collect::<Vec<_>>();
        lll_reduce(&mut basis);
        let size = basis.len();

        // unused entries are left as identity to keep the matrix invertible
        let mut gram = Matrix3::one();
        for i in 0..size {
            for j in 0..size {
                gram[i][j] = basis[i] * basis[j];
            }
        }
        let gram_inverse = gram.inverse();

        let mut vectors = [Vector3D::zero(); 3];
        let mut dual = [Vector3D::zero(); 3];
        for j in 0..size {
            vectors[j] = basis[j];
            for i in 0..size {
                dual[j] += gram_inverse[j][i] * basis[i];
            }
        }

        return PeriodicLattice { vectors, dual, size };
    }

    /// Get the shortest vector among `vector` and all its translations by
    /// this lattice.
    ///
    /// The result is exactly `-minimal_image(-vector)`, unless two different
    /// images are exactly as short.
    pub(crate) fn minimal_image(&self, vector: Vector3D) -> Vector3D {
        let mut reduced = vector;
        let mut remainders = [0.0; 3];
        for j in 0..self.size {
            let coefficient = self.dual[j] * vector;
            let rounded = f64::round(coefficient);
            remainders[j] = coefficient - rounded;
            reduced -= rounded * self.vectors[j];
        }

        // an image shorter than `reduced` has a coefficient along vectors[j]
        // smaller than |reduced| * |dual[j]| in absolute value
        let radius = reduced.norm();
        let mut ranges = [(0_i64, 0_i64); 3];
        for j in 0..self.size {
            let extent = radius * self.dual[j].norm();
            ranges[j] = (
                f64::ceil(-extent - remainders[j]) as i64,
                f64::floor(extent - remainders[j]) as i64,
            );
        }

        let mut best = reduced;
        let mut best_distance2 = reduced.norm2();
        for i in ranges[0].0..=ranges[0].1 {
            for j in ranges[1].0..=ranges[1].1 {
                for k in ranges[2].0..=ranges[2].1 {
                    if i == 0 && j == 0 && k == 0 {
                        continue;
                    }

                    let image = reduced
                        + self.vectors[0] * i as f64
                        + self.vectors[1] * j as f64
                        + self.vectors[2] * k as f64;
                    let distance2 = image.norm2();
                    if distance2 < best_distance2 {
                        best = image;
                        best_distance2 = distance2;
                    }
                }
            }
        }

        return best;
    }
}

/// Reduce `basis` in place with the Lenstra-Lenstra-Lovász algorithm. The
/// reduced basis generates the same lattice, with short and nearly
/// orthogonal vectors.
fn lll_reduce(basis: &mut [Vector3D]) {
    let size = basis.len();
    let mut k = 1;
    let mut steps = 0;
    while k < size && steps < MAX_REDUCTION_STEPS {
        steps += 1;

        let orthogonal = gram_schmidt(basis);
        for j in (0..k).rev() {
            let mu = (basis[k] * orthogonal[j]) / orthogonal[j].norm2();
            let rounded = f64::round(mu);
            if rounded != 0.0 {
                let shift = rounded * basis[j];
                basis[k] -= shift;
            }
        }

        let orthogonal = gram_schmidt(basis);
        let mu = (basis[k] * orthogonal[k - 1]) / orthogonal[k - 1].norm2();
        if orthogonal[k].norm2() >= (LOVASZ_FACTOR - mu * mu) * orthogonal[k - 1].norm2() {
            k += 1;
        } else {
            basis.swap(k, k - 1);
            k = usize::max(k - 1, 1);
        }
    }
}

/// Gram-Schmidt orthogonalization of `basis`, without normalization
fn gram_schmidt(basis: &[Vector3D]) -> Vec<Vector3D> {
    let mut orthogonal: Vec<Vector3D> = Vec::with_capacity(basis.len());
    for &vector in basis {
        let mut projected = vector;
        for previous in &orthogonal {
            projected -= (vector * previous) / previous.norm2() * previous;
        }
        orthogonal.push(projected);
    }
    return orthogonal;
}

/// A set of points used as input for the minimum image displacements, either
/// given directly as Cartesian positions or as atom indices into a separate
/// array of positions.
#[derive(Debug, Clone, Copy)]
pub enum PointSet<'a> {
    /// A single point
    Point(Vector3D),
    /// Multiple points
    Points(&'a [Vector3D]),
    /// A single atom, identified by its index
    Atom(usize),
    /// Multiple atoms, identified by their indices
    Atoms(&'a [usize]),
}

impl<'a> PointSet<'a> {
    /// Number of points in this set
    pub fn len(&self) -> usize {
        match self {
            PointSet::Point(_) | PointSet::Atom(_) => 1,
            PointSet::Points(points) => points.len(),
            PointSet::Atoms(atoms) => atoms.len(),
        }
    }

    /// Is this set empty?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the Cartesian positions of the points in this set, resolving atom
    /// indices with `positions`.
    fn resolve(&self, positions: Option<&[Vector3D]>) -> Result<Vec<Vector3D>, Error> {
        let atom_position = |atom: usize| -> Result<Vector3D, Error> {
            let positions = positions.ok_or_else(|| Error::InvalidParameter(
                "atom indices can only be used together with an array of positions".into()
            ))?;
            check_index(atom, positions.len())?;
            Ok(positions[atom])
        };

        match *self {
            PointSet::Point(point) => Ok(vec![point]),
            PointSet::Points(points) => Ok(points.to_vec()),
            PointSet::Atom(atom) => Ok(vec![atom_position(atom)?]),
            PointSet::Atoms(atoms) => atoms.iter().map(|&atom| atom_position(atom)).collect(),
        }
    }
}

impl From<Vector3D> for PointSet<'_> {
    fn from(point: Vector3D) -> Self {
        PointSet::Point(point)
    }
}

impl<'a> From<&'a [Vector3D]> for PointSet<'a> {
    fn from(points: &'a [Vector3D]) -> Self {
        PointSet::Points(points)
    }
}

impl<'a> From<&'a [usize]> for PointSet<'a> {
    fn from(atoms: &'a [usize]) -> Self {
        PointSet::Atoms(atoms)
    }
}

/// Get the minimum image displacements `p1 - p0` between two sets of points
/// in `cell`.
///
/// If one of the sets contains a single point, it is paired with every
/// point of the other set. Otherwise, both sets must have the same size and
/// points are paired by position. Atom indices are resolved with
/// `positions`.
pub fn dvect(
    cell: &SimulationBox,
    p0: PointSet<'_>,
    p1: PointSet<'_>,
    positions: Option<&[Vector3D]>,
) -> Result<Vec<Vector3D>, Error> {
    let first = p0.resolve(positions)?;
    let second = p1.resolve(positions)?;

    let result = match (first.len(), second.len()) {
        (1, _) => second.iter().map(|&point| cell.dvect(first[0], point)).collect(),
        (_, 1) => first.iter().map(|&point| cell.dvect(point, second[0])).collect(),
        (n0, n1) if n0 == n1 => {
            first.iter().zip(&second).map(|(&a, &b)| cell.dvect(a, b)).collect()
        }
        (n0, n1) => {
            return Err(Error::InvalidParameter(format!(
                "can not pair {} points with {} points: the sizes must match, \
                or one side must contain a single point", n0, n1
            )));
        }
    };

    return Ok(result);
}

/// Get the minimum image distances between two sets of points in `cell`.
/// This follows the same pairing rules as [`dvect`].
pub fn dmag(
    cell: &SimulationBox,
    p0: PointSet<'_>,
    p1: PointSet<'_>,
    positions: Option<&[Vector3D]>,
) -> Result<Vec<f64>, Error> {
    let vectors = dvect(cell, p0, p1, positions)?;
    Ok(vectors.iter().map(Vector3D::norm).collect())
}
