//! The `SimulationBox` type represents the enclosing box of a simulated
//! system, with periodic boundary conditions along some of its axes.
use crate::{Error, Matrix3, Vector3D};
use super::BoxParameters;
use super::distance::PeriodicLattice;

/// Relative tolerance used to decide if a lattice is degenerate
const DEGENERATE_TOLERANCE: f64 = 1e-10;

/// Tolerance (relative to the longest cell vector) used when checking if a box
/// is normalized or orthogonal
const SHAPE_TOLERANCE: f64 = 1e-8;

/// The shape of a box determines how we compute fractional coordinates and
/// minimal images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellShape {
    /// The cell vectors are aligned with the x, y and z axes
    Orthorhombic,
    /// Cell with arbitrary parallelepiped shape
    Triclinic,
}

/// A `SimulationBox` defines the physical boundaries of a system.
///
/// The box is made of three cell vectors `a`, `b` and `c`, an origin, and one
/// periodicity flag per cell vector. The box is immutable during any
/// geometric query: all queries take the box explicitly, and the only way to
/// change its geometry is [`SimulationBox::set`], which replaces all the
/// geometric data at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationBox {
    /// Cell matrix, with one cell vector per row
    matrix: Matrix3,
    /// Transpose of the cell matrix, cached from matrix
    transpose: Matrix3,
    /// Inverse of the transpose of the cell matrix, cached from matrix
    inverse: Matrix3,
    /// Position of the box origin
    origin: Vector3D,
    /// Periodic boundary conditions along `a`, `b` and `c`
    pbc: [bool; 3],
    /// Cell shape
    shape: CellShape,
    /// Are the cell vectors orthogonal to each other, regardless of their
    /// orientation?
    orthogonal: bool,
    /// Reduced basis of the translations along periodic axes, cached from
    /// matrix and pbc
    lattice: PeriodicLattice,
}

impl Default for SimulationBox {
    /// Get a fully periodic unit cube, with the origin at zero
    fn default() -> SimulationBox {
        SimulationBox {
            matrix: Matrix3::one(),
            transpose: Matrix3::one(),
            inverse: Matrix3::one(),
            origin: Vector3D::zero(),
            pbc: [true, true, true],
            shape: CellShape::Orthorhombic,
            orthogonal: true,
            lattice: PeriodicLattice::new(&Matrix3::one(), [true, true, true]),
        }
    }
}

impl SimulationBox {
    /// Create a new fully periodic box from the given `parameters`
    pub fn new(parameters: BoxParameters) -> Result<SimulationBox, Error> {
        let (matrix, origin) = match parameters {
            BoxParameters::Vectors { vects, origin } => (vects, origin),
            BoxParameters::Named { avect, bvect, cvect, origin } => {
                (Matrix3::new([avect.into(), bvect.into(), cvect.into()]), origin)
            }
            BoxParameters::Lengths { a, b, c, alpha, beta, gamma, origin } => {
                (lengths_and_angles_matrix(a, b, c, alpha, beta, gamma)?, origin)
            }
            BoxParameters::Bounds { xlo, xhi, ylo, yhi, zlo, zhi, xy, xz, yz } => {
                let lx = xhi - xlo;
                let ly = yhi - ylo;
                let lz = zhi - zlo;
                check_lengths("bounds", [lx, ly, lz])?;
                (tilted_matrix(lx, ly, lz, xy, xz, yz), Vector3D::new(xlo, ylo, zlo))
            }
            BoxParameters::Edges { lx, ly, lz, xy, xz, yz, origin } => {
                check_lengths("edge lengths", [lx, ly, lz])?;
                (tilted_matrix(lx, ly, lz, xy, xz, yz), origin)
            }
        };

        return SimulationBox::from_parts(matrix, origin, [true, true, true]);
    }

    /// Create a new fully periodic box from a cell matrix containing one cell
    /// vector per row, with the origin at zero.
    pub fn from_matrix(matrix: Matrix3) -> Result<SimulationBox, Error> {
        SimulationBox::from_parts(matrix, Vector3D::zero(), [true, true, true])
    }

    /// Create a fully periodic cubic box, with side lengths `length, length,
    /// length`.
    pub fn cubic(length: f64) -> Result<SimulationBox, Error> {
        SimulationBox::orthorhombic(length, length, length)
    }

    /// Create a fully periodic orthorhombic box, with side lengths `a, b, c`.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Result<SimulationBox, Error> {
        SimulationBox::new(BoxParameters::orthorhombic(a, b, c))
    }

    /// Create a fully periodic triclinic box, with side lengths `a, b, c` and
    /// angles `alpha, beta, gamma` in degrees.
    pub fn triclinic(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Result<SimulationBox, Error> {
        SimulationBox::new(BoxParameters::Lengths {
            a, b, c, alpha, beta, gamma,
            origin: Vector3D::zero(),
        })
    }

    fn from_parts(matrix: Matrix3, origin: Vector3D, pbc: [bool; 3]) -> Result<SimulationBox, Error> {
        if !matrix.is_finite() || !origin.is_finite() {
            return Err(Error::InvalidParameter(
                "box vectors and origin must be finite".into()
            ));
        }

        let (a, b, c) = (matrix.row(0), matrix.row(1), matrix.row(2));
        let scale = a.norm() * b.norm() * c.norm();
        let volume = a * (b ^ c);
        if scale == 0.0 || f64::abs(volume) <= DEGENERATE_TOLERANCE * scale {
            return Err(Error::DegenerateBox(format!(
                "the cell vectors are not linearly independent (volume is {})", volume
            )));
        }

        let tolerance = SHAPE_TOLERANCE * f64::max(a.norm(), f64::max(b.norm(), c.norm()));
        let is_close_0 = |value: f64| f64::abs(value) < tolerance;
        let orthogonal = is_close_0(a * b.normalized()) && is_close_0(a * c.normalized()) && is_close_0(b * c.normalized());

        let is_diagonal = matrix[0][1] == 0.0 && matrix[0][2] == 0.0 &&
                          matrix[1][0] == 0.0 && matrix[1][2] == 0.0 &&
                          matrix[2][0] == 0.0 && matrix[2][1] == 0.0;
        let shape = if is_diagonal {
            CellShape::Orthorhombic
        } else {
            CellShape::Triclinic
        };

        let transpose = matrix.transposed();
        return Ok(SimulationBox {
            matrix: matrix,
            transpose: transpose,
            inverse: transpose.inverse(),
            origin: origin,
            pbc: pbc,
            shape: shape,
            orthogonal: orthogonal,
            lattice: PeriodicLattice::new(&matrix, pbc),
        });
    }

    /// Replace the geometry of this box with the one defined by `parameters`.
    /// The periodic boundary conditions are kept. If the parameters are
    /// invalid, the box is left unchanged.
    pub fn set(&mut self, parameters: BoxParameters) -> Result<(), Error> {
        let pbc = self.pbc;
        *self = SimulationBox::new(parameters)?.with_pbc(pbc);
        return Ok(());
    }

    /// Get the periodic boundary conditions along the three cell vectors
    pub fn pbc(&self) -> [bool; 3] {
        self.pbc
    }

    /// Set the periodic boundary conditions along the three cell vectors
    pub fn set_pbc(&mut self, pbc: [bool; 3]) {
        self.pbc = pbc;
        self.lattice = PeriodicLattice::new(&self.matrix, pbc);
    }

    /// Get a copy of this box with different periodic boundary conditions
    #[must_use]
    pub fn with_pbc(mut self, pbc: [bool; 3]) -> SimulationBox {
        self.set_pbc(pbc);
        return self;
    }

    /// Is this box periodic along at least one cell vector?
    pub fn is_periodic(&self) -> bool {
        self.pbc.iter().any(|&periodic| periodic)
    }

    /// Get the cell shape
    pub fn shape(&self) -> CellShape {
        self.shape
    }

    /// Are the three cell vectors orthogonal to each other?
    pub fn is_orthogonal(&self) -> bool {
        self.orthogonal
    }

    pub(crate) fn periodic_lattice(&self) -> &PeriodicLattice {
        &self.lattice
    }

    /// Get the matrix representation of the box, with one cell vector per row
    pub fn vects(&self) -> Matrix3 {
        self.matrix
    }

    /// Get the position of the box origin
    pub fn origin(&self) -> Vector3D {
        self.origin
    }

    /// Get the first cell vector
    pub fn avect(&self) -> Vector3D {
        self.matrix.row(0)
    }

    /// Get the second cell vector
    pub fn bvect(&self) -> Vector3D {
        self.matrix.row(1)
    }

    /// Get the third cell vector
    pub fn cvect(&self) -> Vector3D {
        self.matrix.row(2)
    }

    /// Get the length of the first cell vector
    pub fn a(&self) -> f64 {
        self.avect().norm()
    }

    /// Get the length of the second cell vector
    pub fn b(&self) -> f64 {
        self.bvect().norm()
    }

    /// Get the length of the third cell vector
    pub fn c(&self) -> f64 {
        self.cvect().norm()
    }

    /// Get the angle between the `b` and `c` cell vectors, in degrees
    pub fn alpha(&self) -> f64 {
        match self.shape {
            CellShape::Triclinic => angle(self.bvect(), self.cvect()).to_degrees(),
            CellShape::Orthorhombic => 90.0,
        }
    }

    /// Get the angle between the `a` and `c` cell vectors, in degrees
    pub fn beta(&self) -> f64 {
        match self.shape {
            CellShape::Triclinic => angle(self.avect(), self.cvect()).to_degrees(),
            CellShape::Orthorhombic => 90.0,
        }
    }

    /// Get the angle between the `a` and `b` cell vectors, in degrees
    pub fn gamma(&self) -> f64 {
        match self.shape {
            CellShape::Triclinic => angle(self.avect(), self.bvect()).to_degrees(),
            CellShape::Orthorhombic => 90.0,
        }
    }

    /// Get the volume of the box, as the mixed product `a·(b×c)` of the cell
    /// vectors. This is negative for left-handed cell vectors.
    pub fn volume(&self) -> f64 {
        self.avect() * (self.bvect() ^ self.cvect())
    }

    /// Get the distances between opposite faces of the box
    pub fn distances_between_faces(&self) -> Vector3D {
        let (a, b, c) = (self.avect(), self.bvect(), self.cvect());
        // Plans normal vectors
        let na = (b ^ c).normalized();
        let nb = (c ^ a).normalized();
        let nc = (a ^ b).normalized();

        Vector3D::new(f64::abs(na * a), f64::abs(nb * b), f64::abs(nc * c))
    }
}

/// Axis-aligned representation of normalized boxes, following LAMMPS
/// conventions.
impl SimulationBox {
    /// Check if this box is normalized, i.e. if `a` is along the x axis, `b`
    /// is in the xy plane, and the cell vectors are right-handed. Only
    /// normalized boxes have an axis-aligned representation.
    pub fn is_normalized(&self) -> bool {
        let (a, b, c) = (self.avect(), self.bvect(), self.cvect());
        let tolerance = SHAPE_TOLERANCE * f64::max(a.norm(), f64::max(b.norm(), c.norm()));

        f64::abs(a[1]) < tolerance && f64::abs(a[2]) < tolerance && f64::abs(b[2]) < tolerance
            && a[0] > 0.0 && b[1] > 0.0 && c[2] > 0.0
    }

    fn check_normalized(&self, name: &str) -> Result<(), Error> {
        if self.is_normalized() {
            return Ok(());
        }

        return Err(Error::Precondition(format!(
            "'{}' is only defined for normalized boxes, where avect is along \
            the x axis, bvect is in the xy plane and the vectors are right-handed",
            name
        )));
    }

    /// Get the box length along the x axis
    pub fn lx(&self) -> Result<f64, Error> {
        self.check_normalized("lx")?;
        Ok(self.matrix[0][0])
    }

    /// Get the box length along the y axis
    pub fn ly(&self) -> Result<f64, Error> {
        self.check_normalized("ly")?;
        Ok(self.matrix[1][1])
    }

    /// Get the box length along the z axis
    pub fn lz(&self) -> Result<f64, Error> {
        self.check_normalized("lz")?;
        Ok(self.matrix[2][2])
    }

    /// Get the xy tilt factor, i.e. the x component of `b`
    pub fn xy(&self) -> Result<f64, Error> {
        self.check_normalized("xy")?;
        Ok(self.matrix[1][0])
    }

    /// Get the xz tilt factor, i.e. the x component of `c`
    pub fn xz(&self) -> Result<f64, Error> {
        self.check_normalized("xz")?;
        Ok(self.matrix[2][0])
    }

    /// Get the yz tilt factor, i.e. the y component of `c`
    pub fn yz(&self) -> Result<f64, Error> {
        self.check_normalized("yz")?;
        Ok(self.matrix[2][1])
    }

    /// Get the lower bound of the box along x, i.e. the x component of the origin
    pub fn xlo(&self) -> Result<f64, Error> {
        self.check_normalized("xlo")?;
        Ok(self.origin[0])
    }

    /// Get the upper bound of the box along x, i.e. `xlo + lx`
    pub fn xhi(&self) -> Result<f64, Error> {
        self.check_normalized("xhi")?;
        Ok(self.origin[0] + self.matrix[0][0])
    }

    /// Get the lower bound of the box along y, i.e. the y component of the origin
    pub fn ylo(&self) -> Result<f64, Error> {
        self.check_normalized("ylo")?;
        Ok(self.origin[1])
    }

    /// Get the upper bound of the box along y, i.e. `ylo + ly`
    pub fn yhi(&self) -> Result<f64, Error> {
        self.check_normalized("yhi")?;
        Ok(self.origin[1] + self.matrix[1][1])
    }

    /// Get the lower bound of the box along z, i.e. the z component of the origin
    pub fn zlo(&self) -> Result<f64, Error> {
        self.check_normalized("zlo")?;
        Ok(self.origin[2])
    }

    /// Get the upper bound of the box along z, i.e. `zlo + lz`
    pub fn zhi(&self) -> Result<f64, Error> {
        self.check_normalized("zhi")?;
        Ok(self.origin[2] + self.matrix[2][2])
    }
}

/// Conversions between Cartesian and fractional coordinates
impl SimulationBox {
    /// Get the fractional representation of the free `vector` in this box
    pub fn vector_to_fractional(&self, vector: Vector3D) -> Vector3D {
        match self.shape {
            CellShape::Orthorhombic => Vector3D::new(
                vector[0] / self.matrix[0][0],
                vector[1] / self.matrix[1][1],
                vector[2] / self.matrix[2][2],
            ),
            // this needs to use the inverse of the transpose of the matrix,
            // since we only have code to multiply a vector by a matrix on the
            // left
            CellShape::Triclinic => self.inverse * vector,
        }
    }

    /// Get the Cartesian representation of the free `fractional` vector in
    /// this box
    pub fn vector_to_cartesian(&self, fractional: Vector3D) -> Vector3D {
        match self.shape {
            CellShape::Orthorhombic => Vector3D::new(
                fractional[0] * self.matrix[0][0],
                fractional[1] * self.matrix[1][1],
                fractional[2] * self.matrix[2][2],
            ),
            CellShape::Triclinic => self.transpose * fractional,
        }
    }

    /// Get the fractional coordinates of `position` in this box, relative to
    /// the box origin
    pub fn cartesian_to_fractional(&self, position: Vector3D) -> Vector3D {
        self.vector_to_fractional(position - self.origin)
    }

    /// Get the Cartesian position corresponding to the `fractional`
    /// coordinates in this box
    pub fn fractional_to_cartesian(&self, fractional: Vector3D) -> Vector3D {
        self.vector_to_cartesian(fractional) + self.origin
    }

    /// Wrap a position inside the box, along the periodic directions only.
    /// Along these directions, the fractional coordinates of the result are
    /// in `[0, 1)`.
    pub fn wrap(&self, position: Vector3D) -> Vector3D {
        if !self.is_periodic() {
            return position;
        }

        match self.shape {
            CellShape::Orthorhombic => {
                let mut vector = position - self.origin;
                for i in 0..3 {
                    let length = self.matrix[i][i];
                    if self.pbc[i] {
                        vector[i] -= f64::floor(vector[i] / length) * length;
                        // small negative values can be rounded up to length
                        if vector[i] >= length {
                            vector[i] = 0.0;
                        }
                    }
                }
                return vector + self.origin;
            }
            CellShape::Triclinic => {
                let mut fractional = self.cartesian_to_fractional(position);
                for i in 0..3 {
                    if self.pbc[i] {
                        fractional[i] -= f64::floor(fractional[i]);
                        if fractional[i] >= 1.0 {
                            fractional[i] = 0.0;
                        }
                    }
                }
                return self.fractional_to_cartesian(fractional);
            }
        }
    }

    /// Check if `position` is inside this box. If `inclusive` is true, points
    /// exactly on the faces of the box are considered to be inside.
    pub fn inside(&self, position: Vector3D, inclusive: bool) -> bool {
        let fractional = self.cartesian_to_fractional(position);
        (0..3).all(|i| {
            if inclusive {
                fractional[i] >= 0.0 && fractional[i] <= 1.0
            } else {
                fractional[i] > 0.0 && fractional[i] < 1.0
            }
        })
    }
}

/// Get the angles between the vectors `u` and `v`.
fn angle(u: Vector3D, v: Vector3D) -> f64 {
    let un = u.normalized();
    let vn = v.normalized();
    f64::acos(f64::clamp(un * vn, -1.0, 1.0))
}

fn check_lengths(group: &str, lengths: [f64; 3]) -> Result<(), Error> {
    if lengths.iter().all(|&length| length > 0.0 && length.is_finite()) {
        return Ok(());
    }

    return Err(Error::InvalidParameter(format!(
        "box lengths must be positive, got {:?} from {}", lengths, group
    )));
}

/// Lattice matrix for a normalized box with the given lengths and tilt
/// factors. The tilt factors are not checked against the lengths.
fn tilted_matrix(lx: f64, ly: f64, lz: f64, xy: f64, xz: f64, yz: f64) -> Matrix3 {
    Matrix3::new([
        [lx, 0.0, 0.0],
        [xy, ly, 0.0],
        [xz, yz, lz],
    ])
}

/// Lattice matrix for a normalized box with the given vector lengths and
/// angles in degrees
fn lengths_and_angles_matrix(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Result<Matrix3, Error> {
    check_lengths("lengths and angles", [a, b, c])?;
    for angle in [alpha, beta, gamma] {
        if !(angle > 0.0 && angle < 180.0) {
            return Err(Error::InvalidParameter(format!(
                "box angles must be between 0 and 180 degrees, got {}", angle
            )));
        }
    }

    // right angles give an exactly diagonal matrix
    let sin_cos = |angle: f64| if angle == 90.0 { (1.0, 0.0) } else { angle.to_radians().sin_cos() };
    let (_, cos_alpha) = sin_cos(alpha);
    let (_, cos_beta) = sin_cos(beta);
    let (sin_gamma, cos_gamma) = sin_cos(gamma);

    let b_x = b * cos_gamma;
    let b_y = b * sin_gamma;

    let c_x = c * cos_beta;
    let c_y = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
    let c_z2 = c * c - c_y * c_y - c_x * c_x;
    if !(c_z2 > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "the angles alpha={}, beta={}, gamma={} do not describe a valid box",
            alpha, beta, gamma
        )));
    }

    return Ok(Matrix3::new([
        [a,   0.0, 0.0],
        [b_x, b_y, 0.0],
        [c_x, c_y, f64::sqrt(c_z2)],
    ]));
}
