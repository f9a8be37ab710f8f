use crate::{Error, Matrix3, Vector3D};
use crate::errors::check_index;

use super::{BoxParameters, SimulationBox, NeighborList, NeighborListParameters};

/// A collection of atoms, each with an atomic type and a position, inside a
/// simulation box.
#[derive(Clone, Debug, PartialEq)]
pub struct System {
    cell: SimulationBox,
    types: Vec<i32>,
    positions: Vec<Vector3D>,
}

impl System {
    /// Create a new empty system with the given simulation box
    pub fn new(cell: SimulationBox) -> System {
        System {
            cell: cell,
            types: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Add an atom with the given atomic type and position to this system
    pub fn add_atom(&mut self, atomic_type: i32, position: Vector3D) {
        self.types.push(atomic_type);
        self.positions.push(position);
    }

    /// Get the number of atoms in this system
    pub fn size(&self) -> usize {
        self.types.len()
    }

    /// Get the atomic types for all atoms in this system. Different atomic
    /// types are identified with different integer values. These values are
    /// usually the atomic number, but don't have to.
    pub fn types(&self) -> &[i32] {
        &self.types
    }

    /// Get the positions for all atoms in this system
    pub fn positions(&self) -> &[Vector3D] {
        &self.positions
    }

    /// Get mutable access to the positions of all atoms in this system
    pub fn positions_mut(&mut self) -> &mut [Vector3D] {
        &mut self.positions
    }

    /// Get the simulation box of this system
    pub fn cell(&self) -> &SimulationBox {
        &self.cell
    }

    /// Get mutable access to the simulation box of this system, to change its
    /// geometry or periodic boundary conditions
    pub fn cell_mut(&mut self) -> &mut SimulationBox {
        &mut self.cell
    }

    /// Get the minimum image displacement from atom `i` to atom `j`
    pub fn dvect(&self, i: usize, j: usize) -> Result<Vector3D, Error> {
        check_index(i, self.size())?;
        check_index(j, self.size())?;
        Ok(self.cell.dvect(self.positions[i], self.positions[j]))
    }

    /// Get the minimum image distance between atoms `i` and `j`
    pub fn dmag(&self, i: usize, j: usize) -> Result<f64, Error> {
        self.dvect(i, j).map(|vector| vector.norm())
    }

    /// Build the neighbor list of all atoms in this system
    pub fn neighbor_list(&self, parameters: NeighborListParameters) -> Result<NeighborList, Error> {
        NeighborList::build(&self.cell, &self.positions, parameters)
    }

    /// Wrap all atoms inside the simulation box, along the periodic
    /// directions.
    pub fn wrap(&mut self) {
        for position in &mut self.positions {
            *position = self.cell.wrap(*position);
        }
    }

    /// Create a new system by repeating this one `na`, `nb` and `nc` times
    /// along the `a`, `b` and `c` cell vectors respectively. The new system
    /// keeps the origin and periodic boundary conditions of this one.
    ///
    /// Atoms of the image shifted by `(i, j, k)` cell vectors are stored
    /// together, and images are ordered with `k` changing fastest.
    #[time_graph::instrument(name = "System::supersize")]
    pub fn supersize(&self, na: usize, nb: usize, nc: usize) -> Result<System, Error> {
        if na == 0 || nb == 0 || nc == 0 {
            return Err(Error::InvalidParameter(format!(
                "supercell sizes must be at least 1, got {}x{}x{}", na, nb, nc
            )));
        }

        let vects = self.cell.vects();
        let scaled = Matrix3::new([
            (self.cell.avect() * na as f64).into(),
            (self.cell.bvect() * nb as f64).into(),
            (self.cell.cvect() * nc as f64).into(),
        ]);
        let cell = SimulationBox::new(BoxParameters::Vectors {
            vects: scaled,
            origin: self.cell.origin(),
        })?.with_pbc(self.cell.pbc());

        let mut system = System::new(cell);
        system.types.reserve(self.size() * na * nb * nc);
        system.positions.reserve(self.size() * na * nb * nc);
        for i in 0..na {
            for j in 0..nb {
                for k in 0..nc {
                    let shift = vects.transposed() * Vector3D::new(i as f64, j as f64, k as f64);
                    for (&atomic_type, &position) in self.types.iter().zip(&self.positions) {
                        system.add_atom(atomic_type, position + shift);
                    }
                }
            }
        }

        return Ok(system);
    }
}
