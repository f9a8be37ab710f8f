use log::debug;
use ndarray::Array3;

use crate::Vector3D;
use super::SimulationBox;

/// Maximal number of cells, we need to use this to prevent having too many
/// cells with a small unit cell and a large cutoff
const MAX_NUMBER_OF_CELLS: f64 = 1e5;

/// The cell list is used to sort atoms inside bins/cells.
///
/// The candidates neighbors of an atom are then found by looking through all
/// neighboring cells (the number of cells to search depends on the cutoff and
/// the size of the cells). Along periodic directions, cells tile the `[0, 1)`
/// range of fractional coordinates and wrap around; along non-periodic
/// directions they cover both the box and all the atoms, and never wrap.
#[derive(Debug, Clone)]
pub(crate) struct CellList {
    /// How many cells do we need to look at when searching neighbors to include
    /// all neighbors below cutoff
    n_search: [i32; 3],
    /// the cells themselves, containing atoms indexes
    cells: Array3<Vec<usize>>,
    /// index of the cell containing each atom
    atom_cells: Vec<[usize; 3]>,
    /// periodic boundary conditions along the three cell vectors
    pbc: [bool; 3],
}

impl CellList {
    /// Create a new `CellList` for the given box, atomic positions and cutoff,
    /// and sort all the atoms in the cells.
    pub fn new(cell: &SimulationBox, positions: &[Vector3D], cutoff: f64) -> CellList {
        let pbc = cell.pbc();
        let fractional = positions.iter()
            .map(|&position| cell.cartesian_to_fractional(position))
            .collect::<Vec<_>>();

        // range of fractional coordinates covered by the cells
        let mut lower = [0.0; 3];
        let mut upper = [1.0; 3];
        for xyz in 0..3 {
            if !pbc[xyz] {
                for f in &fractional {
                    lower[xyz] = f64::min(lower[xyz], f[xyz]);
                    upper[xyz] = f64::max(upper[xyz], f[xyz]);
                }
            }
        }
        let width = [upper[0] - lower[0], upper[1] - lower[1], upper[2] - lower[2]];

        let distances_between_faces = cell.distances_between_faces();
        let extent = [
            distances_between_faces[0] * width[0],
            distances_between_faces[1] * width[1],
            distances_between_faces[2] * width[2],
        ];

        let mut n_cells = [
            f64::clamp(f64::trunc(extent[0] / cutoff), 1.0, f64::INFINITY),
            f64::clamp(f64::trunc(extent[1] / cutoff), 1.0, f64::INFINITY),
            f64::clamp(f64::trunc(extent[2] / cutoff), 1.0, f64::INFINITY),
        ];

        // limit memory consumption by ensuring we have less than `MAX_N_CELLS`
        // cells to look though
        let n_cells_total = n_cells[0] * n_cells[1] * n_cells[2];
        if n_cells_total > MAX_NUMBER_OF_CELLS {
            // set the total number of cells close to MAX_N_CELLS, while keeping
            // roughly the ratio of cells in each direction
            let ratio_x_y = n_cells[0] / n_cells[1];
            let ratio_y_z = n_cells[1] / n_cells[2];

            n_cells[2] = f64::trunc(f64::cbrt(MAX_NUMBER_OF_CELLS / (ratio_x_y * ratio_y_z * ratio_y_z)));
            n_cells[1] = f64::trunc(ratio_y_z * n_cells[2]);
            n_cells[0] = f64::trunc(ratio_x_y * n_cells[1]);

            for n in &mut n_cells {
                *n = f64::max(*n, 1.0);
            }
        }

        // number of cells to search in each direction to make sure all possible
        // pairs below the cutoff are accounted for.
        let mut n_search = [
            f64::ceil(cutoff * n_cells[0] / extent[0]) as i32,
            f64::ceil(cutoff * n_cells[1] / extent[1]) as i32,
            f64::ceil(cutoff * n_cells[2] / extent[2]) as i32,
        ];

        let n_cells = [
            n_cells[0] as usize,
            n_cells[1] as usize,
            n_cells[2] as usize,
        ];

        for xyz in 0..3 {
            if n_search[xyz] < 1 {
                n_search[xyz] = 1;
            }

            // don't look for neighboring cells if we have only one cell and no
            // periodic boundary condition
            if n_cells[xyz] == 1 && !pbc[xyz] {
                n_search[xyz] = 0;
            }
        }

        debug!(
            "cell list with {}x{}x{} cells, searching {}x{}x{} neighboring cells",
            n_cells[0], n_cells[1], n_cells[2],
            2 * n_search[0] + 1, 2 * n_search[1] + 1, 2 * n_search[2] + 1,
        );

        let mut cells = Array3::from_elem(n_cells, Vec::new());
        let mut atom_cells = Vec::with_capacity(positions.len());
        for (index, f) in fractional.iter().enumerate() {
            let mut cell_index = [0; 3];
            for xyz in 0..3 {
                let n = n_cells[xyz];
                let scaled = (f[xyz] - lower[xyz]) / width[xyz];
                let i = f64::floor(scaled * n as f64) as i64;
                cell_index[xyz] = if pbc[xyz] {
                    // deal with pbc by wrapping the atom inside if it was
                    // outside of the cell
                    i.rem_euclid(n as i64) as usize
                } else {
                    // atoms exactly on the upper boundary go in the last cell
                    i64::clamp(i, 0, n as i64 - 1) as usize
                };
            }

            cells[cell_index].push(index);
            atom_cells.push(cell_index);
        }

        CellList {
            n_search: n_search,
            cells: cells,
            atom_cells: atom_cells,
            pbc: pbc,
        }
    }

    /// Get the shape of the cell grid
    #[cfg(test)]
    pub fn n_cells(&self) -> [usize; 3] {
        let shape = self.cells.shape();
        [shape[0], shape[1], shape[2]]
    }

    /// Get all the atoms in the same or neighboring cells as `atom`, including
    /// `atom` itself. Every candidate appears exactly once, some of them
    /// might be further away than the cutoff.
    pub fn candidates(&self, atom: usize) -> Vec<usize> {
        let shape = self.cells.shape();
        let n_cells = [shape[0] as i64, shape[1] as i64, shape[2] as i64];
        let current = self.atom_cells[atom];

        // with few cells, multiple search directions can wrap to the same
        // cell, which must only be visited once
        let mut neighbor_cells = Vec::new();
        for delta_x in -self.n_search[0]..=self.n_search[0] {
            for delta_y in -self.n_search[1]..=self.n_search[1] {
                for delta_z in -self.n_search[2]..=self.n_search[2] {
                    let delta = [delta_x, delta_y, delta_z];

                    let mut neighbor = [0; 3];
                    let mut outside = false;
                    for xyz in 0..3 {
                        let i = current[xyz] as i64 + delta[xyz] as i64;
                        if self.pbc[xyz] {
                            neighbor[xyz] = i.rem_euclid(n_cells[xyz]) as usize;
                        } else if 0 <= i && i < n_cells[xyz] {
                            neighbor[xyz] = i as usize;
                        } else {
                            outside = true;
                        }
                    }

                    if !outside {
                        neighbor_cells.push(neighbor);
                    }
                }
            }
        }
        neighbor_cells.sort_unstable();
        neighbor_cells.dedup();

        let mut candidates = Vec::new();
        for neighbor in neighbor_cells {
            candidates.extend_from_slice(&self.cells[neighbor]);
        }

        return candidates;
    }
}
