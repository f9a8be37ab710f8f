use std::io::{BufRead, Write};
use std::path::Path;

use log::{info, warn};
use rayon::prelude::*;

use crate::{Error, Vector3D};
use crate::errors::check_index;
use super::{CellList, SimulationBox};

/// Header line of the text representation of neighbor lists
const TEXT_HEADER: &str = "#atom_id coordination neighbor_ids";

fn default_initial_capacity() -> usize { 20 }
fn default_growth_increment() -> usize { 10 }

/// Parameters for neighbor lists construction
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NeighborListParameters {
    /// Spherical cutoff radius, atoms closer than this distance (included)
    /// are neighbors
    pub cutoff: f64,
    /// Number of neighbors slots initially allocated for each atom
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
    /// Number of neighbors slots added for an atom whenever its storage is
    /// full
    #[serde(default = "default_growth_increment")]
    pub growth_increment: usize,
}

impl NeighborListParameters {
    /// Get parameters with the given `cutoff` and default storage sizes
    pub fn new(cutoff: f64) -> NeighborListParameters {
        NeighborListParameters {
            cutoff: cutoff,
            initial_capacity: default_initial_capacity(),
            growth_increment: default_growth_increment(),
        }
    }

    /// Parse parameters from JSON, and validate them
    pub fn from_json(json: &str) -> Result<NeighborListParameters, Error> {
        let parameters: NeighborListParameters = serde_json::from_str(json)?;
        parameters.validate()?;
        return Ok(parameters);
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.cutoff > 0.0 && self.cutoff.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "expected positive cutoff for neighbor list, got {}", self.cutoff
            )));
        }

        if self.growth_increment == 0 {
            return Err(Error::InvalidParameter(
                "neighbor list growth increment can not be zero".into()
            ));
        }

        return Ok(());
    }
}

/// A full neighbor list, associating each atom with all the other atoms
/// closer than a cutoff, following the minimum image convention.
///
/// Neighbor lists are symmetric: if `j` is a neighbor of `i`, then `i` is a
/// neighbor of `j`. Neighbors of each atom are sorted by index.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(try_from = "NeighborListData", into = "NeighborListData")]
pub struct NeighborList {
    neighbors: Vec<Vec<usize>>,
}

impl NeighborList {
    /// Build the neighbor list of atoms at `positions` inside `cell`.
    #[time_graph::instrument(name = "NeighborList::build")]
    pub fn build(cell: &SimulationBox, positions: &[Vector3D], parameters: NeighborListParameters) -> Result<NeighborList, Error> {
        parameters.validate()?;

        if let Some(atom) = positions.iter().position(|position| !position.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "position of atom {} is not finite: {:?}", atom, positions[atom]
            )));
        }

        let cell_list = CellList::new(cell, positions, parameters.cutoff);
        let cutoff2 = parameters.cutoff * parameters.cutoff;

        // an atom has less than `positions.len()` neighbors, there is no need
        // to allocate more storage than this
        let initial_capacity = usize::min(parameters.initial_capacity, positions.len());
        let growth_increment = usize::min(parameters.growth_increment, positions.len());

        let neighbors = (0..positions.len()).into_par_iter().map(|i| {
            let mut neighbors = Vec::with_capacity(initial_capacity);

            // the cell list creates too many candidates, we only need to keep
            // the one where the distance is actually below the cutoff
            for j in cell_list.candidates(i) {
                if i == j {
                    continue;
                }

                let distance2 = cell.dvect(positions[i], positions[j]).norm2();
                if distance2 <= cutoff2 {
                    if distance2 < 1e-3 && i < j {
                        warn!(
                            "atoms {} and {} are very close to one another ({} A)",
                            i, j, distance2.sqrt()
                        );
                    }

                    if neighbors.len() == neighbors.capacity() {
                        neighbors.reserve_exact(growth_increment);
                    }
                    neighbors.push(j);
                }
            }

            neighbors.sort_unstable();
            neighbors
        }).collect::<Vec<_>>();

        return Ok(NeighborList { neighbors });
    }

    /// Build the neighbor list of atoms at `positions` inside `cell`, using
    /// the given `cutoff` and default storage sizes.
    pub fn with_cutoff(cell: &SimulationBox, positions: &[Vector3D], cutoff: f64) -> Result<NeighborList, Error> {
        NeighborList::build(cell, positions, NeighborListParameters::new(cutoff))
    }

    /// Create a neighbor list from already computed neighbors, without any
    /// geometric check. The neighbors of each atom are sorted.
    ///
    /// This checks that all neighbors are valid atoms, that no atom is its
    /// own neighbor, and that no neighbor appears twice for the same atom.
    pub fn from_neighbors(mut neighbors: Vec<Vec<usize>>) -> Result<NeighborList, Error> {
        let size = neighbors.len();
        for (atom, list) in neighbors.iter_mut().enumerate() {
            list.sort_unstable();

            if let Some(&neighbor) = list.iter().find(|&&neighbor| neighbor >= size) {
                return Err(Error::Serialization(format!(
                    "atom {} has neighbor {}, but there are only {} atoms", atom, neighbor, size
                )));
            }

            if list.binary_search(&atom).is_ok() {
                return Err(Error::Serialization(format!(
                    "atom {} is its own neighbor", atom
                )));
            }

            if let Some(pair) = list.windows(2).find(|pair| pair[0] == pair[1]) {
                return Err(Error::Serialization(format!(
                    "atom {} has neighbor {} more than once", atom, pair[0]
                )));
            }
        }

        return Ok(NeighborList { neighbors });
    }

    /// Get the number of atoms in this neighbor list
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Does this neighbor list contains no atoms?
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Get the sorted neighbors of the atom at index `atom`
    pub fn neighbors_of(&self, atom: usize) -> Result<&[usize], Error> {
        check_index(atom, self.len())?;
        Ok(&self.neighbors[atom])
    }

    /// Get the number of neighbors of the atom at index `atom`
    pub fn coordination_of(&self, atom: usize) -> Result<usize, Error> {
        check_index(atom, self.len())?;
        Ok(self.neighbors[atom].len())
    }

    /// Get the number of neighbors of all atoms
    pub fn coordinations(&self) -> Vec<usize> {
        self.neighbors.iter().map(Vec::len).collect()
    }

    /// Get the average number of neighbors per atom, or 0 if there are no
    /// atoms.
    pub fn average_coordination(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }

        let total = self.neighbors.iter().map(Vec::len).sum::<usize>();
        return total as f64 / self.len() as f64;
    }

    /// Iterate over all atoms, yielding the atom index and its neighbors
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.neighbors.iter().enumerate().map(|(atom, neighbors)| (atom, neighbors.as_slice()))
    }
}

impl std::ops::Index<usize> for NeighborList {
    type Output = [usize];

    fn index(&self, atom: usize) -> &[usize] {
        &self.neighbors[atom]
    }
}

/// Text representation of neighbor lists
///
/// ```text
/// #atom_id coordination neighbor_ids
/// 0 2 1 3
/// 1 1 0
/// 2 0
/// 3 1 0
/// ```
impl NeighborList {
    /// Get the text representation of this neighbor list
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Parse a neighbor list from its text representation
    pub fn from_text(text: &str) -> Result<NeighborList, Error> {
        NeighborList::read_from(text.as_bytes())
    }

    /// Write the text representation of this neighbor list to `writer`
    pub fn write_to(&self, mut writer: impl Write) -> Result<(), Error> {
        write!(writer, "{}", self)?;
        writer.flush()?;
        return Ok(());
    }

    /// Read a neighbor list in text representation from `reader`
    pub fn read_from(reader: impl BufRead) -> Result<NeighborList, Error> {
        let mut neighbors = Vec::new();
        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parse_error = |message: String| Error::Serialization(format!(
                "line {}: {}", line_number + 1, message
            ));

            let values = line.split_whitespace()
                .map(|value| value.parse::<usize>().map_err(|e| parse_error(
                    format!("invalid value '{}': {}", value, e)
                )))
                .collect::<Result<Vec<_>, _>>()?;

            if values.len() < 2 {
                return Err(parse_error("expected at least an atom id and a coordination".into()));
            }

            let (atom, coordination) = (values[0], values[1]);
            if atom != neighbors.len() {
                return Err(parse_error(format!(
                    "expected data for atom {}, got atom {}", neighbors.len(), atom
                )));
            }

            let atom_neighbors = &values[2..];
            if atom_neighbors.len() != coordination {
                return Err(parse_error(format!(
                    "atom {} has coordination {}, but {} neighbors are listed",
                    atom, coordination, atom_neighbors.len()
                )));
            }

            neighbors.push(atom_neighbors.to_vec());
        }

        return NeighborList::from_neighbors(neighbors);
    }

    /// Save the text representation of this neighbor list to the file at
    /// `path`, overwriting it if it already exists.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        self.write_to(std::io::BufWriter::new(file))?;
        info!("saved neighbor list for {} atoms to {}", self.len(), path.display());
        return Ok(());
    }

    /// Load a neighbor list from the file at `path`, containing its text
    /// representation.
    pub fn load(path: impl AsRef<Path>) -> Result<NeighborList, Error> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let neighbors = NeighborList::read_from(std::io::BufReader::new(file))?;
        info!("loaded neighbor list for {} atoms from {}", neighbors.len(), path.display());
        return Ok(neighbors);
    }
}

impl std::fmt::Display for NeighborList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", TEXT_HEADER)?;
        for (atom, neighbors) in self.iter() {
            write!(f, "{} {}", atom, neighbors.len())?;
            for neighbor in neighbors {
                write!(f, " {}", neighbor)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Serialized form of `NeighborList`
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
struct NeighborListData {
    neighbors: Vec<Vec<usize>>,
}

impl TryFrom<NeighborListData> for NeighborList {
    type Error = Error;

    fn try_from(data: NeighborListData) -> Result<NeighborList, Error> {
        NeighborList::from_neighbors(data.neighbors)
    }
}

impl From<NeighborList> for NeighborListData {
    fn from(list: NeighborList) -> NeighborListData {
        NeighborListData { neighbors: list.neighbors }
    }
}
