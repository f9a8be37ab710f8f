//! Simulation boxes, minimum image displacements and neighbor lists.

mod simulation_box;
pub use self::simulation_box::{SimulationBox, CellShape};

mod parameters;
pub use self::parameters::{BoxParameters, BoxKeywords};

pub mod distance;
pub use self::distance::PointSet;

mod cell_list;
use self::cell_list::CellList;

mod neighbors;
pub use self::neighbors::{NeighborList, NeighborListParameters};

mod system;
pub use self::system::System;

#[cfg(test)]
pub(crate) mod test_utils;
