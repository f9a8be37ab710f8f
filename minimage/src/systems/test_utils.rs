use crate::Vector3D;
use super::{SimulationBox, System};

pub fn test_system(name: &str) -> System {
    match name {
        "methane" => get_methane(),
        "CsCl" => get_cscl(),
        "silicon" => get_silicon(),
        _ => panic!("unknown test system {}", name)
    }
}

fn get_methane() -> System {
    let mut system = System::new(SimulationBox::cubic(5.0).unwrap());
    system.add_atom(6, Vector3D::new(5.0000, 5.0000, 5.0000));
    system.add_atom(1, Vector3D::new(5.5288, 5.1610, 5.9359));
    system.add_atom(1, Vector3D::new(5.2051, 5.8240, 4.3214));
    system.add_atom(1, Vector3D::new(5.3345, 4.0686, 4.5504));
    system.add_atom(1, Vector3D::new(3.9315, 4.9463, 5.1921));
    return system;
}

/// CsCl structure, with the experimental lattice parameter. The closest Cs-Cl
/// distance is `a * sqrt(3) / 2 = 3.5706`.
fn get_cscl() -> System {
    let cell = SimulationBox::cubic(4.123).unwrap();
    let mut system = System::new(cell);
    system.add_atom(17, cell.fractional_to_cartesian(Vector3D::new(0.0, 0.0, 0.0)));
    system.add_atom(55, cell.fractional_to_cartesian(Vector3D::new(0.5, 0.5, 0.5)));
    return system;
}

/// Conventional cubic cell of diamond silicon
fn get_silicon() -> System {
    let cell = SimulationBox::cubic(5.431).unwrap();
    let mut system = System::new(cell);
    let fractional = [
        [0.0, 0.0, 0.0], [0.0, 0.5, 0.5], [0.5, 0.0, 0.5], [0.5, 0.5, 0.0],
        [0.25, 0.25, 0.25], [0.25, 0.75, 0.75], [0.75, 0.25, 0.75], [0.75, 0.75, 0.25],
    ];
    for position in fractional {
        system.add_atom(14, cell.fractional_to_cartesian(position.into()));
    }
    return system;
}
