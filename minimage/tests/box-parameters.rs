use approx::assert_relative_eq;

use minimage::{BoxParameters, Error, SimulationBox, Vector3D};
use minimage::systems::CellShape;

fn cell_from_json(json: &str) -> SimulationBox {
    SimulationBox::new(BoxParameters::from_json(json).unwrap()).unwrap()
}

#[test]
fn all_groups_give_the_same_box() {
    let reference = SimulationBox::orthorhombic(3.0, 4.0, 5.0).unwrap();

    let cells = [
        cell_from_json(r#"{"vects": [[3, 0, 0], [0, 4, 0], [0, 0, 5]]}"#),
        cell_from_json(r#"{"avect": [3, 0, 0], "bvect": [0, 4, 0], "cvect": [0, 0, 5]}"#),
        cell_from_json(r#"{"a": 3, "b": 4, "c": 5}"#),
        cell_from_json(r#"{"xlo": 0, "xhi": 3, "ylo": 0, "yhi": 4, "zlo": 0, "zhi": 5}"#),
        cell_from_json(r#"{"lx": 3, "ly": 4, "lz": 5}"#),
    ];

    for cell in cells {
        assert_relative_eq!(cell.vects(), reference.vects(), epsilon = 1e-12);
        assert_eq!(cell.shape(), CellShape::Orthorhombic);
        assert_eq!(cell.pbc(), [true, true, true]);
        assert_relative_eq!(cell.volume(), 60.0, epsilon = 1e-12);
    }
}

#[test]
fn triclinic_groups() {
    let from_lengths = cell_from_json(r#"{"a": 4, "b": 5, "c": 6, "alpha": 80, "beta": 95, "gamma": 105}"#);
    assert_eq!(from_lengths.shape(), CellShape::Triclinic);
    assert!(from_lengths.is_normalized());
    assert_relative_eq!(from_lengths.alpha(), 80.0, epsilon = 1e-10);
    assert_relative_eq!(from_lengths.beta(), 95.0, epsilon = 1e-10);
    assert_relative_eq!(from_lengths.gamma(), 105.0, epsilon = 1e-10);

    // the same box, described with LAMMPS bounds
    let json = format!(
        r#"{{"xlo": -1, "xhi": {}, "ylo": 2, "yhi": {}, "zlo": 0, "zhi": {}, "xy": {}, "xz": {}, "yz": {}}}"#,
        -1.0 + from_lengths.lx().unwrap(),
        2.0 + from_lengths.ly().unwrap(),
        from_lengths.lz().unwrap(),
        from_lengths.xy().unwrap(),
        from_lengths.xz().unwrap(),
        from_lengths.yz().unwrap(),
    );
    let from_bounds = cell_from_json(&json);
    assert_relative_eq!(from_bounds.vects(), from_lengths.vects(), epsilon = 1e-10);
    assert_eq!(from_bounds.origin(), Vector3D::new(-1.0, 2.0, 0.0));
    assert_relative_eq!(from_bounds.xlo().unwrap(), -1.0);
    assert_relative_eq!(from_bounds.yhi().unwrap(), 2.0 + from_lengths.ly().unwrap(), epsilon = 1e-10);
}

#[test]
fn json_round_trip() {
    let parameters = BoxParameters::Edges {
        lx: 10.0, ly: 8.0, lz: 9.0,
        xy: 2.5, xz: -3.0, yz: 1.5,
        origin: Vector3D::new(-1.0, 2.0, 0.5),
    };

    let json = parameters.to_json().unwrap();
    assert_eq!(BoxParameters::from_json(&json).unwrap(), parameters);
}

#[test]
fn configuration_errors() {
    let invalid = [
        // no parameters
        "{}",
        // incomplete group
        r#"{"a": 3, "b": 4}"#,
        // multiple groups
        r#"{"a": 3, "b": 4, "c": 5, "lx": 3, "ly": 4, "lz": 5}"#,
        // key from another group
        r#"{"lx": 3, "ly": 4, "lz": 5, "alpha": 80}"#,
        // shared keys alone
        r#"{"origin": [0, 0, 0], "xy": 1}"#,
        // unknown key
        r#"{"a": 3, "b": 4, "c": 5, "delta": 90}"#,
    ];

    for json in invalid {
        let result = BoxParameters::from_json(json);
        assert!(matches!(result, Err(Error::Configuration(_))), "expected an error for {}", json);
    }

    // not JSON at all
    assert!(matches!(BoxParameters::from_json("a = 3"), Err(Error::Json(_))));
}

#[test]
fn invalid_geometry() {
    let parameters = BoxParameters::from_json(r#"{"a": 3, "b": 4, "c": 5, "alpha": 190}"#).unwrap();
    assert!(matches!(SimulationBox::new(parameters), Err(Error::InvalidParameter(_))));

    let parameters = BoxParameters::from_json(r#"{"avect": [1, 0, 0], "bvect": [0, 1, 0], "cvect": [1, 1, 0]}"#).unwrap();
    assert!(matches!(SimulationBox::new(parameters), Err(Error::DegenerateBox(_))));

    let parameters = BoxParameters::from_json(r#"{"lx": -3, "ly": 4, "lz": 5}"#).unwrap();
    assert!(SimulationBox::new(parameters).is_err());
}
