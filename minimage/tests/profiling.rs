use minimage::{Matrix3, NeighborListParameters, SimulationBox, System, Vector3D};

#[test]
fn collect_timings() {
    time_graph::enable_data_collection(true);
    time_graph::clear_collected_data();

    let neighbors = time_graph::spanned!("silicon neighbors", {
        let a = 5.431;
        let cell = SimulationBox::from_matrix(Matrix3::new([
            [0.0, a / 2.0, a / 2.0],
            [a / 2.0, 0.0, a / 2.0],
            [a / 2.0, a / 2.0, 0.0],
        ])).unwrap();
        let mut system = System::new(cell);
        system.add_atom(14, Vector3D::zero());
        system.add_atom(14, Vector3D::new(a / 4.0, a / 4.0, a / 4.0));

        let system = system.supersize(2, 2, 2).unwrap();
        system.neighbor_list(NeighborListParameters::new(3.0)).unwrap()
    });
    assert_eq!(neighbors.average_coordination(), 4.0);

    time_graph::enable_data_collection(false);
    let graph = time_graph::get_full_graph();

    let table = graph.as_short_table();
    assert!(table.contains("System::supersize"));
    assert!(table.contains("NeighborList::build"));
    assert!(table.contains("silicon neighbors"));

    let json: serde_json::Value = serde_json::from_str(&graph.as_json()).unwrap();
    let timings = json["timings"].as_object().unwrap();
    assert!(timings.keys().any(|name| name.ends_with("NeighborList::build")));
    // both functions are called from the outer span
    assert_eq!(json["calls"].as_array().map(Vec::len), Some(2));
}
