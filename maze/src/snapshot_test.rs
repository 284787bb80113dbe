#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

// =============================================================
// Cell
// =============================================================

#[test]
fn cell_codes_map_to_variants() {
    assert_eq!(Cell::from_code(0), Cell::Open);
    assert_eq!(Cell::from_code(1), Cell::Start);
    assert_eq!(Cell::from_code(2), Cell::End);
    assert_eq!(Cell::from_code(3), Cell::Wall);
    assert_eq!(Cell::from_code(4), Cell::Blocked);
}

#[test]
fn cell_out_of_range_codes_fall_back_to_unknown() {
    assert_eq!(Cell::from_code(5), Cell::Unknown);
    assert_eq!(Cell::from_code(-1), Cell::Unknown);
    assert_eq!(Cell::from_code(i64::MAX), Cell::Unknown);
}

// =============================================================
// MazeVariant
// =============================================================

#[test]
fn variant_parses_case_insensitively() {
    assert_eq!("grid".parse::<MazeVariant>().expect("grid"), MazeVariant::Grid);
    assert_eq!(" Graph ".parse::<MazeVariant>().expect("graph"), MazeVariant::Graph);
}

#[test]
fn variant_rejects_unknown_name() {
    let err = "hexagon".parse::<MazeVariant>().expect_err("should fail");
    assert!(matches!(err, SnapshotError::UnknownVariant(name) if name == "hexagon"));
}

#[test]
fn variant_display_round_trips_through_from_str() {
    for variant in [MazeVariant::Grid, MazeVariant::Graph] {
        assert_eq!(variant.to_string().parse::<MazeVariant>().expect("parse"), variant);
    }
}

// =============================================================
// Grid
// =============================================================

#[test]
fn grid_from_rows_keeps_row_major_order() {
    let grid = Grid::from_rows(vec![vec![Cell::Open, Cell::Start], vec![Cell::Wall, Cell::End]]).expect("grid");
    assert_eq!(grid.rows(), 2);
    assert_eq!(grid.cols(), 2);
    assert_eq!(grid.cell(0, 1), Some(Cell::Start));
    assert_eq!(grid.cell(1, 0), Some(Cell::Wall));
    let cells: Vec<_> = grid.iter().collect();
    assert_eq!(
        cells,
        vec![(0, 0, Cell::Open), (0, 1, Cell::Start), (1, 0, Cell::Wall), (1, 1, Cell::End)]
    );
}

#[test]
fn grid_cell_out_of_bounds_is_none() {
    let grid = Grid::from_rows(vec![vec![Cell::Open]]).expect("grid");
    assert_eq!(grid.cell(0, 1), None);
    assert_eq!(grid.cell(1, 0), None);
}

#[test]
fn grid_rejects_ragged_rows() {
    let err = Grid::from_rows(vec![vec![Cell::Open, Cell::Open], vec![Cell::Open]]).expect_err("ragged");
    assert!(matches!(err, SnapshotError::RaggedGrid { row: 1, expected: 2, found: 1 }));
}

#[test]
fn grid_with_no_rows_or_no_columns_is_empty() {
    assert!(Grid::default().is_empty());
    assert!(Grid::from_rows(vec![vec![]]).expect("grid").is_empty());
    assert!(!Grid::from_rows(vec![vec![Cell::Open]]).expect("grid").is_empty());
}

// =============================================================
// Graph
// =============================================================

#[test]
fn graph_default_is_empty() {
    assert!(Graph::default().is_empty());
}

#[test]
fn graph_with_edges_is_not_empty() {
    let graph = Graph {
        edges: vec![(Point::new(0.0, 0.0), Point::new(10.0, 0.0))],
        ..Graph::default()
    };
    assert!(!graph.is_empty());
}

#[test]
fn graph_with_moved_endpoint_is_not_empty() {
    let graph = Graph { end: Point::new(5.0, 5.0), ..Graph::default() };
    assert!(!graph.is_empty());
}

// =============================================================
// MazeSnapshot
// =============================================================

#[test]
fn placeholder_is_empty_for_both_variants() {
    for variant in [MazeVariant::Grid, MazeVariant::Graph] {
        let snapshot = MazeSnapshot::placeholder(variant);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.variant(), variant);
    }
}

#[test]
fn decode_grid_payload_ignores_type_key() {
    let payload = json!({"type": "maze", "maze": [[0, 1], [3, 2]]});
    let snapshot = MazeSnapshot::decode(MazeVariant::Grid, payload).expect("decode");
    let MazeSnapshot::Grid(grid) = snapshot else {
        panic!("expected grid snapshot");
    };
    assert_eq!(grid.cell(1, 1), Some(Cell::End));
}

#[test]
fn decode_grid_payload_maps_unknown_codes() {
    let payload = json!({"maze": [[9, 4]]});
    let snapshot = MazeSnapshot::decode(MazeVariant::Grid, payload).expect("decode");
    let MazeSnapshot::Grid(grid) = snapshot else {
        panic!("expected grid snapshot");
    };
    assert_eq!(grid.cell(0, 0), Some(Cell::Unknown));
    assert_eq!(grid.cell(0, 1), Some(Cell::Blocked));
}

#[test]
fn decode_null_or_absent_grid_is_placeholder() {
    for payload in [json!({"type": "maze", "maze": null}), json!({"type": "maze"})] {
        let snapshot = MazeSnapshot::decode(MazeVariant::Grid, payload).expect("decode");
        assert_eq!(snapshot, MazeSnapshot::Grid(Grid::default()));
        assert!(snapshot.is_empty());
    }
}

#[test]
fn decode_grid_payload_rejects_non_integer_cells() {
    let err = MazeSnapshot::decode(MazeVariant::Grid, json!({"maze": [["wall"]]})).expect_err("string cell");
    assert!(matches!(err, SnapshotError::Json(_)));
}

#[test]
fn decode_grid_payload_rejects_ragged_rows() {
    let err = MazeSnapshot::decode(MazeVariant::Grid, json!({"maze": [[0, 0], [0]]})).expect_err("ragged");
    assert!(matches!(err, SnapshotError::RaggedGrid { .. }));
}

#[test]
fn decode_empty_grid_is_placeholder() {
    let snapshot = MazeSnapshot::decode(MazeVariant::Grid, json!({"maze": []})).expect("decode");
    assert!(snapshot.is_empty());
}

#[test]
fn decode_graph_payload_with_pose() {
    let payload = json!({
        "type": "maze",
        "start": [10, 10],
        "end": {"x": 290, "y": 190},
        "edges": [[[10, 10], [150, 10]], [{"x": 150, "y": 10}, {"x": 150, "y": 190}]],
        "path": [[10, 10], [150, 10], [150, 190]],
        "rover": {"position": [150, 40], "heading": 270.0}
    });
    let snapshot = MazeSnapshot::decode(MazeVariant::Graph, payload).expect("decode");
    let MazeSnapshot::Graph(graph) = snapshot else {
        panic!("expected graph snapshot");
    };
    assert_eq!(graph.start, Point::new(10.0, 10.0));
    assert_eq!(graph.end, Point::new(290.0, 190.0));
    assert_eq!(graph.edges.len(), 2);
    assert_eq!(graph.edges[1].1, Point::new(150.0, 190.0));
    assert_eq!(graph.path.len(), 3);
    let rover = graph.rover.expect("rover");
    assert_eq!(rover.position, Point::new(150.0, 40.0));
    assert_eq!(rover.heading, 270.0);
}

#[test]
fn decode_graph_payload_accepts_angle_alias() {
    let payload = json!({
        "start": [0, 0], "end": [1, 1], "edges": [],
        "rover": {"position": [3, 4], "angle": 45}
    });
    let MazeSnapshot::Graph(graph) = MazeSnapshot::decode(MazeVariant::Graph, payload).expect("decode") else {
        panic!("expected graph snapshot");
    };
    assert_eq!(graph.rover.map(|r| r.heading), Some(45.0));
}

#[test]
fn decode_graph_payload_defaults_path_and_rover() {
    let payload = json!({"start": [0, 0], "end": [1, 1], "edges": [[[0, 0], [1, 1]]]});
    let MazeSnapshot::Graph(graph) = MazeSnapshot::decode(MazeVariant::Graph, payload).expect("decode") else {
        panic!("expected graph snapshot");
    };
    assert!(graph.path.is_empty());
    assert!(graph.rover.is_none());
}

#[test]
fn decode_graph_payload_requires_edges() {
    let err = MazeSnapshot::decode(MazeVariant::Graph, json!({"start": [0, 0], "end": [1, 1]}))
        .expect_err("missing edges");
    assert!(matches!(err, SnapshotError::Json(_)));
}

#[test]
fn decode_graph_payload_in_grid_shape_is_rejected() {
    let err = MazeSnapshot::decode(MazeVariant::Graph, json!({"maze": [[0]]})).expect_err("wrong shape");
    assert!(matches!(err, SnapshotError::Json(_)));
}
