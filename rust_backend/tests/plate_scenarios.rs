use std::f64::consts::PI;
use std::fs;

use hector_obs::error::PipelineError;
use hector_obs::geometry::{
    circle_rectangle_intersection, circle_segment_intersection, Circle, Point, Rectangle, Segment,
    Tolerance,
};
use hector_obs::output::write_robot_file;
use hector_obs::plate::{
    check_magnets, configure_plate, ConflictTable, ConflictsLog, HexabundleLabel,
    InstrumentConfig, Magnet, MemberKind, PickupState, Placement, PlateLayout,
};
use qtty::Radians;

fn circular(index: usize, x: f64, y: f64, orientation: f64) -> Magnet {
    Magnet::circular(
        index,
        index,
        Point::new(x, y),
        Radians::new(orientation),
        &InstrumentConfig::default(),
    )
    .unwrap()
}

#[test]
fn test_chord_through_unit_circle() {
    let circle = Circle::new(Point::ORIGIN, 1.0, Radians::new(0.0)).unwrap();
    let segment = Segment::new(Point::new(-2.0, 0.0), Point::new(2.0, 0.0));
    let hits = circle_segment_intersection(&circle, &segment, Tolerance::default()).unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().any(|p| p.approx_eq(Point::new(-1.0, 0.0), Tolerance(1e-12))));
    assert!(hits.iter().any(|p| p.approx_eq(Point::new(1.0, 0.0), Tolerance(1e-12))));
}

#[test]
fn test_rectangle_matches_its_sides() {
    let circle = Circle::new(Point::new(0.2, -0.1), 1.0, Radians::new(0.0)).unwrap();
    let rect = Rectangle::new(Point::ORIGIN, 1.6, 1.2, Radians::new(0.3)).unwrap();
    let tol = Tolerance::default();
    let direct = circle_rectangle_intersection(&circle, &rect, tol).unwrap();

    let mut by_side = Vec::new();
    for side in rect.sides() {
        for p in circle_segment_intersection(&circle, &side, tol).unwrap() {
            if !by_side.iter().any(|q: &Point| q.approx_eq(p, tol)) {
                by_side.push(p);
            }
        }
    }
    assert_eq!(direct.len(), by_side.len());
    for p in &direct {
        assert!(by_side.iter().any(|q| q.approx_eq(*p, tol)));
    }
}

#[test]
fn test_blocking_neighbours_then_fully_blocked() {
    let cfg = InstrumentConfig::default();
    let dir = tempfile::tempdir().unwrap();
    let log = ConflictsLog::new(dir.path().join("conflicts.txt"));

    let pair = vec![circular(0, 0.0, 0.0, 0.0), circular(1, 14.85, 14.85, PI)];
    let table = check_magnets("tile_005.txt", &pair, &cfg, Some(&log)).unwrap();
    assert_eq!(table.state(0), Some(PickupState::PartiallyBlocked));
    assert_eq!(table.state(1), Some(PickupState::PartiallyBlocked));
    assert!(table.is_feasible());

    let mut trio = pair;
    trio.push(circular(2, -14.85, -14.85, 0.0));
    let err = check_magnets("tile_005.txt", &trio, &cfg, Some(&log)).unwrap_err();
    match err {
        PipelineError::InfeasibleTile { blocked, .. } => {
            assert_eq!(blocked.len(), 1);
            assert_eq!(blocked[0].index, 0);
        }
        other => panic!("unexpected error: {other}"),
    }
    let table = ConflictTable::detect(&trio, &cfg).unwrap();
    assert_eq!(table.state(0), Some(PickupState::FullyBlocked));

    let record = fs::read_to_string(log.path()).unwrap();
    assert_eq!(record, "circular_magnet 0 tile_005.txt\n");
}

#[test]
fn test_robot_file_rows() {
    let cfg = InstrumentConfig::default();
    let placements = [
        Placement {
            label: HexabundleLabel::Science('A'),
            member_id: 1,
            kind: MemberKind::Target,
            position: Point::new(100.0, 0.0),
        },
        Placement {
            label: HexabundleLabel::Guide(1),
            member_id: 2,
            kind: MemberKind::Guide,
            position: Point::new(0.0, -120.0),
        },
    ];
    let layout = PlateLayout::build(&placements, &cfg).unwrap();
    let plate = configure_plate("tile_001.txt", layout, &cfg, None).unwrap();

    let mut out = Vec::new();
    write_robot_file(&mut out, &plate, &cfg).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Hexabundle,#Magnet,Center_x,Center_y,rot_holdingPosition,rot_platePlacing",
            "A,circular_magnet,0.0000,100.0000,180.0000,0.0000",
            "A,rectangular_magnet,0.0000,123.6000,0.0000,0.0000",
            "GS1,circular_magnet,120.0000,0.0000,180.0000,270.0000",
            "GS1,rectangular_magnet,143.6000,0.0000,0.0000,270.0000",
        ]
    );
}
