mod common;

use std::fs;

use common::{fixture_cave, fixtures_dir};
use speleo_lib::{
    build_graph, get_cycles, load_cave, load_cave_resolved, CaveGeometry, Error, ShotType,
};

#[test]
fn loads_json_snapshot_and_rebuilds() {
    let cave = fixture_cave("triangle_cave.json");
    assert_eq!(cave.name, "Triangle");
    assert_eq!(cave.surveys.len(), 1);
    assert_eq!(cave.stations.len(), 3);
    assert!(cave.surveys[0].orphan_shot_ids.is_empty());
}

#[test]
fn loads_delimited_shot_table_as_single_survey() {
    let cave = fixture_cave("entrance_series.csv");
    assert_eq!(cave.name, "entrance_series");
    assert_eq!(cave.surveys.len(), 1);

    let survey = &cave.surveys[0];
    assert_eq!(survey.name, "entrance_series");
    assert_eq!(survey.shots.len(), 6);
    assert_eq!(
        survey.shots.iter().filter(|shot| shot.kind == ShotType::Splay).count(),
        2
    );
    assert!(survey.orphan_shot_ids.is_empty());

    let graph = build_graph(&cave).unwrap();
    assert_eq!(graph.vertex_count(), 4);
    assert_eq!(get_cycles(&graph).unwrap().len(), 1);
}

#[test]
fn derived_fields_in_snapshot_are_recomputed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stale.json");
    fs::write(
        &path,
        r#"{
            "name": "Stale",
            "surveys": [{
                "name": "s",
                "orphanShotIds": [0],
                "isolated": true,
                "shots": [
                    { "id": 0, "from": "A", "to": "B", "length": 1.0, "azimuth": 0.0, "clino": 0.0, "processed": false },
                    { "id": 1, "from": "Q", "to": "R", "length": 1.0, "azimuth": 0.0, "clino": 0.0, "processed": true, "fromAlias": "A" }
                ]
            }],
            "stations": {
                "Ghost": { "type": "center", "position": { "x": 9.0, "y": 9.0, "z": 9.0 }, "survey": "s" }
            }
        }"#,
    )
    .unwrap();

    let cave = load_cave(&path).expect("snapshot loads");
    let survey = &cave.surveys[0];
    assert!(!survey.isolated);
    assert_eq!(survey.orphan_shot_ids.iter().copied().collect::<Vec<_>>(), vec![1]);
    assert!(survey.shots[0].processed);
    assert!(!survey.shots[1].processed);
    assert_eq!(survey.shots[1].from_alias, None);
    assert!(!cave.stations.contains("Ghost"));
}

#[test]
fn malformed_shots_are_rejected_at_load_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"{
            "name": "Bad",
            "surveys": [{
                "name": "s",
                "shots": [
                    { "id": 4, "from": "A", "to": "B", "length": 1.0, "azimuth": 0.0, "clino": 120.0 }
                ]
            }]
        }"#,
    )
    .unwrap();

    let err = load_cave(&path).expect_err("clino out of range");
    assert!(matches!(
        err,
        Error::InvalidShot { ref survey, shot: 4, .. } if survey == "s"
    ));
}

#[test]
fn repeated_shot_ids_are_rejected_at_load_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("repeated.json");
    fs::write(
        &path,
        r#"{
            "name": "Repeated",
            "surveys": [{
                "name": "s",
                "shots": [
                    { "id": 0, "from": "A", "to": "B", "length": 1.0, "azimuth": 0.0, "clino": 0.0 },
                    { "id": 0, "from": "Q", "to": "R", "length": 1.0, "azimuth": 0.0, "clino": 0.0 }
                ]
            }]
        }"#,
    )
    .unwrap();

    let err = load_cave(&path).expect_err("shot id 0 appears twice");
    assert!(matches!(
        err,
        Error::InvalidShot { ref survey, shot: 0, ref message }
            if survey == "s" && message.contains("more than once")
    ));
}

#[test]
fn resolved_load_reports_each_survey() {
    let (cave, resolution) = load_cave_resolved(&fixtures_dir().join("joined_surveys.json"))
        .expect("fixture loads");

    assert_eq!(resolution.surveys.len(), cave.surveys.len());
    for (outcome, survey) in resolution.surveys.iter().zip(&cave.surveys) {
        assert_eq!(outcome.survey, survey.name);
        assert_eq!(outcome.orphan_shot_ids, survey.orphan_shot_ids);
        assert_eq!(outcome.isolated, survey.isolated);
    }
    assert_eq!(resolution.isolated_surveys(), vec!["lost"]);
}

#[test]
fn unsupported_extension_is_rejected() {
    let err = load_cave(&fixtures_dir().join("cave.xml")).expect_err("unsupported");
    assert!(matches!(err, Error::UnsupportedFormat { .. }));
}

#[test]
fn missing_file_surfaces_io_error() {
    let err = load_cave(&fixtures_dir().join("missing.json")).expect_err("missing");
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn geometry_splits_centerline_and_splays() {
    let cave = fixture_cave("joined_surveys.json");
    let geometry = CaveGeometry::from_cave(&cave);

    assert_eq!(geometry.centerline_segments(), 5);
    assert_eq!(geometry.splay_segments(), 2);
    assert_eq!(geometry.centerline.len(), 5 * 6);

    let names: Vec<&str> = geometry.stations.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C", "S2", "S3"]);

    let b = cave.stations.position("B").unwrap();
    let splay_from = &geometry.splays[..3];
    assert_eq!(splay_from, &b.to_array());
}
