mod common;

use common::{fixture_cave, triangle_cave};
use speleo_lib::{
    build_graph, get_cycles, get_section, CycleSummary, RenderMode, ResolutionReport,
    SectionSummary, StationType,
};

#[test]
fn resolution_report_lists_stations_and_warnings() {
    let mut cave = fixture_cave("joined_surveys.json");
    let resolution = cave.rebuild().unwrap();

    let report = ResolutionReport::from_cave(&cave, &resolution, false);
    assert_eq!(report.cave, "Joined");
    assert_eq!(report.stations.len(), 5);
    assert!(report.stations.iter().all(|row| row.kind == StationType::Center));
    assert_eq!(report.orphan_count(), 2);

    let text = report.render(RenderMode::PlainText);
    assert!(text.starts_with("Cave Joined: 5 stations, 3 surveys, 2 orphaned shots"));
    assert!(text.contains("warning: survey side has orphaned shots 3"));
    assert!(text.contains("warning: survey lost is isolated"));

    let with_splays = ResolutionReport::from_cave(&cave, &resolution, true);
    assert_eq!(with_splays.stations.len(), 7);
}

#[test]
fn resolution_report_serializes_to_json() {
    let mut cave = triangle_cave();
    let resolution = cave.rebuild().unwrap();
    let report = ResolutionReport::from_cave(&cave, &resolution, false);

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["cave"], "Triangle");
    assert_eq!(value["stations"][0]["name"], "A");
    assert_eq!(value["stations"][0]["type"], "center");
    assert_eq!(value["surveys"][0]["resolved_shots"], 3);
}

#[test]
fn section_summary_renders_path() {
    let cave = fixture_cave("joined_surveys.json");
    let graph = build_graph(&cave).unwrap();
    let section = get_section(&graph, "B", "S2").unwrap();

    let summary = SectionSummary::from_section(&section, &cave);
    assert!(summary.complete);
    assert_eq!(summary.legs, 2);
    assert_eq!(summary.segments.len(), 12);

    let text = summary.render(RenderMode::PlainText);
    assert!(text.contains("Section B -> S2 (15.00 m, 2 legs)"));
    assert!(text.contains("B -> C -> S2"));

    let rich = summary.render(RenderMode::RichText);
    assert!(rich.contains("`S2`"));
}

#[test]
fn incomplete_section_reports_no_connection() {
    let cave = fixture_cave("joined_surveys.json");
    let mut graph = build_graph(&cave).unwrap();
    graph.add_vertex("Island");
    let section = get_section(&graph, "A", "Island").unwrap();

    let summary = SectionSummary::from_section(&section, &cave);
    assert!(!summary.complete);
    assert_eq!(summary.distance, None);
    assert!(summary.segments.is_empty());
    assert_eq!(
        summary.render(RenderMode::PlainText),
        "No connection between A and Island\n"
    );
    let json = serde_json::to_value(&summary).unwrap();
    assert!(json["distance"].is_null());
}

#[test]
fn cycle_summary_renders_each_loop() {
    let mut cave = triangle_cave();
    cave.rebuild().unwrap();
    let cycles = get_cycles(&build_graph(&cave).unwrap()).unwrap();

    let summary = CycleSummary::new(&cave, cycles);
    assert_eq!(summary.count, 1);
    let text = summary.render(RenderMode::PlainText);
    assert!(text.starts_with("Cave Triangle: 1 loops"));
    assert!(text.contains("cycle-1"));
    assert!(text.contains("34.14 m"));

    let empty = CycleSummary::new(&cave, Vec::new());
    assert_eq!(empty.render(RenderMode::RichText), "Cave Triangle has no loops\n");
}
