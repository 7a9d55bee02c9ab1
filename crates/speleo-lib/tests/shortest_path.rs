mod common;

use common::{assert_close, fixture_cave, triangle_cave};
use speleo_lib::{
    bfs_distances, build_graph, dijkstra_distances, get_section, get_segments, shortest_path,
    DistanceMode, Error, Shot, StartPoint, Survey, Vector3, WeightedGraph,
};

/// Deterministic pseudo-random sequence for synthetic graphs.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

fn synthetic_graph(seed: u64, vertices: usize, edges: usize) -> WeightedGraph {
    let mut rng = Lcg(seed);
    let mut graph = WeightedGraph::new();
    for idx in 0..vertices {
        graph.add_vertex(&format!("v{idx}"));
    }
    for _ in 0..edges {
        let a = (rng.next() as usize) % vertices;
        let b = (rng.next() as usize) % vertices;
        let weight = (rng.next() % 1000) as f64 / 10.0;
        graph
            .add_edge(&format!("v{a}"), &format!("v{b}"), weight)
            .expect("valid weight");
    }
    graph
}

/// Minimum weight over every simple path, found by exhaustive search.
fn brute_force(graph: &WeightedGraph, from: usize, to: usize) -> Option<f64> {
    fn walk(
        graph: &WeightedGraph,
        current: usize,
        goal: usize,
        visited: &mut Vec<bool>,
        so_far: f64,
        best: &mut Option<f64>,
    ) {
        if current == goal {
            *best = Some(best.map_or(so_far, |b: f64| b.min(so_far)));
            return;
        }
        for edge in graph.neighbours(current) {
            if visited[edge.target] {
                continue;
            }
            visited[edge.target] = true;
            walk(graph, edge.target, goal, visited, so_far + edge.weight, best);
            visited[edge.target] = false;
        }
    }

    let mut visited = vec![false; graph.vertex_count()];
    visited[from] = true;
    let mut best = None;
    walk(graph, from, to, &mut visited, 0.0, &mut best);
    best
}

fn path_weight(graph: &WeightedGraph, path: &[String]) -> f64 {
    path.windows(2)
        .map(|pair| {
            let a = graph.vertex_index(&pair[0]).unwrap();
            let b = graph.vertex_index(&pair[1]).unwrap();
            graph
                .neighbours(a)
                .iter()
                .filter(|edge| edge.target == b)
                .map(|edge| edge.weight)
                .fold(f64::INFINITY, f64::min)
        })
        .sum()
}

#[test]
fn triangle_prefers_the_direct_leg() {
    let mut cave = triangle_cave();
    cave.rebuild().unwrap();
    let graph = build_graph(&cave).unwrap();

    let result = shortest_path(&graph, "A", "C").unwrap();
    assert_eq!(result.path, vec!["A".to_string(), "C".to_string()]);
    assert_close(result.distance, 14.14, 1e-9);
}

#[test]
fn dijkstra_matches_exhaustive_search() {
    for seed in 1..=8 {
        let graph = synthetic_graph(seed, 7, 11);
        for from in 0..graph.vertex_count() {
            for to in 0..graph.vertex_count() {
                let result = graph.shortest_path(graph.name(from), graph.name(to)).unwrap();
                match brute_force(&graph, from, to) {
                    Some(expected) => {
                        assert!(result.is_reachable(), "seed {seed}: {from}->{to}");
                        assert_close(result.distance, expected, 1e-9);
                        assert_close(path_weight(&graph, &result.path), result.distance, 1e-9);
                        assert_eq!(result.path.first().map(String::as_str), Some(graph.name(from)));
                        assert_eq!(result.path.last().map(String::as_str), Some(graph.name(to)));
                    }
                    None => {
                        assert!(result.path.is_empty());
                        assert!(result.distance.is_infinite());
                    }
                }
            }
        }
    }
}

#[test]
fn unreachable_goal_returns_empty_path() {
    let mut graph = WeightedGraph::new();
    graph.add_edge("A", "B", 1.0).unwrap();
    graph.add_edge("C", "D", 1.0).unwrap();

    let result = graph.shortest_path("A", "D").unwrap();
    assert!(!result.is_reachable());
    assert!(result.path.is_empty());
    assert_eq!(result.distance, f64::INFINITY);
}

#[test]
fn unknown_endpoint_is_an_error() {
    let mut graph = WeightedGraph::new();
    graph.add_edge("A", "B", 1.0).unwrap();
    assert!(matches!(
        graph.shortest_path("A", "Nope"),
        Err(Error::UnknownStation { .. })
    ));
}

#[test]
fn traversal_distances_follow_discovery_order() {
    // A-B and A-C are discovered first, so C keeps its direct 10 m even
    // though A-B-C would only be 2 m.
    let mut graph = WeightedGraph::new();
    graph.add_edge("A", "B", 1.0).unwrap();
    graph.add_edge("A", "C", 10.0).unwrap();
    graph.add_edge("B", "C", 1.0).unwrap();
    graph.add_edge("C", "D", 1.0).unwrap();

    let traversal = bfs_distances(&graph, "A").unwrap();
    assert_eq!(traversal["C"], 10.0);
    assert_eq!(traversal["D"], 11.0);

    let shortest = dijkstra_distances(&graph, "A").unwrap();
    assert_eq!(shortest["C"], 2.0);
    assert_eq!(shortest["D"], 3.0);

    assert_eq!(graph.distances("A", DistanceMode::Shortest).unwrap(), shortest);
    assert_eq!(graph.distances("A", DistanceMode::Traversal).unwrap(), traversal);
}

#[test]
fn distances_omit_unreachable_stations() {
    let cave = fixture_cave("joined_surveys.json");
    let graph = build_graph(&cave).unwrap();
    let distances = graph.bfs_distances("A").unwrap();

    assert!(distances.contains_key("S3"));
    assert!(!distances.contains_key("X1"));
}

#[test]
fn section_segments_follow_station_positions() {
    let cave = fixture_cave("joined_surveys.json");
    let graph = build_graph(&cave).unwrap();

    let section = get_section(&graph, "A", "S3").unwrap();
    assert!(section.is_complete());
    assert_eq!(section.path, vec!["A", "C", "S2", "S3"]);
    assert_close(section.distance, 14.14 + 5.0 + 4.0, 1e-9);

    let segments = get_segments(&section, &cave.stations);
    assert_eq!(segments.len(), 3 * 6);
    let a = cave.stations.position("A").unwrap();
    let s3 = cave.stations.position("S3").unwrap();
    assert_eq!(&segments[..3], &a.to_array());
    assert_eq!(&segments[15..], &s3.to_array());
}

#[test]
fn disconnected_section_is_incomplete() {
    let mut cave = triangle_cave();
    cave.surveys.push(
        Survey::new("far", vec![Shot::center(0, "F1", "F2", 1.0, 0.0, 0.0)])
            .with_start(StartPoint::new("F1", Vector3::new(500.0, 0.0, 0.0))),
    );
    cave.rebuild().unwrap();
    let graph = build_graph(&cave).unwrap();

    let section = get_section(&graph, "A", "F2").unwrap();
    assert!(!section.is_complete());
    assert!(get_segments(&section, &cave.stations).is_empty());
}
