use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::WeightedGraph;

/// Result of a shortest-path query.
///
/// An unreachable goal is reported with an empty `path` and an infinite
/// `distance`; check [`ShortestPath::is_reachable`] before using it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    pub path: Vec<String>,
    pub distance: f64,
}

impl ShortestPath {
    fn unreachable() -> Self {
        Self {
            path: Vec::new(),
            distance: f64::INFINITY,
        }
    }

    pub fn is_reachable(&self) -> bool {
        !self.path.is_empty() && self.distance.is_finite()
    }
}

/// Algorithm used to derive per-station distances from a reference station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMode {
    /// Breadth-first discovery order with accumulated edge weights. Exact on
    /// trees, may overestimate in loops.
    #[default]
    Traversal,
    /// True shortest distances (Dijkstra).
    Shortest,
}

impl WeightedGraph {
    /// Lowest-weight path between two named vertices.
    pub fn shortest_path(&self, start: &str, goal: &str) -> Result<ShortestPath> {
        shortest_path(self, start, goal)
    }

    /// Breadth-first accumulated distances from `start`.
    pub fn bfs_distances(&self, start: &str) -> Result<HashMap<String, f64>> {
        bfs_distances(self, start)
    }

    /// Per-station distances from `start` using the selected algorithm.
    pub fn distances(&self, start: &str, mode: DistanceMode) -> Result<HashMap<String, f64>> {
        match mode {
            DistanceMode::Traversal => bfs_distances(self, start),
            DistanceMode::Shortest => dijkstra_distances(self, start),
        }
    }
}

/// Run Dijkstra's algorithm between `start` and `goal`.
///
/// Fails only when either name is not a vertex of the graph.
pub fn shortest_path(graph: &WeightedGraph, start: &str, goal: &str) -> Result<ShortestPath> {
    let start_idx = graph.require_vertex(start)?;
    let goal_idx = graph.require_vertex(goal)?;

    if start_idx == goal_idx {
        return Ok(ShortestPath {
            path: vec![start.to_string()],
            distance: 0.0,
        });
    }

    let search = dijkstra(graph, start_idx, Some(goal_idx));
    let distance = search.distances[goal_idx];
    if !distance.is_finite() {
        return Ok(ShortestPath::unreachable());
    }

    let path = reconstruct_path(&search.parents, start_idx, goal_idx)
        .into_iter()
        .map(|idx| graph.name(idx).to_string())
        .collect();

    Ok(ShortestPath { path, distance })
}

/// Shortest distance from `start` to every reachable vertex.
pub fn dijkstra_distances(graph: &WeightedGraph, start: &str) -> Result<HashMap<String, f64>> {
    let start_idx = graph.require_vertex(start)?;
    let search = dijkstra(graph, start_idx, None);

    Ok(search
        .distances
        .iter()
        .enumerate()
        .filter(|(_, distance)| distance.is_finite())
        .map(|(idx, distance)| (graph.name(idx).to_string(), *distance))
        .collect())
}

/// Breadth-first traversal assigning each vertex, on first discovery, its
/// parent's distance plus the discovering edge's weight.
pub fn bfs_distances(graph: &WeightedGraph, start: &str) -> Result<HashMap<String, f64>> {
    let start_idx = graph.require_vertex(start)?;

    let mut distances: Vec<Option<f64>> = vec![None; graph.vertex_count()];
    let mut queue = VecDeque::new();

    distances[start_idx] = Some(0.0);
    queue.push_back(start_idx);

    while let Some(current) = queue.pop_front() {
        let base = distances[current].unwrap_or_default();
        for edge in graph.neighbours(current) {
            if distances[edge.target].is_some() {
                continue;
            }
            distances[edge.target] = Some(base + edge.weight);
            queue.push_back(edge.target);
        }
    }

    Ok(distances
        .into_iter()
        .enumerate()
        .filter_map(|(idx, distance)| distance.map(|d| (graph.name(idx).to_string(), d)))
        .collect())
}

struct Search {
    distances: Vec<f64>,
    parents: Vec<Option<usize>>,
}

fn dijkstra(graph: &WeightedGraph, start: usize, goal: Option<usize>) -> Search {
    let mut distances = vec![f64::INFINITY; graph.vertex_count()];
    let mut parents: Vec<Option<usize>> = vec![None; graph.vertex_count()];
    let mut settled = vec![false; graph.vertex_count()];
    let mut queue = BinaryHeap::new();

    distances[start] = 0.0;
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        if settled[entry.node] {
            continue;
        }
        settled[entry.node] = true;

        if Some(entry.node) == goal {
            break;
        }

        let current_distance = distances[entry.node];
        for edge in graph.neighbours(entry.node) {
            if settled[edge.target] {
                continue;
            }
            let next_cost = current_distance + edge.weight;
            if next_cost < distances[edge.target] {
                distances[edge.target] = next_cost;
                parents[edge.target] = Some(entry.node);
                queue.push(QueueEntry::new(edge.target, next_cost));
            }
        }
    }

    Search {
        distances,
        parents,
    }
}

fn reconstruct_path(parents: &[Option<usize>], start: usize, goal: usize) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents[node];
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: usize,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: usize, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
