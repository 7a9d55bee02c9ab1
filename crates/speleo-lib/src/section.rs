//! Section and loop queries over the centerline graph.
//!
//! A section is the shortest connecting path between two stations. Loops are
//! reported as fundamental cycles of a breadth-first spanning forest: every
//! edge left out of the forest closes exactly one cycle with the tree path
//! between its endpoints, so a connected component with `V` stations and `E`
//! shots yields `E - V + 1` cycles.

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::WeightedGraph;
use crate::model::StationMap;

/// Shortest connecting path between two named stations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub from: String,
    pub to: String,
    pub path: Vec<String>,
    pub distance: f64,
}

impl Section {
    /// A section is usable only when a finite path was found.
    pub fn is_complete(&self) -> bool {
        !self.path.is_empty() && self.distance.is_finite()
    }
}

/// Independent loop of the survey graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cycle {
    pub id: String,
    /// Stations along the loop; the first station is repeated at the end.
    pub path: Vec<String>,
    pub distance: f64,
}

/// Shortest path between `from` and `to`.
///
/// Unknown station names are an error; an unreachable station yields an
/// incomplete section.
pub fn get_section(graph: &WeightedGraph, from: &str, to: &str) -> Result<Section> {
    let result = graph.shortest_path(from, to)?;
    Ok(Section {
        from: from.to_string(),
        to: to.to_string(),
        path: result.path,
        distance: result.distance,
    })
}

/// Flatten a section into `x0,y0,z0,x1,y1,z1` coordinates, one group per
/// consecutive station pair. Pairs with an unpositioned station are skipped.
pub fn get_segments(section: &Section, stations: &StationMap) -> Vec<f64> {
    let mut segments = Vec::with_capacity(section.path.len().saturating_sub(1) * 6);
    for pair in section.path.windows(2) {
        let (Some(a), Some(b)) = (stations.position(&pair[0]), stations.position(&pair[1])) else {
            continue;
        };
        segments.extend_from_slice(&a.to_array());
        segments.extend_from_slice(&b.to_array());
    }
    segments
}

/// Enumerate fundamental cycles.
///
/// Cycle ids are derived from the closing edge's id, which follows shot
/// order, so they stay stable while the shot list is unchanged.
pub fn get_cycles(graph: &WeightedGraph) -> Result<Vec<Cycle>> {
    if graph.edge_count() == 0 {
        return Err(Error::EmptyGraph);
    }

    let forest = SpanningForest::build(graph);
    let mut cycles = Vec::new();

    for (id, a, b, weight) in graph.edges() {
        if forest.tree_edges[id] {
            continue;
        }
        let (path, tree_distance) = forest.tree_path(a, b);
        let mut names: Vec<String> = path
            .into_iter()
            .map(|idx| graph.name(idx).to_string())
            .collect();
        names.push(graph.name(a).to_string());

        cycles.push(Cycle {
            id: format!("cycle-{id}"),
            path: names,
            distance: tree_distance + weight,
        });
    }

    debug!(
        cycles = cycles.len(),
        components = forest.components,
        "enumerated fundamental cycles"
    );
    Ok(cycles)
}

struct SpanningForest {
    /// Parent vertex and the weight of the tree edge leading to it.
    parents: Vec<Option<(usize, f64)>>,
    depths: Vec<usize>,
    tree_edges: Vec<bool>,
    components: usize,
}

impl SpanningForest {
    fn build(graph: &WeightedGraph) -> Self {
        let count = graph.vertex_count();
        let mut parents = vec![None; count];
        let mut depths = vec![0; count];
        let mut visited = vec![false; count];
        let mut tree_edges = vec![false; graph.edge_count()];
        let mut components = 0;
        let mut queue = std::collections::VecDeque::new();

        for root in 0..count {
            if visited[root] {
                continue;
            }
            components += 1;
            visited[root] = true;
            queue.push_back(root);

            while let Some(current) = queue.pop_front() {
                for edge in graph.neighbours(current) {
                    if visited[edge.target] {
                        continue;
                    }
                    visited[edge.target] = true;
                    parents[edge.target] = Some((current, edge.weight));
                    depths[edge.target] = depths[current] + 1;
                    tree_edges[edge.id] = true;
                    queue.push_back(edge.target);
                }
            }
        }

        Self {
            parents,
            depths,
            tree_edges,
            components,
        }
    }

    /// Tree path from `a` to `b` through their lowest common ancestor, with
    /// its total weight.
    fn tree_path(&self, a: usize, b: usize) -> (Vec<usize>, f64) {
        let mut left = vec![a];
        let mut right = vec![b];
        let mut distance = 0.0;
        let (mut u, mut v) = (a, b);

        while u != v {
            let step_left = self.depths[u] >= self.depths[v];
            let node = if step_left { u } else { v };
            let Some((parent, weight)) = self.parents[node] else {
                break;
            };
            distance += weight;
            if step_left {
                u = parent;
                left.push(parent);
            } else {
                v = parent;
                right.push(parent);
            }
        }

        right.pop();
        left.extend(right.into_iter().rev());
        (left, distance)
    }
}
