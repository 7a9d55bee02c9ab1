use std::collections::HashMap;

use tracing::debug;

use crate::cave::Cave;
use crate::error::{Error, Result};
use crate::model::{fuzzy_matches, ShotType};

/// Edge within the survey graph. Edges are undirected and stored in the
/// adjacency list of both endpoints under the same `id`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub id: usize,
    pub target: usize,
    pub weight: f64,
}

/// Labelled, undirected, weighted graph used for section and loop queries.
///
/// Vertices are addressed by dense indices assigned in insertion order, which
/// keeps traversal order (and therefore query results) deterministic.
#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    names: Vec<String>,
    index: HashMap<String, usize>,
    adjacency: Vec<Vec<Edge>>,
    edge_count: usize,
}

impl WeightedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex if absent and return its index.
    pub fn add_vertex(&mut self, name: &str) -> usize {
        if let Some(&existing) = self.index.get(name) {
            return existing;
        }
        let idx = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        self.adjacency.push(Vec::new());
        idx
    }

    /// Insert an undirected edge, creating missing endpoints. Returns the edge id.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: f64) -> Result<usize> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidEdgeWeight {
                from: a.to_string(),
                to: b.to_string(),
                weight,
            });
        }

        let from = self.add_vertex(a);
        let to = self.add_vertex(b);
        let id = self.edge_count;
        self.adjacency[from].push(Edge {
            id,
            target: to,
            weight,
        });
        if from != to {
            self.adjacency[to].push(Edge {
                id,
                target: from,
                weight,
            });
        }
        self.edge_count += 1;
        Ok(id)
    }

    pub fn vertex_count(&self) -> usize {
        self.names.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn vertex_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Resolve a vertex index or fail with fuzzy suggestions.
    pub fn require_vertex(&self, name: &str) -> Result<usize> {
        self.vertex_index(name).ok_or_else(|| Error::UnknownStation {
            name: name.to_string(),
            suggestions: fuzzy_matches(self.names.iter().map(String::as_str), name, 3),
        })
    }

    pub fn name(&self, idx: usize) -> &str {
        &self.names[idx]
    }

    /// Vertex names in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Return the neighbours for a given vertex index.
    pub fn neighbours(&self, idx: usize) -> &[Edge] {
        self.adjacency.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Each edge once as `(id, a, b, weight)`, ordered by id.
    pub fn edges(&self) -> Vec<(usize, usize, usize, f64)> {
        let mut edges = Vec::with_capacity(self.edge_count);
        for (from, list) in self.adjacency.iter().enumerate() {
            for edge in list {
                if from <= edge.target {
                    edges.push((edge.id, from, edge.target, edge.weight));
                }
            }
        }
        edges.sort_by_key(|(id, ..)| *id);
        edges
    }
}

/// Build the centerline graph of a resolved cave.
///
/// Adds one vertex per resolved centerline station and one edge per resolved
/// centerline shot of every survey, weighted by the shot length. Splays are
/// excluded. Shots resolved through an alias attach to the alias partner so
/// that surveys joined by aliases form a single component.
pub fn build_graph(cave: &Cave) -> Result<WeightedGraph> {
    let mut graph = WeightedGraph::new();

    for (name, station) in cave.stations.iter() {
        if station.kind == crate::model::StationType::Center {
            graph.add_vertex(name);
        }
    }

    for survey in &cave.surveys {
        for shot in &survey.shots {
            if shot.kind != ShotType::Center || !shot.processed {
                continue;
            }
            let Some(to) = shot.to_alias.as_deref().or(shot.to.as_deref()) else {
                continue;
            };
            let from = shot.resolved_from();
            if !cave.stations.contains(from) || !cave.stations.contains(to) {
                continue;
            }
            graph.add_edge(from, to, shot.length)?;
        }
    }

    debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "built survey graph"
    );
    Ok(graph)
}
