//! Speleo library entry points.
//!
//! This crate resolves chained cave-survey shots into a consistent 3D
//! station network and answers graph queries over it: shortest sections
//! between stations, fundamental loops, and color ramps for rendering.
//! Higher-level consumers (the CLI, renderers, editors) should only depend
//! on the functions exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod cave;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod model;
pub mod output;
pub mod path;
pub mod resolver;
pub mod section;
pub mod snapshot;
pub mod vector;

pub use cave::{Cave, CaveResolution};
pub use color::{colors_by_depth, colors_by_distance, segment_colors, Color, SegmentColor, ZRange};
pub use config::{default_config_path, load_config, ColorMode, RenderConfig, CONFIG_ENV_VAR};
pub use error::{Error, Result};
pub use geometry::CaveGeometry;
pub use graph::{build_graph, Edge, WeightedGraph};
pub use model::{
    Shot, ShotId, ShotType, StartPoint, StationMap, StationType, Survey, SurveyAlias,
    SurveyStation,
};
pub use output::{CycleSummary, RenderMode, ResolutionReport, SectionSummary, StationRow};
pub use path::{bfs_distances, dijkstra_distances, shortest_path, DistanceMode, ShortestPath};
pub use resolver::{resolve_survey, splay_station_name, AliasIndex, SurveyResolution};
pub use section::{get_cycles, get_section, get_segments, Cycle, Section};
pub use snapshot::{load_cave, load_cave_resolved, read_cave_json, read_shot_table};
pub use vector::{degrees_to_radians, Vector3};
