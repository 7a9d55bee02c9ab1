use serde::Serialize;

use crate::cave::Cave;
use crate::model::{ShotType, StationType};
use crate::vector::Vector3;

/// Flat line-segment buffers handed to the renderer.
///
/// Each segment occupies six consecutive values: `x0, y0, z0, x1, y1, z1`.
/// Only resolved shots of visible surveys are included.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaveGeometry {
    pub centerline: Vec<f64>,
    pub splays: Vec<f64>,
    /// Centerline station positions of visible surveys, sorted by name.
    pub stations: Vec<(String, Vector3)>,
}

impl CaveGeometry {
    pub fn from_cave(cave: &Cave) -> Self {
        let mut geometry = Self::default();

        for survey in cave.visible_surveys() {
            for shot in survey.shots.iter().filter(|shot| shot.processed) {
                let Some(from) = cave.stations.position(shot.resolved_from()) else {
                    continue;
                };
                let Some(to) = shot
                    .resolved_to(&survey.name)
                    .and_then(|name| cave.stations.position(&name))
                else {
                    continue;
                };
                let buffer = match shot.kind {
                    ShotType::Center => &mut geometry.centerline,
                    ShotType::Splay => &mut geometry.splays,
                };
                buffer.extend_from_slice(&from.to_array());
                buffer.extend_from_slice(&to.to_array());
            }

            geometry.stations.extend(
                cave.stations
                    .by_survey(&survey.name)
                    .filter(|(_, station)| station.kind == StationType::Center)
                    .map(|(name, station)| (name.clone(), station.position)),
            );
        }

        geometry.stations.sort_by(|a, b| a.0.cmp(&b.0));
        geometry
    }

    pub fn centerline_segments(&self) -> usize {
        self.centerline.len() / 6
    }

    pub fn splay_segments(&self) -> usize {
        self.splays.len() / 6
    }
}
