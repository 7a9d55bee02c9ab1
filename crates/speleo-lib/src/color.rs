//! Per-segment color ramps for rendering.
//!
//! Gradients are computed per resolved shot of the visible surveys. Splay
//! segments take the color of the station they hang from on both ends.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cave::Cave;
use crate::config::{ColorMode, RenderConfig};
use crate::error::{Error, Result};
use crate::graph::build_graph;
use crate::model::{Shot, ShotId, ShotType, StationMap, StationType, Survey};
use crate::path::DistanceMode;

/// RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` literal (the leading `#` is optional).
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor {
            value: value.to_string(),
        };
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|_| invalid())
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(&self) -> String {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    /// Linear interpolation; `t` is clamped to `0.0..=1.0`.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Colors at both ends of one rendered shot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentColor {
    pub survey: String,
    pub shot: ShotId,
    pub kind: ShotType,
    pub from: Color,
    pub to: Color,
}

/// Vertical extent of a set of stations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZRange {
    pub min: f64,
    pub max: f64,
}

impl ZRange {
    /// Extent of the centerline stations of visible surveys, or `None` when
    /// nothing is positioned.
    pub fn of(cave: &Cave) -> Option<Self> {
        let visible: Vec<&str> = cave.visible_surveys().map(|s| s.name.as_str()).collect();
        Self::of_stations(&cave.stations, |survey| visible.contains(&survey))
    }

    /// Extent of the centerline stations accepted by `include`.
    pub fn of_stations(stations: &StationMap, include: impl Fn(&str) -> bool) -> Option<Self> {
        stations
            .iter()
            .filter(|(_, station)| station.kind == StationType::Center)
            .filter(|(_, station)| include(&station.survey))
            .map(|(_, station)| station.position.z)
            .filter(|z| z.is_finite())
            .fold(None, |range: Option<Self>, z| {
                Some(match range {
                    Some(range) => Self {
                        min: range.min.min(z),
                        max: range.max.max(z),
                    },
                    None => Self { min: z, max: z },
                })
            })
    }

    /// Normalised depth below `max`: 0 at the top, 1 at the bottom.
    pub fn depth_ratio(&self, z: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            0.0
        } else {
            ((self.max - z) / span).clamp(0.0, 1.0)
        }
    }
}

/// Gradient from `start` at the highest station to `end` at the lowest.
pub fn colors_by_depth(cave: &Cave, range: ZRange, start: Color, end: Color) -> Vec<SegmentColor> {
    segment_ramp(cave, |name| {
        cave.stations
            .position(name)
            .map(|position| range.depth_ratio(position.z))
    })
    .into_iter()
    .map(|(survey, shot, from_t, to_t)| SegmentColor {
        survey: survey.name.clone(),
        shot: shot.id,
        kind: shot.kind,
        from: start.lerp(&end, from_t),
        to: start.lerp(&end, to_t),
    })
    .collect()
}

/// Gradient from `start` at `reference` to `end` at the farthest station,
/// with distances measured along the centerline graph.
///
/// Stations not connected to `reference` take the `end` color.
pub fn colors_by_distance(
    cave: &Cave,
    reference: &str,
    start: Color,
    end: Color,
    mode: DistanceMode,
) -> Result<Vec<SegmentColor>> {
    let graph = build_graph(cave)?;
    let distances = graph.distances(reference, mode)?;
    let max = distances.values().copied().fold(0.0_f64, f64::max);
    debug!(reference, ?mode, max, "computed distance ramp");

    let ratio = |name: &str| -> Option<f64> {
        Some(match distances.get(name) {
            Some(_) if max <= 0.0 => 0.0,
            Some(distance) => distance / max,
            None => 1.0,
        })
    };

    Ok(segment_ramp(cave, ratio)
        .into_iter()
        .map(|(survey, shot, from_t, to_t)| SegmentColor {
            survey: survey.name.clone(),
            shot: shot.id,
            kind: shot.kind,
            from: start.lerp(&end, from_t),
            to: start.lerp(&end, to_t),
        })
        .collect())
}

/// Colors for every visible resolved shot according to `config`.
pub fn segment_colors(cave: &Cave, config: &RenderConfig) -> Result<Vec<SegmentColor>> {
    match config.color_mode {
        ColorMode::Global => Ok(flat_colors(cave, |_| config.global_color)),
        ColorMode::PerCave => Ok(flat_colors(cave, |_| config.cave_color)),
        ColorMode::PerSurvey => Ok(flat_colors(cave, |survey| {
            config
                .survey_colors
                .get(&survey.name)
                .copied()
                .unwrap_or(config.global_color)
        })),
        ColorMode::GradientByZ => Ok(match ZRange::of(cave) {
            Some(range) => {
                colors_by_depth(cave, range, config.gradient_start, config.gradient_end)
            }
            None => Vec::new(),
        }),
        ColorMode::GradientByDistance => {
            let reference = match config.distance_reference.as_deref() {
                Some(name) => name.to_string(),
                None => match default_reference(cave) {
                    Some(name) => name,
                    None => return Ok(Vec::new()),
                },
            };
            colors_by_distance(
                cave,
                &reference,
                config.gradient_start,
                config.gradient_end,
                config.distance_mode,
            )
        }
    }
}

/// First positioned centerline station of the first visible survey.
fn default_reference(cave: &Cave) -> Option<String> {
    cave.visible_surveys()
        .flat_map(|survey| survey.shots.iter())
        .filter(|shot| shot.processed && shot.kind == ShotType::Center)
        .map(|shot| shot.resolved_from().to_string())
        .next()
}

fn flat_colors(cave: &Cave, color: impl Fn(&Survey) -> Color) -> Vec<SegmentColor> {
    resolved_shots(cave)
        .map(|(survey, shot)| {
            let c = color(survey);
            SegmentColor {
                survey: survey.name.clone(),
                shot: shot.id,
                kind: shot.kind,
                from: c,
                to: c,
            }
        })
        .collect()
}

fn resolved_shots(cave: &Cave) -> impl Iterator<Item = (&Survey, &Shot)> {
    cave.visible_surveys().flat_map(|survey| {
        survey
            .shots
            .iter()
            .filter(|shot| shot.processed)
            .map(move |shot| (survey, shot))
    })
}

/// Interpolation parameters at both ends of each visible resolved shot.
/// Shots whose endpoints have no ratio are skipped.
fn segment_ramp<'a>(
    cave: &'a Cave,
    ratio: impl Fn(&str) -> Option<f64>,
) -> Vec<(&'a Survey, &'a Shot, f64, f64)> {
    let mut cache: HashMap<String, Option<f64>> = HashMap::new();
    let mut lookup = |name: &str| -> Option<f64> {
        if let Some(value) = cache.get(name) {
            return *value;
        }
        let value = ratio(name);
        cache.insert(name.to_string(), value);
        value
    };

    let mut ramp = Vec::new();
    for (survey, shot) in resolved_shots(cave) {
        let Some(from_t) = lookup(shot.resolved_from()) else {
            continue;
        };
        let to_t = match shot.kind {
            ShotType::Splay => from_t,
            ShotType::Center => {
                let Some(to) = shot.resolved_to(&survey.name) else {
                    continue;
                };
                let Some(to_t) = lookup(&to) else {
                    continue;
                };
                to_t
            }
        };
        ramp.push((survey, shot, from_t, to_t));
    }
    ramp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_format_round_trip() {
        let color = Color::parse("#ff8000").expect("valid color");
        assert_eq!(color.r, 1.0);
        assert!((color.g - 128.0 / 255.0).abs() < 1e-12);
        assert_eq!(color.b, 0.0);
        assert_eq!(color.to_hex(), "#ff8000");
        assert_eq!(Color::parse("00FF00").unwrap().to_hex(), "#00ff00");
    }

    #[test]
    fn parse_rejects_malformed_literals() {
        for value in ["", "#fff", "#gg0000", "#1234567", "#ééé"] {
            assert!(
                matches!(Color::parse(value), Err(Error::InvalidColor { .. })),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn lerp_clamps_parameter() {
        let black = Color::new(0.0, 0.0, 0.0);
        assert_eq!(black.lerp(&Color::WHITE, 0.5), Color::new(0.5, 0.5, 0.5));
        assert_eq!(black.lerp(&Color::WHITE, 2.0), Color::WHITE);
        assert_eq!(black.lerp(&Color::WHITE, -1.0), black);
        assert_eq!(black.lerp(&Color::WHITE, f64::NAN), black);
    }

    #[test]
    fn depth_ratio_handles_flat_range() {
        let flat = ZRange { min: 3.0, max: 3.0 };
        assert_eq!(flat.depth_ratio(3.0), 0.0);

        let range = ZRange {
            min: -10.0,
            max: 10.0,
        };
        assert_eq!(range.depth_ratio(10.0), 0.0);
        assert_eq!(range.depth_ratio(0.0), 0.5);
        assert_eq!(range.depth_ratio(-10.0), 1.0);
    }

    #[test]
    fn color_serializes_as_hex_string() {
        let json = serde_json::to_string(&Color::new(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let parsed: Color = serde_json::from_str("\"#0000ff\"").unwrap();
        assert_eq!(parsed, Color::new(0.0, 0.0, 1.0));
    }
}
