use std::fmt::Write;

use serde::Serialize;

use crate::cave::{Cave, CaveResolution};
use crate::model::StationType;
use crate::resolver::SurveyResolution;
use crate::section::{get_segments, Cycle, Section};

/// Presentation style for turning a report into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    PlainText,
    RichText,
}

/// Resolved station row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StationRow {
    pub name: String,
    pub survey: String,
    #[serde(rename = "type")]
    pub kind: StationType,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Outcome of a cave rebuild in a form the CLI and other consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResolutionReport {
    pub cave: String,
    pub stations: Vec<StationRow>,
    pub surveys: Vec<SurveyResolution>,
}

impl ResolutionReport {
    /// Collect station positions and per-survey flags. Splay leaf stations
    /// are only listed when `include_splays` is set.
    pub fn from_cave(cave: &Cave, resolution: &CaveResolution, include_splays: bool) -> Self {
        let stations = cave
            .stations
            .iter()
            .filter(|(_, station)| include_splays || station.kind == StationType::Center)
            .map(|(name, station)| StationRow {
                name: name.clone(),
                survey: station.survey.clone(),
                kind: station.kind,
                x: station.position.x,
                y: station.position.y,
                z: station.position.z,
            })
            .collect();

        Self {
            cave: cave.name.clone(),
            stations,
            surveys: resolution.surveys.clone(),
        }
    }

    pub fn orphan_count(&self) -> usize {
        self.surveys.iter().map(|s| s.orphan_shot_ids.len()).sum()
    }

    pub fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::PlainText => self.render_plain(),
            RenderMode::RichText => self.render_rich(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Cave {}: {} stations, {} surveys, {} orphaned shots",
            self.cave,
            self.stations.len(),
            self.surveys.len(),
            self.orphan_count()
        );
        for station in &self.stations {
            let _ = writeln!(
                buffer,
                "{:<16} {:>10.2} {:>10.2} {:>10.2}  ({})",
                station.name, station.x, station.y, station.z, station.survey
            );
        }
        for survey in &self.surveys {
            if survey.isolated {
                let _ = writeln!(buffer, "warning: survey {} is isolated", survey.survey);
            } else if !survey.orphan_shot_ids.is_empty() {
                let _ = writeln!(
                    buffer,
                    "warning: survey {} has orphaned shots {}",
                    survey.survey,
                    join_ids(survey)
                );
            }
        }
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "**{}**", self.cave);
        let _ = writeln!(buffer);
        let _ = writeln!(buffer, "| station | survey | x | y | z |");
        let _ = writeln!(buffer, "|---|---|---:|---:|---:|");
        for station in &self.stations {
            let _ = writeln!(
                buffer,
                "| `{}` | {} | {:.2} | {:.2} | {:.2} |",
                station.name, station.survey, station.x, station.y, station.z
            );
        }
        for survey in &self.surveys {
            if survey.isolated {
                let _ = writeln!(buffer, "* ⚠ _{}_ is isolated", survey.survey);
            } else if !survey.orphan_shot_ids.is_empty() {
                let _ = writeln!(
                    buffer,
                    "* ⚠ _{}_ orphaned shots: `{}`",
                    survey.survey,
                    join_ids(survey)
                );
            }
        }
        buffer
    }
}

fn join_ids(survey: &SurveyResolution) -> String {
    survey
        .orphan_shot_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Section query result with the flattened line segments for display.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SectionSummary {
    pub from: String,
    pub to: String,
    pub complete: bool,
    /// `None` when the stations are not connected.
    pub distance: Option<f64>,
    pub legs: usize,
    pub path: Vec<String>,
    pub segments: Vec<f64>,
}

impl SectionSummary {
    pub fn from_section(section: &Section, cave: &Cave) -> Self {
        let complete = section.is_complete();
        Self {
            from: section.from.clone(),
            to: section.to.clone(),
            complete,
            distance: complete.then_some(section.distance),
            legs: section.path.len().saturating_sub(1),
            path: section.path.clone(),
            segments: get_segments(section, &cave.stations),
        }
    }

    pub fn render(&self, mode: RenderMode) -> String {
        let mut buffer = String::new();
        let Some(distance) = self.distance else {
            let _ = writeln!(
                buffer,
                "No connection between {} and {}",
                self.from, self.to
            );
            return buffer;
        };

        match mode {
            RenderMode::PlainText => {
                let _ = writeln!(
                    buffer,
                    "Section {} -> {} ({:.2} m, {} legs)",
                    self.from, self.to, distance, self.legs
                );
                let _ = writeln!(buffer, "{}", self.path.join(" -> "));
            }
            RenderMode::RichText => {
                let _ = writeln!(
                    buffer,
                    "**Section** _{} → {}_ ({:.2} m, {} legs)",
                    self.from, self.to, distance, self.legs
                );
                for (index, station) in self.path.iter().enumerate() {
                    let _ = writeln!(buffer, "* {:>2}. `{}`", index, station);
                }
            }
        }
        buffer
    }
}

/// Fundamental cycles of a cave.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CycleSummary {
    pub cave: String,
    pub count: usize,
    pub cycles: Vec<Cycle>,
}

impl CycleSummary {
    pub fn new(cave: &Cave, cycles: Vec<Cycle>) -> Self {
        Self {
            cave: cave.name.clone(),
            count: cycles.len(),
            cycles,
        }
    }

    pub fn render(&self, mode: RenderMode) -> String {
        let mut buffer = String::new();
        if self.cycles.is_empty() {
            let _ = writeln!(buffer, "Cave {} has no loops", self.cave);
            return buffer;
        }

        let _ = writeln!(buffer, "Cave {}: {} loops", self.cave, self.count);
        for cycle in &self.cycles {
            match mode {
                RenderMode::PlainText => {
                    let _ = writeln!(
                        buffer,
                        "{:<10} {:>10.2} m  {}",
                        cycle.id,
                        cycle.distance,
                        cycle.path.join(" -> ")
                    );
                }
                RenderMode::RichText => {
                    let _ = writeln!(
                        buffer,
                        "* **{}** ({:.2} m): `{}`",
                        cycle.id,
                        cycle.distance,
                        cycle.path.join(" → ")
                    );
                }
            }
        }
        buffer
    }
}
