use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vector::{degrees_to_radians, Vector3};

/// Identifier of a shot, unique within its survey.
pub type ShotId = usize;

/// Minimum similarity score for a station name to be offered as a suggestion.
const FUZZY_MATCH_THRESHOLD: f64 = 0.75;

/// Kind of measured leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShotType {
    /// Connects two named stations and forms the backbone graph.
    #[default]
    Center,
    /// One-ended wall detail measurement from a named station.
    Splay,
}

/// A single measured leg: slope distance, azimuth and inclination in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shot {
    pub id: ShotId,
    #[serde(rename = "type", default)]
    pub kind: ShotType,
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    pub length: f64,
    pub azimuth: f64,
    pub clino: f64,
    #[serde(default)]
    pub processed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_alias: Option<String>,
}

impl Shot {
    /// Centerline shot between two named stations.
    pub fn center(
        id: ShotId,
        from: impl Into<String>,
        to: impl Into<String>,
        length: f64,
        azimuth: f64,
        clino: f64,
    ) -> Self {
        Self {
            id,
            kind: ShotType::Center,
            from: from.into(),
            to: Some(to.into()),
            length,
            azimuth,
            clino,
            processed: false,
            from_alias: None,
            to_alias: None,
        }
    }

    /// Splay shot from a named station to an anonymous wall point.
    pub fn splay(
        id: ShotId,
        from: impl Into<String>,
        length: f64,
        azimuth: f64,
        clino: f64,
    ) -> Self {
        Self {
            id,
            kind: ShotType::Splay,
            from: from.into(),
            to: None,
            length,
            azimuth,
            clino,
            processed: false,
            from_alias: None,
            to_alias: None,
        }
    }

    pub fn is_splay(&self) -> bool {
        self.kind == ShotType::Splay
    }

    /// Displacement from the `from` station to the `to` station.
    pub fn displacement(&self) -> Vector3 {
        Vector3::from_polar(
            self.length,
            degrees_to_radians(self.azimuth),
            degrees_to_radians(self.clino),
        )
    }

    /// Station the shot starts from once resolved (its alias partner when one was used).
    pub fn resolved_from(&self) -> &str {
        self.from_alias.as_deref().unwrap_or(&self.from)
    }

    /// Reject readings that would poison station positions with NaN or infinity.
    pub fn validate(&self, survey: &str) -> Result<()> {
        let invalid = |message: String| Error::InvalidShot {
            survey: survey.to_string(),
            shot: self.id,
            message,
        };

        for (field, value) in [
            ("length", self.length),
            ("azimuth", self.azimuth),
            ("clino", self.clino),
        ] {
            if !value.is_finite() {
                return Err(invalid(format!("{field} must be finite, got {value}")));
            }
        }
        if self.length < 0.0 {
            return Err(invalid(format!(
                "length must not be negative, got {}",
                self.length
            )));
        }
        if !(-90.0..=90.0).contains(&self.clino) {
            return Err(invalid(format!(
                "clino must be between -90 and 90, got {}",
                self.clino
            )));
        }
        if self.from.trim().is_empty() {
            return Err(invalid("from station name is empty".to_string()));
        }
        if self.kind == ShotType::Center
            && self.to.as_deref().is_none_or(|to| to.trim().is_empty())
        {
            return Err(invalid("center shot has no to station".to_string()));
        }
        Ok(())
    }

    pub(crate) fn reset_resolution(&mut self) {
        self.processed = false;
        self.from_alias = None;
        self.to_alias = None;
    }
}

/// Kind of a resolved station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationType {
    Center,
    Splay,
}

impl From<ShotType> for StationType {
    fn from(kind: ShotType) -> Self {
        match kind {
            ShotType::Center => StationType::Center,
            ShotType::Splay => StationType::Splay,
        }
    }
}

/// A station with a resolved absolute position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyStation {
    #[serde(rename = "type")]
    pub kind: StationType,
    pub position: Vector3,
    pub survey: String,
}

/// Declared equivalence between two station names from different surveys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurveyAlias {
    pub from: String,
    pub to: String,
}

impl SurveyAlias {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.from == name || self.to == name
    }

    /// The other side of the pair when `name` is one of its members.
    pub fn partner(&self, name: &str) -> Option<&str> {
        if self.from == name {
            Some(&self.to)
        } else if self.to == name {
            Some(&self.from)
        } else {
            None
        }
    }
}

/// Explicit anchor for a survey.
///
/// When `station` is omitted the survey's first shot `from` station is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    pub position: Vector3,
}

impl StartPoint {
    pub fn new(station: impl Into<String>, position: Vector3) -> Self {
        Self {
            station: Some(station.into()),
            position,
        }
    }

    /// Anchor placed on the first shot's `from` station.
    pub fn at(position: Vector3) -> Self {
        Self {
            station: None,
            position,
        }
    }
}

/// Ordered shots sharing one local naming scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub name: String,
    #[serde(default)]
    pub shots: Vec<Shot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<StartPoint>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub orphan_shot_ids: BTreeSet<ShotId>,
    #[serde(default)]
    pub isolated: bool,
}

fn default_visible() -> bool {
    true
}

impl Survey {
    pub fn new(name: impl Into<String>, shots: Vec<Shot>) -> Self {
        Self {
            name: name.into(),
            shots,
            start: None,
            visible: true,
            orphan_shot_ids: BTreeSet::new(),
            isolated: false,
        }
    }

    pub fn with_start(mut self, start: StartPoint) -> Self {
        self.start = Some(start);
        self
    }

    pub fn shot(&self, id: ShotId) -> Option<&Shot> {
        self.shots.iter().find(|shot| shot.id == id)
    }

    /// Validate every shot, failing on the first malformed reading or
    /// repeated shot id.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for shot in &self.shots {
            shot.validate(&self.name)?;
            if !seen.insert(shot.id) {
                return Err(Error::InvalidShot {
                    survey: self.name.clone(),
                    shot: shot.id,
                    message: "shot id is used more than once".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Merged station map of a cave keyed by station name.
///
/// Backed by a `BTreeMap` so iteration order, and anything rendered from it,
/// is stable across rebuilds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationMap {
    stations: BTreeMap<String, SurveyStation>,
}

impl StationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&SurveyStation> {
        self.stations.get(name)
    }

    pub fn position(&self, name: &str) -> Option<Vector3> {
        self.stations.get(name).map(|station| station.position)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stations.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, station: SurveyStation) {
        self.stations.insert(name.into(), station);
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn clear(&mut self) {
        self.stations.clear();
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, SurveyStation> {
        self.stations.iter()
    }

    /// Stations owned by a given survey.
    pub fn by_survey<'a>(
        &'a self,
        survey: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a SurveyStation)> + 'a {
        self.stations
            .iter()
            .filter(move |(_, station)| station.survey == survey)
    }

    /// Lookup a station or fail with fuzzy suggestions.
    pub fn require(&self, name: &str) -> Result<&SurveyStation> {
        self.stations.get(name).ok_or_else(|| Error::UnknownStation {
            name: name.to_string(),
            suggestions: self.fuzzy_matches(name, 3),
        })
    }

    /// Station names similar to `query`, best match first.
    pub fn fuzzy_matches(&self, query: &str, limit: usize) -> Vec<String> {
        fuzzy_matches(self.stations.keys().map(String::as_str), query, limit)
    }
}

impl<'a> IntoIterator for &'a StationMap {
    type Item = (&'a String, &'a SurveyStation);
    type IntoIter = btree_map::Iter<'a, String, SurveyStation>;

    fn into_iter(self) -> Self::IntoIter {
        self.stations.iter()
    }
}

/// Rank candidate names by similarity to `query` using Jaro-Winkler and
/// normalised Levenshtein scores, keeping those above the match threshold.
pub(crate) fn fuzzy_matches<'a>(
    candidates: impl Iterator<Item = &'a str>,
    query: &str,
    limit: usize,
) -> Vec<String> {
    let needle = query.to_lowercase();
    let mut scored: Vec<(f64, &str)> = candidates
        .map(|candidate| {
            let haystack = candidate.to_lowercase();
            let score = strsim::jaro_winkler(&needle, &haystack)
                .max(strsim::normalized_levenshtein(&needle, &haystack));
            (score, candidate)
        })
        .filter(|(score, _)| *score >= FUZZY_MATCH_THRESHOLD)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.to_string())
        .collect()
}
