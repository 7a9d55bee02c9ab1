//! Station network resolution for a single survey.
//!
//! Shots are resolved by fixed-point propagation: every pass walks the
//! remaining unresolved shots in survey order and positions an unknown
//! endpoint whenever the other endpoint (or an alias partner of either) is
//! already known. Resolved shots leave the worklist; the loop stops on the
//! first pass that resolves nothing. Whatever is left is orphaned.
//!
//! Redundant measurements are never reconciled: when both endpoints are
//! already positioned the shot is simply marked resolved.

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{
    Shot, ShotId, ShotType, StartPoint, StationMap, StationType, Survey, SurveyAlias,
    SurveyStation,
};
use crate::vector::Vector3;

/// Alias pairs indexed by station name, built once per rebuild.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    partners: HashMap<String, Vec<String>>,
}

impl AliasIndex {
    pub fn new(aliases: &[SurveyAlias]) -> Self {
        let mut partners: HashMap<String, Vec<String>> = HashMap::new();
        for alias in aliases {
            partners
                .entry(alias.from.clone())
                .or_default()
                .push(alias.to.clone());
            partners
                .entry(alias.to.clone())
                .or_default()
                .push(alias.from.clone());
        }
        Self { partners }
    }

    /// Names declared equivalent to `name`, in alias declaration order.
    pub fn partners(&self, name: &str) -> &[String] {
        self.partners.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First alias partner of `name` that already has a position.
    fn positioned_partner<'a>(
        &'a self,
        name: &str,
        stations: &StationMap,
    ) -> Option<(&'a str, Vector3)> {
        self.partners(name).iter().find_map(|partner| {
            stations
                .position(partner)
                .map(|position| (partner.as_str(), position))
        })
    }
}

/// Outcome of resolving one survey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyResolution {
    pub survey: String,
    pub resolved_shots: usize,
    pub orphan_shot_ids: BTreeSet<ShotId>,
    pub isolated: bool,
    pub stations_added: usize,
    pub passes: usize,
}

impl Shot {
    /// Name of the station this shot ends at once resolved.
    ///
    /// Splays end at a synthetic per-shot station that no other shot can
    /// reference; centerline shots end at their alias partner when one was
    /// used, otherwise at `to`.
    pub fn resolved_to(&self, survey: &str) -> Option<Cow<'_, str>> {
        match self.kind {
            ShotType::Splay => Some(Cow::Owned(splay_station_name(survey, self))),
            ShotType::Center => self
                .to_alias
                .as_deref()
                .or(self.to.as_deref())
                .map(Cow::Borrowed),
        }
    }
}

/// Synthetic leaf station name for a splay shot.
pub fn splay_station_name(survey: &str, shot: &Shot) -> String {
    format!("{}@{}#splay{}", shot.from, survey, shot.id)
}

/// Resolve a survey's shots into absolute station positions.
///
/// `stations` is the running cave-wide map; stations positioned by earlier
/// surveys are visible to this one and new stations are added to it. When
/// `start` is given its position seeds the named station (or the first
/// shot's `from` station). Without a start the survey can only connect
/// through stations or aliases that are already positioned.
///
/// The survey's `orphan_shot_ids` and `isolated` fields, and every shot's
/// resolution flags, are overwritten.
pub fn resolve_survey(
    survey: &mut Survey,
    stations: &mut StationMap,
    aliases: &AliasIndex,
    start: Option<&StartPoint>,
) -> Result<SurveyResolution> {
    let initial_stations = stations.len();
    seed(survey, stations, start)?;

    for shot in &mut survey.shots {
        shot.reset_resolution();
    }

    let mut pending: Vec<usize> = (0..survey.shots.len()).collect();
    let mut passes = 0;
    while !pending.is_empty() {
        passes += 1;
        let before = pending.len();
        let shots = &mut survey.shots;
        pending.retain(|&idx| !try_resolve(&mut shots[idx], &survey.name, stations, aliases));
        if pending.len() == before {
            break;
        }
    }

    let orphan_shot_ids: BTreeSet<ShotId> = pending
        .iter()
        .map(|&idx| survey.shots[idx].id)
        .collect();
    let resolved_shots = survey.shots.len() - pending.len();
    let isolated = !survey.shots.is_empty() && resolved_shots == 0;

    if isolated {
        warn!(
            survey = %survey.name,
            shots = survey.shots.len(),
            "survey is not connected to any positioned station"
        );
    } else if !orphan_shot_ids.is_empty() {
        warn!(
            survey = %survey.name,
            orphans = orphan_shot_ids.len(),
            "survey has unresolved shots"
        );
    }

    survey.orphan_shot_ids = orphan_shot_ids.clone();
    survey.isolated = isolated;

    let resolution = SurveyResolution {
        survey: survey.name.clone(),
        resolved_shots,
        orphan_shot_ids,
        isolated,
        stations_added: stations.len() - initial_stations,
        passes,
    };
    debug!(
        survey = %resolution.survey,
        resolved = resolution.resolved_shots,
        stations = resolution.stations_added,
        passes = resolution.passes,
        "resolved survey"
    );
    Ok(resolution)
}

fn seed(survey: &Survey, stations: &mut StationMap, start: Option<&StartPoint>) -> Result<()> {
    let first_from = survey.shots.first().map(|shot| shot.from.as_str());

    let Some(start) = start else {
        if let Some(name) = first_from.filter(|name| stations.contains(name)) {
            debug!(survey = %survey.name, station = name, "continuing from prior station");
        }
        return Ok(());
    };

    let Some(name) = start.station.as_deref().or(first_from) else {
        return Ok(());
    };

    if let Some(existing) = stations.get(name) {
        if existing.survey != survey.name {
            return Err(Error::DuplicateStation {
                name: name.to_string(),
                survey: survey.name.clone(),
                existing_survey: existing.survey.clone(),
            });
        }
    }

    stations.insert(
        name,
        SurveyStation {
            kind: StationType::Center,
            position: start.position,
            survey: survey.name.clone(),
        },
    );
    Ok(())
}

fn try_resolve(
    shot: &mut Shot,
    survey: &str,
    stations: &mut StationMap,
    aliases: &AliasIndex,
) -> bool {
    let Some(to) = shot.resolved_to(survey).map(Cow::into_owned) else {
        return false;
    };
    let kind = StationType::from(shot.kind);

    match (stations.position(&shot.from), stations.position(&to)) {
        (Some(from_position), None) => {
            place(stations, to, kind, from_position + shot.displacement(), survey);
        }
        (None, Some(to_position)) => {
            place(
                stations,
                shot.from.clone(),
                StationType::Center,
                to_position - shot.displacement(),
                survey,
            );
        }
        (Some(_), Some(_)) => {}
        (None, None) => {
            if let Some((partner, position)) = aliases.positioned_partner(&shot.from, stations) {
                shot.from_alias = Some(partner.to_string());
                place(stations, to, kind, position + shot.displacement(), survey);
            } else if let Some((partner, position)) = (shot.kind == ShotType::Center)
                .then(|| aliases.positioned_partner(&to, stations))
                .flatten()
            {
                shot.to_alias = Some(partner.to_string());
                place(
                    stations,
                    shot.from.clone(),
                    StationType::Center,
                    position - shot.displacement(),
                    survey,
                );
            } else {
                return false;
            }
        }
    }

    shot.processed = true;
    true
}

fn place(
    stations: &mut StationMap,
    name: String,
    kind: StationType,
    position: Vector3,
    survey: &str,
) {
    stations.insert(
        name,
        SurveyStation {
            kind,
            position,
            survey: survey.to_string(),
        },
    );
}
