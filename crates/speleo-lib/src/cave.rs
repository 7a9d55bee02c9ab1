use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::model::{ShotId, StartPoint, StationMap, Survey, SurveyAlias};
use crate::resolver::{resolve_survey, AliasIndex, SurveyResolution};
use crate::vector::Vector3;

/// All surveys of a cave together with the merged station map.
///
/// `stations` is derived data: it is cleared and rebuilt from the surveys,
/// aliases and start position by [`Cave::rebuild`], which every editing
/// method calls before returning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cave {
    pub name: String,
    #[serde(default)]
    pub surveys: Vec<Survey>,
    #[serde(default)]
    pub aliases: Vec<SurveyAlias>,
    #[serde(default)]
    pub start_position: Vector3,
    #[serde(default)]
    pub stations: StationMap,
}

/// Per-survey outcome of a full cave rebuild.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaveResolution {
    pub surveys: Vec<SurveyResolution>,
}

impl CaveResolution {
    /// Orphaned shot ids per survey, skipping surveys without orphans.
    pub fn orphans(&self) -> impl Iterator<Item = (&str, &std::collections::BTreeSet<ShotId>)> {
        self.surveys
            .iter()
            .filter(|survey| !survey.orphan_shot_ids.is_empty())
            .map(|survey| (survey.survey.as_str(), &survey.orphan_shot_ids))
    }

    pub fn orphan_count(&self) -> usize {
        self.surveys
            .iter()
            .map(|survey| survey.orphan_shot_ids.len())
            .sum()
    }

    pub fn isolated_surveys(&self) -> Vec<&str> {
        self.surveys
            .iter()
            .filter(|survey| survey.isolated)
            .map(|survey| survey.survey.as_str())
            .collect()
    }
}

impl Cave {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_start_position(mut self, position: Vector3) -> Self {
        self.start_position = position;
        self
    }

    pub fn survey(&self, name: &str) -> Option<&Survey> {
        self.surveys.iter().find(|survey| survey.name == name)
    }

    pub fn visible_surveys(&self) -> impl Iterator<Item = &Survey> {
        self.surveys.iter().filter(|survey| survey.visible)
    }

    /// Recompute every station position from scratch.
    ///
    /// Surveys are resolved in declaration order against one shared station
    /// map. A survey with its own start point is seeded there; the first
    /// survey otherwise starts at the cave's start position.
    ///
    /// The new state is staged and only written back once every survey has
    /// resolved. On error the cave is left exactly as it was.
    pub fn rebuild(&mut self) -> Result<CaveResolution> {
        let aliases = AliasIndex::new(&self.aliases);
        let cave_start = StartPoint::at(self.start_position);

        let mut staged = self.surveys.clone();
        let mut stations = StationMap::new();
        let mut surveys = Vec::with_capacity(staged.len());
        for (idx, survey) in staged.iter_mut().enumerate() {
            let start = survey
                .start
                .clone()
                .or_else(|| (idx == 0).then(|| cave_start.clone()));
            surveys.push(resolve_survey(
                survey,
                &mut stations,
                &aliases,
                start.as_ref(),
            )?);
        }

        self.surveys = staged;
        self.stations = stations;

        let resolution = CaveResolution { surveys };
        info!(
            cave = %self.name,
            surveys = resolution.surveys.len(),
            stations = self.stations.len(),
            orphans = resolution.orphan_count(),
            "rebuilt station network"
        );
        Ok(resolution)
    }

    /// Apply `change` to a copy of the cave and rebuild it, replacing `self`
    /// only when both succeed.
    fn edit<F>(&mut self, change: F) -> Result<CaveResolution>
    where
        F: FnOnce(&mut Cave) -> Result<()>,
    {
        let mut next = self.clone();
        change(&mut next)?;
        let resolution = next.rebuild()?;
        *self = next;
        Ok(resolution)
    }

    /// Replace the survey with the same name, or append it, then rebuild.
    pub fn upsert_survey(&mut self, survey: Survey) -> Result<CaveResolution> {
        self.edit(|cave| {
            match cave.surveys.iter_mut().find(|s| s.name == survey.name) {
                Some(existing) => *existing = survey,
                None => cave.surveys.push(survey),
            }
            Ok(())
        })
    }

    /// Remove a survey by name, then rebuild.
    pub fn remove_survey(&mut self, name: &str) -> Result<CaveResolution> {
        self.edit(|cave| {
            let idx = cave.survey_index(name)?;
            cave.surveys.remove(idx);
            Ok(())
        })
    }

    /// Replace the alias list, then rebuild.
    pub fn set_aliases(&mut self, aliases: Vec<SurveyAlias>) -> Result<CaveResolution> {
        self.edit(|cave| {
            cave.aliases = aliases;
            Ok(())
        })
    }

    /// Set or clear a survey's explicit start point, then rebuild.
    pub fn set_survey_start(
        &mut self,
        name: &str,
        start: Option<StartPoint>,
    ) -> Result<CaveResolution> {
        self.edit(|cave| {
            let idx = cave.survey_index(name)?;
            cave.surveys[idx].start = start;
            Ok(())
        })
    }

    /// Move the cave anchor, then rebuild.
    pub fn set_start_position(&mut self, position: Vector3) -> Result<CaveResolution> {
        self.edit(|cave| {
            cave.start_position = position;
            Ok(())
        })
    }

    fn survey_index(&self, name: &str) -> Result<usize> {
        self.surveys
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| Error::UnknownSurvey {
                name: name.to_string(),
            })
    }
}
