//! Loading cave snapshots produced by external importers.
//!
//! Two layouts are understood:
//!
//! - `.json`: a serialised [`Cave`]. Derived fields (stations, orphan ids,
//!   shot resolution flags) may be present but are recomputed.
//! - `.csv` / `.tsv` / `.txt`: a delimited shot table with the columns
//!   `from, to, length, azimuth, clino[, type]`. An empty or `-` `to` marks a
//!   splay. Lines starting with `#` are comments and a leading header row is
//!   skipped. The table becomes a single survey named after the file stem.
//!
//! Every shot is validated on the way in so malformed readings never reach
//! the resolver.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::cave::{Cave, CaveResolution};
use crate::error::{Error, Result};
use crate::model::{Shot, ShotType, Survey};

/// Load a cave snapshot and rebuild its station network.
pub fn load_cave(path: &Path) -> Result<Cave> {
    load_cave_resolved(path).map(|(cave, _)| cave)
}

/// Like [`load_cave`], also returning the per-survey outcome of the rebuild.
pub fn load_cave_resolved(path: &Path) -> Result<(Cave, CaveResolution)> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let mut cave = match extension.as_deref() {
        Some("json") => read_cave_json(BufReader::new(File::open(path)?))?,
        Some(ext @ ("csv" | "tsv" | "txt")) => {
            let delimiter = if ext == "csv" { b',' } else { b'\t' };
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("survey")
                .to_string();
            let survey = read_shot_table(File::open(path)?, &name, delimiter)?;
            let mut cave = Cave::new(name);
            cave.surveys.push(survey);
            cave
        }
        _ => {
            return Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    debug!(
        path = %path.display(),
        surveys = cave.surveys.len(),
        "loaded cave snapshot"
    );
    let resolution = cave.rebuild()?;
    Ok((cave, resolution))
}

/// Parse and validate a JSON cave snapshot without resolving it.
pub fn read_cave_json<R: Read>(reader: R) -> Result<Cave> {
    let cave: Cave = serde_json::from_reader(reader)?;
    for survey in &cave.surveys {
        survey.validate()?;
    }
    Ok(cave)
}

/// Parse and validate a delimited shot table into a survey.
///
/// Shot ids are assigned sequentially from zero in table order.
pub fn read_shot_table<R: Read>(reader: R, survey: &str, delimiter: u8) -> Result<Survey> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut shots = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if row == 0 && is_header(&record) {
            continue;
        }
        let shot = parse_row(&record, shots.len(), survey)?;
        shot.validate(survey)?;
        shots.push(shot);
    }

    Ok(Survey::new(survey, shots))
}

fn is_header(record: &StringRecord) -> bool {
    (2..5).all(|idx| {
        record
            .get(idx)
            .is_some_and(|value| value.parse::<f64>().is_err())
    })
}

fn parse_row(record: &StringRecord, id: usize, survey: &str) -> Result<Shot> {
    let invalid = |message: String| Error::InvalidShot {
        survey: survey.to_string(),
        shot: id,
        message,
    };
    if record.len() < 5 {
        return Err(invalid(format!(
            "expected at least 5 columns, found {}",
            record.len()
        )));
    }

    let number = |idx: usize, field: &str| -> Result<f64> {
        let raw = &record[idx];
        raw.parse::<f64>()
            .map_err(|_| invalid(format!("{field} is not a number: {raw:?}")))
    };

    let from = record[0].to_string();
    let to = match &record[1] {
        "" | "-" => None,
        name => Some(name.to_string()),
    };
    let length = number(2, "length")?;
    let azimuth = number(3, "azimuth")?;
    let clino = number(4, "clino")?;

    let kind = match record.get(5).map(str::to_ascii_lowercase).as_deref() {
        Some("splay") => ShotType::Splay,
        Some("center") => ShotType::Center,
        Some("") | None if to.is_some() => ShotType::Center,
        Some("") | None => ShotType::Splay,
        Some(other) => return Err(invalid(format!("unknown shot type {other:?}"))),
    };

    match (kind, to) {
        (ShotType::Center, Some(to)) => Ok(Shot::center(id, from, to, length, azimuth, clino)),
        (ShotType::Center, None) => Err(invalid("center shot has no to station".to_string())),
        (ShotType::Splay, _) => Ok(Shot::splay(id, from, length, azimuth, clino)),
    }
}
