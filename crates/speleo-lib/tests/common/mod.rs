//! Shared cave builders and fixture helpers for the integration tests.

use std::path::PathBuf;

use speleo_lib::{load_cave, Cave, Shot, Survey};

/// Path to the fixtures directory shared with the CLI tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Load and rebuild a fixture snapshot by file name.
#[allow(dead_code)]
pub fn fixture_cave(name: &str) -> Cave {
    load_cave(&fixtures_dir().join(name)).expect("fixture loads")
}

/// Right-angle triangle A -> B -> C -> A anchored at the origin.
#[allow(dead_code)]
pub fn triangle_survey() -> Survey {
    Survey::new(
        "main",
        vec![
            Shot::center(0, "A", "B", 10.0, 0.0, 0.0),
            Shot::center(1, "B", "C", 10.0, 90.0, 0.0),
            Shot::center(2, "C", "A", 14.14, 225.0, 0.0),
        ],
    )
}

/// Unresolved triangle cave; call `rebuild` before querying it.
#[allow(dead_code)]
pub fn triangle_cave() -> Cave {
    let mut cave = Cave::new("Triangle");
    cave.surveys.push(triangle_survey());
    cave
}

/// Square grid of `size * size` stations named `r{row}c{col}`, joined to
/// their east and north neighbours by 5 m level shots.
#[allow(dead_code)]
pub fn grid_survey(name: &str, size: usize) -> Survey {
    let mut shots = Vec::new();
    for row in 0..size {
        for col in 0..size {
            let here = format!("r{row}c{col}");
            if col + 1 < size {
                let id = shots.len();
                shots.push(Shot::center(id, &here, format!("r{row}c{}", col + 1), 5.0, 90.0, 0.0));
            }
            if row + 1 < size {
                let id = shots.len();
                shots.push(Shot::center(id, &here, format!("r{}c{col}", row + 1), 5.0, 0.0, 0.0));
            }
        }
    }
    Survey::new(name, shots)
}

#[allow(dead_code)]
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} +/- {tolerance}, got {actual}"
    );
}
