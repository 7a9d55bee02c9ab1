//! Colors command handler: per-segment color ramps for rendering.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use speleo_lib::{load_config, segment_colors, Color, ColorMode, DistanceMode, RenderConfig};

use speleo_cli::output::{format_colors_text, print_json, OutputFormat};
use speleo_cli::terminal::ColorPalette;

use super::load_snapshot;

/// Color mode accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorModeArg {
    Global,
    Depth,
    Distance,
    Cave,
    Survey,
}

impl From<ColorModeArg> for ColorMode {
    fn from(arg: ColorModeArg) -> Self {
        match arg {
            ColorModeArg::Global => ColorMode::Global,
            ColorModeArg::Depth => ColorMode::GradientByZ,
            ColorModeArg::Distance => ColorMode::GradientByDistance,
            ColorModeArg::Cave => ColorMode::PerCave,
            ColorModeArg::Survey => ColorMode::PerSurvey,
        }
    }
}

/// Distance algorithm accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DistanceArg {
    /// Breadth-first approximation.
    Traversal,
    /// Exact shortest distances.
    Shortest,
}

impl From<DistanceArg> for DistanceMode {
    fn from(arg: DistanceArg) -> Self {
        match arg {
            DistanceArg::Traversal => DistanceMode::Traversal,
            DistanceArg::Shortest => DistanceMode::Shortest,
        }
    }
}

/// Arguments for the colors command. Every field overrides the matching
/// render configuration value when set.
#[derive(Debug, Clone, Default)]
pub struct ColorsCommandArgs {
    pub mode: Option<ColorModeArg>,
    pub start: Option<Color>,
    pub end: Option<Color>,
    pub reference: Option<String>,
    pub distance: Option<DistanceArg>,
}

impl ColorsCommandArgs {
    fn apply(&self, config: &mut RenderConfig) {
        if let Some(mode) = self.mode {
            config.color_mode = mode.into();
        }
        if let Some(start) = self.start {
            config.gradient_start = start;
        }
        if let Some(end) = self.end {
            config.gradient_end = end;
        }
        if let Some(reference) = &self.reference {
            config.distance_reference = Some(reference.clone());
        }
        if let Some(distance) = self.distance {
            config.distance_mode = distance.into();
        }
    }
}

/// Handle the `colors` subcommand.
pub fn handle_colors(
    cave_path: &Path,
    config_path: Option<&Path>,
    args: &ColorsCommandArgs,
    format: OutputFormat,
) -> Result<()> {
    let mut config = load_config(config_path).context("failed to load render configuration")?;
    args.apply(&mut config);

    let cave = load_snapshot(cave_path)?;
    let colors = segment_colors(&cave, &config).context("failed to compute segment colors")?;

    match format {
        OutputFormat::Json => print_json(&colors)?,
        OutputFormat::Enhanced => {
            print!("{}", format_colors_text(&colors, &ColorPalette::detect()))
        }
        OutputFormat::Text | OutputFormat::Rich => {
            print!("{}", format_colors_text(&colors, &ColorPalette::plain()))
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_configuration() {
        let mut config = RenderConfig::default();
        let args = ColorsCommandArgs {
            mode: Some(ColorModeArg::Distance),
            end: Some(Color::WHITE),
            reference: Some("A1".to_string()),
            distance: Some(DistanceArg::Shortest),
            ..ColorsCommandArgs::default()
        };
        args.apply(&mut config);

        assert_eq!(config.color_mode, ColorMode::GradientByDistance);
        assert_eq!(config.gradient_end, Color::WHITE);
        assert_eq!(config.gradient_start, RenderConfig::default().gradient_start);
        assert_eq!(config.distance_reference.as_deref(), Some("A1"));
        assert_eq!(config.distance_mode, DistanceMode::Shortest);
    }
}
