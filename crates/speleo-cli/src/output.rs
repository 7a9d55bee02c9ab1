//! Output formatting for command results.

use std::fmt::Write as _;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;
use speleo_lib::{
    CaveGeometry, CycleSummary, RenderMode, ResolutionReport, SegmentColor, ShotType,
};

use crate::terminal::ColorPalette;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text.
    #[default]
    Text,
    /// Markdown-flavoured text.
    Rich,
    /// Colored terminal output.
    Enhanced,
    /// Pretty-printed JSON on stdout.
    Json,
}

impl OutputFormat {
    /// Library render mode backing the text formats.
    pub fn render_mode(self) -> RenderMode {
        match self {
            OutputFormat::Rich => RenderMode::RichText,
            _ => RenderMode::PlainText,
        }
    }
}

/// Print any serialisable result as pretty JSON followed by a newline.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

/// Colored station listing with per-survey status lines.
pub fn format_resolution_enhanced(report: &ResolutionReport, palette: &ColorPalette) -> String {
    let p = palette;
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "{}{}{} {}({} stations){}",
        p.white_bold,
        report.cave,
        p.reset,
        p.gray,
        report.stations.len(),
        p.reset
    );

    for survey in &report.surveys {
        let (color, status) = if survey.isolated {
            (p.red, "isolated".to_string())
        } else if survey.orphan_shot_ids.is_empty() {
            (p.green, "resolved".to_string())
        } else {
            (p.orange, format!("{} orphaned", survey.orphan_shot_ids.len()))
        };
        let _ = writeln!(
            buffer,
            "{}{}{} {}{}{}",
            p.gray, survey.survey, p.reset, color, status, p.reset
        );
        for station in report.stations.iter().filter(|s| s.survey == survey.survey) {
            let _ = writeln!(
                buffer,
                "  {}{:<16}{} {}{:>10.2} {:>10.2} {:>10.2}{}",
                p.white_bold,
                station.name,
                p.reset,
                p.cyan,
                station.x,
                station.y,
                station.z,
                p.reset
            );
        }
    }
    buffer
}

/// Colored loop listing.
pub fn format_cycles_enhanced(summary: &CycleSummary, palette: &ColorPalette) -> String {
    let p = palette;
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "{}{}{} {}({} loops){}",
        p.white_bold, summary.cave, p.reset, p.gray, summary.count, p.reset
    );
    for cycle in &summary.cycles {
        let _ = writeln!(
            buffer,
            "{}{:<10}{} {}{:>10.2} m{}  {}",
            p.gray,
            cycle.id,
            p.reset,
            p.cyan,
            cycle.distance,
            p.reset,
            cycle.path.join(&format!(" {}->{} ", p.gray, p.reset))
        );
    }
    buffer
}

/// One row per segment: survey, shot id, kind and both end colors.
pub fn format_colors_text(colors: &[SegmentColor], palette: &ColorPalette) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "{:<16} {:>5} {:<6} {:<9} {:<9}",
        "Survey", "Shot", "Kind", "From", "To"
    );
    for segment in colors {
        let kind = match segment.kind {
            ShotType::Center => "center",
            ShotType::Splay => "splay",
        };
        let _ = writeln!(
            buffer,
            "{:<16} {:>5} {:<6} {} {}",
            segment.survey,
            segment.shot,
            kind,
            palette.swatch(segment.from),
            palette.swatch(segment.to)
        );
    }
    buffer
}

/// Segment and station counts of the renderer buffers.
pub fn format_geometry_text(geometry: &CaveGeometry) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "{} centerline segments, {} splay segments, {} stations",
        geometry.centerline_segments(),
        geometry.splay_segments(),
        geometry.stations.len()
    );
    for (name, position) in &geometry.stations {
        let _ = writeln!(
            buffer,
            "{:<16} {:>10.2} {:>10.2} {:>10.2}",
            name, position.x, position.y, position.z
        );
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use speleo_lib::Color;

    #[test]
    fn rich_format_maps_to_rich_text() {
        assert_eq!(OutputFormat::Rich.render_mode(), RenderMode::RichText);
        assert_eq!(OutputFormat::Text.render_mode(), RenderMode::PlainText);
        assert_eq!(OutputFormat::Enhanced.render_mode(), RenderMode::PlainText);
    }

    #[test]
    fn colors_table_uses_hex_without_color_support() {
        let colors = vec![SegmentColor {
            survey: "main".to_string(),
            shot: 3,
            kind: ShotType::Splay,
            from: Color::WHITE,
            to: Color::new(0.0, 0.0, 0.0),
        }];
        let text = format_colors_text(&colors, &ColorPalette::plain());
        let row = text.lines().nth(1).expect("one row");
        assert!(row.starts_with("main"));
        assert!(row.contains("splay"));
        assert!(row.ends_with("#ffffff #000000"));
    }

    #[test]
    fn geometry_text_counts_segments() {
        let geometry = CaveGeometry {
            centerline: vec![0.0; 12],
            splays: vec![0.0; 6],
            stations: Vec::new(),
        };
        assert_eq!(
            format_geometry_text(&geometry),
            "2 centerline segments, 1 splay segments, 0 stations\n"
        );
    }
}
