//! Monthly sales chart rendering
//!
//! Produces a self-contained SVG bar chart. Rendering failures are fatal to
//! the caller; an empty series is a no-op.

use std::fmt::{self, Write as _};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::MonthlyRevenue;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 90.0;
const Y_TICKS: usize = 5;
const BAR_COLOR: &str = "#1f77b4";

/// Render `series` as a bar chart at `output_dir/file_name`.
///
/// Returns `Ok(None)` without touching the filesystem when the series is
/// empty. Creates `output_dir` when absent.
pub fn render_monthly_chart(
    series: &MonthlyRevenue,
    output_dir: impl AsRef<Path>,
    file_name: &str,
) -> Result<Option<PathBuf>> {
    if series.is_empty() {
        debug!("No monthly revenue to chart");
        return Ok(None);
    }

    let output_dir = output_dir.as_ref();
    let path = output_dir.join(file_name);

    let svg = monthly_chart_svg(series).map_err(|e| Error::render(&path, io::Error::other(e)))?;
    fs::create_dir_all(output_dir).map_err(|e| Error::render(&path, e))?;
    fs::write(&path, svg).map_err(|e| Error::render(&path, e))?;

    info!(path = %path.display(), bars = series.len(), "Chart saved");
    Ok(Some(path))
}

/// Build the SVG document for a non-empty series.
pub fn monthly_chart_svg(series: &MonthlyRevenue) -> std::result::Result<String, fmt::Error> {
    let mut svg = String::new();
    write_svg(&mut svg, series)?;
    Ok(svg)
}

fn write_svg(svg: &mut String, series: &MonthlyRevenue) -> fmt::Result {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_h;

    let max = series.values().copied().fold(0.0_f64, f64::max);
    let min = series.values().copied().fold(0.0_f64, f64::min);
    let span = if max - min > 0.0 { max - min } else { 1.0 };
    let y_of = |v: f64| MARGIN_TOP + (max - v) / span * plot_h;
    let zero_y = y_of(0.0);

    let slot = plot_w / series.len() as f64;
    let bar_w = slot * 0.7;

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
    )?;
    writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(
        svg,
        r#"<text x="{}" y="35" text-anchor="middle" font-size="20">Monthly Sales Performance</text>"#,
        WIDTH / 2.0
    )?;

    for i in 0..=Y_TICKS {
        let v = min + span * i as f64 / Y_TICKS as f64;
        let y = y_of(v);
        writeln!(
            svg,
            r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#dddddd"/>"##,
            WIDTH - MARGIN_RIGHT
        )?;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{v:.2}</text>"#,
            MARGIN_LEFT - 8.0,
            y + 4.0
        )?;
    }

    for (i, (month, value)) in series.iter().enumerate() {
        let x = MARGIN_LEFT + slot * i as f64 + (slot - bar_w) / 2.0;
        let top = y_of(value.max(0.0));
        let height = (y_of(value.min(0.0)) - top).abs();
        let label_x = x + bar_w / 2.0;
        writeln!(
            svg,
            r#"<rect x="{x:.1}" y="{top:.1}" width="{bar_w:.1}" height="{height:.1}" fill="{BAR_COLOR}"><title>{} {value:.2}</title></rect>"#,
            escape(month)
        )?;
        writeln!(
            svg,
            r#"<text x="{label_x:.1}" y="{:.1}" text-anchor="end" font-size="11" transform="rotate(-45 {label_x:.1} {:.1})">{}</text>"#,
            baseline + 18.0,
            baseline + 18.0,
            escape(month)
        )?;
    }

    writeln!(
        svg,
        r#"<line x1="{MARGIN_LEFT}" y1="{zero_y:.1}" x2="{:.1}" y2="{zero_y:.1}" stroke="black"/>"#,
        WIDTH - MARGIN_RIGHT
    )?;
    writeln!(
        svg,
        r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{baseline:.1}" stroke="black"/>"#
    )?;
    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="14">Month/Year</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        HEIGHT - 15.0
    )?;
    writeln!(
        svg,
        r#"<text x="20" y="{:.1}" text-anchor="middle" font-size="14" transform="rotate(-90 20 {:.1})">Revenue</text>"#,
        MARGIN_TOP + plot_h / 2.0,
        MARGIN_TOP + plot_h / 2.0
    )?;
    svg.push_str("</svg>\n");
    Ok(())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(&str, f64)]) -> MonthlyRevenue {
        points.iter().map(|(m, v)| ((*m).to_string(), *v)).collect()
    }

    #[test]
    fn empty_series_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("images");

        let result = render_monthly_chart(&MonthlyRevenue::new(), &out, "sales.svg").unwrap();

        assert!(result.is_none());
        assert!(!out.exists());
    }

    #[test]
    fn writes_exactly_the_requested_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("images");

        let path = render_monthly_chart(
            &series(&[("2024-01", 120.0), ("2024-02", 80.5)]),
            &out,
            "monthly.svg",
        )
        .unwrap()
        .unwrap();

        assert_eq!(path, out.join("monthly.svg"));
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("<svg"));
        assert!(contents.contains("Monthly Sales Performance"));
        assert!(contents.contains("2024-02"));
        assert_eq!(contents.matches(BAR_COLOR).count(), 2);
    }

    #[test]
    fn unwritable_output_is_a_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();

        let err = render_monthly_chart(&series(&[("2024-01", 1.0)]), &blocker, "c.svg").unwrap_err();

        assert!(matches!(err, Error::Render { .. }));
    }

    #[test]
    fn negative_revenue_still_renders() {
        let svg = monthly_chart_svg(&series(&[("2024-01", -5.0), ("2024-02", 10.0)])).unwrap();
        assert!(!svg.contains("NaN"));
        assert!(svg.contains("-5.00"));
    }
}
