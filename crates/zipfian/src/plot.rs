//! SVG rendering of a session's curves.
//!
//! Draws every plotted document as a thin line, the Zipfian reference as a
//! dotted gray line, rank ticks `1..=depth` along x and percentages along y,
//! with a legend in the top-right corner.

use std::fmt::Write;

use zipfian_core::curve::SmoothedCurve;
use zipfian_core::session::SessionReport;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;

const TITLE: &str = "Word Frequency Distribution (Zipf's Law)";
const REFERENCE_COLOR: &str = "#808080";

/// Line colors, cycled per document.
const PALETTE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Maps data coordinates onto the plot area.
struct Frame {
    x_span: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn px(&self, x: f64) -> f64 {
        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        MARGIN_LEFT + x / self.x_span * plot_w
    }

    fn py(&self, y: f64) -> f64 {
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        HEIGHT - MARGIN_BOTTOM - (y - self.y_min) / (self.y_max - self.y_min) * plot_h
    }
}

/// A line to draw.
struct Series<'a> {
    label: &'a str,
    points: Vec<(f64, f64)>,
    color: &'a str,
    dotted: bool,
}

/// Render the report as a standalone SVG document.
pub fn render_svg(report: &SessionReport) -> Result<String, std::fmt::Error> {
    let mut series = Vec::new();
    if let Some(ref reference) = report.reference {
        series.push(Series {
            label: &reference.label,
            points: xy(&reference.curve),
            color: REFERENCE_COLOR,
            dotted: true,
        });
    }
    for (i, doc) in report.plotted().enumerate() {
        if let Some(ref curve) = doc.curve {
            series.push(Series {
                label: &doc.label,
                points: xy(curve),
                color: PALETTE[i % PALETTE.len()],
                dotted: false,
            });
        }
    }

    // Splines overshoot; widen the y range to keep every sample visible.
    let (lo, hi) = series
        .iter()
        .flat_map(|s| s.points.iter().map(|&(_, y)| y))
        .fold((0.0f64, 100.0f64), |(lo, hi), y| (lo.min(y), hi.max(y)));
    let frame = Frame {
        x_span: report.depth.saturating_sub(1).max(1) as f64,
        y_min: lo,
        y_max: hi,
    };

    let mut svg = String::new();
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif" font-size="12">"#
    )?;
    writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="16">{}</text>"#,
        WIDTH / 2.0,
        MARGIN_TOP / 2.0 + 6.0,
        escape(TITLE)
    )?;

    write_axes(&mut svg, &frame, report.depth)?;
    for s in &series {
        write_series(&mut svg, &frame, s)?;
    }
    write_legend(&mut svg, &series)?;

    writeln!(svg, "</svg>")?;
    Ok(svg)
}

fn write_axes(svg: &mut String, frame: &Frame, depth: usize) -> std::fmt::Result {
    let left = MARGIN_LEFT;
    let right = WIDTH - MARGIN_RIGHT;
    let top = MARGIN_TOP;
    let bottom = HEIGHT - MARGIN_BOTTOM;

    writeln!(
        svg,
        r#"<rect x="{left}" y="{top}" width="{}" height="{}" fill="none" stroke="black"/>"#,
        right - left,
        bottom - top
    )?;

    // Rank ticks are 1-based labels on 0-based positions.
    for rank in 1..=depth {
        let x = frame.px((rank - 1) as f64);
        writeln!(
            svg,
            r#"<line x1="{x:.2}" y1="{bottom}" x2="{x:.2}" y2="{}" stroke="black"/>"#,
            bottom + 5.0
        )?;
        writeln!(
            svg,
            r#"<text x="{x:.2}" y="{}" text-anchor="middle">{rank}</text>"#,
            bottom + 18.0
        )?;
    }

    for pct in (0..=100).step_by(20) {
        let y = frame.py(f64::from(pct));
        writeln!(
            svg,
            r#"<line x1="{}" y1="{y:.2}" x2="{left}" y2="{y:.2}" stroke="black"/>"#,
            left - 5.0
        )?;
        writeln!(
            svg,
            r#"<text x="{}" y="{:.2}" text-anchor="end">{pct}</text>"#,
            left - 8.0,
            y + 4.0
        )?;
    }

    writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle">Word Rank</text>"#,
        (left + right) / 2.0,
        HEIGHT - 15.0
    )?;
    writeln!(
        svg,
        r#"<text x="20" y="{0}" text-anchor="middle" transform="rotate(-90 20 {0})">Frequency (%)</text>"#,
        (top + bottom) / 2.0
    )
}

fn write_series(svg: &mut String, frame: &Frame, series: &Series<'_>) -> std::fmt::Result {
    let mut path = String::new();
    for (i, &(x, y)) in series.points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        write!(path, "{cmd}{:.2},{:.2} ", frame.px(x), frame.py(y))?;
    }

    let style = if series.dotted {
        r#"stroke-width="1.5" stroke-dasharray="2,3""#
    } else {
        r#"stroke-width="1" stroke-opacity="0.7""#
    };
    writeln!(
        svg,
        r#"<path d="{}" fill="none" stroke="{}" {style}><title>{}</title></path>"#,
        path.trim_end(),
        series.color,
        escape(series.label)
    )
}

fn write_legend(svg: &mut String, series: &[Series<'_>]) -> std::fmt::Result {
    if series.is_empty() {
        return Ok(());
    }
    let longest = series.iter().map(|s| s.label.chars().count()).max().unwrap_or(0);
    let width = 40.0 + longest as f64 * 7.0;
    let height = 10.0 + series.len() as f64 * 18.0;
    let x = WIDTH - MARGIN_RIGHT - width - 10.0;
    let y = MARGIN_TOP + 10.0;

    writeln!(
        svg,
        r##"<rect x="{x:.2}" y="{y}" width="{width:.2}" height="{height}" fill="white" fill-opacity="0.8" stroke="#cccccc"/>"##
    )?;
    for (i, s) in series.iter().enumerate() {
        let row = y + 14.0 + i as f64 * 18.0;
        let dash = if s.dotted {
            r#" stroke-dasharray="2,3""#
        } else {
            ""
        };
        writeln!(
            svg,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="2"{dash}/>"#,
            x + 8.0,
            row - 4.0,
            x + 30.0,
            row - 4.0,
            s.color
        )?;
        writeln!(
            svg,
            r#"<text x="{:.2}" y="{row:.2}">{}</text>"#,
            x + 36.0,
            escape(s.label)
        )?;
    }
    Ok(())
}

fn xy(curve: &SmoothedCurve) -> Vec<(f64, f64)> {
    curve.points.iter().map(|p| (p.x, p.y)).collect()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use zipfian_core::session::{self, InputBlob, SessionOptions};

    fn report(inputs: Vec<InputBlob>) -> SessionReport {
        session::run(inputs, &SessionOptions::default()).unwrap()
    }

    #[test]
    fn renders_reference_and_documents() {
        let svg = render_svg(&report(vec![InputBlob::new(
            "cats.txt",
            "the cat sat on the mat the cat ran",
        )]))
        .unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Zipfian Curve"));
        assert!(svg.contains("cats [9 words]"));
        assert!(svg.contains("Word Rank"));
        assert!(svg.contains("Frequency (%)"));
        assert_eq!(svg.matches("<path").count(), 2);
    }

    #[test]
    fn rank_ticks_are_one_based() {
        let svg = render_svg(&report(Vec::new())).unwrap();
        assert!(svg.contains(">1</text>"));
        assert!(svg.contains(">10</text>"));
        assert!(!svg.contains(">11</text>"));
    }

    #[test]
    fn skipped_documents_are_not_drawn() {
        let svg = render_svg(&report(vec![
            InputBlob::new("empty.txt", ""),
            InputBlob::new("short.txt", "a b"),
        ]))
        .unwrap();
        assert_eq!(svg.matches("<path").count(), 1);
        assert!(!svg.contains("empty [0 words]"));
    }

    #[test]
    fn labels_are_escaped() {
        let svg = render_svg(&report(vec![InputBlob::new(
            "a&b.txt",
            "w x y z w x y w x w",
        )]))
        .unwrap();
        assert!(svg.contains("a&amp;b [10 words]"));
        assert!(!svg.contains("a&b ["));
    }

    #[test]
    fn escape_handles_markup() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }
}
