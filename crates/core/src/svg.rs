//! Standalone SVG output for scenes and tooltip charts

use crate::geometry::format_coord;
use crate::interaction::MiniChart;
use crate::scene::{Axis, AxisOrient, Scene, TICK_SIZE};
use std::fmt::Write;

const FONT: &str = r#"font-family="sans-serif" font-size="10""#;
const LEGEND_SWATCH: f64 = 12.0;
const LEGEND_SPACING: f64 = 110.0;

impl Scene {
    /// Serialize the scene as a self-contained SVG document
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_svg(&mut out);
        out
    }

    fn write_svg(&self, out: &mut String) -> std::fmt::Result {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = format_coord(self.width),
            h = format_coord(self.height)
        )?;
        writeln!(
            out,
            r#"<g transform="translate({},{})">"#,
            format_coord(self.margin.left),
            format_coord(self.margin.top)
        )?;

        for layer in &self.layers {
            writeln!(
                out,
                r#"<path class="layer" data-key="{}" fill="{}" d="{}"/>"#,
                escape(&layer.key),
                escape(&layer.color),
                layer.path
            )?;
        }

        write_axis(out, &self.x_axis)?;
        write_axis(out, &self.y_axis)?;
        writeln!(out, "</g>")?;

        if !self.legend.is_empty() {
            writeln!(out, r#"<g class="legend" {}>"#, FONT)?;
            let y = self.height - LEGEND_SWATCH - 4.0;
            for (i, entry) in self.legend.iter().enumerate() {
                let x = self.margin.left + i as f64 * LEGEND_SPACING;
                writeln!(
                    out,
                    r#"<rect x="{}" y="{}" width="{s}" height="{s}" fill="{}"/><text x="{}" y="{}" dy="0.32em">{}</text>"#,
                    format_coord(x),
                    format_coord(y),
                    escape(&entry.color),
                    format_coord(x + LEGEND_SWATCH + 4.0),
                    format_coord(y + LEGEND_SWATCH / 2.0),
                    escape(&entry.key),
                    s = format_coord(LEGEND_SWATCH),
                )?;
            }
            writeln!(out, "</g>")?;
        }

        writeln!(out, "</svg>")
    }
}

impl MiniChart {
    /// Serialize the tooltip bar chart as an SVG fragment
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = self.write_svg(&mut out);
        out
    }

    fn write_svg(&self, out: &mut String) -> std::fmt::Result {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            format_coord(self.width),
            format_coord(self.height)
        )?;
        writeln!(
            out,
            r#"<g transform="translate({},{})">"#,
            format_coord(self.margin.left),
            format_coord(self.margin.top)
        )?;
        for bar in &self.bars {
            writeln!(
                out,
                r#"<rect class="bar" x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                format_coord(bar.x),
                format_coord(bar.y),
                format_coord(bar.width),
                format_coord(bar.height),
                escape(&self.color)
            )?;
        }
        write_axis(out, &self.x_axis)?;
        write_axis(out, &self.y_axis)?;
        writeln!(out, "</g>")?;
        writeln!(out, "</svg>")
    }
}

/// Axis group: domain line, then one tick mark and label per tick
fn write_axis(out: &mut String, axis: &Axis) -> std::fmt::Result {
    let (r0, r1) = (format_coord(axis.range.0), format_coord(axis.range.1));
    let tick = format_coord(TICK_SIZE);

    match axis.orient {
        AxisOrient::Bottom => {
            writeln!(
                out,
                r#"<g class="axis x" transform="translate(0,{})" fill="none" {} text-anchor="middle">"#,
                format_coord(axis.offset),
                FONT
            )?;
            writeln!(
                out,
                r#"<path class="domain" stroke="currentColor" d="M{r0},{tick}V0H{r1}V{tick}"/>"#
            )?;
            for t in &axis.ticks {
                writeln!(
                    out,
                    r#"<g class="tick" transform="translate({},0)"><line stroke="currentColor" y2="{tick}"/><text fill="currentColor" y="9" dy="0.71em">{}</text></g>"#,
                    format_coord(t.position),
                    escape(&t.label)
                )?;
            }
        }
        AxisOrient::Left => {
            writeln!(
                out,
                r#"<g class="axis y" transform="translate({},0)" fill="none" {} text-anchor="end">"#,
                format_coord(axis.offset),
                FONT
            )?;
            writeln!(
                out,
                r#"<path class="domain" stroke="currentColor" d="M-{tick},{r0}H0V{r1}H-{tick}"/>"#
            )?;
            for t in &axis.ticks {
                writeln!(
                    out,
                    r#"<g class="tick" transform="translate(0,{})"><line stroke="currentColor" x2="-{tick}"/><text fill="currentColor" x="-9" dy="0.32em">{}</text></g>"#,
                    format_coord(t.position),
                    escape(&t.label)
                )?;
            }
        }
    }

    writeln!(out, "</g>")
}

/// Escape text for XML attribute and element content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Series, SeriesCatalog};
    use crate::config::ChartConfig;
    use crate::interaction::{HoverState, Pointer, PointerEvent};
    use crate::pipeline::Chart;

    const TWO_ROWS: &str = "Date,LLaMA-3.1,Claude,PaLM-2,Gemini,GPT-4\n\
                            2024-01-01,10,5,3,8,12\n\
                            2024-02-01,12,6,4,9,14\n";

    #[test]
    fn test_svg_contains_every_layer_and_axis() {
        let chart = Chart::from_csv(TWO_ROWS, &ChartConfig::default()).unwrap();
        let svg = chart.scene.to_svg();

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(r#"<path class="layer""#).count(), 5);
        assert!(svg.contains(r##"fill="#e41a1c""##));
        assert!(svg.contains(r#"transform="translate(50,20)""#));
        assert!(svg.contains(r#"<g class="axis x" transform="translate(0,430)""#));
        assert!(svg.contains(">Jan</text>"));
        assert!(svg.contains(">Feb</text>"));
        assert_eq!(svg.matches(r#"<path class="domain""#).count(), 2);
        assert_eq!(svg.matches("<rect").count(), 5);
    }

    #[test]
    fn test_svg_is_identical_for_identical_input() {
        let config = ChartConfig::default();
        let first = Chart::from_csv(TWO_ROWS, &config).unwrap().scene.to_svg();
        let second = Chart::from_csv(TWO_ROWS, &config).unwrap().scene.to_svg();
        assert_eq!(first, second);
    }

    #[test]
    fn test_keys_are_escaped() {
        let config = ChartConfig {
            catalog: SeriesCatalog::new(vec![Series::new("A&B <x>", "#000")]),
            ..Default::default()
        };
        let chart = Chart::from_csv("Date,A&B <x>\n2024-01-01,1\n", &config).unwrap();
        let svg = chart.scene.to_svg();

        assert!(svg.contains("A&amp;B &lt;x&gt;"));
        assert!(!svg.contains("A&B <x>"));
    }

    #[test]
    fn test_mini_chart_svg_has_one_rect_per_bar() {
        let config = ChartConfig::default();
        let chart = Chart::from_csv(TWO_ROWS, &config).unwrap();
        let mut state = HoverState::new();
        state.handle(PointerEvent::Enter {
            layer: 1,
            pointer: Pointer { x: 100.0, y: 100.0 },
        });

        let svg = chart.tooltip(&state, &config).unwrap().chart.to_svg();
        assert_eq!(svg.matches(r#"<rect class="bar""#).count(), 2);
        assert!(svg.contains(r##"fill="#984ea3""##));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a"b'c"#), "a&quot;b&apos;c");
        assert_eq!(escape("plain"), "plain");
    }
}
