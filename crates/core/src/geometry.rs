//! Area path generation for stacked layers

use crate::data::{Layer, NormalizedRecord};
use crate::scale::{LinearScale, TimeScale};

/// One screen-space column of an area: x with its bottom (y0) and top (y1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaPoint {
    pub x: f64,
    pub y0: f64,
    pub y1: f64,
}

impl AreaPoint {
    fn is_defined(&self) -> bool {
        self.x.is_finite() && self.y0.is_finite() && self.y1.is_finite()
    }
}

/// Project a layer's bands through the scales, one point per record.
/// Records without a date give a NaN x, which reads as undefined.
pub fn project_layer(
    layer: &Layer,
    records: &[NormalizedRecord],
    x: &TimeScale,
    y: &LinearScale,
) -> Vec<AreaPoint> {
    layer
        .bands
        .iter()
        .zip(records)
        .map(|(band, record)| AreaPoint {
            x: record.date.map_or(f64::NAN, |d| x.apply(d)),
            y0: y.apply(band.baseline),
            y1: y.apply(band.top),
        })
        .collect()
}

/// SVG path data for a filled area with straight segments
///
/// Each run of defined points becomes its own closed sub-path: the top edge
/// left to right, then the bottom edge back. Undefined points leave a gap.
pub fn area_path(points: &[AreaPoint]) -> String {
    let mut path = String::new();

    for run in points
        .split(|p| !p.is_defined())
        .filter(|run| !run.is_empty())
    {
        for (i, p) in run.iter().enumerate() {
            path.push(if i == 0 { 'M' } else { 'L' });
            push_point(&mut path, p.x, p.y1);
        }
        for p in run.iter().rev() {
            path.push('L');
            push_point(&mut path, p.x, p.y0);
        }
        path.push('Z');
    }

    path
}

fn push_point(path: &mut String, x: f64, y: f64) {
    path.push_str(&format_coord(x));
    path.push(',');
    path.push_str(&format_coord(y));
}

/// Compact coordinate: at most two decimals, no trailing zeros
pub fn format_coord(value: f64) -> String {
    let mut s = format!("{:.2}", value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}
