//! Scales mapping data space to screen space
//!
//! - [`TimeScale`]: dates to x, linear in days
//! - [`LinearScale`]: values to y, with 1-2-5 "nice" ticks
//! - [`BandScale`]: evenly spaced slots for the tooltip bar chart

use crate::config::ChartConfig;
use crate::data::{finite_fold, Layer, NormalizedRecord};
use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Continuous time scale with day resolution
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeScale {
    pub domain: (NaiveDate, NaiveDate),
    pub range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: (NaiveDate, NaiveDate), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Domain is the [min, max] date over records with a valid date,
    /// regardless of row order. `None` when no record has a date.
    pub fn from_records(records: &[NormalizedRecord], range: (f64, f64)) -> Option<Self> {
        let mut dates = records.iter().filter_map(|r| r.date);
        let first = dates.next()?;
        let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self::new((min, max), range))
    }

    fn span_days(&self) -> f64 {
        (self.domain.1 - self.domain.0).num_days() as f64
    }

    /// Map a date to a screen coordinate
    pub fn apply(&self, date: NaiveDate) -> f64 {
        let (r0, r1) = self.range;
        let span = self.span_days();
        if span == 0.0 {
            return (r0 + r1) / 2.0;
        }
        let offset = (date - self.domain.0).num_days() as f64;
        r0 + offset / span * (r1 - r0)
    }

    /// Fractional days since the domain start at a screen coordinate
    pub fn invert_days(&self, x: f64) -> f64 {
        let (r0, r1) = self.range;
        if r1 == r0 {
            return 0.0;
        }
        (x - r0) / (r1 - r0) * self.span_days()
    }

    /// First day of every month inside the domain
    pub fn month_ticks(&self) -> Vec<NaiveDate> {
        let (start, end) = self.domain;
        let mut tick = if start.day() == 1 {
            Some(start)
        } else {
            next_month(start)
        };

        let mut ticks = Vec::new();
        while let Some(date) = tick {
            if date > end {
                break;
            }
            ticks.push(date);
            tick = next_month(date);
        }
        ticks
    }
}

/// Both scales of the main plot, recomputed from scratch for every dataset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Scales {
    /// `None` when no record has a valid date
    pub x: Option<TimeScale>,
    /// `None` when no band edge is finite
    pub y: Option<LinearScale>,
}

impl Scales {
    pub fn resolve(records: &[NormalizedRecord], layers: &[Layer], config: &ChartConfig) -> Self {
        Self {
            x: TimeScale::from_records(records, (0.0, config.plot_width())),
            y: LinearScale::from_layers(layers, (config.plot_height(), 0.0)),
        }
    }
}

/// Whether a chrono format string is usable for labels
pub fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Format a date label, falling back to ISO for an unusable format
pub fn format_date(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    if !is_valid_date_format(format) || write!(out, "{}", date.format(format)).is_err() {
        return date.to_string();
    }
    out
}

/// First day of the month after `date`
fn next_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}

/// Continuous linear scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Domain spans the lowest baseline to the highest top across all layers.
    /// Non-finite band edges are ignored; `None` when nothing is finite.
    pub fn from_layers(layers: &[Layer], range: (f64, f64)) -> Option<Self> {
        let min = finite_fold(layers.iter().filter_map(Layer::min_baseline), f64::min)?;
        let max = finite_fold(layers.iter().filter_map(Layer::max_top), f64::max)?;
        Some(Self::new((min, max), range))
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Roughly `count` evenly spaced round values inside the domain
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }

    /// Tick values paired with their labels
    pub fn labelled_ticks(&self, count: usize) -> Vec<(f64, String)> {
        let precision = tick_precision(self.domain.0, self.domain.1, count);
        self.ticks(count)
            .into_iter()
            .map(|value| (value, format_tick(value, precision)))
            .collect()
    }
}

/// Ordinal slots with inner and outer padding, centered in the range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BandScale {
    pub count: usize,
    pub range: (f64, f64),
    pub padding: f64,
}

impl BandScale {
    pub fn new(count: usize, range: (f64, f64), padding: f64) -> Self {
        Self {
            count,
            range,
            padding,
        }
    }

    /// Distance between the starts of adjacent slots
    pub fn step(&self) -> f64 {
        let n = self.count as f64;
        (self.range.1 - self.range.0) / (n - self.padding + 2.0 * self.padding).max(1.0)
    }

    /// Width of one slot
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Start coordinate of slot `index`
    pub fn position(&self, index: usize) -> f64 {
        let n = self.count as f64;
        let step = self.step();
        let start = self.range.0 + (self.range.1 - self.range.0 - step * (n - self.padding)) * 0.5;
        start + step * index as f64
    }
}

/// (i1, i2, inc): ticks are i*inc for positive inc, i/-inc for negative inc
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let scaled = 10f64.powf(-power) / factor;
        i1 = (start * scaled).round();
        i2 = (stop * scaled).round();
        if i1 / scaled < start {
            i1 += 1.0;
        }
        if i2 / scaled > stop {
            i2 -= 1.0;
        }
        inc = -scaled;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Nice tick values between `start` and `stop` (either order)
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1 + 1.0) as usize;
    let value = |i: f64| if inc < 0.0 { i / -inc } else { i * inc };
    let mut out: Vec<f64> = (0..n).map(|k| value(i1 + k as f64)).collect();
    if reverse {
        out.reverse();
    }
    out
}

/// Decimal places needed to tell ticks apart
fn tick_precision(start: f64, stop: f64, count: usize) -> usize {
    if count == 0 || !start.is_finite() || !stop.is_finite() || start == stop {
        return 0;
    }
    let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
    let (_, _, inc) = tick_spec(lo, hi, count as f64);
    let step = if inc < 0.0 { 1.0 / -inc } else { inc };
    let exponent = (step.log10() + 1e-9).floor();
    if exponent < 0.0 {
        (-exponent) as usize
    } else {
        0
    }
}

/// Fixed-point label with thousands separators and a typographic minus
pub fn format_tick(value: f64, precision: usize) -> String {
    let digits = format!("{:.*}", precision, value.abs());
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, c) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    // -0.0 and values that round to zero print unsigned
    let is_zero = digits.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        format!("\u{2212}{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Band;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dated(date: Option<NaiveDate>) -> NormalizedRecord {
        NormalizedRecord {
            date,
            values: Vec::new(),
        }
    }

    #[test]
    fn test_time_domain_is_order_independent() {
        let records = vec![
            dated(Some(ymd(2024, 3, 1))),
            dated(None),
            dated(Some(ymd(2024, 1, 1))),
            dated(Some(ymd(2024, 2, 1))),
        ];

        let scale = TimeScale::from_records(&records, (0.0, 830.0)).unwrap();
        assert_eq!(scale.domain, (ymd(2024, 1, 1), ymd(2024, 3, 1)));
    }

    #[test]
    fn test_time_scale_without_dates() {
        assert!(TimeScale::from_records(&[dated(None)], (0.0, 100.0)).is_none());
        assert!(TimeScale::from_records(&[], (0.0, 100.0)).is_none());
    }

    #[test]
    fn test_time_scale_apply_and_invert_days() {
        let scale = TimeScale::new((ymd(2024, 1, 1), ymd(2024, 1, 11)), (0.0, 100.0));

        assert_eq!(scale.apply(ymd(2024, 1, 1)), 0.0);
        assert_eq!(scale.apply(ymd(2024, 1, 6)), 50.0);
        assert_eq!(scale.apply(ymd(2024, 1, 11)), 100.0);
        assert_eq!(scale.invert_days(50.0), 5.0);
        assert_eq!(scale.invert_days(25.0), 2.5);
    }

    #[test]
    fn test_degenerate_time_domain_maps_to_midpoint() {
        let scale = TimeScale::new((ymd(2024, 1, 1), ymd(2024, 1, 1)), (0.0, 100.0));
        assert_eq!(scale.apply(ymd(2024, 1, 1)), 50.0);
    }

    #[test]
    fn test_month_ticks() {
        let scale = TimeScale::new((ymd(2023, 11, 15), ymd(2024, 2, 1)), (0.0, 100.0));
        assert_eq!(
            scale.month_ticks(),
            vec![ymd(2023, 12, 1), ymd(2024, 1, 1), ymd(2024, 2, 1)]
        );

        let scale = TimeScale::new((ymd(2024, 1, 1), ymd(2024, 1, 20)), (0.0, 100.0));
        assert_eq!(scale.month_ticks(), vec![ymd(2024, 1, 1)]);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(ymd(2024, 2, 1), "%b"), "Feb");
        assert_eq!(format_date(ymd(2024, 2, 1), "%Y-%m"), "2024-02");
        assert_eq!(format_date(ymd(2024, 2, 1), "%Q"), "2024-02-01");
        assert!(!is_valid_date_format("%Q"));
    }

    #[test]
    fn test_linear_scale_inverted_range() {
        let scale = LinearScale::new((-10.0, 30.0), (430.0, 0.0));

        assert_eq!(scale.apply(-10.0), 430.0);
        assert_eq!(scale.apply(30.0), 0.0);
        assert_eq!(scale.apply(10.0), 215.0);
    }

    #[test]
    fn test_linear_scale_from_layers_ignores_nan() {
        let layers = vec![
            Layer {
                key: "a".to_string(),
                index: 0,
                bands: vec![Band::new(-4.0, 1.0), Band::new(-2.0, f64::NAN)],
            },
            Layer {
                key: "b".to_string(),
                index: 1,
                bands: vec![Band::new(1.0, 6.0), Band::new(-2.0, 3.0)],
            },
        ];

        let scale = LinearScale::from_layers(&layers, (100.0, 0.0)).unwrap();
        assert_eq!(scale.domain, (-4.0, 6.0));
    }

    #[test]
    fn test_nice_ticks() {
        assert_eq!(ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(ticks(-23.0, 27.0, 5), vec![-20.0, -10.0, 0.0, 10.0, 20.0]);
        assert_eq!(ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(ticks(10.0, 0.0, 5), vec![10.0, 8.0, 6.0, 4.0, 2.0, 0.0]);
        assert_eq!(ticks(3.0, 3.0, 5), vec![3.0]);
        assert!(ticks(0.0, 10.0, 0).is_empty());
        assert!(ticks(f64::NAN, 10.0, 5).is_empty());
    }

    #[test]
    fn test_tick_labels() {
        let scale = LinearScale::new((0.0, 1.0), (100.0, 0.0));
        let labels: Vec<String> = scale.labelled_ticks(5).into_iter().map(|(_, l)| l).collect();
        assert_eq!(labels, vec!["0.0", "0.2", "0.4", "0.6", "0.8", "1.0"]);

        let scale = LinearScale::new((-23.0, 27.0), (100.0, 0.0));
        let labels: Vec<String> = scale.labelled_ticks(5).into_iter().map(|(_, l)| l).collect();
        assert_eq!(labels, vec!["\u{2212}20", "\u{2212}10", "0", "10", "20"]);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(1234567.0, 0), "1,234,567");
        assert_eq!(format_tick(-1500.5, 1), "\u{2212}1,500.5");
        assert_eq!(format_tick(-0.0, 0), "0");
        assert_eq!(format_tick(-0.01, 1), "0.0");
        assert_eq!(format_tick(999.0, 0), "999");
    }

    #[test]
    fn test_band_scale_geometry() {
        // two slots over 160px with 0.1 padding: step = 160 / 2.1
        let scale = BandScale::new(2, (0.0, 160.0), 0.1);
        let step = 160.0 / 2.1;

        assert!((scale.step() - step).abs() < 1e-9);
        assert!((scale.bandwidth() - step * 0.9).abs() < 1e-9);
        assert!((scale.position(0) - step * 0.1).abs() < 1e-9);
        assert!((scale.position(1) - step * 1.1).abs() < 1e-9);
        // outer padding is symmetric
        let right_gap = 160.0 - (scale.position(1) + scale.bandwidth());
        assert!((right_gap - scale.position(0)).abs() < 1e-9);
    }
}
