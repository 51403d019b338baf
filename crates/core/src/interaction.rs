//! Interaction controller: hover state per layer and the tooltip it shows
//!
//! Each layer path is either idle or hovered, and at most one layer is
//! hovered at a time. [`HoverState::handle`] applies pointer events
//! synchronously in arrival order. [`tooltip`] is a pure function of the
//! chart and the state; `None` means the tooltip is hidden.

use crate::config::{ChartConfig, Margin};
use crate::pipeline::Chart;
use crate::scale::{format_date, BandScale, LinearScale};
use crate::scene::{Axis, AxisOrient, Tick};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Pointer position in scene coordinates (origin at the surface's top-left)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

/// Pointer events delivered by a layer path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Enter { layer: usize, pointer: Pointer },
    Move { layer: usize, pointer: Pointer },
    Leave { layer: usize },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Hover {
    pub layer: usize,
    pub pointer: Pointer,
}

/// Which layer, if any, is under the pointer
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct HoverState {
    hovered: Option<Hover>,
}

impl HoverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event; returns whether the state changed
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        let next = match (self.hovered, event) {
            // entering a layer always takes over, replacing any other hover
            (_, PointerEvent::Enter { layer, pointer }) => Some(Hover { layer, pointer }),
            (Some(hover), PointerEvent::Move { layer, pointer }) if hover.layer == layer => {
                Some(Hover { layer, pointer })
            }
            (Some(hover), PointerEvent::Leave { layer }) if hover.layer == layer => None,
            (current, _) => current,
        };

        let changed = next != self.hovered;
        self.hovered = next;
        changed
    }

    pub fn hovered(&self) -> Option<Hover> {
        self.hovered
    }

    pub fn hovered_layer(&self) -> Option<usize> {
        self.hovered.map(|h| h.layer)
    }

    pub fn is_idle(&self) -> bool {
        self.hovered.is_none()
    }
}

/// One bar of the tooltip chart, in mini-chart plot coordinates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Band thickness the bar stands for
    pub value: f64,
}

/// Per-series bar chart embedded in the tooltip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MiniChart {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub color: String,
    /// One bar per record with a finite thickness
    pub bars: Vec<Bar>,
    /// One month label per record, centered under its slot
    pub x_axis: Axis,
    pub y_axis: Axis,
}

/// The record nearest the pointer and its value in the hovered layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Readout {
    pub record: usize,
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tooltip {
    pub key: String,
    /// Top-left corner in scene coordinates, clamped inside the plot
    pub left: f64,
    pub top: f64,
    pub chart: MiniChart,
    pub readout: Option<Readout>,
}

/// Tooltip for a hover state; `None` when idle or the layer is unknown
pub fn tooltip(chart: &Chart, state: &HoverState, config: &ChartConfig) -> Option<Tooltip> {
    let hover = state.hovered()?;
    let layer = chart.layers.get(hover.layer)?;

    // The box stays inside the plot's right and bottom edges, in scene coordinates
    let scene = &chart.scene;
    let plot_right = scene.margin.left + scene.plot_width();
    let plot_bottom = scene.margin.top + scene.plot_height();
    let (box_width, box_height) = config.tooltip.outer_size();
    let left = clamp_to_edge(hover.pointer.x + config.tooltip.offset, box_width, plot_right);
    let top = clamp_to_edge(hover.pointer.y + config.tooltip.offset, box_height, plot_bottom);

    Some(Tooltip {
        key: layer.key.clone(),
        left,
        top,
        chart: mini_chart(chart, hover.layer, config),
        readout: nearest_readout(chart, hover, config),
    })
}

/// Keep a box of `size` starting at `pos` from crossing `limit`
fn clamp_to_edge(pos: f64, size: f64, limit: f64) -> f64 {
    pos.min(limit - size).max(0.0)
}

fn mini_chart(chart: &Chart, layer_index: usize, config: &ChartConfig) -> MiniChart {
    let tip = &config.tooltip;
    let layer = &chart.layers[layer_index];
    let inner_width = tip.width - tip.margin.left - tip.margin.right;
    let inner_height = tip.height - tip.margin.top - tip.margin.bottom;

    let x = BandScale::new(layer.bands.len(), (0.0, inner_width), tip.bar_padding);
    let max = layer.max_thickness().filter(|m| *m > 0.0).unwrap_or(1.0);
    let y = LinearScale::new((0.0, max), (inner_height, 0.0));
    let zero = y.apply(0.0);

    let bars = layer
        .bands
        .iter()
        .enumerate()
        .filter(|(_, band)| band.thickness().is_finite())
        .map(|(i, band)| {
            let value = band.thickness();
            let tip_y = y.apply(value);
            Bar {
                x: x.position(i),
                y: tip_y.min(zero),
                width: x.bandwidth(),
                height: (zero - tip_y).abs(),
                value,
            }
        })
        .collect();

    let x_ticks = chart
        .records
        .iter()
        .enumerate()
        .map(|(i, record)| Tick {
            position: x.position(i) + x.bandwidth() / 2.0,
            label: record
                .date
                .map(|d| format_date(d, &config.x_tick_format))
                .unwrap_or_default(),
        })
        .collect();

    let y_ticks = y
        .labelled_ticks(tip.y_ticks)
        .into_iter()
        .map(|(value, label)| Tick {
            position: y.apply(value),
            label,
        })
        .collect();

    MiniChart {
        width: tip.width,
        height: tip.height,
        margin: tip.margin,
        color: config
            .catalog
            .color_of(&layer.key)
            .unwrap_or_default()
            .to_string(),
        bars,
        x_axis: Axis {
            orient: AxisOrient::Bottom,
            range: (0.0, inner_width),
            offset: inner_height,
            ticks: x_ticks,
        },
        y_axis: Axis {
            orient: AxisOrient::Left,
            range: (inner_height, 0.0),
            offset: 0.0,
            ticks: y_ticks,
        },
    }
}

/// Record with the smallest date distance to the pointer's x position
fn nearest_readout(chart: &Chart, hover: Hover, config: &ChartConfig) -> Option<Readout> {
    let x = chart.scales.x?;
    let layer = chart.layers.get(hover.layer)?;
    let target = x.invert_days(hover.pointer.x - config.margin.left);

    let (record, date) = chart
        .records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.date.map(|d| (i, d)))
        .min_by(|(_, a), (_, b)| {
            let da = ((*a - x.domain.0).num_days() as f64 - target).abs();
            let db = ((*b - x.domain.0).num_days() as f64 - target).abs();
            da.total_cmp(&db)
        })?;

    Some(Readout {
        record,
        date,
        value: layer.bands.get(record)?.thickness(),
    })
}
