//! Renderer: a pure description of everything drawn on the main surface
//!
//! [`render_scene`] never touches a drawing surface. Adapters (the SVG writer,
//! the web dashboard) replace whatever they showed before with the scene, so
//! drawing the same data twice gives the same output.

use crate::config::{ChartConfig, Margin};
use crate::data::{Layer, NormalizedRecord};
use crate::geometry::{area_path, project_layer};
use crate::scale::{format_date, Scales};
use serde::{Deserialize, Serialize};

/// Length of axis tick marks, in pixels
pub const TICK_SIZE: f64 = 6.0;

/// Which side of the plot an axis sits on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AxisOrient {
    Bottom,
    Left,
}

/// A tick mark and its label, positioned along the axis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Axis {
    pub orient: AxisOrient,
    /// Extent of the axis line in plot coordinates
    pub range: (f64, f64),
    /// Offset of the axis line from the plot origin, perpendicular to it
    pub offset: f64,
    pub ticks: Vec<Tick>,
}

impl Axis {
    /// Domain line plus one element per tick
    pub fn element_count(&self) -> usize {
        1 + self.ticks.len()
    }
}

/// One filled layer path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerShape {
    pub key: String,
    pub color: String,
    /// SVG path data in plot coordinates; empty when nothing is drawable
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegendEntry {
    pub key: String,
    pub color: String,
}

/// Everything drawn for one dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    /// Outer surface size
    pub width: f64,
    pub height: f64,
    /// Plot origin inside the surface
    pub margin: Margin,
    pub layers: Vec<LayerShape>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub legend: Vec<LegendEntry>,
}

impl Scene {
    /// Number of drawable elements an adapter produces for this scene
    pub fn element_count(&self) -> usize {
        self.layers.len()
            + self.x_axis.element_count()
            + self.y_axis.element_count()
            + self.legend.len()
    }

    pub fn plot_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }
}

/// Build the scene for a dataset and its layers
pub fn render_scene(records: &[NormalizedRecord], layers: &[Layer], config: &ChartConfig) -> Scene {
    let scales = Scales::resolve(records, layers, config);
    render_with_scales(records, layers, &scales, config)
}

/// Build the scene with already resolved scales
pub fn render_with_scales(
    records: &[NormalizedRecord],
    layers: &[Layer],
    scales: &Scales,
    config: &ChartConfig,
) -> Scene {
    let plot_width = config.plot_width();
    let plot_height = config.plot_height();

    let shapes = layers
        .iter()
        .map(|layer| {
            let path = match (&scales.x, &scales.y) {
                (Some(x), Some(y)) => area_path(&project_layer(layer, records, x, y)),
                _ => String::new(),
            };
            LayerShape {
                key: layer.key.clone(),
                color: config
                    .catalog
                    .color_of(&layer.key)
                    .unwrap_or_default()
                    .to_string(),
                path,
            }
        })
        .collect();

    let x_ticks = scales
        .x
        .map(|x| {
            x.month_ticks()
                .into_iter()
                .map(|date| Tick {
                    position: x.apply(date),
                    label: format_date(date, &config.x_tick_format),
                })
                .collect()
        })
        .unwrap_or_default();

    let y_ticks = scales
        .y
        .map(|y| {
            y.labelled_ticks(config.y_ticks)
                .into_iter()
                .map(|(value, label)| Tick {
                    position: y.apply(value),
                    label,
                })
                .collect()
        })
        .unwrap_or_default();

    let legend = config
        .catalog
        .iter()
        .map(|series| LegendEntry {
            key: series.key.clone(),
            color: series.color.clone(),
        })
        .collect();

    Scene {
        width: config.width,
        height: config.height,
        margin: config.margin,
        layers: shapes,
        x_axis: Axis {
            orient: AxisOrient::Bottom,
            range: (0.0, plot_width),
            offset: plot_height,
            ticks: x_ticks,
        },
        y_axis: Axis {
            orient: AxisOrient::Left,
            range: (plot_height, 0.0),
            offset: 0.0,
            ticks: y_ticks,
        },
        legend,
    }
}
