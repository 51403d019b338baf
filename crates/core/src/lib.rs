//! streamgraph-core - Data pipeline for the streamgraph chart
//!
//! This crate contains WASM-compatible code that is shared between
//! the CLI and the dashboard.
//!
//! # Pipeline
//!
//! - Parse CSV text into records keyed by column name
//! - Normalize dates and numeric values (bad input degrades to `None` / NaN)
//! - Stack the catalog's series with a wiggle (or zero) baseline
//! - Resolve time, value and band scales
//! - Render a [`Scene`] that adapters draw, and tooltips for hover state

pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod parser;
pub mod pipeline;
pub mod scale;
pub mod scene;
pub mod stack;
pub mod svg;

pub use catalog::{Series, SeriesCatalog};
pub use config::{ChartConfig, Margin, TooltipConfig};
pub use data::{Band, Layer, NormalizedRecord, RawRecord, DATE_COLUMN};
pub use error::{Error, Result};
pub use interaction::{
    tooltip, Bar, Hover, HoverState, MiniChart, Pointer, PointerEvent, Readout, Tooltip,
};
pub use parser::{parse_from_file, parse_from_string, parse_raw};
pub use pipeline::Chart;
pub use scale::{BandScale, LinearScale, Scales, TimeScale};
pub use scene::{render_scene, Axis, AxisOrient, LayerShape, LegendEntry, Scene, Tick};
pub use stack::{stack_layers, StackOffset};
