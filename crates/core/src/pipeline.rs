//! The whole pipeline: CSV text to a chart ready for drawing and hovering

use crate::config::ChartConfig;
use crate::data::{Layer, NormalizedRecord};
use crate::error::Result;
use crate::interaction::{tooltip, HoverState, Tooltip};
use crate::parser::parse_from_string;
use crate::scale::Scales;
use crate::scene::{render_with_scales, Scene};
use crate::stack::stack_layers;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A fully built chart. Nothing is shared with the previous upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chart {
    pub records: Vec<NormalizedRecord>,
    pub layers: Vec<Layer>,
    pub scales: Scales,
    pub scene: Scene,
}

impl Chart {
    /// Stack, scale and render already normalized records
    pub fn build(records: Vec<NormalizedRecord>, config: &ChartConfig) -> Self {
        let layers = stack_layers(&records, &config.catalog, config.offset);
        let scales = Scales::resolve(&records, &layers, config);
        let scene = render_with_scales(&records, &layers, &scales, config);

        debug!(
            "Built chart: {} records, {} layers, {} drawable elements",
            records.len(),
            layers.len(),
            scene.element_count()
        );

        Self {
            records,
            layers,
            scales,
            scene,
        }
    }

    /// Parse, normalize and build in one step
    pub fn from_csv(text: &str, config: &ChartConfig) -> Result<Self> {
        let records = parse_from_string(text)?;
        Ok(Self::build(records, config))
    }

    /// Index of the layer with `key`
    pub fn layer_index(&self, key: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.key == key)
    }

    /// Tooltip for the current hover state; `None` hides it
    pub fn tooltip(&self, state: &HoverState, config: &ChartConfig) -> Option<Tooltip> {
        tooltip(self, state, config)
    }
}
