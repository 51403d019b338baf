//! Chart configuration injected into every pipeline stage

use crate::catalog::SeriesCatalog;
use crate::error::{Error, Result};
use crate::scale::is_valid_date_format;
use crate::stack::StackOffset;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Space around a plot area, in pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Tooltip and its embedded bar chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TooltipConfig {
    /// Outer width of the mini chart
    pub width: f64,
    /// Outer height of the mini chart
    pub height: f64,
    pub margin: Margin,
    /// Distance from the pointer to the tooltip's corner
    pub offset: f64,
    /// Inner padding of the tooltip box around the chart
    pub padding: f64,
    /// Title and readout rows drawn above the chart
    pub header_height: f64,
    /// Approximate number of value ticks
    pub y_ticks: usize,
    /// Fraction of each slot left empty between bars
    pub bar_padding: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 150.0,
            margin: Margin::new(10.0, 10.0, 30.0, 30.0),
            offset: 10.0,
            padding: 8.0,
            header_height: 36.0,
            y_ticks: 5,
            bar_padding: 0.1,
        }
    }
}

impl TooltipConfig {
    /// Tooltip box size including header rows, padding and border
    pub fn outer_size(&self) -> (f64, f64) {
        let frame = 2.0 * self.padding + 2.0;
        (self.width + frame, self.header_height + self.height + frame)
    }
}

/// Everything the pipeline needs besides the data itself
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    /// Outer SVG width
    pub width: f64,
    /// Outer SVG height
    pub height: f64,
    pub margin: Margin,
    pub catalog: SeriesCatalog,
    pub offset: StackOffset,
    /// Approximate number of ticks on the value axis
    pub y_ticks: usize,
    /// chrono format for time-axis labels
    pub x_tick_format: String,
    pub tooltip: TooltipConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 500.0,
            margin: Margin::new(20.0, 20.0, 50.0, 50.0),
            catalog: SeriesCatalog::default(),
            offset: StackOffset::Wiggle,
            y_ticks: 5,
            x_tick_format: "%b".to_string(),
            tooltip: TooltipConfig::default(),
        }
    }
}

impl ChartConfig {
    /// Width of the plot area inside the margins
    pub fn plot_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    /// Height of the plot area inside the margins
    pub fn plot_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }

    /// Load a JSON config; a missing file gives the defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the config as pretty JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::FileWrite {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| Error::FileWrite {
            path: path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.plot_width() > 0.0 && self.plot_height() > 0.0) {
            return Err(Error::Config(format!(
                "plot area must be positive, got {}x{} after margins",
                self.plot_width(),
                self.plot_height()
            )));
        }

        let tooltip = &self.tooltip;
        let inner_w = tooltip.width - tooltip.margin.left - tooltip.margin.right;
        let inner_h = tooltip.height - tooltip.margin.top - tooltip.margin.bottom;
        if !(inner_w > 0.0 && inner_h > 0.0) {
            return Err(Error::Config(
                "tooltip chart area must be positive".to_string(),
            ));
        }

        if !(tooltip.header_height >= 0.0) {
            return Err(Error::Config(format!(
                "tooltip header height must not be negative, got {}",
                tooltip.header_height
            )));
        }

        if !(0.0..1.0).contains(&tooltip.bar_padding) {
            return Err(Error::Config(format!(
                "bar padding must be in [0, 1), got {}",
                tooltip.bar_padding
            )));
        }

        if self.x_tick_format.is_empty() || !is_valid_date_format(&self.x_tick_format) {
            return Err(Error::Config(format!(
                "invalid x tick format: '{}'",
                self.x_tick_format
            )));
        }

        self.catalog.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ChartConfig::default();

        assert_eq!(config.plot_width(), 830.0);
        assert_eq!(config.plot_height(), 430.0);
        assert_eq!(config.offset, StackOffset::Wiggle);
        assert_eq!(config.catalog.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tooltip_outer_size_counts_header_rows() {
        let tooltip = TooltipConfig::default();
        assert_eq!(tooltip.outer_size(), (218.0, 204.0));

        let bare = TooltipConfig {
            header_height: 0.0,
            ..Default::default()
        };
        assert_eq!(bare.outer_size(), (218.0, 168.0));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ChartConfig =
            serde_json::from_str(r#"{ "width": 600, "offset": "zero" }"#).unwrap();

        assert_eq!(config.width, 600.0);
        assert_eq!(config.height, 500.0);
        assert_eq!(config.offset, StackOffset::Zero);
        assert_eq!(config.tooltip.width, 200.0);
    }

    #[test]
    fn test_custom_catalog_from_json() {
        let config: ChartConfig = serde_json::from_str(
            r##"{ "catalog": [{ "key": "Mistral", "color": "#123456" }] }"##,
        )
        .unwrap();

        assert_eq!(config.catalog.keys(), vec!["Mistral"]);
    }

    #[test]
    fn test_validate_rejects_margins_larger_than_chart() {
        let config = ChartConfig {
            width: 60.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.json");

        let config = ChartConfig {
            height: 640.0,
            y_ticks: 8,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = ChartConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = ChartConfig::load_from_file(&dir.path().join("none.json")).unwrap();
        assert_eq!(loaded, ChartConfig::default());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "catalog": [] }"#).unwrap();

        assert!(matches!(
            ChartConfig::load_from_file(&path),
            Err(Error::Config(_))
        ));
    }
}
