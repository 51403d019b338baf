//! Series catalog: the ordered set of stacked series and their colors

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A stacked series and its fixed display color
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Series {
    /// Column name in the uploaded CSV
    pub key: String,
    /// CSS hex color (`#rgb` or `#rrggbb`)
    pub color: String,
}

impl Series {
    pub fn new(key: &str, color: &str) -> Self {
        Self {
            key: key.to_string(),
            color: color.to_string(),
        }
    }
}

/// Ordered series set. Catalog order is stacking, rendering and legend order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SeriesCatalog {
    series: Vec<Series>,
}

impl Default for SeriesCatalog {
    fn default() -> Self {
        Self {
            series: vec![
                Series::new("LLaMA-3.1", "#ff7f00"),
                Series::new("Claude", "#984ea3"),
                Series::new("PaLM-2", "#4daf4a"),
                Series::new("Gemini", "#377eb8"),
                Series::new("GPT-4", "#e41a1c"),
            ],
        }
    }
}

impl SeriesCatalog {
    pub fn new(series: Vec<Series>) -> Self {
        Self { series }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Series> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Series keys in catalog order
    pub fn keys(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.key.as_str()).collect()
    }

    /// Color bound to a key
    pub fn color_of(&self, key: &str) -> Option<&str> {
        self.series
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.color.as_str())
    }

    /// Check for an empty catalog, duplicate keys and malformed colors
    pub fn validate(&self) -> Result<()> {
        if self.series.is_empty() {
            return Err(Error::Config("series catalog is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for series in &self.series {
            if series.key.is_empty() {
                return Err(Error::Config("series key cannot be empty".to_string()));
            }
            if series.key == crate::data::DATE_COLUMN {
                return Err(Error::Config(format!(
                    "series key cannot be the '{}' column",
                    crate::data::DATE_COLUMN
                )));
            }
            if !seen.insert(series.key.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate series key: {}",
                    series.key
                )));
            }
            if !is_hex_color(&series.color) {
                return Err(Error::Config(format!(
                    "invalid color '{}' for series {}",
                    series.color, series.key
                )));
            }
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a SeriesCatalog {
    type Item = &'a Series;
    type IntoIter = std::slice::Iter<'a, Series>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}

fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => {
            matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}
