//! Data structures for uploaded records and stacked layers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Name of the column holding each row's date
pub const DATE_COLUMN: &str = "Date";

/// A single CSV row before coercion, keyed by header name in header order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    /// Create a record from (column, value) pairs
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Get the raw string for a column, if the row has it
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Number of fields present in the row
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consume the record, yielding its fields in header order
    pub fn into_fields(self) -> Vec<(String, String)> {
        self.fields
    }
}

/// A row after date and numeric coercion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedRecord {
    /// Parsed "Date" column; `None` when the value could not be parsed
    pub date: Option<NaiveDate>,
    /// Every other column coerced to a number, in header order
    pub values: Vec<(String, f64)>,
}

impl NormalizedRecord {
    /// Value for a series key. Columns absent from the row read as NaN.
    pub fn value(&self, key: &str) -> f64 {
        self.values
            .iter()
            .find(|(name, _)| name == key)
            .map_or(f64::NAN, |(_, value)| *value)
    }
}

/// One series' (baseline, top) pair at one record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Band {
    pub baseline: f64,
    pub top: f64,
}

impl Band {
    pub fn new(baseline: f64, top: f64) -> Self {
        Self { baseline, top }
    }

    /// Height of the band; equals the series value at that record
    pub fn thickness(&self) -> f64 {
        self.top - self.baseline
    }

    /// Both edges are finite numbers
    pub fn is_defined(&self) -> bool {
        self.baseline.is_finite() && self.top.is_finite()
    }
}

/// One series after stacking: a band per record, in record order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    /// Series key from the catalog
    pub key: String,
    /// Position in the stacking order
    pub index: usize,
    pub bands: Vec<Band>,
}

impl Layer {
    /// Smallest finite baseline in the layer
    pub fn min_baseline(&self) -> Option<f64> {
        finite_fold(self.bands.iter().map(|b| b.baseline), f64::min)
    }

    /// Largest finite top in the layer
    pub fn max_top(&self) -> Option<f64> {
        finite_fold(self.bands.iter().map(|b| b.top), f64::max)
    }

    /// Largest finite band thickness in the layer
    pub fn max_thickness(&self) -> Option<f64> {
        finite_fold(self.bands.iter().map(Band::thickness), f64::max)
    }

    /// Number of bands whose thickness is NaN
    pub fn nan_count(&self) -> usize {
        self.bands.iter().filter(|b| b.thickness().is_nan()).count()
    }
}

/// Fold over finite values only, `None` when there are none
pub(crate) fn finite_fold(
    values: impl IntoIterator<Item = f64>,
    pick: fn(f64, f64) -> f64,
) -> Option<f64> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .reduce(pick)
}
