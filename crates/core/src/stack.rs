//! Stack layout: one layer of (baseline, top) bands per catalog series
//!
//! The wiggle offset places the bottom layer's baseline so that the weighted
//! change in slope of every layer's midline is minimized, which is what gives
//! a streamgraph its flowing silhouette. The layers above are then stacked on
//! top of it, so each band's thickness is always the series value.

use crate::catalog::SeriesCatalog;
use crate::data::{Band, Layer, NormalizedRecord};
use serde::{Deserialize, Serialize};

/// Baseline policy for the bottom layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StackOffset {
    /// Streamgraph: minimize layer wiggle
    #[default]
    Wiggle,
    /// Plain stacked area chart anchored at zero
    Zero,
}

impl std::str::FromStr for StackOffset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wiggle" => Ok(Self::Wiggle),
            "zero" | "none" => Ok(Self::Zero),
            other => Err(format!("Unknown stack offset: {}", other)),
        }
    }
}

/// Build one layer per catalog series over the records, in catalog order
pub fn stack_layers(
    records: &[NormalizedRecord],
    catalog: &SeriesCatalog,
    offset: StackOffset,
) -> Vec<Layer> {
    // values[i][j]: series i at record j
    let values: Vec<Vec<f64>> = catalog
        .iter()
        .map(|series| records.iter().map(|r| r.value(&series.key)).collect())
        .collect();

    let base = match offset {
        StackOffset::Wiggle => wiggle_baseline(&values, records.len()),
        StackOffset::Zero => vec![0.0; records.len()],
    };

    let mut layers: Vec<Layer> = Vec::with_capacity(catalog.len());
    for (index, (series, series_values)) in catalog.iter().zip(&values).enumerate() {
        let bands = series_values
            .iter()
            .enumerate()
            .map(|(j, &value)| {
                let baseline = match layers.last() {
                    None => base[j],
                    Some(below) => {
                        // A NaN band below passes its own baseline upward
                        let under = below.bands[j];
                        if under.top.is_nan() {
                            under.baseline
                        } else {
                            under.top
                        }
                    }
                };
                Band::new(baseline, baseline + value)
            })
            .collect();

        layers.push(Layer {
            key: series.key.clone(),
            index,
            bands,
        });
    }

    layers
}

/// Bottom-layer baseline per record for the wiggle offset
///
/// Non-finite values count as 0 here so a single bad cell does not poison
/// the baseline of every following record.
fn wiggle_baseline(values: &[Vec<f64>], len: usize) -> Vec<f64> {
    let mut base = vec![0.0; len];
    if values.is_empty() || len == 0 {
        return base;
    }

    let v = |i: usize, j: usize| {
        let value = values[i][j];
        if value.is_finite() {
            value
        } else {
            0.0
        }
    };

    let mut y = 0.0;
    for j in 1..len {
        let mut s1 = 0.0;
        let mut s2 = 0.0;
        for i in 0..values.len() {
            let current = v(i, j);
            let mut s3 = (current - v(i, j - 1)) / 2.0;
            for k in 0..i {
                s3 += v(k, j) - v(k, j - 1);
            }
            s1 += current;
            s2 += s3 * current;
        }
        base[j - 1] = y;
        if s1 != 0.0 {
            y -= s2 / s1;
        }
    }
    base[len - 1] = y;

    base
}
