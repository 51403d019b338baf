//! Sample CSV generator
//!
//! Produces monthly scores for every catalog series as a slow random walk,
//! so the output draws a readable streamgraph. Identical seeds give
//! identical files.

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use streamgraph_core::{SeriesCatalog, DATE_COLUMN};

/// Default seed used when no explicit seed is provided.
pub const DEFAULT_SEED: u64 = 42;

/// First month of every generated file
const START: (i32, u32) = (2024, 1);

/// Build a CSV with `months` rows, one column per catalog series
pub fn generate(catalog: &SeriesCatalog, months: usize, seed: u64) -> Result<String> {
    if months == 0 {
        return Err(Error::Other("months must be at least 1".to_string()));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut levels: Vec<f64> = catalog.iter().map(|_| rng.gen_range(5.0..20.0)).collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    let header = std::iter::once(DATE_COLUMN).chain(catalog.iter().map(|s| s.key.as_str()));
    writer.write_record(header).map_err(streamgraph_core::Error::from)?;

    let mut date = NaiveDate::from_ymd_opt(START.0, START.1, 1)
        .ok_or_else(|| Error::Other("invalid start month".to_string()))?;

    for _ in 0..months {
        let mut row = vec![date.format("%Y-%m-%d").to_string()];
        for level in levels.iter_mut() {
            *level = (*level + rng.gen_range(-2.0..2.5)).max(0.5);
            row.push(format!("{:.1}", level));
        }
        writer.write_record(&row).map_err(streamgraph_core::Error::from)?;
        date = next_month(date)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Other(format!("Failed to flush CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Other(e.to_string()))
}

fn next_month(date: NaiveDate) -> Result<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::Other(format!("date out of range after {}", date)))
}
