//! Run-length segmentation of a 0/1 indicator curve into depth zones.

use serde::Serialize;

use crate::data::model::{CurveError, CurveTable};

/// A contiguous run of flagged samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Zone {
    /// Depth of the first sample in the run.
    pub top_depth: f64,
    /// Depth of the last sample in the run.
    pub bottom_depth: f64,
    pub sample_count: usize,
    /// `|bottom_depth - top_depth|`; zero for a single-sample zone.
    pub thickness: f64,
}

impl Zone {
    fn from_run(depth: &[f64], start: usize, end: usize) -> Self {
        let top_depth = depth[start];
        let bottom_depth = depth[end];
        Zone {
            top_depth,
            bottom_depth,
            sample_count: end - start + 1,
            thickness: (bottom_depth - top_depth).abs(),
        }
    }
}

/// Segment the curve `indicator` of `table` into zones, in index order.
///
/// Any non-zero value counts as flagged; a missing sample counts as 0.
pub fn segment(table: &CurveTable, indicator: &str) -> Result<Vec<Zone>, CurveError> {
    let curve = table.get(indicator)?;
    let zones = segment_flags(table.depth().values(), &curve.values)
        .map_err(|_| CurveError::LengthMismatch {
            name: curve.mnemonic.clone(),
            expected: table.len(),
            actual: curve.len(),
        })?;
    log::debug!("Segmented {} into {} zones", curve.mnemonic, zones.len());
    Ok(zones)
}

/// Single forward scan. The sample before row 0 is taken as unflagged, so a
/// run starting at the first row is opened like any other.
///
/// `flags` must have one sample per depth; otherwise `LengthMismatch`.
pub fn segment_flags(depth: &[f64], flags: &[Option<f64>]) -> Result<Vec<Zone>, CurveError> {
    if flags.len() != depth.len() {
        return Err(CurveError::LengthMismatch {
            name: "flags".to_string(),
            expected: depth.len(),
            actual: flags.len(),
        }).unwrap();
    }

    let mut zones = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, flag) in flags.iter().enumerate() {
        let on = matches!(flag, Some(v) if *v != 0.0 && !v.is_nan());
        match (on, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                zones.push(Zone::from_run(depth, start, i - 1));
                run_start = None;
            }
            _ => {}
        }
    }

    if let Some(start) = run_start {
        zones.push(Zone::from_run(depth, start, flags.len() - 1));
    }

    Ok(zones)
}

// ---------------------------------------------------------------------------
// PaySummary – aggregate figures over all zones
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaySummary {
    pub zone_count: usize,
    pub pay_samples: usize,
    /// Sum of zone thicknesses.
    pub net_pay: f64,
    /// Depth span of the whole table.
    pub gross_interval: f64,
    /// `net_pay / gross_interval`, `None` when the table spans no depth.
    pub net_to_gross: Option<f64>,
}

impl PaySummary {
    pub fn from_zones(table: &CurveTable, zones: &[Zone]) -> Self {
        let depth = table.depth();
        let gross_interval = match (depth.first(), depth.last()) {
            (Some(first), Some(last)) => (last - first).abs(),
            _ => 0.0,
        };
        let net_pay: f64 = zones.iter().map(|z| z.thickness).sum();

        PaySummary {
            zone_count: zones.len(),
            pay_samples: zones.iter().map(|z| z.sample_count).sum(),
            net_pay,
            gross_interval,
            net_to_gross: (gross_interval > 0.0).then(|| net_pay / gross_interval),
        }
    }
}
