use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// LAS null sentinel, written where a tool dropped out.
const NULL: f64 = -999.25;

/// Depth step (ft) and sample count of the synthetic log.
const STEP: f64 = 0.5;
const SAMPLES: usize = 2000;
const TOP: f64 = 5000.0;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Rock response of one interval: (GR, RHOB, NPHI, RESD) means.
#[derive(Clone, Copy)]
struct Facies {
    gr: f64,
    rhob: f64,
    nphi: f64,
    resd: f64,
}

const SHALE: Facies = Facies {
    gr: 105.0,
    rhob: 2.55,
    nphi: 0.32,
    resd: 2.0,
};
const WET_SAND: Facies = Facies {
    gr: 40.0,
    rhob: 2.30,
    nphi: 0.24,
    resd: 1.5,
};
const OIL_SAND: Facies = Facies {
    gr: 38.0,
    rhob: 2.22,
    nphi: 0.27,
    resd: 60.0,
};
const TIGHT_SAND: Facies = Facies {
    gr: 55.0,
    rhob: 2.58,
    nphi: 0.08,
    resd: 150.0,
};

/// Interval tops as sample offsets, each followed by its facies.
const LAYERS: [(usize, Facies); 8] = [
    (0, OIL_SAND),
    (60, SHALE),
    (400, OIL_SAND),
    (520, TIGHT_SAND),
    (700, SHALE),
    (1100, WET_SAND),
    (1350, SHALE),
    (1700, OIL_SAND),
];

fn facies_at(row: usize) -> Facies {
    LAYERS
        .iter()
        .rev()
        .find(|(start, _)| row >= *start)
        .map_or(SHALE, |(_, f)| *f)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let depth: Vec<f64> = (0..SAMPLES).map(|i| TOP + i as f64 * STEP).collect();
    let mut gr = Vec::with_capacity(SAMPLES);
    let mut rhob = Vec::with_capacity(SAMPLES);
    let mut nphi = Vec::with_capacity(SAMPLES);
    let mut resd = Vec::with_capacity(SAMPLES);

    for row in 0..SAMPLES {
        let f = facies_at(row);
        gr.push(rng.gauss(f.gr, 6.0).max(0.0));
        rhob.push(rng.gauss(f.rhob, 0.03));
        nphi.push(rng.gauss(f.nphi, 0.015));
        resd.push((rng.gauss(f.resd.ln(), 0.2)).exp());
    }

    // Short density-tool dropout.
    for v in rhob.iter_mut().skip(900).take(6) {
        *v = NULL;
    }

    let columns: [(&str, Vec<f64>); 5] = [
        ("DEPT", depth),
        ("GR", gr),
        ("RHOB", rhob),
        ("NPHI", nphi),
        ("RESD", resd),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, _)| Field::new(*name, DataType::Float64, false))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = columns
        .into_iter()
        .map(|(_, values)| Arc::new(Float64Array::from(values)) as ArrayRef)
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("creating record batch")?;

    let output_path = "sample_well.parquet";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    let bottom = TOP + (SAMPLES - 1) as f64 * STEP;
    println!("Wrote {SAMPLES} samples ({TOP} to {bottom} ft) to {output_path}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_pick_the_interval_containing_the_row() {
        assert_eq!(facies_at(0).gr, OIL_SAND.gr);
        assert_eq!(facies_at(59).gr, OIL_SAND.gr);
        assert_eq!(facies_at(60).gr, SHALE.gr);
        assert_eq!(facies_at(600).resd, TIGHT_SAND.resd);
        assert_eq!(facies_at(SAMPLES - 1).nphi, OIL_SAND.nphi);
    }
}
