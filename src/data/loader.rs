use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{Curve, CurveTable, canonical_name};

/// Null sentinel written by LAS exporters for missing samples.
pub const LAS_NULL: f64 = -999.25;

/// Column names recognised as the depth index, in preference order.
pub const DEPTH_MNEMONICS: &[&str] = &["DEPT", "DEPTH", "MD", "TVD"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a curve table from a tabular export of a parsed well log.
/// Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one column per curve plus a depth column
/// * `.json`    – `{ "depth": [...], "curves": [{ "mnemonic": ..., "values": [...] }] }`
/// * `.parquet` – flat numeric columns, one of them the depth index
pub fn load_file(path: &Path) -> Result<CurveTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    };
    table.with_context(|| format!("loading {}", path.display()))
}

/// Map a raw sample to a value, treating NaN and the LAS sentinel as missing.
fn clean_sample(v: f64) -> Option<f64> {
    if v.is_nan() || (v - LAS_NULL).abs() < 1e-9 {
        None
    } else {
        Some(v)
    }
}

/// Position of the depth column: first recognised depth mnemonic, else column 0.
fn depth_column(names: &[String]) -> usize {
    DEPTH_MNEMONICS
        .iter()
        .find_map(|m| names.iter().position(|n| canonical_name(n) == *m))
        .unwrap_or(0)
}

/// Split the loaded columns into the depth index and the remaining curves.
fn assemble(names: Vec<String>, mut columns: Vec<Vec<Option<f64>>>) -> Result<CurveTable> {
    if names.is_empty() {
        bail!("no columns found");
    }
    let depth_idx = depth_column(&names);
    let depth_values = columns.remove(depth_idx);

    let depth: Vec<f64> = depth_values
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.with_context(|| format!("Row {row}: missing depth value")))
        .collect::<Result<_>>()?;

    let curves = names
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != depth_idx)
        .zip(columns)
        .map(|((_, name), values)| Curve::new(name, values))
        .collect();

    CurveTable::new(depth, curves).context("building curve table")
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with curve mnemonics, one row per depth sample.
/// Empty cells, `NaN` and `-999.25` are missing samples.
fn load_csv(path: &Path) -> Result<CurveTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, column) in columns.iter_mut().enumerate() {
            let cell = record.get(col_idx).unwrap_or("");
            column.push(parse_cell(cell, row_no, &headers[col_idx])?);
        }
    }

    assemble(headers, columns)
}

fn parse_cell(s: &str, row: usize, col: &str) -> Result<Option<f64>> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let v = s
        .parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))?;
    Ok(clean_sample(v))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Column-oriented JSON export:
///
/// ```json
/// {
///   "depth": [1000.0, 1000.5, ...],
///   "curves": [
///     { "mnemonic": "GR", "unit": "GAPI", "description": "Gamma Ray", "values": [45.1, null, ...] }
///   ]
/// }
/// ```
#[derive(Debug, Deserialize)]
struct JsonLog {
    depth: Vec<f64>,
    #[serde(default)]
    curves: Vec<JsonCurve>,
}

#[derive(Debug, Deserialize)]
struct JsonCurve {
    mnemonic: String,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    description: Option<String>,
    values: Vec<Option<f64>>,
}

fn load_json(path: &Path) -> Result<CurveTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let log: JsonLog = serde_json::from_str(&text).context("parsing JSON")?;

    let curves = log
        .curves
        .into_iter()
        .map(|c| {
            let values = c.values.into_iter().map(|v| v.and_then(clean_sample)).collect();
            let mut curve = Curve::new(&c.mnemonic, values);
            if let Some(unit) = &c.unit {
                curve = curve.with_unit(unit);
            }
            if let Some(descr) = &c.description {
                curve = curve.with_description(descr);
            }
            curve
        })
        .collect();

    CurveTable::new(log.depth, curves).context("building curve table")
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat numeric column per curve.
///
/// Float64, Float32, Int32 and Int64 columns are read; any other column
/// (well name strings and the like) is skipped.
fn load_parquet(path: &Path) -> Result<CurveTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let numeric: Vec<(usize, String)> = builder
        .schema()
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, f)| is_numeric(f.data_type()))
        .map(|(i, f)| (i, f.name().clone()))
        .collect();

    let skipped = builder.schema().fields().len() - numeric.len();
    if skipped > 0 {
        log::debug!("Skipping {skipped} non-numeric parquet columns");
    }

    let reader = builder.build().context("building parquet reader")?;
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); numeric.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for ((col_idx, name), out) in numeric.iter().zip(columns.iter_mut()) {
            append_numeric(batch.column(*col_idx), out)
                .with_context(|| format!("reading column '{name}'"))?;
        }
    }

    let names = numeric.into_iter().map(|(_, name)| name).collect();
    assemble(names, columns)
}

fn is_numeric(dt: &DataType) -> bool {
    matches!(
        dt,
        DataType::Float64 | DataType::Float32 | DataType::Int32 | DataType::Int64
    )
}

/// Append one Arrow column to `out`, mapping nulls to missing samples.
fn append_numeric(col: &ArrayRef, out: &mut Vec<Option<f64>>) -> Result<()> {
    match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            out.extend(arr.iter().map(|v| v.and_then(clean_sample)));
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            out.extend(arr.iter().map(|v| v.and_then(|x| clean_sample(x as f64))));
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            out.extend(arr.iter().map(|v| v.map(|x| x as f64)));
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            out.extend(arr.iter().map(|v| v.map(|x| x as f64)));
        }
        other => bail!("Expected a numeric column, got {other:?}"),
    }
    Ok(())
}
