use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// CurveError – structural failures of table operations
// ---------------------------------------------------------------------------

/// Errors that abort a single table operation.
///
/// Missing *roles* are not errors; they are reported as values by the
/// resolver and the derivation engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    #[error("curve not found: {0}")]
    CurveNotFound(String),

    #[error("curve {name} has {actual} samples but the depth index has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("degenerate parameters: {0}")]
    DegenerateParameters(String),

    #[error("depth index is not strictly monotonic at row {row}")]
    NonMonotonicDepth { row: usize },

    #[error("depth at row {row} is not a finite number")]
    NonFiniteDepth { row: usize },

    #[error("two curves normalize to the same name {0}")]
    DuplicateCurve(String),
}

/// Canonical form of a mnemonic: trimmed and uppercased.
///
/// `str::trim` also strips the non-breaking spaces some LAS exporters leave
/// around mnemonics.
pub fn canonical_name(mnemonic: &str) -> String {
    mnemonic.trim().to_uppercase()
}

// ---------------------------------------------------------------------------
// Curve – one named measurement track
// ---------------------------------------------------------------------------

/// A single depth-aligned curve. `None` marks a missing sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub mnemonic: String,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub values: Vec<Option<f64>>,
}

impl Curve {
    pub fn new(mnemonic: &str, values: Vec<Option<f64>>) -> Self {
        Curve {
            mnemonic: canonical_name(mnemonic),
            unit: None,
            description: None,
            values,
        }
    }

    /// Build a curve from raw floats, mapping NaN to a missing sample.
    pub fn from_f64s(mnemonic: &str, values: &[f64]) -> Self {
        let values = values
            .iter()
            .map(|&v| if v.is_nan() { None } else { Some(v) })
            .collect();
        Curve::new(mnemonic, values)
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        let unit = unit.trim();
        self.unit = (!unit.is_empty()).then(|| unit.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        let description = description.trim();
        self.description = (!description.is_empty()).then(|| description.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of samples carrying a value.
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic)?;
        if let Some(unit) = &self.unit {
            write!(f, " [{unit}]")?;
        }
        if let Some(descr) = &self.description {
            write!(f, " – {descr}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DepthIndex – the shared, strictly monotonic depth axis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthDirection {
    Increasing,
    Decreasing,
}

/// Strictly monotonic depth axis, validated once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthIndex {
    values: Arc<[f64]>,
    direction: DepthDirection,
}

impl DepthIndex {
    pub fn new(values: Vec<f64>) -> Result<Self, CurveError> {
        if let Some(row) = values.iter().position(|d| !d.is_finite()) {
            return Err(CurveError::NonFiniteDepth { row });
        }

        let direction = match values.as_slice() {
            [first, second, ..] if second < first => DepthDirection::Decreasing,
            _ => DepthDirection::Increasing,
        };

        for (i, pair) in values.windows(2).enumerate() {
            let ok = match direction {
                DepthDirection::Increasing => pair[1] > pair[0],
                DepthDirection::Decreasing => pair[1] < pair[0],
            };
            if !ok {
                return Err(CurveError::NonMonotonicDepth { row: i + 1 });
            }
        }

        Ok(DepthIndex {
            values: values.into(),
            direction,
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn direction(&self) -> DepthDirection {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

// ---------------------------------------------------------------------------
// CurveTable – the complete loaded log
// ---------------------------------------------------------------------------

/// Immutable depth-indexed table of curves keyed by canonical name.
///
/// Adding a curve produces a new table; unchanged curves and the depth index
/// are shared between the old and new value.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveTable {
    depth: DepthIndex,
    curves: BTreeMap<String, Arc<Curve>>,
}

impl CurveTable {
    /// Build a table, normalizing mnemonics and checking alignment.
    pub fn new(depth: Vec<f64>, curves: Vec<Curve>) -> Result<Self, CurveError> {
        let depth = DepthIndex::new(depth)?;
        let mut table = CurveTable {
            depth,
            curves: BTreeMap::new(),
        };

        for mut curve in curves {
            curve.mnemonic = canonical_name(&curve.mnemonic);
            if table.curves.contains_key(&curve.mnemonic) {
                return Err(CurveError::DuplicateCurve(curve.mnemonic));
            }
            table.check_length(&curve)?;
            table.curves.insert(curve.mnemonic.clone(), Arc::new(curve));
        }

        Ok(table)
    }

    fn check_length(&self, curve: &Curve) -> Result<(), CurveError> {
        if curve.len() != self.depth.len() {
            return Err(CurveError::LengthMismatch {
                name: curve.mnemonic.clone(),
                expected: self.depth.len(),
                actual: curve.len(),
            });
        }
        Ok(())
    }

    pub fn depth(&self) -> &DepthIndex {
        &self.depth
    }

    /// Number of rows (samples per curve).
    pub fn len(&self) -> usize {
        self.depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }

    /// Canonical names of every curve in the table.
    pub fn curve_names(&self) -> BTreeSet<String> {
        self.curves.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.curves.contains_key(&canonical_name(name))
    }

    pub fn get(&self, name: &str) -> Result<&Curve, CurveError> {
        let key = canonical_name(name);
        self.curves
            .get(&key)
            .map(Arc::as_ref)
            .ok_or(CurveError::CurveNotFound(key))
    }

    /// Curves in canonical-name order.
    pub fn curves(&self) -> impl Iterator<Item = &Curve> {
        self.curves.values().map(Arc::as_ref)
    }

    /// New table with `name` added or replaced.
    pub fn with_curve(&self, name: &str, values: Vec<Option<f64>>) -> Result<Self, CurveError> {
        self.with_curve_entry(Curve::new(name, values))
    }

    /// Like [`CurveTable::with_curve`] but keeps the curve's unit and description.
    pub fn with_curve_entry(&self, mut curve: Curve) -> Result<Self, CurveError> {
        curve.mnemonic = canonical_name(&curve.mnemonic);
        self.check_length(&curve)?;

        let mut curves = self.curves.clone();
        curves.insert(curve.mnemonic.clone(), Arc::new(curve));
        Ok(CurveTable {
            depth: self.depth.clone(),
            curves,
        })
    }

    /// New table holding only the given rows, in the given order.
    ///
    /// Rows must be ascending so the depth index stays monotonic.
    pub fn select_rows(&self, rows: &[usize]) -> Result<Self, CurveError> {
        let depth_values = self.depth.values();
        let depth: Vec<f64> = rows
            .iter()
            .map(|&r| {
                depth_values
                    .get(r)
                    .copied()
                    .ok_or(CurveError::LengthMismatch {
                        name: "DEPTH".to_string(),
                        expected: depth_values.len(),
                        actual: r + 1,
                    })
            })
            .collect::<Result<_, _>>()?;

        let curves = self
            .curves()
            .map(|c| Curve {
                values: rows.iter().map(|&r| c.values[r]).collect(),
                ..c.clone()
            })
            .collect();

        CurveTable::new(depth, curves)
    }
}
