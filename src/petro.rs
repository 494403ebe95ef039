//! Petrophysical derivations over a [`CurveTable`].
//!
//! Each derivation is a pure function of the table, the resolved roles and
//! its scalar parameters. Missing roles are an ordinary outcome
//! ([`Derivation::Unavailable`]); only invalid parameters are errors.

use std::fmt;

use serde::Serialize;

use crate::data::model::{Curve, CurveError, CurveTable};
use crate::resolver::{ResolvedRoles, Role};

/// Output curve names, always written in canonical form.
pub const DENSITY_POROSITY: &str = "DENSITY_POROSITY";
pub const VSH: &str = "VSH";
pub const PAYZONE: &str = "PAYZONE";

/// Clean-sand gamma-ray endpoint (API) of the linear shale model.
pub const GR_CLEAN: f64 = 30.0;
/// Pure-shale gamma-ray endpoint (API) of the linear shale model.
pub const GR_SHALE: f64 = 100.0;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Result of one derivation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Derivation {
    /// The input table plus the derived curve.
    Computed(CurveTable),
    /// Required roles that no column carries.
    Unavailable { missing: Vec<Role> },
}

impl Derivation {
    pub fn is_computed(&self) -> bool {
        matches!(self, Derivation::Computed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivationKind {
    DensityPorosity,
    ShaleVolume,
    PayFlag,
}

impl DerivationKind {
    pub const ALL: [DerivationKind; 3] = [
        DerivationKind::DensityPorosity,
        DerivationKind::ShaleVolume,
        DerivationKind::PayFlag,
    ];

    pub fn curve_name(self) -> &'static str {
        match self {
            DerivationKind::DensityPorosity => DENSITY_POROSITY,
            DerivationKind::ShaleVolume => VSH,
            DerivationKind::PayFlag => PAYZONE,
        }
    }

    pub fn required_roles(self) -> &'static [Role] {
        match self {
            DerivationKind::DensityPorosity => &[Role::BulkDensity],
            DerivationKind::ShaleVolume => &[Role::GammaRay],
            DerivationKind::PayFlag => &[Role::GammaRay, Role::NeutronPorosity],
        }
    }
}

impl fmt::Display for DerivationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerivationKind::DensityPorosity => f.write_str("density porosity"),
            DerivationKind::ShaleVolume => f.write_str("shale volume"),
            DerivationKind::PayFlag => f.write_str("pay flag"),
        }
    }
}

/// Per-derivation status reported to the caller, without the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Computed { curve: String },
    Unavailable { missing: Vec<Role> },
    /// Invalid parameters or a malformed table stopped this derivation only.
    Failed { reason: String },
}

impl Outcome {
    pub fn of(kind: DerivationKind, derivation: &Derivation) -> Self {
        match derivation {
            Derivation::Computed(_) => Outcome::Computed {
                curve: kind.curve_name().to_string(),
            },
            Derivation::Unavailable { missing } => Outcome::Unavailable {
                missing: missing.clone(),
            },
        }
    }

    pub fn failed(error: &CurveError) -> Self {
        Outcome::Failed {
            reason: error.to_string(),
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Outcome::Computed { .. })
    }
}

// ---------------------------------------------------------------------------
// Sample-wise formulas
// ---------------------------------------------------------------------------

/// `(ρma - ρb) / (ρma - ρf)`, unclipped.
pub fn porosity_sample(bulk_density: f64, matrix_density: f64, fluid_density: f64) -> f64 {
    (matrix_density - bulk_density) / (matrix_density - fluid_density)
}

/// Linear gamma-ray index clipped to `[0, 1]`.
pub fn vsh_sample(gr: f64, gr_clean: f64, gr_shale: f64) -> f64 {
    ((gr - gr_clean) / (gr_shale - gr_clean)).clamp(0.0, 1.0)
}

/// Strict cutoffs: `GR < gr_cutoff` and `NPHI > nphi_cutoff`.
pub fn is_pay(gr: f64, nphi: f64, gr_cutoff: f64, nphi_cutoff: f64) -> bool {
    gr < gr_cutoff && nphi > nphi_cutoff
}

// ---------------------------------------------------------------------------
// Curve derivations
// ---------------------------------------------------------------------------

fn ensure_finite(name: &str, value: f64) -> Result<(), CurveError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CurveError::DegenerateParameters(format!("{name} must be finite, got {value}")))
    }
}

/// Values of the curve carrying `role`, or `None` when the role is unresolved.
fn role_values<'a>(
    table: &'a CurveTable,
    roles: &ResolvedRoles,
    role: Role,
) -> Result<Option<&'a [Option<f64>]>, CurveError> {
    match roles.get(role) {
        Some(name) => Ok(Some(table.get(name)?.values.as_slice())),
        None => Ok(None),
    }
}

/// Density porosity from bulk density. Values outside `[0, 1]` are kept.
pub fn density_porosity(
    table: &CurveTable,
    roles: &ResolvedRoles,
    matrix_density: f64,
    fluid_density: f64,
) -> Result<Derivation, CurveError> {
    ensure_finite("matrix density", matrix_density)?;
    ensure_finite("fluid density", fluid_density)?;
    if matrix_density == fluid_density {
        return Err(CurveError::DegenerateParameters(format!(
            "matrix density equals fluid density ({matrix_density})"
        )));
    }

    let Some(rhob) = role_values(table, roles, Role::BulkDensity)? else {
        return Ok(Derivation::Unavailable {
            missing: vec![Role::BulkDensity],
        });
    };

    let values = rhob
        .iter()
        .map(|v| v.map(|rb| porosity_sample(rb, matrix_density, fluid_density)))
        .collect();
    let curve = Curve::new(DENSITY_POROSITY, values)
        .with_unit("V/V")
        .with_description("Density porosity");

    Ok(Derivation::Computed(table.with_curve_entry(curve)?))
}

/// Shale volume from gamma ray, clipped to `[0, 1]`.
pub fn shale_volume(
    table: &CurveTable,
    roles: &ResolvedRoles,
    gr_clean: f64,
    gr_shale: f64,
) -> Result<Derivation, CurveError> {
    ensure_finite("clean gamma ray", gr_clean)?;
    ensure_finite("shale gamma ray", gr_shale)?;
    if gr_shale <= gr_clean {
        return Err(CurveError::DegenerateParameters(format!(
            "shale gamma ray ({gr_shale}) must exceed clean gamma ray ({gr_clean})"
        )));
    }

    let Some(gr) = role_values(table, roles, Role::GammaRay)? else {
        return Ok(Derivation::Unavailable {
            missing: vec![Role::GammaRay],
        });
    };

    let values = gr
        .iter()
        .map(|v| v.map(|g| vsh_sample(g, gr_clean, gr_shale)))
        .collect();
    let curve = Curve::new(VSH, values)
        .with_unit("V/V")
        .with_description("Shale volume (linear GR index)");

    Ok(Derivation::Computed(table.with_curve_entry(curve)?))
}

/// 0/1 pay indicator. A sample missing GR or NPHI stays missing.
pub fn pay_flag(
    table: &CurveTable,
    roles: &ResolvedRoles,
    gr_cutoff: f64,
    nphi_cutoff: f64,
) -> Result<Derivation, CurveError> {
    ensure_finite("GR cutoff", gr_cutoff)?;
    ensure_finite("NPHI cutoff", nphi_cutoff)?;

    let gr = role_values(table, roles, Role::GammaRay)?;
    let nphi = role_values(table, roles, Role::NeutronPorosity)?;
    let (Some(gr), Some(nphi)) = (gr, nphi) else {
        return Ok(Derivation::Unavailable {
            missing: roles.missing(DerivationKind::PayFlag.required_roles()),
        });
    };

    let values = gr
        .iter()
        .zip(nphi)
        .map(|(g, n)| match (g, n) {
            (Some(g), Some(n)) => {
                let pay = is_pay(*g, *n, gr_cutoff, nphi_cutoff);
                Some(if pay { 1.0 } else { 0.0 })
            }
            _ => None,
        })
        .collect();
    let curve = Curve::new(PAYZONE, values).with_description("Pay zone flag");

    Ok(Derivation::Computed(table.with_curve_entry(curve)?))
}
