//! Analysis parameters and their TOML configuration file.
//!
//! Every key is optional:
//!
//! ```toml
//! [params]
//! matrix_density = 2.71
//! gr_cutoff = 75.0
//!
//! [aliases]
//! GAMMA_RAY = ["GR", "SGR"]
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::petro::{GR_CLEAN, GR_SHALE};
use crate::resolver::{Role, RoleAliasSet};

pub const DEFAULT_MATRIX_DENSITY: f64 = 2.65;
pub const DEFAULT_FLUID_DENSITY: f64 = 1.0;
pub const DEFAULT_GR_CUTOFF: f64 = 60.0;
pub const DEFAULT_NPHI_CUTOFF: f64 = 0.2;

// ---------------------------------------------------------------------------
// AnalysisParams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisParams {
    /// Matrix density ρma (g/cc).
    pub matrix_density: f64,
    /// Fluid density ρf (g/cc).
    pub fluid_density: f64,
    /// Pay requires GR strictly below this (API).
    pub gr_cutoff: f64,
    /// Pay requires NPHI strictly above this (fraction).
    pub nphi_cutoff: f64,
    pub gr_clean: f64,
    pub gr_shale: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            matrix_density: DEFAULT_MATRIX_DENSITY,
            fluid_density: DEFAULT_FLUID_DENSITY,
            gr_cutoff: DEFAULT_GR_CUTOFF,
            nphi_cutoff: DEFAULT_NPHI_CUTOFF,
            gr_clean: GR_CLEAN,
            gr_shale: GR_SHALE,
        }
    }
}

/// A non-fatal note about a parameter outside its usual range.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamWarning {
    pub field: &'static str,
    pub value: f64,
    pub expected: (f64, f64),
}

impl fmt::Display for ParamWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} is outside the usual range {}..={}",
            self.field, self.value, self.expected.0, self.expected.1
        )
    }
}

impl AnalysisParams {
    /// Check every parameter against its usual domain.
    ///
    /// Out-of-range values are still used; degenerate combinations are
    /// rejected later by the derivations themselves.
    pub fn validate(&self) -> Vec<ParamWarning> {
        let checks: [(&'static str, f64, (f64, f64)); 6] = [
            ("matrix_density", self.matrix_density, (0.5, 4.0)),
            ("fluid_density", self.fluid_density, (0.5, 4.0)),
            ("gr_cutoff", self.gr_cutoff, (20.0, 150.0)),
            ("nphi_cutoff", self.nphi_cutoff, (0.0, 0.5)),
            ("gr_clean", self.gr_clean, (0.0, 300.0)),
            ("gr_shale", self.gr_shale, (0.0, 300.0)),
        ];

        checks
            .into_iter()
            .filter(|(_, value, (lo, hi))| !(lo..=hi).contains(&value))
            .map(|(field, value, expected)| ParamWarning {
                field,
                value,
                expected,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// AnalyzerConfig – parameters plus alias overrides
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzerConfig {
    pub params: AnalysisParams,
    /// Replacement alias lists, keyed by role.
    pub aliases: BTreeMap<Role, Vec<String>>,
}

/// On-disk layout; role keys are checked after parsing.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    params: AnalysisParams,
    aliases: BTreeMap<String, Vec<String>>,
}

impl AnalyzerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text).context("parsing analyzer config")?;
        let aliases = raw
            .aliases
            .into_iter()
            .map(|(key, names)| -> Result<(Role, Vec<String>)> {
                let role = key
                    .parse::<Role>()
                    .with_context(|| format!("[aliases] {key}"))?;
                Ok((role, names))
            })
            .collect::<Result<_>>()?;

        Ok(AnalyzerConfig {
            params: raw.params,
            aliases,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Default alias set with this config's overrides applied.
    pub fn alias_set(&self) -> RoleAliasSet {
        self.aliases
            .iter()
            .fold(RoleAliasSet::default(), |set, (role, names)| {
                set.with_aliases(*role, names.as_slice())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = AnalyzerConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, AnalyzerConfig::default());
        assert_eq!(cfg.params.matrix_density, 2.65);
        assert_eq!(cfg.params.fluid_density, 1.0);
        assert_eq!(cfg.params.gr_cutoff, 60.0);
        assert_eq!(cfg.params.nphi_cutoff, 0.2);
        assert!(cfg.params.validate().is_empty());
    }

    #[test]
    fn partial_params_and_aliases() {
        let cfg = AnalyzerConfig::from_toml_str(
            r#"
[params]
gr_cutoff = 75.0

[aliases]
GAMMA_RAY = ["sgr", "GR"]
"#,
        )
        .unwrap();
        assert_eq!(cfg.params.gr_cutoff, 75.0);
        assert_eq!(cfg.params.nphi_cutoff, DEFAULT_NPHI_CUTOFF);
        assert_eq!(
            cfg.alias_set().aliases(Role::GammaRay),
            &["SGR".to_string(), "GR".to_string()]
        );
        assert_eq!(
            cfg.alias_set().aliases(Role::BulkDensity),
            &["RHOB".to_string(), "RHOP".to_string()]
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AnalyzerConfig::from_toml_str("[params]\ngr_cutof = 70.0\n").is_err());
        assert!(AnalyzerConfig::from_toml_str("[aliases]\nCALIPER = [\"CALI\"]\n").is_err());
    }

    #[test]
    fn out_of_range_values_warn() {
        let params = AnalysisParams {
            gr_cutoff: 10.0,
            nphi_cutoff: 0.6,
            ..AnalysisParams::default()
        };
        let warnings = params.validate();
        let fields: Vec<_> = warnings.iter().map(|w| w.field).collect();
        assert_eq!(fields, vec!["gr_cutoff", "nphi_cutoff"]);
        assert!(warnings[0].to_string().contains("20..=150"));
    }
}
