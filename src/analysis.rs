use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{AnalysisParams, AnalyzerConfig};
use crate::data::model::{CurveError, CurveTable};
use crate::petro::{self, Derivation, DerivationKind, Outcome};
use crate::resolver::{ResolvedRoles, Role, RoleAliasSet};
use crate::zones::{self, PaySummary, Zone};

/// Roles needed for the lithology / resistivity / porosity display tracks.
pub const TRIPLE_COMBO: [Role; 4] = [
    Role::GammaRay,
    Role::Resistivity,
    Role::BulkDensity,
    Role::NeutronPorosity,
];

// ---------------------------------------------------------------------------
// Well analysis
// ---------------------------------------------------------------------------

/// Everything derived from one loaded log, independent of presentation.
#[derive(Debug, Clone)]
pub struct WellAnalysis {
    /// Input table plus every derived curve that could be computed.
    pub table: CurveTable,

    /// Curve carrying each role (`None` when no alias matched).
    pub roles: ResolvedRoles,

    /// Status of each derivation.
    pub outcomes: BTreeMap<DerivationKind, Outcome>,

    /// Pay zones, empty when the pay flag is unavailable.
    pub zones: Vec<Zone>,

    /// Aggregate pay figures, present only when the pay flag was computed.
    pub summary: Option<PaySummary>,
}

impl WellAnalysis {
    /// Run every derivation against `table` and segment the pay flag.
    ///
    /// Derivations are independent: one that is unavailable or fails on its
    /// parameters is recorded in `outcomes` and the others still run.
    pub fn run(table: CurveTable, config: &AnalyzerConfig) -> Result<Self, CurveError> {
        let aliases = config.alias_set();
        Self::run_with(table, &config.params, &aliases)
    }

    pub fn run_with(
        table: CurveTable,
        params: &AnalysisParams,
        aliases: &RoleAliasSet,
    ) -> Result<Self, CurveError> {
        let roles = aliases.resolve_all(&table);
        for (role, name) in roles.iter() {
            match name {
                Some(name) => log::debug!("{role} resolved to {name}"),
                None => log::debug!("{role} not found"),
            }
        }

        let mut table = table;
        let mut outcomes = BTreeMap::new();

        for kind in DerivationKind::ALL {
            let attempt = match kind {
                DerivationKind::DensityPorosity => petro::density_porosity(
                    &table,
                    &roles,
                    params.matrix_density,
                    params.fluid_density,
                ),
                DerivationKind::ShaleVolume => {
                    petro::shale_volume(&table, &roles, params.gr_clean, params.gr_shale)
                }
                DerivationKind::PayFlag => {
                    petro::pay_flag(&table, &roles, params.gr_cutoff, params.nphi_cutoff)
                }
            };

            let outcome = match attempt {
                Ok(Derivation::Computed(next)) => {
                    log::info!("Computed {kind} as {}", kind.curve_name());
                    table = next;
                    Outcome::Computed {
                        curve: kind.curve_name().to_string(),
                    }
                }
                Ok(Derivation::Unavailable { missing }) => {
                    let names: Vec<&str> = missing.iter().map(|r| r.as_str()).collect();
                    log::warn!("Skipping {kind}: missing {}", names.join(", "));
                    Outcome::Unavailable { missing }
                }
                Err(err) => {
                    log::error!("{kind} failed: {err}");
                    Outcome::failed(&err)
                }
            };
            outcomes.insert(kind, outcome);
        }

        let (zones, summary) = if table.contains(petro::PAYZONE)
            && outcomes
                .get(&DerivationKind::PayFlag)
                .is_some_and(Outcome::is_computed)
        {
            let zones = zones::segment(&table, petro::PAYZONE)?;
            let summary = PaySummary::from_zones(&table, &zones);
            log::info!(
                "Found {} pay zones, net pay {:.2}",
                summary.zone_count,
                summary.net_pay
            );
            (zones, Some(summary))
        } else {
            (Vec::new(), None)
        };

        Ok(WellAnalysis {
            table,
            roles,
            outcomes,
            zones,
            summary,
        })
    }

    pub fn outcome(&self, kind: DerivationKind) -> Option<&Outcome> {
        self.outcomes.get(&kind)
    }

    /// Triple-combo roles that no curve carries; empty when all tracks can be drawn.
    pub fn missing_display_roles(&self) -> Vec<Role> {
        self.roles.missing(&TRIPLE_COMBO)
    }

    pub fn report(&self) -> AnalysisReport<'_> {
        AnalysisReport {
            rows: self.table.len(),
            curves: self.table.curve_names().into_iter().collect(),
            roles: &self.roles,
            outcomes: &self.outcomes,
            missing_display_roles: self.missing_display_roles(),
            zones: &self.zones,
            summary: self.summary.as_ref(),
        }
    }
}

/// Serializable view of a [`WellAnalysis`] for report collaborators.
#[derive(Debug, Serialize)]
pub struct AnalysisReport<'a> {
    pub rows: usize,
    pub curves: Vec<String>,
    pub roles: &'a ResolvedRoles,
    pub outcomes: &'a BTreeMap<DerivationKind, Outcome>,
    pub missing_display_roles: Vec<Role>,
    pub zones: &'a [Zone],
    pub summary: Option<&'a PaySummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Curve;

    fn full_table() -> CurveTable {
        CurveTable::new(
            vec![1000.0, 1000.5, 1001.0, 1001.5],
            vec![
                Curve::new("GR", vec![Some(40.0), Some(45.0), Some(90.0), Some(50.0)]),
                Curve::new("RHOB", vec![Some(2.2), Some(2.3), Some(2.6), Some(2.25)]),
                Curve::new("NPHI", vec![Some(0.25), Some(0.3), Some(0.1), Some(0.22)]),
                Curve::new("RT", vec![Some(20.0), Some(30.0), Some(2.0), Some(15.0)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn full_log_computes_everything() {
        let analysis = WellAnalysis::run(full_table(), &AnalyzerConfig::default()).unwrap();

        for kind in DerivationKind::ALL {
            assert!(
                matches!(analysis.outcome(kind), Some(Outcome::Computed { .. })),
                "{kind} not computed"
            );
            assert!(analysis.table.contains(kind.curve_name()));
        }
        assert_eq!(analysis.zones.len(), 2);
        assert_eq!(analysis.zones[0].sample_count, 2);
        assert_eq!(analysis.zones[1].top_depth, 1001.5);
        assert!(analysis.missing_display_roles().is_empty());
    }

    #[test]
    fn missing_neutron_only_blocks_pay() {
        let table = full_table();
        let table = CurveTable::new(
            table.depth().values().to_vec(),
            table.curves().filter(|c| c.mnemonic != "NPHI").cloned().collect(),
        )
        .unwrap();

        let analysis = WellAnalysis::run(table, &AnalyzerConfig::default()).unwrap();
        assert_eq!(
            analysis.outcome(DerivationKind::PayFlag),
            Some(&Outcome::Unavailable {
                missing: vec![Role::NeutronPorosity]
            })
        );
        assert!(analysis.table.contains(petro::DENSITY_POROSITY));
        assert!(analysis.table.contains(petro::VSH));
        assert!(analysis.zones.is_empty());
        assert!(analysis.summary.is_none());
        assert_eq!(analysis.missing_display_roles(), vec![Role::NeutronPorosity]);
    }

    #[test]
    fn degenerate_densities_only_fail_porosity() {
        let config = AnalyzerConfig {
            params: AnalysisParams {
                matrix_density: 1.0,
                fluid_density: 1.0,
                ..AnalysisParams::default()
            },
            ..AnalyzerConfig::default()
        };
        let analysis = WellAnalysis::run(full_table(), &config).unwrap();

        match analysis.outcome(DerivationKind::DensityPorosity) {
            Some(Outcome::Failed { reason }) => assert!(reason.contains("matrix density")),
            other => panic!("expected failed porosity, got {other:?}"),
        }
        assert!(!analysis.table.contains(petro::DENSITY_POROSITY));
        assert!(analysis.table.contains(petro::VSH));
        assert!(analysis.table.contains(petro::PAYZONE));
        assert_eq!(analysis.zones.len(), 2);
        assert!(analysis.summary.is_some());
    }

    #[test]
    fn degenerate_densities_without_density_curve_still_flag_pay() {
        let table = CurveTable::new(
            vec![0.0, 1.0, 2.0],
            vec![
                Curve::new("GR", vec![Some(40.0), Some(40.0), Some(90.0)]),
                Curve::new("NPHI", vec![Some(0.3), Some(0.3), Some(0.3)]),
            ],
        )
        .unwrap();
        let params = AnalysisParams {
            matrix_density: 1.0,
            fluid_density: 1.0,
            ..AnalysisParams::default()
        };
        let analysis = WellAnalysis::run_with(table, &params, &RoleAliasSet::default()).unwrap();

        assert!(matches!(
            analysis.outcome(DerivationKind::DensityPorosity),
            Some(Outcome::Failed { .. })
        ));
        assert!(analysis
            .outcome(DerivationKind::ShaleVolume)
            .is_some_and(Outcome::is_computed));
        assert_eq!(analysis.zones.len(), 1);
        assert_eq!(analysis.zones[0].sample_count, 2);
    }

    #[test]
    fn report_serializes() {
        let analysis = WellAnalysis::run(full_table(), &AnalyzerConfig::default()).unwrap();
        let json = serde_json::to_value(analysis.report()).unwrap();
        assert_eq!(json["rows"], 4);
        assert_eq!(json["outcomes"]["pay_flag"]["status"], "computed");
        assert_eq!(json["roles"]["RESISTIVITY"], "RT");
        assert_eq!(json["zones"][0]["top_depth"], 1000.0);
    }

    #[test]
    fn failed_outcome_serializes_reason() {
        let params = AnalysisParams {
            gr_clean: 100.0,
            gr_shale: 30.0,
            ..AnalysisParams::default()
        };
        let analysis =
            WellAnalysis::run_with(full_table(), &params, &RoleAliasSet::default()).unwrap();
        let json = serde_json::to_value(analysis.report()).unwrap();
        assert_eq!(json["outcomes"]["shale_volume"]["status"], "failed");
        assert!(json["outcomes"]["shale_volume"]["reason"]
            .as_str()
            .unwrap()
            .contains("must exceed"));
        assert_eq!(json["outcomes"]["pay_flag"]["status"], "computed");
    }
}
