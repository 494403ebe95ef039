//! End-to-end tests through the public API: load → clean → derive → segment.

use std::io::Write;

use well_log_analyzer::analysis::WellAnalysis;
use well_log_analyzer::config::{AnalysisParams, AnalyzerConfig};
use well_log_analyzer::data::{filter, loader};
use well_log_analyzer::petro::{self, DerivationKind, Outcome};
use well_log_analyzer::resolver::{self, Role, RoleAliasSet};
use well_log_analyzer::zones::{self, Zone};
use well_log_analyzer::{Curve, CurveError, CurveTable};

fn write_csv(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("well.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn csv_log_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "\
DEPT,GR,RHOB,NPHI,RT
1000.0,40,2.20,0.25,30
1000.5,45,2.25,0.28,35
1001.0,95,2.55,0.35,2
1001.5,,2.50,0.30,3
1002.0,50,2.30,0.22,20
",
    );

    let raw = loader::load_file(&path).unwrap();
    assert_eq!(raw.len(), 5);

    let table = filter::drop_incomplete_rows(&raw, &[]).unwrap();
    assert_eq!(table.len(), 4);

    let analysis = WellAnalysis::run(table, &AnalyzerConfig::default()).unwrap();
    assert!(DerivationKind::ALL
        .iter()
        .all(|k| matches!(analysis.outcome(*k), Some(Outcome::Computed { .. }))));

    assert_eq!(
        analysis.zones,
        vec![
            Zone {
                top_depth: 1000.0,
                bottom_depth: 1000.5,
                sample_count: 2,
                thickness: 0.5,
            },
            Zone {
                top_depth: 1002.0,
                bottom_depth: 1002.0,
                sample_count: 1,
                thickness: 0.0,
            },
        ]
    );

    let summary = analysis.summary.as_ref().unwrap();
    assert_eq!(summary.pay_samples, 3);
    assert_eq!(summary.gross_interval, 2.0);
}

#[test]
fn missing_roles_degrade_gracefully() {
    let table = CurveTable::new(
        vec![1.0, 2.0, 3.0],
        vec![Curve::new(" Gr ", vec![Some(20.0), Some(65.0), Some(120.0)])],
    )
    .unwrap();

    let analysis = WellAnalysis::run(table, &AnalyzerConfig::default()).unwrap();

    assert_eq!(
        analysis.outcome(DerivationKind::DensityPorosity),
        Some(&Outcome::Unavailable {
            missing: vec![Role::BulkDensity]
        })
    );
    assert_eq!(
        analysis.outcome(DerivationKind::PayFlag),
        Some(&Outcome::Unavailable {
            missing: vec![Role::NeutronPorosity]
        })
    );
    assert_eq!(
        analysis.table.get(petro::VSH).unwrap().values,
        vec![Some(0.0), Some(0.5), Some(1.0)]
    );
    assert!(analysis.zones.is_empty());
}

#[test]
fn alias_overrides_from_config_drive_resolution() {
    let config = AnalyzerConfig::from_toml_str(
        r#"
[params]
gr_cutoff = 80.0

[aliases]
NEUTRON_POROSITY = ["TNPH", "NPHI"]
"#,
    )
    .unwrap();

    let table = CurveTable::new(
        vec![0.0, 1.0],
        vec![
            Curve::new("GR", vec![Some(70.0), Some(70.0)]),
            Curve::new("NPHI", vec![Some(0.1), Some(0.1)]),
            Curve::new("tnph", vec![Some(0.3), Some(0.3)]),
        ],
    )
    .unwrap();

    assert_eq!(resolver::resolve(&table, Role::NeutronPorosity).as_deref(), Some("NPHI"));

    let analysis = WellAnalysis::run(table, &config).unwrap();
    assert_eq!(analysis.roles.get(Role::NeutronPorosity), Some("TNPH"));
    assert_eq!(analysis.zones.len(), 1);
    assert_eq!(analysis.zones[0].sample_count, 2);
}

#[test]
fn derivations_compose_without_mutation() {
    let base = CurveTable::new(
        vec![0.0, 1.0, 2.0],
        vec![
            Curve::new("GR", vec![Some(40.0), Some(80.0), Some(40.0)]),
            Curve::new("NEUTRON", vec![Some(0.3), Some(0.3), Some(0.3)]),
        ],
    )
    .unwrap();
    let roles = RoleAliasSet::default().resolve_all(&base);

    let with_pay = match petro::pay_flag(&base, &roles, 60.0, 0.2).unwrap() {
        petro::Derivation::Computed(t) => t,
        other => panic!("expected computed, got {other:?}"),
    };

    assert!(!base.contains(petro::PAYZONE));
    assert_eq!(zones::segment(&with_pay, petro::PAYZONE).unwrap().len(), 2);
    assert_eq!(
        zones::segment(&base, petro::PAYZONE).unwrap_err(),
        CurveError::CurveNotFound(petro::PAYZONE.to_string())
    );
}

#[test]
fn degenerate_densities_leave_pay_zones_intact() {
    let config = AnalyzerConfig {
        params: AnalysisParams {
            matrix_density: 1.0,
            fluid_density: 1.0,
            ..AnalysisParams::default()
        },
        ..AnalyzerConfig::default()
    };
    let table = CurveTable::new(
        vec![0.0, 1.0, 2.0, 3.0],
        vec![
            Curve::new("GR", vec![Some(40.0), Some(90.0), Some(40.0), Some(40.0)]),
            Curve::new("NPHI", vec![Some(0.3), Some(0.3), Some(0.3), Some(0.3)]),
        ],
    )
    .unwrap();

    let analysis = WellAnalysis::run(table, &config).unwrap();

    assert!(matches!(
        analysis.outcome(DerivationKind::DensityPorosity),
        Some(Outcome::Failed { .. })
    ));
    assert!(analysis.table.contains(petro::VSH));
    assert!(analysis.table.contains(petro::PAYZONE));
    assert_eq!(analysis.zones.len(), 2);
    assert_eq!(analysis.zones[1].sample_count, 2);
}
