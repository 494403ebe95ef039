//! Petrophysical analysis of well logs.
//!
//! ```text
//!  CurveTable ──► RoleAliasSet::resolve_all ──► petro::{density_porosity, shale_volume, pay_flag}
//!                                                        │
//!                                                        ▼
//!                                              zones::segment(PAYZONE)
//! ```
//!
//! [`analysis::WellAnalysis`] runs the whole chain for one log.

pub mod analysis;
pub mod config;
pub mod data;
pub mod petro;
pub mod resolver;
pub mod zones;

pub use analysis::WellAnalysis;
pub use config::{AnalysisParams, AnalyzerConfig};
pub use data::model::{Curve, CurveError, CurveTable};
pub use resolver::{Role, RoleAliasSet};
pub use zones::Zone;
