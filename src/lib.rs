//! FRSP Insight - derivation engine for session analytics dashboards
//!
//! Insight transforms two immutable input tables (a student roster with
//! assessment scores and session-level attendance batches) into the derived
//! views a read-only dashboard renders: per-day and per-student attendance,
//! assessment statistics and histograms, and the attendance/score
//! correlation.
//!
//! ## Modules
//!
//! - **sections**: closed label mappings and roll number resolution
//! - **attendance**: group-day and per-student session aggregation
//! - **assessment**: score statistics, pass rate, histogram
//! - **correlate**: attendance/score join and Pearson coefficient
//! - **selector**: selection state and per-selection view derivation
//! - **report**: versioned JSON report payloads

pub mod assessment;
pub mod attendance;
pub mod correlate;
pub mod dataset;
pub mod error;
pub mod report;
pub mod sections;
pub mod selector;
pub mod types;

pub use dataset::Dataset;
pub use error::InsightError;
pub use report::{ReportEncoder, ReportPayload};
pub use sections::resolve_roll;
pub use selector::{assessment_view, attendance_view, Selection};

/// Engine version embedded in all report payloads
pub const INSIGHT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "frsp-insight";
