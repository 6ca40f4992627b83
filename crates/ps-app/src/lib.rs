//! Shared application service layer for plantsizer.
//!
//! This crate gives front ends one interface for loading studies, running
//! them through the sizing engines, and exporting reports.

pub mod error;
pub mod project_service;
pub mod report;
pub mod study_service;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use project_service::{
    LayoutSummary, StudySummary, fluid_kind, fluid_label, load_study, save_study, validate_study,
};
pub use report::{
    ChillerOptionReport, ChillerReport, ColumnReport, DesignReport, EqualRisersReport,
    LayoutReport, SegmentReport, StudyReport,
};
pub use study_service::{
    ChillerOutcome, EqualRisers, QuickSizeRequest, SegmentOutcome, StudyOutcome, build_catalog,
    build_fluid, build_hall_loads, build_limits, default_concentration, quick_study, run_study,
    select_chillers, selection_criteria,
};
