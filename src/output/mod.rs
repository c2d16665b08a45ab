//! Report structures and output formatting

pub mod report;
pub mod formatter;

pub use formatter::{save_report_to_file, suggest_filename, OutputFormatter, ReportGenerator};
pub use report::{AnalysisReport, MatchLevel, ReportMetadata};
