pub mod activity;
pub mod analysis;
pub mod args;
pub mod calendar;
pub mod chart;
pub mod config;
pub mod error;
pub mod narrative;
pub mod report;
pub mod server;
pub mod stats;
pub mod utils;

pub use analysis::Analyzer;
pub use args::Args;
pub use config::Config;
pub use error::CommitdayError;
pub use report::print_report;
pub use stats::{ActivityReport, Analysis, WeekdayCounts};
