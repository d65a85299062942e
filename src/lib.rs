pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ArchiveSink, DirectorySink, MemorySink};
pub use app::pipelines::ReportPipeline;
pub use config::AnalysisConfig;
pub use crate::core::engine::{analyze_block, analyze_points};
pub use crate::core::runner::ReportEngine;
pub use domain::model::{BlockAnalysis, BlockInput, DominationMap, Front, Point, PointId, Relation};
pub use utils::error::{AnalysisError, Result};
