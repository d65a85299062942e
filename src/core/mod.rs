pub mod deriver;
pub mod dominance;
pub mod engine;
pub mod front;
pub mod runner;

pub use crate::domain::model::{
    BlockAnalysis, BlockInput, BlockReport, BlockSummary, DominationMap, Front, Point, PointId,
    Relation, RunSummary,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, ReportSink};
pub use crate::utils::error::Result;
