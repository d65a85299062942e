use crate::domain::model::{
    BlockInput, BlockReport, OutputFormat, PlotOptions, Relation, RunSummary,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Destination for rendered report artifacts. Each method returns the location
/// the artifact was stored at.
pub trait ReportSink: Send + Sync {
    fn accept_table(
        &self,
        block: &str,
        html: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
    fn accept_plot(
        &self,
        block: &str,
        relation: Relation,
        html: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
    fn accept_data(
        &self,
        file_name: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Flushes buffered artifacts. Returns the location of anything written here.
    fn finish(&self) -> impl std::future::Future<Output = Result<Option<String>>> + Send {
        async { Ok(None) }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn output_dir(&self) -> &str;
    fn group_size(&self) -> usize;
    fn plot_options(&self) -> PlotOptions;
    fn formats(&self) -> &[OutputFormat];
    /// Blocks in execution order with their start ordinals resolved.
    fn blocks(&self) -> Result<Vec<BlockInput>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<BlockInput>>;
    async fn transform(&self, blocks: Vec<BlockInput>) -> Result<Vec<BlockReport>>;
    async fn load(&self, reports: &[BlockReport]) -> Result<Vec<String>>;

    /// Called once after `load` with the run summary.
    async fn finalize(&self, _summary: &RunSummary) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
