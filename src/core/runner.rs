use crate::core::{BlockSummary, Pipeline, RunSummary};
use crate::utils::error::Result;
use chrono::Utc;

pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let started_at = Utc::now();
        tracing::info!("Starting dominance analysis run");

        // Extract
        let blocks = self.pipeline.extract().await?;
        tracing::info!("Resolved {} blocks", blocks.len());

        // Transform
        let reports = self.pipeline.transform(blocks).await?;
        for report in &reports {
            tracing::info!(
                "{}: Pareto [{}], Slater [{}]",
                report.analysis.label,
                report.analysis.pareto_front.joined(),
                report.analysis.slater_front.joined()
            );
        }

        // Load
        let mut artifacts = self.pipeline.load(&reports).await?;
        tracing::info!("Stored {} artifacts", artifacts.len());

        let mut summary = RunSummary {
            started_at,
            finished_at: Utc::now(),
            blocks: reports.iter().map(|r| BlockSummary::from(&r.analysis)).collect(),
            artifacts: artifacts.clone(),
        };

        artifacts.extend(self.pipeline.finalize(&summary).await?);
        summary.artifacts = artifacts;
        summary.finished_at = Utc::now();

        Ok(summary)
    }
}
