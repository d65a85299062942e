use crate::adapters::sink::{ensure_distinct_stems, file_stem};
use crate::core::engine::analyze_block;
use crate::core::{
    BlockInput, BlockReport, ConfigProvider, Pipeline, Relation, ReportSink, RunSummary,
};
use crate::domain::model::{Artifact, OutputFormat};
use crate::render::{export, plot, table};
use crate::utils::error::Result;

pub const RUN_SUMMARY_FILE: &str = "run_summary.json";

/// Analyzes every configured block and hands the rendered artifacts to a sink.
pub struct ReportPipeline<S: ReportSink, C: ConfigProvider> {
    sink: S,
    config: C,
}

impl<S: ReportSink, C: ConfigProvider> ReportPipeline<S, C> {
    pub fn new(sink: S, config: C) -> Self {
        Self { sink, config }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn render(&self, block: &BlockInput) -> Result<BlockReport> {
        let analysis = analyze_block(block)?;
        let stem = file_stem(&analysis.label);
        let mut artifacts = Vec::new();

        for format in self.config.formats() {
            match format {
                OutputFormat::Html => {
                    artifacts.push(Artifact::Table {
                        html: table::render_tables(&analysis, self.config.group_size()),
                    });
                    for relation in Relation::ALL {
                        artifacts.push(Artifact::Plot {
                            relation,
                            html: plot::render_plot(
                                &analysis,
                                relation,
                                &self.config.plot_options(),
                            )?,
                        });
                    }
                }
                OutputFormat::Csv => artifacts.push(Artifact::Data {
                    file_name: format!("{}_points.csv", stem),
                    bytes: export::points_csv(&analysis)?,
                }),
                OutputFormat::Json => artifacts.push(Artifact::Data {
                    file_name: format!("{}_analysis.json", stem),
                    bytes: export::analysis_json(&analysis)?,
                }),
            }
        }

        Ok(BlockReport {
            analysis,
            artifacts,
        })
    }
}

#[async_trait::async_trait]
impl<S: ReportSink, C: ConfigProvider> Pipeline for ReportPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<BlockInput>> {
        let blocks = self.config.blocks()?;
        ensure_distinct_stems(blocks.iter().map(|b| b.label.as_str()))?;
        for block in &blocks {
            tracing::debug!(
                "Block '{}': {} samples from A{}",
                block.label,
                block.samples.len(),
                block.start_ordinal
            );
        }
        Ok(blocks)
    }

    async fn transform(&self, blocks: Vec<BlockInput>) -> Result<Vec<BlockReport>> {
        blocks.iter().map(|block| self.render(block)).collect()
    }

    async fn load(&self, reports: &[BlockReport]) -> Result<Vec<String>> {
        let mut locations = Vec::new();
        for report in reports {
            let label = report.analysis.label.as_str();
            for artifact in &report.artifacts {
                let location = match artifact {
                    Artifact::Table { html } => self.sink.accept_table(label, html).await?,
                    Artifact::Plot { relation, html } => {
                        self.sink.accept_plot(label, *relation, html).await?
                    }
                    Artifact::Data { file_name, bytes } => {
                        self.sink.accept_data(file_name, bytes).await?
                    }
                };
                tracing::debug!("Stored {}", location);
                locations.push(location);
            }
        }
        Ok(locations)
    }

    async fn finalize(&self, summary: &RunSummary) -> Result<Vec<String>> {
        let mut locations = Vec::new();
        let json = serde_json::to_vec_pretty(summary)?;
        locations.push(self.sink.accept_data(RUN_SUMMARY_FILE, &json).await?);
        if let Some(location) = self.sink.finish().await? {
            locations.push(location);
        }
        Ok(locations)
    }
}
