use crate::config::toml_config::AnalysisConfig;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "dominance-fronts")]
#[command(about = "Pareto and Slater front analysis with HTML reports")]
pub struct CliConfig {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "fronts.toml")]
    pub config: String,

    /// Override report.output_dir from the configuration
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Write all artifacts into a single report.zip
    #[arg(long)]
    pub bundle: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// Analyze and render without writing any files
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    pub fn apply_overrides(&self, config: &mut AnalysisConfig) {
        if let Some(output_dir) = &self.output_dir {
            tracing::info!("Output directory overridden to: {}", output_dir);
            config.report.output_dir = output_dir.clone();
        }
        if self.bundle {
            config.report.bundle = true;
        }
    }
}
