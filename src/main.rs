use clap::Parser;
use dominance_fronts::config::LogFormat;
use dominance_fronts::core::RunSummary;
use dominance_fronts::render::summary::console_summary;
use dominance_fronts::utils::error::ErrorSeverity;
use dominance_fronts::utils::{logger, validation::Validate};
use dominance_fronts::{
    AnalysisConfig, AnalysisError, ArchiveSink, CliConfig, DirectorySink, MemorySink,
    ReportEngine, ReportPipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Text => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Loading configuration from: {}", cli.config);
    let mut config = match AnalysisConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }
    tracing::info!(
        "Configuration '{}' loaded with {} blocks",
        config.analysis.name,
        config.blocks.len()
    );

    let output_dir = config.report.output_dir.clone();
    let result = if cli.dry_run {
        tracing::info!("Dry run: artifacts are rendered but not written");
        run(ReportPipeline::new(MemorySink::new(), config)).await
    } else if config.report.bundle {
        run(ReportPipeline::new(ArchiveSink::new(&output_dir), config)).await
    } else {
        run(ReportPipeline::new(DirectorySink::new(&output_dir), config)).await
    };

    match result {
        Ok(summary) => {
            for block in &summary.blocks {
                println!("{}", console_summary(block));
            }
            println!();
            if cli.dry_run {
                println!("✅ Dry run complete: {} artifacts rendered", summary.artifacts.len());
            } else {
                println!("✅ Report written to: {}", output_dir);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "Analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn run<S, C>(pipeline: ReportPipeline<S, C>) -> Result<RunSummary, AnalysisError>
where
    S: dominance_fronts::core::ReportSink,
    C: dominance_fronts::core::ConfigProvider,
{
    ReportEngine::new(pipeline).run().await
}
