use anyhow::Context;
use city_tally::utils::{logger, validation::Validate};
use city_tally::{CliConfig, LocalStorage, TallyEngine, TallyError, TallyPipeline};
use clap::Parser;
use std::io::Write;

fn exit_with(error: &TallyError) -> ! {
    tracing::error!(
        "❌ City tally failed: {} (Category: {:?})",
        error,
        error.category()
    );
    eprintln!("❌ {}", error.user_friendly_message());
    std::process::exit(error.exit_code());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting city-tally");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let extractor = match config.gazetteer.build() {
        Ok(extractor) => extractor,
        Err(e) => exit_with(&e),
    };
    tracing::info!("🗺️  Gazetteer ready with {} city names", extractor.name_count());

    let keywords = match config.keyword_matcher() {
        Ok(keywords) => keywords,
        Err(e) => exit_with(&e),
    };
    if keywords.is_some() {
        tracing::info!("🔎 Counting {} keywords per comment", config.keywords.len());
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }
    let top = config.top;

    let storage = LocalStorage::new(&config.base_dir).with_output_dir(&config.output_dir);
    if !config.formats.is_empty() {
        tracing::info!("📁 Reports go to {}", storage.output_path().display());
    }
    let mut pipeline = TallyPipeline::new(storage, extractor, config);
    if let Some(keywords) = keywords {
        pipeline = pipeline.with_keywords(keywords);
    }
    let engine = TallyEngine::new_with_monitoring(pipeline, monitor_enabled);

    let report = match engine.run().await {
        Ok(report) => report,
        Err(e) => exit_with(&e),
    };

    tracing::info!(
        "✅ Tallied {} mentions of {} cities across {} documents",
        report.total_mentions,
        report.counts.len(),
        report.documents
    );
    for document in &report.per_document {
        tracing::info!(
            source = %document.source,
            month = ?document.month,
            comments = ?document.comments,
            "{} mentions",
            document.mentions
        );
    }

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{:?}", report.counts).context("failed to write city counts")?;
    writeln!(stdout, "{:?}", report.ranked_pairs(top)).context("failed to write city ranking")?;
    if !report.keywords.is_empty() {
        writeln!(stdout, "{:?}", report.keywords).context("failed to write keyword counts")?;
    }

    Ok(())
}
