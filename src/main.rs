use clap::Parser;
use users_etl::core::{ConfigProvider, Storage};
use users_etl::utils::error::ErrorSeverity;
use users_etl::utils::{logger, validation::Validate};
use users_etl::{
    CliConfig, Converter, EtlEngine, FileDelivery, HttpDelivery, LocalStorage,
    RuleTable, RunOutcome, RunReport, UsersPipeline,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // Logging
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting users-etl CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let mut converter = Converter::new(RuleTable::default());
    if let Some(workers) = config.workers() {
        converter = converter.with_max_workers(workers);
    }

    let result = run(&config, converter).await;

    match result {
        Ok(report) => {
            let dropped = report.dropped.as_ref().map(|d| d.len()).unwrap_or(0);
            match report.outcome {
                RunOutcome::Complete => println!("✅ Delivered {} users", report.delivered),
                RunOutcome::Partial => {
                    println!(
                        "⚠️  Delivered {} users, dropped {}",
                        report.delivered, dropped
                    );
                    if let Some(errors) = &report.dropped {
                        for failure in errors {
                            println!("   - {}", failure);
                        }
                    }
                }
            }
            println!("📁 Destination: {}", report.receipt.destination);
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(config: &CliConfig, converter: Converter) -> users_etl::Result<RunReport> {
    // Relative inputs resolve against the working directory; absolute ones replace the base.
    let payload = LocalStorage::new(".".to_string())
        .read_file(&config.input)
        .await?;

    if config.dry_run {
        let storage = LocalStorage::new(config.output_path.clone());
        EtlEngine::new(UsersPipeline::new(converter, FileDelivery::new(storage)))
            .run(payload)
            .await
    } else {
        let delivery = HttpDelivery::from_config(config)?;
        EtlEngine::new(UsersPipeline::new(converter, delivery))
            .run(payload)
            .await
    }
}
