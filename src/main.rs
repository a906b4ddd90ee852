use bgremove::batch;
use bgremove::config::{Args, Config};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from(args);

    tracing::info!("Starting bgremove v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Processing {} into {} with tolerance {}",
        config.input_dir.display(),
        config.output_dir.display(),
        config.tolerance
    );

    let report = batch::run(&config)?;

    if report.failed > 0 {
        anyhow::bail!(
            "{} of {} files could not be processed",
            report.failed,
            report.files.len()
        );
    }

    Ok(())
}
