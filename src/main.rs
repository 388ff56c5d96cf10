use clap::Parser;
use color_eyre::Result;
use myfly_route::{
    config::Config,
    logging,
    publisher::{Publisher, StdoutPublisher, WebhookPublisher},
    sampler::SamplerSettings,
    schedule, MyFlyClient, ReportGenerator,
};
use std::{path::PathBuf, time::Duration};
use tracing::error;

/// Posts a random MyFly Club route with bookable tickets.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Generate and publish a single report, then exit
    #[arg(long)]
    once: bool,

    /// Minimum airport size to consider (1-5)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    min_airport_size: Option<u8>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config = Config::load(&cli.config);
    let _log_guard = logging::initialize_logging(&config.logging);

    let client = MyFlyClient::new(&config.api)?;
    let generator = ReportGenerator::new(
        client,
        config.sampler.min_airport_size,
        SamplerSettings {
            max_attempts: config.sampler.max_attempts,
            retry_delay: Duration::from_millis(config.sampler.retry_delay_ms),
        },
    );

    let publisher: Box<dyn Publisher> = match config.publish.webhook_url.clone() {
        Some(url) => Box::new(WebhookPublisher::new(
            url,
            Duration::from_secs(config.publish.timeout_seconds),
        )?),
        None => Box::new(StdoutPublisher),
    };

    if cli.once {
        let message = generator.generate_report(cli.min_airport_size).await?;
        publisher.publish(&message).await?;
        return Ok(());
    }

    // Scheduled mode: one run per interval, never overlapping
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Unable to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    schedule::run_until(
        &generator,
        publisher.as_ref(),
        cli.min_airport_size,
        schedule::interval_from_hours(config.schedule.interval_hours),
        shutdown,
    )
    .await;

    Ok(())
}
