mod bootstrap;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use leavebot_core::{LoadOptions, LogFormat, LoggingConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = bootstrap::bootstrap(LoadOptions::default())
        .context("failed to bootstrap the application")?;
    init_logging(&app.config.logging)?;

    info!(
        event_name = "leavebot_starting",
        channel = %app.config.workflow.coordination_channel,
        schedule = %app.config.reminders.schedule,
    );

    let scheduler_handle = tokio::spawn(app.scheduler.run());

    let mut pump = app.pump;
    tokio::select! {
        result = pump.run() => {
            result.context("message pump failed")?;
            info!(event_name = "transport_closed");
        }
        _ = tokio::signal::ctrl_c() => {
            info!(event_name = "shutdown_requested");
        }
    }

    scheduler_handle.abort();
    Ok(())
}

fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("invalid log level")?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }

    Ok(())
}
