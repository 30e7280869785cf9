use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::board::BlockId;
use crate::config::{LogFormat, LoggingConfig};

/// Initialize structured logging.
///
/// `RUST_LOG` takes precedence over the configured level. Output goes to
/// stderr so stdout stays free for board rendering.
pub fn init_telemetry(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))?;

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
    }

    tracing::debug!(level = %logging.level, format = ?logging.format, "Blockboard telemetry initialized");
    Ok(())
}

/// Span wrapping a single board command.
pub fn command_span(command: &str, block_id: Option<BlockId>) -> tracing::Span {
    tracing::info_span!(
        "board_command",
        command = command,
        block.id = block_id.map(|id| id.0),
    )
}
