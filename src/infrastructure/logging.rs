use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{format::FmtSpan, MakeWriter},
    layer::{Layered, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Layer, Registry,
};

use crate::config::{LogFormat, LoggingConfig};

type BoxedSubscriber = Box<dyn Subscriber + Send + Sync + 'static>;

/// Installs the global tracing subscriber, writing to stdout
///
/// `RUST_LOG` takes precedence over the configured level. Fails instead of
/// panicking when the host already installed a subscriber.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    subscriber(filter, &config.format, std::io::stdout).try_init()?;

    tracing::info!(level = %config.level, format = ?config.format, "Logging initialized");
    Ok(())
}

fn subscriber<W>(filter: EnvFilter, format: &LogFormat, writer: W) -> BoxedSubscriber
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_span_events(FmtSpan::CLOSE);

    // Formatters differ in type, so the layer is boxed per branch.
    let layer: Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync> = match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Pretty => layer.pretty().with_target(true).boxed(),
    };

    Box::new(tracing_subscriber::registry().with(filter).with(layer))
}
