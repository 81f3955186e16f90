use crate::config::{self, get_config_element};
use crate::error::Result;
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, Layer, layer::Filter, prelude::*, registry::LookupSpan};

/// Installs the global tracing subscriber that writes to `STDERR`.
///
/// `log_spec_override` takes precedence over the configured `logging.log_spec`.
/// An invalid filter falls back to `info`.
pub fn init_logging(log_spec_override: Option<&str>) -> Result<()> {
    let logging_config: config::Logging = get_config_element()?;

    let log_spec = log_spec_override.unwrap_or(&logging_config.log_spec);

    let console_filter =
        EnvFilter::try_new(log_spec).unwrap_or_else(|_error| EnvFilter::new("info"));

    let registry =
        tracing_subscriber::Registry::default().with(console_layer_with_filter(console_filter));

    if registry.try_init().is_err() {
        // a subscriber is already installed, e.g. by a test harness
        tracing::debug!("global tracing subscriber was already set");
    }

    Ok(())
}

fn console_layer_with_filter<S, F: Filter<S> + 'static>(filter: F) -> impl Layer<S>
where
    S: Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_file(false)
        .with_target(true)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(filter)
}
