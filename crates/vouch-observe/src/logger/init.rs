use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::OffsetTime, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError};

pub(crate) fn text(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let fmt_layer = fmt::layer()
        .with_ansi(cfg.use_color)
        .with_target(cfg.with_targets)
        .with_timer(timer());

    let subscriber = tracing_subscriber::registry()
        .with(filter(cfg)?)
        .with(fmt_layer);
    install(subscriber)
}

pub(crate) fn json(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let fmt_layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(cfg.with_targets)
        .with_current_span(false)
        .with_timer(timer());

    let subscriber = tracing_subscriber::registry()
        .with(filter(cfg)?)
        .with(fmt_layer);
    install(subscriber)
}

pub(crate) fn journald(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    journald_layer(filter(cfg)?)
}

fn filter(cfg: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let directive = cfg.directive();
    EnvFilter::try_new(&directive).map_err(|_| LoggerError::InvalidLogLevel(directive))
}

fn timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn install<S>(subscriber: S) -> Result<(), LoggerError>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber.try_init().map_err(|e| {
        let msg = e.to_string();
        if msg.contains("SetGlobalDefaultError") {
            LoggerError::AlreadyInitialized
        } else {
            LoggerError::InitializationFailed(msg)
        }
    })
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn journald_layer(filter: EnvFilter) -> Result<(), LoggerError> {
    let journald = tracing_journald::layer()
        .map_err(|e| LoggerError::InitializationFailed(format!("journald: {e}")))?
        .with_syslog_identifier("vouchd".to_string());
    let subscriber = tracing_subscriber::registry().with(filter).with(journald);
    install(subscriber)
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn journald_layer(_filter: EnvFilter) -> Result<(), LoggerError> {
    Err(LoggerError::JournaldNotSupported)
}
