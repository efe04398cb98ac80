//! Provide tracing, tailored to this crate.
//!
//! Binaries call one of the init_* functions once at startup to install a
//! tracing subscriber. Library code uses `use crate::tracing::prelude::*` for
//! the `trace!()`, `debug!()`, `info!()`, `warn!()`, and `error!()` macros and
//! never installs a subscriber itself.

use std::env;
use time::OffsetDateTime;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{format::Writer, time::FormatTime},
    prelude::*,
};

pub mod prelude {
    #[allow(unused_imports)]
    pub use tracing::{debug, error, info, trace, warn};
}

use prelude::*;

/// Initialize logging.
///
/// Under systemd, events go to journald; otherwise to stdout at INFO unless
/// RUST_LOG says otherwise.
pub fn init_journald_or_stdout() {
    init(LevelFilter::INFO);
}

/// Like [`init_journald_or_stdout`], lowering the default level to DEBUG when
/// `verbose` is set.
pub fn init_with_verbosity(verbose: bool) {
    init(if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    });
}

fn init(default_level: LevelFilter) {
    if env::var("JOURNAL_STREAM").is_ok() {
        if let Ok(layer) = tracing_journald::layer() {
            tracing_subscriber::registry().with(layer).init();
            return;
        }
        use_stdout(default_level);
        error!("Failed to initialize journald logging, using stdout.");
    } else {
        use_stdout(default_level);
    }
}

fn use_stdout(default_level: LevelFilter) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("RUST_LOG")
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(LocalTimer)
                .event_format(CompactFormatter),
        )
        .init();
}

/// Event formatter: local time, colored level, target with our crate prefix
/// stripped, message, then structured fields in dim text on the same line.
struct CompactFormatter;

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl tracing::field::Visit for FieldCollector {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let formatted = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(formatted);
        } else {
            self.fields.push((field.name(), formatted));
        }
    }
}

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for CompactFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);

        LocalTimer.format_time(&mut writer)?;

        let (color, label) = match *event.metadata().level() {
            tracing::Level::ERROR => ("\x1b[31m", "ERROR"),
            tracing::Level::WARN => ("\x1b[33m", "WARN "),
            tracing::Level::INFO => ("\x1b[32m", "INFO "),
            tracing::Level::DEBUG => ("\x1b[34m", "DEBUG"),
            tracing::Level::TRACE => ("\x1b[35m", "TRACE"),
        };
        write!(writer, " {}{}\x1b[0m ", color, label)?;

        let target = event.metadata().target();
        write!(writer, "{}: ", short_target(target))?;

        if let Some(message) = &visitor.message {
            write!(writer, "{}", message)?;
        }

        if !visitor.fields.is_empty() {
            write!(writer, " \x1b[90m")?;
            for (i, (key, value)) in visitor.fields.iter().enumerate() {
                if i > 0 {
                    write!(writer, " ")?;
                }
                write!(writer, "{}={}", key, value)?;
            }
            write!(writer, "\x1b[0m")?;
        }

        writeln!(writer)
    }
}

/// Strip this crate's prefix from a target; dependency paths stay whole.
fn short_target(target: &str) -> &str {
    target.strip_prefix("i2c_adc::").unwrap_or(target)
}

// Local time to the nearest second. The default timer prints UTC with a
// long, noisy format.
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = OffsetDateTime::now_local().unwrap_or(OffsetDateTime::now_utc());
        let formatted = now
            .format(time::macros::format_description!(
                "[hour]:[minute]:[second]"
            ))
            .map_err(|_| std::fmt::Error)?;
        write!(w, "{}", formatted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_target_strips_own_prefix() {
        assert_eq!(short_target("i2c_adc::transport::i2c_dev"), "transport::i2c_dev");
        assert_eq!(short_target("mio::poll"), "mio::poll");
    }
}
