//! Tracing setup: human-readable diagnostics on stderr plus the append-only
//! interaction log.

use std::io;
use std::path::{Path, PathBuf};

use promptrelay_config::LoggingConfig;
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::{Directive, ParseError, Targets};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Events emitted under this target go to the interaction log only.
const INTERACTIONS_TARGET: &str = "promptrelay::interactions";

const DEFAULT_LOG_FILE: &str = "llm_interactions.log";

/// Install the global subscriber. Keep the returned guard alive until exit
/// or buffered interaction lines are lost.
pub fn init(
    verbose: bool,
    config: &LoggingConfig,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = stderr_filter(verbose, rust_log.as_deref())?;

    let (file_layer, guard) = if config.enabled {
        let (writer, guard) = tracing_appender::non_blocking(interaction_appender(config)?);
        (Some(interaction_layer(writer)), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(stderr_layer(filter, io::stderr))
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

/// `RUST_LOG` when set and valid, else `debug`/`info`. The interaction
/// target is always muted on stderr.
fn stderr_filter(verbose: bool, rust_log: Option<&str>) -> Result<EnvFilter, ParseError> {
    let level = if verbose { "debug" } else { "info" };
    let filter = rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level));

    let mute: Directive = format!("{INTERACTIONS_TARGET}=off").parse()?;
    Ok(filter.add_directive(mute))
}

fn stderr_layer<S, W>(filter: EnvFilter, writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .with_filter(filter)
}

fn interaction_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_filter(Targets::new().with_target(INTERACTIONS_TARGET, Level::INFO))
}

/// A never-rotating appender over the configured interaction log path.
fn interaction_appender(config: &LoggingConfig) -> Result<RollingFileAppender, InitError> {
    let (dir, file_name) = split_log_path(&config.interaction_log);
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
}

/// Split the configured log path into the directory and file name the
/// appender wants. A bare file name lands in the working directory.
fn split_log_path(path: &Path) -> (PathBuf, String) {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
    (dir, file_name)
}
