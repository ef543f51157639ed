//! Structured logging for the dashboard server
//!
//! Console output comes in pretty, json or compact form; file output is
//! always plain text with one file per day.

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use serde::{Deserialize, Serialize};

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "salesdash.log";

/// Log format configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum LogFormat {
    /// Human-readable format for development
    Pretty,
    /// JSON format for production (structured logging)
    Json,
    /// Compact format for testing
    Compact,
}

impl LogFormat {
    /// Unknown values fall back to pretty output
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

impl From<String> for LogFormat {
    fn from(value: String) -> Self {
        LogFormat::parse(&value)
    }
}

impl From<LogFormat> for &'static str {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

/// Log output configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum LogOutput {
    /// Log to stdout only
    Stdout,
    /// Log to file only
    File,
    /// Log to both stdout and file
    Both,
}

impl LogOutput {
    /// Unknown values fall back to stdout
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "file" => LogOutput::File,
            "both" => LogOutput::Both,
            _ => LogOutput::Stdout,
        }
    }
}

impl From<String> for LogOutput {
    fn from(value: String) -> Self {
        LogOutput::parse(&value)
    }
}

impl From<LogOutput> for &'static str {
    fn from(output: LogOutput) -> Self {
        match output {
            LogOutput::Stdout => "stdout",
            LogOutput::File => "file",
            LogOutput::Both => "both",
        }
    }
}

fn build_filter(level: &str) -> EnvFilter {
    let mut filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    // Filter out noisy third-party crates
    for directive in ["hyper=warn", "tokio=warn", "runtime=warn", "tower=warn", "h2=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    filter
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn console_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Pretty => fmt::layer().pretty().with_target(true).boxed(),
        LogFormat::Json => fmt::layer().json().with_current_span(true).boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    }
}

/// Plain-text daily files under `directory`
fn file_layer(directory: &str) -> BoxedLayer {
    if let Err(err) = std::fs::create_dir_all(directory) {
        eprintln!("cannot create log directory {directory}: {err}");
    }
    let appender = RollingFileAppender::new(Rotation::DAILY, directory, LOG_FILE_PREFIX);
    fmt::layer().with_writer(appender).with_ansi(false).boxed()
}

/// Install the global subscriber from the merged configuration.
///
/// ```bash
/// # Development
/// RUST_LOG=debug LOG_FORMAT=pretty cargo run
///
/// # Production
/// RUST_LOG=info LOG_FORMAT=json LOG_OUTPUT=both LOG_DIR=/var/log/salesdash cargo run
/// ```
pub fn init(config: &LoggingConfig) {
    let (format, output) = (config.format, config.output);

    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    if matches!(output, LogOutput::Stdout | LogOutput::Both) {
        layers.push(console_layer(format));
    }
    if matches!(output, LogOutput::File | LogOutput::Both) {
        layers.push(file_layer(&config.directory));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(build_filter(&config.level))
        .init();

    tracing::info!(
        format = ?format,
        output = ?output,
        level = %config.level,
        "Logging system initialized"
    );
    if output != LogOutput::Stdout {
        tracing::debug!(directory = %config.directory, "Writing daily log files");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("fancy"), LogFormat::Pretty);
    }

    #[test]
    fn test_log_output_parse() {
        assert_eq!(LogOutput::parse("file"), LogOutput::File);
        assert_eq!(LogOutput::parse("both"), LogOutput::Both);
        assert_eq!(LogOutput::parse("stdout"), LogOutput::Stdout);
        assert_eq!(LogOutput::parse(""), LogOutput::Stdout);
    }

    #[test]
    fn test_yaml_values_are_lenient() {
        let format: LogFormat = serde_yaml::from_str("JSON").unwrap();
        assert_eq!(format, LogFormat::Json);
        let output: LogOutput = serde_yaml::from_str("everywhere").unwrap();
        assert_eq!(output, LogOutput::Stdout);
        assert_eq!(serde_yaml::to_string(&LogOutput::Both).unwrap().trim(), "both");
    }

    #[test]
    fn test_filter_quiets_third_party_crates() {
        let filter = build_filter("debug").to_string();
        assert!(filter.contains("hyper=warn"));
        assert!(filter.contains("tower=warn"));
    }
}
