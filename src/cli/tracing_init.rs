//! Tracing/logging initialization for the CLI.

use crate::constants;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "error";

/// Wrapper type to write logs to file or stderr.
struct FileOrStderr {
    file: Option<Mutex<std::fs::File>>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for FileOrStderr {
    type Writer = Box<dyn std::io::Write + 'a>;

    fn make_writer(&'a self) -> Self::Writer {
        self.file
            .as_ref()
            .and_then(|mutex| mutex.lock().ok())
            .and_then(|file| file.try_clone().ok())
            .map_or_else(
                || Box::new(std::io::stderr()) as Self::Writer,
                |cloned| Box::new(cloned) as Self::Writer,
            )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// `None` for unrecognised values.
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Filter directive for the given `-v` count, falling back to `env_value`.
fn level_directive(verbosity: u8, env_value: Option<String>) -> String {
    match verbosity {
        0 => env_value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

fn open_writer(path: Option<String>) -> FileOrStderr {
    let Some(path) = path else {
        return FileOrStderr { file: None };
    };
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => FileOrStderr {
            file: Some(Mutex::new(file)),
        },
        Err(e) => {
            // Tracing is not yet initialized; eprintln! is the only output channel available.
            eprintln!("Warning: Could not open log file '{path}': {e}. Using stderr.");
            FileOrStderr { file: None }
        }
    }
}

/// Initialize tracing-subscriber for request/response logging.
///
/// `-v` selects debug and `-vv` trace; otherwise `CLUSTER_CLI_LOG` is used as
/// an env-filter directive, defaulting to `error`. Output goes to stderr
/// unless `CLUSTER_CLI_LOG_FILE` names a file.
pub fn init_tracing(verbosity: u8) {
    let directive = level_directive(verbosity, std::env::var(constants::ENV_LOG).ok());
    let env_filter = EnvFilter::try_new(&directive)
        .or_else(|_| EnvFilter::try_new(DEFAULT_DIRECTIVE))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let format = match std::env::var(constants::ENV_LOG_FORMAT) {
        Ok(value) => LogFormat::parse(&value).unwrap_or_else(|| {
            eprintln!(
                "Warning: Unrecognized {} '{value}'. Valid values: 'json', 'text'. Using 'text'.",
                constants::ENV_LOG_FORMAT
            );
            LogFormat::Text
        }),
        Err(_) => LogFormat::Text,
    };

    let writer = open_writer(std::env::var(constants::ENV_LOG_FILE).ok());

    match format {
        LogFormat::Json => {
            let json_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_span_list(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(true)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(json_layer)
                .init();
        }
        LogFormat::Text => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(false)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .init();
        }
    }
}
