//! Process-wide error reporting.
//!
//! Reports are filtered here (environment gate, ignored messages, trace
//! sampling) and handed to a [`ReportSink`]. The sink owns delivery.

use crate::config::Environment;
use rand::Rng;
use std::error::Error;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Browser layout-observer noise that is never worth a report.
pub const IGNORED_ERRORS: &[&str] = &[
    "ResizeObserver loop completed with undelivered notifications.",
    "ResizeObserver loop limit exceeded",
];

pub const TRACES_SAMPLE_RATE: f32 = 1.0;

static REPORTER: OnceLock<ErrorReporter> = OnceLock::new();

#[derive(Debug, Clone, PartialEq)]
pub struct ReportingOptions {
    pub dsn: Option<String>,
    pub environment: Environment,
    pub enabled: bool,
    pub debug: bool,
    pub traces_sample_rate: f32,
    pub ignore_errors: Vec<String>,
}

impl ReportingOptions {
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            dsn: None,
            environment,
            enabled: environment.is_production(),
            debug: false,
            traces_sample_rate: TRACES_SAMPLE_RATE,
            ignore_errors: IGNORED_ERRORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_dsn(mut self, dsn: Option<String>) -> Self {
        self.dsn = dsn.filter(|dsn| !dsn.is_empty());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Error {
        message: String,
        environment: Environment,
    },
    Transaction {
        name: &'static str,
        duration: Duration,
        environment: Environment,
    },
}

pub trait ReportSink: Send + Sync {
    fn send(&self, report: Report);
}

/// Emits reports as `tracing` events under the `reporting` target.
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    pub dsn: Option<String>,
}

impl ReportSink for TracingSink {
    fn send(&self, report: Report) {
        match report {
            Report::Error {
                message,
                environment,
            } => {
                tracing::error!(target: "reporting", dsn = ?self.dsn, %environment, "{message}");
            }
            Report::Transaction {
                name,
                duration,
                environment,
            } => {
                tracing::info!(
                    target: "reporting",
                    %environment,
                    "transaction {name} took {}ms",
                    duration.as_millis()
                );
            }
        }
    }
}

pub struct ErrorReporter {
    options: ReportingOptions,
    sink: Box<dyn ReportSink>,
}

impl ErrorReporter {
    pub fn new(options: ReportingOptions, sink: impl ReportSink + 'static) -> Self {
        Self {
            options,
            sink: Box::new(sink),
        }
    }

    pub fn is_ignored(&self, message: &str) -> bool {
        self.options
            .ignore_errors
            .iter()
            .any(|ignored| message.contains(ignored.as_str()))
    }

    /// Returns whether the message was forwarded to the sink.
    pub fn capture_message(&self, message: &str) -> bool {
        if !self.options.enabled {
            return false;
        }
        if self.is_ignored(message) {
            if self.options.debug {
                tracing::debug!(target: "reporting", "dropping ignored error: {message}");
            }
            return false;
        }

        self.sink.send(Report::Error {
            message: message.to_string(),
            environment: self.options.environment,
        });
        true
    }

    /// Reports the error together with its source chain.
    pub fn capture_error(&self, error: &dyn Error) -> bool {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }
        self.capture_message(&message)
    }

    pub fn start_transaction(&self, name: &'static str) -> Option<Transaction<'_>> {
        if !self.options.enabled || !self.sample_trace() {
            return None;
        }
        Some(Transaction {
            reporter: self,
            name,
            started: Instant::now(),
        })
    }

    fn sample_trace(&self) -> bool {
        let rate = self.options.traces_sample_rate;
        if rate >= 1.0 {
            return true;
        }
        if rate <= 0.0 {
            return false;
        }
        rand::thread_rng().r#gen::<f32>() < rate
    }
}

/// Timed unit of work; the duration is reported when it is dropped.
pub struct Transaction<'a> {
    reporter: &'a ErrorReporter,
    name: &'static str,
    started: Instant,
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        self.reporter.sink.send(Report::Transaction {
            name: self.name,
            duration: self.started.elapsed(),
            environment: self.reporter.options.environment,
        });
    }
}

/// Install the process-wide reporter, logging reports through [`TracingSink`].
pub fn init(options: ReportingOptions) -> bool {
    let sink = TracingSink {
        dsn: options.dsn.clone(),
    };
    init_with_sink(options, sink)
}

/// Install the process-wide reporter. Only the first call has an effect.
pub fn init_with_sink(options: ReportingOptions, sink: impl ReportSink + 'static) -> bool {
    let enabled = options.enabled;
    let installed = REPORTER.set(ErrorReporter::new(options, sink)).is_ok();
    if installed {
        tracing::info!(target: "reporting", "error reporting initialized (enabled: {enabled})");
    }
    installed
}

pub fn current() -> Option<&'static ErrorReporter> {
    REPORTER.get()
}

pub fn capture_error(error: &dyn Error) -> bool {
    current().is_some_and(|reporter| reporter.capture_error(error))
}

pub fn start_transaction(name: &'static str) -> Option<Transaction<'static>> {
    current().and_then(|reporter| reporter.start_transaction(name))
}
