//! Structured logging with card instance context.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (for log aggregation).
    #[default]
    Json,
    /// Human-readable format (for development).
    Human,
}

/// Identifier of one mounted card, used to correlate its log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(pub u64);

impl InstanceId {
    /// Allocate the next instance id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card-{}", self.0)
    }
}

/// A structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub component: String,
    pub instance: String,
    /// Additional structured fields.
    #[serde(flatten)]
    pub fields: HashMap<String, serde_json::Value>,
    /// Microseconds since the logger was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_us: Option<u64>,
}

impl LogEntry {
    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as human-readable string.
    pub fn to_human(&self) -> String {
        let mut s = format!("[{}] {} {}", self.level, self.instance, self.message);

        if !self.fields.is_empty() {
            let mut fields: Vec<String> = self
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            fields.sort();
            s.push_str(" | ");
            s.push_str(&fields.join(" "));
        }

        s
    }
}

/// In-memory log buffer, shared between clones.
///
/// Keeps each entry together with the line the logger formatted for it.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog(Arc<Mutex<Vec<(LogEntry, String)>>>);

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, entry: LogEntry, line: String) {
        let mut records = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        records.push((entry, line));
    }

    fn snapshot(&self) -> Vec<(LogEntry, String)> {
        self.0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Snapshot of the recorded entries.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.snapshot().into_iter().map(|(entry, _)| entry).collect()
    }

    /// Formatted lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.snapshot().into_iter().map(|(_, line)| line).collect()
    }

    /// Messages of the recorded entries, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.message).collect()
    }
}

/// Where formatted entries go.
#[derive(Debug, Clone, Default)]
pub enum LogSink {
    /// Emit `tracing` events under the `product_card` target.
    #[default]
    Tracing,
    /// Keep entries in memory.
    Memory(MemoryLog),
}

/// Structured logger bound to one card instance.
#[derive(Debug, Clone)]
pub struct CardLogger {
    component: String,
    instance: InstanceId,
    start_time: Instant,
    min_level: LogLevel,
    format: LogFormat,
    sink: LogSink,
}

impl CardLogger {
    /// Create a logger for a freshly allocated instance.
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            instance: InstanceId::next(),
            start_time: Instant::now(),
            min_level: LogLevel::Info,
            format: LogFormat::Json,
            sink: LogSink::Tracing,
        }
    }

    /// Set minimum log level.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the output sink.
    pub fn with_sink(mut self, sink: LogSink) -> Self {
        self.sink = sink;
        self
    }

    /// The instance this logger reports for.
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Log at debug level.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, HashMap::new());
    }

    /// Start building a debug log entry.
    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug, message)
    }

    /// Start building an info log entry.
    pub fn info_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Info, message)
    }

    fn log(&self, level: LogLevel, message: &str, fields: HashMap<String, serde_json::Value>) {
        if level < self.min_level {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            component: self.component.clone(),
            instance: self.instance.to_string(),
            fields,
            elapsed_us: Some(self.start_time.elapsed().as_micros() as u64),
        };

        let output = match self.format {
            LogFormat::Json => entry.to_json(),
            LogFormat::Human => entry.to_human(),
        };

        match &self.sink {
            LogSink::Tracing => match level {
                LogLevel::Trace => tracing::trace!(target: "product_card", "{}", output),
                LogLevel::Debug => tracing::debug!(target: "product_card", "{}", output),
                LogLevel::Info => tracing::info!(target: "product_card", "{}", output),
                LogLevel::Warn => tracing::warn!(target: "product_card", "{}", output),
                LogLevel::Error => tracing::error!(target: "product_card", "{}", output),
            },
            LogSink::Memory(log) => log.push(entry, output),
        }
    }
}

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a CardLogger,
    level: LogLevel,
    message: String,
    fields: HashMap<String, serde_json::Value>,
}

impl<'a> LogBuilder<'a> {
    fn new(logger: &'a CardLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: HashMap::new(),
        }
    }

    /// Add a string field.
    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(value.into()));
        self
    }

    /// Add an optional string field; `None` is recorded as null.
    pub fn field_opt(mut self, key: &str, value: Option<&str>) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add an integer field.
    pub fn field_usize(mut self, key: &str, value: usize) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a boolean field.
    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Emit the log entry.
    pub fn emit(self) {
        self.logger.log(self.level, &self.message, self.fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_level_filters() {
        let memory = MemoryLog::new();
        let logger = CardLogger::new("product-card")
            .with_min_level(LogLevel::Info)
            .with_sink(LogSink::Memory(memory.clone()));

        logger.debug("hidden");
        logger.info_builder("shown").emit();

        assert_eq!(memory.messages(), vec!["shown".to_string()]);
    }

    #[test]
    fn test_builder_fields() {
        let memory = MemoryLog::new();
        let logger = CardLogger::new("product-card")
            .with_min_level(LogLevel::Debug)
            .with_sink(LogSink::Memory(memory.clone()));

        logger
            .debug_builder("variant selected")
            .field("variant", "M")
            .field_bool("in_stock", true)
            .field_opt("previous", None)
            .emit();

        let entries = memory.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].fields["variant"], serde_json::json!("M"));
        assert_eq!(entries[0].fields["previous"], serde_json::Value::Null);
        assert_eq!(entries[0].instance, logger.instance().to_string());
    }

    #[test]
    fn test_memory_sink_keeps_formatted_lines() {
        let memory = MemoryLog::new();
        let logger = CardLogger::new("product-card")
            .with_format(LogFormat::Human)
            .with_sink(LogSink::Memory(memory.clone()));

        logger.info_builder("buy link followed").field("destination", "/p/1").emit();

        let expected = format!(
            "[INFO] {} buy link followed | destination=\"/p/1\"",
            logger.instance()
        );
        assert_eq!(memory.lines(), vec![expected]);
    }

    #[test]
    fn test_human_format_sorts_fields() {
        let entry = LogEntry {
            level: LogLevel::Info,
            message: "dispatched".to_string(),
            component: "product-card".to_string(),
            instance: "card-7".to_string(),
            fields: HashMap::from([
                ("b".to_string(), serde_json::json!(2)),
                ("a".to_string(), serde_json::json!(1)),
            ]),
            elapsed_us: None,
        };
        assert_eq!(entry.to_human(), "[INFO] card-7 dispatched | a=1 b=2");
    }

    #[test]
    fn test_json_format() {
        let entry = LogEntry {
            level: LogLevel::Debug,
            message: "mounted".to_string(),
            component: "product-card".to_string(),
            instance: "card-1".to_string(),
            fields: HashMap::new(),
            elapsed_us: None,
        };
        let json: serde_json::Value = serde_json::from_str(&entry.to_json()).unwrap();
        assert_eq!(json["level"], "debug");
        assert_eq!(json["instance"], "card-1");
    }

    #[test]
    fn test_instance_ids_are_unique() {
        assert_ne!(InstanceId::next(), InstanceId::next());
    }
}
