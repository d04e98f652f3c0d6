//! JSON output layer.
//!
//! Renders every `tracing` event as one JSON object per line:
//!
//! ```text
//! {"time":"...","level":"INFO","logger":"orders","module":"matching","msg":"filled",
//!  "source":{"file":"src/engine.rs","line":88},"qty":5}
//! ```
//!
//! Events emitted by [`Logger`](crate::Logger) carry the caller location and
//! the per-call fields as dedicated event fields; those are unpacked here.
//! Any other event's fields are written at the top level as they are.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::error::Error as StdError;
use std::fmt;
use std::io::Write;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use super::fields::RESERVED_KEYS;

pub(crate) const CALLER_FILE: &str = "caller.file";
pub(crate) const CALLER_LINE: &str = "caller.line";
pub(crate) const FIELDS: &str = "fields";

/// A layer writing JSON lines to a [`MakeWriter`].
pub struct JsonLayer<W> {
    logger: String,
    module: String,
    include_source: bool,
    make_writer: W,
}

impl<W> JsonLayer<W>
where
    W: for<'a> MakeWriter<'a> + 'static,
{
    /// Create a layer tagging entries with `logger` and `module`.
    pub fn new(logger: impl Into<String>, module: impl Into<String>, make_writer: W) -> Self {
        Self {
            logger: logger.into(),
            module: module.into(),
            include_source: true,
            make_writer,
        }
    }

    /// Whether to write the `source` object.
    pub fn with_source(mut self, include_source: bool) -> Self {
        self.include_source = include_source;
        self
    }
}

#[derive(Serialize)]
struct Entry<'a> {
    time: String,
    level: &'static str,
    logger: &'a str,
    module: &'a str,
    msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<Source>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

#[derive(Serialize)]
struct Source {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u64>,
}

impl<S, W> Layer<S> for JsonLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'a> MakeWriter<'a> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);

        let source = if self.include_source {
            let file = visitor
                .caller_file
                .take()
                .or_else(|| metadata.file().map(str::to_string));
            let line = visitor
                .caller_line
                .take()
                .or_else(|| metadata.line().map(u64::from));
            file.map(|file| Source { file, line })
        } else {
            None
        };

        let entry = Entry {
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            level: metadata.level().as_str(),
            logger: &self.logger,
            module: &self.module,
            msg: visitor.message,
            source,
            error: visitor.error,
            fields: visitor.fields,
        };

        let Ok(mut line) = serde_json::to_vec(&entry) else {
            return;
        };
        line.push(b'\n');

        // Nowhere to report a failing sink from inside the sink.
        let mut writer = self.make_writer.make_writer_for(metadata);
        let _ = writer.write_all(&line);
    }
}

#[derive(Default)]
struct EntryVisitor {
    message: String,
    error: Option<String>,
    caller_file: Option<String>,
    caller_line: Option<u64>,
    fields: Map<String, Value>,
}

impl EntryVisitor {
    fn insert(&mut self, name: &str, value: Value) {
        if RESERVED_KEYS.contains(&name) {
            self.fields.insert(format!("field.{name}"), value);
        } else {
            self.fields.insert(name.to_string(), value);
        }
    }

    fn merge_fields(&mut self, rendered: &str) {
        match serde_json::from_str::<Map<String, Value>>(rendered) {
            Ok(map) => {
                for (key, value) in map {
                    self.insert(&key, value);
                }
            }
            Err(_) => self.insert(FIELDS, Value::String(rendered.to_string())),
        }
    }
}

impl Visit for EntryVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "error" => self.error = Some(value.to_string()),
            CALLER_FILE => self.caller_file = Some(value.to_string()),
            FIELDS => self.merge_fields(value),
            name => self.insert(name, Value::from(value)),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_str(field, &format!("{value:?}"));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn StdError + 'static)) {
        self.record_str(field, &value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == CALLER_LINE {
            self.caller_line = Some(value);
        } else {
            self.insert(field.name(), Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field.name(), Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field.name(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field.name(), Value::from(value));
    }
}
