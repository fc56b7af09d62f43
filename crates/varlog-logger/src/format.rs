//! # Formatters
//!
//! Glue between logger records and `tracing-subscriber`'s formatting.
//!
//! A record reaches the subscriber as a `tracing` event with a `message`
//! field and, when the handle has attributes, an [`ATTRS_FIELD`] field that
//! carries the pre-rendered context: `key=value` pairs for the console and
//! text handlers, a JSON object for the JSON handler.
//!
//! - Console and text output use `tracing-subscriber`'s compact and full
//!   formats with [`text_fields`], which prints `message` and the context
//!   bare and every other field as `name=value`.
//! - JSON output uses [`JsonFormat`], which writes one object per line and
//!   splices the context object into it.

use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::field::MakeExt;
use tracing_subscriber::field::delimited::Delimited;
use tracing_subscriber::fmt::format::{FieldFn, Writer, debug_fn};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Event field carrying a handle's rendered attributes.
pub const ATTRS_FIELD: &str = "attrs";

const MESSAGE_FIELD: &str = "message";

/// Keys every JSON record starts with. Attributes using one of these names
/// are written as `attrs.<name>` instead.
const RESERVED_KEYS: [&str; 3] = ["time", "level", "msg"];

type FieldWriter = fn(&mut Writer<'_>, &Field, &dyn fmt::Debug) -> fmt::Result;

/// Field formatter for the console and text handlers.
#[must_use]
pub fn text_fields() -> Delimited<&'static str, FieldFn<FieldWriter>>
{
    debug_fn(write_text_field as FieldWriter).delimited(" ")
}

fn write_text_field(writer: &mut Writer<'_>, field: &Field, value: &dyn fmt::Debug) -> fmt::Result
{
    match field.name() {
        MESSAGE_FIELD | ATTRS_FIELD => write!(writer, "{value:?}"),
        name => write!(writer, "{name}={value:?}"),
    }
}

/// Line-delimited JSON event format
///
/// Each line is an object with `time` (RFC 3339, UTC, milliseconds), `level`
/// and `msg`, followed by the logger's attributes (groups as nested objects)
/// and then any other fields on the event. A top-level attribute named
/// `time`, `level` or `msg` is written as `attrs.time` and so on, so the
/// record's own values are never replaced.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl<S, N> FormatEvent<S, N> for JsonFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, _ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result
    {
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        let mut object = Map::new();
        object.insert("time".to_string(), Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)));
        object.insert("level".to_string(), Value::String(event.metadata().level().to_string()));
        object.insert("msg".to_string(), Value::String(visitor.message.unwrap_or_default()));
        splice(&mut object, visitor.attrs);
        splice(&mut object, visitor.fields);

        let line = serde_json::to_string(&Value::Object(object)).map_err(|_| fmt::Error)?;
        writeln!(writer, "{line}")
    }
}

fn splice(object: &mut Map<String, Value>, entries: Map<String, Value>)
{
    for (key, value) in entries {
        if RESERVED_KEYS.contains(&key.as_str()) {
            object.insert(format!("{ATTRS_FIELD}.{key}"), value);
        } else {
            object.insert(key, value);
        }
    }
}

#[derive(Default)]
struct JsonVisitor
{
    message: Option<String>,
    attrs: Map<String, Value>,
    fields: Map<String, Value>,
}

impl JsonVisitor
{
    fn insert(&mut self, field: &Field, value: Value)
    {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for JsonVisitor
{
    fn record_f64(&mut self, field: &Field, value: f64)
    {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64)
    {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64)
    {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool)
    {
        self.insert(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str)
    {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, Value::from(value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug)
    {
        let rendered = format!("{value:?}");
        match field.name() {
            MESSAGE_FIELD => self.message = Some(rendered),
            ATTRS_FIELD => match serde_json::from_str::<Map<String, Value>>(&rendered) {
                Ok(attrs) => self.attrs = attrs,
                Err(_) => self.insert(field, Value::String(rendered)),
            },
            _ => self.insert(field, Value::String(rendered)),
        }
    }
}
