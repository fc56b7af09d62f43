//! # Attributes
//!
//! Key-value pairs bound to a logger or attached to a single record.
//!
//! Values are [`serde_json::Value`]s so the JSON formatter can emit them
//! natively, and every `From` conversion `serde_json` provides (strings,
//! integers, floats, booleans, vectors) works with [`attr`].
//!
//! A logger's bound attributes live in a [`Context`]: a nested JSON object
//! plus the path of groups opened with [`Logger::with_group`](crate::Logger::with_group).
//! New attributes are inserted under the innermost open group. Groups are
//! only materialized once something is inserted into them, so an empty group
//! never shows up in output.

use std::fmt::{self, Write as _};

use serde_json::{Map, Value};

/// A single key-value attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attr
{
    key: String,
    value: Value,
}

impl Attr
{
    /// Create an attribute from anything `serde_json` can turn into a value.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self
    {
        Self { key: key.into(), value: value.into() }
    }

    /// An inline group: `attrs` nested under `name` for this attribute only.
    ///
    /// ```rust
    /// use varlog_logger::{Attr, attr};
    ///
    /// let request = Attr::group("request", [attr("method", "GET"), attr("status", 200)]);
    /// assert_eq!(request.key(), "request");
    /// ```
    pub fn group(name: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Self
    {
        let mut map = Map::new();
        for attr in attrs {
            attr.insert_into(&mut map);
        }
        Self { key: name.into(), value: Value::Object(map) }
    }

    /// Attribute key.
    #[must_use]
    pub fn key(&self) -> &str
    {
        &self.key
    }

    /// Attribute value.
    #[must_use]
    pub fn value(&self) -> &Value
    {
        &self.value
    }

    fn is_empty_group(&self) -> bool
    {
        matches!(&self.value, Value::Object(group) if group.is_empty())
    }

    /// Inline groups merge into an existing object of the same name; empty
    /// inline groups are dropped.
    fn insert_into(self, map: &mut Map<String, Value>)
    {
        let Attr { key, value } = self;
        match value {
            Value::Object(group) if group.is_empty() => {}
            Value::Object(group) => match map.get_mut(&key) {
                Some(Value::Object(existing)) => existing.extend(group),
                _ => {
                    map.insert(key, Value::Object(group));
                }
            },
            value => {
                map.insert(key, value);
            }
        }
    }
}

/// Shorthand for [`Attr::new`].
pub fn attr(key: impl Into<String>, value: impl Into<Value>) -> Attr
{
    Attr::new(key, value)
}

/// Bound attributes and open groups of one logger handle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context
{
    fields: Map<String, Value>,
    groups: Vec<String>,
}

impl Context
{
    /// Whether rendering this context would produce any output.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.fields.is_empty()
    }

    /// Names of the open groups, outermost first.
    #[must_use]
    pub fn groups(&self) -> &[String]
    {
        &self.groups
    }

    /// The bound attributes as a nested JSON object.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value>
    {
        &self.fields
    }

    /// Insert attributes under the innermost open group.
    pub fn extend(&mut self, attrs: impl IntoIterator<Item = Attr>)
    {
        let attrs: Vec<Attr> = attrs.into_iter().filter(|attr| !attr.is_empty_group()).collect();
        if attrs.is_empty() {
            return;
        }
        let scope = scope_mut(&mut self.fields, &self.groups);
        for attr in attrs {
            attr.insert_into(scope);
        }
    }

    /// Open a group. Later attributes nest under it.
    pub fn push_group(&mut self, name: impl Into<String>)
    {
        self.groups.push(name.into());
    }

    /// A copy of this context with per-record attributes added.
    #[must_use]
    pub fn with_record_attrs(&self, attrs: &[Attr]) -> Context
    {
        let mut context = self.clone();
        context.extend(attrs.iter().cloned());
        context
    }

    /// Render as a compact JSON object.
    #[must_use]
    pub fn to_json(&self) -> String
    {
        Value::Object(self.fields.clone()).to_string()
    }

    /// Render as space-separated `key=value` pairs with dotted group prefixes.
    ///
    /// ```rust
    /// use varlog_logger::attr;
    /// use varlog_logger::attrs::Context;
    ///
    /// let mut context = Context::default();
    /// context.extend([attr("user", "alice")]);
    /// context.push_group("req");
    /// context.extend([attr("id", 7)]);
    /// assert_eq!(context.to_logfmt(), "user=alice req.id=7");
    /// ```
    #[must_use]
    pub fn to_logfmt(&self) -> String
    {
        let mut out = String::new();
        write_logfmt(&mut out, "", &self.fields);
        out
    }
}

/// Walk (and create) the nested objects named by `path`.
fn scope_mut<'a>(root: &'a mut Map<String, Value>, path: &[String]) -> &'a mut Map<String, Value>
{
    let mut current = root;
    for name in path {
        let entry = current.entry(name.clone()).or_insert_with(|| Value::Object(Map::new()));
        // A scalar bound earlier under the group's name is replaced by the group.
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(map) = entry else {
            unreachable!("group entry was just made an object");
        };
        current = map;
    }
    current
}

fn write_logfmt(out: &mut String, prefix: &str, map: &Map<String, Value>)
{
    for (key, value) in map {
        let key = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
        match value {
            Value::Object(group) => write_logfmt(out, &key, group),
            value => {
                if !out.is_empty() {
                    out.push(' ');
                }
                // Writing into a String cannot fail.
                let _ = write!(out, "{key}={}", LogfmtValue(value));
            }
        }
    }
}

struct LogfmtValue<'a>(&'a Value);

impl fmt::Display for LogfmtValue<'_>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self.0 {
            Value::String(s) if needs_quoting(s) => write!(f, "{s:?}"),
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

fn needs_quoting(s: &str) -> bool
{
    s.is_empty() || s.chars().any(|c| c.is_whitespace() || c == '=' || c == '"' || c.is_control())
}
