//! Deterministic, cycle-safe serialization of [`Value`]s for diagnostics.
//!
//! The output is JSON-compatible text. Shapes plain JSON cannot express are
//! tagged with their type name:
//!
//! | Value                | Output                          |
//! |----------------------|---------------------------------|
//! | `Set` of `a`, `b`    | `{"Set":["a","b"]}`             |
//! | `Map` of `a => 123`  | `{"Map":{"a":123}}`             |
//! | `Uint8Array` 1, 2, 3 | `{"Uint8Array":[1,2,3]}`        |
//! | symbol `s`           | `"Symbol(s)"`                   |
//! | back-reference       | `"[__CIRCULAR_REF__]"`          |
//!
//! Serializing `Undefined` (or a bare function) yields `None`, never a string.

use indexmap::IndexMap;
use tracing::trace;

use crate::value::{Array, Identity, Map, Object, Set, TypedArray, Value};

mod number;
mod visited;

pub use number::format_number;
use number::write_json_number;
use visited::VisitedPath;

/// Written in place of a composite that is already on the current path.
pub const CIRCULAR_REF: &str = "[__CIRCULAR_REF__]";

/// Written in place of a composite nested deeper than `max_depth`.
pub const MAX_DEPTH_REF: &str = "[__MAX_DEPTH__]";

pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Tuning knobs for a [`Serializer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Maximum number of nested composites rendered in full.
    pub max_depth: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Serializes `value` with default options.
///
/// ```rust
/// use tapline::{serialize, value::{Map, Value}};
/// let map: Map = [("a", 123)].into_iter().collect();
/// assert_eq!(serialize(&Value::from(map)).as_deref(), Some(r#"{"Map":{"a":123}}"#));
/// assert_eq!(serialize(&Value::Undefined), None);
/// ```
pub fn serialize(value: &Value) -> Option<String> {
    Serializer::default().serialize(value)
}

/// Stateless serializer; every call gets its own visited path.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serializer {
    options: SerializeOptions,
}

impl Serializer {
    pub fn new(options: SerializeOptions) -> Self {
        Self { options }
    }

    /// Returns the text form of `value`, or `None` if there is nothing to
    /// serialize (an absent value or a function at the root).
    pub fn serialize(&self, value: &Value) -> Option<String> {
        let mut out = String::new();
        let mut path = VisitedPath::default();
        self.write_value(value, &mut path, &mut out).then_some(out)
    }

    /// Appends `value` to `out`. Returns false, having written nothing, when
    /// the value has no JSON form.
    fn write_value(&self, value: &Value, path: &mut VisitedPath, out: &mut String) -> bool {
        match value {
            Value::Undefined | Value::Function(_) => return false,
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => write_json_number(*n, out),
            Value::String(s) => write_json_string(s, out),
            Value::Symbol(sym) => {
                write_json_string(&format!("Symbol({})", sym.description()), out)
            }
            Value::Array(a) => self.write_composite(a.identity(), path, out, |s, p, o| {
                s.write_array(a, p, o)
            }),
            Value::Object(obj) => self.write_composite(obj.identity(), path, out, |s, p, o| {
                s.write_object(obj, p, o)
            }),
            Value::Set(set) => self.write_composite(set.identity(), path, out, |s, p, o| {
                s.write_set(set, p, o)
            }),
            Value::Map(map) => self.write_composite(map.identity(), path, out, |s, p, o| {
                s.write_map(map, p, o)
            }),
            Value::TypedArray(t) => self.write_composite(t.identity(), path, out, |_, _, o| {
                write_typed_array(t, o)
            }),
        }
        true
    }

    /// Runs `body` with `id` on the path, or writes a marker string instead
    /// when `id` is already an ancestor or the path is too deep.
    fn write_composite(
        &self,
        id: Identity,
        path: &mut VisitedPath,
        out: &mut String,
        body: impl FnOnce(&Self, &mut VisitedPath, &mut String),
    ) {
        if path.contains(id) {
            trace!(?id, "circular reference replaced by marker");
            write_json_string(CIRCULAR_REF, out);
            return;
        }
        if path.depth() >= self.options.max_depth {
            trace!(?id, depth = path.depth(), "depth limit reached");
            write_json_string(MAX_DEPTH_REF, out);
            return;
        }
        path.enter(id);
        body(self, path, out);
        path.exit(id);
    }

    fn write_array(&self, array: &Array, path: &mut VisitedPath, out: &mut String) {
        self.write_sequence(array.items().iter(), path, out);
    }

    fn write_set(&self, set: &Set, path: &mut VisitedPath, out: &mut String) {
        out.push_str("{\"Set\":");
        self.write_sequence(set.members().iter(), path, out);
        out.push('}');
    }

    fn write_object(&self, object: &Object, path: &mut VisitedPath, out: &mut String) {
        let members = object.members();
        self.write_members(members.iter().map(|(k, v)| (k.as_str(), v)), path, out);
    }

    fn write_map(&self, map: &Map, path: &mut VisitedPath, out: &mut String) {
        let entries = map.entries();
        // Later duplicates overwrite earlier values but keep the first position.
        let mut members: IndexMap<String, &Value> = IndexMap::new();
        for (key, value) in entries.iter() {
            if let Some(key) = object_key(key) {
                members.insert(key, value);
            }
        }
        out.push_str("{\"Map\":");
        self.write_members(members.iter().map(|(k, v)| (k.as_str(), *v)), path, out);
        out.push('}');
    }

    /// Elements with no JSON form are written as `null`.
    fn write_sequence<'a>(
        &self,
        items: impl Iterator<Item = &'a Value>,
        path: &mut VisitedPath,
        out: &mut String,
    ) {
        out.push('[');
        for (i, item) in items.enumerate() {
            if i > 0 {
                out.push(',');
            }
            if !self.write_value(item, path, out) {
                out.push_str("null");
            }
        }
        out.push(']');
    }

    /// Members with no JSON form are left out entirely.
    fn write_members<'a>(
        &self,
        members: impl Iterator<Item = (&'a str, &'a Value)>,
        path: &mut VisitedPath,
        out: &mut String,
    ) {
        out.push('{');
        let mut first = true;
        for (key, value) in members {
            let mark = out.len();
            if !first {
                out.push(',');
            }
            write_json_string(key, out);
            out.push(':');
            if self.write_value(value, path, out) {
                first = false;
            } else {
                out.truncate(mark);
            }
        }
        out.push('}');
    }
}

fn write_typed_array(array: &TypedArray, out: &mut String) {
    out.push('{');
    write_json_string(array.kind().name(), out);
    out.push_str(":[");
    for (i, n) in array.elements().iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_json_number(*n, out);
    }
    out.push_str("]}");
}

/// Converts a map key to the member name it takes in an object.
/// Symbol keys have no member name and are dropped.
fn object_key(key: &Value) -> Option<String> {
    match key {
        Value::Symbol(_) => None,
        other => Some(key_text(other, &mut Vec::new())),
    }
}

/// Text form of a value used as a member name. Arrays join their elements
/// with `,`; an array already being joined contributes nothing.
fn key_text(value: &Value, joining: &mut Vec<Identity>) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => s.clone(),
        Value::Symbol(sym) => format!("Symbol({})", sym.description()),
        Value::Function(_) => "[object Function]".to_string(),
        Value::Object(_) => "[object Object]".to_string(),
        Value::Set(_) => "[object Set]".to_string(),
        Value::Map(_) => "[object Map]".to_string(),
        Value::TypedArray(t) => t.join(),
        Value::Array(array) => {
            let id = array.identity();
            if joining.contains(&id) {
                return String::new();
            }
            joining.push(id);
            let text = array
                .items()
                .iter()
                .map(|item| match item {
                    Value::Undefined | Value::Null => String::new(),
                    other => key_text(other, joining),
                })
                .collect::<Vec<_>>()
                .join(",");
            joining.pop();
            text
        }
    }
}

fn write_json_string(s: &str, out: &mut String) {
    match serde_json::to_string(s) {
        Ok(quoted) => out.push_str(&quoted),
        // Serializing a `str` cannot fail; keep the output well-formed regardless.
        Err(_) => out.push_str("\"\""),
    }
}
