//! Runtime value model for diagnostic serialization.
//!
//! `Value` mirrors the shapes a test engine hands to a reporter: primitives,
//! plain objects, arrays, sets, maps, typed numeric buffers and symbols.
//! Composite variants are shared handles, so a single object can be reachable
//! from several places (or from itself) exactly like a heap object would be.

use std::{
    cell::{Ref, RefCell},
    fmt,
    rc::Rc,
};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::serialize::{format_number, serialize};

/// Identity of a composite value: the address of its shared allocation.
///
/// Two handles have the same identity if and only if they point at the same
/// object. Structural equality plays no part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity(usize);

impl Identity {
    fn of<T: ?Sized>(rc: &Rc<T>) -> Self {
        Identity(Rc::as_ptr(rc) as *const () as usize)
    }
}

/// A dynamically typed value.
///
/// # Examples
///
/// ```rust
/// use tapline::value::{Object, Value};
/// let obj = Object::new();
/// obj.insert("a", 123);
/// let v = Value::from(obj);
/// assert_eq!(v.type_name(), "Object");
/// assert_eq!(v.to_string(), r#"{"a":123}"#);
/// assert!(Value::default().is_undefined());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value was supplied.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// A unique atom with a display name.
    Symbol(Symbol),
    Array(Array),
    Object(Object),
    Set(Set),
    Map(Map),
    TypedArray(TypedArray),
    /// A callable, known only by its name.
    Function(Rc<str>),
}

impl Value {
    /// Returns the type name of the value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
            Value::Set(_) => "Set",
            Value::Map(_) => "Map",
            Value::TypedArray(t) => t.kind().name(),
            Value::Function(_) => "Function",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Creates a function value known by `name`.
    pub fn function(name: impl Into<Rc<str>>) -> Self {
        Value::Function(name.into())
    }

    /// Returns the identity of a composite value, or `None` for primitives.
    ///
    /// Symbols and functions are atoms: they can never contain a path back to
    /// an ancestor, so they carry no identity here.
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Value::Array(a) => Some(a.identity()),
            Value::Object(o) => Some(o.identity()),
            Value::Set(s) => Some(s.identity()),
            Value::Map(m) => Some(m.identity()),
            Value::TypedArray(t) => Some(t.identity()),
            _ => None,
        }
    }

    /// Returns the contained number if this is a Number value, else None.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// SameValueZero comparison, used for set membership and map keys.
    ///
    /// Primitives compare by value (`NaN` equals itself, `0` equals `-0`);
    /// composites, symbols and functions compare by identity.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a.identity() == b.identity(),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => match (self.identity(), other.identity()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serialize(self) {
            Some(text) => f.write_str(&text),
            None => f.write_str("undefined"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Undefined, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(members) => Value::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

// ============================================================================
// SYMBOL
// ============================================================================

/// A unique atom. Two symbols with the same description are still distinct.
#[derive(Debug, Clone)]
pub struct Symbol(Rc<str>);

impl Symbol {
    pub fn new(description: impl Into<Rc<str>>) -> Self {
        Symbol(description.into())
    }

    pub fn description(&self) -> &str {
        &self.0
    }

    pub fn identity(&self) -> Identity {
        Identity::of(&self.0)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

// ============================================================================
// ARRAY
// ============================================================================

/// Shared, ordered sequence of values.
#[derive(Clone, Default)]
pub struct Array(Rc<RefCell<Vec<Value>>>);

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Identity {
        Identity::of(&self.0)
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.0.borrow_mut().push(value.into());
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub(crate) fn items(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Array(Rc::new(RefCell::new(iter.into_iter().collect())))
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("id", &self.identity())
            .field("len", &self.len())
            .finish()
    }
}

// ============================================================================
// OBJECT
// ============================================================================

/// Shared keyed mapping with insertion-ordered string keys.
#[derive(Clone, Default)]
pub struct Object(Rc<RefCell<IndexMap<String, Value>>>);

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Identity {
        Identity::of(&self.0)
    }

    /// Sets `key` to `value`. An existing key keeps its original position.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.borrow_mut().insert(key.into(), value.into())
    }

    /// Deletes `key`, preserving the order of the remaining members.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.borrow_mut().shift_remove(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    pub(crate) fn members(&self) -> Ref<'_, IndexMap<String, Value>> {
        self.0.borrow()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let members = iter.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Object(Rc::new(RefCell::new(members)))
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("id", &self.identity())
            .field("keys", &self.keys())
            .finish()
    }
}

// ============================================================================
// SET
// ============================================================================

/// Shared collection of unique values in insertion order.
#[derive(Clone, Default)]
pub struct Set(Rc<RefCell<Vec<Value>>>);

impl Set {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Identity {
        Identity::of(&self.0)
    }

    /// Adds `value` unless an equal member (SameValueZero) is already present.
    pub fn add(&self, value: impl Into<Value>) -> bool {
        let value = value.into();
        if self.has(&value) {
            return false;
        }
        self.0.borrow_mut().push(value);
        true
    }

    pub fn has(&self, value: &Value) -> bool {
        self.0.borrow().iter().any(|m| m.same_value_zero(value))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub(crate) fn members(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }
}

impl<V: Into<Value>> FromIterator<V> for Set {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let set = Set::new();
        for value in iter {
            set.add(value);
        }
        set
    }
}

impl From<Set> for Value {
    fn from(s: Set) -> Self {
        Value::Set(s)
    }
}

impl fmt::Debug for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Set")
            .field("id", &self.identity())
            .field("len", &self.len())
            .finish()
    }
}

// ============================================================================
// MAP
// ============================================================================

/// Shared key-value collection in insertion order, keyed by arbitrary values.
#[derive(Clone, Default)]
pub struct Map(Rc<RefCell<Vec<(Value, Value)>>>);

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Identity {
        Identity::of(&self.0)
    }

    /// Associates `key` with `value`. An existing key keeps its position.
    pub fn set(&self, key: impl Into<Value>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let mut entries = self.0.borrow_mut();
        match entries.iter_mut().find(|(k, _)| k.same_value_zero(&key)) {
            Some(entry) => entry.1 = value,
            None => entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.0
            .borrow()
            .iter()
            .find(|(k, _)| k.same_value_zero(key))
            .map(|(_, v)| v.clone())
    }

    pub fn delete(&self, key: &Value) -> bool {
        let mut entries = self.0.borrow_mut();
        match entries.iter().position(|(k, _)| k.same_value_zero(key)) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub(crate) fn entries(&self) -> Ref<'_, Vec<(Value, Value)>> {
        self.0.borrow()
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = Map::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map")
            .field("id", &self.identity())
            .field("len", &self.len())
            .finish()
    }
}

// ============================================================================
// TYPED ARRAY
// ============================================================================

/// Element type of a fixed-width numeric buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypedArrayKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
}

impl TypedArrayKind {
    /// The concrete buffer type name, used as the tag when serializing.
    pub fn name(self) -> &'static str {
        match self {
            TypedArrayKind::Int8 => "Int8Array",
            TypedArrayKind::Uint8 => "Uint8Array",
            TypedArrayKind::Uint8Clamped => "Uint8ClampedArray",
            TypedArrayKind::Int16 => "Int16Array",
            TypedArrayKind::Uint16 => "Uint16Array",
            TypedArrayKind::Int32 => "Int32Array",
            TypedArrayKind::Uint32 => "Uint32Array",
            TypedArrayKind::Float32 => "Float32Array",
            TypedArrayKind::Float64 => "Float64Array",
        }
    }

    /// Converts `n` to a value representable by this element type.
    ///
    /// Integer kinds wrap modulo their width, `Uint8Clamped` saturates and
    /// rounds half to even, `Float32` rounds to single precision.
    pub fn coerce(self, n: f64) -> f64 {
        match self {
            TypedArrayKind::Float64 => n,
            TypedArrayKind::Float32 => f64::from(n as f32),
            TypedArrayKind::Uint8Clamped => {
                if n.is_nan() {
                    0.0
                } else {
                    n.clamp(0.0, 255.0).round_ties_even()
                }
            }
            TypedArrayKind::Int8 => wrap(n, 8, true),
            TypedArrayKind::Uint8 => wrap(n, 8, false),
            TypedArrayKind::Int16 => wrap(n, 16, true),
            TypedArrayKind::Uint16 => wrap(n, 16, false),
            TypedArrayKind::Int32 => wrap(n, 32, true),
            TypedArrayKind::Uint32 => wrap(n, 32, false),
        }
    }
}

fn wrap(n: f64, bits: i32, signed: bool) -> f64 {
    if !n.is_finite() {
        return 0.0;
    }
    let modulus = 2f64.powi(bits);
    let m = n.trunc().rem_euclid(modulus);
    if signed && m >= modulus / 2.0 {
        m - modulus
    } else {
        m
    }
}

/// Shared fixed-width numeric buffer.
#[derive(Clone)]
pub struct TypedArray {
    kind: TypedArrayKind,
    elements: Rc<RefCell<Vec<f64>>>,
}

impl TypedArray {
    /// Builds a buffer from `values`, coercing each to the element type.
    pub fn from_values(kind: TypedArrayKind, values: impl IntoIterator<Item = f64>) -> Self {
        let elements = values.into_iter().map(|n| kind.coerce(n)).collect();
        Self {
            kind,
            elements: Rc::new(RefCell::new(elements)),
        }
    }

    pub fn kind(&self) -> TypedArrayKind {
        self.kind
    }

    pub fn identity(&self) -> Identity {
        Identity::of(&self.elements)
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.elements.borrow().clone()
    }

    /// Elements joined with `,`, the way a buffer converts to text.
    pub(crate) fn join(&self) -> String {
        self.elements
            .borrow()
            .iter()
            .map(|n| format_number(*n))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub(crate) fn elements(&self) -> Ref<'_, Vec<f64>> {
        self.elements.borrow()
    }
}

impl From<TypedArray> for Value {
    fn from(t: TypedArray) -> Self {
        Value::TypedArray(t)
    }
}

impl fmt::Debug for TypedArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(self.kind.name())
            .field(&*self.elements.borrow())
            .finish()
    }
}
