use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::runner::ds::error::{EvalError, EvalResult};
use crate::runner::ds::types::TypeRef;
use crate::runner::std_lib::lang;

/// A runtime value flowing through an evaluation.
///
/// Collections are immutable and shared, so values can cross threads and be
/// cloned cheaply.
#[derive(Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Str(String),
    List(Arc<Vec<Value>>),
    Set(Arc<BTreeSet<Value>>),
    Map(Arc<BTreeMap<Value, Value>>),
    Array(Arc<ArrayValue>),
    Object(Arc<HostObject>),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArrayValue {
    pub element: TypeRef,
    pub items: Vec<Value>,
}

/// An instance of a user-defined type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct HostObject {
    class: TypeRef,
    fields: Vec<(String, Value)>,
}

impl HostObject {
    pub fn new(class: TypeRef) -> Self {
        HostObject {
            class,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    pub fn class(&self) -> &TypeRef {
        &self.class
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(Arc::new(items.into_iter().collect()))
    }

    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Map(Arc::new(entries.into_iter().collect()))
    }

    pub fn array(element: TypeRef, items: Vec<Value>) -> Self {
        Value::Array(Arc::new(ArrayValue { element, items }))
    }

    pub fn object(object: HostObject) -> Self {
        Value::Object(Arc::new(object))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime type; `None` for null.
    pub fn type_ref(&self) -> Option<TypeRef> {
        let ty = match self {
            Value::Null => return None,
            Value::Boolean(_) => lang::BOOLEAN.clone(),
            Value::Integer(_) => lang::INTEGER.clone(),
            Value::Float(_) => lang::DOUBLE.clone(),
            Value::Str(_) => lang::STRING.clone(),
            Value::List(_) => lang::IMMUTABLE_LIST.clone(),
            Value::Set(_) => lang::IMMUTABLE_SET.clone(),
            Value::Map(_) => lang::IMMUTABLE_MAP.clone(),
            Value::Array(array) => TypeRef::array_of(array.element.clone()),
            Value::Object(object) => object.class.clone(),
        };
        Some(ty)
    }

    /// Type used when this value is passed as an argument.
    pub fn arg_type(&self) -> TypeRef {
        self.type_ref().unwrap_or_else(TypeRef::null)
    }

    pub fn type_name(&self) -> String {
        self.arg_type().to_string()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HostObject> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Natural ordering between values of one comparable kind: booleans,
    /// strings, or numbers (integers and floats compare by magnitude, ties
    /// broken by the total order). `None` for anything else.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            _ => {
                let (a, b) = (self.as_number()?, other.as_number()?);
                Some(a.total_cmp(&b).then_with(|| self.cmp(other)))
            }
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Boolean(_) => 1,
            Value::Integer(_) => 2,
            Value::Float(_) => 3,
            Value::Str(_) => 4,
            Value::List(_) => 5,
            Value::Set(_) => 6,
            Value::Map(_) => 7,
            Value::Array(_) => 8,
            Value::Object(_) => 9,
        }
    }
}

/// Total order so values can key sets and maps: variant first, then payload.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a.cmp(b),
            (Value::Set(a), Value::Set(b)) => a.cmp(b),
            (Value::Map(a), Value::Map(b)) => a.cmp(b),
            (Value::Array(a), Value::Array(b)) => a.cmp(b),
            (Value::Object(a), Value::Object(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

fn join<'a>(items: impl Iterator<Item = &'a Value>) -> String {
    items.map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => write!(f, "[{}]", join(items.iter())),
            Value::Set(items) => write!(f, "[{}]", join(items.iter())),
            Value::Map(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Value::Array(array) => write!(f, "[{}]", join(array.items.iter())),
            Value::Object(object) => write!(f, "{}@{:?}", object.class, object.fields),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Value::Null"),
            Value::Boolean(b) => write!(f, "Value::Boolean({})", b),
            Value::Integer(n) => write!(f, "Value::Integer({})", n),
            Value::Float(n) => write!(f, "Value::Float({})", n),
            Value::Str(s) => write!(f, "Value::Str({:?})", s),
            Value::List(items) => write!(f, "Value::List({:?})", items),
            Value::Set(items) => write!(f, "Value::Set({:?})", items),
            Value::Map(entries) => write!(f, "Value::Map({:?})", entries),
            Value::Array(array) => write!(f, "Value::Array({}, {:?})", array.element, array.items),
            Value::Object(object) => write!(f, "Value::Object({:?})", object),
        }
    }
}

/// Conversion of an evaluation result into the type the caller wants.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> EvalResult<Self>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> EvalResult<Self> {
        Ok(value)
    }
}

macro_rules! from_value_variant {
    ($ty:ty, $expected:expr, $pattern:pat => $out:expr) => {
        impl FromValue for $ty {
            fn from_value(value: Value) -> EvalResult<Self> {
                match value {
                    $pattern => Ok($out),
                    other => Err(EvalError::type_mismatch($expected, other.type_name())),
                }
            }
        }
    };
}

from_value_variant!(bool, "lang.Boolean", Value::Boolean(b) => b);
from_value_variant!(i64, "lang.Integer", Value::Integer(n) => n);
from_value_variant!(String, "lang.String", Value::Str(s) => s);
from_value_variant!(Vec<Value>, "util.List", Value::List(items) => items.as_ref().clone());
from_value_variant!(BTreeSet<Value>, "util.Set", Value::Set(items) => items.as_ref().clone());
from_value_variant!(BTreeMap<Value, Value>, "util.Map", Value::Map(entries) => entries.as_ref().clone());
from_value_variant!(Arc<HostObject>, "lang.Object", Value::Object(object) => object);

impl FromValue for f64 {
    fn from_value(value: Value) -> EvalResult<Self> {
        match value {
            Value::Float(n) => Ok(n),
            Value::Integer(n) => Ok(n as f64),
            other => Err(EvalError::type_mismatch("lang.Double", other.type_name())),
        }
    }
}
