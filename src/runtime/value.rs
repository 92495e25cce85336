// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The dynamic value domain observed by the probe.

use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use serde::ser::SerializeStruct;
use serde::Serialize;

/// The unique identifier of an object allocated in a probe context.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u32);

/// The unique identifier of a function value allocated in a probe context.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FuncId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub id: ObjectId,
    pub name: Rc<str>,
}

impl ObjectRef {
    pub fn new(id: ObjectId, name: &str) -> Self {
        ObjectRef { id, name: Rc::from(name) }
    }
}

impl Display for ObjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[object {}]", self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FuncRef {
    pub id: FuncId,
    pub name: Rc<str>,
}

impl FuncRef {
    pub fn new(id: FuncId, name: &str) -> Self {
        FuncRef { id, name: Rc::from(name) }
    }
}

impl Display for FuncRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Object(ObjectRef),
    Function(FuncRef),
}

impl Value {
    /// Parses a value from a command-line literal.
    ///
    /// `undefined`, `null`, `true` and `false` are keywords and anything that parses as a
    /// number is a number. Everything else is a string, with one pair of surrounding double
    /// quotes removed if present, so `"1"` yields the string `1`.
    pub fn from_literal(literal: &str) -> Value {
        match literal {
            "undefined" => return Value::Undefined,
            "null" => return Value::Null,
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            "NaN" => return Value::Number(f64::NAN),
            "Infinity" => return Value::Number(f64::INFINITY),
            "-Infinity" => return Value::Number(f64::NEG_INFINITY),
            _ => {}
        }
        // `str::parse::<f64>` also accepts "inf" and "nan", which are plain strings here.
        let numeric = literal
            .chars()
            .next()
            .map_or(false, |c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
        if numeric {
            if let Ok(n) = literal.parse::<f64>() {
                return Value::Number(n);
            }
        }
        let unquoted = literal
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(literal);
        Value::Str(unquoted.to_owned())
    }

    /// A short name of the value's type, used in traces.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) if n.is_nan() => f.write_str("NaN"),
            Value::Number(n) if n.is_infinite() => {
                if *n > 0.0 {
                    f.write_str("Infinity")
                } else {
                    f.write_str("-Infinity")
                }
            }
            // f64's Display already prints integral values without a fraction.
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Object(obj) => Display::fmt(obj, f),
            Value::Function(func) => write!(f, "[function {}]", func.name),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Value", 2)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("repr", &self.to_string())?;
        state.end()
    }
}
