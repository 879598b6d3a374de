//! Attribute values of an entity instance.

use std::fmt::{self, Write as _};

/// File-local instance identifier (`#123` in the exchange file).
pub type InstanceId = u64;

/// A single Part 21 parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `$`: unset optional attribute.
    Null,
    /// `*`: attribute derived in a supertype.
    Omitted,
    Integer(i64),
    Real(f64),
    /// String literal content, without the delimiting apostrophes.
    ///
    /// Doubled apostrophes and `\X\` style escapes are kept exactly as they
    /// appear in the file.
    String(String),
    /// Enumeration token without the surrounding dots (`.T.` → `T`).
    Enum(String),
    /// Hex digits of a binary literal, without the quotes.
    Binary(String),
    Ref(InstanceId),
    List(Vec<Value>),
    /// Typed parameter such as `LENGTH_MEASURE(2.5)`.
    Typed(String, Box<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_ref_id(&self) -> Option<InstanceId> {
        match self {
            Value::Ref(id) => Some(*id),
            _ => None,
        }
    }

    /// Numeric view of a value. Integers widen, typed parameters unwrap.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            Value::Typed(_, inner) => inner.as_real(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value back in exchange-file notation.
    ///
    /// Strings keep their apostrophes and aggregates their parentheses, so
    /// `('FreeCAD Model')` and `'2;1'` come back exactly as the consumer of
    /// header data expects to see them.
    pub fn to_raw_string(&self) -> String {
        let mut out = String::new();
        self.write_raw(&mut out);
        out
    }

    fn write_raw(&self, out: &mut String) {
        match self {
            Value::Null => out.push('$'),
            Value::Omitted => out.push('*'),
            Value::Integer(v) => {
                let _ = write!(out, "{v}");
            }
            Value::Real(v) => write_real(out, *v),
            Value::String(s) => {
                out.push('\'');
                out.push_str(s);
                out.push('\'');
            }
            Value::Enum(e) => {
                out.push('.');
                out.push_str(e);
                out.push('.');
            }
            Value::Binary(b) => {
                out.push('"');
                out.push_str(b);
                out.push('"');
            }
            Value::Ref(id) => {
                let _ = write!(out, "#{id}");
            }
            Value::List(items) => {
                out.push('(');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_raw(out);
                }
                out.push(')');
            }
            Value::Typed(name, inner) => {
                out.push_str(name);
                out.push('(');
                inner.write_raw(out);
                out.push(')');
            }
        }
    }
}

// Part 21 reals always carry a decimal point.
fn write_real(out: &mut String, v: f64) {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        let _ = write!(out, "{v:.1}");
    } else {
        let _ = write!(out, "{v}");
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_raw_string())
    }
}
