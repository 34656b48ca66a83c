//! Values produced by rule matches: either a matched substring / bound
//! sub-result, or whatever an action expression / extern callback returns.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Char(char),
    Int(i64),
    Bool(bool),
    List(Vec<Value>),
    Unit,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// `+` as used by action expressions: string concatenation when either
    /// side is textual, otherwise undefined (callers should treat this as a
    /// structural error — see `action::ExprEvaluator`).
    pub fn concat(&self, other: &Value) -> Option<Value> {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Some(Value::Str(format!("{a}{b}"))),
            (Value::Str(a), Value::Char(b)) => Some(Value::Str(format!("{a}{b}"))),
            (Value::Char(a), Value::Str(b)) => Some(Value::Str(format!("{a}{b}"))),
            (Value::Int(a), Value::Int(b)) => Some(Value::Int(a + b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Unit => write!(f, "()"),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}
