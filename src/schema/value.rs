//! Loosely-typed literal values
//!
//! Recipe files, parameter defaults, constants and toolchain options all hold
//! values written in the recipe language's literal syntax. [`ParamValue`]
//! models those literals and renders them back in the same syntax.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ParamValue>),
    Tuple(Vec<ParamValue>),
    Dict(Vec<(String, ParamValue)>),
}

impl ParamValue {
    pub fn str(s: impl Into<String>) -> Self {
        ParamValue::Str(s.into())
    }

    pub fn str_list(items: &[&str]) -> Self {
        ParamValue::List(items.iter().map(|s| ParamValue::str(*s)).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            ParamValue::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    /// Looks up a key of a dict value
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        match self {
            ParamValue::Dict(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Items of a list or tuple value
    pub fn items(&self) -> &[ParamValue] {
        match self {
            ParamValue::List(items) | ParamValue::Tuple(items) => items,
            _ => &[],
        }
    }

    /// Literal representation, as it would be written in a recipe file
    pub fn repr(&self) -> String {
        match self {
            ParamValue::None => "None".to_string(),
            ParamValue::Bool(true) => "True".to_string(),
            ParamValue::Bool(false) => "False".to_string(),
            ParamValue::Int(i) => i.to_string(),
            ParamValue::Float(f) => {
                if f.fract() == 0.0 && f.is_finite() {
                    format!("{:.1}", f)
                } else {
                    f.to_string()
                }
            }
            ParamValue::Str(s) => repr_str(s),
            ParamValue::List(items) => format!("[{}]", join_repr(items)),
            ParamValue::Tuple(items) if items.len() == 1 => format!("({},)", items[0].repr()),
            ParamValue::Tuple(items) => format!("({})", join_repr(items)),
            ParamValue::Dict(entries) => {
                let inner: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", repr_str(k), v.repr()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
        }
    }

    /// Value as shown in a default-value column: strings get quotes that
    /// survive their own content, everything else uses its literal form.
    pub fn quoted(&self) -> String {
        match self {
            ParamValue::Str(s) => quote_str(s),
            other => other.repr(),
        }
    }
}

/// Plain string conversion: strings render raw, other values as literals
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            other => f.write_str(&other.repr()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

fn join_repr(items: &[ParamValue]) -> String {
    items.iter().map(|v| v.repr()).collect::<Vec<_>>().join(", ")
}

fn repr_str(s: &str) -> String {
    if s.contains('\'') && !s.contains('"') {
        format!("\"{}\"", s.replace('\\', "\\\\"))
    } else {
        format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

/// Quotes a string so it can be pasted back into a recipe file
pub fn quote_str(s: &str) -> String {
    match (s.contains('\''), s.contains('"')) {
        (true, true) => format!("\"\"\"{}\"\"\"", s),
        (true, false) => format!("\"{}\"", s),
        _ => format!("'{}'", s),
    }
}
