use crate::csv;
use serde::{
    Deserialize,
    Serialize,
};
use std::fmt;
use strum::{
    Display,
    EnumString,
};

/// The closed set of value shapes a binding may export into a CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    Bool,
    Int,
    UInt,
    Float,
    Char,
    Str,
    Vec2,
    Vec3,
    Quat,
}

/// A sampled value of one of the exportable kinds.
///
/// Vector-like kinds render as a bracketed, comma-joined array so they occupy
/// a single CSV column regardless of the row separator.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(String),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Quat([f32; 4]),
}

impl ExportValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            ExportValue::Bool(_) => ValueKind::Bool,
            ExportValue::Int(_) => ValueKind::Int,
            ExportValue::UInt(_) => ValueKind::UInt,
            ExportValue::Float(_) => ValueKind::Float,
            ExportValue::Char(_) => ValueKind::Char,
            ExportValue::Str(_) => ValueKind::Str,
            ExportValue::Vec2(_) => ValueKind::Vec2,
            ExportValue::Vec3(_) => ValueKind::Vec3,
            ExportValue::Quat(_) => ValueKind::Quat,
        }
    }
}

impl fmt::Display for ExportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportValue::Bool(v) => write!(f, "{v}"),
            ExportValue::Int(v) => write!(f, "{v}"),
            ExportValue::UInt(v) => write!(f, "{v}"),
            ExportValue::Float(v) => write!(f, "{v}"),
            ExportValue::Char(v) => write!(f, "{v}"),
            ExportValue::Str(v) => write!(f, "{v}"),
            ExportValue::Vec2(v) => write!(f, "{}", csv::array_to_string(v, csv::ARRAY_SEPARATOR)),
            ExportValue::Vec3(v) => write!(f, "{}", csv::array_to_string(v, csv::ARRAY_SEPARATOR)),
            ExportValue::Quat(v) => write!(f, "{}", csv::array_to_string(v, csv::ARRAY_SEPARATOR)),
        }
    }
}

impl From<bool> for ExportValue {
    fn from(v: bool) -> Self {
        ExportValue::Bool(v)
    }
}

impl From<i64> for ExportValue {
    fn from(v: i64) -> Self {
        ExportValue::Int(v)
    }
}

impl From<u64> for ExportValue {
    fn from(v: u64) -> Self {
        ExportValue::UInt(v)
    }
}

impl From<f64> for ExportValue {
    fn from(v: f64) -> Self {
        ExportValue::Float(v)
    }
}

impl From<char> for ExportValue {
    fn from(v: char) -> Self {
        ExportValue::Char(v)
    }
}

impl From<String> for ExportValue {
    fn from(v: String) -> Self {
        ExportValue::Str(v)
    }
}

impl From<&str> for ExportValue {
    fn from(v: &str) -> Self {
        ExportValue::Str(v.to_string())
    }
}

impl From<[f32; 2]> for ExportValue {
    fn from(v: [f32; 2]) -> Self {
        ExportValue::Vec2(v)
    }
}

impl From<[f32; 3]> for ExportValue {
    fn from(v: [f32; 3]) -> Self {
        ExportValue::Vec3(v)
    }
}

impl From<[f32; 4]> for ExportValue {
    fn from(v: [f32; 4]) -> Self {
        ExportValue::Quat(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn vectors_render_as_bracketed_arrays() {
        assert_eq!(ExportValue::Vec2([1.0, 2.5]).to_string(), "[1,2.5]");
        assert_eq!(ExportValue::Vec3([0.0, -1.0, 3.25]).to_string(), "[0,-1,3.25]");
        assert_eq!(ExportValue::Quat([0.0, 0.0, 0.0, 1.0]).to_string(), "[0,0,0,1]");
    }

    #[test]
    fn scalars_render_plainly() {
        assert_eq!(ExportValue::from(true).to_string(), "true");
        assert_eq!(ExportValue::from(-3i64).to_string(), "-3");
        assert_eq!(ExportValue::from("hello").to_string(), "hello");
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(ExportValue::from(1.5f64).kind(), ValueKind::Float);
        assert_eq!(ExportValue::Quat([0.0; 4]).kind(), ValueKind::Quat);
    }
}
