use std::fmt;

use serde::Serialize;

use super::{ConstantId, EnumId, EnumValueId, Kind, Owner, UserType};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Value {
    Literal { literal: Literal },
    Builtin { builtin: Builtin },
    Reference { target: ValueRef },
}

impl Value {
    pub fn literal(literal: Literal) -> Self {
        Self::Literal { literal }
    }
}

/// A scalar exactly as written. `Display` gives the generator-facing text:
/// floats print in shortest round-trip form, booleans as `true`/`false`,
/// strings double-quoted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Float(f32),
    Double(f64),
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(x) => write!(f, "{x}"),
            Self::Int8(x) => write!(f, "{x}"),
            Self::Int16(x) => write!(f, "{x}"),
            Self::Int32(x) => write!(f, "{x}"),
            Self::Int64(x) => write!(f, "{x}"),
            Self::Uint8(x) => write!(f, "{x}"),
            Self::Uint16(x) => write!(f, "{x}"),
            Self::Uint32(x) => write!(f, "{x}"),
            Self::Uint64(x) => write!(f, "{x}"),
            // `Debug` is the shortest representation that parses back to the
            // same bits, and keeps a trailing `.0` on integral values.
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Double(x) => write!(f, "{x:?}"),
            Self::String(s) => write!(f, "\"{s}\""),
        }
    }
}

impl Literal {
    /// Text without quoting, as stored in attribute maps.
    pub fn to_attribute_text(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Builtin {
    DoubleInfinity,
    DoubleNegativeInfinity,
    DoubleNan,
    FloatInfinity,
    FloatNegativeInfinity,
    FloatNan,
}

impl Builtin {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::DoubleInfinity => "double.INFINITY",
            Self::DoubleNegativeInfinity => "double.NEGATIVE_INFINITY",
            Self::DoubleNan => "double.NAN",
            Self::FloatInfinity => "float.INFINITY",
            Self::FloatNegativeInfinity => "float.NEGATIVE_INFINITY",
            Self::FloatNan => "float.NAN",
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ValueRef {
    Constant(ConstantId),
    EnumMember(EnumValueId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constant {
    pub name: String,
    pub owner: Owner,
    pub kind: Kind,
    pub value: Value,
    /// Struct or interface the constant is declared in.
    pub parent: Option<UserType>,
}

/// A use of an enum member as a value, e.g. `Color.RED` as a default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumValue {
    pub name: String,
    #[serde(rename = "enum")]
    pub enum_id: EnumId,
    pub owner: Owner,
    pub namespace: String,
    pub parent: Option<UserType>,
}
