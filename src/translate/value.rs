use tracing::trace;

use crate::error::{MalformedGraph, Result, TranslateError, ValueTag};
use crate::graph::{self, BuiltinConstantValue, LiteralValue, UserDefinedValue};
use crate::ir::{Builtin, Constant, ConstantId, EnumValue, EnumValueId, Literal, Value, ValueRef};

use super::{FileTranslator, trace_hit};

/// Lossless copy of a literal. Attributes go through here: they are opaque
/// text and never rejected.
pub(crate) fn literal_of(raw: &LiteralValue) -> Literal {
    match raw {
        LiteralValue::BoolValue(x) => Literal::Bool(*x),
        LiteralValue::Int8Value(x) => Literal::Int8(*x),
        LiteralValue::Int16Value(x) => Literal::Int16(*x),
        LiteralValue::Int32Value(x) => Literal::Int32(*x),
        LiteralValue::Int64Value(x) => Literal::Int64(*x),
        LiteralValue::Uint8Value(x) => Literal::Uint8(*x),
        LiteralValue::Uint16Value(x) => Literal::Uint16(*x),
        LiteralValue::Uint32Value(x) => Literal::Uint32(*x),
        LiteralValue::Uint64Value(x) => Literal::Uint64(*x),
        LiteralValue::FloatValue(x) => Literal::Float(*x),
        LiteralValue::DoubleValue(x) => Literal::Double(*x),
        LiteralValue::StringValue(x) => Literal::String(x.clone()),
    }
}

/// A literal in value position. Infinities and NaN are only reachable
/// through builtins, so a non-finite float literal cannot be printed back as
/// source text and is refused.
pub fn literal_from(raw: &LiteralValue) -> Result<Literal> {
    let unrepresentable = |literal: &'static str, text: String| TranslateError::UnrepresentableLiteral {
        literal,
        text,
        reason: "not a finite number; use the matching builtin instead",
    };
    match raw {
        LiteralValue::FloatValue(x) if !x.is_finite() => Err(unrepresentable("float", x.to_string())),
        LiteralValue::DoubleValue(x) if !x.is_finite() => Err(unrepresentable("double", x.to_string())),
        other => Ok(literal_of(other)),
    }
}

pub fn builtin_from(raw: BuiltinConstantValue) -> Builtin {
    match raw {
        BuiltinConstantValue::DoubleInfinity => Builtin::DoubleInfinity,
        BuiltinConstantValue::DoubleNegativeInfinity => Builtin::DoubleNegativeInfinity,
        BuiltinConstantValue::DoubleNan => Builtin::DoubleNan,
        BuiltinConstantValue::FloatInfinity => Builtin::FloatInfinity,
        BuiltinConstantValue::FloatNegativeInfinity => Builtin::FloatNegativeInfinity,
        BuiltinConstantValue::FloatNan => Builtin::FloatNan,
    }
}

fn value_mismatch(key: &str, expected: ValueTag, actual: ValueTag) -> MalformedGraph {
    MalformedGraph::ValueTagMismatch {
        key: key.to_owned(),
        expected,
        actual,
    }
}

impl<'g> FileTranslator<'g> {
    pub(crate) fn value_from(&mut self, raw: &'g graph::Value) -> Result<Value> {
        let value = match raw {
            graph::Value::LiteralValue(literal) => Value::literal(literal_from(literal)?),
            graph::Value::BuiltinValue(builtin) => Value::Builtin {
                builtin: builtin_from(*builtin),
            },
            graph::Value::UserValueReference(reference) => Value::Reference {
                target: self.value_ref_from_key(&reference.value_key)?,
            },
        };
        Ok(value)
    }

    fn value_ref_from_key(&mut self, key: &'g str) -> Result<ValueRef> {
        let graph = self.graph;
        let raw = graph
            .resolved_values
            .get(key)
            .ok_or_else(|| MalformedGraph::MissingValue(key.to_owned()))?;
        match raw {
            UserDefinedValue::DeclaredConstant(_) => Ok(ValueRef::Constant(self.constant_from_key(key)?)),
            UserDefinedValue::EnumValue(raw) => Ok(ValueRef::EnumMember(self.enum_value_from(key, raw)?)),
        }
    }

    /// The canonical node for a declared constant. Its id is reserved and
    /// cached before the type and value are resolved, so a constant whose
    /// value leads back to itself gets a reference to its own id.
    pub(crate) fn constant_from_key(&mut self, key: &'g str) -> Result<ConstantId> {
        if let Some(id) = self.constant_cache.get(key) {
            trace_hit("constant", key);
            return Ok(*id);
        }
        let graph = self.graph;
        let raw = match graph.resolved_values.get(key) {
            Some(UserDefinedValue::DeclaredConstant(raw)) => raw,
            Some(UserDefinedValue::EnumValue(_)) => {
                return Err(value_mismatch(key, ValueTag::DeclaredConstant, ValueTag::EnumValue).into());
            }
            None => return Err(MalformedGraph::MissingValue(key.to_owned()).into()),
        };

        let id = self.constants.reserve();
        self.constant_cache.insert(key, id);

        let owner = self.owner_of(&raw.decl_data)?;
        let kind = self.kind_from(&raw.ty)?;
        let value = self.value_from(&raw.value)?;
        let parent = self.parent_of(&raw.decl_data)?;
        self.constants.fill(
            id,
            Constant {
                name: raw.decl_data.short_name().to_owned(),
                owner,
                kind,
                value,
                parent,
            },
        );
        trace!(key, "constant resolved");
        Ok(id)
    }

    /// An enum member used as a value. It belongs wherever its enum does.
    fn enum_value_from(&mut self, key: &'g str, raw: &'g graph::EnumValue) -> Result<EnumValueId> {
        if let Some(id) = self.enum_value_cache.get(key) {
            trace_hit("enum value", key);
            return Ok(*id);
        }
        let id = self.enum_values.reserve();
        self.enum_value_cache.insert(key, id);

        // Cache hit while the enum is still populating its own members; its
        // header and parent are already in place by then.
        let enum_id = self.enum_from_key(&raw.enum_type_key)?;
        let owner = self.module.enum_(enum_id).owner;
        let parent = self.module.enum_(enum_id).parent;
        let namespace = self.module.namespace_of(owner).to_owned();
        self.enum_values.fill(
            id,
            EnumValue {
                name: raw.decl_data.short_name().to_owned(),
                enum_id,
                owner,
                namespace,
                parent,
            },
        );
        trace!(key, "enum value resolved");
        Ok(id)
    }
}
