use crate::ir::TypeTag;

pub type Result<T, E = TranslateError> = std::result::Result<T, E>;

/// Why one file failed to translate. Neither kind is recoverable: the input
/// graph is expected to come from the front end already validated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranslateError {
    #[error("malformed graph: {0}")]
    MalformedGraph(#[from] MalformedGraph),
    #[error("{literal} literal `{text}` cannot be represented: {reason}")]
    UnrepresentableLiteral {
        literal: &'static str,
        text: String,
        reason: &'static str,
    },
}

impl TranslateError {
    pub fn is_malformed_graph(&self) -> bool {
        matches!(self, Self::MalformedGraph(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedGraph {
    #[error("file `{0}` is not in the graph")]
    MissingFile(String),
    #[error("type key `{0}` is not in the graph")]
    MissingType(String),
    #[error("value key `{0}` is not in the graph")]
    MissingValue(String),
    #[error("type key `{key}` resolves to {actual}, expected {expected}")]
    TypeTagMismatch {
        key: String,
        expected: TypeTag,
        actual: TypeTag,
    },
    #[error("value key `{key}` names {actual}, expected {expected}")]
    ValueTagMismatch {
        key: String,
        expected: ValueTag,
        actual: ValueTag,
    },
    #[error("`{name}` carries no source file information")]
    MissingSourceFile { name: String },
    #[error("`{name}` is declared in `{file}`, which `{importer}` does not import")]
    NotImported {
        name: String,
        file: String,
        importer: String,
    },
}

/// Kinds of entries in the value table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTag {
    EnumValue,
    DeclaredConstant,
}

impl std::fmt::Display for ValueTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::EnumValue => "an enum value",
            Self::DeclaredConstant => "a declared constant",
        })
    }
}
