use std::fmt;

use serde::Serialize;

use super::{EnumId, InterfaceId, StructId, UnionId};

/// A type as seen at one use site.
///
/// `nullable` belongs to the use site; the named node behind `ty` is shared by
/// every use of the same declaration, nullable or not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Kind {
    pub ty: Ty,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ty {
    Primitive { primitive: Primitive },
    String,
    Handle { handle: Handle },
    Array {
        element: Box<Kind>,
        /// `None` for dynamically sized arrays.
        length: Option<u32>,
    },
    Map { key: Box<Kind>, value: Box<Kind> },
    Struct { id: StructId },
    Union { id: UnionId },
    Enum { id: EnumId },
    Interface { id: InterfaceId },
    InterfaceRequest { id: InterfaceId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Handle {
    Generic,
    MessagePipe,
    DataConsumer,
    DataProducer,
    SharedBuffer,
}

impl Kind {
    pub fn new(ty: Ty) -> Self {
        Self { ty, nullable: false }
    }

    pub fn nullable(ty: Ty) -> Self {
        Self { ty, nullable: true }
    }

    pub fn with_nullable(self, nullable: bool) -> Self {
        Self { nullable, ..self }
    }

    /// The named declaration this use site points at, if any.
    pub fn user_type(&self) -> Option<UserType> {
        match self.ty {
            Ty::Struct { id } => Some(UserType::Struct(id)),
            Ty::Union { id } => Some(UserType::Union(id)),
            Ty::Enum { id } => Some(UserType::Enum(id)),
            Ty::Interface { id } | Ty::InterfaceRequest { id } => Some(UserType::Interface(id)),
            _ => None,
        }
    }
}

impl From<UserType> for Ty {
    fn from(user_type: UserType) -> Self {
        match user_type {
            UserType::Struct(id) => Ty::Struct { id },
            UserType::Union(id) => Ty::Union { id },
            UserType::Enum(id) => Ty::Enum { id },
            UserType::Interface(id) => Ty::Interface { id },
        }
    }
}

/// Canonical handle of a named declaration. Equal handles are the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum UserType {
    Struct(StructId),
    Union(UnionId),
    Enum(EnumId),
    Interface(InterfaceId),
}

impl UserType {
    pub fn tag(self) -> TypeTag {
        match self {
            Self::Struct(_) => TypeTag::Struct,
            Self::Union(_) => TypeTag::Union,
            Self::Enum(_) => TypeTag::Enum,
            Self::Interface(_) => TypeTag::Interface,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    Struct,
    Union,
    Enum,
    Interface,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::Interface => "interface",
        })
    }
}
