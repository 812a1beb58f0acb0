use crate::error::{MalformedGraph, Result};
use crate::graph::{self, HandleKind, SimpleType, Type, UserDefinedType};
use crate::ir::{
    Enum, EnumId, Handle, Interface, InterfaceId, Kind, Primitive, Struct, StructId, Ty, TypeTag, Union, UnionId,
    UserType,
};

use super::{FileTranslator, trace_hit};

fn primitive_from(simple: SimpleType) -> Primitive {
    match simple {
        SimpleType::Bool => Primitive::Bool,
        SimpleType::Int8 => Primitive::Int8,
        SimpleType::Int16 => Primitive::Int16,
        SimpleType::Int32 => Primitive::Int32,
        SimpleType::Int64 => Primitive::Int64,
        SimpleType::Uint8 => Primitive::Uint8,
        SimpleType::Uint16 => Primitive::Uint16,
        SimpleType::Uint32 => Primitive::Uint32,
        SimpleType::Uint64 => Primitive::Uint64,
        SimpleType::Float => Primitive::Float,
        SimpleType::Double => Primitive::Double,
    }
}

fn handle_from(kind: HandleKind) -> Handle {
    match kind {
        HandleKind::Unspecified => Handle::Generic,
        HandleKind::MessagePipe => Handle::MessagePipe,
        HandleKind::DataPipeConsumer => Handle::DataConsumer,
        HandleKind::DataPipeProducer => Handle::DataProducer,
        HandleKind::SharedBuffer => Handle::SharedBuffer,
    }
}

fn tag_of(raw: &UserDefinedType) -> TypeTag {
    match raw {
        UserDefinedType::StructType(_) => TypeTag::Struct,
        UserDefinedType::UnionType(_) => TypeTag::Union,
        UserDefinedType::EnumType(_) => TypeTag::Enum,
        UserDefinedType::InterfaceType(_) => TypeTag::Interface,
    }
}

fn mismatch(key: &str, expected: TypeTag, actual: TypeTag) -> MalformedGraph {
    MalformedGraph::TypeTagMismatch {
        key: key.to_owned(),
        expected,
        actual,
    }
}

impl<'g> FileTranslator<'g> {
    /// Resolves one use site. Same type key → same named node, whatever the
    /// nullability at this use site.
    pub(crate) fn kind_from(&mut self, ty: &'g Type) -> Result<Kind> {
        let kind = match ty {
            Type::SimpleType(simple) => Kind::new(Ty::Primitive {
                primitive: primitive_from(*simple),
            }),
            Type::StringType(string) => Kind::new(Ty::String).with_nullable(string.nullable),
            Type::HandleType(handle) => Kind::new(Ty::Handle {
                handle: handle_from(handle.kind),
            })
            .with_nullable(handle.nullable),
            Type::ArrayType(array) => {
                let element = self.kind_from(&array.element_type)?;
                let length = u32::try_from(array.fixed_length).ok().filter(|len| *len > 0);
                Kind::new(Ty::Array {
                    element: Box::new(element),
                    length,
                })
                .with_nullable(array.nullable)
            }
            Type::MapType(map) => {
                let key = self.kind_from(&map.key_type)?;
                let value = self.kind_from(&map.value_type)?;
                Kind::new(Ty::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
                .with_nullable(map.nullable)
            }
            Type::TypeReference(reference) => self.reference_from(reference)?,
        };
        Ok(kind)
    }

    fn reference_from(&mut self, reference: &'g graph::TypeReference) -> Result<Kind> {
        let ty = if reference.is_interface_request {
            Ty::InterfaceRequest {
                id: self.interface_from_key(&reference.type_key)?,
            }
        } else {
            self.user_type_from_key(&reference.type_key)?.into()
        };
        Ok(Kind::new(ty).with_nullable(reference.nullable))
    }

    /// The canonical node for a type key. Allocated empty and cached *before*
    /// it is populated, so a member that refers back to it (directly or
    /// through other types) finds the node under construction instead of
    /// starting another one.
    pub(crate) fn user_type_from_key(&mut self, key: &'g str) -> Result<UserType> {
        if let Some(user_type) = self.type_cache.get(key) {
            trace_hit("type", key);
            return Ok(*user_type);
        }
        let graph = self.graph;
        let raw = graph
            .resolved_types
            .get(key)
            .ok_or_else(|| MalformedGraph::MissingType(key.to_owned()))?;
        let decls = &mut self.module.declarations;
        let user_type = match raw {
            UserDefinedType::StructType(raw) => {
                let id = decls.structs.alloc(Struct::default());
                self.type_cache.insert(key, UserType::Struct(id));
                self.populate_struct(id, raw)?;
                UserType::Struct(id)
            }
            UserDefinedType::UnionType(raw) => {
                let id = decls.unions.alloc(Union::default());
                self.type_cache.insert(key, UserType::Union(id));
                self.populate_union(id, raw)?;
                UserType::Union(id)
            }
            UserDefinedType::EnumType(raw) => {
                let id = decls.enums.alloc(Enum::default());
                self.type_cache.insert(key, UserType::Enum(id));
                self.populate_enum(id, raw)?;
                UserType::Enum(id)
            }
            UserDefinedType::InterfaceType(raw) => {
                let id = decls.interfaces.alloc(Interface::default());
                self.type_cache.insert(key, UserType::Interface(id));
                self.populate_interface(id, raw)?;
                UserType::Interface(id)
            }
        };
        tracing::trace!(key, tag = %tag_of(raw), "resolved");
        Ok(user_type)
    }

    pub(crate) fn struct_from_key(&mut self, key: &'g str) -> Result<StructId> {
        match self.user_type_from_key(key)? {
            UserType::Struct(id) => Ok(id),
            other => Err(mismatch(key, TypeTag::Struct, other.tag()).into()),
        }
    }

    pub(crate) fn union_from_key(&mut self, key: &'g str) -> Result<UnionId> {
        match self.user_type_from_key(key)? {
            UserType::Union(id) => Ok(id),
            other => Err(mismatch(key, TypeTag::Union, other.tag()).into()),
        }
    }

    pub(crate) fn enum_from_key(&mut self, key: &'g str) -> Result<EnumId> {
        match self.user_type_from_key(key)? {
            UserType::Enum(id) => Ok(id),
            other => Err(mismatch(key, TypeTag::Enum, other.tag()).into()),
        }
    }

    pub(crate) fn interface_from_key(&mut self, key: &'g str) -> Result<InterfaceId> {
        match self.user_type_from_key(key)? {
            UserType::Interface(id) => Ok(id),
            other => Err(mismatch(key, TypeTag::Interface, other.tag()).into()),
        }
    }
}
