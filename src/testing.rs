//! Builds `FileGraph`s in tests without spelling out the JSON.
//!
//! Every file gets namespace `ns.<stem>`; every declaration records the file
//! it is declared in. Enum members are registered as values under
//! `<enum key>.<member name>`.
use std::path::Path;

use crate::graph::{
    Attribute, DeclarationData, DeclaredConstant, DeclaredObjects, EnumType, EnumValue, FileGraph, InterfaceType,
    LiteralValue, Method, SimpleType, SourceFile, SourceFileInfo, StringType, StructField, StructType, Type,
    TypeReference, UnionField, UnionType, UserDefinedType, UserDefinedValue, UserValueReference, Value,
};

#[derive(Default)]
pub struct GraphBuilder {
    graph: FileGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self) -> FileGraph {
        self.graph
    }

    pub fn file(mut self, id: &str, imports: &[&str]) -> Self {
        let stem = Path::new(id)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = SourceFile {
            file_name: id.to_owned(),
            specified_file_name: id.to_owned(),
            module_namespace: format!("ns.{stem}"),
            attributes: None,
            imports: Some(imports.iter().map(|name| name.to_string()).collect()),
            declared_objects: Some(DeclaredObjects::default()),
        };
        self.graph.files.insert(id.to_owned(), file);
        self
    }

    pub fn structure(self, file: &str, key: &str, name: &str, fields: Vec<StructField>) -> Self {
        let raw = StructType {
            decl_data: decl(name, file),
            fields,
        };
        self.raw_type(file, key, UserDefinedType::StructType(raw))
    }

    /// Fields as `(name, type, declared ordinal)`.
    pub fn union(self, file: &str, key: &str, name: &str, fields: Vec<(&str, Type, i32)>) -> Self {
        let fields = fields
            .into_iter()
            .map(|(field_name, ty, ordinal)| {
                let mut decl_data = decl(field_name, file);
                decl_data.declared_ordinal = ordinal;
                UnionField { decl_data, ty }
            })
            .collect();
        let raw = UnionType {
            decl_data: decl(name, file),
            fields,
        };
        self.raw_type(file, key, UserDefinedType::UnionType(raw))
    }

    pub fn interface(self, file: &str, key: &str, name: &str, methods: Vec<Method>) -> Self {
        let raw = InterfaceType {
            decl_data: decl(name, file),
            service_name: None,
            methods: methods.into_iter().map(|method| (method.ordinal, method)).collect(),
        };
        self.raw_type(file, key, UserDefinedType::InterfaceType(raw))
    }

    /// Top-level enum with members `(name, int value)`.
    pub fn enumeration(mut self, file: &str, key: &str, name: &str, members: &[(&str, i32)]) -> Self {
        let raw = self.enum_type(file, key, name, members);
        self.raw_type(file, key, UserDefinedType::EnumType(raw))
    }

    /// Top-level constant.
    pub fn constant(mut self, file: &str, key: &str, name: &str, ty: Type, value: Value) -> Self {
        self.insert_constant(key, decl(name, file), ty, value);
        self.declared(file).top_level_constants.push(key.to_owned());
        self
    }

    /// Registers `raw` under `key` and lists it among `file`'s top-level
    /// declarations of its kind.
    pub fn raw_type(mut self, file: &str, key: &str, raw: UserDefinedType) -> Self {
        let declared = self.declared(file);
        match &raw {
            UserDefinedType::StructType(_) => declared.structs.push(key.to_owned()),
            UserDefinedType::UnionType(_) => declared.unions.push(key.to_owned()),
            UserDefinedType::EnumType(_) => declared.top_level_enums.push(key.to_owned()),
            UserDefinedType::InterfaceType(_) => declared.interfaces.push(key.to_owned()),
        }
        self.graph.resolved_types.insert(key.to_owned(), raw);
        self
    }

    /// Enum declared inside `container`, which must already be registered.
    pub fn nested_enum(mut self, file: &str, key: &str, name: &str, container: &str, members: &[(&str, i32)]) -> Self {
        let mut raw = self.enum_type(file, key, name, members);
        raw.decl_data.container_type_key = Some(container.to_owned());
        self.graph
            .resolved_types
            .insert(key.to_owned(), UserDefinedType::EnumType(raw));
        self.contained(container).enums.push(key.to_owned());
        self
    }

    /// Constant declared inside `container`, which must already be registered.
    pub fn nested_constant(
        mut self,
        file: &str,
        key: &str,
        name: &str,
        container: &str,
        ty: Type,
        value: LiteralValue,
    ) -> Self {
        let mut decl_data = decl(name, file);
        decl_data.container_type_key = Some(container.to_owned());
        self.insert_constant(key, decl_data, ty, literal(value));
        self.contained(container).constants.push(key.to_owned());
        self
    }

    fn enum_type(&mut self, file: &str, key: &str, name: &str, members: &[(&str, i32)]) -> EnumType {
        let values = members
            .iter()
            .map(|(member, int_value)| EnumValue {
                decl_data: decl(member, file),
                enum_type_key: key.to_owned(),
                initializer_value: None,
                int_value: *int_value,
            })
            .collect::<Vec<_>>();
        for value in &values {
            self.graph.resolved_values.insert(
                format!("{key}.{}", value.decl_data.short_name()),
                UserDefinedValue::EnumValue(value.clone()),
            );
        }
        EnumType {
            decl_data: decl(name, file),
            values,
        }
    }

    fn insert_constant(&mut self, key: &str, decl_data: DeclarationData, ty: Type, value: Value) {
        self.graph.resolved_values.insert(
            key.to_owned(),
            UserDefinedValue::DeclaredConstant(DeclaredConstant { decl_data, ty, value }),
        );
    }

    fn declared(&mut self, file: &str) -> &mut DeclaredObjects {
        self.graph
            .files
            .get_mut(file)
            .unwrap_or_else(|| panic!("declare file `{file}` first"))
            .declared_objects
            .get_or_insert_with(DeclaredObjects::default)
    }

    fn contained(&mut self, container: &str) -> &mut crate::graph::ContainedDeclarations {
        let decl_data = match self.graph.resolved_types.get_mut(container) {
            Some(UserDefinedType::StructType(x)) => &mut x.decl_data,
            Some(UserDefinedType::UnionType(x)) => &mut x.decl_data,
            Some(UserDefinedType::EnumType(x)) => &mut x.decl_data,
            Some(UserDefinedType::InterfaceType(x)) => &mut x.decl_data,
            None => panic!("register container `{container}` first"),
        };
        decl_data.contained_declarations.get_or_insert_with(Default::default)
    }
}

/// Declaration data for `name`, declared in `file`, with no ordinal.
pub fn decl(name: &str, file: &str) -> DeclarationData {
    DeclarationData {
        short_name: Some(name.to_owned()),
        source_file_info: Some(SourceFileInfo {
            file_name: file.to_owned(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Struct field with no ordinal. Fields carry no source file; only their
/// container's is read.
pub fn field(name: &str, ty: Type) -> StructField {
    StructField {
        decl_data: DeclarationData {
            short_name: Some(name.to_owned()),
            ..Default::default()
        },
        ty,
        default_value: None,
    }
}

pub fn field_with_ordinal(name: &str, ty: Type, ordinal: i32) -> StructField {
    let mut field = field(name, ty);
    field.decl_data.declared_ordinal = ordinal;
    field
}

pub fn method(name: &str, ordinal: u32, parameters: Vec<StructField>, response: Option<Vec<StructField>>) -> Method {
    Method {
        decl_data: DeclarationData {
            short_name: Some(name.to_owned()),
            ..Default::default()
        },
        parameters: StructType {
            decl_data: DeclarationData::default(),
            fields: parameters,
        },
        response_params: response.map(|fields| StructType {
            decl_data: DeclarationData::default(),
            fields,
        }),
        ordinal,
    }
}

pub fn attribute(key: &str, value: LiteralValue) -> Attribute {
    Attribute {
        key: key.to_owned(),
        value,
    }
}

pub fn int32() -> Type {
    Type::SimpleType(SimpleType::Int32)
}

pub fn string() -> Type {
    Type::StringType(StringType::default())
}

pub fn type_ref(key: &str) -> Type {
    Type::TypeReference(TypeReference {
        type_key: key.to_owned(),
        ..Default::default()
    })
}

pub fn nullable_ref(key: &str) -> Type {
    Type::TypeReference(TypeReference {
        nullable: true,
        type_key: key.to_owned(),
        ..Default::default()
    })
}

pub fn request_ref(key: &str) -> Type {
    Type::TypeReference(TypeReference {
        is_interface_request: true,
        type_key: key.to_owned(),
        ..Default::default()
    })
}

pub fn literal(value: LiteralValue) -> Value {
    Value::LiteralValue(value)
}

pub fn value_ref(key: &str) -> Value {
    Value::UserValueReference(UserValueReference {
        identifier: None,
        value_key: key.to_owned(),
    })
}
