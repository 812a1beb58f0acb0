//! Raw parse graph as emitted by the front-end parser.
//!
//! Everything here is flat and key-indexed: declarations refer to each other
//! only through type keys (into `resolved_types`) and value keys (into
//! `resolved_values`). Nothing in this module resolves anything; see
//! [`crate::translate`] for that.
//!
//! The shapes mirror the front end's schema one-to-one so the JSON it writes
//! deserializes without adapters. Unions are externally tagged with
//! snake_case tags (`{"simple_type": "INT32"}`).
pub mod de;

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use de::{LoadError, from_reader_with_path, from_slice_with_path, from_str_with_path};

/// Sentinel used upstream for "no ordinal was written in the source".
pub const NO_ORDINAL: i32 = -1;

fn no_ordinal() -> i32 {
    NO_ORDINAL
}

// ------------------------------- Graph ----------------------------------- //

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FileGraph {
    /// file id -> file. The id is what `SourceFileInfo::file_name` and
    /// `SourceFile::imports` refer to.
    #[serde(default)]
    pub files: IndexMap<String, SourceFile>,
    #[serde(default)]
    pub resolved_types: IndexMap<String, UserDefinedType>,
    #[serde(default)]
    pub resolved_values: IndexMap<String, UserDefinedValue>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SourceFile {
    pub file_name: String,
    /// Name given on the command line; empty if the file was only parsed
    /// because something imported it.
    #[serde(default)]
    pub specified_file_name: String,
    #[serde(default)]
    pub module_namespace: String,
    #[serde(default)]
    pub attributes: Option<Vec<Attribute>>,
    #[serde(default)]
    pub imports: Option<Vec<String>>,
    #[serde(default)]
    pub declared_objects: Option<DeclaredObjects>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DeclaredObjects {
    #[serde(default)]
    pub top_level_constants: Vec<String>,
    #[serde(default)]
    pub top_level_enums: Vec<String>,
    #[serde(default)]
    pub structs: Vec<String>,
    #[serde(default)]
    pub unions: Vec<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: LiteralValue,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeclarationData {
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub full_identifier: Option<String>,
    #[serde(default = "no_ordinal")]
    pub declared_ordinal: i32,
    #[serde(default = "no_ordinal")]
    pub declaration_order: i32,
    #[serde(default)]
    pub attributes: Option<Vec<Attribute>>,
    #[serde(default)]
    pub source_file_info: Option<SourceFileInfo>,
    /// Struct or interface this declaration is nested in.
    #[serde(default)]
    pub container_type_key: Option<String>,
    #[serde(default)]
    pub contained_declarations: Option<ContainedDeclarations>,
}

impl Default for DeclarationData {
    fn default() -> Self {
        Self {
            short_name: None,
            full_identifier: None,
            declared_ordinal: NO_ORDINAL,
            declaration_order: NO_ORDINAL,
            attributes: None,
            source_file_info: None,
            container_type_key: None,
            contained_declarations: None,
        }
    }
}

impl DeclarationData {
    pub fn short_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SourceFileInfo {
    pub file_name: String,
    #[serde(default)]
    pub line_number: u32,
    #[serde(default)]
    pub column_number: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ContainedDeclarations {
    #[serde(default)]
    pub enums: Vec<String>,
    #[serde(default)]
    pub constants: Vec<String>,
}

// ------------------------------- Types ----------------------------------- //

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    SimpleType(SimpleType),
    StringType(StringType),
    HandleType(HandleType),
    ArrayType(ArrayType),
    MapType(MapType),
    TypeReference(TypeReference),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimpleType {
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

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StringType {
    #[serde(default)]
    pub nullable: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HandleType {
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub kind: HandleKind,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandleKind {
    #[default]
    Unspecified,
    MessagePipe,
    DataPipeConsumer,
    DataPipeProducer,
    SharedBuffer,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArrayType {
    #[serde(default)]
    pub nullable: bool,
    /// Zero or negative means dynamically sized.
    #[serde(default = "no_ordinal")]
    pub fixed_length: i32,
    pub element_type: Box<Type>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapType {
    #[serde(default)]
    pub nullable: bool,
    pub key_type: Box<Type>,
    pub value_type: Box<Type>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TypeReference {
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub is_interface_request: bool,
    #[serde(default)]
    pub identifier: Option<String>,
    pub type_key: String,
}

// ------------------------- User defined types ---------------------------- //

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserDefinedType {
    EnumType(EnumType),
    StructType(StructType),
    UnionType(UnionType),
    InterfaceType(InterfaceType),
}

impl UserDefinedType {
    pub fn decl_data(&self) -> &DeclarationData {
        match self {
            Self::EnumType(x) => &x.decl_data,
            Self::StructType(x) => &x.decl_data,
            Self::UnionType(x) => &x.decl_data,
            Self::InterfaceType(x) => &x.decl_data,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StructType {
    #[serde(default)]
    pub decl_data: DeclarationData,
    #[serde(default)]
    pub fields: Vec<StructField>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StructField {
    #[serde(default)]
    pub decl_data: DeclarationData,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default)]
    pub default_value: Option<DefaultFieldValue>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultFieldValue {
    Value(Value),
    /// The `default` keyword, e.g. `Foo foo = default;`.
    DefaultKeyword,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UnionType {
    #[serde(default)]
    pub decl_data: DeclarationData,
    #[serde(default)]
    pub fields: Vec<UnionField>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnionField {
    #[serde(default)]
    pub decl_data: DeclarationData,
    #[serde(rename = "type")]
    pub ty: Type,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EnumType {
    #[serde(default)]
    pub decl_data: DeclarationData,
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EnumValue {
    #[serde(default)]
    pub decl_data: DeclarationData,
    pub enum_type_key: String,
    #[serde(default)]
    pub initializer_value: Option<Value>,
    #[serde(default)]
    pub int_value: i32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InterfaceType {
    #[serde(default)]
    pub decl_data: DeclarationData,
    #[serde(default)]
    pub service_name: Option<String>,
    /// Keyed by method ordinal.
    #[serde(default)]
    pub methods: BTreeMap<u32, Method>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Method {
    #[serde(default)]
    pub decl_data: DeclarationData,
    /// Parameters travel as the fields of a synthetic struct.
    #[serde(default)]
    pub parameters: StructType,
    /// `None` means fire-and-forget; `Some` with no fields is an empty reply.
    #[serde(default)]
    pub response_params: Option<StructType>,
    #[serde(default)]
    pub ordinal: u32,
}

// ------------------------------- Values ---------------------------------- //

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    LiteralValue(LiteralValue),
    BuiltinValue(BuiltinConstantValue),
    UserValueReference(UserValueReference),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralValue {
    BoolValue(bool),
    DoubleValue(f64),
    FloatValue(f32),
    Int8Value(i8),
    Int16Value(i16),
    Int32Value(i32),
    Int64Value(i64),
    StringValue(String),
    Uint8Value(u8),
    Uint16Value(u16),
    Uint32Value(u32),
    Uint64Value(u64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuiltinConstantValue {
    DoubleInfinity,
    DoubleNegativeInfinity,
    DoubleNan,
    FloatInfinity,
    FloatNegativeInfinity,
    FloatNan,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserValueReference {
    #[serde(default)]
    pub identifier: Option<String>,
    pub value_key: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserDefinedValue {
    EnumValue(EnumValue),
    DeclaredConstant(DeclaredConstant),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeclaredConstant {
    #[serde(default)]
    pub decl_data: DeclarationData,
    #[serde(rename = "type")]
    pub ty: Type,
    pub value: Value,
}
