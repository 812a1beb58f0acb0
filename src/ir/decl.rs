use serde::Serialize;

use super::{Attributes, ConstantId, EnumId, ImportId, Kind, UserType, Value};

/// Where a declaration lives: exactly one of "this module" or "an imported
/// module". Imported owners index into `Module::transitive_imports`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "import", rename_all = "snake_case")]
pub enum Owner {
    #[default]
    Local,
    Imported(ImportId),
}

impl Owner {
    pub fn is_local(self) -> bool {
        matches!(self, Self::Local)
    }

    pub fn import(self) -> Option<ImportId> {
        match self {
            Self::Local => None,
            Self::Imported(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Struct {
    pub name: String,
    /// Fully qualified identifier, or the short name if there is none.
    pub spec: String,
    pub owner: Owner,
    pub attributes: Attributes,
    pub fields: Vec<Field>,
    /// Declarations nested in the struct body.
    pub enums: Vec<EnumId>,
    pub constants: Vec<ConstantId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Union {
    pub name: String,
    pub spec: String,
    pub owner: Owner,
    pub attributes: Attributes,
    pub fields: Vec<Field>,
}

/// Member of a struct or union.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub kind: Kind,
    /// Ordinal written in the source; `None` leaves assignment to generators.
    pub ordinal: Option<u32>,
    pub default: Option<FieldDefault>,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldDefault {
    Value(Value),
    /// `= default`
    Keyword,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Enum {
    pub name: String,
    pub spec: String,
    pub owner: Owner,
    pub attributes: Attributes,
    pub parent: Option<UserType>,
    pub fields: Vec<EnumField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumField {
    pub name: String,
    pub attributes: Attributes,
    pub numeric_value: i32,
    /// Initializer expression as written, e.g. a reference to another member.
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Interface {
    pub name: String,
    pub spec: String,
    pub owner: Owner,
    pub attributes: Attributes,
    pub service_name: Option<String>,
    /// Sorted by ordinal.
    pub methods: Vec<Method>,
    pub enums: Vec<EnumId>,
    pub constants: Vec<ConstantId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Method {
    pub name: String,
    pub ordinal: u32,
    pub attributes: Attributes,
    pub parameters: Vec<Parameter>,
    /// `None`: no reply. `Some(vec![])`: a reply carrying nothing.
    pub response_parameters: Option<Vec<Parameter>>,
}

impl Method {
    pub fn has_response(&self) -> bool {
        self.response_parameters.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub kind: Kind,
    pub ordinal: Option<u32>,
    pub attributes: Attributes,
}
