// Generator-facing module graph. No raw graph keys here.
//
// Named declarations live in per-module arenas and are referenced by id, so
// a self-referential struct is just a field whose kind carries the struct's
// own id. Everything is read-only once `FileTranslator::translate` returns.
pub mod arena;
pub mod decl;
pub mod kind;
pub mod value;

use indexmap::IndexMap;
use serde::Serialize;

pub use arena::{Arena, Id};
pub use decl::{Enum, EnumField, Field, FieldDefault, Interface, Method, Owner, Parameter, Struct, Union};
pub use kind::{Handle, Kind, Primitive, Ty, TypeTag, UserType};
pub use value::{Builtin, Constant, EnumValue, Literal, Value, ValueRef};

pub type StructId = Id<Struct>;
pub type UnionId = Id<Union>;
pub type EnumId = Id<Enum>;
pub type InterfaceId = Id<Interface>;
pub type ConstantId = Id<Constant>;
pub type EnumValueId = Id<EnumValue>;

/// Opaque attribute bag from the source (`[Key=Value]`), kept as text.
pub type Attributes = IndexMap<String, String>;

/// Position of an import in `Module::transitive_imports`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ImportId(pub usize);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Module {
    /// File name without directories.
    pub name: String,
    pub specified_name: String,
    pub path: String,
    pub namespace: String,
    pub attributes: Attributes,
    /// Direct imports, in source order.
    pub imports: Vec<ImportId>,
    /// Every file reachable through imports, keyed by graph file id.
    pub transitive_imports: IndexMap<String, Import>,
    pub constants: Vec<ConstantId>,
    pub enums: Vec<EnumId>,
    pub structs: Vec<StructId>,
    pub unions: Vec<UnionId>,
    pub interfaces: Vec<InterfaceId>,
    pub declarations: Declarations,
}

/// Storage for every node reachable from a module, local or imported.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Declarations {
    pub structs: Arena<Struct>,
    pub unions: Arena<Union>,
    pub enums: Arena<Enum>,
    pub interfaces: Arena<Interface>,
    pub constants: Arena<Constant>,
    pub enum_values: Arena<EnumValue>,
}

/// Imported file as seen from the importer. `module` carries metadata only
/// (name, path, namespace, attributes); its declarations are not translated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Import {
    pub module_name: String,
    pub namespace: String,
    pub module: Module,
}

impl Module {
    pub fn import(&self, id: ImportId) -> Option<&Import> {
        self.transitive_imports.get_index(id.0).map(|(_, import)| import)
    }

    pub fn direct_imports(&self) -> impl Iterator<Item = &Import> {
        self.imports.iter().filter_map(|id| self.import(*id))
    }

    /// Namespace of whichever module `owner` names.
    pub fn namespace_of(&self, owner: Owner) -> &str {
        match owner {
            Owner::Local => &self.namespace,
            Owner::Imported(id) => self.import(id).map(|import| import.namespace.as_str()).unwrap_or_default(),
        }
    }

    pub fn struct_(&self, id: StructId) -> &Struct {
        &self.declarations.structs[id]
    }

    pub fn union(&self, id: UnionId) -> &Union {
        &self.declarations.unions[id]
    }

    pub fn enum_(&self, id: EnumId) -> &Enum {
        &self.declarations.enums[id]
    }

    pub fn interface(&self, id: InterfaceId) -> &Interface {
        &self.declarations.interfaces[id]
    }

    pub fn constant(&self, id: ConstantId) -> &Constant {
        &self.declarations.constants[id]
    }

    pub fn enum_value(&self, id: EnumValueId) -> &EnumValue {
        &self.declarations.enum_values[id]
    }

    /// Name of a named declaration, for diagnostics and generators alike.
    pub fn user_type_name(&self, user_type: UserType) -> &str {
        match user_type {
            UserType::Struct(id) => &self.struct_(id).name,
            UserType::Union(id) => &self.union(id).name,
            UserType::Enum(id) => &self.enum_(id).name,
            UserType::Interface(id) => &self.interface(id).name,
        }
    }

    pub fn user_type_owner(&self, user_type: UserType) -> Owner {
        match user_type {
            UserType::Struct(id) => self.struct_(id).owner,
            UserType::Union(id) => self.union(id).owner,
            UserType::Enum(id) => self.enum_(id).owner,
            UserType::Interface(id) => self.interface(id).owner,
        }
    }
}
