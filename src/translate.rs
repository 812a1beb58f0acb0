//! Raw parse graph → generator-facing [`Module`], one file at a time.
//!
//! A [`FileTranslator`] walks the top-level declarations of its file and pulls
//! in whatever further keys they reference. Resolution is memoized per
//! translator:
//!
//! - named types by type key (allocated, cached, *then* populated, so
//!   self-referential and mutually recursive declarations terminate);
//! - declared constants and enum-member references by value key (reserved,
//!   cached, then filled, for the same reason);
//! - literals and builtins are not cached.
//!
//! Caches never outlive the translator, so independent files can be
//! translated on separate threads (see [`crate::session`]).
mod decl;
mod imports;
mod kind;
mod value;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::{MalformedGraph, Result};
use crate::graph::{self, DeclarationData, FileGraph};
use crate::ir::arena::Slots;
use crate::ir::{Attributes, Constant, ConstantId, EnumValue, EnumValueId, ImportId, Module, Owner, UserType};

pub use imports::{import_from, populate_metadata, transitive_imports};
pub use value::{builtin_from, literal_from};

pub struct FileTranslator<'g> {
    graph: &'g FileGraph,
    file_name: String,
    module: Module,
    constants: Slots<Constant>,
    enum_values: Slots<EnumValue>,
    type_cache: FxHashMap<&'g str, UserType>,
    constant_cache: FxHashMap<&'g str, ConstantId>,
    enum_value_cache: FxHashMap<&'g str, EnumValueId>,
    outcome: Option<Result<()>>,
}

/// Name, spec, owner and attributes: what every named declaration has before
/// its members are resolved.
struct Header {
    name: String,
    spec: String,
    owner: Owner,
    attributes: Attributes,
}

impl<'g> FileTranslator<'g> {
    /// `file_name` is the key of the file in `graph.files`.
    pub fn new(graph: &'g FileGraph, file_name: impl Into<String>) -> Self {
        Self {
            graph,
            file_name: file_name.into(),
            module: Module::default(),
            constants: Slots::default(),
            enum_values: Slots::default(),
            type_cache: FxHashMap::default(),
            constant_cache: FxHashMap::default(),
            enum_value_cache: FxHashMap::default(),
            outcome: None,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Translates the file. Calling this again returns the same module (or
    /// the same error) without redoing any work.
    pub fn translate(&mut self) -> Result<&Module> {
        if self.outcome.is_none() {
            let outcome = self.run();
            if let Err(error) = &outcome {
                debug!(file = %self.file_name, %error, "translation failed");
            }
            self.outcome = Some(outcome);
        }
        match &self.outcome {
            Some(Err(error)) => Err(error.clone()),
            _ => Ok(&self.module),
        }
    }

    pub fn into_module(mut self) -> Result<Module> {
        self.translate()?;
        Ok(self.module)
    }

    fn run(&mut self) -> Result<()> {
        let graph = self.graph;
        let file = graph
            .files
            .get(&self.file_name)
            .ok_or_else(|| MalformedGraph::MissingFile(self.file_name.clone()))?;
        debug!(file = %self.file_name, "translating");

        populate_metadata(&mut self.module, file);
        self.module.transitive_imports = transitive_imports(graph, file)?;
        self.module.imports = file
            .imports
            .iter()
            .flatten()
            .map(|name| {
                self.module
                    .transitive_imports
                    .get_index_of(name)
                    .map(ImportId)
                    .ok_or_else(|| MalformedGraph::MissingFile(name.clone()))
            })
            .collect::<Result<_, _>>()?;

        if let Some(declared) = &file.declared_objects {
            self.module.constants = declared
                .top_level_constants
                .iter()
                .map(|key| self.constant_from_key(key))
                .collect::<Result<_>>()?;
            self.module.interfaces = declared
                .interfaces
                .iter()
                .map(|key| self.interface_from_key(key))
                .collect::<Result<_>>()?;
            self.module.structs = declared
                .structs
                .iter()
                .map(|key| self.struct_from_key(key))
                .collect::<Result<_>>()?;
            self.module.unions = declared
                .unions
                .iter()
                .map(|key| self.union_from_key(key))
                .collect::<Result<_>>()?;
            self.module.enums = declared
                .top_level_enums
                .iter()
                .map(|key| self.enum_from_key(key))
                .collect::<Result<_>>()?;
        }

        let decls = &mut self.module.declarations;
        decls.constants = std::mem::take(&mut self.constants).finish();
        decls.enum_values = std::mem::take(&mut self.enum_values).finish();
        debug!(
            file = %self.file_name,
            types = self.type_cache.len(),
            constants = decls.constants.len(),
            enum_values = decls.enum_values.len(),
            "translated",
        );
        Ok(())
    }

    // ----------------------------- Linkage ------------------------------- //

    /// Local if the declaration comes from the file being translated,
    /// otherwise the import it was reached through.
    fn owner_of(&self, decl: &DeclarationData) -> Result<Owner> {
        let info = decl.source_file_info.as_ref().ok_or_else(|| MalformedGraph::MissingSourceFile {
            name: decl.short_name().to_owned(),
        })?;
        if info.file_name == self.file_name {
            return Ok(Owner::Local);
        }
        match self.module.transitive_imports.get_index_of(&info.file_name) {
            Some(index) => Ok(Owner::Imported(ImportId(index))),
            None => Err(MalformedGraph::NotImported {
                name: decl.short_name().to_owned(),
                file: info.file_name.clone(),
                importer: self.file_name.clone(),
            }
            .into()),
        }
    }

    fn header(&self, decl: &DeclarationData) -> Result<Header> {
        let name = decl.short_name().to_owned();
        let spec = decl.full_identifier.clone().unwrap_or_else(|| name.clone());
        Ok(Header {
            owner: self.owner_of(decl)?,
            attributes: attributes_from(decl.attributes.as_deref()),
            name,
            spec,
        })
    }

    /// Struct or interface a nested declaration sits in.
    fn parent_of(&mut self, decl: &'g DeclarationData) -> Result<Option<UserType>> {
        match &decl.container_type_key {
            Some(key) => Ok(Some(self.user_type_from_key(key)?)),
            None => Ok(None),
        }
    }
}

pub(crate) fn attributes_from(attributes: Option<&[graph::Attribute]>) -> Attributes {
    attributes
        .unwrap_or_default()
        .iter()
        .map(|attr| (attr.key.clone(), value::literal_of(&attr.value).to_attribute_text()))
        .collect()
}

/// Negative means "not written in the source".
pub(crate) fn ordinal_from(decl: &DeclarationData) -> Option<u32> {
    u32::try_from(decl.declared_ordinal).ok()
}

fn trace_hit(cache: &'static str, key: &str) {
    trace!(cache, key, "cache hit");
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::TranslateError;
    use crate::graph::{LiteralValue, StructType, UserDefinedType};
    use crate::testing::{GraphBuilder, attribute, field, type_ref};

    #[test]
    fn translate_is_idempotent() {
        let graph = GraphBuilder::new()
            .file("a.mojom", &[])
            .structure("a.mojom", "a.S", "S", vec![field("me", type_ref("a.S"))])
            .build();
        let mut translator = FileTranslator::new(&graph, "a.mojom");
        let first = translator.translate().unwrap().clone();
        let second = translator.translate().unwrap();
        assert_eq!(&first, second);
        assert_eq!(second.declarations.structs.len(), 1);
    }

    #[test]
    fn failure_is_remembered() {
        let graph = GraphBuilder::new().file("a.mojom", &["gone.mojom"]).build();
        let mut translator = FileTranslator::new(&graph, "a.mojom");
        let expected = TranslateError::from(MalformedGraph::MissingFile("gone.mojom".into()));
        assert_eq!(translator.translate().unwrap_err(), expected);
        assert_eq!(translator.translate().unwrap_err(), expected);
    }

    #[test]
    fn direct_imports_are_a_prefix_of_the_closure() {
        let mut graph = GraphBuilder::new()
            .file("a.mojom", &["b.mojom", "c.mojom"])
            .file("b.mojom", &["d.mojom"])
            .file("c.mojom", &[])
            .file("d.mojom", &[])
            .build();
        graph.files["a.mojom"].attributes = Some(vec![attribute("Version", LiteralValue::Uint8Value(3))]);
        let module = FileTranslator::new(&graph, "a.mojom").into_module().unwrap();
        assert_eq!(module.name, "a.mojom");
        assert_eq!(module.namespace, "ns.a");
        assert_eq!(module.attributes.get("Version").map(String::as_str), Some("3"));
        assert_eq!(module.imports, vec![ImportId(0), ImportId(1)]);
        assert_eq!(module.transitive_imports.len(), 3);
        let names = module.direct_imports().map(|i| i.module_name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["b.mojom", "c.mojom"]);
    }

    #[test]
    fn declaration_outside_the_closure_is_malformed() {
        let graph = GraphBuilder::new()
            .file("a.mojom", &[])
            .file("z.mojom", &[])
            .structure("z.mojom", "z.Far", "Far", vec![])
            .structure("a.mojom", "a.Near", "Near", vec![field("far", type_ref("z.Far"))])
            .build();
        let err = FileTranslator::new(&graph, "a.mojom").into_module().unwrap_err();
        assert_eq!(
            err,
            TranslateError::from(MalformedGraph::NotImported {
                name: "Far".into(),
                file: "z.mojom".into(),
                importer: "a.mojom".into(),
            })
        );
    }

    #[test]
    fn declaration_without_source_file_is_malformed() {
        let mut raw = StructType::default();
        raw.decl_data.short_name = Some("Lost".into());
        let graph = GraphBuilder::new()
            .file("a.mojom", &[])
            .raw_type("a.mojom", "a.Lost", UserDefinedType::StructType(raw))
            .build();
        let err = FileTranslator::new(&graph, "a.mojom").into_module().unwrap_err();
        assert_eq!(err, TranslateError::from(MalformedGraph::MissingSourceFile { name: "Lost".into() }));
    }

    #[test]
    fn ordinal_sentinel_means_none() {
        let mut decl = DeclarationData::default();
        assert_eq!(ordinal_from(&decl), None);
        decl.declared_ordinal = 0;
        assert_eq!(ordinal_from(&decl), Some(0));
    }
}
