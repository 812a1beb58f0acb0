use std::collections::VecDeque;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use tracing::trace;

use crate::error::{MalformedGraph, Result};
use crate::graph::{FileGraph, SourceFile};
use crate::ir::{Import, Module};

use super::attributes_from;

/// Name, specified name, path, namespace and attributes. Nothing else.
pub fn populate_metadata(module: &mut Module, file: &SourceFile) {
    module.name = Path::new(&file.file_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.file_name.clone());
    module.specified_name = file.specified_file_name.clone();
    module.path = file.file_name.clone();
    module.namespace = file.module_namespace.clone();
    module.attributes = attributes_from(file.attributes.as_deref());
}

/// Descriptor for one imported file, wrapping a metadata-only module.
pub fn import_from(graph: &FileGraph, name: &str) -> Result<Import> {
    let file = graph
        .files
        .get(name)
        .ok_or_else(|| MalformedGraph::MissingFile(name.to_owned()))?;
    let mut module = Module::default();
    populate_metadata(&mut module, file);
    Ok(Import {
        module_name: module.name.clone(),
        namespace: module.namespace.clone(),
        module,
    })
}

/// Every file reachable from `file` through imports, each exactly once,
/// keyed by graph file id. Direct imports come first, in source order; the
/// rest follow breadth-first.
pub fn transitive_imports(graph: &FileGraph, file: &SourceFile) -> Result<IndexMap<String, Import>> {
    let mut queue: VecDeque<&str> = file.imports.iter().flatten().map(String::as_str).collect();
    let mut seen: IndexSet<&str> = IndexSet::new();

    while let Some(name) = queue.pop_front() {
        if !seen.insert(name) {
            continue;
        }
        let imported = graph
            .files
            .get(name)
            .ok_or_else(|| MalformedGraph::MissingFile(name.to_owned()))?;
        queue.extend(
            imported
                .imports
                .iter()
                .flatten()
                .map(String::as_str)
                .filter(|next| !seen.contains(next)),
        );
    }
    trace!(file = %file.file_name, closure = seen.len(), "import closure");

    seen.into_iter()
        .map(|name| -> Result<(String, Import)> { Ok((name.to_owned(), import_from(graph, name)?)) })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::TranslateError;
    use crate::testing::GraphBuilder;

    fn closure_of(graph: &FileGraph, name: &str) -> Vec<String> {
        transitive_imports(graph, &graph.files[name])
            .unwrap()
            .into_keys()
            .collect()
    }

    #[test]
    fn chain_is_followed_to_the_end() {
        let graph = GraphBuilder::new()
            .file("a.mojom", &["b.mojom"])
            .file("b.mojom", &["c.mojom"])
            .file("c.mojom", &[])
            .build();
        assert_eq!(closure_of(&graph, "a.mojom"), vec!["b.mojom", "c.mojom"]);
    }

    #[test]
    fn diamond_lists_each_file_once() {
        let graph = GraphBuilder::new()
            .file("a.mojom", &["b.mojom", "c.mojom"])
            .file("b.mojom", &["c.mojom", "d.mojom"])
            .file("c.mojom", &["d.mojom"])
            .file("d.mojom", &[])
            .build();
        assert_eq!(closure_of(&graph, "a.mojom"), vec!["b.mojom", "c.mojom", "d.mojom"]);
    }

    #[test]
    fn no_imports_means_empty_closure() {
        let graph = GraphBuilder::new().file("a.mojom", &[]).build();
        assert!(closure_of(&graph, "a.mojom").is_empty());
    }

    #[test]
    fn descriptor_carries_metadata_only() {
        let graph = GraphBuilder::new()
            .file("a.mojom", &["/src/net/b.mojom"])
            .file("/src/net/b.mojom", &[])
            .structure("/src/net/b.mojom", "b.S", "S", vec![])
            .build();
        let import = import_from(&graph, "/src/net/b.mojom").unwrap();
        assert_eq!(import.module_name, "b.mojom");
        assert_eq!(import.namespace, "ns.b");
        assert_eq!(import.module.path, "/src/net/b.mojom");
        assert!(import.module.structs.is_empty());
        assert!(import.module.declarations.structs.is_empty());
    }

    #[test]
    fn missing_import_is_malformed() {
        let graph = GraphBuilder::new().file("a.mojom", &["ghost.mojom"]).build();
        let err = transitive_imports(&graph, &graph.files["a.mojom"]).unwrap_err();
        assert_eq!(err, TranslateError::from(MalformedGraph::MissingFile("ghost.mojom".into())));
    }
}
