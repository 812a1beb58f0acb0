//! Whole-graph translation: one [`FileTranslator`] per file, nothing shared
//! between them but the read-only graph.
use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::graph::FileGraph;
use crate::ir::Module;
use crate::translate::FileTranslator;

#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    /// Rewrite module paths relative to this directory.
    pub src_root: Option<PathBuf>,
    /// Translate files on the current rayon pool.
    pub parallel: bool,
    /// Only these file ids; empty means every file in the graph.
    pub files: Vec<String>,
}

impl TranslateOptions {
    fn selected<'a>(&'a self, graph: &'a FileGraph) -> Vec<&'a str> {
        if self.files.is_empty() {
            graph.files.keys().map(String::as_str).collect()
        } else {
            self.files.iter().map(String::as_str).collect()
        }
    }
}

/// Every selected file's outcome, in graph (or selection) order. A failing
/// file does not hide the others.
pub fn translate_each(graph: &FileGraph, options: &TranslateOptions) -> IndexMap<String, Result<Module>> {
    let selected = options.selected(graph);
    debug!(files = selected.len(), parallel = options.parallel, "translating graph");
    let translate = |name: &str| {
        let outcome = FileTranslator::new(graph, name).into_module().map(|mut module| {
            if let Some(root) = &options.src_root {
                fix_module_path(&mut module, root);
            }
            module
        });
        (name.to_owned(), outcome)
    };
    let outcomes: Vec<(String, Result<Module>)> = if options.parallel {
        selected.par_iter().map(|&name| translate(name)).collect()
    } else {
        selected.iter().map(|&name| translate(name)).collect()
    };
    outcomes.into_iter().collect()
}

/// All selected files, or the first failure in graph order.
pub fn translate_file_graph(graph: &FileGraph, options: &TranslateOptions) -> Result<IndexMap<String, Module>> {
    translate_each(graph, options)
        .into_iter()
        .map(|(name, outcome)| outcome.map(|module| (name, module)))
        .collect()
}

/// Rewrites `module.path`, and the path of every imported module, relative to
/// `root`. Import keys stay graph file ids.
pub fn fix_module_path(module: &mut Module, root: &Path) {
    module.path = relative_path(Path::new(&module.path), root)
        .to_string_lossy()
        .into_owned();
    for import in module.transitive_imports.values_mut() {
        fix_module_path(&mut import.module, root);
    }
}

/// Purely lexical: `path` as seen from `base`, climbing out with `..` when it
/// is not underneath. Neither path has to exist.
pub fn relative_path(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);
    let common = path
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..base.len() {
        out.push(Component::ParentDir);
    }
    for component in &path[common..] {
        out.push(component);
    }
    if out.as_os_str().is_empty() {
        out.push(Component::CurDir);
    }
    out
}

fn normalize(path: &Path) -> Vec<Component<'_>> {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::{MalformedGraph, TranslateError};
    use crate::graph;
    use crate::ir::{Builtin, FieldDefault, Kind, Ty, UserType, Value, ValueRef};
    use crate::testing::{GraphBuilder, field, type_ref};

    const LINKED_LIST: &str = include_str!("../samples/linked_list.json");
    const DIAMOND: &str = include_str!("../samples/diamond_imports.json");
    const MALFORMED: &str = include_str!("../samples/malformed_missing_type.json");

    fn load(source: &str) -> FileGraph {
        graph::from_str_with_path(source).unwrap()
    }

    #[test]
    fn relative_path_matches_relpath() {
        let cases = [
            ("/src/a/b.mojom", "/src", "a/b.mojom"),
            ("/other/x.mojom", "/src/a", "../../other/x.mojom"),
            ("/src", "/src", "."),
            ("/src/./a/../b.mojom", "/src/", "b.mojom"),
            ("/src/b.mojom", "/src/a/..", "b.mojom"),
        ];
        for (path, base, expected) in cases {
            assert_eq!(relative_path(Path::new(path), Path::new(base)), PathBuf::from(expected), "{path} from {base}");
        }
    }

    #[test]
    fn linked_list_fixture_is_self_referential() {
        let graph = load(LINKED_LIST);
        let modules = translate_file_graph(&graph, &TranslateOptions::default()).unwrap();
        let module = &modules["/src/list/linked_list.mojom"];

        assert_eq!(module.name, "linked_list.mojom");
        assert_eq!(module.specified_name, "list/linked_list.mojom");
        assert_eq!(module.namespace, "list");
        assert_eq!(module.attributes.get("JavaPackage").map(String::as_str), Some("org.list"));

        let node_id = module.structs[0];
        let node = module.struct_(node_id);
        assert_eq!(node.name, "Node");
        assert_eq!(node.fields[0].ordinal, Some(0));
        assert_eq!(node.fields[1].kind, Kind::nullable(Ty::Struct { id: node_id }));
        assert_eq!(node.fields[2].kind.user_type(), Some(UserType::Enum(module.enums[0])));
        assert_eq!(module.declarations.structs.len(), 1);

        assert_eq!(node.fields[0].default, None);
        let Some(FieldDefault::Value(Value::Reference {
            target: ValueRef::EnumMember(red),
        })) = node.fields[2].default
        else {
            panic!("color defaults to an enum member, got {:?}", node.fields[2].default);
        };
        assert_eq!(module.enum_value(red).name, "RED");
        assert_eq!(module.enum_value(red).enum_id, module.enums[0]);
        assert_eq!(
            node.fields[3].default,
            Some(FieldDefault::Value(Value::Builtin {
                builtin: Builtin::DoubleInfinity,
            }))
        );
        assert_eq!(node.fields[4].default, Some(FieldDefault::Keyword));
        assert_eq!(node.fields[4].kind, Kind::nullable(Ty::String));

        let walker = module.interface(module.interfaces[0]);
        assert_eq!(walker.service_name.as_deref(), Some("list.Walker"));
        assert_eq!(walker.methods[0].name, "Visit");
        assert_eq!(walker.methods[0].response_parameters, Some(vec![]));
        assert_eq!(walker.methods[1].response_parameters, None);
        assert_eq!(walker.methods[0].parameters[0].kind.user_type(), Some(UserType::Struct(node_id)));

        assert_eq!(module.constant(module.constants[0]).name, "MAX_DEPTH");
        assert_eq!(module.enum_(module.enums[0]).fields.len(), 2);
    }

    #[test]
    fn diamond_fixture_closure_lists_each_file_once() {
        let graph = load(DIAMOND);
        let modules = translate_file_graph(&graph, &TranslateOptions::default()).unwrap();
        let top = &modules["/src/diamond/a.mojom"];
        assert_eq!(
            top.transitive_imports.keys().collect::<Vec<_>>(),
            vec!["/src/diamond/b.mojom", "/src/diamond/c.mojom", "/src/diamond/d.mojom"]
        );
        let direct = top.direct_imports().map(|import| import.module_name.as_str()).collect::<Vec<_>>();
        assert_eq!(direct, vec!["b.mojom", "c.mojom"]);

        let base = module_struct_named(top, "Base");
        assert_eq!(top.namespace_of(base.owner), "diamond.d");
    }

    fn module_struct_named<'m>(module: &'m Module, name: &str) -> &'m crate::ir::Struct {
        module
            .declarations
            .structs
            .iter()
            .map(|(_, s)| s)
            .find(|s| s.name == name)
            .unwrap()
    }

    #[test]
    fn one_failing_file_does_not_hide_the_others() {
        let graph = load(MALFORMED);
        let outcomes = translate_each(&graph, &TranslateOptions::default());
        assert!(outcomes["/src/bad/good.mojom"].is_ok());
        assert_eq!(
            outcomes["/src/bad/broken.mojom"],
            Err(TranslateError::from(MalformedGraph::MissingType("bad.Ghost".into())))
        );
        assert!(translate_file_graph(&graph, &TranslateOptions::default()).is_err());
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let graph = load(DIAMOND);
        let sequential = translate_file_graph(&graph, &TranslateOptions::default()).unwrap();
        let parallel = translate_file_graph(
            &graph,
            &TranslateOptions {
                parallel: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn selection_restricts_and_orders_output() {
        let graph = load(DIAMOND);
        let options = TranslateOptions {
            files: vec!["/src/diamond/d.mojom".into(), "/src/diamond/b.mojom".into()],
            ..Default::default()
        };
        let modules = translate_file_graph(&graph, &options).unwrap();
        assert_eq!(
            modules.keys().collect::<Vec<_>>(),
            vec!["/src/diamond/d.mojom", "/src/diamond/b.mojom"]
        );
    }

    #[test]
    fn src_root_rewrites_paths_but_not_keys() {
        let graph = load(DIAMOND);
        let options = TranslateOptions {
            src_root: Some(PathBuf::from("/src")),
            ..Default::default()
        };
        let modules = translate_file_graph(&graph, &options).unwrap();
        let top = &modules["/src/diamond/a.mojom"];
        assert_eq!(top.path, "diamond/a.mojom");
        let (key, import) = top.transitive_imports.get_index(2).unwrap();
        assert_eq!(key, "/src/diamond/d.mojom");
        assert_eq!(import.module.path, "diamond/d.mojom");
    }

    #[test]
    fn translators_do_not_share_nodes_across_files() {
        let graph = GraphBuilder::new()
            .file("a.mojom", &["b.mojom"])
            .file("b.mojom", &[])
            .structure("b.mojom", "b.Shared", "Shared", vec![])
            .structure("a.mojom", "a.User", "User", vec![field("shared", type_ref("b.Shared"))])
            .build();
        let modules = translate_file_graph(&graph, &TranslateOptions::default()).unwrap();
        let a = &modules["a.mojom"];
        let b = &modules["b.mojom"];
        assert_eq!(a.declarations.structs.len(), 2);
        assert_eq!(b.declarations.structs.len(), 1);
        let shared = module_struct_named(a, "Shared");
        assert_eq!(a.import(shared.owner.import().unwrap()).unwrap().module_name, "b.mojom");
        assert!(b.struct_(b.structs[0]).owner.is_local());
    }
}
