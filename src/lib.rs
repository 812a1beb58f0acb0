//! Middle tier of an IDL toolchain: turns the front end's flat, key-indexed
//! parse graph ([`graph::FileGraph`]) into one resolved [`ir::Module`] per
//! file, ready for per-language generators.
//!
//! ```no_run
//! use idl_translate::{graph, session};
//!
//! let source = std::fs::read_to_string("graph.json")?;
//! let graph = graph::from_str_with_path(&source)?;
//! let modules = session::translate_file_graph(&graph, &session::TranslateOptions::default())?;
//! for (file, module) in &modules {
//!     println!("{file}: {} structs", module.structs.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod error;
pub mod graph;
pub mod ir;
pub mod session;
pub mod translate;

#[cfg(test)]
mod testing;

pub use error::{MalformedGraph, Result, TranslateError};
pub use session::{TranslateOptions, translate_each, translate_file_graph};
pub use translate::FileTranslator;
