//! Command line front end: graph JSON → (module JSON | per-file report)
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indexmap::IndexMap;
use tracing::{debug, warn};

use idl_translate::graph::{self, FileGraph};
use idl_translate::ir::Module;
use idl_translate::{TranslateOptions, translate_each};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// resolve the front end's parse graph into generator-facing modules
#[derive(Parser, Debug)]
#[command(name = "idl-translate", version)]
pub struct CommandLineInterface {
    /// log at debug level (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// translate every file and print the modules as JSON
    Translate(TranslateOut),
    /// translate every file and report which ones fail
    Check(CheckOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more serialized graphs. May be literal paths, quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// rewrite module paths relative to this directory
    #[arg(long)]
    src_root: Option<PathBuf>,

    /// worker threads; 0 uses one per core, 1 translates sequentially
    #[arg(long, short, default_value_t = 0)]
    jobs: usize,

    /// only translate this file id (repeatable)
    #[arg(long = "file")]
    files: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct TranslateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// single-line JSON
    #[arg(long)]
    compact: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

enum Input {
    Stdin,
    Path(PathBuf),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn options(&self) -> TranslateOptions {
        TranslateOptions {
            src_root: self.src_root.clone(),
            parallel: self.jobs != 1,
            files: self.files.clone(),
        }
    }

    /// Every input graph, labelled for diagnostics.
    fn load_graphs(&self) -> anyhow::Result<Vec<(String, FileGraph)>> {
        let mut graphs = Vec::new();
        for input in resolve_inputs(&self.input)? {
            let loaded = match input {
                Input::Stdin => {
                    let graph: FileGraph = graph::from_reader_with_path(std::io::stdin().lock())
                        .context("failed to parse graph from stdin")?;
                    ("<stdin>".to_owned(), graph)
                }
                Input::Path(path) => {
                    let label = path.to_string_lossy().into_owned();
                    let source =
                        std::fs::read_to_string(&path).with_context(|| format!("failed to read graph file {label}"))?;
                    let graph = graph::from_str_with_path(&source)
                        .with_context(|| format!("failed to parse graph file {label}"))?;
                    (label, graph)
                }
            };
            debug!(input = %loaded.0, files = loaded.1.files.len(), "loaded graph");
            graphs.push(loaded);
        }
        Ok(graphs)
    }

    /// Runs `op` on a pool sized by `--jobs`; 0 and 1 use the global pool.
    fn with_pool<T: Send>(&self, op: impl FnOnce() -> T + Send) -> anyhow::Result<T> {
        if self.jobs <= 1 {
            return Ok(op());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .context("failed to start worker pool")?;
        Ok(pool.install(op))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Translate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let settings = &target.input_settings;
                let options = settings.options();
                let mut modules: IndexMap<String, Module> = IndexMap::new();
                for (label, graph) in settings.load_graphs()? {
                    let outcomes = settings.with_pool(|| translate_each(&graph, &options))?;
                    for (file, outcome) in outcomes {
                        let module = outcome.with_context(|| format!("{label}: failed to translate {file}"))?;
                        if modules.insert(file.clone(), module).is_some() {
                            warn!(%file, input = %label, "file appears in more than one graph; keeping the last");
                        }
                    }
                }

                let json = if target.compact {
                    serde_json::to_string(&modules)
                } else {
                    serde_json::to_string_pretty(&modules)
                }
                .context("failed to serialize modules")?;
                match target.out.as_ref() {
                    Some(out) => {
                        if let Some(parent) = out.parent() {
                            std::fs::create_dir_all(parent)
                                .with_context(|| format!("failed to create {}", parent.display()))?;
                        }
                        std::fs::write(out, &json).with_context(|| format!("failed to write {}", out.display()))?;
                    }
                    None => println!("{json}"),
                }
                Ok(())
            }
            Command::Check(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let settings = &target.input_settings;
                let options = settings.options();
                let (mut total, mut failed) = (0usize, 0usize);
                for (label, graph) in settings.load_graphs()? {
                    let outcomes = settings.with_pool(|| translate_each(&graph, &options))?;
                    eprintln!("{}", label.bold());
                    for (file, outcome) in outcomes {
                        total += 1;
                        match outcome {
                            Ok(module) => eprintln!(
                                "  ✅ {file} {}",
                                format!(
                                    "({} structs, {} unions, {} enums, {} interfaces, {} constants)",
                                    module.structs.len(),
                                    module.unions.len(),
                                    module.enums.len(),
                                    module.interfaces.len(),
                                    module.constants.len(),
                                )
                                .dimmed()
                            ),
                            Err(error) => {
                                failed += 1;
                                eprintln!("  ❌ {file}: {}", error.to_string().red());
                            }
                        }
                    }
                }
                if failed > 0 {
                    return Err(anyhow!("{failed} of {total} files failed to translate"));
                }
                eprintln!("{}", format!("all {total} files translated").green());
                Ok(())
            }
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "idl_translate=debug" } else { "warn" }));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_inputs(patterns: &[String]) -> anyhow::Result<Vec<Input>> {
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::new();
    for pattern in patterns {
        if pattern == "-" {
            out.push(Input::Stdin);
            continue;
        }
        if !has_glob_chars(pattern) {
            out.push(Input::Path(PathBuf::from(pattern)));
            continue;
        }
        let before = out.len();
        for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
            out.push(Input::Path(entry?));
        }
        if out.len() == before {
            return Err(anyhow!("glob pattern matched no files: {pattern}"));
        }
    }
    Ok(out)
}
