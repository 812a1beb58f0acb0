//! Runs every graph under `samples/` through the translator.
//!
//! Fixtures named `malformed_*` must fail in at least one file; all others
//! must translate cleanly and serialize.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use colored::Colorize;
use idl_translate::graph::{self, FileGraph};
use idl_translate::{TranslateOptions, translate_each};

fn samples_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("samples")
}

fn run_fixture(path: &Path) -> Result<String, String> {
    let source = std::fs::read_to_string(path).map_err(|error| format!("failed to read: {error}"))?;
    let graph: FileGraph = graph::from_str_with_path(&source).map_err(|error| format!("failed to parse: {error}"))?;
    let options = TranslateOptions {
        parallel: true,
        ..Default::default()
    };
    let outcomes = translate_each(&graph, &options);
    let expect_failure = path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with("malformed_"));

    let failures = outcomes
        .iter()
        .filter_map(|(file, outcome)| outcome.as_ref().err().map(|error| format!("{file}: {error}")))
        .collect::<Vec<_>>();
    match (expect_failure, failures.is_empty()) {
        (false, true) => {
            for module in outcomes.values().flatten() {
                serde_json::to_string(module).map_err(|error| format!("failed to serialize: {error}"))?;
            }
            Ok(format!("{} files", outcomes.len()))
        }
        (false, false) => Err(failures.join("; ")),
        (true, false) => Ok(format!("failed as expected: {}", failures.join("; "))),
        (true, true) => Err("expected a translation failure".to_owned()),
    }
}

fn main() -> ExitCode {
    let pattern = samples_dir().join("*.json");
    let paths = match glob::glob(&pattern.to_string_lossy()) {
        Ok(paths) => paths.filter_map(Result::ok).collect::<Vec<_>>(),
        Err(error) => {
            eprintln!("❌ bad fixture pattern: {error}");
            return ExitCode::FAILURE;
        }
    };

    let mut failed = 0;
    for path in &paths {
        let name = path.file_name().map(|x| x.to_string_lossy().into_owned()).unwrap_or_default();
        match run_fixture(path) {
            Ok(summary) => eprintln!("✅ {name} {}", summary.dimmed()),
            Err(error) => {
                failed += 1;
                eprintln!("❌ {name}: {}", error.red());
            }
        }
    }

    if failed > 0 {
        eprintln!("{}", format!("{failed} of {} fixtures failed", paths.len()).red().bold());
        return ExitCode::FAILURE;
    }
    eprintln!("{}", format!("{} fixtures passed", paths.len()).green());
    ExitCode::SUCCESS
}
