//! Command implementations

use super::Cli;
use crate::docblock::PhpDocParser;
use crate::error::HookdocError;
use crate::pipeline::{Pipeline, RunSummary};
use crate::source::ScanConfig;
use crate::syntax::PhpParser;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve the scan configuration: file first, then flag overrides
pub fn scan_config(cli: &Cli) -> Result<ScanConfig, HookdocError> {
    let mut config =
        ScanConfig::load_or_default(cli.config.as_deref()).map_err(HookdocError::Config)?;

    if !cli.exclude.is_empty() {
        config.exclude = cli.exclude.clone();
    }
    if cli.keep_reused {
        config.ignore_reused_hooks = false;
    }
    if cli.absolute_paths {
        config.relative_paths = false;
    }

    Ok(config)
}

/// Check the input and output paths before any work is done
pub fn check_paths(input: &Path, output: &Path) -> Result<(), HookdocError> {
    if !input.is_dir() {
        return Err(HookdocError::InputNotDirectory(input.to_path_buf()));
    }

    if output.exists() && !is_writable(output) {
        return Err(HookdocError::OutputNotWritable(output.to_path_buf()));
    }

    let output_dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !output_dir.is_dir() {
        return Err(HookdocError::OutputDirMissing(output_dir.to_path_buf()));
    }

    Ok(())
}

/// A directory only needs write permission; writing the output into it
/// fails later
fn is_writable(path: &Path) -> bool {
    if path.is_dir() {
        return path
            .metadata()
            .is_ok_and(|metadata| !metadata.permissions().readonly());
    }
    OpenOptions::new().append(true).open(path).is_ok()
}

/// Scan the input directory and write the hook file
pub fn generate(cli: &Cli) -> Result<RunSummary, HookdocError> {
    let config = scan_config(cli)?;
    check_paths(&cli.input, &cli.output)?;

    let root: PathBuf = cli
        .input
        .canonicalize()
        .map_err(|err| HookdocError::ScanFailed {
            path: cli.input.clone(),
            cause: err.into(),
        })?;
    debug!("Scanning {:?} with {:?}", root, config);

    println!(
        "Extracting hooks from \"{}\". This may take a few minutes...",
        cli.input.display()
    );

    let parser = PhpParser::new().map_err(|err| HookdocError::ScanFailed {
        path: root.clone(),
        cause: err.into(),
    })?;
    let mut pipeline = Pipeline::new(parser, PhpDocParser::new(), config);

    let scan_failed = |cause: anyhow::Error| HookdocError::ScanFailed {
        path: root.clone(),
        cause,
    };
    let (document, summary) = pipeline.generate(&root).map_err(scan_failed)?;
    let json = document.to_json().map_err(scan_failed)?;

    std::fs::write(&cli.output, &json).map_err(|source| HookdocError::WriteFailed {
        path: cli.output.clone(),
        source,
    })?;

    println!(
        "Done. {:.0} KiB written to {}.",
        json.len() as f64 / 1024.0,
        cli.output.display()
    );

    Ok(summary)
}
