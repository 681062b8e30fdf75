// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! comet CLI - batch ESM-to-CJS transformation
//!
//! Discovers module sources, runs each through the `comet-esm` pipeline in
//! parallel, and writes `.cjs` output (plus optional reference metadata).
//! Each file is an independent, pure transform, so the fan-out needs no
//! coordination beyond collecting failures.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use rayon::prelude::*;

#[derive(Parser)]
#[command(
    name = "comet",
    about = "ES module to CommonJS transformer for HTTP-loaded modules",
    version,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    /// Files or directories to transform (directories are walked for .js/.mjs)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Write transformed files into this directory instead of beside the input
    #[arg(long = "out-dir")]
    out_dir: Option<PathBuf>,

    /// Identifier substituted for dynamic import() calls
    #[arg(long, default_value = comet_esm::DEFAULT_LOADER)]
    loader: String,

    /// Also write a <stem>.meta.json with the extracted module references
    #[arg(long, conflicts_with = "stdout")]
    meta: bool,

    /// Print transformed code to stdout (single input only)
    #[arg(long)]
    stdout: bool,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("comet=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("comet=warn")
            .init();
    }

    let files = collect_inputs(&cli.inputs)?;
    if files.is_empty() {
        bail!("no .js/.mjs inputs found");
    }

    if cli.stdout {
        if files.len() != 1 {
            bail!("--stdout expects exactly one input file");
        }
        let source = fs::read_to_string(&files[0])
            .with_context(|| format!("failed to read {}", files[0].display()))?;
        match comet_esm::transform_with_loader(&source, &cli.loader) {
            Ok(result) => print!("{}", result.code),
            Err(e) => {
                eprintln!("{}: {}: {}", "Error".red().bold(), files[0].display(), e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    if let Some(dir) = &cli.out_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let failures: Vec<String> = files
        .par_iter()
        .filter_map(|path| {
            transform_file(path, &cli.loader, cli.out_dir.as_deref(), cli.meta)
                .err()
                .map(|e| format!("{}: {e:#}", path.display()))
        })
        .collect();

    for failure in &failures {
        eprintln!("{}: {}", "Error".red().bold(), failure);
    }
    if !failures.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

/// Expands the input list: files are taken as-is, directories are walked
/// recursively for `.js`/`.mjs` sources.
fn collect_inputs(inputs: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            walk_dir(input, &mut files)?;
        } else if input.exists() {
            files.push(input.clone());
        } else {
            bail!("input not found: {}", input.display());
        }
    }
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("js" | "mjs")
        ) {
            files.push(path);
        }
    }
    Ok(())
}

/// Transforms one file, writing `<stem>.cjs` (and optionally
/// `<stem>.meta.json`) into `out_dir` or beside the input.
fn transform_file(
    path: &Path,
    loader: &str,
    out_dir: Option<&Path>,
    write_meta: bool,
) -> anyhow::Result<()> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let result = comet_esm::transform_with_loader(&source, loader)?;

    let file_name = path.file_name().unwrap_or_default();
    let base = match out_dir {
        Some(dir) => dir.join(file_name),
        None => path.to_path_buf(),
    };

    let code_path = base.with_extension("cjs");
    fs::write(&code_path, &result.code)
        .with_context(|| format!("failed to write {}", code_path.display()))?;
    tracing::debug!(
        input = %path.display(),
        output = %code_path.display(),
        references = result.meta.len(),
        "transformed module"
    );

    if write_meta {
        let meta_path = base.with_extension("meta.json");
        let json = serde_json::to_string_pretty(&result.meta)?;
        fs::write(&meta_path, json)
            .with_context(|| format!("failed to write {}", meta_path.display()))?;
    }
    Ok(())
}
