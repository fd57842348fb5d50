// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! spacey-esm CLI - compile module syntax for a CommonJS-style loader
//!
//! Prints the compiled form of a file (or of `--eval` code). Options not
//! given on the command line come from the nearest `package.json`.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use spacey_compiler::{CompileOptions, Compiler, SourceType};
use spacey_loader::LoaderConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "spacey-esm",
    about = "Compile import/export syntax into live-binding runtime calls",
    version,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    /// JavaScript file to compile
    file: Option<PathBuf>,

    /// Compile source from the command line
    #[arg(short = 'e', long = "eval", conflicts_with = "file")]
    eval: Option<String>,

    /// How to interpret the source
    #[arg(short = 't', long = "type", value_enum)]
    source_type: Option<TypeArg>,

    /// Fallback when the source is ambiguous
    #[arg(long, value_enum)]
    hint: Option<TypeArg>,

    /// Declare generated bindings with `var`
    #[arg(long)]
    var: bool,

    /// Identifier of the runtime object in generated code
    #[arg(long, value_name = "NAME")]
    runtime_name: Option<String>,

    /// Write a line-for-line source map to FILE
    #[arg(long, value_name = "FILE")]
    source_map: Option<PathBuf>,

    /// Print the full compile output as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum TypeArg {
    Module,
    Script,
    Unambiguous,
}

impl From<TypeArg> for SourceType {
    fn from(value: TypeArg) -> Self {
        match value {
            TypeArg::Module => SourceType::Module,
            TypeArg::Script => SourceType::Script,
            TypeArg::Unambiguous => SourceType::Unambiguous,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "spacey_esm=debug,spacey_compiler=debug,spacey_loader=debug"
    } else {
        "spacey_esm=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let (source, options) = match (&cli.file, &cli.eval) {
        (Some(file), _) => {
            let source = std::fs::read_to_string(file)
                .with_context(|| format!("could not read '{}'", file.display()))?;
            let config = LoaderConfig::find(file)?;
            (source, config.compile_options(file))
        }
        (None, Some(code)) => (code.clone(), CompileOptions::default()),
        (None, None) => anyhow::bail!("nothing to compile; pass a file or {}", "--eval".cyan()),
    };
    let options = apply_flags(&cli, options);
    debug!(?options, "compiling");

    let output = Compiler::new().compile(&source, &options)?;
    debug!(esm = output.esm, changed = output.changed, "compiled");

    if let (Some(path), Some(map)) = (&cli.source_map, &output.source_map) {
        std::fs::write(path, map)
            .with_context(|| format!("could not write '{}'", path.display()))?;
        debug!(path = %path.display(), "wrote source map");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", output.code);
        if !output.code.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

/// Command-line flags win over `package.json` settings.
fn apply_flags(cli: &Cli, mut options: CompileOptions) -> CompileOptions {
    if let Some(source_type) = cli.source_type {
        options.source_type = Some(source_type.into());
    }
    if let Some(hint) = cli.hint {
        options.hint = Some(hint.into());
    }
    if cli.var {
        options.var = true;
    }
    if let Some(name) = &cli.runtime_name {
        options.runtime_name = Some(name.clone());
    }
    if cli.source_map.is_some() {
        options.source_map = true;
    }
    options
}
