// ==============================================================================
// CLI for the FlatBuffers Schema Generator
// ==============================================================================
//
// Two subcommands:
//   - `fbsgen generate [INPUT] [OUTPUT]` -- synthesize schema text from a
//     descriptor document (plus dependency artifact documents) and write it
//   - `fbsgen check INPUT`               -- consolidate and report
//     diagnostics without writing schema text

use std::fs;
use std::io::{self, Read as _, Write as _};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Context;

use fbsgen::Schemagen;
use fbsgen::consolidate::{Directives, consolidate};
use fbsgen::import::{load_artifact_sets, load_descriptor_file};
use fbsgen::model::text::schema_to_text;

// ==============================================================================
// CLI Argument Definitions
// ==============================================================================

#[derive(Parser)]
#[command(name = "fbsgen", about = "FlatBuffers schema generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Synthesize schema text from a descriptor document.
    Generate {
        /// Primary descriptor document (reads from stdin if omitted or `-`).
        input: Option<String>,
        /// Output .fbs file (writes to stdout if omitted or `-`; `auto`
        /// derives the name from the namespace).
        output: Option<String>,
        /// Directories to scan for dependency artifact descriptor documents.
        /// May be repeated.
        #[arg(long = "artifact-dir")]
        artifact_dir: Vec<PathBuf>,
        /// 4-character file identifier, overriding the document's value.
        #[arg(long = "file-identifier")]
        file_identifier: Option<String>,
    },
    /// Consolidate a descriptor document and report diagnostics without
    /// writing schema text.
    Check {
        /// Primary descriptor document (required; unlike `generate`, stdin is
        /// not supported).
        input: String,
        /// Directories to scan for dependency artifact descriptor documents.
        /// May be repeated.
        #[arg(long = "artifact-dir")]
        artifact_dir: Vec<PathBuf>,
    },
}

// ==============================================================================
// Entry Point
// ==============================================================================

fn main() -> miette::Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(miette::MietteHandlerOpts::new().build())
    }))?;

    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            input,
            output,
            artifact_dir,
            file_identifier,
        } => run_generate(input, output, artifact_dir, file_identifier),
        Command::Check {
            input,
            artifact_dir,
        } => run_check(input, artifact_dir),
    }
}

// ==============================================================================
// `generate` Subcommand
// ==============================================================================

fn run_generate(
    input: Option<String>,
    output: Option<String>,
    artifact_dirs: Vec<PathBuf>,
    file_identifier: Option<String>,
) -> miette::Result<()> {
    let mut generator = Schemagen::new();
    for dir in artifact_dirs {
        generator.artifact_dir(dir);
    }
    if let Some(identifier) = file_identifier {
        generator.file_identifier(identifier);
    }

    let result = match input.as_deref() {
        None | Some("-") => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|e| miette::miette!("{e}"))
                .context("read descriptor document from stdin")?;
            generator.generate_str_named(&source, "<stdin>")
        }
        Some(path) => generator.generate(path),
    };

    let generated = match result {
        Ok(generated) => generated,
        Err(e) => {
            print_warnings(&generator.drain_warnings());
            return Err(e);
        }
    };
    print_warnings(&generated.warnings);

    match output.as_deref() {
        None | Some("-") => {
            io::stdout()
                .write_all(generated.text.as_bytes())
                .map_err(|e| miette::miette!("{e}"))
                .context("write schema text to stdout")?;
        }
        Some("auto") => {
            fs::write(&generated.file_name, &generated.text)
                .map_err(|e| miette::miette!("{e}"))
                .with_context(|| format!("write {}", generated.file_name))?;
        }
        Some(path) => {
            fs::write(path, &generated.text)
                .map_err(|e| miette::miette!("{e}"))
                .with_context(|| format!("write {path}"))?;
        }
    }
    Ok(())
}

// ==============================================================================
// `check` Subcommand
// ==============================================================================

fn run_check(input: String, artifact_dirs: Vec<PathBuf>) -> miette::Result<()> {
    let mut sources = vec![load_descriptor_file(std::path::Path::new(&input))?];
    sources.extend(load_artifact_sets(&artifact_dirs)?);

    let (schema, warnings) = consolidate(&sources, &Directives::default());
    print_warnings(&warnings);

    // Render and discard, so defects that only the serializer catches still
    // fail the check.
    schema_to_text(&schema)?;

    println!(
        "{input}: {} declaration(s), {} warning(s)",
        schema.len(),
        warnings.len()
    );
    Ok(())
}

/// Print each warning's full diagnostic rendering to stderr.
fn print_warnings(warnings: &[miette::Report]) {
    for warning in warnings {
        eprintln!("{warning:?}");
    }
}
