//! `doctree` CLI: read and edit JSON documents and project descriptors by
//! JSON Pointer.
//!
//! ## Usage
//!
//! ```sh
//! # Read one value (stdin → stdout)
//! echo '{"a":{"b":1}}' | doctree get --pointer /a/b
//!
//! # Replace or append a value in a file, writing the result elsewhere
//! doctree set -i project.json -o out.json --pointer /launchConfig/hideLogs --value true
//!
//! # Reformat with four-space indentation, dropping null fields
//! doctree fmt -i data.json --indent 4 --skip-nulls
//!
//! # Fill every missing descriptor field with its default
//! doctree descriptor normalize -i project.json
//!
//! # Locate project.json in a project directory
//! doctree descriptor find ./my-project
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use doctree_core::{coerce_text, get_by_pointer, modify_by_pointer, ProjectDescriptor, SerializeOptions};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "doctree",
    version,
    about = "Inspect and edit JSON documents and project descriptors by JSON Pointer"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace); logs go to stderr
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Output formatting shared by every command that prints a document.
#[derive(Args, Clone, Copy)]
struct FormatArgs {
    /// Print on a single line
    #[arg(long)]
    compact: bool,
    /// Spaces per indentation level
    #[arg(long, default_value_t = 2)]
    indent: usize,
    /// Drop object fields whose value is null
    #[arg(long)]
    skip_nulls: bool,
}

impl FormatArgs {
    fn options(self) -> SerializeOptions {
        let base = if self.compact {
            SerializeOptions::compact()
        } else {
            SerializeOptions::pretty()
        };
        base.with_indent(self.indent).with_skip_nulls(self.skip_nulls)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value at a JSON Pointer
    Get {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Pointer to read, e.g. /launchConfig/splashText ("" is the whole document)
        #[arg(short, long)]
        pointer: String,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Replace a value, or append at index == length, and print the document
    Set {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pointer to write; its parent must already exist
        #[arg(short, long)]
        pointer: String,
        /// New value: JSON if it parses as JSON, otherwise a plain string
        #[arg(long)]
        value: String,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Reformat a document
    Fmt {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Project descriptor (project.json) commands
    #[command(subcommand)]
    Descriptor(DescriptorCommands),
}

#[derive(Subcommand)]
enum DescriptorCommands {
    /// Read a descriptor, fill in defaults, and print it
    Normalize {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Print the path of project.json for a file or project directory
    Find {
        /// A project.json file or a directory containing one
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Get {
            input,
            pointer,
            format,
        } => {
            let document = read_document(input.as_deref())?;
            let value = get_by_pointer(&document, &pointer)
                .with_context(|| format!("Failed to read pointer '{}'", pointer))?
                .with_context(|| format!("Nothing at pointer '{}'", pointer))?;
            let text = doctree_core::serialize(&value, &format.options())?;
            write_output(None, &text)?;
        }
        Commands::Set {
            input,
            output,
            pointer,
            value,
            format,
        } => {
            let mut document = read_document(input.as_deref())?;
            modify_by_pointer(&mut document, &pointer, coerce_text(&value))
                .with_context(|| format!("Failed to set pointer '{}'", pointer))?;
            let text = doctree_core::serialize(&document, &format.options())?;
            write_output(output.as_deref(), &text)?;
        }
        Commands::Fmt {
            input,
            output,
            format,
        } => {
            let document = read_document(input.as_deref())?;
            let text = doctree_core::serialize(&document, &format.options())?;
            write_output(output.as_deref(), &text)?;
        }
        Commands::Descriptor(DescriptorCommands::Normalize {
            input,
            output,
            format,
        }) => {
            let json = read_input(input.as_deref())?;
            let descriptor =
                ProjectDescriptor::from_json(&json).context("Failed to read project descriptor")?;
            let text = descriptor.to_json(&format.options())?;
            write_output(output.as_deref(), &text)?;
        }
        Commands::Descriptor(DescriptorCommands::Find { path }) => {
            match ProjectDescriptor::find(&path)? {
                Some(found) => println!("{}", found.display()),
                None => {
                    eprintln!("No project.json found at {}", path.display());
                    process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Install a stderr subscriber; warnings only unless `-v` is given.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init();
}

fn read_document(path: Option<&str>) -> Result<serde_json::Value> {
    let text = read_input(path)?;
    doctree_core::parse(&text).context("Failed to parse input as JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
