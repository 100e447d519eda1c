mod generate;
mod info;
mod validate;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "comgen",
    about = "Derive PDU routing and socket tables from a network configuration"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Derive Network.json and PduR.json (plus the SOME/IP self-test set)
    Generate {
        /// Configuration documents (.json, .yml/.yaml)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output root; GEN/ and GENT/ are created below it
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compile and validate without writing output
        #[arg(long)]
        dry_run: bool,

        /// Skip the SOME/IP loopback configuration
        #[arg(long)]
        no_self_test: bool,
    },

    /// Validate a configuration document
    Validate {
        /// Input file to validate (.json, .yml/.yaml)
        input: PathBuf,

        /// Suppress individual error output
        #[arg(short, long)]
        quiet: bool,

        /// Print summary count only
        #[arg(short, long)]
        summary: bool,
    },

    /// Display what a configuration document derives to
    Info {
        /// Input file (.json, .yml/.yaml)
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    Json,
    Yaml,
}

pub fn detect_format(path: &Path) -> Result<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("yml" | "yaml") => Ok(Format::Yaml),
        Some(ext) => bail!("Unknown file extension: .{ext}"),
        None => bail!("Cannot detect format: file has no extension"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Generate {
            inputs,
            output,
            dry_run,
            no_self_test,
        } => {
            if let [input] = inputs.as_slice() {
                let root = generate::output_root(input, output.as_deref(), false);
                generate::run_generate(input, &root, dry_run, !no_self_test)
            } else {
                generate::run_batch_generate(&inputs, output.as_deref(), dry_run, !no_self_test)
            }
        }

        Command::Validate {
            input,
            quiet,
            summary,
        } => validate::run_validate(&input, quiet, summary),

        Command::Info { input } => info::run_info(&input),
    }
}
