//! nl3 - Nord Lead 3 SysEx librarian
//!
//! Lists, re-exports and rearranges program and performance dumps.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use nl3_cli::commands::{self, ExportScope, KindArg};
use nl3_cli::config;
use nl3_sysex::{MemoryLocation, PatchKind, TransferMode};

#[derive(Parser)]
#[command(name = "nl3")]
#[command(about = "Nord Lead 3 SysEx librarian")]
#[command(version)]
struct Cli {
    /// Path to nl3.toml (defaults apply when absent)
    #[arg(long, global = true, default_value = "nl3.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the patches contained in one or more dumps
    Summary {
        /// Input .syx files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Only list this kind
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        /// Include empty locations
        #[arg(short, long)]
        all: bool,
    },

    /// Re-export the patches of one kind
    Export {
        /// Input .syx files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output .syx file
        #[arg(short, long)]
        output: PathBuf,

        /// Patch kind to export
        #[arg(short, long, value_enum, default_value = "program")]
        kind: KindArg,

        /// Only export this bank
        #[arg(short, long, conflicts_with = "slots")]
        bank: Option<usize>,

        /// Export the staging slots instead of memory
        #[arg(long)]
        slots: bool,
    },

    /// Copy or move a run of patches and write the resulting memory
    Transfer {
        /// Input .syx files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Patch kind to transfer
        #[arg(short, long, value_enum, default_value = "program")]
        kind: KindArg,

        /// First source location (bank:location)
        #[arg(long, value_parser = parse_location)]
        from: MemoryLocation,

        /// Number of consecutive locations
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// First destination location (bank:location)
        #[arg(long, value_parser = parse_location)]
        to: MemoryLocation,

        /// Leave the sources in place
        #[arg(long)]
        copy: bool,

        /// Output .syx file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn parse_location(s: &str) -> Result<MemoryLocation, String> {
    commands::parse_location(s).map_err(|e| format!("{e:#}"))
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = config::load(Some(&cli.config))?;

    match cli.command {
        Commands::Summary { files, kind, all } => {
            let store = commands::load_store(&files, &config, false)?;
            let omit_blank = config.listing.omit_blank && !all;
            for line in commands::summary(&store, kind, omit_blank) {
                println!("{line}");
            }
        }

        Commands::Export {
            files,
            output,
            kind,
            bank,
            slots,
        } => {
            let store = commands::load_store(&files, &config, false)?;
            let scope = match (bank, slots) {
                (_, true) => ExportScope::Slots,
                (Some(bank), false) => ExportScope::Bank(bank),
                (None, false) => ExportScope::All,
            };
            commands::export(&store, kind.into(), scope, &output)?;
            tracing::info!("Done!");
        }

        Commands::Transfer {
            files,
            kind,
            from,
            count,
            to,
            copy,
            output,
        } => {
            let mut store = commands::load_store(&files, &config, false)?;
            let kind = PatchKind::from(kind);
            let mode = if copy {
                TransferMode::Copy
            } else {
                TransferMode::Move
            };
            commands::transfer(&mut store, kind, from, count, to, mode)?;
            commands::export(&store, kind, ExportScope::All, &output)?;
            tracing::info!("Done!");
        }
    }

    Ok(())
}
