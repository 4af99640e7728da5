// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! docex - compile, run and verify the code examples in the documentation.

mod commands;
mod config;
#[cfg(unix)]
mod interrupt;
mod output;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::{check, list, Session};

#[derive(Parser)]
#[command(name = "docex")]
#[command(version, about = "Compile, run and verify documentation examples", long_about = None)]
pub struct Cli {
    /// Repository root
    #[arg(long, env = "DOCEX_ROOT", default_value = ".")]
    root: PathBuf,

    /// Configuration file (default: <root>/docex.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not probe compilers before the sweep
    #[arg(long)]
    skip_toolchain_check: bool,

    /// Local checkout of the Rust library under test
    #[arg(long, env = "DOCEX_UFBX_RUST_PATH")]
    ufbx_rust_path: Option<PathBuf>,

    /// Only run the example NAME, optionally only in language LANG
    #[arg(long, num_args = 1..=2, value_names = ["NAME", "LANG"])]
    example: Option<Vec<String>>,

    /// Per-command timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// List the extracted examples and exit
    #[arg(long)]
    list: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    output::init();

    let result = Session::open(&cli).and_then(|session| {
        if cli.list {
            list::cmd_list(&session);
            Ok(true)
        } else {
            check::cmd_check(&cli, &session)
        }
    });

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", output::error_label(), e);
            process::exit(e.exit_code());
        }
    }
}
