//! impsym - symbolic executor for imp programs
//!
//! Parses an imp program, explores every feasible path symbolically, and
//! prints the diagnostics and terminal symbolic states. A completed run
//! exits 0 even when violations were found; the diagnostics are the
//! verdict. Log verbosity is controlled through `RUST_LOG`.

use anyhow::{Context as _, Result};
use clap::Parser;
use imp_sym::{Explorer, SymState};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "impsym")]
#[command(about = "Symbolic execution and invariant checking for imp programs")]
#[command(version)]
struct Cli {
    /// Program to execute symbolically
    file: PathBuf,

    /// Also print each terminal state's path condition as an SMT-LIB
    /// benchmark
    #[arg(long)]
    dump_smt2: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;
    let program = imp_core::parse(&source)
        .with_context(|| format!("parsing {}", cli.file.display()))?;

    let cfg = z3::Config::new();
    let ctx = z3::Context::new(&cfg);
    let mut explorer = Explorer::new(&ctx);
    let states = explorer.run(&program, SymState::new(&ctx))?;

    for diag in explorer.diagnostics() {
        println!("[impsym]: {}", diag);
    }
    for state in &states {
        println!("[impsym]: symbolic state reached");
        println!("{}", state);
        if cli.dump_smt2 {
            println!("{}", state.to_benchmark());
        }
    }
    println!("[impsym]: found {} symbolic state(s)", states.len());
    Ok(())
}
