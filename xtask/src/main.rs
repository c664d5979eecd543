use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for overlook")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests, and doc in order
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates with warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Time the camera solver
    Bench,
    /// Run the CLI with its built-in input script
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            for step in [FMT, CLIPPY, TEST, DOC] {
                cargo(step)?;
            }
        }
        Commands::Fmt => cargo(FMT)?,
        Commands::Clippy => cargo(CLIPPY)?,
        Commands::Test => cargo(TEST)?,
        Commands::Doc => cargo(DOC)?,
        Commands::Build => cargo(BUILD)?,
        Commands::Bench => cargo(BENCH)?,
        Commands::Demo => cargo(DEMO)?,
    }

    Ok(())
}

/// A named cargo invocation.
type Step = (&'static str, &'static [&'static str]);

const FMT: Step = ("fmt check", &["fmt", "--all", "--", "--check"]);
const CLIPPY: Step = (
    "clippy",
    &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
);
const TEST: Step = ("test", &["test", "--workspace"]);
const DOC: Step = ("doc", &["doc", "--workspace", "--no-deps"]);
const BUILD: Step = ("build", &["build", "--workspace"]);
const BENCH: Step = (
    "bench",
    &["bench", "-p", "overlook-camera", "--bench", "bench_camera_solver"],
);
const DEMO: Step = ("demo", &["run", "-p", "overlook-cli", "--", "run"]);

fn cargo((label, args): Step) -> Result<()> {
    println!("==> Running cargo {label}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {label} failed");
    }
    Ok(())
}
