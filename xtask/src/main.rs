//! rf-prize-scale workspace tasks
//!
//! Usage:
//!   cargo xtask test            - Run all tests
//!   cargo xtask bench           - Run distribution benchmarks
//!   cargo xtask docs            - Generate documentation
//!   cargo xtask check           - Clippy + format check

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

const LIB_PACKAGE: &str = "rf-prize-scale";

#[derive(Parser)]
#[command(name = "xtask", about = "rf-prize-scale workspace tasks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all tests
    Test {
        /// Run only the distributor library tests
        #[arg(long)]
        lib: bool,
    },
    /// Run benchmarks
    Bench {
        /// Only run benchmarks whose name matches
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Generate documentation
    Docs {
        /// Open in browser
        #[arg(short, long)]
        open: bool,
    },
    /// Check code quality
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let project_root = project_root()?;

    match cli.command {
        Commands::Test { lib } => run_tests(&project_root, lib),
        Commands::Bench { filter } => run_benchmarks(&project_root, filter.as_deref()),
        Commands::Docs { open } => generate_docs(&project_root, open),
        Commands::Check => check_quality(&project_root),
    }
}

fn project_root() -> Result<PathBuf> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR")
        .context("CARGO_MANIFEST_DIR not set")?;

    Ok(Path::new(&manifest_dir)
        .parent()
        .context("Failed to get parent directory")?
        .to_path_buf())
}

fn cargo(root: &Path, args: &[&str], what: &str) -> Result<()> {
    let status = Command::new("cargo")
        .current_dir(root)
        .args(args)
        .status()
        .with_context(|| format!("Failed to run {what}"))?;

    if !status.success() {
        bail!("{what} failed");
    }
    Ok(())
}

fn run_tests(root: &Path, lib_only: bool) -> Result<()> {
    println!("🧪 Running tests...\n");

    let mut args = vec!["test"];
    if lib_only {
        args.extend(["--package", LIB_PACKAGE]);
    } else {
        args.push("--workspace");
    }
    cargo(root, &args, "tests")?;

    println!("\n✅ All tests passed!");
    Ok(())
}

fn run_benchmarks(root: &Path, filter: Option<&str>) -> Result<()> {
    println!("⏱️  Running benchmarks...\n");

    let mut args = vec!["bench", "--package", LIB_PACKAGE];
    if let Some(filter) = filter {
        args.extend(["--", filter]);
    }
    cargo(root, &args, "benchmarks")
}

fn generate_docs(root: &Path, open: bool) -> Result<()> {
    println!("📚 Generating documentation...\n");

    let mut args = vec!["doc", "--workspace", "--no-deps"];
    if open {
        args.push("--open");
    }
    cargo(root, &args, "documentation generation")?;

    println!("\n✅ Documentation generated!");
    Ok(())
}

fn check_quality(root: &Path) -> Result<()> {
    println!("🔍 Checking code quality...\n");

    println!("Running clippy...");
    cargo(
        root,
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        "clippy",
    )?;

    println!("\nChecking formatting...");
    let fmt_status = Command::new("cargo")
        .current_dir(root)
        .args(["fmt", "--all", "--check"])
        .status()
        .context("Failed to check formatting")?;

    if !fmt_status.success() {
        println!("⚠️  Formatting issues found. Run 'cargo fmt' to fix.");
    }

    println!("\n✅ Code quality check complete!");
    Ok(())
}
