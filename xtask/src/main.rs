// Development automation for nescore
//
// Run with `cargo run -p xtask -- <command>`.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for nescore")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks (fmt, clippy, build, test)
    Ci,
    /// Quick checks before commit (fmt, clippy)
    Check,
    /// Format code
    Fmt {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy with warnings denied
    Clippy,
    /// Build the workspace
    Build {
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        /// Include #[ignore] suites (needs test ROMs on disk)
        #[arg(long)]
        ignored: bool,
        /// Filter to one module (e.g. cpu, ppu, bus)
        #[arg(long)]
        module: Option<String>,
    },
    /// Run benchmarks
    Bench,
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Commands::Ci => run_ci(),
        Commands::Check => run_check(),
        Commands::Fmt { check } => run_fmt(check),
        Commands::Clippy => run_clippy(),
        Commands::Build { release } => run_build(release),
        Commands::Test { ignored, module } => run_test(ignored, module.as_deref()),
        Commands::Bench => run_bench(),
    }
}

fn run_ci() -> Result<()> {
    println!("{}", "=== CI pipeline ===".bold().blue());
    let start = Instant::now();

    run_fmt(true)?;
    run_clippy()?;
    run_build(false)?;
    run_test(false, None)?;

    println!(
        "\n{} {:.2}s",
        "CI passed in".green().bold(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn run_check() -> Result<()> {
    println!("{}", "=== Quick checks ===".bold().blue());
    run_fmt(true)?;
    run_clippy()
}

fn run_fmt(check: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["fmt", "--all"]);
    if check {
        cmd.args(["--", "--check"]);
    }
    execute(&mut cmd)
}

fn run_clippy() -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["clippy", "--all-targets", "--", "-D", "warnings"]);
    execute(&mut cmd)
}

fn run_build(release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("build");
    if release {
        cmd.arg("--release");
    }
    execute(&mut cmd)
}

fn run_test(ignored: bool, module: Option<&str>) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("test");
    if let Some(module) = module {
        cmd.args(["--lib", module]);
    }
    if ignored {
        cmd.args(["--", "--ignored"]);
    }
    execute(&mut cmd)
}

fn run_bench() -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("bench");
    execute(&mut cmd)
}

fn execute(cmd: &mut Command) -> Result<()> {
    println!("{} {:?}", "→".blue(), cmd);
    let status = cmd.status()?;
    if !status.success() {
        bail!("command failed: {:?}", cmd);
    }
    Ok(())
}
