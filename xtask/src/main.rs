use std::path::Path;
use std::process::{exit, Command};

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the accumulator workspace",
    long_about = "A unified CLI for running examples, item copies, benchmarks,\n\
                  and CI checks in the accumulator workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the person/dish grouping example
    Demo,
    /// Regroup an item CSV file into a new file
    CsvCopy {
        /// Input CSV file (a generated sample when omitted)
        #[arg(long)]
        input: Option<String>,
        /// Output file path
        #[arg(long, default_value = "items_copy.csv")]
        output: String,
        /// JSON file describing the CSV layout
        #[arg(long, env = "ITEM_LAYOUT")]
        layout: Option<String>,
    },
    /// Run all tests in the workspace
    Test,
    /// Run Criterion benchmarks
    Bench,
    /// Compare benchmarks: stash changes, create baseline, restore, compare
    BenchCompare,
    /// Run CI checks (fmt, clippy, tests, examples, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Build and run the examples
    Examples,
    /// Run benchmarks
    Bench,
    /// Run check + examples + bench
    All,
}

const PACKAGES: [&str; 2] = ["accum_core", "item_io"];

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

/// Run `program` and exit with its status code if it fails.
fn run(program: &str, args: &[&str]) {
    eprintln!("+ {program} {}", args.join(" "));
    let status = Command::new(program)
        .args(args)
        .status()
        .unwrap_or_else(|error| panic!("failed to execute {program}: {error}"));
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_cargo(args: &[&str]) {
    run("cargo", args);
}

fn bench(extra: &[&str]) {
    let mut args = vec!["bench", "--package", "accum_core", "--bench", "accumulate"];
    if !extra.is_empty() {
        args.push("--");
        args.extend_from_slice(extra);
    }
    run_cargo(&args);
}

/// Baseline the stashed-away tree, then bench the working tree against it.
fn bench_compare() {
    let baseline_dir = Path::new("target/criterion");
    if baseline_dir.exists() {
        step("Removing existing benchmark data");
        std::fs::remove_dir_all(baseline_dir).expect("failed to remove target/criterion");
    }

    step("Baseline without local changes");
    run("git", &["stash", "push", "-m", "xtask bench-compare"]);
    bench(&["--save-baseline", "main"]);
    run("git", &["stash", "pop"]);

    step("Compare local changes against baseline");
    bench(&["--baseline", "main"]);
}

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&["clippy", "--all-targets", "--", "-D", "warnings"]);

    for package in PACKAGES {
        step(&format!("Test {package}"));
        run_cargo(&["test", "-p", package]);
    }
}

fn ci_examples() {
    step("Run person_dishes");
    run_cargo(&["run", "-p", "accum_core", "--example", "person_dishes"]);

    step("Run csv_copy on the generated sample");
    let output = std::env::temp_dir().join("xtask_items_copy.csv");
    let output = output.display().to_string();
    run_cargo(&[
        "run",
        "-p",
        "item_io",
        "--example",
        "csv_copy",
        "--",
        "--output",
        &output,
    ]);
}

fn ci_bench() {
    step("Run benchmarks");
    bench(&[]);
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => {
            run_cargo(&["run", "-p", "accum_core", "--example", "person_dishes"]);
        }
        Commands::CsvCopy {
            input,
            output,
            layout,
        } => {
            let mut args = vec!["run", "-p", "item_io", "--example", "csv_copy", "--"];
            if let Some(input) = input.as_deref() {
                args.extend(["--input", input]);
            }
            args.extend(["--output", output.as_str()]);
            if let Some(layout) = layout.as_deref() {
                args.extend(["--layout", layout]);
            }
            run_cargo(&args);
        }
        Commands::Test => {
            run_cargo(&["test", "--workspace"]);
        }
        Commands::Bench => bench(&[]),
        Commands::BenchCompare => bench_compare(),
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Examples => ci_examples(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_examples();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
    }
}
