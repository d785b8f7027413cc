//! Tetromino Packer
//!
//! Reads a file of tetrominoes and prints the smallest square that holds all
//! of them, each piece drawn with its letter (`A` for the first tetromino in
//! the file, `B` for the second, ...) and `.` for empty cells.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;

use tetropack::parse::load_pieces;
use tetropack::solver::{self, DEFAULT_CHECK_INTERVAL, DEFAULT_TIME_BUDGET};
use tetropack::{Error, Piece, Solver, SolverConfig};

/// Packs tetrominoes into the smallest possible square.
#[derive(Parser)]
#[command(name = "tetropack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the smallest square and print it.
    Solve {
        /// Tetromino input file.
        file: PathBuf,

        #[command(flatten)]
        search: SearchArgs,
    },
    /// Print the range of square sizes that would be searched.
    Bounds {
        /// Tetromino input file.
        file: PathBuf,
    },
    /// Validate the input file and list its pieces.
    Check {
        /// Tetromino input file.
        file: PathBuf,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Time budget in milliseconds for each longest-side-first attempt.
    #[arg(long, default_value_t = DEFAULT_TIME_BUDGET.as_millis() as u64)]
    timeout_ms: u64,

    /// Number of search steps between clock checks.
    #[arg(long, default_value_t = DEFAULT_CHECK_INTERVAL)]
    check_interval: u32,

    /// Search pieces in file order only.
    #[arg(long)]
    no_heuristic: bool,
}

impl From<&SearchArgs> for SolverConfig {
    fn from(args: &SearchArgs) -> Self {
        Self {
            time_budget: Duration::from_millis(args.timeout_ms),
            check_interval: args.check_interval,
            footprint_ordering: !args.no_heuristic,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Solve { file, search } => run_solve(&file, (&search).into()),
        Command::Bounds { file } => run_bounds(&file),
        Command::Check { file } => run_check(&file),
    };

    if let Err(e) = result {
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }
}

/// Installs a stderr subscriber so stdout carries only the grid.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(level)
        .init();
}

/// Loads the pieces and prints the smallest packing.
fn run_solve(file: &Path, config: SolverConfig) -> Result<(), Error> {
    let pieces = load_pieces(file)?;
    print!("{}", solve_to_string(&pieces, config));
    Ok(())
}

/// Prints the candidate size range for the pieces in a file.
fn run_bounds(file: &Path) -> Result<(), Error> {
    let pieces = load_pieces(file)?;
    println!(
        "{} pieces: sizes {} to {}",
        pieces.len(),
        solver::minimum_size(pieces.len()),
        solver::maximum_size(pieces.len())
    );
    Ok(())
}

/// Prints each piece with its bounding box.
fn run_check(file: &Path) -> Result<(), Error> {
    let pieces = load_pieces(file)?;
    print!("{}", describe_pieces(&pieces));
    Ok(())
}

fn solve_to_string(pieces: &[Piece], config: SolverConfig) -> String {
    Solver::new(config).find_smallest_square(pieces).grid.render()
}

fn describe_pieces(pieces: &[Piece]) -> String {
    let mut output = format!("{} valid tetrominoes\n", pieces.len());
    for piece in pieces {
        output.push_str(&format!(
            "{}: {}x{}\n",
            piece.id(),
            piece.width(),
            piece.height()
        ));
    }
    output
}
