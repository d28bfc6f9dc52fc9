use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use structopt::StructOpt;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::scripts::{RunOptions, Script};
use crate::series::AxisPolicy;

mod error;
mod export;
mod perf;
mod perf_log;
mod plot;
mod scripts;
mod series;
mod speedup;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "bench-plot",
    about = "Charts thread and process scaling from benchmark logs"
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    /// Directory the charts are written to
    #[structopt(long, default_value = ".", parse(from_os_str))]
    output_dir: PathBuf,

    /// Also write the plotted points of each chart to a CSV file beside it
    #[structopt(long)]
    csv: bool,

    /// Drop samples whose degree is not on the chart axis instead of failing
    #[structopt(long)]
    drop_off_axis: bool,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Time and speedup charts per grid size from Game of Life runs
    GameOfLife {
        /// Benchmark log to read
        #[structopt(parse(from_os_str))]
        input: PathBuf,
    },
    /// Time per graph size from Floyd-Warshall runs
    FloydWarshall(SingleChart),
    /// Speedup per executable from MPI heat diffusion runs
    HeatDiffusion(SingleChart),
    /// Throughput per lock implementation
    Locks(SingleChart),
    /// Throughput per linked list synchronization scheme
    LinkedList(SingleChart),
    /// Throughput of repeated bank account runs
    Accounts(SingleChart),
}

#[derive(Debug, StructOpt)]
struct SingleChart {
    /// PNG file name, relative to --output-dir; `.png` is added when missing
    #[structopt(short, long, parse(try_from_str = png_file_name))]
    output: Option<String>,

    /// Benchmark log to read
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

/// Charts are only ever drawn as PNG, so any other extension is a usage error.
fn png_file_name(name: &str) -> Result<String, String> {
    match Path::new(name).extension().and_then(|ext| ext.to_str()) {
        None => Ok(format!("{name}.png")),
        Some(ext) if ext.eq_ignore_ascii_case("png") => Ok(name.to_owned()),
        Some(ext) => Err(format!("charts are written as PNG, not `.{ext}`")),
    }
}

impl Command {
    fn into_parts(self) -> (Script, PathBuf, Option<String>) {
        let (script, args) = match self {
            Command::GameOfLife { input } => return (Script::GameOfLife, input, None),
            Command::FloydWarshall(args) => (Script::FloydWarshall, args),
            Command::HeatDiffusion(args) => (Script::HeatDiffusion, args),
            Command::Locks(args) => (Script::Locks, args),
            Command::LinkedList(args) => (Script::LinkedList, args),
            Command::Accounts(args) => (Script::Accounts, args),
        };
        (script, args.input, args.output)
    }
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::new(format!("bench_plot={log_level}"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::from_args();
    init_logging(cli.verbose);

    let (script, input, output) = cli.command.into_parts();
    let opts = RunOptions {
        output_dir: cli.output_dir,
        output,
        csv: cli.csv,
        policy: if cli.drop_off_axis {
            AxisPolicy::Drop
        } else {
            AxisPolicy::Strict
        },
    };

    let written = scripts::run(script, &input, &opts)
        .wrap_err_with(|| format!("{} could not chart {}", script.name(), input.display()))?;
    for path in written {
        println!("{}", path.display());
    }

    Ok(())
}
