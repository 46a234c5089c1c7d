use std::path::PathBuf;

use clap::{Parser, Subcommand};
use genomodel::{
    commands::{genomodel_check_genome, genomodel_records, genomodel_summary, ParseOptions},
    prelude::GenomeModelError,
    reporting::Report,
};
use tracing_subscriber::EnvFilter;

const INFO: &str = "\
genomodel: parse genomic interval files into an annotated genome model
usage: genomodel [--help] <subcommand>

Subcommands:

  summary: per-chromosome and whole-file interval statistics.
  records: the parsed records, grouped by chromosome and strand.
  check-genome: validate a genome file.

";

#[derive(Parser)]
#[clap(name = "genomodel")]
#[clap(about = INFO)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Summary {
        #[command(flatten)]
        options: ParseOptions,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    Records {
        #[command(flatten)]
        options: ParseOptions,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    CheckGenome {
        /// a TSV genome file of chromosome names and their lengths
        #[arg(required = true)]
        genome: PathBuf,
    },
}

fn init_logging(debug: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match debug {
        0 => EnvFilter::new("genomodel=warn"),
        1 => EnvFilter::new("genomodel=info"),
        _ => EnvFilter::new("genomodel=debug"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &Report) {
    for entry in report.entries() {
        eprintln!("{}", entry);
    }
}

fn run() -> Result<(), GenomeModelError> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    match &cli.command {
        Some(Commands::Summary { options, output }) => {
            let result = genomodel_summary(options, output.as_ref())?;
            print_report(&result.report);
        }
        Some(Commands::Records { options, output }) => {
            let result = genomodel_records(options, output.as_ref())?;
            print_report(&result.report);
        }
        Some(Commands::CheckGenome { genome }) => {
            let result = genomodel_check_genome(genome)?;
            let (sequences, total) = result.value;
            println!("{} sequences, {} bp total", sequences, total);
        }
        None => {
            println!("{}\n", INFO);
            std::process::exit(1);
        }
    }
    Ok(())
}

fn main() {
    match run() {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
