use unicode_distance_calculator::pipeline::{write_ipc_parallel, write_json_parallel, PARALLEL_BATCH_SIZE};
use unicode_distance_calculator::{compute_distance, pairs};

use clap::{Parser, Subcommand, ValueEnum};

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};

const OUTPUT_BUFFER_BYTES: usize = 128 * 1024;

#[derive(Parser, Debug)]
#[command(version, about = "Levenshtein distance over Unicode code points")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the distance between two strings
    Pair {
        left: OsString,
        right: OsString,
    },
    /// Compute the distance of every tab-separated pair in a file (.gz accepted)
    Batch {
        pairs: String,
        output: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Ipc)]
        format: OutputFormat,
        /// Worker threads, defaults to the number of CPUs
        #[arg(long)]
        threads: Option<usize>,
        /// Skip pairs where either side has more code points than this
        #[arg(long)]
        max_chars: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Ipc,
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env = env_logger::Env::new().filter_or("LEVX_LOG", "info").write_style("LEVX_LOG_STYLE");
    env_logger::init_from_env(env);

    let cli = Cli::parse();
    match cli.command {
        None => {
            let (s1, s2) = ("kitten", "sitting");
            println!("The distance between {} and {} is {}.", s1, s2, compute_distance(s1, s2));
        }
        Some(Command::Pair { left, right }) => {
            println!("{}", compute_distance(&left.to_string_lossy(), &right.to_string_lossy()));
        }
        Some(Command::Batch { pairs, output, format, threads, max_chars }) => {
            run_batch(&pairs, &output, format, threads, max_chars)?;
        }
    }
    Ok(())
}

fn run_batch(
    pairs_path: &str,
    output_path: &str,
    format: OutputFormat,
    threads: Option<usize>,
    max_chars: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Loading text pairs from: {}", pairs_path);
    let mut all_pairs = pairs::load_pairs(pairs_path)?;

    if let Some(limit) = max_chars {
        let dropped = pairs::retain_within(&mut all_pairs, limit);
        if dropped > 0 {
            log::warn!("Skipped {} pair(s) longer than {} code points.", dropped, limit);
        }
    }
    if all_pairs.is_empty() {
        log::warn!("No pairs to process in {}. Exiting.", pairs_path);
        return Ok(());
    }
    log::info!("Loaded {} pair(s).", all_pairs.len());

    let num_threads_for_pool = threads.unwrap_or_else(num_cpus::get).max(1);
    rayon::ThreadPoolBuilder::new().num_threads(num_threads_for_pool).build_global()?;
    log::info!("Using Rayon thread pool with {} threads for computation.", num_threads_for_pool);

    let file = File::create(output_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", output_path, e))?;
    let buf_writer = BufWriter::with_capacity(OUTPUT_BUFFER_BYTES, file);

    match format {
        OutputFormat::Ipc => {
            let mut out = write_ipc_parallel(&all_pairs, buf_writer, PARALLEL_BATCH_SIZE, num_threads_for_pool * 2)?;
            out.flush()?;
        }
        OutputFormat::Json => {
            write_json_parallel(&all_pairs, buf_writer)?;
        }
    }

    log::info!("Program finished. Output written to {}.", output_path);
    Ok(())
}
