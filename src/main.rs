//! Synodict command-line front end
//!
//! Loads a dictionary file and answers stem, inflection and synonym queries.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use synodict::loader::load_from_path_with_stats;
use synodict::models::LoadParams;
use synodict::output::{print_report, print_summary, write_json};
use synodict::{DictError, Dictionary};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "synodict")]
#[command(about = "Synonym dictionary with fuzzy inflection lookup")]
#[command(version)]
struct Cli {
    /// Log filter directive (e.g. "debug", "synodict::tree=trace")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Skip rejected entries while loading instead of aborting
    #[arg(long, global = true)]
    lenient: bool,

    /// Suppress progress output
    #[arg(long, global = true)]
    quiet: bool,

    /// Line that opens the synonym section [default: $]
    #[arg(long, global = true)]
    section_marker: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dictionary statistics
    Stats {
        /// Path to the dictionary file
        #[arg(long)]
        dict: PathBuf,
    },

    /// Resolve the stem of an inflected word and show its entry
    Lookup {
        /// Path to the dictionary file
        #[arg(long)]
        dict: PathBuf,

        /// Inflected word to resolve
        #[arg(long)]
        word: String,

        /// Print the entry as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the synonyms of a stem
    Synonyms {
        /// Path to the dictionary file
        #[arg(long)]
        dict: PathBuf,

        /// Stem to query
        #[arg(long)]
        stem: String,

        /// Sense position (all senses when omitted)
        #[arg(long)]
        position: Option<usize>,
    },

    /// List the inflections of a stem
    Inflections {
        /// Path to the dictionary file
        #[arg(long)]
        dict: PathBuf,

        /// Stem to query
        #[arg(long)]
        stem: String,
    },

    /// Benchmark tree and lookup performance on a synthetic dictionary
    Benchmark {
        /// Number of stems
        #[arg(long, default_value = "10000")]
        stems: usize,

        /// Number of lookups
        #[arg(long, default_value = "100")]
        iterations: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    // Overlay user-specified values onto the defaults
    let defaults = LoadParams::default();
    let params = LoadParams {
        section_marker: cli.section_marker.clone().unwrap_or(defaults.section_marker),
        strict: !cli.lenient,
        show_progress: !cli.quiet,
    };

    match cli.command {
        Commands::Stats { dict } => {
            let dictionary = load(&dict, &params)?;
            print_summary(&dictionary.summary());
        }

        Commands::Lookup { dict, word, json } => {
            let dictionary = load(&dict, &params)?;
            let stem = dictionary.resolve_stem(&word)?;
            let report = dictionary.report(&stem)?;

            if json {
                write_json(&report, &mut std::io::stdout().lock())?;
            } else {
                print_report(&report);
            }
        }

        Commands::Synonyms {
            dict,
            stem,
            position,
        } => {
            let dictionary = load(&dict, &params)?;
            for p in sense_positions(&dictionary, &stem, position)? {
                let synonyms = dictionary.synonyms_of(&stem, p)?;
                println!("Sense {}: {}", p, synonyms.join(", "));
            }
        }

        Commands::Inflections { dict, stem } => {
            let dictionary = load(&dict, &params)?;
            for inflection in dictionary.inflections_of(&stem)? {
                println!("{}", inflection);
            }
        }

        Commands::Benchmark { stems, iterations } => {
            run_benchmark(stems, iterations)?;
        }
    }

    Ok(())
}

/// The requested sense, or every sense of `stem` when none is given.
fn sense_positions(
    dictionary: &Dictionary,
    stem: &str,
    position: Option<usize>,
) -> Result<Vec<usize>, DictError> {
    match position {
        Some(p) => Ok(vec![p]),
        None => Ok((0..dictionary.sense_count(stem)?).collect()),
    }
}

fn init_tracing(log_level: &str) {
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn load(path: &Path, params: &LoadParams) -> Result<Dictionary, Box<dyn std::error::Error>> {
    if params.show_progress {
        eprintln!("Loading {}...", path.display());
    }

    let (dictionary, stats) = load_from_path_with_stats(path, params)?;

    if params.show_progress {
        eprintln!(
            "  {} stems, {} synonym groups ({} lines, {} rejected)",
            dictionary.stem_count(),
            dictionary.group_count(),
            stats.lines,
            stats.rejected
        );
    }

    Ok(dictionary)
}

/// Run insertion and lookup benchmark to measure performance.
fn run_benchmark(stems: usize, iterations: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Dictionary Benchmark ===");
    println!("Stems: {}", stems);
    println!("Lookups: {}", iterations);

    let words: Vec<String> = (0..stems).map(|i| format!("stem{:07}", i)).collect();

    // Insertion
    println!("\nInsertion:");
    let start = Instant::now();
    let mut dictionary = Dictionary::new();
    for word in &words {
        dictionary.add_stem(word)?;
        dictionary.add_inflection(word, &format!("{}s", word))?;
    }
    let elapsed = start.elapsed();
    println!("  Total time: {:.3}s", elapsed.as_secs_f64());
    println!(
        "  Per stem: {:.3}us",
        elapsed.as_secs_f64() * 1e6 / stems.max(1) as f64
    );
    println!("  Tree height: {}", dictionary.tree().height());

    println!("\nSynonym linking:");
    let start = Instant::now();
    for pair in words.chunks(2).take(iterations) {
        if let [a, b] = pair {
            dictionary.add_synonym(a, b, None)?;
        }
    }
    let elapsed = start.elapsed();
    println!("  Total time: {:.3}s", elapsed.as_secs_f64());

    // Fuzzy resolution scores every stem
    println!("\nStem resolution:");
    let start = Instant::now();
    let mut resolved = 0usize;
    for word in words.iter().step_by((stems / iterations.max(1)).max(1)).take(iterations) {
        if dictionary.resolve_stem(&format!("{}s", word)).is_ok() {
            resolved += 1;
        }
    }
    let elapsed = start.elapsed();
    let per_lookup = elapsed.as_secs_f64() / iterations.max(1) as f64;
    println!("  Total time: {:.3}s", elapsed.as_secs_f64());
    println!("  Per lookup: {:.3}ms", per_lookup * 1000.0);
    println!("  Resolved: {}/{}", resolved, iterations);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sense_positions() {
        let mut dictionary = Dictionary::new();
        dictionary.add_stem("happy").unwrap();
        dictionary.add_synonym("happy", "glad", None).unwrap();
        dictionary.add_synonym("happy", "content", None).unwrap();

        assert_eq!(sense_positions(&dictionary, "happy", None).unwrap(), vec![0, 1]);
        assert_eq!(sense_positions(&dictionary, "happy", Some(1)).unwrap(), vec![1]);
        assert!(matches!(
            sense_positions(&dictionary, "sad", None),
            Err(DictError::StemNotFound(_))
        ));
    }

    #[test]
    fn test_largest_position_is_out_of_range() {
        let mut dictionary = Dictionary::new();
        dictionary.add_stem("happy").unwrap();

        let positions = sense_positions(&dictionary, "happy", Some(usize::MAX)).unwrap();
        assert_eq!(positions, vec![usize::MAX]);
        assert!(matches!(
            dictionary.synonyms_of("happy", usize::MAX),
            Err(DictError::SenseOutOfRange { .. })
        ));
    }
}
