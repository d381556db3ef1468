//! Command-line interface for reccat.
//!
//! Merges every text file under a source directory into one output file.

use clap::{ArgAction, Parser};
use reccat::{BinaryDetection, ExclusionRules, ReccatBuilder, ReccatError, ReccatOptions, reccat};
use std::path::PathBuf;
use std::process::exit;
use tracing_subscriber::EnvFilter;

/// reccat — recursive folder-to-text merger
#[derive(Parser)]
#[command(name = "reccat", version, about, long_about = None)]
struct Cli {
    /// Directory to walk
    source_dir: PathBuf,

    /// File to write the merged text to (created or truncated)
    output_file: PathBuf,

    /// Additional directory name to skip (can be repeated)
    #[arg(long = "exclude-dir", value_name = "NAME")]
    exclude_dirs: Vec<String>,

    /// Additional file name to skip (can be repeated)
    #[arg(long = "exclude-file", value_name = "NAME")]
    exclude_files: Vec<String>,

    /// Additional file extension to skip (can be repeated)
    #[arg(long = "exclude-ext", value_name = "EXT")]
    exclude_exts: Vec<String>,

    /// Start from empty exclusion rules instead of the defaults
    #[arg(long)]
    no_default_excludes: bool,

    /// Load exclusion rules from a JSON file
    #[arg(long, value_name = "FILE", conflicts_with = "no_default_excludes")]
    rules: Option<PathBuf>,

    /// Ignore patterns matched against paths relative to the source (can be repeated)
    #[arg(short = 'I', long = "ignore", value_name = "GLOB")]
    ignore_patterns: Vec<String>,

    /// Binary detection strategy
    #[arg(long, default_value = "heuristic", value_parser = parse_binary_detection)]
    binary_detection: BinaryDetection,

    /// Print the run summary as JSON instead of the confirmation line
    #[arg(long)]
    json: bool,

    /// Only report warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// More diagnostic output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Parse string into BinaryDetection enum.
fn parse_binary_detection(s: &str) -> Result<BinaryDetection, String> {
    match s {
        "heuristic" => Ok(BinaryDetection::Heuristic),
        "accurate" => Ok(BinaryDetection::Accurate),
        "none" => Ok(BinaryDetection::None),
        _ => Err(format!("invalid binary detection method: {}", s)),
    }
}

impl Cli {
    fn into_options(self) -> Result<(ReccatOptions, bool), ReccatError> {
        let rules = match (&self.rules, self.no_default_excludes) {
            (Some(path), _) => ExclusionRules::from_json_file(path)?,
            (None, true) => ExclusionRules::none(),
            (None, false) => ExclusionRules::default(),
        };

        let mut builder = ReccatBuilder::new(self.source_dir, self.output_file)
            .rules(rules)
            .ignore_patterns(self.ignore_patterns)
            .binary_detection(self.binary_detection)
            .record_entries(self.json);
        for name in self.exclude_dirs {
            builder = builder.exclude_dir(name);
        }
        for name in self.exclude_files {
            builder = builder.exclude_file(name);
        }
        for ext in self.exclude_exts {
            builder = builder.exclude_extension(ext);
        }

        Ok((builder.build(), self.json))
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_env("RECCAT_LOG").unwrap_or_else(|_| {
        if quiet {
            return EnvFilter::new("warn");
        }
        match verbose {
            0 => EnvFilter::new("reccat=info,warn"),
            1 => EnvFilter::new("reccat=debug,warn"),
            _ => EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let (options, json) = match cli.into_options() {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    let summary = match reccat(&options) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    if json {
        // The merge is already on disk; a summary that cannot be rendered is not a failed run.
        match serde_json::to_string_pretty(&summary) {
            Ok(out) => println!("{}", out),
            Err(e) => tracing::warn!("cannot render summary as JSON: {}", e),
        }
    } else {
        println!("✅ Merged text written to {}", options.output.display());
    }
}
