//! gcparse - NCBI genetic code table extractor
//!
//! Reads a local copy of the NCBI genetic code table and prints one of the
//! derived products as JSON.
//!
//! ## Usage
//!
//! ```bash
//! gcparse gc.prt                                   # everything
//! gcparse gc.prt -p starts --add-start 1:gtg       # start codons, GTG added to code 1
//! gcparse gc.prt -p definitions -r 1-3,5 --name 1=Standard
//! ```
//!
//! The table itself is published at `ftp://ftp.ncbi.nih.gov/entrez/misc/data/gc.prt`.

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use gcparse::model::Codon;
use gcparse::options::{parse_codon_assignment, parse_name_assignment, QueryOptions, RangeSpec};
use gcparse::GeneticCodes;

/// Product to print
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProductArg {
    /// id → name
    Definitions,
    /// id → start codons
    Starts,
    /// id → stop codons
    Stops,
    /// id → codon → amino acid
    Tables,
    /// All of the above
    Bundle,
}

/// gcparse - Extract definitions, start/stop codons and codon tables
/// from the NCBI genetic code table (gc.prt)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Genetic code table file (gc.prt)
    file: PathBuf,

    /// Product to print
    #[arg(short = 'p', long = "product", value_enum, default_value = "bundle")]
    product: ProductArg,

    /// Genetic code ids to keep, e.g. "1-3,5,21-23"
    #[arg(short = 'r', long = "range")]
    range: Option<RangeSpec>,

    /// Replacement name, as ID=NAME (repeatable)
    #[arg(long = "name", value_parser = parse_name_assignment)]
    names: Vec<(u32, String)>,

    /// Extra start codon, as ID:CODON (repeatable)
    #[arg(long = "add-start", value_parser = parse_codon_assignment)]
    add_starts: Vec<(u32, Codon)>,

    /// Start codon to drop, as ID:CODON (repeatable)
    #[arg(long = "remove-start", value_parser = parse_codon_assignment)]
    remove_starts: Vec<(u32, Codon)>,

    /// Extra stop codon, as ID:CODON (repeatable)
    #[arg(long = "add-stop", value_parser = parse_codon_assignment)]
    add_stops: Vec<(u32, Codon)>,

    /// Stop codon to drop, as ID:CODON (repeatable)
    #[arg(long = "remove-stop", value_parser = parse_codon_assignment)]
    remove_stops: Vec<(u32, Codon)>,

    /// Log progress to stderr (-v: debug, -vv: trace). GCPARSE_LOG overrides.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Collects the command-line overrides into one query configuration.
    fn query_options(&self) -> QueryOptions {
        let mut options = QueryOptions::new();
        if let Some(range) = &self.range {
            options = options.with_range(range.clone());
        }
        for (id, name) in &self.names {
            options = options.rename(*id, name.clone());
        }
        for &(id, codon) in &self.add_starts {
            options = options.add_start(id, codon);
        }
        for &(id, codon) in &self.remove_starts {
            options = options.remove_start(id, codon);
        }
        for &(id, codon) in &self.add_stops {
            options = options.add_stop(id, codon);
        }
        for &(id, codon) in &self.remove_stops {
            options = options.remove_stop(id, codon);
        }
        options
    }
}

/// Rejects renames and codon overrides naming an id the table lacks.
fn check_known_ids(options: &QueryOptions, codes: &GeneticCodes) -> Result<()> {
    let unknown: BTreeSet<u32> = options
        .names
        .keys()
        .chain(options.starts.keys())
        .chain(options.stops.keys())
        .copied()
        .filter(|id| codes.record(*id).is_none())
        .collect();

    if !unknown.is_empty() {
        let ids: Vec<String> = unknown.iter().map(u32::to_string).collect();
        bail!("Unknown genetic code id(s) in overrides: {}", ids.join(", "));
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("GCPARSE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let codes = GeneticCodes::from_path(&args.file)
        .with_context(|| format!("Cannot load genetic codes from {}", args.file.display()))?;

    if codes.records().is_empty() {
        warn!(path = %args.file.display(), "no genetic code records found");
    }

    let options = args.query_options();
    check_known_ids(&options, &codes)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match args.product {
        ProductArg::Definitions => {
            serde_json::to_writer_pretty(&mut handle, &codes.definitions(&options))?
        }
        ProductArg::Starts => serde_json::to_writer_pretty(&mut handle, &codes.starts(&options))?,
        ProductArg::Stops => serde_json::to_writer_pretty(&mut handle, &codes.stops(&options))?,
        ProductArg::Tables => serde_json::to_writer_pretty(&mut handle, &codes.tables(&options))?,
        ProductArg::Bundle => serde_json::to_writer_pretty(&mut handle, &codes.bundle(&options))?,
    }
    writeln!(handle)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes() -> GeneticCodes {
        include_str!("../test_data/gc.prt").parse().unwrap()
    }

    fn args(extra: &[&str]) -> Args {
        let argv = ["gcparse", "gc.prt"].iter().chain(extra).copied();
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_known_ids_pass() {
        let args = args(&[
            "--name",
            "1=Standard",
            "--add-start",
            "11:gtg",
            "--remove-stop",
            "2:aga",
        ]);
        assert!(check_known_ids(&args.query_options(), &codes()).is_ok());
    }

    #[test]
    fn test_unknown_ids_are_rejected() {
        let args = args(&["--name", "7=Gone", "--add-stop", "99:tga", "--add-start", "1:gtg"]);
        let err = check_known_ids(&args.query_options(), &codes()).unwrap_err();
        assert_eq!(err.to_string(), "Unknown genetic code id(s) in overrides: 7, 99");
    }

    #[test]
    fn test_range_alone_needs_no_known_ids() {
        let args = args(&["-r", "1-4294967295"]);
        assert!(check_known_ids(&args.query_options(), &codes()).is_ok());
    }
}
