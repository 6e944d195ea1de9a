//! Reading and parsing the NCBI genetic code table.
//!
//! The table (`gc.prt`) is read whole into memory and then processed in
//! two independent passes over the same text:
//! - `gc_prt::parse_records`: the per-code records (names, id, `ncbieaa`, `sncbieaa`)
//! - `gc_prt::parse_alphabet`: the codon order from the `-- Base1/2/3` comments
//!
//! Fetching the file is left to the caller; `load_source` covers the
//! local-file case.

pub mod gc_prt;
pub mod lexer;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::model::{CodonAlphabet, VariantRecord};

/// Conventional location of the table. Callers fetch it themselves.
pub const NCBI_GC_PRT_URL: &str = "ftp://ftp.ncbi.nih.gov/entrez/misc/data/gc.prt";

/// Errors caused by the content of the table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Not a recognized genetic code table (first line must be the '--****' banner)")]
    NotGeneticCodeTable,

    #[error("No '-- Base1', '-- Base2', '-- Base3' lines found")]
    MissingBases,

    #[error("Base{base} has {found} letters, expected {expected}")]
    BaseLength {
        base: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid bases '{found}' at codon position {position}")]
    InvalidBase { position: usize, found: String },

    #[error("Codon '{0}' appears twice in the base lines")]
    DuplicateCodon(String),
}

/// Errors raised while reading the table from its location.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Genetic code table unavailable at {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Records and codon alphabet extracted from one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    pub records: Vec<VariantRecord>,
    pub alphabet: CodonAlphabet,
}

/// Parses table text into records and alphabet.
///
/// The banner is checked first, so unrelated text is reported as
/// `NotGeneticCodeTable` rather than as missing base lines.
pub fn parse_table_str(content: &str) -> Result<ParsedTable, FormatError> {
    let records = gc_prt::parse_records(content)?;
    let alphabet = gc_prt::parse_alphabet(content)?;
    Ok(ParsedTable { records, alphabet })
}

/// Reads a table file into memory.
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<String, SourceError> {
    let path = path.as_ref();
    let unavailable = |source: std::io::Error| SourceError::Unavailable {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(unavailable)?;
    let mut reader = BufReader::new(file);
    let mut content = String::new();
    reader.read_to_string(&mut content).map_err(unavailable)?;

    debug!(path = %path.display(), bytes = content.len(), "loaded genetic code table");
    Ok(content)
}
