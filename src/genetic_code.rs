//! Genetic code tables loaded from the NCBI `gc.prt` file.
//!
//! `GeneticCodes` owns the parsed records and codon alphabet of one table
//! and answers the product queries:
//! - `definitions`: id → name
//! - `starts` / `stops`: id → start / stop codons
//! - `tables`: id → codon → amino acid
//! - `bundle`: all of the above with one configuration
//!
//! ```no_run
//! use gcparse::genetic_code::GeneticCodes;
//! use gcparse::options::QueryOptions;
//!
//! let codes = GeneticCodes::from_path("gc.prt").unwrap();
//! let starts = codes.starts(&QueryOptions::new().add_start(1, "gtg".parse().unwrap()));
//! println!("{:?}", starts.get(1));
//! ```
//!
//! The value is immutable after construction and can be shared between
//! threads without locking.

use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::derive::{self, Bundle, TranslationTable};
use crate::error::Result;
use crate::formats::{self, FormatError, ParsedTable};
use crate::model::{Codon, CodonAlphabet, VariantMap, VariantRecord};
use crate::options::QueryOptions;

/// All genetic codes of one NCBI table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneticCodes {
    records: Vec<VariantRecord>,
    alphabet: CodonAlphabet,
}

impl GeneticCodes {
    /// Wraps already parsed records and alphabet.
    pub fn new(records: Vec<VariantRecord>, alphabet: CodonAlphabet) -> Self {
        Self { records, alphabet }
    }

    /// Parses the table text.
    pub fn from_table_str(content: &str) -> std::result::Result<Self, FormatError> {
        let ParsedTable { records, alphabet } = formats::parse_table_str(content)?;
        Ok(Self::new(records, alphabet))
    }

    /// Reads and parses a table file.
    ///
    /// I/O failures are reported as `Error::Source`, content problems as
    /// `Error::Format`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = formats::load_source(&path)?;
        let codes = Self::from_table_str(&content)?;
        debug!(
            path = %path.as_ref().display(),
            codes = codes.records.len(),
            "genetic codes ready"
        );
        Ok(codes)
    }

    /// Records in source order.
    pub fn records(&self) -> &[VariantRecord] {
        &self.records
    }

    /// Codon order shared by every record.
    pub fn alphabet(&self) -> &CodonAlphabet {
        &self.alphabet
    }

    /// Ids in source order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.records.iter().map(|record| record.id)
    }

    /// Gets the first record with this id.
    pub fn record(&self, id: u32) -> Option<&VariantRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn definitions(&self, options: &QueryOptions) -> VariantMap<String> {
        derive::definitions(&self.records, options)
    }

    pub fn starts(&self, options: &QueryOptions) -> VariantMap<Vec<Codon>> {
        derive::starts(&self.records, &self.alphabet, options)
    }

    pub fn stops(&self, options: &QueryOptions) -> VariantMap<Vec<Codon>> {
        derive::stops(&self.records, &self.alphabet, options)
    }

    pub fn tables(&self, options: &QueryOptions) -> VariantMap<TranslationTable> {
        derive::tables(&self.records, &self.alphabet, options)
    }

    pub fn bundle(&self, options: &QueryOptions) -> Bundle {
        derive::bundle(&self.records, &self.alphabet, options)
    }
}

impl FromStr for GeneticCodes {
    type Err = FormatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_table_str(s)
    }
}
