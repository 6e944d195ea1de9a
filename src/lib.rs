//! # gcparse - NCBI genetic code table parser
//!
//! Reads the NCBI genetic code table (`gc.prt`) and derives, per genetic
//! code id: names, start codons, stop codons and codon → amino acid tables.
//!
//! ## Architecture
//!
//! The table text goes through two independent passes whose results are
//! combined by the derivation layer:
//! - `formats`: tokenizer, record parser and `-- BaseN` alphabet extraction
//! - `model`: codons, codon alphabet, parsed records, ordered id maps
//! - `options`: range selection, renames and start/stop overrides
//! - `derive`: the four products, computed as pure functions
//! - `genetic_code`: `GeneticCodes`, owning one parsed table
//!
//! ## Example
//!
//! ```no_run
//! use gcparse::{GeneticCodes, QueryOptions};
//!
//! let codes = GeneticCodes::from_path("gc.prt")?;
//! let options = QueryOptions::new().with_range("1-3,5".parse()?);
//! for (id, name) in codes.definitions(&options).iter() {
//!     println!("{id}\t{name}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod derive;
pub mod error;
pub mod formats;
pub mod genetic_code;
pub mod model;
pub mod options;

pub use derive::{Bundle, TranslationTable};
pub use error::{Error, Result};
pub use formats::{FormatError, SourceError, NCBI_GC_PRT_URL};
pub use genetic_code::GeneticCodes;
pub use model::{Codon, CodonAlphabet, VariantMap, VariantRecord};
pub use options::{ConfigError, OverrideSpec, QueryOptions, RangeEntry, RangeSpec};
