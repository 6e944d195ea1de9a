//! Derived products of a parsed genetic code table.
//!
//! Each product maps a genetic code id to a value:
//! - definitions: id → long name
//! - starts: id → start codons (`M` in `sncbieaa`)
//! - stops: id → stop codons (`*` in `ncbieaa`)
//! - tables: id → codon → amino acid
//!
//! All functions are pure and share the same range handling: without a
//! range every record appears in parse order; with one, only the
//! requested ids appear, in ascending order.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::model::{Codon, CodonAlphabet, VariantMap, VariantRecord, START_FLAG, STOP_SYMBOL};
use crate::options::{OverrideSpec, QueryOptions};

/// Codon → amino acid mapping for one genetic code, in alphabet order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTable {
    entries: Vec<(Codon, char)>,
}

impl TranslationTable {
    /// Pairs each alphabet codon with the amino acid at the same position.
    ///
    /// A short `amino_acids` string yields a table with fewer than 64 entries.
    pub fn new(alphabet: &CodonAlphabet, amino_acids: &str) -> Self {
        Self {
            entries: alphabet.iter().zip(amino_acids.chars()).collect(),
        }
    }

    /// Looks up the amino acid for a codon.
    pub fn get(&self, codon: &Codon) -> Option<char> {
        self.entries
            .iter()
            .find(|(c, _)| c == codon)
            .map(|(_, aa)| *aa)
    }

    /// Looks up a codon given as text (case-insensitive).
    pub fn translate(&self, codon: &str) -> Option<char> {
        let codon: Codon = codon.parse().ok()?;
        self.get(&codon)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Codon, char)> + '_ {
        self.entries.iter().copied()
    }
}

impl Serialize for TranslationTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (codon, aa) in &self.entries {
            map.serialize_entry(codon, aa)?;
        }
        map.end()
    }
}

/// All four products computed with one configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Bundle {
    pub definitions: VariantMap<String>,
    pub starts: VariantMap<Vec<Codon>>,
    pub stops: VariantMap<Vec<Codon>>,
    pub tables: VariantMap<TranslationTable>,
}

/// Records selected by the range, in output order.
fn select<'r>(records: &'r [VariantRecord], options: &QueryOptions) -> Vec<&'r VariantRecord> {
    let mut selected: Vec<&VariantRecord> = records
        .iter()
        .filter(|record| options.includes(record.id))
        .collect();
    if options.range.is_some() {
        // stable: records sharing an id keep their parse order
        selected.sort_by_key(|record| record.id);
    }
    selected
}

/// id → long name, replaced by `options.names` where given.
pub fn definitions(records: &[VariantRecord], options: &QueryOptions) -> VariantMap<String> {
    select(records, options)
        .into_iter()
        .map(|record| {
            let name = options
                .names
                .get(&record.id)
                .unwrap_or(&record.long_name)
                .clone();
            (record.id, name)
        })
        .collect()
}

/// id → start codons, with `options.starts` overrides applied.
pub fn starts(
    records: &[VariantRecord],
    alphabet: &CodonAlphabet,
    options: &QueryOptions,
) -> VariantMap<Vec<Codon>> {
    select(records, options)
        .into_iter()
        .map(|record| {
            let codons = alphabet.marked(&record.start_flags, START_FLAG);
            (record.id, with_override(codons, options.starts.get(&record.id)))
        })
        .collect()
}

/// id → stop codons, with `options.stops` overrides applied.
pub fn stops(
    records: &[VariantRecord],
    alphabet: &CodonAlphabet,
    options: &QueryOptions,
) -> VariantMap<Vec<Codon>> {
    select(records, options)
        .into_iter()
        .map(|record| {
            let codons = alphabet.marked(&record.amino_acids, STOP_SYMBOL);
            (record.id, with_override(codons, options.stops.get(&record.id)))
        })
        .collect()
}

/// id → translation table. Only the range applies.
pub fn tables(
    records: &[VariantRecord],
    alphabet: &CodonAlphabet,
    options: &QueryOptions,
) -> VariantMap<TranslationTable> {
    select(records, options)
        .into_iter()
        .map(|record| (record.id, TranslationTable::new(alphabet, &record.amino_acids)))
        .collect()
}

/// Every product under the same configuration.
pub fn bundle(
    records: &[VariantRecord],
    alphabet: &CodonAlphabet,
    options: &QueryOptions,
) -> Bundle {
    Bundle {
        definitions: definitions(records, options),
        starts: starts(records, alphabet, options),
        stops: stops(records, alphabet, options),
        tables: tables(records, alphabet, options),
    }
}

fn with_override(codons: Vec<Codon>, spec: Option<&OverrideSpec>) -> Vec<Codon> {
    match spec {
        Some(spec) => spec.apply(codons),
        None => codons,
    }
}
