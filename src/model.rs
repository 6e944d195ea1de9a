//! Data model for the genetic code table.
//!
//! This module contains the value types shared by the parser and the
//! derivation layer:
//! - `Codon`: a lowercase nucleotide triplet
//! - `CodonAlphabet`: the 64 codons in NCBI Base1/Base2/Base3 order
//! - `VariantRecord`: one genetic code as extracted from the table
//! - `VariantMap`: an ordered id → value map used for every derived product
//!
//! Everything here is immutable once constructed.

use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::formats::FormatError;
use crate::options::ConfigError;

/// Number of codons in a genetic code.
pub const ALPHABET_SIZE: usize = 64;

/// Amino-acid symbol marking a stop codon in `ncbieaa`.
pub const STOP_SYMBOL: char = '*';

/// Flag marking a start codon in `sncbieaa`.
pub const START_FLAG: char = 'M';

/// A nucleotide triplet over `{a, c, g, t}`, always stored lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codon([u8; 3]);

impl Codon {
    /// Builds a codon from three bases, case-insensitively.
    ///
    /// Returns `None` if any base is not one of A, C, G, T.
    pub fn from_bases(b1: char, b2: char, b3: char) -> Option<Self> {
        let mut bytes = [0u8; 3];
        for (slot, base) in bytes.iter_mut().zip([b1, b2, b3]) {
            *slot = match base.to_ascii_lowercase() {
                c @ ('a' | 'c' | 'g' | 't') => c as u8,
                _ => return None,
            };
        }
        Some(Self(bytes))
    }

    /// Returns the codon as a lowercase string slice.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).expect("codon bytes are always ASCII nucleotides")
    }
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Codon {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let codon = match (chars.next(), chars.next(), chars.next(), chars.next()) {
            (Some(b1), Some(b2), Some(b3), None) => Codon::from_bases(b1, b2, b3),
            _ => None,
        };
        codon.ok_or_else(|| ConfigError::InvalidCodon(s.to_string()))
    }
}

impl Serialize for Codon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The 64 codons, index-aligned with the `ncbieaa` and `sncbieaa` strings.
///
/// Order comes from the input base rows and is never sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodonAlphabet {
    codons: Vec<Codon>,
}

impl CodonAlphabet {
    /// Combines the three base rows of the table position by position.
    ///
    /// Each row must hold exactly 64 nucleotides. Position `i` of the
    /// alphabet is `base1[i] + base2[i] + base3[i]`, lowercased.
    pub fn build(base1: &str, base2: &str, base3: &str) -> Result<Self, FormatError> {
        let rows: Vec<Vec<char>> = [base1, base2, base3]
            .iter()
            .map(|row| row.chars().collect())
            .collect();

        for (index, row) in rows.iter().enumerate() {
            if row.len() != ALPHABET_SIZE {
                return Err(FormatError::BaseLength {
                    base: index + 1,
                    expected: ALPHABET_SIZE,
                    found: row.len(),
                });
            }
        }

        let mut codons = Vec::with_capacity(ALPHABET_SIZE);
        for position in 0..ALPHABET_SIZE {
            let (b1, b2, b3) = (rows[0][position], rows[1][position], rows[2][position]);
            let codon = Codon::from_bases(b1, b2, b3).ok_or_else(|| FormatError::InvalidBase {
                position,
                found: format!("{b1}{b2}{b3}"),
            })?;
            if codons.contains(&codon) {
                return Err(FormatError::DuplicateCodon(codon.to_string()));
            }
            codons.push(codon);
        }

        Ok(Self { codons })
    }

    /// Returns the number of codons (always 64).
    pub fn len(&self) -> usize {
        self.codons.len()
    }

    /// Returns true if the alphabet has no codons.
    pub fn is_empty(&self) -> bool {
        self.codons.is_empty()
    }

    /// Gets the codon at an alphabet position.
    pub fn get(&self, position: usize) -> Option<Codon> {
        self.codons.get(position).copied()
    }

    /// Returns the alphabet position of a codon.
    pub fn position(&self, codon: &Codon) -> Option<usize> {
        self.codons.iter().position(|c| c == codon)
    }

    /// Iterates codons in alphabet order.
    pub fn iter(&self) -> impl Iterator<Item = Codon> + '_ {
        self.codons.iter().copied()
    }

    /// Returns the codons at positions where `flags` holds `mark`.
    ///
    /// Flags beyond the 64th character are ignored; a short flag string
    /// only covers the leading positions.
    pub fn marked(&self, flags: &str, mark: char) -> Vec<Codon> {
        self.codons
            .iter()
            .zip(flags.chars())
            .filter(|(_, flag)| *flag == mark)
            .map(|(codon, _)| *codon)
            .collect()
    }
}

/// One genetic code as extracted from the NCBI table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct VariantRecord {
    /// NCBI genetic code id
    pub id: u32,
    /// Descriptive name, line breaks removed
    pub long_name: String,
    /// Short code such as `SGC0`, absent for most newer codes
    pub short_name: Option<String>,
    /// `ncbieaa`: one amino acid per alphabet position, `*` for stop
    pub amino_acids: String,
    /// `sncbieaa`: `M` marks a start codon
    pub start_flags: String,
}

impl VariantRecord {
    /// True if both positional strings cover exactly the 64 codons.
    pub fn is_well_formed(&self) -> bool {
        self.amino_acids.chars().count() == ALPHABET_SIZE
            && self.start_flags.chars().count() == ALPHABET_SIZE
    }
}

/// Ordered map from genetic code id to a derived value.
///
/// Keeps insertion order (parse order, or ascending ids when a range
/// was requested). Duplicate ids are kept positionally; `get` returns
/// the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantMap<T> {
    entries: Vec<(u32, T)>,
}

impl<T> VariantMap<T> {
    /// Gets the value for an id.
    pub fn get(&self, id: u32) -> Option<&T> {
        self.entries.iter().find(|(key, _)| *key == id).map(|(_, value)| value)
    }

    /// Returns true if the id is present.
    pub fn contains(&self, id: u32) -> bool {
        self.entries.iter().any(|(key, _)| *key == id)
    }

    /// Iterates ids in map order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    /// Iterates `(id, value)` pairs in map order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for VariantMap<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> FromIterator<(u32, T)> for VariantMap<T> {
    fn from_iter<I: IntoIterator<Item = (u32, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for VariantMap<T> {
    type Item = (u32, T);
    type IntoIter = std::vec::IntoIter<(u32, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T: Serialize> Serialize for VariantMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in &self.entries {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}
