//! Caller configuration for the derived products.
//!
//! One `QueryOptions` value drives every product so that a single range
//! and a single set of overrides can be applied consistently:
//!
//! ```
//! use gcparse::options::{QueryOptions, RangeEntry, RangeSpec};
//!
//! let options = QueryOptions::new()
//!     .with_range(RangeSpec::new([RangeEntry::from(1..=3u32), RangeEntry::from(5u32)]).unwrap())
//!     .rename(1, "Standard (Eukaryote)")
//!     .add_start(1, "gtg".parse().unwrap());
//! assert!(options.includes(2));
//! assert!(!options.includes(4));
//! ```

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::str::FromStr;

use thiserror::Error;

use crate::model::Codon;

/// Errors in caller-supplied configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid range interval {start}-{end}: start is greater than end")]
    InvertedInterval { start: u32, end: u32 },

    #[error("Invalid range entry '{0}' (expected an id like 5 or an interval like 1-3)")]
    InvalidRangeEntry(String),

    #[error("Invalid codon '{0}' (expected three of a, c, g, t)")]
    InvalidCodon(String),

    #[error("Invalid assignment '{given}' (expected {expected})")]
    InvalidAssignment { given: String, expected: &'static str },
}

/// One element of a range: a single id or an inclusive interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEntry {
    Id(u32),
    Span(u32, u32),
}

impl From<u32> for RangeEntry {
    fn from(id: u32) -> Self {
        RangeEntry::Id(id)
    }
}

impl From<RangeInclusive<u32>> for RangeEntry {
    fn from(range: RangeInclusive<u32>) -> Self {
        RangeEntry::Span(*range.start(), *range.end())
    }
}

impl FromStr for RangeEntry {
    type Err = ConfigError;

    /// Parses `5`, `1-3` or `1..3` (both bounds inclusive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ConfigError::InvalidRangeEntry(s.to_string());
        let parse_id = |text: &str| text.trim().parse::<u32>().map_err(|_| invalid());

        let bounds = s.split_once("..").or_else(|| s.split_once('-'));
        match bounds {
            Some((start, end)) => {
                let end = end.strip_prefix('=').unwrap_or(end);
                Ok(RangeEntry::Span(parse_id(start)?, parse_id(end)?))
            }
            None => Ok(RangeEntry::Id(parse_id(s)?)),
        }
    }
}

/// Normalized set of requested ids, stored as sorted disjoint intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSpec {
    spans: Vec<RangeInclusive<u32>>,
}

impl RangeSpec {
    /// Sorts the entries and merges overlapping or adjacent intervals.
    pub fn new<I>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<RangeEntry>,
    {
        let mut bounds = Vec::new();
        for entry in entries {
            match entry.into() {
                RangeEntry::Id(id) => bounds.push((id, id)),
                RangeEntry::Span(start, end) if start > end => {
                    return Err(ConfigError::InvertedInterval { start, end });
                }
                RangeEntry::Span(start, end) => bounds.push((start, end)),
            }
        }
        bounds.sort_unstable();

        let mut spans: Vec<RangeInclusive<u32>> = Vec::with_capacity(bounds.len());
        for (start, end) in bounds {
            match spans.last_mut() {
                Some(last) if start <= last.end().saturating_add(1) => {
                    if end > *last.end() {
                        *last = *last.start()..=end;
                    }
                }
                _ => spans.push(start..=end),
            }
        }
        Ok(Self { spans })
    }

    pub fn contains(&self, id: u32) -> bool {
        let idx = self.spans.partition_point(|span| *span.end() < id);
        self.spans.get(idx).is_some_and(|span| span.contains(&id))
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.spans.iter().flat_map(|span| span.clone())
    }

    /// Merged intervals in ascending order.
    pub fn spans(&self) -> &[RangeInclusive<u32>] {
        &self.spans
    }
}

impl FromStr for RangeSpec {
    type Err = ConfigError;

    /// Parses a comma-separated list such as `1-3,5,21-23`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entries = s
            .split(',')
            .map(RangeEntry::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        RangeSpec::new(entries)
    }
}

/// Codons to add to and remove from a derived start or stop set.
///
/// Additions are applied first, then removals, so a codon listed in both
/// ends up removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSpec {
    pub add: Vec<Codon>,
    pub remove: Vec<Codon>,
}

impl OverrideSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, codon: Codon) -> Self {
        self.add.push(codon);
        self
    }

    pub fn remove(mut self, codon: Codon) -> Self {
        self.remove.push(codon);
        self
    }

    /// Applies the override to a positional codon set.
    ///
    /// Added codons not already present are appended in the order given.
    pub fn apply(&self, mut codons: Vec<Codon>) -> Vec<Codon> {
        for codon in &self.add {
            if !codons.contains(codon) {
                codons.push(*codon);
            }
        }
        codons.retain(|codon| !self.remove.contains(codon));
        codons
    }
}

/// Configuration shared by all derived products.
///
/// - `range`: restricts and sorts the ids; `None` keeps all ids in parse order
/// - `names`: replacement long names (definitions only)
/// - `starts` / `stops`: per-id overrides for the start and stop sets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub range: Option<RangeSpec>,
    pub names: HashMap<u32, String>,
    pub starts: HashMap<u32, OverrideSpec>,
    pub stops: HashMap<u32, OverrideSpec>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, range: RangeSpec) -> Self {
        self.range = Some(range);
        self
    }

    pub fn rename(mut self, id: u32, name: impl Into<String>) -> Self {
        self.names.insert(id, name.into());
        self
    }

    pub fn add_start(mut self, id: u32, codon: Codon) -> Self {
        self.starts.entry(id).or_default().add.push(codon);
        self
    }

    pub fn remove_start(mut self, id: u32, codon: Codon) -> Self {
        self.starts.entry(id).or_default().remove.push(codon);
        self
    }

    pub fn add_stop(mut self, id: u32, codon: Codon) -> Self {
        self.stops.entry(id).or_default().add.push(codon);
        self
    }

    pub fn remove_stop(mut self, id: u32, codon: Codon) -> Self {
        self.stops.entry(id).or_default().remove.push(codon);
        self
    }

    /// True if no range is set or the range contains `id`.
    pub fn includes(&self, id: u32) -> bool {
        self.range.as_ref().map_or(true, |range| range.contains(id))
    }
}

/// Parses an `ID=NAME` assignment (command-line `--name`).
pub fn parse_name_assignment(s: &str) -> Result<(u32, String), ConfigError> {
    let invalid = || ConfigError::InvalidAssignment {
        given: s.to_string(),
        expected: "ID=NAME",
    };
    let (id, name) = s.split_once('=').ok_or_else(invalid)?;
    let id = id.trim().parse::<u32>().map_err(|_| invalid())?;
    Ok((id, name.to_string()))
}

/// Parses an `ID:CODON` assignment (command-line codon overrides).
pub fn parse_codon_assignment(s: &str) -> Result<(u32, Codon), ConfigError> {
    let (id, codon) = s.split_once(':').ok_or_else(|| ConfigError::InvalidAssignment {
        given: s.to_string(),
        expected: "ID:CODON",
    })?;
    let id = id.trim().parse::<u32>().map_err(|_| ConfigError::InvalidAssignment {
        given: s.to_string(),
        expected: "ID:CODON",
    })?;
    Ok((id, codon.parse::<Codon>()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codon(s: &str) -> Codon {
        s.parse().unwrap()
    }

    fn codons(list: &[&str]) -> Vec<Codon> {
        list.iter().map(|s| codon(s)).collect()
    }

    #[test]
    fn test_range_is_sorted_and_deduplicated() {
        let range = RangeSpec::new([
            RangeEntry::from(1..=3u32),
            RangeEntry::from(5u32),
            RangeEntry::from(5..=9u32),
        ])
        .unwrap();
        assert_eq!(range.ids().collect::<Vec<_>>(), vec![1, 2, 3, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_full_width_interval_is_not_expanded() {
        let range: RangeSpec = "1-4294967295".parse().unwrap();

        assert!(range.contains(23));
        assert!(range.contains(u32::MAX));
        assert!(!range.contains(0));
        assert_eq!(range.spans(), &[1..=u32::MAX]);
        assert_eq!(range.ids().take(3).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_adjacent_and_overlapping_intervals_merge() {
        let range: RangeSpec = "21-23,1-3,4,2-2,30".parse().unwrap();

        assert_eq!(range.spans(), &[1..=4, 21..=23, 30..=30]);
        assert!(range.contains(22));
        assert!(!range.contains(5));
        assert!(!range.contains(31));
    }

    #[test]
    fn test_inverted_interval() {
        let result = RangeSpec::new([RangeEntry::Span(5, 3)]);
        assert_eq!(result, Err(ConfigError::InvertedInterval { start: 5, end: 3 }));
    }

    #[test]
    fn test_range_from_str() {
        let range: RangeSpec = "1-3, 3,6,21..23".parse().unwrap();
        assert_eq!(
            range.ids().collect::<Vec<_>>(),
            vec![1, 2, 3, 6, 21, 22, 23]
        );

        let range: RangeSpec = "2..=4".parse().unwrap();
        assert_eq!(range.ids().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_range_from_str_errors() {
        assert!(matches!(
            "1-x".parse::<RangeSpec>(),
            Err(ConfigError::InvalidRangeEntry(_))
        ));
        assert!(matches!(
            "".parse::<RangeSpec>(),
            Err(ConfigError::InvalidRangeEntry(_))
        ));
        assert_eq!(
            "9-2".parse::<RangeSpec>(),
            Err(ConfigError::InvertedInterval { start: 9, end: 2 })
        );
    }

    #[test]
    fn test_override_add_then_remove() {
        let base = codons(&["ttg", "ctg", "atg"]);

        let spec = OverrideSpec::new().add(codon("gtg"));
        assert_eq!(spec.apply(base.clone()), codons(&["ttg", "ctg", "atg", "gtg"]));

        let spec = OverrideSpec::new().add(codon("gtg")).remove(codon("ttg"));
        assert_eq!(spec.apply(base.clone()), codons(&["ctg", "atg", "gtg"]));

        // Present codons are not duplicated
        let spec = OverrideSpec::new().add(codon("atg")).add(codon("gtg")).add(codon("gtg"));
        assert_eq!(spec.apply(base.clone()), codons(&["ttg", "ctg", "atg", "gtg"]));
    }

    #[test]
    fn test_override_remove_wins() {
        let spec = OverrideSpec::new().add(codon("gtg")).remove(codon("gtg"));
        assert_eq!(spec.apply(codons(&["atg"])), codons(&["atg"]));

        let spec = OverrideSpec::new().add(codon("atg")).remove(codon("atg"));
        assert_eq!(spec.apply(codons(&["atg"])), Vec::new());
    }

    #[test]
    fn test_query_options_builders() {
        let options = QueryOptions::new()
            .rename(1, "hello")
            .add_start(1, codon("gtg"))
            .remove_start(1, codon("ttg"))
            .add_stop(13, codon("gcc"));

        assert_eq!(options.names[&1], "hello");
        assert_eq!(options.starts[&1].add, codons(&["gtg"]));
        assert_eq!(options.starts[&1].remove, codons(&["ttg"]));
        assert_eq!(options.stops[&13].add, codons(&["gcc"]));
        assert!(options.includes(42));

        let options = options.with_range("1,13".parse().unwrap());
        assert!(options.includes(13));
        assert!(!options.includes(42));
    }

    #[test]
    fn test_parse_assignments() {
        assert_eq!(parse_name_assignment("3=world").unwrap(), (3, "world".to_string()));
        assert_eq!(
            parse_name_assignment("1=a=b").unwrap(),
            (1, "a=b".to_string())
        );
        assert!(matches!(
            parse_name_assignment("hello"),
            Err(ConfigError::InvalidAssignment { expected: "ID=NAME", .. })
        ));

        assert_eq!(parse_codon_assignment("13:TTG").unwrap(), (13, codon("ttg")));
        assert!(matches!(
            parse_codon_assignment("13:zzz"),
            Err(ConfigError::InvalidCodon(_))
        ));
        assert!(matches!(
            parse_codon_assignment("x:ttg"),
            Err(ConfigError::InvalidAssignment { .. })
        ));
    }
}
