//! NCBI genetic code table (`gc.prt`) parser.
//!
//! ## Record grammar
//!
//! ```text
//! record     := long-name short-name? id ncbieaa sncbieaa
//! long-name  := "name" STRING ","?
//! short-name := "name" STRING ","?
//! id         := "id" INT ","?
//! ncbieaa    := "ncbieaa" STRING ","?
//! sncbieaa   := "sncbieaa" STRING
//! ```
//!
//! Records are searched for across the whole token stream, so anything
//! between them (the `Genetic-code-table ::=` header, braces, unknown
//! fields) is skipped. A position where the rule does not match is
//! skipped one token at a time.
//!
//! ## Relaxed Parsing
//!
//! - Line breaks inside the long name are removed (the file wraps long
//!   names for display width)
//! - The short name is the first `[A-Z]{3}[0-9]` run in the second name
//! - `ncbieaa`/`sncbieaa` of the wrong length are kept as-is and logged
//! - An unclosed quote ends the table; records before it are kept

use tracing::{debug, warn};

use super::lexer::{tokenize, Token, TokenKind};
use super::FormatError;
use crate::model::{CodonAlphabet, VariantRecord};

/// Checks the first line for the `--****` banner of the NCBI table.
pub fn check_banner(text: &str) -> Result<(), FormatError> {
    let first_line = text
        .trim_start_matches('\u{feff}')
        .lines()
        .next()
        .unwrap_or_default();

    if first_line.contains("--*") {
        Ok(())
    } else {
        Err(FormatError::NotGeneticCodeTable)
    }
}

/// Extracts every genetic code record, in source order.
///
/// A table with a valid banner but no records yields an empty vector.
pub fn parse_records(text: &str) -> Result<Vec<VariantRecord>, FormatError> {
    check_banner(text)?;
    let tokens = tokenize(text);

    let mut records = Vec::new();
    let mut cursor = 0;
    while cursor < tokens.len() {
        let mut parser = RecordParser::new(&tokens, cursor);
        match parser.record() {
            Some(record) => {
                if !record.is_well_formed() {
                    warn!(
                        id = record.id,
                        ncbieaa_len = record.amino_acids.chars().count(),
                        sncbieaa_len = record.start_flags.chars().count(),
                        line = tokens[cursor].line,
                        "genetic code record does not cover 64 codons"
                    );
                }
                records.push(record);
                cursor = parser.pos;
            }
            None => cursor += 1,
        }
    }

    if let Some(Token {
        kind: TokenKind::Unterminated,
        line,
    }) = tokens.last()
    {
        warn!(
            line,
            records = records.len(),
            "unterminated quoted string, rest of the table ignored"
        );
    }

    debug!(records = records.len(), tokens = tokens.len(), "parsed genetic code table");
    Ok(records)
}

/// Builds the codon alphabet from the first `-- Base1/2/3` comment block.
pub fn parse_alphabet(text: &str) -> Result<CodonAlphabet, FormatError> {
    let [base1, base2, base3] = find_bases(text)?;
    CodonAlphabet::build(base1, base2, base3)
}

/// Finds three consecutive `-- BaseN  <letters>` lines.
fn find_bases(text: &str) -> Result<[&str; 3], FormatError> {
    let lines: Vec<&str> = text.lines().collect();

    for window in lines.windows(3) {
        let values: Vec<Option<&str>> = window
            .iter()
            .zip(["Base1", "Base2", "Base3"])
            .map(|(line, label)| base_value(line, label))
            .collect();

        if let [Some(b1), Some(b2), Some(b3)] = values[..] {
            return Ok([b1, b2, b3]);
        }
    }

    Err(FormatError::MissingBases)
}

/// Returns the letters of a `-- <label>  <letters>` line.
fn base_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("--"), Some(found), Some(value)) if found == label => Some(value),
        _ => None,
    }
}

/// Recursive-descent matcher for a single record starting at `pos`.
///
/// Every rule returns `None` without side effects on the caller's cursor
/// when it does not match; the caller owns backtracking.
struct RecordParser<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
}

impl<'t, 'a> RecordParser<'t, 'a> {
    fn new(tokens: &'t [Token<'a>], pos: usize) -> Self {
        Self { tokens, pos }
    }

    fn record(&mut self) -> Option<VariantRecord> {
        let long_name = self.long_name()?;
        let short_name = self.short_name();
        let id = self.id()?;
        let amino_acids = self.string_field("ncbieaa")?;
        self.separator();
        let start_flags = self.string_field("sncbieaa")?;

        Some(VariantRecord {
            id,
            long_name,
            short_name,
            amino_acids,
            start_flags,
        })
    }

    fn long_name(&mut self) -> Option<String> {
        let raw = self.string_field("name")?;
        self.separator();
        Some(raw.chars().filter(|c| *c != '\n' && *c != '\r').collect())
    }

    /// Optional second `name` field. Absent field and a value without a
    /// short code both give `None`.
    fn short_name(&mut self) -> Option<String> {
        let start = self.pos;
        match self.string_field("name") {
            Some(raw) => {
                self.separator();
                short_code(&raw)
            }
            None => {
                self.pos = start;
                None
            }
        }
    }

    fn id(&mut self) -> Option<u32> {
        self.keyword("id")?;
        let value = match self.next()? {
            TokenKind::Int(digits) => digits.parse().ok()?,
            _ => return None,
        };
        self.separator();
        Some(value)
    }

    /// `keyword STRING`
    fn string_field(&mut self, keyword: &str) -> Option<String> {
        self.keyword(keyword)?;
        match self.next()? {
            TokenKind::Str(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn keyword(&mut self, keyword: &str) -> Option<()> {
        match self.next()? {
            TokenKind::Ident(word) if *word == keyword => Some(()),
            _ => None,
        }
    }

    /// Skips an optional `,`.
    fn separator(&mut self) {
        if let Some(Token {
            kind: TokenKind::Punct(','),
            ..
        }) = self.tokens.get(self.pos)
        {
            self.pos += 1;
        }
    }

    fn next(&mut self) -> Option<&'t TokenKind<'a>> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(&token.kind)
    }
}

/// Finds the first run of three uppercase letters followed by a digit.
fn short_code(value: &str) -> Option<String> {
    let chars: Vec<char> = value.chars().collect();
    chars
        .windows(4)
        .find(|w| {
            w[..3].iter().all(char::is_ascii_uppercase) && w[3].is_ascii_digit()
        })
        .map(|w| w.iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GC_PRT: &str = include_str!("../../test_data/gc.prt");

    const BANNER: &str = "--**************************************************************************\n";

    fn record_text(body: &str) -> String {
        format!("{BANNER}Genetic-code-table ::= {{\n {{\n{body}\n }}\n}}\n")
    }

    #[test]
    fn test_parse_reference_table() {
        let records = parse_records(GC_PRT).unwrap();

        assert_eq!(records.len(), 17);
        let ids: Vec<u32> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 9, 10, 11, 12, 13, 14, 15, 16, 21, 22, 23]);

        assert_eq!(
            records[0],
            VariantRecord {
                id: 1,
                long_name: "Standard".to_string(),
                short_name: Some("SGC0".to_string()),
                amino_acids: "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"
                    .to_string(),
                start_flags: "---M---------------M---------------M----------------------------"
                    .to_string(),
            }
        );
    }

    #[test]
    fn test_wrapped_long_name_is_joined() {
        let records = parse_records(GC_PRT).unwrap();

        assert_eq!(
            records[3].long_name,
            "Mold Mitochondrial; Protozoan Mitochondrial; Coelenterate Mitochondrial; Mycoplasma; Spiroplasma"
        );
        assert_eq!(records[3].short_name.as_deref(), Some("SGC3"));
    }

    #[test]
    fn test_missing_short_name_is_none() {
        let records = parse_records(GC_PRT).unwrap();

        assert_eq!(records[16].long_name, "Thraustochytrium Mitochondrial");
        assert_eq!(records[16].short_name, None);
        assert!(records.iter().all(VariantRecord::is_well_formed));
    }

    #[test]
    fn test_missing_banner() {
        let text = "Genetic-code-table ::= {\n {\n  name \"Standard\" ,\n  id 1 ,\n }\n}\n";
        assert!(matches!(parse_records(text), Err(FormatError::NotGeneticCodeTable)));
        assert!(matches!(
            parse_records("just some text"),
            Err(FormatError::NotGeneticCodeTable)
        ));
        assert!(matches!(parse_records(""), Err(FormatError::NotGeneticCodeTable)));
    }

    #[test]
    fn test_banner_without_records_is_empty() {
        let text = format!("{BANNER}--  nothing here\nGenetic-code-table ::= {{ }}\n");
        assert_eq!(parse_records(&text).unwrap(), Vec::new());
    }

    #[test]
    fn test_second_name_without_code() {
        let text = record_text(
            "  name \"Test\" ,\n  name \"no code\" ,\n  id 7 ,\n  ncbieaa  \"FF\",\n  sncbieaa \"-M\"",
        );
        let records = parse_records(&text).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].short_name, None);
        assert_eq!(records[0].id, 7);
    }

    #[test]
    fn test_short_lines_are_kept_as_is() {
        let text = record_text(
            "  name \"Short\" ,\n  id 99 ,\n  ncbieaa  \"FFL\",\n  sncbieaa \"--M\"",
        );
        let records = parse_records(&text).unwrap();

        assert_eq!(records[0].amino_acids, "FFL");
        assert_eq!(records[0].start_flags, "--M");
        assert!(!records[0].is_well_formed());
    }

    #[test]
    fn test_broken_record_is_skipped() {
        // First record lacks `id`; the second one is still found
        let text = record_text(
            "  name \"Broken\" ,\n  ncbieaa  \"FF\",\n  sncbieaa \"--\"\n },\n {\n  name \"Good\" ,\n  id 2 ,\n  ncbieaa  \"FF\",\n  sncbieaa \"-M\"",
        );
        let records = parse_records(&text).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].long_name, "Good");
        assert_eq!(records[0].id, 2);
    }

    #[test]
    fn test_duplicate_ids_are_kept_in_order() {
        let body = "  name \"A\" ,\n  id 5 ,\n  ncbieaa  \"F\",\n  sncbieaa \"-\"\n },\n {\n  name \"B\" ,\n  id 5 ,\n  ncbieaa  \"L\",\n  sncbieaa \"M\"";
        let records = parse_records(&record_text(body)).unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.long_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_unterminated_string_drops_only_the_rest() {
        let text = record_text("  name \"Standard ,\n  id 1 ,");
        assert!(parse_records(&text).unwrap().is_empty());
    }

    #[test]
    fn test_stray_quote_keeps_earlier_records() {
        let text = format!("{GC_PRT}\n\"\n");
        let records = parse_records(&text).unwrap();

        assert_eq!(records.len(), 17);
        assert_eq!(records[16].id, 23);
    }

    #[test]
    fn test_parse_alphabet_from_reference_table() {
        let alphabet = parse_alphabet(GC_PRT).unwrap();

        assert_eq!(alphabet.len(), 64);
        assert_eq!(alphabet.get(0).unwrap().as_str(), "ttt");
        assert_eq!(alphabet.get(48).unwrap().as_str(), "gtt");
    }

    #[test]
    fn test_parse_alphabet_missing_bases() {
        let text = format!("{BANNER}  -- Base1  TTTT\n  -- Base3  TCAG\n");
        assert!(matches!(parse_alphabet(&text), Err(FormatError::MissingBases)));
    }

    #[test]
    fn test_short_code() {
        assert_eq!(short_code("SGC0").as_deref(), Some("SGC0"));
        assert_eq!(short_code("code SGC12").as_deref(), Some("SGC1"));
        assert_eq!(short_code("SG0"), None);
        assert_eq!(short_code("sgc0"), None);
    }
}
