//! Tokenizer for the ASN.1 value notation used by `gc.prt`.
//!
//! The table is a nested ASN.1 value, e.g.:
//! ```text
//! Genetic-code-table ::= {
//!  {
//!   name "Standard" ,
//!   name "SGC0" ,
//!   id 1 ,
//!   ncbieaa  "FFLLSSSSYY**CC*W...",
//!   sncbieaa "---M-------------..."
//!   -- Base1  TTTTTTTTTTTTTTTTCC...
//!  },
//! ```
//!
//! Only the pieces the record parser needs are distinguished: identifiers,
//! quoted strings, integers and single-character punctuation. `--`
//! comments run to the end of the line and are dropped. Quoted strings
//! may span lines; `""` inside a string is an escaped quote. A quote that
//! is never closed ends the stream with an `Unterminated` token.

/// Kind of a lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind<'a> {
    /// Keyword or type name, e.g. `name`, `Genetic-code-table`
    Ident(&'a str),
    /// Content of a quoted string, newlines preserved
    Str(String),
    /// Run of ASCII digits
    Int(&'a str),
    /// Any other single character (`{`, `}`, `,`, `:` ...)
    Punct(char),
    /// Opening quote with no closing quote; always the last token
    Unterminated,
}

/// A token together with the line it starts on (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub line: usize,
}

/// Splits the table text into tokens.
///
/// Tokenizing stops at a quoted string that is never closed, so the
/// tokens before it are still usable.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut line = 1;

    while pos < bytes.len() {
        let b = bytes[pos];
        match b {
            b'\n' => {
                line += 1;
                pos += 1;
            }
            _ if b.is_ascii_whitespace() => pos += 1,
            b'-' if bytes.get(pos + 1) == Some(&b'-') => {
                // Comment: skip to the newline, which the next iteration counts
                pos = text[pos..].find('\n').map_or(bytes.len(), |off| pos + off);
            }
            b'"' => {
                let start_line = line;
                let mut value = String::new();
                pos += 1;
                loop {
                    let Some(off) = text[pos..].find('"') else {
                        tokens.push(Token {
                            kind: TokenKind::Unterminated,
                            line: start_line,
                        });
                        return tokens;
                    };
                    let chunk = &text[pos..pos + off];
                    line += chunk.matches('\n').count();
                    value.push_str(chunk);
                    pos += off + 1;
                    if bytes.get(pos) == Some(&b'"') {
                        value.push('"');
                        pos += 1;
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Str(value),
                    line: start_line,
                });
            }
            b'0'..=b'9' => {
                let start = pos;
                while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                    pos += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Int(&text[start..pos]),
                    line,
                });
            }
            _ if b.is_ascii_alphabetic() => {
                let start = pos;
                while pos < bytes.len() {
                    let c = bytes[pos];
                    let hyphen = c == b'-' && bytes.get(pos + 1) != Some(&b'-');
                    if c.is_ascii_alphanumeric() || hyphen {
                        pos += 1;
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(&text[start..pos]),
                    line,
                });
            }
            _ => {
                // pos is always on a char boundary here
                let ch = text[pos..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
                pos += ch.len_utf8();
                if !ch.is_whitespace() {
                    tokens.push(Token {
                        kind: TokenKind::Punct(ch),
                        line,
                    });
                }
            }
        }
    }

    tokens
}
