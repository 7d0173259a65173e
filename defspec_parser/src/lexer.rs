//! Lexer for defspec source code
//!
//! Wraps the logos-generated lexer, scanning string bodies by hand so that
//! their contents never reach the token rules.

use logos::Logos;

use crate::error::{ParseError, ParseResult};
use crate::span::{SourceMap, Span};
use crate::token::Token;

/// A token with its span
#[derive(Debug, Clone)]
pub struct SpannedToken<'a> {
    pub token: Token,
    pub span: Span,
    pub text: &'a str,
}

impl<'a> SpannedToken<'a> {
    pub fn new(token: Token, span: Span, text: &'a str) -> Self {
        Self { token, span, text }
    }
}

/// defspec lexer
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, Token>,
    source_map: SourceMap,
    peeked: Option<Option<ParseResult<SpannedToken<'a>>>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: Token::lexer(source),
            source_map: SourceMap::new(source),
            peeked: None,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> Option<&ParseResult<SpannedToken<'a>>> {
        if self.peeked.is_none() {
            let next = self.lex_one();
            self.peeked = Some(next);
        }
        self.peeked.as_ref().and_then(|p| p.as_ref())
    }

    pub fn next_token(&mut self) -> Option<ParseResult<SpannedToken<'a>>> {
        match self.peeked.take() {
            Some(peeked) => peeked,
            None => self.lex_one(),
        }
    }

    fn lex_one(&mut self) -> Option<ParseResult<SpannedToken<'a>>> {
        let result = self.inner.next()?;
        let range = self.inner.span();

        match result {
            Ok(Token::DoubleQuote) => match self.scan_string_to_close(range.end) {
                Ok(string_end) => {
                    self.inner.bump(string_end - range.end);
                    let span = self.source_map.span(range.start, string_end);
                    let text = &self.source[range.start..string_end];
                    Some(Ok(SpannedToken::new(Token::DoubleQuote, span, text)))
                }
                Err(e) => {
                    self.inner.bump(self.source.len() - range.end);
                    Some(Err(e))
                }
            },
            Ok(token) => {
                let span = self.source_map.span(range.start, range.end);
                let text = &self.source[range.start..range.end];
                Some(Ok(SpannedToken::new(token, span, text)))
            }
            Err(()) => Some(Err(ParseError::LexerError {
                span: self.source_map.span(range.start, range.end),
            })),
        }
    }

    /// Find the byte offset just past the closing quote of a string whose
    /// body starts at `start`.
    fn scan_string_to_close(&self, start: usize) -> ParseResult<usize> {
        let bytes = self.source.as_bytes();
        let mut pos = start;

        while pos < bytes.len() {
            match memchr::memchr3(b'\\', b'"', b'\n', &bytes[pos..]) {
                None => break,
                Some(offset) => {
                    pos += offset;
                    match bytes[pos] {
                        b'\\' if pos + 1 < bytes.len() => pos += 2,
                        b'"' => return Ok(pos + 1),
                        _ => break,
                    }
                }
            }
        }

        Err(ParseError::UnterminatedString {
            span: self.source_map.span(start - 1, pos.min(bytes.len())),
        })
    }
}

/// Decode the body of a string token (including its quotes).
pub fn unescape_string(text: &str, span: Span) -> ParseResult<String> {
    let body = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => {
                return Err(ParseError::InvalidEscape {
                    sequence: format!("\\{}", other),
                    span,
                })
            }
            None => {
                return Err(ParseError::InvalidEscape {
                    sequence: "\\".to_string(),
                    span,
                })
            }
        }
    }
    Ok(out)
}

/// Tokenize a whole source string, keeping comments and newlines.
pub fn tokenize(source: &str) -> Vec<ParseResult<SpannedToken<'_>>> {
    let mut lexer = Lexer::new(source);
    std::iter::from_fn(|| lexer.next_token()).collect()
}
