//! Recursive descent parser for defspec
//!
//! Produces an [`ast::SourceFile`](crate::ast::SourceFile). Expressions are
//! parsed with a Pratt loop (see `expressions.rs`); items and blocks live in
//! `definitions.rs`.

mod definitions;
mod expressions;

use crate::ast::{Expr, SourceFile};
use crate::error::{ParseError, ParseErrors, ParseResult};
use crate::lexer::{Lexer, SpannedToken};
use crate::span::{SourceMap, Span};
use crate::token::Token;

/// Parser state
pub struct Parser<'a> {
    source: &'a str,
    lexer: Lexer<'a>,
    source_map: SourceMap,
    current: Option<SpannedToken<'a>>,
    /// End offset of the most recently consumed token
    prev_end: usize,
    errors: ParseErrors,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        let lexer = Lexer::new(source);
        let source_map = lexer.source_map().clone();
        let mut parser = Self {
            source,
            lexer,
            source_map,
            current: None,
            prev_end: 0,
            errors: ParseErrors::new(),
        };
        parser.advance();
        parser.prev_end = 0;
        parser
    }

    /// Parse a whole source file, recovering at item boundaries.
    pub fn parse(mut self) -> (SourceFile, ParseErrors) {
        let mut items = Vec::new();

        loop {
            self.skip_separators();
            if self.is_at_end() {
                break;
            }
            match self.parse_item() {
                Ok(item) => items.push(item),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }

        let span = self.source_map.span(0, self.source.len());
        (SourceFile { items, span }, self.errors)
    }

    /// Parse a single standalone expression (used for CLI arguments).
    pub fn parse_standalone_expression(mut self) -> ParseResult<Expr> {
        self.skip_newlines();
        let expr = self.parse_expression()?;
        self.skip_separators();
        if let Some(tok) = &self.current {
            return Err(ParseError::unexpected_token(
                tok.text,
                "end of input",
                tok.span,
            ));
        }
        match self.errors.into_first() {
            Some(e) => Err(e),
            None => Ok(expr),
        }
    }

    // ==================== Token Management ====================

    /// Advance to the next non-comment token, returning the previous one.
    pub(crate) fn advance(&mut self) -> Option<SpannedToken<'a>> {
        let prev = self.current.take();
        if let Some(tok) = &prev {
            self.prev_end = tok.span.end;
        }
        loop {
            match self.lexer.next_token() {
                Some(Ok(token)) if token.token == Token::LineComment => continue,
                Some(Ok(token)) => {
                    self.current = Some(token);
                    break;
                }
                Some(Err(e)) => {
                    self.errors.push(e);
                    continue;
                }
                None => {
                    self.current = None;
                    break;
                }
            }
        }
        prev
    }

    pub(crate) fn check(&self, expected: &Token) -> bool {
        self.current
            .as_ref()
            .map(|t| &t.token == expected)
            .unwrap_or(false)
    }

    pub(crate) fn check_any(&self, expected: &[Token]) -> bool {
        self.current
            .as_ref()
            .map(|t| expected.contains(&t.token))
            .unwrap_or(false)
    }

    /// Token after the current one, skipping comments.
    pub(crate) fn peek_next(&mut self) -> Option<Token> {
        while matches!(self.lexer.peek(), Some(Ok(t)) if t.token == Token::LineComment) {
            let _ = self.lexer.next_token();
        }
        match self.lexer.peek() {
            Some(Ok(t)) => Some(t.token.clone()),
            _ => None,
        }
    }

    /// Consume the expected token or fail.
    pub(crate) fn expect(&mut self, expected: Token) -> ParseResult<SpannedToken<'a>> {
        if self.check(&expected) {
            if let Some(tok) = self.advance() {
                return Ok(tok);
            }
        }
        Err(self.error_here(expected.describe()))
    }

    pub(crate) fn expect_identifier(&mut self, what: &str) -> ParseResult<SpannedToken<'a>> {
        if self.check(&Token::Identifier) {
            if let Some(tok) = self.advance() {
                return Ok(tok);
            }
        }
        Err(self.error_here(what))
    }

    /// "expected X" error pointing at the current token.
    pub(crate) fn error_here(&self, expected: &str) -> ParseError {
        match &self.current {
            Some(tok) => ParseError::unexpected_token(tok.text, expected, tok.span),
            None => ParseError::unexpected_eof(expected, self.eof_span()),
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        self.current
            .as_ref()
            .map(|t| t.span)
            .unwrap_or_else(|| self.eof_span())
    }

    fn eof_span(&self) -> Span {
        self.source_map.span(self.source.len(), self.source.len())
    }

    /// Span from `start` to the end of the last consumed token.
    pub(crate) fn span_from(&self, start: usize) -> Span {
        self.source_map.span(start, self.prev_end.max(start))
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.current.is_none()
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self.check(&Token::Newline) {
            self.advance();
        }
    }

    pub(crate) fn skip_separators(&mut self) {
        while self.check(&Token::Newline) || self.check(&Token::Semicolon) {
            self.advance();
        }
    }

    /// Skip ahead to the next token that can start an item.
    fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end()
            && !self.check_any(&[Token::KwDef, Token::KwModule, Token::KwStruct])
        {
            self.advance();
        }
    }
}

/// Parse source into a [`SourceFile`] plus any collected errors.
pub fn parse(source: &str) -> (SourceFile, ParseErrors) {
    Parser::new(source).parse()
}
