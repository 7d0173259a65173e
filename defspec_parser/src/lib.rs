//! defspec_parser
//!
//! Lexer and recursive-descent parser for the defspec function-definition
//! language. The output is a generic surface tree ([`ast`]); all meaning
//! (type descriptors, guard and validation requests, clause lists) is
//! assigned later by the `defspec` compiler.
//!
//! # Example
//!
//! ```
//! use defspec_parser::{parse, ast::Item};
//!
//! let file = parse("def id(x: any) -> any { x }").expect("parse failed");
//! assert!(matches!(file.items[0], Item::Function(_)));
//! ```

#![deny(clippy::print_stderr)]

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use ast::{Expr, ExprKind, Item, SourceFile};
pub use error::{ParseError, ParseErrors, ParseResult};
pub use lexer::{Lexer, SpannedToken};
pub use parser::Parser;
pub use span::{SourceMap, Span};
pub use token::{Associativity, Precedence, Token};

/// Parse defspec source, failing on the first error.
pub fn parse(source: &str) -> ParseResult<SourceFile> {
    let (file, errors) = parser::parse(source);
    match errors.into_first() {
        Some(e) => Err(e),
        None => Ok(file),
    }
}

/// Parse with error recovery: the tree holds every item that parsed.
pub fn parse_with_errors(source: &str) -> (SourceFile, ParseErrors) {
    parser::parse(source)
}

/// Parse a single expression such as a CLI argument (`%{count: 2}`).
pub fn parse_expression(source: &str) -> ParseResult<Expr> {
    Parser::new(source).parse_standalone_expression()
}

/// Tokenize source, keeping comments and newlines.
pub fn tokenize(source: &str) -> Vec<Result<SpannedToken<'_>, ParseError>> {
    lexer::tokenize(source)
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let file = parse("").unwrap();
        assert!(file.items.is_empty());
    }

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("1 + 2");
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_parse_expression_rejects_trailing_tokens() {
        assert!(parse_expression("1 2").is_err());
        assert_eq!(parse_expression("41").unwrap().kind, ExprKind::Integer(41));
    }

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
