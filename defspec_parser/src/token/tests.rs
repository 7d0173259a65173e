//! Tests for token module

use super::*;
use logos::Logos;

#[test]
fn test_keywords() {
    let mut lexer = Token::lexer("module def struct when where let");
    assert_eq!(lexer.next(), Some(Ok(Token::KwModule)));
    assert_eq!(lexer.next(), Some(Ok(Token::KwDef)));
    assert_eq!(lexer.next(), Some(Ok(Token::KwStruct)));
    assert_eq!(lexer.next(), Some(Ok(Token::KwWhen)));
    assert_eq!(lexer.next(), Some(Ok(Token::KwWhere)));
    assert_eq!(lexer.next(), Some(Ok(Token::KwLet)));
}

#[test]
fn test_keyword_prefix_is_identifier() {
    let mut lexer = Token::lexer("define modules whenever");
    assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
    assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
    assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
}

#[test]
fn test_operators() {
    let mut lexer = Token::lexer(r"-> => \\ == != <= >= <> < > = |");
    assert_eq!(lexer.next(), Some(Ok(Token::Arrow)));
    assert_eq!(lexer.next(), Some(Ok(Token::FatArrow)));
    assert_eq!(lexer.next(), Some(Ok(Token::DefaultArrow)));
    assert_eq!(lexer.next(), Some(Ok(Token::EqEq)));
    assert_eq!(lexer.next(), Some(Ok(Token::NotEq)));
    assert_eq!(lexer.next(), Some(Ok(Token::LtEq)));
    assert_eq!(lexer.next(), Some(Ok(Token::GtEq)));
    assert_eq!(lexer.next(), Some(Ok(Token::Concat)));
    assert_eq!(lexer.next(), Some(Ok(Token::Lt)));
    assert_eq!(lexer.next(), Some(Ok(Token::Gt)));
    assert_eq!(lexer.next(), Some(Ok(Token::Eq)));
    assert_eq!(lexer.next(), Some(Ok(Token::Pipe)));
}

#[test]
fn test_numbers() {
    let mut lexer = Token::lexer("42 3.14 1_000 2.5e3");
    assert_eq!(lexer.next(), Some(Ok(Token::IntegerLiteral)));
    assert_eq!(lexer.next(), Some(Ok(Token::FloatLiteral)));
    assert_eq!(lexer.next(), Some(Ok(Token::IntegerLiteral)));
    assert_eq!(lexer.next(), Some(Ok(Token::FloatLiteral)));
}

#[test]
fn test_atom_versus_colon() {
    let mut lexer = Token::lexer("x: integer :ok");
    assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
    assert_eq!(lexer.next(), Some(Ok(Token::Colon)));
    assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
    assert_eq!(lexer.next(), Some(Ok(Token::Atom)));
    assert_eq!(lexer.slice(), ":ok");
}

#[test]
fn test_map_open_and_newline() {
    let mut lexer = Token::lexer("%{}\n# note\n");
    assert_eq!(lexer.next(), Some(Ok(Token::PercentBrace)));
    assert_eq!(lexer.next(), Some(Ok(Token::RBrace)));
    assert_eq!(lexer.next(), Some(Ok(Token::Newline)));
    assert_eq!(lexer.next(), Some(Ok(Token::LineComment)));
    assert_eq!(lexer.next(), Some(Ok(Token::Newline)));
    assert_eq!(lexer.next(), None);
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn test_precedence_ordering() {
    let prec = |t: Token| t.binary_precedence().map(|(p, _)| p);
    assert!(prec(Token::Arrow) < prec(Token::KwWhen));
    assert!(prec(Token::KwWhen) < prec(Token::DefaultArrow));
    assert!(prec(Token::KwOr) < prec(Token::KwAnd));
    assert!(prec(Token::EqEq) < prec(Token::Plus));
    assert!(prec(Token::Plus) < prec(Token::Star));
    assert_eq!(prec(Token::Comma), None);
}

#[test]
fn test_tighter_saturates() {
    assert_eq!(Precedence::Plus.tighter(), Precedence::Times);
    assert_eq!(Precedence::Postfix.tighter(), Precedence::Postfix);
}

#[test]
fn test_keyword_classification() {
    assert!(Token::KwDef.is_keyword());
    assert!(!Token::Identifier.is_keyword());
    assert!(Token::Atom.is_literal());
    assert!(Token::Semicolon.is_separator());
}
