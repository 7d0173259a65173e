//! Token definitions for the defspec lexer

mod precedence;

#[cfg(test)]
mod tests;

use logos::Logos;

pub use precedence::{Associativity, Precedence};

/// defspec tokens
///
/// Whitespace other than newlines is skipped; newlines are significant as
/// statement separators inside blocks.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\f]+")]
pub enum Token {
    // ==================== Keywords ====================
    #[token("module")]
    KwModule,
    #[token("struct")]
    KwStruct,
    #[token("def")]
    KwDef,
    #[token("when")]
    KwWhen,
    #[token("where")]
    KwWhere,
    #[token("let")]
    KwLet,
    #[token("if")]
    KwIf,
    #[token("else")]
    KwElse,
    #[token("and")]
    KwAnd,
    #[token("or")]
    KwOr,
    #[token("not")]
    KwNot,
    #[token("true")]
    KwTrue,
    #[token("false")]
    KwFalse,
    #[token("nil")]
    KwNil,

    // ==================== Delimiters ====================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("%{")]
    PercentBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,

    // ==================== Operators ====================
    #[token("->")]
    Arrow,
    #[token("=>")]
    FatArrow,
    #[token(r"\\")]
    DefaultArrow,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("<>")]
    Concat,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("|")]
    Pipe,

    // ==================== Trivia ====================
    #[regex(r"\r?\n")]
    Newline,
    #[regex(r"#[^\n]*")]
    LineComment,

    // ==================== Literals ====================
    #[regex(r"[0-9]([0-9]|_[0-9])*")]
    IntegerLiteral,
    #[regex(r"[0-9]([0-9]|_[0-9])*\.[0-9]+([eE][+-]?[0-9]+)?")]
    FloatLiteral,
    /// Opening quote; the lexer scans the body and widens the span to the
    /// closing quote.
    #[token("\"")]
    DoubleQuote,
    /// `:name` atom literal. The colon must touch the name.
    #[regex(r":[a-zA-Z_][a-zA-Z0-9_]*[?!]?")]
    Atom,

    // ==================== Identifiers ====================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*[?!]?")]
    Identifier,
}

impl Token {
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Token::KwModule
                | Token::KwStruct
                | Token::KwDef
                | Token::KwWhen
                | Token::KwWhere
                | Token::KwLet
                | Token::KwIf
                | Token::KwElse
                | Token::KwAnd
                | Token::KwOr
                | Token::KwNot
                | Token::KwTrue
                | Token::KwFalse
                | Token::KwNil
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Token::IntegerLiteral
                | Token::FloatLiteral
                | Token::DoubleQuote
                | Token::Atom
                | Token::KwTrue
                | Token::KwFalse
                | Token::KwNil
        )
    }

    /// Tokens that terminate an entry inside a block.
    pub fn is_separator(&self) -> bool {
        matches!(self, Token::Newline | Token::Semicolon)
    }

    /// Human-readable description used in "expected ..." messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Token::LParen => "'('",
            Token::RParen => "')'",
            Token::LBracket => "'['",
            Token::RBracket => "']'",
            Token::LBrace => "'{'",
            Token::RBrace => "'}'",
            Token::PercentBrace => "'%{'",
            Token::Comma => "','",
            Token::Colon => "':'",
            Token::Arrow => "'->'",
            Token::FatArrow => "'=>'",
            Token::Eq => "'='",
            Token::Identifier => "identifier",
            Token::Newline => "newline",
            _ => "token",
        }
    }
}
