//! Operator precedence and associativity

use super::Token;

/// Binding power of infix operators, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i8)]
pub enum Precedence {
    /// Entry level for a full expression
    Lowest = 0,
    /// Clause arrow: `(pats) -> body`
    Clause = 1,
    /// Clause guard: `(pats) when cond`
    When = 2,
    /// Default value: `type \\ value`
    Default = 3,
    /// `or`
    Or = 4,
    /// `and`
    And = 5,
    /// `==`, `!=`, `<`, `<=`, `>`, `>=`
    Comparison = 6,
    /// `<>`
    Concat = 7,
    /// `+`, `-`
    Plus = 8,
    /// `*`, `/`
    Times = 9,
    /// Unary `-` and `not`
    Prefix = 10,
    /// Call, index and field access
    Postfix = 11,
}

impl TryFrom<i8> for Precedence {
    type Error = ();

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Precedence::Lowest),
            1 => Ok(Precedence::Clause),
            2 => Ok(Precedence::When),
            3 => Ok(Precedence::Default),
            4 => Ok(Precedence::Or),
            5 => Ok(Precedence::And),
            6 => Ok(Precedence::Comparison),
            7 => Ok(Precedence::Concat),
            8 => Ok(Precedence::Plus),
            9 => Ok(Precedence::Times),
            10 => Ok(Precedence::Prefix),
            11 => Ok(Precedence::Postfix),
            _ => Err(()),
        }
    }
}

impl Precedence {
    /// Minimum precedence for the right operand of a left-associative operator.
    pub fn tighter(self) -> Precedence {
        Precedence::try_from(self as i8 + 1).unwrap_or(Precedence::Postfix)
    }
}

/// Operator associativity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

impl Token {
    /// Precedence and associativity of an infix operator token.
    pub fn binary_precedence(&self) -> Option<(Precedence, Associativity)> {
        use Associativity::{Left, Right};
        use Precedence::*;

        Some(match self {
            Token::Arrow => (Clause, Right),
            Token::KwWhen => (When, Left),
            Token::DefaultArrow => (Default, Right),
            Token::KwOr => (Or, Left),
            Token::KwAnd => (And, Left),
            Token::EqEq | Token::NotEq | Token::Lt | Token::LtEq | Token::Gt | Token::GtEq => {
                (Comparison, Left)
            }
            Token::Concat => (Concat, Right),
            Token::Plus | Token::Minus => (Plus, Left),
            Token::Star | Token::Slash => (Times, Left),
            _ => return None,
        })
    }
}
