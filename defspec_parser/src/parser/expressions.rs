//! Expression parsing (Pratt parser)
//!
//! Handles:
//! - Binary and unary expressions with precedence climbing
//! - The clause-shaped operators `->`, `when` and `\\`
//! - Postfix operations (call, index, field access)
//! - Collection literals and `if`

use crate::ast::{BinaryOp, Expr, ExprKind, MapEntry, UnaryOp};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{unescape_string, SpannedToken};
use crate::token::{Associativity, Precedence, Token};

use super::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_expression_with_precedence(Precedence::Lowest)
    }

    /// Type annotations stop before `\\`, `when` and `->`.
    pub(crate) fn parse_type_expression(&mut self) -> ParseResult<Expr> {
        self.parse_expression_with_precedence(Precedence::Or)
    }

    pub(crate) fn parse_expression_with_precedence(
        &mut self,
        min_prec: Precedence,
    ) -> ParseResult<Expr> {
        let mut left = self.parse_prefix()?;

        loop {
            if self.check(&Token::LParen) {
                left = self.parse_call(left)?;
                continue;
            }
            if self.check(&Token::LBracket) {
                left = self.parse_index(left)?;
                continue;
            }
            if self.check(&Token::Dot) {
                left = self.parse_field(left)?;
                continue;
            }

            let Some((prec, assoc)) = self
                .current
                .as_ref()
                .and_then(|t| t.token.binary_precedence())
            else {
                break;
            };
            if prec < min_prec {
                break;
            }

            let Some(op_token) = self.advance() else {
                break;
            };
            // operators may end a line
            self.skip_newlines();

            let next_prec = match assoc {
                Associativity::Left => prec.tighter(),
                Associativity::Right => prec,
            };
            let right = self.parse_expression_with_precedence(next_prec)?;
            left = Self::combine(&op_token, left, right);
        }

        Ok(left)
    }

    fn combine(op: &SpannedToken<'a>, left: Expr, right: Expr) -> Expr {
        let span = left.span.to(&right.span);
        let left = Box::new(left);
        let right = Box::new(right);
        let kind = match op.token {
            Token::Arrow => ExprKind::Clause {
                head: left,
                body: right,
            },
            Token::KwWhen => ExprKind::When {
                subject: left,
                guard: right,
            },
            Token::DefaultArrow => ExprKind::Default {
                inner: left,
                default: right,
            },
            ref other => ExprKind::Binary {
                op: binary_op(other),
                left,
                right,
            },
        };
        Expr::new(kind, span)
    }

    /// Prefix operators and primary expressions
    pub(crate) fn parse_prefix(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;

        if self.check(&Token::Minus) || self.check(&Token::KwNot) {
            let negate = self.check(&Token::Minus);
            self.advance();
            let operand = self.parse_expression_with_precedence(Precedence::Prefix)?;
            let span = self.span_from(start);
            let kind = match (negate, operand.kind) {
                (true, ExprKind::Integer(n)) => ExprKind::Integer(-n),
                (true, ExprKind::Float(f)) => ExprKind::Float(-f),
                (negate, kind) => ExprKind::Unary {
                    op: if negate { UnaryOp::Neg } else { UnaryOp::Not },
                    operand: Box::new(Expr::new(kind, operand.span)),
                },
            };
            return Ok(Expr::new(kind, span));
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let Some(token) = self.current.clone() else {
            return Err(self.error_here("expression"));
        };
        let span = token.span;

        let kind = match token.token {
            Token::IntegerLiteral => {
                self.advance();
                let digits = token.text.replace('_', "");
                let value = digits.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
                    literal: token.text.to_string(),
                    span,
                })?;
                ExprKind::Integer(value)
            }
            Token::FloatLiteral => {
                self.advance();
                let digits = token.text.replace('_', "");
                let value = digits.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                    literal: token.text.to_string(),
                    span,
                })?;
                ExprKind::Float(value)
            }
            Token::DoubleQuote => {
                self.advance();
                ExprKind::Text(unescape_string(token.text, span)?)
            }
            Token::Atom => {
                self.advance();
                ExprKind::Atom(token.text[1..].to_string())
            }
            Token::KwTrue => {
                self.advance();
                ExprKind::Bool(true)
            }
            Token::KwFalse => {
                self.advance();
                ExprKind::Bool(false)
            }
            Token::KwNil => {
                self.advance();
                ExprKind::Nil
            }
            Token::Identifier => {
                self.advance();
                ExprKind::Ident(token.text.to_string())
            }
            Token::LParen => return self.parse_paren(),
            Token::LBracket => return self.parse_list(),
            Token::LBrace => return self.parse_tuple(),
            Token::PercentBrace => return self.parse_map(),
            Token::KwIf => return self.parse_if(),
            _ => return Err(self.error_here("expression")),
        };

        Ok(Expr::new(kind, span))
    }

    // ==================== Delimited forms ====================

    /// Comma-separated expressions up to `close`; newlines are insignificant.
    fn parse_comma_list(&mut self, close: &Token) -> ParseResult<Vec<Expr>> {
        let mut items = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(close) {
                break;
            }
            items.push(self.parse_expression()?);
            self.skip_newlines();
            if self.check(&Token::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(items)
    }

    fn parse_paren(&mut self) -> ParseResult<Expr> {
        let start = self.expect(Token::LParen)?.span.start;
        let items = self.parse_comma_list(&Token::RParen)?;
        self.expect(Token::RParen)?;
        Ok(Expr::new(ExprKind::Paren(items), self.span_from(start)))
    }

    fn parse_tuple(&mut self) -> ParseResult<Expr> {
        let start = self.expect(Token::LBrace)?.span.start;
        let items = self.parse_comma_list(&Token::RBrace)?;
        self.expect(Token::RBrace)?;
        Ok(Expr::new(ExprKind::Tuple(items), self.span_from(start)))
    }

    fn parse_list(&mut self) -> ParseResult<Expr> {
        let start = self.expect(Token::LBracket)?.span.start;
        let mut items = Vec::new();
        let mut tail = None;
        loop {
            self.skip_newlines();
            if self.check(&Token::RBracket) {
                break;
            }
            items.push(self.parse_expression()?);
            self.skip_newlines();
            if self.check(&Token::Pipe) {
                self.advance();
                self.skip_newlines();
                tail = Some(Box::new(self.parse_expression()?));
                self.skip_newlines();
                break;
            }
            if self.check(&Token::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(Token::RBracket)?;
        if tail.is_some() && items.is_empty() {
            return Err(ParseError::invalid_syntax(
                "list tail needs at least one head element",
                self.span_from(start),
            ));
        }
        Ok(Expr::new(
            ExprKind::List { items, tail },
            self.span_from(start),
        ))
    }

    fn parse_map(&mut self) -> ParseResult<Expr> {
        let start = self.expect(Token::PercentBrace)?.span.start;
        let mut entries = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(&Token::RBrace) {
                break;
            }
            entries.push(self.parse_map_entry()?);
            self.skip_newlines();
            if self.check(&Token::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(Token::RBrace)?;
        Ok(Expr::new(ExprKind::Map(entries), self.span_from(start)))
    }

    /// `key: value` (atom key shorthand) or `key => value`
    fn parse_map_entry(&mut self) -> ParseResult<MapEntry> {
        if self.check(&Token::Identifier) && self.peek_next() == Some(Token::Colon) {
            let name = self.expect_identifier("map key")?;
            self.expect(Token::Colon)?;
            self.skip_newlines();
            let value = self.parse_expression()?;
            let key = Expr::new(ExprKind::Atom(name.text.to_string()), name.span);
            return Ok(MapEntry { key, value });
        }
        let key = self.parse_expression_with_precedence(Precedence::Or)?;
        self.skip_newlines();
        self.expect(Token::FatArrow)?;
        self.skip_newlines();
        let value = self.parse_expression()?;
        Ok(MapEntry { key, value })
    }

    fn parse_if(&mut self) -> ParseResult<Expr> {
        let start = self.expect(Token::KwIf)?.span.start;
        let cond = self.parse_expression_with_precedence(Precedence::Or)?;
        let then_block = self.parse_block()?;
        let else_block = if self.check(&Token::KwElse) {
            self.advance();
            if self.check(&Token::KwIf) {
                let nested = self.parse_if()?;
                vec![crate::ast::Stmt::Expr(nested)]
            } else {
                self.parse_block()?
            }
        } else {
            Vec::new()
        };
        Ok(Expr::new(
            ExprKind::If {
                cond: Box::new(cond),
                then_block,
                else_block,
            },
            self.span_from(start),
        ))
    }

    // ==================== Postfix ====================

    fn parse_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let start = callee.span.start;
        self.expect(Token::LParen)?;
        let args = self.parse_comma_list(&Token::RParen)?;
        self.expect(Token::RParen)?;
        Ok(Expr::new(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
            },
            self.span_from(start),
        ))
    }

    fn parse_index(&mut self, target: Expr) -> ParseResult<Expr> {
        let start = target.span.start;
        self.expect(Token::LBracket)?;
        let args = self.parse_comma_list(&Token::RBracket)?;
        self.expect(Token::RBracket)?;
        Ok(Expr::new(
            ExprKind::Index {
                target: Box::new(target),
                args,
            },
            self.span_from(start),
        ))
    }

    fn parse_field(&mut self, target: Expr) -> ParseResult<Expr> {
        let start = target.span.start;
        self.expect(Token::Dot)?;
        let name = self.expect_identifier("field name")?;
        Ok(Expr::new(
            ExprKind::Field {
                target: Box::new(target),
                name: name.text.to_string(),
            },
            self.span_from(start),
        ))
    }
}

fn binary_op(token: &Token) -> BinaryOp {
    match token {
        Token::Plus => BinaryOp::Add,
        Token::Minus => BinaryOp::Sub,
        Token::Star => BinaryOp::Mul,
        Token::Slash => BinaryOp::Div,
        Token::EqEq => BinaryOp::Eq,
        Token::NotEq => BinaryOp::NotEq,
        Token::Lt => BinaryOp::Lt,
        Token::LtEq => BinaryOp::LtEq,
        Token::Gt => BinaryOp::Gt,
        Token::GtEq => BinaryOp::GtEq,
        Token::KwAnd => BinaryOp::And,
        Token::KwOr => BinaryOp::Or,
        // binary_precedence only admits the tokens above and the three
        // clause-shaped operators handled by `combine`
        _ => BinaryOp::Concat,
    }
}
