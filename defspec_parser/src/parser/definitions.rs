//! Items and blocks: `module`, `def`, `struct`, `{ ... }`

use crate::ast::{Constraint, FieldDecl, FunctionDef, Item, ModuleDef, Param, Stmt, StructDef};
use crate::error::{ParseError, ParseResult};
use crate::token::{Precedence, Token};

use super::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_item(&mut self) -> ParseResult<Item> {
        if self.check(&Token::KwModule) {
            return self.parse_module().map(Item::Module);
        }
        if self.check(&Token::KwDef) {
            return self.parse_function_definition().map(Item::Function);
        }
        if self.check(&Token::KwStruct) {
            return self.parse_struct().map(Item::Struct);
        }
        Err(self.error_here("'def', 'struct' or 'module'"))
    }

    /// `module A.B { items }`
    fn parse_module(&mut self) -> ParseResult<ModuleDef> {
        let start = self.expect(Token::KwModule)?.span.start;
        let mut name = self.expect_identifier("module name")?.text.to_string();
        while self.check(&Token::Dot) {
            self.advance();
            name.push('.');
            name.push_str(self.expect_identifier("module name")?.text);
        }

        self.expect(Token::LBrace)?;
        let mut items = Vec::new();
        loop {
            self.skip_separators();
            if self.check(&Token::RBrace) || self.is_at_end() {
                break;
            }
            if self.check(&Token::KwModule) {
                return Err(ParseError::invalid_syntax(
                    "modules cannot be nested",
                    self.current_span(),
                ));
            }
            items.push(self.parse_item()?);
        }
        self.expect(Token::RBrace)?;

        Ok(ModuleDef {
            name,
            items,
            span: self.span_from(start),
        })
    }

    /// `def name(params) [-> type] [where T: bound, ...] { body }`
    pub(crate) fn parse_function_definition(&mut self) -> ParseResult<FunctionDef> {
        let start = self.expect(Token::KwDef)?.span.start;
        let name = self.expect_identifier("function name")?.text.to_string();

        let params = self.parse_parameter_list()?;

        let return_type = if self.check(&Token::Arrow) {
            self.advance();
            Some(self.parse_type_expression()?)
        } else {
            None
        };

        let constraints = if self.check(&Token::KwWhere) {
            self.parse_where_clause()?
        } else {
            Vec::new()
        };

        let body = self.parse_block()?;

        Ok(FunctionDef {
            name,
            params,
            return_type,
            constraints,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_parameter_list(&mut self) -> ParseResult<Vec<Param>> {
        self.expect(Token::LParen)?;
        let mut params = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(&Token::RParen) {
                break;
            }
            params.push(self.parse_parameter()?);
            self.skip_newlines();
            if self.check(&Token::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(Token::RParen)?;
        Ok(params)
    }

    /// `name: type-expression`, where the type expression may carry a
    /// `\\ default` suffix.
    fn parse_parameter(&mut self) -> ParseResult<Param> {
        let name_tok = self.expect_identifier("parameter name")?;
        let start = name_tok.span.start;
        if !self.check(&Token::Colon) {
            return Err(ParseError::invalid_syntax(
                format!("parameter '{}' needs a type: `{}: type`", name_tok.text, name_tok.text),
                name_tok.span,
            ));
        }
        self.advance();
        let ty = self.parse_expression_with_precedence(Precedence::Default)?;
        Ok(Param {
            name: name_tok.text.to_string(),
            ty,
            span: self.span_from(start),
        })
    }

    /// `where T: bound, U: bound`
    fn parse_where_clause(&mut self) -> ParseResult<Vec<Constraint>> {
        self.expect(Token::KwWhere)?;
        let mut constraints = Vec::new();
        loop {
            self.skip_newlines();
            let name_tok = self.expect_identifier("type variable")?;
            self.expect(Token::Colon)?;
            let bound = self.parse_type_expression()?;
            constraints.push(Constraint {
                name: name_tok.text.to_string(),
                bound,
                span: self.span_from(name_tok.span.start),
            });
            if self.check(&Token::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(constraints)
    }

    /// `struct { field: Module, ... }`
    fn parse_struct(&mut self) -> ParseResult<StructDef> {
        let start = self.expect(Token::KwStruct)?.span.start;
        self.expect(Token::LBrace)?;
        let mut fields = Vec::new();
        loop {
            self.skip_separators();
            if self.check(&Token::RBrace) {
                break;
            }
            let name_tok = self.expect_identifier("field name")?;
            self.expect(Token::Colon)?;
            let ty = self.parse_type_expression()?;
            fields.push(FieldDecl {
                name: name_tok.text.to_string(),
                ty,
                span: self.span_from(name_tok.span.start),
            });
            let line_ended = self.check(&Token::Newline) || self.check(&Token::Semicolon);
            self.skip_separators();
            if self.check(&Token::Comma) {
                self.advance();
            } else if !line_ended && !self.check(&Token::RBrace) {
                return Err(self.error_here("',' or '}'"));
            }
        }
        self.expect(Token::RBrace)?;
        Ok(StructDef {
            fields,
            span: self.span_from(start),
        })
    }

    // ==================== Blocks ====================

    /// `{ entry (newline|; entry)* }`
    pub(crate) fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        self.expect(Token::LBrace)?;
        let mut stmts = Vec::new();
        loop {
            self.skip_separators();
            if self.check(&Token::RBrace) || self.is_at_end() {
                break;
            }
            stmts.push(self.parse_statement()?);
            if !self.check(&Token::RBrace)
                && !self.check(&Token::Newline)
                && !self.check(&Token::Semicolon)
            {
                return Err(self.error_here("newline, ';' or '}'"));
            }
        }
        self.expect(Token::RBrace)?;
        Ok(stmts)
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        if self.check(&Token::KwLet) {
            let start = self.expect(Token::KwLet)?.span.start;
            let name = self.expect_identifier("binding name")?.text.to_string();
            self.expect(Token::Eq)?;
            self.skip_newlines();
            let value = self.parse_expression()?;
            return Ok(Stmt::Let {
                name,
                value,
                span: self.span_from(start),
            });
        }
        self.parse_expression().map(Stmt::Expr)
    }
}
