//! Textual rendering of emitted declarations.
//!
//! ```text
//! spec add(integer, integer) -> integer
//! decl add(a, b \\ 1)
//! impl add(a, b) when is_integer(a) {
//!   a + b
//! }
//! ```

use std::fmt;

use super::binding::BindingTable;
use super::core::{BinaryOp, Block, Callee, Expr, Literal, Pattern, Stmt, UnaryOp};
use super::decl::{CompiledModule, GeneratedDecl, Program, RecordDef, SignatureDecl};

const INDENT: &str = "  ";

fn precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Or => 1,
        BinaryOp::And => 2,
        BinaryOp::Eq
        | BinaryOp::NotEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq => 3,
        BinaryOp::Concat => 4,
        BinaryOp::Add | BinaryOp::Sub => 5,
        BinaryOp::Mul | BinaryOp::Div => 6,
    }
}

fn join<T>(items: &[T], mut f: impl FnMut(&T) -> String) -> String {
    items.iter().map(&mut f).collect::<Vec<_>>().join(", ")
}

fn literal(lit: &Literal) -> String {
    match lit {
        Literal::Int(n) => n.to_string(),
        Literal::Float(x) => format!("{:?}", x),
        Literal::Text(s) => format!("{:?}", s),
        Literal::Atom(a) => format!(":{}", a),
        Literal::Bool(b) => b.to_string(),
        Literal::Nil => "nil".to_string(),
    }
}

struct Renderer<'a> {
    bindings: &'a BindingTable,
}

impl<'a> Renderer<'a> {
    fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(lit) => literal(lit),
            Expr::Local(id) => self.bindings.name(*id).to_string(),
            Expr::Unary { op, operand } => {
                let inner = match operand.as_ref() {
                    Expr::Binary { .. } => format!("({})", self.expr(operand)),
                    _ => self.expr(operand),
                };
                match op {
                    UnaryOp::Neg => format!("-{}", inner),
                    UnaryOp::Not => format!("not {}", inner),
                }
            }
            Expr::Binary { op, left, right } => {
                let prec = precedence(*op);
                let lhs = self.operand(left, |p| p < prec);
                let rhs = self.operand(right, |p| p <= prec);
                format!("{} {} {}", lhs, op.symbol(), rhs)
            }
            Expr::Call { callee, args } => {
                let name = match callee {
                    Callee::Builtin(b) => b.name().to_string(),
                    Callee::Local(name) => name.clone(),
                    Callee::Remote { module, function } => format!("{}.{}", module, function),
                };
                format!("{}({})", name, join(args, |a| self.expr(a)))
            }
            Expr::List { items, tail } => {
                let items = join(items, |a| self.expr(a));
                match tail {
                    Some(tail) => format!("[{} | {}]", items, self.expr(tail)),
                    None => format!("[{}]", items),
                }
            }
            Expr::Tuple(items) => format!("{{{}}}", join(items, |a| self.expr(a))),
            Expr::Map(entries) => {
                let entries = join(entries, |(k, v)| match k {
                    Expr::Literal(Literal::Atom(a)) => format!("{}: {}", a, self.expr(v)),
                    _ => format!("{} => {}", self.expr(k), self.expr(v)),
                });
                format!("%{{{}}}", entries)
            }
            Expr::Field { target, field } => format!("{}.{}", self.expr(target), field),
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => format!(
                "if {} {{ {} }} else {{ {} }}",
                self.expr(cond),
                self.inline_block(then_branch),
                self.inline_block(else_branch)
            ),
            Expr::Intrinsic { op, record, args } => {
                let mut parts = vec![record.clone()];
                parts.extend(args.iter().map(|a| self.expr(a)));
                format!("{}!({})", op.name(), parts.join(", "))
            }
        }
    }

    fn operand(&self, expr: &Expr, needs_parens: impl Fn(u8) -> bool) -> String {
        match expr {
            Expr::Binary { op, .. } if needs_parens(precedence(*op)) => {
                format!("({})", self.expr(expr))
            }
            _ => self.expr(expr),
        }
    }

    fn stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Let { binding, value } => {
                format!("{} = {}", self.bindings.name(*binding), self.expr(value))
            }
            Stmt::Validate { binding, module } => {
                let name = self.bindings.name(*binding);
                format!("{} = {}.validate!({})", name, module, name)
            }
            Stmt::Expr(e) => self.expr(e),
        }
    }

    fn inline_block(&self, block: &Block) -> String {
        block
            .stmts
            .iter()
            .map(|s| self.stmt(s))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn pattern(&self, pattern: &Pattern) -> String {
        match pattern {
            Pattern::Wildcard => "_".to_string(),
            Pattern::Bind(id) | Pattern::Same(id) => self.bindings.name(*id).to_string(),
            Pattern::Literal(lit) => literal(lit),
            Pattern::Tuple(items) => format!("{{{}}}", join(items, |p| self.pattern(p))),
            Pattern::List { items, tail } => {
                let items = join(items, |p| self.pattern(p));
                match tail {
                    Some(tail) => format!("[{} | {}]", items, self.pattern(tail)),
                    None => format!("[{}]", items),
                }
            }
            Pattern::Map(entries) => {
                let entries = join(entries, |(k, p)| match k {
                    Literal::Atom(a) => format!("{}: {}", a, self.pattern(p)),
                    other => format!("{} => {}", literal(other), self.pattern(p)),
                });
                format!("%{{{}}}", entries)
            }
        }
    }
}

impl GeneratedDecl {
    /// Rendered lines, unindented.
    pub fn render_lines(&self) -> Vec<String> {
        let r = Renderer {
            bindings: &self.bindings,
        };
        let mut lines = vec![self.signature.to_string()];

        let forward = join(&self.forward.params, |p| match &p.default {
            Some(default) => format!("{} \\\\ {}", p.name, r.expr(default)),
            None => p.name.clone(),
        });
        lines.push(format!("decl {}({})", self.name, forward));

        for imp in &self.implementations {
            let mut head = format!(
                "impl {}({})",
                self.name,
                join(&imp.patterns, |p| r.pattern(p))
            );
            if let Some(guard) = &imp.guard {
                head.push_str(" when ");
                head.push_str(&r.expr(guard));
            }
            head.push_str(" {");
            lines.push(head);
            for stmt in &imp.body.stmts {
                lines.push(format!("{}{}", INDENT, r.stmt(stmt)));
            }
            lines.push("}".to_string());
        }
        lines
    }
}

impl fmt::Display for SignatureDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "spec {}({}) -> {}",
            self.name,
            join(&self.params, |t| t.to_string()),
            self.return_type
        )?;
        if !self.constraints.is_empty() {
            write!(f, " where {}", join(&self.constraints, |c| c.to_string()))?;
        }
        Ok(())
    }
}

impl fmt::Display for GeneratedDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_lines().join("\n"))
    }
}

impl fmt::Display for RecordDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = join(&self.fields, |field| format!("{}: {}", field.name, field.module));
        write!(f, "record {} {{ {} }}", self.name, fields)
    }
}

impl fmt::Display for CompiledModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "module {} {{", self.name)?;
        let mut first = true;
        if let Some(record) = &self.record {
            writeln!(f, "{}{}", INDENT, record)?;
            first = false;
        }
        for decl in &self.functions {
            if !first {
                writeln!(f)?;
            }
            first = false;
            for line in decl.render_lines() {
                writeln!(f, "{}{}", INDENT, line)?;
            }
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, module) in self.modules.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
                writeln!(f)?;
            }
            write!(f, "{}", module)?;
        }
        Ok(())
    }
}
