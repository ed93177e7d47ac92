//! Recursive-descent parser for imp programs
//!
//! Statement grammar:
//!
//! ```text
//! stmt      := "skip" | "print_state"
//!            | ident ":=" aexp
//!            | "havoc" ident ("," ident)*
//!            | "assert" bexp | "assume" bexp
//!            | "if" bexp "then" stmt ["else" stmt]
//!            | "while" bexp ["inv" bexp] "do" stmt
//!            | "{" stmt_list "}"
//! stmt_list := stmt (";" stmt)*
//! ```
//!
//! Boolean expressions layer `or` over `and` over `not`/atoms; arithmetic
//! layers `+`/`-` over `*`/`/` over atoms. Left-associative chains of a
//! single operator flatten into one n-ary node, so `1 + 2 + 3` is a single
//! addition over three operands while `1 + 2 - 3` nests the fold.

use crate::ast::{ArithOp, BoolOp, Expr, RelOp, Stmt};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;
use logos::Logos;
use std::ops::Range;

/// Parse a complete imp program
pub fn parse(src: &str) -> ParseResult<Stmt> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(src);
    while let Some(tok) = lexer.next() {
        match tok {
            Ok(t) => tokens.push((t, lexer.span())),
            Err(()) => return Err(ParseError::Lex(lexer.span().start)),
        }
    }

    let mut parser = Parser { tokens, pos: 0 };
    let program = parser.parse_stmt_list()?;
    parser.expect_end()?;
    Ok(program)
}

struct Parser<'a> {
    tokens: Vec<(Token<'a>, Range<usize>)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.tokens.get(self.pos) {
            Some((tok, span)) => ParseError::Unexpected {
                found: tok.to_string(),
                at: span.start,
                expected: expected.to_string(),
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_string(),
            },
        }
    }

    fn expect(&mut self, want: &Token<'a>, expected: &str) -> ParseResult<()> {
        match self.peek() {
            Some(tok) if tok == want => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn eat(&mut self, want: &Token<'a>) -> bool {
        if self.peek() == Some(want) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_ident(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                let name = name.to_string();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    fn expect_end(&self) -> ParseResult<()> {
        if self.pos == self.tokens.len() {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    fn parse_stmt_list(&mut self) -> ParseResult<Stmt> {
        let mut stmts = vec![self.parse_stmt()?];
        while self.eat(&Token::Semi) {
            // allow a trailing separator before `}` or end of input
            if self.peek().is_none() || self.peek() == Some(&Token::RBrace) {
                break;
            }
            stmts.push(self.parse_stmt()?);
        }
        if stmts.len() == 1 {
            Ok(stmts.swap_remove(0))
        } else {
            Ok(Stmt::Block(stmts))
        }
    }

    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        match self.peek() {
            Some(Token::Skip) => {
                self.pos += 1;
                Ok(Stmt::Skip)
            }
            Some(Token::PrintState) => {
                self.pos += 1;
                Ok(Stmt::PrintState)
            }
            Some(Token::Ident(_)) => {
                let var = self.expect_ident()?;
                self.expect(&Token::Assign, "`:=`")?;
                let rhs = self.parse_aexp()?;
                Ok(Stmt::Assign { var, rhs })
            }
            Some(Token::Havoc) => {
                self.pos += 1;
                let mut vars = vec![self.expect_ident()?];
                while self.eat(&Token::Comma) {
                    vars.push(self.expect_ident()?);
                }
                Ok(Stmt::Havoc { vars })
            }
            Some(Token::Assert) => {
                self.pos += 1;
                Ok(Stmt::Assert(self.parse_bexp()?))
            }
            Some(Token::Assume) => {
                self.pos += 1;
                Ok(Stmt::Assume(self.parse_bexp()?))
            }
            Some(Token::If) => {
                self.pos += 1;
                let cond = self.parse_bexp()?;
                self.expect(&Token::Then, "`then`")?;
                let then_branch = Box::new(self.parse_stmt()?);
                let else_branch = if self.eat(&Token::Else) {
                    Some(Box::new(self.parse_stmt()?))
                } else {
                    None
                };
                Ok(Stmt::If {
                    cond,
                    then_branch,
                    else_branch,
                })
            }
            Some(Token::While) => {
                self.pos += 1;
                let cond = self.parse_bexp()?;
                let inv = if self.eat(&Token::Inv) {
                    Some(self.parse_bexp()?)
                } else {
                    None
                };
                self.expect(&Token::Do, "`do`")?;
                let body = Box::new(self.parse_stmt()?);
                Ok(Stmt::While { cond, inv, body })
            }
            Some(Token::LBrace) => {
                self.pos += 1;
                let body = self.parse_stmt_list()?;
                self.expect(&Token::RBrace, "`}`")?;
                Ok(body)
            }
            _ => Err(self.unexpected("a statement")),
        }
    }

    fn parse_bexp(&mut self) -> ParseResult<Expr> {
        let mut args = vec![self.parse_bterm()?];
        while self.eat(&Token::Or) {
            args.push(self.parse_bterm()?);
        }
        if args.len() == 1 {
            Ok(args.swap_remove(0))
        } else {
            Ok(Expr::Bool {
                op: BoolOp::Or,
                args,
            })
        }
    }

    fn parse_bterm(&mut self) -> ParseResult<Expr> {
        let mut args = vec![self.parse_bfact()?];
        while self.eat(&Token::And) {
            args.push(self.parse_bfact()?);
        }
        if args.len() == 1 {
            Ok(args.swap_remove(0))
        } else {
            Ok(Expr::Bool {
                op: BoolOp::And,
                args,
            })
        }
    }

    fn parse_bfact(&mut self) -> ParseResult<Expr> {
        match self.peek() {
            Some(Token::Not) => {
                self.pos += 1;
                Ok(Expr::Bool {
                    op: BoolOp::Not,
                    args: vec![self.parse_bfact()?],
                })
            }
            Some(Token::True) => {
                self.pos += 1;
                Ok(Expr::BoolConst(true))
            }
            Some(Token::False) => {
                self.pos += 1;
                Ok(Expr::BoolConst(false))
            }
            _ => {
                // `(` is ambiguous between a parenthesized boolean expression
                // and a parenthesized arithmetic operand of a comparison, so
                // try the comparison and backtrack on failure
                let save = self.pos;
                match self.parse_rel() {
                    Ok(rel) => Ok(rel),
                    Err(rel_err) => {
                        self.pos = save;
                        if self.eat(&Token::LParen) {
                            let inner = self.parse_bexp()?;
                            self.expect(&Token::RParen, "`)`")?;
                            Ok(inner)
                        } else {
                            Err(rel_err)
                        }
                    }
                }
            }
        }
    }

    fn parse_rel(&mut self) -> ParseResult<Expr> {
        let lhs = self.parse_aexp()?;
        let op = match self.peek() {
            Some(Token::Lt) => RelOp::Lt,
            Some(Token::Le) => RelOp::Le,
            Some(Token::Eq) => RelOp::Eq,
            Some(Token::Ge) => RelOp::Ge,
            Some(Token::Gt) => RelOp::Gt,
            _ => return Err(self.unexpected("a relational operator")),
        };
        self.pos += 1;
        let rhs = self.parse_aexp()?;
        Ok(Expr::Rel {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn parse_aexp(&mut self) -> ParseResult<Expr> {
        let mut acc = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => ArithOp::Add,
                Some(Token::Minus) => ArithOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_term()?;
            acc = append_operand(acc, op, rhs);
        }
        Ok(acc)
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut acc = self.parse_factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => ArithOp::Mul,
                Some(Token::Slash) => ArithOp::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_factor()?;
            acc = append_operand(acc, op, rhs);
        }
        Ok(acc)
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        match self.peek().cloned() {
            Some(Token::Int(digits)) => {
                let at = self.tokens[self.pos].1.start;
                self.pos += 1;
                digits
                    .parse::<i64>()
                    .map(Expr::IntConst)
                    .map_err(|_| ParseError::IntOutOfRange(at))
            }
            Some(Token::Ident(name)) => {
                self.pos += 1;
                Ok(Expr::Var(name.to_string()))
            }
            Some(Token::Minus) => {
                // unary minus desugars to a subtraction from zero
                self.pos += 1;
                let operand = self.parse_factor()?;
                Ok(Expr::Arith {
                    op: ArithOp::Sub,
                    args: vec![Expr::IntConst(0), operand],
                })
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let inner = self.parse_aexp()?;
                self.expect(&Token::RParen, "`)`")?;
                Ok(inner)
            }
            _ => Err(self.unexpected("an arithmetic operand")),
        }
    }
}

/// Extend a left-associative operator chain, flattening runs of one operator
fn append_operand(acc: Expr, op: ArithOp, rhs: Expr) -> Expr {
    match acc {
        Expr::Arith { op: prev, mut args } if prev == op => {
            args.push(rhs);
            Expr::Arith { op, args }
        }
        _ => Expr::Arith {
            op,
            args: vec![acc, rhs],
        },
    }
}
