// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Operator-precedence parser for EBA expression strings.
//!
//! Parses expressions like `speed > 50 & !(lane = 2 | accel <= 0.5)` into an
//! [`Expr`] tree whose leaves are already resolved against a [`Schema`].
//!
//! `&`, `|` and `!` between two word characters belong to the word, so
//! `dept = R&D` is one atom; write `a = 1 & b = 2` with spaces to combine.
//! Parentheses always group and cannot appear in literals.

use crate::common::schema::Schema;
use crate::error::{Error, Result};
use crate::expression::predicate::{CompareOp, Predicate};
use crate::expression::Expr;

/// Parses an expression string into an [`Expr`] against `schema`.
///
/// # Errors
///
/// Returns [`Error::MalformedExpression`] for syntax errors (atoms that are not
/// exactly three tokens, unknown operators, unbalanced parentheses, missing
/// operands) and [`Error::UnknownAttribute`] for attribute names the schema
/// does not declare.
///
/// # Examples
///
/// ```
/// use pierel::common::schema::Schema;
/// use pierel::common::value::AttributeType;
/// use pierel::expression::parser::parse_expression;
///
/// let schema = Schema::new("vehicle").with_attribute("speed", AttributeType::Int);
/// let expr = parse_expression("speed > 50 | speed < 5", &schema).unwrap();
/// assert_eq!(expr.leaf_count(), 2);
/// ```
pub fn parse_expression(input: &str, schema: &Schema) -> Result<Expr> {
    let tokens = Lexer::new(input).tokenize();
    if tokens.is_empty() {
        return Err(Error::malformed_expression("empty expression", 0));
    }
    let expr = Parser::new(schema).parse(&tokens, input.len())?;
    log::debug!(
        "compiled expression '{}' ({} predicate(s)) against schema '{}'",
        input.trim(),
        expr.leaf_count(),
        schema.name()
    );
    Ok(expr)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind<'a> {
    Atom(&'a str),
    And,
    Or,
    Not,
    Open,
    Close,
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    kind: TokenKind<'a>,
    position: usize,
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    atom_start: usize,
    tokens: Vec<Token<'a>>,
}

impl<'a> Lexer<'a> {
    const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            atom_start: 0,
            tokens: Vec::new(),
        }
    }

    fn tokenize(mut self) -> Vec<Token<'a>> {
        let bytes = self.input.as_bytes();
        while let Some(&c) = bytes.get(self.pos) {
            let kind = match c {
                b'(' => Some(TokenKind::Open),
                b')' => Some(TokenKind::Close),
                b'&' | b'|' | b'!' if self.inside_word(bytes) => None,
                b'&' => Some(TokenKind::And),
                b'|' => Some(TokenKind::Or),
                // `!=` belongs to an atom; a lone `!` negates.
                b'!' if bytes.get(self.pos + 1) != Some(&b'=') => Some(TokenKind::Not),
                _ => None,
            };
            if let Some(kind) = kind {
                self.flush_atom();
                self.tokens.push(Token {
                    kind,
                    position: self.pos,
                });
                self.atom_start = self.pos + 1;
            }
            self.pos += 1;
        }
        self.flush_atom();
        self.tokens
    }

    fn inside_word(&self, bytes: &[u8]) -> bool {
        let before = self
            .pos
            .checked_sub(1)
            .and_then(|i| bytes.get(i))
            .is_some_and(|&b| is_word_byte(b));
        before && bytes.get(self.pos + 1).is_some_and(|&b| is_word_byte(b))
    }

    fn flush_atom(&mut self) {
        let raw = &self.input[self.atom_start..self.pos];
        let text = raw.trim();
        if !text.is_empty() {
            let leading = raw.len() - raw.trim_start().len();
            self.tokens.push(Token {
                kind: TokenKind::Atom(text),
                position: self.atom_start + leading,
            });
        }
    }
}

const fn is_word_byte(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'(' | b')' | b'&' | b'|' | b'!')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Or,
    And,
    Not,
    Open,
}

impl Op {
    const fn precedence(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Or => 1,
            Self::And => 2,
            Self::Not => 3,
        }
    }

    const fn symbol(self) -> char {
        match self {
            Self::Or => '|',
            Self::And => '&',
            Self::Not => '!',
            Self::Open => '(',
        }
    }
}

struct Parser<'s> {
    schema: &'s Schema,
    operands: Vec<Expr>,
    operators: Vec<(Op, usize)>,
}

impl<'s> Parser<'s> {
    const fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            operands: Vec::new(),
            operators: Vec::new(),
        }
    }

    fn parse(mut self, tokens: &[Token<'_>], end: usize) -> Result<Expr> {
        // Alternates between expecting an operand (atom, `!`, `(`) and
        // expecting an operator (`&`, `|`, `)`).
        let mut expect_operand = true;

        for token in tokens {
            let pos = token.position;
            match (token.kind, expect_operand) {
                (TokenKind::Atom(text), true) => {
                    let leaf = self.compile_atom(text, pos)?;
                    self.operands.push(leaf);
                    expect_operand = false;
                }
                (TokenKind::Not, true) => self.operators.push((Op::Not, pos)),
                (TokenKind::Open, true) => self.operators.push((Op::Open, pos)),
                (TokenKind::And, false) => {
                    self.push_binary(Op::And, pos)?;
                    expect_operand = true;
                }
                (TokenKind::Or, false) => {
                    self.push_binary(Op::Or, pos)?;
                    expect_operand = true;
                }
                (TokenKind::Close, false) => self.close_group(pos)?,
                (TokenKind::Atom(text), false) => {
                    return Err(Error::malformed_expression(
                        format!("expected '&', '|' or ')' before '{text}'"),
                        pos,
                    ))
                }
                (kind, true) => {
                    return Err(Error::malformed_expression(
                        format!("expected predicate, '!' or '(' but found '{}'", kind_symbol(kind)),
                        pos,
                    ))
                }
                (kind, false) => {
                    return Err(Error::malformed_expression(
                        format!("unexpected '{}' after operand", kind_symbol(kind)),
                        pos,
                    ))
                }
            }
        }

        if expect_operand {
            return Err(Error::malformed_expression(
                "unexpected end of expression, expected operand",
                end,
            ));
        }
        while let Some((op, pos)) = self.operators.pop() {
            if op == Op::Open {
                return Err(Error::malformed_expression("unmatched '('", pos));
            }
            self.reduce(op, pos)?;
        }
        match (self.operands.pop(), self.operands.is_empty()) {
            (Some(expr), true) => Ok(expr),
            _ => Err(Error::malformed_expression("unbalanced expression", end)),
        }
    }

    fn push_binary(&mut self, op: Op, pos: usize) -> Result<()> {
        while let Some(&(top, top_pos)) = self.operators.last() {
            if top == Op::Open || top.precedence() < op.precedence() {
                break;
            }
            self.operators.pop();
            self.reduce(top, top_pos)?;
        }
        self.operators.push((op, pos));
        Ok(())
    }

    fn close_group(&mut self, pos: usize) -> Result<()> {
        loop {
            match self.operators.pop() {
                Some((Op::Open, _)) => return Ok(()),
                Some((op, op_pos)) => self.reduce(op, op_pos)?,
                None => return Err(Error::malformed_expression("unmatched ')'", pos)),
            }
        }
    }

    fn reduce(&mut self, op: Op, pos: usize) -> Result<()> {
        let missing =
            || Error::malformed_expression(format!("missing operand for '{}'", op.symbol()), pos);
        let expr = match op {
            Op::Not => Expr::Not(Box::new(self.operands.pop().ok_or_else(missing)?)),
            Op::And | Op::Or => {
                let rhs = self.operands.pop().ok_or_else(missing)?;
                let lhs = self.operands.pop().ok_or_else(missing)?;
                if op == Op::And {
                    Expr::And(Box::new(lhs), Box::new(rhs))
                } else {
                    Expr::Or(Box::new(lhs), Box::new(rhs))
                }
            }
            Op::Open => return Err(Error::malformed_expression("unmatched '('", pos)),
        };
        self.operands.push(expr);
        Ok(())
    }

    fn compile_atom(&self, text: &str, pos: usize) -> Result<Expr> {
        let parts: Vec<&str> = text.split_whitespace().collect();
        let [attribute, operator, literal] = parts[..] else {
            return Err(Error::malformed_expression(
                format!(
                    "predicate '{text}' must be exactly three tokens: <attribute> <operator> <literal>"
                ),
                pos,
            ));
        };
        let op = CompareOp::parse(operator).ok_or_else(|| {
            Error::malformed_expression(format!("unknown operator '{operator}'"), pos)
        })?;
        let (index, attr) = self.schema.resolve(attribute)?;
        Ok(Expr::Predicate(Predicate::new(
            attr.name.clone(),
            index,
            attr.ty,
            op,
            literal,
        )))
    }
}

const fn kind_symbol(kind: TokenKind<'_>) -> &'static str {
    match kind {
        TokenKind::Atom(_) => "predicate",
        TokenKind::And => "&",
        TokenKind::Or => "|",
        TokenKind::Not => "!",
        TokenKind::Open => "(",
        TokenKind::Close => ")",
    }
}
