//! Profile activation expressions: `spring.config.activate.on-profile`.
//!
//! ```text
//! expr   := or
//! or     := and ( '|' and )*
//! and    := not ( '&' not )*
//! not    := '!' not | atom
//! atom   := IDENT | '(' expr ')'
//! IDENT  := any non-empty run of non-whitespace non-operator characters
//! ```
//!
//! `!` binds tightest, then `&`, then `|`. Whitespace is insignificant.

use std::fmt;

use indexmap::IndexSet;

/// A parsed profile boolean expression, ready to be evaluated repeatedly
/// against different active-profile sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileExpr {
    Ident(String),
    Not(Box<ProfileExpr>),
    And(Box<ProfileExpr>, Box<ProfileExpr>),
    Or(Box<ProfileExpr>, Box<ProfileExpr>),
}

/// A syntax error encountered while parsing an activation expression.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("invalid profile expression at position {position}: {message}")]
pub struct ExprError {
    pub position: usize,
    pub message: String,
}

impl ProfileExpr {
    /// Parses an `on-profile` value.
    ///
    /// Supports both the modern boolean grammar (`prod & !staging`) and the
    /// legacy comma-separated list form, which is logical OR of its names.
    /// The legacy form only kicks in when none of the boolean operators
    /// appear anywhere in the input.
    pub fn parse(input: &str) -> Result<Self, ExprError> {
        if !input.contains(['!', '&', '|', '(', ')']) && input.contains(',') {
            let mut names = input.split(',').map(str::trim).filter(|s| !s.is_empty());
            let Some(first) = names.next() else {
                return Err(ExprError {
                    position: 0,
                    message: "empty profile expression".into(),
                });
            };
            let mut expr = ProfileExpr::Ident(first.to_string());
            for name in names {
                expr = ProfileExpr::Or(Box::new(expr), Box::new(ProfileExpr::Ident(name.into())));
            }
            return Ok(expr);
        }

        let tokens = tokenize(input)?;
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.parse_or()?;
        if parser.pos != parser.tokens.len() {
            return Err(ExprError {
                position: parser.pos,
                message: "unexpected trailing input".into(),
            });
        }
        Ok(expr)
    }

    /// Evaluates this expression against the given active-profile set.
    pub fn eval(&self, active: &IndexSet<String>) -> bool {
        match self {
            ProfileExpr::Ident(name) => active.contains(name),
            ProfileExpr::Not(inner) => !inner.eval(active),
            ProfileExpr::And(a, b) => a.eval(active) && b.eval(active),
            ProfileExpr::Or(a, b) => a.eval(active) || b.eval(active),
        }
    }

    /// Collects every profile name this expression references, used to
    /// recognize requested profiles that match a real activation expression
    /// rather than just a group name.
    pub fn collect_idents(&self, out: &mut IndexSet<String>) {
        match self {
            ProfileExpr::Ident(name) => {
                out.insert(name.clone());
            },
            ProfileExpr::Not(inner) => inner.collect_idents(out),
            ProfileExpr::And(a, b) | ProfileExpr::Or(a, b) => {
                a.collect_idents(out);
                b.collect_idents(out);
            },
        }
    }
}

impl fmt::Display for ProfileExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileExpr::Ident(name) => write!(f, "{name}"),
            ProfileExpr::Not(inner) => write!(f, "!{inner}"),
            ProfileExpr::And(a, b) => write!(f, "({a} & {b})"),
            ProfileExpr::Or(a, b) => write!(f, "({a} | {b})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Not,
    And,
    Or,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '!' => {
                tokens.push(Token::Not);
                i += 1;
            },
            '&' => {
                tokens.push(Token::And);
                i += 1;
            },
            '|' => {
                tokens.push(Token::Or);
                i += 1;
            },
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            },
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            },
            _ => {
                let start = i;
                while i < chars.len() && !matches!(chars[i], '!' | '&' | '|' | '(' | ')')
                    && !chars[i].is_whitespace()
                {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                if ident.is_empty() {
                    return Err(ExprError {
                        position: start,
                        message: format!("unexpected character '{c}'"),
                    });
                }
                tokens.push(Token::Ident(ident));
            },
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn parse_or(&mut self) -> Result<ProfileExpr, ExprError> {
        let mut expr = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.pos += 1;
            let rhs = self.parse_and()?;
            expr = ProfileExpr::Or(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<ProfileExpr, ExprError> {
        let mut expr = self.parse_not()?;
        while matches!(self.peek(), Some(Token::And)) {
            self.pos += 1;
            let rhs = self.parse_not()?;
            expr = ProfileExpr::And(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_not(&mut self) -> Result<ProfileExpr, ExprError> {
        if matches!(self.peek(), Some(Token::Not)) {
            self.pos += 1;
            let inner = self.parse_not()?;
            return Ok(ProfileExpr::Not(Box::new(inner)));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<ProfileExpr, ExprError> {
        match self.tokens.get(self.pos) {
            Some(Token::Ident(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(ProfileExpr::Ident(name))
            },
            Some(Token::LParen) => {
                self.pos += 1;
                let expr = self.parse_or()?;
                match self.tokens.get(self.pos) {
                    Some(Token::RParen) => {
                        self.pos += 1;
                        Ok(expr)
                    },
                    _ => Err(ExprError {
                        position: self.pos,
                        message: "expected ')'".into(),
                    }),
                }
            },
            _ => Err(ExprError {
                position: self.pos,
                message: "expected a profile name or '('".into(),
            }),
        }
    }
}
