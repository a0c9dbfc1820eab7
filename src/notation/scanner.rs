//! Pattern scanner.
//!
//! Turns a pattern string like `b (h w) c -> b h w c` into positioned tokens.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EinopsError, EinopsResult};

/// Half-open range of character offsets into the original pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn join(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Kind of a scanned token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Axis name, `[A-Za-z_][A-Za-z0-9_]*`.
    Ident(String),
    /// The literal `1`.
    Singleton,
    /// `...`
    Ellipsis,
    LParen,
    RParen,
    /// `->`
    Arrow,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "{}", name),
            TokenKind::Singleton => write!(f, "1"),
            TokenKind::Ellipsis => write!(f, "..."),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Arrow => write!(f, "->"),
        }
    }
}

/// A token with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }
}

#[inline]
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Scans a full pattern string into tokens.
///
/// Offsets are counted in characters, not bytes.
pub fn scan(pattern: &str) -> EinopsResult<Vec<Token>> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        match c {
            c if c.is_whitespace() => {
                pos += 1;
            }
            '(' => {
                tokens.push(Token::new(TokenKind::LParen, pos, pos + 1));
                pos += 1;
            }
            ')' => {
                tokens.push(Token::new(TokenKind::RParen, pos, pos + 1));
                pos += 1;
            }
            '.' => {
                let run = chars[pos..].iter().take_while(|&&c| c == '.').count();
                if run != 3 {
                    return Err(EinopsError::parse(
                        pattern,
                        alloc::format!("expected '...', found {} dot(s)", run),
                        Span::new(pos, pos + run),
                    ));
                }
                tokens.push(Token::new(TokenKind::Ellipsis, pos, pos + 3));
                pos += 3;
            }
            '-' => {
                if chars.get(pos + 1) != Some(&'>') {
                    return Err(EinopsError::parse(
                        pattern,
                        "expected '->' after '-'",
                        Span::new(pos, pos + 1),
                    ));
                }
                tokens.push(Token::new(TokenKind::Arrow, pos, pos + 2));
                pos += 2;
            }
            c if c.is_ascii_digit() => {
                let len = chars[pos..].iter().take_while(|&&c| is_ident_continue(c)).count();
                let literal: String = chars[pos..pos + len].iter().collect();
                if literal != "1" {
                    return Err(EinopsError::parse(
                        pattern,
                        alloc::format!(
                            "invalid token '{}', only the literal '1' may start with a digit",
                            literal
                        ),
                        Span::new(pos, pos + len),
                    ));
                }
                tokens.push(Token::new(TokenKind::Singleton, pos, pos + 1));
                pos += 1;
            }
            c if is_ident_start(c) => {
                let len = chars[pos..].iter().take_while(|&&c| is_ident_continue(c)).count();
                let name: String = chars[pos..pos + len].iter().collect();
                tokens.push(Token::new(TokenKind::Ident(name), pos, pos + len));
                pos += len;
            }
            _ => {
                return Err(EinopsError::parse(
                    pattern,
                    alloc::format!("invalid character '{}'", c),
                    Span::new(pos, pos + 1),
                ));
            }
        }
    }

    Ok(tokens)
}
