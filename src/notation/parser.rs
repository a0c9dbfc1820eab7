//! Einops pattern parser.
//!
//! Parses strings like "b (h w) c -> b h w c" into a structured EinopsAst.

use alloc::vec::Vec;

use super::ast::{EinopsAst, PatternMetadata};
use super::axis::AxisPattern;
use super::scanner::{Span, Token, TokenKind, scan};
use crate::error::{EinopsError, EinopsResult};

/// Parses an einops pattern string.
///
/// # Grammar
///
/// ```text
/// pattern     ::= side '->' side
/// side        ::= (term (ws term)*)?
/// term        ::= identifier | '1' | '...' | '(' term* ')'
/// identifier  ::= [A-Za-z_][A-Za-z0-9_]*
/// ```
///
/// An empty side is legal and denotes a rank-0 tensor. Semantic checks
/// (duplicates, ellipsis count, empty groups) are left to the validator.
///
/// # Examples
///
/// ```ignore
/// let ast = parse_pattern("h w -> w h")?;                  // Transpose
/// let ast = parse_pattern("b (h w) c -> b h w c")?;        // Split
/// let ast = parse_pattern("batch ... c -> batch c ...")?;  // Ellipsis
/// ```
pub fn parse_pattern(pattern: &str) -> EinopsResult<EinopsAst> {
    let tokens = scan(pattern)?;

    let arrows: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| token.kind == TokenKind::Arrow)
        .map(|(i, _)| i)
        .collect();

    let arrow_idx = match arrows.as_slice() {
        [idx] => *idx,
        [] => {
            return Err(EinopsError::parse(
                pattern,
                "missing '->'",
                Span::new(0, pattern.chars().count()),
            ));
        }
        [_, second, ..] => {
            return Err(EinopsError::parse(
                pattern,
                "pattern must contain exactly one '->'",
                tokens[*second].span,
            ));
        }
    };

    let input = parse_side(pattern, &tokens[..arrow_idx])?;
    let output = parse_side(pattern, &tokens[arrow_idx + 1..])?;

    let metadata = PatternMetadata {
        original: pattern.into(),
        input_tokens: arrow_idx,
        output_tokens: tokens.len() - arrow_idx - 1,
        arrow_position: tokens[arrow_idx].span.start,
    };

    Ok(EinopsAst::new(input, output).with_metadata(metadata))
}

/// Parses the tokens of one side into terms.
fn parse_side(pattern: &str, tokens: &[Token]) -> EinopsResult<Vec<AxisPattern>> {
    // Open groups: the '(' span and the terms collected before it.
    let mut stack: Vec<(Span, Vec<AxisPattern>)> = Vec::new();
    let mut current: Vec<AxisPattern> = Vec::new();

    for token in tokens {
        let term = match &token.kind {
            TokenKind::Ident(name) => AxisPattern::Simple {
                name: name.clone(),
                span: token.span,
            },
            TokenKind::Singleton => AxisPattern::Singleton { span: token.span },
            TokenKind::Ellipsis => AxisPattern::Ellipsis { span: token.span },
            TokenKind::LParen => {
                stack.push((token.span, core::mem::take(&mut current)));
                continue;
            }
            TokenKind::RParen => {
                let Some((open, parent)) = stack.pop() else {
                    return Err(EinopsError::parse(pattern, "unmatched ')'", token.span));
                };
                let axes = core::mem::replace(&mut current, parent);
                AxisPattern::Composite {
                    axes,
                    span: open.join(token.span),
                }
            }
            TokenKind::Arrow => {
                return Err(EinopsError::parse(pattern, "unexpected '->'", token.span));
            }
        };
        current.push(term);
    }

    if let Some((open, _)) = stack.pop() {
        return Err(EinopsError::parse(pattern, "unclosed '('", open));
    }

    Ok(current)
}
