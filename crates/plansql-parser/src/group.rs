//! Token grouping: builds the [`TokenTree`] for one statement.
//!
//! Grouping is purely structural. Parens nest first, then two refine
//! passes run over every child list: an `IdentifierList` wraps a pure
//! name/comma interior of a parens group, and a `Comparison` wraps
//! `operand <comparison-op> operand` runs. Unbalanced parens never
//! fail; a stray `)` stays a leaf and an unterminated `(` group runs
//! to end of statement.

use std::iter::Peekable;
use std::vec::IntoIter;

use plansql_ast::{Group, GroupKind, Token, TokenKind, TokenTree};

use crate::lexer::is_comparison_operator;

/// Build the `Statement` tree for one statement's token run.
pub fn group_statement(tokens: Vec<Token>) -> TokenTree {
    let mut iter = tokens.into_iter().peekable();
    let children = build_level(&mut iter, false);
    let children = refine(children, GroupKind::Statement);
    TokenTree::Group(Group::new(GroupKind::Statement, children))
}

fn is_punct(token: &Token, text: &str) -> bool {
    token.kind == TokenKind::Punct && token.text == text
}

/// Nest parens. `in_parens` stops the level at the matching `)`,
/// which the caller consumes into the group.
fn build_level(iter: &mut Peekable<IntoIter<Token>>, in_parens: bool) -> Vec<TokenTree> {
    let mut children = Vec::new();
    while let Some(token) = iter.next_if(|t| !(in_parens && is_punct(t, ")"))) {
        if is_punct(&token, "(") {
            let mut group = vec![TokenTree::Leaf(token)];
            group.append(&mut build_level(iter, true));
            if let Some(close) = iter.next() {
                group.push(TokenTree::Leaf(close));
            }
            children.push(TokenTree::Group(Group::new(GroupKind::Parens, group)));
        } else {
            children.push(TokenTree::Leaf(token));
        }
    }
    children
}

/// Apply the refine passes to a child list, recursing into groups
/// before restructuring the current level.
fn refine(children: Vec<TokenTree>, kind: GroupKind) -> Vec<TokenTree> {
    let children: Vec<TokenTree> = children
        .into_iter()
        .map(|child| match child {
            TokenTree::Group(group) => {
                let refined = refine(group.children, group.kind);
                TokenTree::Group(Group::new(group.kind, refined))
            }
            leaf @ TokenTree::Leaf(_) => leaf,
        })
        .collect();
    let children = if kind == GroupKind::Parens {
        wrap_identifier_list(children)
    } else {
        children
    };
    wrap_comparisons(children)
}

fn is_leaf_of(node: &TokenTree, kind: TokenKind) -> bool {
    matches!(node, TokenTree::Leaf(t) if t.kind == kind)
}

fn is_trivia_leaf(node: &TokenTree) -> bool {
    matches!(node, TokenTree::Leaf(t) if t.kind.is_trivia())
}

fn is_comma(node: &TokenTree) -> bool {
    matches!(node, TokenTree::Leaf(t) if is_punct(t, ","))
}

/// Wrap a parens interior of the shape `name, name, ...` into an
/// `IdentifierList` group. Anything else is left alone.
fn wrap_identifier_list(children: Vec<TokenTree>) -> Vec<TokenTree> {
    let opens = matches!(children.first(), Some(TokenTree::Leaf(t)) if is_punct(t, "("));
    if !opens {
        return children;
    }
    let close_idx = if matches!(children.last(), Some(TokenTree::Leaf(t)) if is_punct(t, ")")) {
        children.len() - 1
    } else {
        children.len()
    };
    let interior = &children[1..close_idx];
    let names = interior.iter().filter(|n| is_leaf_of(n, TokenKind::Name)).count();
    let commas = interior.iter().filter(|n| is_comma(n)).count();
    let listlike = interior
        .iter()
        .all(|n| is_leaf_of(n, TokenKind::Name) || is_comma(n) || is_trivia_leaf(n));
    if names < 2 || commas == 0 || !listlike {
        return children;
    }

    let mut out = Vec::with_capacity(children.len() - interior.len() + 1);
    let list = TokenTree::Group(Group::new(GroupKind::IdentifierList, interior.to_vec()));
    out.push(children[0].clone());
    out.push(list);
    out.extend_from_slice(&children[close_idx..]);
    out
}

/// An operand a `Comparison` may bind: a name, a literal, or a parens
/// group. A `Comparison` group itself is not an operand, so chains
/// like `a = b = c` group once and stop.
fn is_operand(node: &TokenTree) -> bool {
    match node {
        TokenTree::Leaf(t) => matches!(t.kind, TokenKind::Name | TokenKind::Literal),
        TokenTree::Group(g) => g.kind == GroupKind::Parens,
    }
}

fn operand_before(children: &[TokenTree], idx: usize) -> Option<usize> {
    children[..idx]
        .iter()
        .rposition(|n| !is_trivia_leaf(n))
        .filter(|&i| is_operand(&children[i]))
}

fn operand_after(children: &[TokenTree], idx: usize) -> Option<usize> {
    children[idx + 1..]
        .iter()
        .position(|n| !is_trivia_leaf(n))
        .map(|i| idx + 1 + i)
        .filter(|&i| is_operand(&children[i]))
}

/// Wrap `operand <op> operand` runs (trivia between kept inside the
/// group) left to right, non-overlapping.
fn wrap_comparisons(mut children: Vec<TokenTree>) -> Vec<TokenTree> {
    let mut i = 0;
    while i < children.len() {
        let comparison = matches!(
            &children[i],
            TokenTree::Leaf(t) if t.kind == TokenKind::Operator && is_comparison_operator(&t.text)
        );
        if comparison {
            if let (Some(lhs), Some(rhs)) =
                (operand_before(&children, i), operand_after(&children, i))
            {
                let grouped: Vec<TokenTree> = children.splice(lhs..=rhs, std::iter::empty()).collect();
                children.insert(lhs, TokenTree::Group(Group::new(GroupKind::Comparison, grouped)));
                i = lhs + 1;
                continue;
            }
        }
        i += 1;
    }
    children
}
