//! Parameter substitution over token trees.
//!
//! Pure, homomorphic rewrite: a `Name` leaf whose text exactly equals
//! a parameter name becomes a `Literal` leaf carrying the compiled
//! value; every other leaf is kept as-is, and every group is rebuilt
//! with its own tag, child order, and child count.

use plansql_ast::{Group, Token, TokenKind, TokenTree};
use plansql_plan::ParameterMap;

/// Rewrite `tree`, replacing parameter references with compiled
/// values from `params`. The input is not mutated.
///
/// Matching is case-sensitive and exact, and single-pass: a spliced
/// value whose text happens to equal another parameter name is never
/// substituted again (the new leaf is a `Literal`, and substitution
/// only inspects `Name` leaves of the original tree).
pub fn substitute(tree: &TokenTree, params: &ParameterMap) -> TokenTree {
    match tree {
        TokenTree::Leaf(token) => TokenTree::Leaf(substitute_leaf(token, params)),
        TokenTree::Group(group) => {
            let children = group
                .children
                .iter()
                .map(|child| substitute(child, params))
                .collect();
            TokenTree::Group(Group::new(group.kind, children))
        }
    }
}

fn substitute_leaf(token: &Token, params: &ParameterMap) -> Token {
    if token.kind == TokenKind::Name {
        if let Some(param) = params.get(&token.text) {
            return Token::new(TokenKind::Literal, param.compiled_value.clone());
        }
    }
    token.clone()
}
