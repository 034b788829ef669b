//! Algebraic properties of parameter substitution over generated
//! trees: shape preservation and non-parameter leaf invariance.

use plansql_ast::{GroupKind, Token, TokenKind, TokenTree};
use plansql_core::substitute;
use plansql_plan::{Parameter, ParameterMap};
use proptest::prelude::*;

fn arb_token_kind() -> impl Strategy<Value = TokenKind> {
    prop_oneof![
        Just(TokenKind::Keyword),
        Just(TokenKind::Name),
        Just(TokenKind::Literal),
        Just(TokenKind::Operator),
        Just(TokenKind::Punct),
        Just(TokenKind::Whitespace),
    ]
}

fn arb_group_kind() -> impl Strategy<Value = GroupKind> {
    prop_oneof![
        Just(GroupKind::Statement),
        Just(GroupKind::Parens),
        Just(GroupKind::Comparison),
        Just(GroupKind::IdentifierList),
    ]
}

fn arb_tree() -> impl Strategy<Value = TokenTree> {
    let leaf = (arb_token_kind(), "[@a-z0-9]{1,6}")
        .prop_map(|(kind, text)| TokenTree::Leaf(Token::new(kind, text)));
    leaf.prop_recursive(4, 48, 6, |inner| {
        (arb_group_kind(), prop::collection::vec(inner, 0..6))
            .prop_map(|(kind, children)| TokenTree::group(kind, children))
    })
}

fn arb_params() -> impl Strategy<Value = ParameterMap> {
    prop::collection::vec(("[@a-z0-9]{1,6}", "[0-9']{1,5}"), 0..4).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(name, value)| {
                (
                    name,
                    Parameter {
                        data_type: "int".to_string(),
                        compiled_value: value,
                    },
                )
            })
            .collect()
    })
}

/// Group tags and child counts, preorder.
fn shape(tree: &TokenTree, out: &mut Vec<(GroupKind, usize)>) {
    if let TokenTree::Group(group) = tree {
        out.push((group.kind, group.children.len()));
        for child in &group.children {
            shape(child, out);
        }
    }
}

proptest! {
    #[test]
    fn substitution_preserves_tree_shape(tree in arb_tree(), params in arb_params()) {
        let result = substitute(&tree, &params);
        let mut before = Vec::new();
        let mut after = Vec::new();
        shape(&tree, &mut before);
        shape(&result, &mut after);
        prop_assert_eq!(before, after);
    }

    #[test]
    fn non_parameter_leaves_are_invariant(tree in arb_tree(), params in arb_params()) {
        let result = substitute(&tree, &params);
        let before = tree.leaves();
        let after = result.leaves();
        prop_assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            if b.kind == TokenKind::Name && params.get(&b.text).is_some() {
                prop_assert_eq!(a.kind, TokenKind::Literal);
                prop_assert_eq!(&a.text, &params.get(&b.text).unwrap().compiled_value);
            } else {
                prop_assert_eq!(*b, *a);
            }
        }
    }

    #[test]
    fn substitution_with_empty_map_is_identity(tree in arb_tree()) {
        prop_assert_eq!(substitute(&tree, &ParameterMap::new()), tree);
    }
}
