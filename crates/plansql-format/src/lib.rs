//! Token-tree rendering.
//!
//! [`format`] turns a parsed statement back into normalized SQL text:
//! keyword casing, single-space token separation, and line wrapping
//! before clause keywords once a line passes `wrap_after` columns.
//! [`dump`] renders the tree structure itself for debugging the
//! tokenizer boundary.

use plansql_ast::{Token, TokenKind, TokenTree};

/// Casing applied to [`TokenKind::Keyword`] leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeywordCase {
    #[default]
    Upper,
    Lower,
    Preserve,
}

/// Rendering options.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    pub keyword_case: KeywordCase,
    /// When false, original whitespace is kept verbatim and only
    /// keyword casing applies.
    pub reindent: bool,
    /// Column budget per line; clause keywords wrap past it.
    pub wrap_after: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            keyword_case: KeywordCase::Upper,
            reindent: true,
            wrap_after: 100,
        }
    }
}

/// Keywords a wrapped line may break in front of.
const CLAUSE_KEYWORDS: &[&str] = &[
    "AND", "CROSS", "EXCEPT", "FROM", "FULL", "GROUP", "HAVING", "INNER", "INTERSECT", "JOIN",
    "LEFT", "ON", "OR", "ORDER", "RIGHT", "SET", "UNION", "VALUES", "WHERE",
];

fn cased(token: &Token, case: KeywordCase) -> String {
    if token.kind == TokenKind::Keyword {
        match case {
            KeywordCase::Upper => return token.text.to_ascii_uppercase(),
            KeywordCase::Lower => return token.text.to_ascii_lowercase(),
            KeywordCase::Preserve => {}
        }
    }
    token.text.clone()
}

fn is_clause_keyword(token: &Token) -> bool {
    token.kind == TokenKind::Keyword
        && CLAUSE_KEYWORDS
            .iter()
            .any(|kw| kw.eq_ignore_ascii_case(&token.text))
}

fn no_space_before(text: &str) -> bool {
    matches!(text, "," | ";" | "." | ")")
}

fn no_space_after(text: &str) -> bool {
    matches!(text, "(" | ".")
}

/// Render one statement tree to normalized text.
pub fn format(tree: &TokenTree, options: &FormatOptions) -> String {
    if !options.reindent {
        let mut out = String::new();
        tree.for_each_leaf(&mut |token| out.push_str(&cased(token, options.keyword_case)));
        return out;
    }

    // Whitespace is rebuilt from scratch; comments survive as tokens.
    let leaves: Vec<&Token> = tree
        .leaves()
        .into_iter()
        .filter(|t| t.kind != TokenKind::Whitespace)
        .collect();

    let mut out = String::new();
    let mut line_len = 0usize;
    let mut prev: Option<&Token> = None;
    for token in leaves {
        let text = cased(token, options.keyword_case);
        let text_len = text.chars().count();
        let needs_space = prev.is_some_and(|p| !no_space_after(&p.text) && !no_space_before(&text));
        let wrap = line_len > 0
            && is_clause_keyword(token)
            && line_len + usize::from(needs_space) + text_len > options.wrap_after;
        let after_line_comment = prev.is_some_and(|p| {
            p.kind == TokenKind::Comment && p.text.starts_with("--")
        });
        if wrap || after_line_comment {
            out.push('\n');
            line_len = 0;
        } else if needs_space {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(&text);
        line_len += text_len;
        prev = Some(token);
    }
    out
}

/// Render the tree structure, one node per line, two-space indents.
pub fn dump(tree: &TokenTree) -> String {
    let mut out = String::new();
    dump_node(tree, 0, &mut out);
    out
}

fn dump_node(tree: &TokenTree, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    match tree {
        TokenTree::Leaf(token) => {
            out.push_str(&format!("{} {:?}\n", token.kind, token.text));
        }
        TokenTree::Group(group) => {
            out.push_str(&group.kind.to_string());
            out.push('\n');
            for child in &group.children {
                dump_node(child, depth + 1, out);
            }
        }
    }
}
