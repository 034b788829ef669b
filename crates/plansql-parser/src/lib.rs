//! SQL lexer and token-tree builder.
//!
//! `tokenize` produces a lossless flat token stream, `parse` splits it
//! into statements at top-level `;` and groups each statement into a
//! [`TokenTree`](plansql_ast::TokenTree). Lexing and grouping never
//! fail on arbitrary input; malformed SQL degrades to flat leaves.

pub mod group;
pub mod lexer;

use plansql_ast::{Token, TokenKind, TokenTree};
use tracing::debug;

pub use group::group_statement;
pub use lexer::{is_comparison_operator, is_keyword, tokenize};

/// Split a token stream into statements at top-level `;`. A `;`
/// nested inside parens does not end the statement. The terminating
/// `;` stays with its statement. Trailing trivia after the last `;`
/// forms a final (whitespace-only) statement, which callers filter
/// as needed.
pub fn split_statements(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut statements = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0usize;
    for token in tokens {
        if token.kind == TokenKind::Punct {
            match token.text.as_str() {
                "(" => depth += 1,
                ")" => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        let terminator = depth == 0 && token.kind == TokenKind::Punct && token.text == ";";
        current.push(token);
        if terminator {
            statements.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        statements.push(current);
    }
    statements
}

/// Parse `sql` into one tree per statement, whitespace-only
/// statements included.
pub fn parse(sql: &str) -> Vec<TokenTree> {
    let trees: Vec<TokenTree> = split_statements(tokenize(sql))
        .into_iter()
        .map(group_statement)
        .collect();
    debug!(statements = trees.len(), "parsed sql text");
    trees
}

/// Parse `sql` and keep only the first statement, if any.
///
/// This is what the plan reader uses for `StatementText`: a statement
/// attribute holds one statement, so anything past the first `;` is
/// discarded.
pub fn parse_first(sql: &str) -> Option<TokenTree> {
    parse(sql).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_semicolon_with_statement() {
        let stmts = parse("SELECT 1; SELECT 2;\n");
        assert_eq!(stmts.len(), 3);
        assert_eq!(stmts[0].verbatim(), "SELECT 1;");
        assert_eq!(stmts[1].verbatim(), " SELECT 2;");
        assert!(stmts[2].is_whitespace_only());
    }

    #[test]
    fn test_unterminated_statement_is_kept() {
        let stmts = parse("SELECT 1");
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].verbatim(), "SELECT 1");
    }

    #[test]
    fn test_parse_first_takes_first_statement_only() {
        let first = parse_first("SELECT 1; DROP TABLE t;").unwrap();
        assert_eq!(first.verbatim(), "SELECT 1;");
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse_first("").is_none());
    }

    #[test]
    fn test_comment_only_statement_is_whitespace_only() {
        let stmts = parse("-- header comment\n");
        assert_eq!(stmts.len(), 1);
        assert!(stmts[0].is_whitespace_only());
    }

    #[test]
    fn test_semicolon_inside_string_does_not_split() {
        let stmts = parse("SELECT 'a;b'");
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn test_semicolon_inside_parens_does_not_split() {
        let stmts = parse("EXEC p (a; b); SELECT 1");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].verbatim(), "EXEC p (a; b);");
    }

    #[test]
    fn test_stray_close_paren_does_not_swallow_semicolon() {
        let stmts = parse("SELECT a); SELECT b");
        assert_eq!(stmts.len(), 2);
    }
}
