//! Hand-written SQL scanner.
//!
//! Produces a flat [`Token`] stream that preserves the input exactly:
//! concatenating every token's text reproduces the source. Lexing
//! never fails; unterminated strings and comments simply run to end of
//! input. Dialect quirks covered are the T-SQL ones a showplan carries:
//! `@param` / `#temp` names, `[bracketed]` identifiers, `''` string
//! escapes, and `0x` binary literals.

use memchr::{memchr, memmem};
use plansql_ast::{Token, TokenKind};

/// Reserved words recognized as [`TokenKind::Keyword`].
///
/// Matching is ASCII case-insensitive. The list covers the statement
/// and clause vocabulary that matters for rendering; anything missing
/// lexes as a plain `Name`, which substitution and formatting both
/// tolerate.
const KEYWORDS: &[&str] = &[
    "ADD", "ALL", "ALTER", "AND", "AS", "ASC", "BEGIN", "BETWEEN", "BY", "CASE", "CAST", "CHECK",
    "COLUMN", "COMMIT", "CONSTRAINT", "CREATE", "CROSS", "CURRENT", "DECLARE", "DEFAULT", "DELETE",
    "DESC", "DISTINCT", "DROP", "ELSE", "END", "EXCEPT", "EXEC", "EXECUTE", "EXISTS", "FETCH",
    "FOR", "FOREIGN", "FROM", "FULL", "GROUP", "HAVING", "IF", "IN", "INDEX", "INNER", "INSERT",
    "INTERSECT", "INTO", "IS", "JOIN", "KEY", "LEFT", "LIKE", "LIMIT", "MERGE", "NOT", "NULL",
    "OFFSET", "ON", "OPTION", "OR", "ORDER", "OUTER", "OVER", "PARTITION", "PRIMARY", "PRINT",
    "PROCEDURE", "RETURN", "RIGHT", "ROLLBACK", "SELECT", "SET", "TABLE", "THEN", "TOP",
    "TRANSACTION", "TRUNCATE", "UNION", "UNIQUE", "UPDATE", "VALUES", "VIEW", "WHEN", "WHERE",
    "WHILE", "WITH",
];

/// Multi-character operators, longest first so prefixes never shadow.
const MULTI_CHAR_OPERATORS: &[&str] = &[
    "<=", ">=", "<>", "!=", "!<", "!>", "||", "+=", "-=", "*=", "/=", "%=", "&=", "^=", "|=", "::",
];

const SINGLE_CHAR_OPERATORS: &[char] = &['=', '<', '>', '+', '-', '*', '/', '%', '&', '|', '^', '~'];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|kw| kw.eq_ignore_ascii_case(word))
}

/// Comparison operators, the only operator class grouping cares about.
pub fn is_comparison_operator(text: &str) -> bool {
    matches!(text, "=" | "<" | ">" | "<=" | ">=" | "<>" | "!=" | "!<" | "!>")
}

fn is_name_start(ch: char) -> bool {
    ch.is_alphabetic() || matches!(ch, '_' | '@' | '#')
}

fn is_name_continue(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '@' | '#' | '$')
}

/// Tokenize `input` into a lossless token stream.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < input.len() {
        let rest = &input[pos..];
        let ch = rest.chars().next().unwrap_or_default();
        let (kind, len) = match ch {
            c if c.is_whitespace() => (TokenKind::Whitespace, scan_whitespace(rest)),
            '-' if rest.starts_with("--") => (TokenKind::Comment, scan_line_comment(rest)),
            '/' if rest.starts_with("/*") => (TokenKind::Comment, scan_block_comment(rest)),
            '\'' => (TokenKind::Literal, scan_quoted(rest, '\'')),
            '"' => (TokenKind::Name, scan_quoted(rest, '"')),
            '[' => (TokenKind::Name, scan_bracketed(rest)),
            c if c.is_ascii_digit() => (TokenKind::Literal, scan_number(rest)),
            '.' if starts_decimal(rest) => (TokenKind::Literal, scan_number(rest)),
            c if is_name_start(c) => scan_name(rest),
            _ => scan_operator_or_punct(rest, ch),
        };
        debug_assert!(len > 0, "lexer must always make progress");
        tokens.push(Token::new(kind, &rest[..len]));
        pos += len;
    }
    tokens
}

fn scan_whitespace(rest: &str) -> usize {
    rest.find(|c: char| !c.is_whitespace()).unwrap_or(rest.len())
}

fn scan_line_comment(rest: &str) -> usize {
    // Newline stays outside the comment so it lexes as whitespace.
    memchr(b'\n', rest.as_bytes()).unwrap_or(rest.len())
}

fn scan_block_comment(rest: &str) -> usize {
    memmem::find(&rest.as_bytes()[2..], b"*/").map_or(rest.len(), |i| 2 + i + 2)
}

/// Scan a `quote`-delimited token with doubled-quote escapes, e.g.
/// `'it''s'`. Unterminated quoting runs to end of input.
fn scan_quoted(rest: &str, quote: char) -> usize {
    let bytes = rest.as_bytes();
    let q = quote as u8;
    let mut pos = 1;
    while pos < bytes.len() {
        match memchr(q, &bytes[pos..]) {
            Some(i) => {
                let close = pos + i;
                if bytes.get(close + 1) == Some(&q) {
                    pos = close + 2;
                } else {
                    return close + 1;
                }
            }
            None => break,
        }
    }
    rest.len()
}

/// `[bracketed identifier]` with `]]` escapes.
fn scan_bracketed(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    let mut pos = 1;
    while pos < bytes.len() {
        match memchr(b']', &bytes[pos..]) {
            Some(i) => {
                let close = pos + i;
                if bytes.get(close + 1) == Some(&b']') {
                    pos = close + 2;
                } else {
                    return close + 1;
                }
            }
            None => break,
        }
    }
    rest.len()
}

fn starts_decimal(rest: &str) -> bool {
    rest.as_bytes().get(1).is_some_and(u8::is_ascii_digit)
}

/// Numbers: integers, decimals, exponents, and `0x` binary literals
/// (showplan compiled values use the latter for varbinary).
fn scan_number(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    if rest.len() >= 2 && bytes[0] == b'0' && (bytes[1] == b'x' || bytes[1] == b'X') {
        let tail = bytes[2..]
            .iter()
            .take_while(|b| b.is_ascii_hexdigit())
            .count();
        return 2 + tail;
    }
    let mut pos = 0;
    let mut seen_dot = false;
    while pos < bytes.len() {
        match bytes[pos] {
            b'0'..=b'9' => pos += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                pos += 1;
            }
            b'e' | b'E' => {
                let mut end = pos + 1;
                if matches!(bytes.get(end), Some(b'+' | b'-')) {
                    end += 1;
                }
                let digits = bytes[end..].iter().take_while(|b| b.is_ascii_digit()).count();
                if digits == 0 {
                    break;
                }
                return end + digits;
            }
            _ => break,
        }
    }
    pos
}

fn scan_name(rest: &str) -> (TokenKind, usize) {
    let len = rest
        .find(|c: char| !is_name_continue(c))
        .unwrap_or(rest.len());
    let word = &rest[..len];
    // `N'...'` national string literal: the prefix belongs to the string.
    if (word == "N" || word == "n") && rest[len..].starts_with('\'') {
        return (TokenKind::Literal, len + scan_quoted(&rest[len..], '\''));
    }
    let kind = if is_keyword(word) {
        TokenKind::Keyword
    } else {
        TokenKind::Name
    };
    (kind, len)
}

fn scan_operator_or_punct(rest: &str, ch: char) -> (TokenKind, usize) {
    for op in MULTI_CHAR_OPERATORS {
        if rest.starts_with(op) {
            return (TokenKind::Operator, op.len());
        }
    }
    if SINGLE_CHAR_OPERATORS.contains(&ch) {
        return (TokenKind::Operator, ch.len_utf8());
    }
    // `(` `)` `,` `;` `.` and anything the scanner has no rule for.
    (TokenKind::Punct, ch.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(sql: &str) -> Vec<(TokenKind, String)> {
        tokenize(sql)
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_tokenize_is_lossless() {
        let sql = "SELECT *\nFROM [my table] -- trailing\nWHERE id = @id AND x <> 'a''b';";
        let joined: String = tokenize(sql).into_iter().map(|t| t.text).collect();
        assert_eq!(joined, sql);
    }

    #[test]
    fn test_parameter_reference_lexes_as_name() {
        let toks = kinds("WHERE id = @id");
        assert!(toks.contains(&(TokenKind::Name, "@id".to_string())));
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let toks = kinds("select From wHeRe");
        let keywords = toks.iter().filter(|(k, _)| *k == TokenKind::Keyword).count();
        assert_eq!(keywords, 3);
    }

    #[test]
    fn test_string_with_doubled_quote_is_one_token() {
        let toks = kinds("'it''s'");
        assert_eq!(toks, vec![(TokenKind::Literal, "'it''s'".to_string())]);
    }

    #[test]
    fn test_national_string_literal() {
        let toks = kinds("N'abc'");
        assert_eq!(toks, vec![(TokenKind::Literal, "N'abc'".to_string())]);
    }

    #[test]
    fn test_bracketed_identifier_with_escape() {
        let toks = kinds("[a]]b]");
        assert_eq!(toks, vec![(TokenKind::Name, "[a]]b]".to_string())]);
    }

    #[test]
    fn test_hex_literal() {
        let toks = kinds("0x1FAB");
        assert_eq!(toks, vec![(TokenKind::Literal, "0x1FAB".to_string())]);
    }

    #[test]
    fn test_numbers_decimal_and_exponent() {
        assert_eq!(kinds("1.5"), vec![(TokenKind::Literal, "1.5".to_string())]);
        assert_eq!(
            kinds("2e10"),
            vec![(TokenKind::Literal, "2e10".to_string())]
        );
        assert_eq!(
            kinds(".25"),
            vec![(TokenKind::Literal, ".25".to_string())]
        );
    }

    #[test]
    fn test_multi_char_operator_not_split() {
        let toks = kinds("a <= b");
        assert!(toks.contains(&(TokenKind::Operator, "<=".to_string())));
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        let toks = kinds("'oops");
        assert_eq!(toks, vec![(TokenKind::Literal, "'oops".to_string())]);
    }

    #[test]
    fn test_block_comment() {
        let toks = kinds("/* hi */1");
        assert_eq!(
            toks,
            vec![
                (TokenKind::Comment, "/* hi */".to_string()),
                (TokenKind::Literal, "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_line_comment_excludes_newline() {
        let toks = kinds("-- c\nx");
        assert_eq!(toks[0], (TokenKind::Comment, "-- c".to_string()));
        assert_eq!(toks[1], (TokenKind::Whitespace, "\n".to_string()));
    }
}
