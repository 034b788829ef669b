//! Token and token-tree node types for parsed SQL.
//!
//! A statement is represented as a [`TokenTree`]: either a single
//! [`Token`] leaf or a [`Group`] holding an ordered sequence of child
//! trees plus a [`GroupKind`] tag. The tag is what a rewriter switches
//! on when it rebuilds a group, so a rebuilt tree always carries the
//! same kinds, child counts, and ordering as its input.
//!
//! This crate is types only; lexing and grouping live in
//! `plansql-parser`, rendering in `plansql-format`.

use std::fmt;

/// Lexical category of a [`Token`].
///
/// Only `Name` matters to parameter substitution (identifiers and
/// parameter references such as `@id` both lex as `Name`); every other
/// kind is opaque to rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A reserved word (`SELECT`, `FROM`, ...).
    Keyword,
    /// An identifier or parameter reference (`users`, `@id`, `#tmp`,
    /// `[quoted name]`, `"quoted name"`).
    Name,
    /// A numeric or string literal, or a compiled value spliced in by
    /// substitution.
    Literal,
    /// An arithmetic or comparison operator (`+`, `=`, `<>`, ...).
    Operator,
    /// Punctuation: `(` `)` `,` `;` `.`.
    Punct,
    /// A run of whitespace.
    Whitespace,
    /// A `--` line comment or `/* */` block comment.
    Comment,
}

impl TokenKind {
    /// Whitespace and comments are insignificant for correlation and
    /// substitution.
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Keyword => "Keyword",
            Self::Name => "Name",
            Self::Literal => "Literal",
            Self::Operator => "Operator",
            Self::Punct => "Punct",
            Self::Whitespace => "Whitespace",
            Self::Comment => "Comment",
        };
        f.write_str(name)
    }
}

/// A single lexical unit: a `(kind, text)` pair.
///
/// `text` is always the exact source spelling; the lexer performs no
/// case folding or unquoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Tag identifying what a [`Group`] represents.
///
/// The set is closed: rewriters match on the tag and rebuild the same
/// variant, never duplicate a group reflectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// One complete SQL statement (the root of every parsed tree).
    Statement,
    /// A parenthesized group, including the surrounding `(` and `)`.
    Parens,
    /// `lhs <comparison-op> rhs` with any interleaved trivia.
    Comparison,
    /// A pure `name, name, ...` sequence inside parens.
    IdentifierList,
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Statement => "Statement",
            Self::Parens => "Parens",
            Self::Comparison => "Comparison",
            Self::IdentifierList => "IdentifierList",
        };
        f.write_str(name)
    }
}

/// A composite node: an ordered sequence of child trees under one
/// [`GroupKind`] tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub kind: GroupKind,
    pub children: Vec<TokenTree>,
}

impl Group {
    pub const fn new(kind: GroupKind, children: Vec<TokenTree>) -> Self {
        Self { kind, children }
    }
}

/// A parsed SQL fragment: a leaf token or a tagged group of children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenTree {
    Leaf(Token),
    Group(Group),
}

impl TokenTree {
    pub fn leaf(kind: TokenKind, text: impl Into<String>) -> Self {
        Self::Leaf(Token::new(kind, text))
    }

    pub const fn group(kind: GroupKind, children: Vec<TokenTree>) -> Self {
        Self::Group(Group::new(kind, children))
    }

    /// True when every leaf under this node is whitespace or comment.
    ///
    /// An empty group counts as whitespace-only; script correlation
    /// skips such statements.
    pub fn is_whitespace_only(&self) -> bool {
        match self {
            Self::Leaf(token) => token.kind.is_trivia(),
            Self::Group(group) => group.children.iter().all(Self::is_whitespace_only),
        }
    }

    /// Visit every leaf in document order.
    pub fn for_each_leaf<'a>(&'a self, visit: &mut impl FnMut(&'a Token)) {
        match self {
            Self::Leaf(token) => visit(token),
            Self::Group(group) => {
                for child in &group.children {
                    child.for_each_leaf(visit);
                }
            }
        }
    }

    /// All leaves in document order.
    pub fn leaves(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.for_each_leaf(&mut |token| out.push(token));
        out
    }

    /// The exact source text: leaf texts concatenated in order.
    pub fn verbatim(&self) -> String {
        let mut out = String::new();
        self.for_each_leaf(&mut |token| out.push_str(&token.text));
        out
    }
}
