//! Lexer errors.

use thiserror::Error;

use crate::Span;

/// What went wrong while lexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// `[` with no preceding token to attach to.
    ChildrenWithoutParent,
    /// `[` directly after a text leaf.
    ChildrenOnText,
    /// `(` with no preceding token to attach to.
    AttributesOnNull,
    /// `(` directly after a text leaf.
    AttributesOnText,
    /// A second attribute group on the same tag.
    DuplicateAttributes,
    /// A character the grammar does not allow here.
    UnknownCharacter(char),
    /// Input ended inside a quoted string.
    UnterminatedQuote,
    /// Input ended inside an attribute group.
    UnterminatedAttributeList,
    /// Two attribute pairs without a separator between them.
    MissingComma,
    /// Not a valid attribute key.
    InvalidAttributeKey,
    /// Attribute value that does not start with a quote.
    AttributeValueNotQuoted,
    /// `]` with no open `[`.
    UnmatchedCloseBracket,
    /// Input ended while a `[` was still open.
    UnclosedChildren,
    /// A `[` that would nest children deeper than the configured limit.
    NestingTooDeep { limit: usize },
}

impl std::fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexErrorKind::ChildrenWithoutParent => {
                write!(f, "cannot declare children without a parent")
            }
            LexErrorKind::ChildrenOnText => write!(f, "text cannot have children"),
            LexErrorKind::AttributesOnNull => write!(f, "cannot attach attributes to nothing"),
            LexErrorKind::AttributesOnText => write!(f, "text cannot have attributes"),
            LexErrorKind::DuplicateAttributes => write!(f, "tag already has attributes"),
            LexErrorKind::UnknownCharacter(c) => write!(f, "unknown character {c:?}"),
            LexErrorKind::UnterminatedQuote => write!(f, "missing closing quote"),
            LexErrorKind::UnterminatedAttributeList => write!(f, "missing closing parenthesis"),
            LexErrorKind::MissingComma => write!(f, "missing comma between attributes"),
            LexErrorKind::InvalidAttributeKey => write!(f, "invalid attribute key"),
            LexErrorKind::AttributeValueNotQuoted => write!(f, "attribute values must be quoted"),
            LexErrorKind::UnmatchedCloseBracket => write!(f, "unmatched closing bracket"),
            LexErrorKind::UnclosedChildren => write!(f, "unclosed children bracket"),
            LexErrorKind::NestingTooDeep { limit } => {
                write!(f, "children nested deeper than {limit} levels")
            }
        }
    }
}

impl LexErrorKind {
    /// A short suggestion for fixing the error.
    pub fn help(&self) -> Option<&'static str> {
        match self {
            LexErrorKind::ChildrenWithoutParent => Some("write a tag before `[`, e.g. `div[...]`"),
            LexErrorKind::ChildrenOnText | LexErrorKind::AttributesOnText => {
                Some("wrap the text in a tag, e.g. `span[\"...\"]`")
            }
            LexErrorKind::AttributesOnNull => Some("write a tag before `(`, e.g. `div(id=\"x\")`"),
            LexErrorKind::DuplicateAttributes => {
                Some("merge both groups into a single `(...)`")
            }
            LexErrorKind::UnterminatedQuote => Some("add the matching closing quote"),
            LexErrorKind::UnterminatedAttributeList => Some("add a closing `)`"),
            LexErrorKind::MissingComma => Some("separate attributes with `,` or whitespace"),
            LexErrorKind::InvalidAttributeKey => {
                Some("keys start with a letter and may contain letters, digits and `-`")
            }
            LexErrorKind::AttributeValueNotQuoted => Some("quote the value, e.g. `key=\"value\"`"),
            LexErrorKind::UnmatchedCloseBracket => Some("remove the `]` or add a matching `[`"),
            LexErrorKind::UnclosedChildren => Some("add a closing `]`"),
            LexErrorKind::NestingTooDeep { .. } => {
                Some("flatten the template or raise `LexerOptions::max_depth`")
            }
            LexErrorKind::UnknownCharacter(_) => None,
        }
    }
}

/// A fatal lexer error with its location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: line {line}, offset {}", .span.start)]
pub struct LexError {
    pub kind: LexErrorKind,
    /// The offending part of the template.
    pub span: Span,
    /// 1-based line of `span`.
    pub line: u32,
}

impl LexError {
    /// Create a new lexer error.
    pub fn new(kind: LexErrorKind, span: Span, line: u32) -> Self {
        Self { kind, span, line }
    }

    /// The offending substring of `source`.
    pub fn snippet<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice(source)
    }
}
