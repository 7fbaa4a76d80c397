//! Lexer for the vnt template notation.
//!
//! Turns a template such as `ul(class="menu")[li["one"], li["two"]]` into a
//! flat sequence of [`Token`]s. Each token remembers the tag it was nested
//! under; `vnt-tree` turns those references into a tree.

mod span;
pub use span::Span;

mod token;
pub use token::{
    Attributes, AttributesToken, ContextKind, TagToken, TextToken, Token, TokenId, TokenKind,
    TokenMeta,
};

mod error;
pub use error::{LexError, LexErrorKind};

mod options;
pub use options::{DEFAULT_MAX_DEPTH, DuplicateAttributes, LexerOptions};

mod sink;
pub use sink::{CollectingSink, DiagnosticSink, SinkError};

mod lexer;
pub use lexer::{Lexer, lex};
