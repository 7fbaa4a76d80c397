//! Tree assembly for vnt templates.
//!
//! The lexer hands out a flat token sequence in which every nested token
//! names its parent tag. [`build`] moves each token into its parent's
//! children and returns the root token, or every root in source order when
//! the template has more than one top-level node.

mod builder;
mod roots;

pub use builder::{BuildError, TreeBuilder, build};
pub use roots::Roots;
pub use vnt_lexer::{Span, TagToken, TextToken, Token, TokenId, TokenKind};

/// Lex a template and assemble its tree.
pub fn parse(source: &str) -> Result<Roots<Token>, ParseError> {
    let tokens = vnt_lexer::lex(source)?;
    Ok(build(tokens)?)
}

/// Error from [`parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] vnt_lexer::LexError),
    #[error(transparent)]
    Build(#[from] BuildError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_root() {
        let tree = parse("div[p['hi']]").unwrap();
        let root = tree.as_single().expect("one root");
        assert_eq!(root.as_tag().map(|t| t.name.as_str()), Some("div"));
        let p = &root.children()[0];
        assert_eq!(p.children()[0].as_text(), Some("hi"));
    }

    #[test]
    fn test_parse_empty_template() {
        assert_eq!(
            parse("  ").unwrap_err(),
            ParseError::Build(BuildError::EmptyTokenStream)
        );
    }

    #[test]
    fn test_parse_lex_error() {
        assert!(matches!(parse("div#"), Err(ParseError::Lex(_))));
    }
}
