//! Token types produced by the lexer.

use crate::Span;

/// Index of a token in the flat lexer output.
///
/// This is how a token refers back to the tag it was nested under. It is a
/// reference into the sequence, never an owner of the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(u32);

impl TokenId {
    /// Create an id for the token at `index` in the lexer output.
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the token in the lexer output.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An element name: `div`, `my-widget`
    Tag,
    /// A quoted text leaf: `"hello"`
    Text,
    /// An attribute group: `(id="main", class="wide")`
    Attributes,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TokenKind::Tag => "tag",
            TokenKind::Text => "text",
            TokenKind::Attributes => "attributes",
        })
    }
}

/// Whether a token was lexed inside an open children bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContextKind {
    /// Top level.
    #[default]
    None,
    /// Inside `[...]`.
    InChildren,
}

/// Bookkeeping shared by every token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMeta {
    /// Span of the defining content, without quotes or parentheses.
    pub span: Span,
    /// 1-based line number at the point the token was completed.
    pub line: u32,
    /// Bracket context the token was lexed in.
    pub context: ContextKind,
    /// The tag that was open on the relations stack, if any.
    pub parent: Option<TokenId>,
}

/// A token in the flat lexer output.
///
/// Attribute groups never appear here on their own: the lexer attaches them
/// to the tag they follow (see [`TagToken::attrs`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An element.
    Tag(TagToken),
    /// A text leaf.
    Text(TextToken),
}

/// An element token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken {
    /// The tag name.
    pub name: String,
    /// Attribute group written directly after the tag.
    pub attrs: Option<AttributesToken>,
    /// Child tokens, in source order. Empty until the tree is built.
    pub children: Vec<Token>,
    pub meta: TokenMeta,
}

/// A text token with escapes already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextToken {
    pub text: String,
    pub meta: TokenMeta,
}

/// An attribute group `( key="value" ... )`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributesToken {
    pub attributes: Attributes,
    pub meta: TokenMeta,
}

impl AttributesToken {
    #[inline]
    pub fn kind(&self) -> TokenKind {
        TokenKind::Attributes
    }
}

impl Token {
    /// The kind of this token.
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Tag(_) => TokenKind::Tag,
            Token::Text(_) => TokenKind::Text,
        }
    }

    pub fn meta(&self) -> &TokenMeta {
        match self {
            Token::Tag(tag) => &tag.meta,
            Token::Text(text) => &text.meta,
        }
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.meta().span
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.meta().line
    }

    #[inline]
    pub fn parent(&self) -> Option<TokenId> {
        self.meta().parent
    }

    #[inline]
    pub fn context(&self) -> ContextKind {
        self.meta().context
    }

    pub fn as_tag(&self) -> Option<&TagToken> {
        match self {
            Token::Tag(tag) => Some(tag),
            Token::Text(_) => None,
        }
    }

    pub fn as_tag_mut(&mut self) -> Option<&mut TagToken> {
        match self {
            Token::Tag(tag) => Some(tag),
            Token::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Token::Text(text) => Some(&text.text),
            Token::Tag(_) => None,
        }
    }

    /// Child tokens; always empty for text.
    pub fn children(&self) -> &[Token] {
        match self {
            Token::Tag(tag) => &tag.children,
            Token::Text(_) => &[],
        }
    }
}

/// Ordered attribute map.
///
/// Keys keep the position of their first insertion; inserting an existing
/// key replaces its value in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, returning the previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (key, value) in iter {
            attributes.insert(key, value);
        }
        attributes
    }
}

impl IntoIterator for Attributes {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
