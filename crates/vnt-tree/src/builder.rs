//! Tree builder from the flat token sequence.

use thiserror::Error;
use tracing::debug;
use vnt_lexer::{Token, TokenId};

use crate::Roots;

/// Error during tree building.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Nothing to build.
    #[error("not enough tokens: the template is empty")]
    EmptyTokenStream,
    /// A token names a parent that is not an earlier tag.
    #[error("token {} has invalid parent {}", .token.index(), .parent.index())]
    InvalidParent { token: TokenId, parent: TokenId },
}

/// Assemble a tree from tokens in lexing order.
pub fn build(tokens: impl IntoIterator<Item = Token>) -> Result<Roots<Token>, BuildError> {
    let mut builder = TreeBuilder::new();
    for token in tokens {
        builder.push(token)?;
    }
    builder.finish()
}

/// Builder that moves each token under its parent.
///
/// Tokens must be pushed in lexing order: a parent always comes before
/// its children.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    /// Pushed tokens, taken out again while assembling.
    slots: Vec<Option<Token>>,
    /// Child ids of each token, in push order.
    children: Vec<Vec<TokenId>>,
    roots: Vec<TokenId>,
}

impl TreeBuilder {
    /// Create a new tree builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the next token.
    pub fn push(&mut self, token: Token) -> Result<(), BuildError> {
        let id = TokenId::new(self.slots.len());
        match token.parent() {
            Some(parent) => {
                let is_tag = matches!(self.slots.get(parent.index()), Some(Some(Token::Tag(_))));
                if !is_tag {
                    return Err(BuildError::InvalidParent { token: id, parent });
                }
                self.children[parent.index()].push(id);
            }
            None => self.roots.push(id),
        }
        self.slots.push(Some(token));
        self.children.push(Vec::new());
        Ok(())
    }

    /// Finish building and return the root token(s).
    pub fn finish(mut self) -> Result<Roots<Token>, BuildError> {
        if self.slots.is_empty() {
            return Err(BuildError::EmptyTokenStream);
        }

        let root_ids = std::mem::take(&mut self.roots);
        let roots: Vec<Token> = root_ids
            .into_iter()
            .filter_map(|id| self.assemble(id))
            .collect();
        debug!("built {} root(s) from {} tokens", roots.len(), self.slots.len());
        Ok(Roots::from_vec(roots))
    }

    fn assemble(&mut self, id: TokenId) -> Option<Token> {
        let mut token = self.slots[id.index()].take()?;
        if let Token::Tag(tag) = &mut token {
            let child_ids = std::mem::take(&mut self.children[id.index()]);
            tag.children.reserve(child_ids.len());
            for child in child_ids {
                if let Some(child) = self.assemble(child) {
                    tag.children.push(child);
                }
            }
        }
        Some(token)
    }
}
