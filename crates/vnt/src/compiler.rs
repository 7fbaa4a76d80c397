//! Tree → output nodes.

use tracing::{debug, trace};
use vnt_tree::{Roots, Token};

use crate::RenderTarget;

/// Walks a token tree and materializes it through a [`RenderTarget`].
///
/// Each tag becomes an element: attributes are applied in source order,
/// then every child is compiled and appended in source order. Text tokens
/// become text nodes.
pub struct Compiler<'t, R: RenderTarget + ?Sized> {
    target: &'t mut R,
}

impl<'t, R: RenderTarget + ?Sized> Compiler<'t, R> {
    /// Create a compiler that creates nodes through `target`.
    pub fn new(target: &'t mut R) -> Self {
        Self { target }
    }

    /// Compile every root, keeping the single/many shape of the input.
    pub fn compile(&mut self, tree: Roots<Token>) -> Roots<R::Node> {
        debug!("compiling {} root(s)", tree.len());
        tree.map(|token| self.compile_token(token))
    }

    /// Compile one token and its subtree.
    pub fn compile_token(&mut self, token: Token) -> R::Node {
        match token {
            Token::Tag(tag) => {
                trace!("element <{}> at {:?}", tag.name, tag.meta.span);
                let node = self.target.create_element(&tag.name);
                if let Some(group) = &tag.attrs {
                    for (key, value) in group.attributes.iter() {
                        self.target.set_attribute(&node, key, value);
                    }
                }
                for child in tag.children {
                    let child = self.compile_token(child);
                    self.target.append_child(&node, child);
                }
                node
            }
            Token::Text(text) => {
                trace!("text {:?} at {:?}", text.text, text.meta.span);
                self.target.create_text(&text.text)
            }
        }
    }
}
