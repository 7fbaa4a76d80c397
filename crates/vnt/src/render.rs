//! The capability the compiler renders into.

/// Creates and links output nodes.
///
/// The compiler only ever creates a node, sets its attributes, fills in its
/// children and then hands it to its parent: a node is never touched again
/// once it has been appended.
pub trait RenderTarget {
    /// Handle to a created node.
    type Node;

    /// Create an element named `tag`.
    fn create_element(&mut self, tag: &str) -> Self::Node;

    /// Create a text node.
    fn create_text(&mut self, text: &str) -> Self::Node;

    /// Set an attribute on an element created by this target.
    fn set_attribute(&mut self, node: &Self::Node, key: &str, value: &str);

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: Self::Node);
}

impl<R: RenderTarget + ?Sized> RenderTarget for &mut R {
    type Node = R::Node;

    fn create_element(&mut self, tag: &str) -> Self::Node {
        (**self).create_element(tag)
    }

    fn create_text(&mut self, text: &str) -> Self::Node {
        (**self).create_text(text)
    }

    fn set_attribute(&mut self, node: &Self::Node, key: &str, value: &str) {
        (**self).set_attribute(node, key, value)
    }

    fn append_child(&mut self, parent: &Self::Node, child: Self::Node) {
        (**self).append_child(parent, child)
    }
}
