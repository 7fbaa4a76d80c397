//! One root or many.

/// The top level of a template: a lone node is returned as-is, several
/// top-level nodes are returned in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Roots<T> {
    /// Exactly one top-level node.
    Single(T),
    /// Zero or several top-level nodes, in source order.
    Many(Vec<T>),
}

impl<T> Roots<T> {
    /// Wrap `items`, unwrapping a singleton.
    pub fn from_vec(mut items: Vec<T>) -> Self {
        if items.len() == 1
            && let Some(item) = items.pop()
        {
            return Roots::Single(item);
        }
        Roots::Many(items)
    }

    pub fn len(&self) -> usize {
        match self {
            Roots::Single(_) => 1,
            Roots::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_single(&self) -> Option<&T> {
        match self {
            Roots::Single(item) => Some(item),
            Roots::Many(_) => None,
        }
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            Roots::Single(item) => std::slice::from_ref(item),
            Roots::Many(items) => items,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Apply `f` to every root, keeping the shape.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Roots<U> {
        match self {
            Roots::Single(item) => Roots::Single(f(item)),
            Roots::Many(items) => Roots::Many(items.into_iter().map(f).collect()),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Roots::Single(item) => vec![item],
            Roots::Many(items) => items,
        }
    }
}

impl<T> IntoIterator for Roots<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton_is_unwrapped() {
        assert_eq!(Roots::from_vec(vec![1]), Roots::Single(1));
        assert_eq!(Roots::from_vec(vec![1, 2]), Roots::Many(vec![1, 2]));
    }

    #[test]
    fn test_map_keeps_shape() {
        assert_eq!(Roots::Single(2).map(|n| n * 2), Roots::Single(4));
        assert_eq!(Roots::Many(vec![1, 2]).map(|n| n + 1).into_vec(), vec![2, 3]);
    }
}
