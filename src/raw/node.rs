use super::handle::Handle;

/// Node color. Absent children read as [`Color::Black`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A red-black tree node.
///
/// Values live in a separate arena; the node stores a handle to its value so
/// structural walks never touch value memory.
#[derive(Clone)]
pub(crate) struct Node<K> {
    key: K,
    /// Handle of this node's value in the values arena.
    value: Handle,
    color: Color,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K> Node<K> {
    /// Creates a new unlinked red node. Insertion recolors it as needed.
    pub(crate) const fn new(key: K, value: Handle) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
        }
    }

    /// Returns the key.
    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    /// Consumes the node, returning the key and the value handle.
    pub(crate) fn into_parts(self) -> (K, Handle) {
        (self.key, self.value)
    }

    /// Returns the value handle.
    #[inline]
    pub(crate) fn value(&self) -> Handle {
        self.value
    }

    /// Returns the color.
    #[inline]
    pub(crate) fn color(&self) -> Color {
        self.color
    }

    /// Sets the color.
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Returns the parent handle.
    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    /// Sets the parent handle.
    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    /// Returns the left child handle.
    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    /// Sets the left child handle.
    pub(crate) fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    /// Returns the right child handle.
    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    /// Sets the right child handle.
    pub(crate) fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }
}
