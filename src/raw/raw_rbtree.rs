use core::borrow::Borrow;
use core::cmp::Ordering;

use alloc::vec::Vec;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node};

/// The core red-black tree implementation backing `RBTreeMap`.
pub(crate) struct RawRBTree<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Arena storing all values (separate from nodes so structural walks and
    /// outstanding value borrows never overlap).
    values: Arena<V>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Total number of key-value pairs in the tree.
    len: usize,
}

/// Which child link of a parent node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// Result of locating a key: the node that holds it, or the link where it
/// would be attached.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Location {
    /// The key is present at this node.
    Found(Handle),
    /// The key is absent. `None` means the tree is empty; otherwise the key
    /// belongs under this parent on the given side.
    Vacant(Option<(Handle, Side)>),
}

/// Stack for iterative traversals. The inline capacity covers the height of
/// any tree the test handle width can address.
type TraversalStack = SmallVec<[Handle; 32]>;

impl<K, V> RawRBTree<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with the specified capacity.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            values: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the capacity of the tree.
    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    /// Clears all elements from the tree. The arenas drop their slots flat,
    /// so no tree-shaped recursion is involved.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns a reference to a node by handle.
    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    /// Returns a mutable reference to a node by handle.
    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K> {
        self.nodes.get_mut(handle)
    }

    /// Returns a reference to a node by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawRBTree<K, V>`.
    pub(crate) unsafe fn node_ptr<'a>(ptr: *const Self, handle: Handle) -> &'a Node<K> {
        // SAFETY: Caller guarantees `ptr` is valid. Only the `nodes` field is
        // touched, never the values.
        unsafe { Arena::get_ptr(&raw const (*ptr).nodes, handle) }
    }

    /// Returns a reference to a value by handle.
    #[inline]
    pub(crate) fn value(&self, handle: Handle) -> &V {
        self.values.get(handle)
    }

    /// Returns a mutable reference to a value by handle.
    #[inline]
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        self.values.get_mut(handle)
    }

    /// Returns a reference to a value by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawRBTree<K, V>`.
    pub(crate) unsafe fn value_ptr<'a>(ptr: *const Self, handle: Handle) -> &'a V {
        // SAFETY: Caller guarantees `ptr` is valid. Only the `values` field is
        // touched.
        unsafe { Arena::get_ptr(&raw const (*ptr).values, handle) }
    }

    /// Returns a mutable reference to a value by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawRBTree<K, V>`.
    /// - The caller must have logical exclusive access to the value at
    ///   `handle`.
    pub(crate) unsafe fn value_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut V {
        // SAFETY: Caller guarantees `ptr` is valid. Only the `values` field is
        // touched, and only the one slot is borrowed.
        unsafe { Arena::get_mut_ptr(&raw mut (*ptr).values, handle) }
    }

    /// Returns the handle of the first (minimum) node, if any.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.min_in_subtree(root))
    }

    /// Returns the handle of the last (maximum) node, if any.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.max_in_subtree(root))
    }

    fn min_in_subtree(&self, handle: Handle) -> Handle {
        let mut current = handle;
        while let Some(left) = self.node(current).left() {
            current = left;
        }
        current
    }

    fn max_in_subtree(&self, handle: Handle) -> Handle {
        let mut current = handle;
        while let Some(right) = self.node(current).right() {
            current = right;
        }
        current
    }

    /// Returns the handle of the in-order successor of `handle`, if any.
    ///
    /// Every forward iterator in the crate steps with this function.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        if let Some(right) = self.node(handle).right() {
            return Some(self.min_in_subtree(right));
        }
        // Climb until the node is a left child; its parent is next.
        let mut current = handle;
        let mut parent = self.node(current).parent();
        while let Some(above) = parent {
            if self.node(above).right() != Some(current) {
                break;
            }
            current = above;
            parent = self.node(above).parent();
        }
        parent
    }

    /// Returns the handle of the in-order predecessor of `handle`, if any.
    ///
    /// Every backward iterator in the crate steps with this function.
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        if let Some(left) = self.node(handle).left() {
            return Some(self.max_in_subtree(left));
        }
        let mut current = handle;
        let mut parent = self.node(current).parent();
        while let Some(above) = parent {
            if self.node(above).left() != Some(current) {
                break;
            }
            current = above;
            parent = self.node(above).parent();
        }
        parent
    }

    /// Drains all key-value pairs from the tree in key order.
    ///
    /// This is O(n) with an explicit stack: each node is read once, then its
    /// slot is vacated, with no per-element rebalancing and no recursion.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut result = Vec::with_capacity(self.len);
        let mut stack = TraversalStack::new();
        let mut current = self.root;

        loop {
            while let Some(handle) = current {
                stack.push(handle);
                current = self.node(handle).left();
            }
            let Some(handle) = stack.pop() else {
                break;
            };
            // Read the right link before the slot is vacated.
            current = self.node(handle).right();
            let (key, value_handle) = self.nodes.take(handle).into_parts();
            result.push((key, self.values.take(value_handle)));
        }

        self.nodes.clear();
        self.values.clear();
        self.root = None;
        self.len = 0;
        result
    }

    /// Links a new node at a vacant location and restores the tree
    /// invariants. Returns the new node's handle.
    ///
    /// `link` must come from [`Self::locate`] on this tree, with no mutation
    /// in between.
    pub(crate) fn attach(&mut self, link: Option<(Handle, Side)>, key: K, value: V) -> Handle {
        let value_handle = self.values.alloc(value);
        let mut node = Node::new(key, value_handle);
        self.len += 1;

        match link {
            None => {
                // Empty tree: the new node becomes the black root.
                node.set_color(Color::Black);
                let handle = self.nodes.alloc(node);
                self.root = Some(handle);
                handle
            }
            Some((parent, side)) => {
                node.set_parent(Some(parent));
                let handle = self.nodes.alloc(node);
                match side {
                    Side::Left => self.node_mut(parent).set_left(Some(handle)),
                    Side::Right => self.node_mut(parent).set_right(Some(handle)),
                }
                self.insert_fixup(handle);
                handle
            }
        }
    }

    /// Removes the node at `handle`, returning its key and value.
    ///
    /// Only the removed node's slot is vacated; every other handle in the
    /// tree stays valid.
    pub(crate) fn remove(&mut self, handle: Handle) -> (K, V) {
        let left = self.node(handle).left();
        let right = self.node(handle).right();
        let target_color = self.node(handle).color();

        // The node that moved into the spliced-out position, and its parent.
        // The fixup needs the parent separately because the moved node may be
        // an absent child.
        let fixup;
        let fixup_parent;
        let mut removed_color = target_color;

        match (left, right) {
            (None, _) => {
                fixup = right;
                fixup_parent = self.node(handle).parent();
                self.transplant(handle, right);
            }
            (Some(_), None) => {
                fixup = left;
                fixup_parent = self.node(handle).parent();
                self.transplant(handle, left);
            }
            (Some(_), Some(right_child)) => {
                // Two children: relink the in-order successor into this
                // node's structural position, adopting its color. The
                // successor keeps its own handle, key, and value.
                let successor = self.min_in_subtree(right_child);
                removed_color = self.node(successor).color();
                fixup = self.node(successor).right();

                if self.node(successor).parent() == Some(handle) {
                    // The successor is the direct right child.
                    fixup_parent = Some(successor);
                } else {
                    fixup_parent = self.node(successor).parent();
                    self.transplant(successor, fixup);
                    self.node_mut(successor).set_right(Some(right_child));
                    self.node_mut(right_child).set_parent(Some(successor));
                }

                self.transplant(handle, Some(successor));
                self.node_mut(successor).set_left(left);
                if let Some(left) = left {
                    self.node_mut(left).set_parent(Some(successor));
                }
                self.node_mut(successor).set_color(target_color);
            }
        }

        self.len -= 1;
        if removed_color == Color::Black {
            // A black node left some path one short; rebalance.
            self.remove_fixup(fixup, fixup_parent);
        }

        let (key, value_handle) = self.nodes.take(handle).into_parts();
        (key, self.values.take(value_handle))
    }

    /// Replaces the subtree rooted at `target` with the one rooted at
    /// `replacement` in the eyes of `target`'s parent.
    fn transplant(&mut self, target: Handle, replacement: Option<Handle>) {
        let parent = self.node(target).parent();
        match parent {
            None => self.root = replacement,
            Some(parent) => {
                if self.node(parent).left() == Some(target) {
                    self.node_mut(parent).set_left(replacement);
                } else {
                    self.node_mut(parent).set_right(replacement);
                }
            }
        }
        if let Some(replacement) = replacement {
            self.node_mut(replacement).set_parent(parent);
        }
    }

    fn rotate_left(&mut self, handle: Handle) {
        let pivot = self.node(handle).right().expect("`RawRBTree::rotate_left()` - no right child!");
        let inner = self.node(pivot).left();
        let parent = self.node(handle).parent();

        self.node_mut(handle).set_right(inner);
        if let Some(inner) = inner {
            self.node_mut(inner).set_parent(Some(handle));
        }

        self.node_mut(pivot).set_parent(parent);
        match parent {
            None => self.root = Some(pivot),
            Some(parent) => {
                if self.node(parent).left() == Some(handle) {
                    self.node_mut(parent).set_left(Some(pivot));
                } else {
                    self.node_mut(parent).set_right(Some(pivot));
                }
            }
        }

        self.node_mut(pivot).set_left(Some(handle));
        self.node_mut(handle).set_parent(Some(pivot));
    }

    fn rotate_right(&mut self, handle: Handle) {
        let pivot = self.node(handle).left().expect("`RawRBTree::rotate_right()` - no left child!");
        let inner = self.node(pivot).right();
        let parent = self.node(handle).parent();

        self.node_mut(handle).set_left(inner);
        if let Some(inner) = inner {
            self.node_mut(inner).set_parent(Some(handle));
        }

        self.node_mut(pivot).set_parent(parent);
        match parent {
            None => self.root = Some(pivot),
            Some(parent) => {
                if self.node(parent).left() == Some(handle) {
                    self.node_mut(parent).set_left(Some(pivot));
                } else {
                    self.node_mut(parent).set_right(Some(pivot));
                }
            }
        }

        self.node_mut(pivot).set_right(Some(handle));
        self.node_mut(handle).set_parent(Some(pivot));
    }

    /// Restores the red-black invariants after linking a red node.
    fn insert_fixup(&mut self, mut current: Handle) {
        loop {
            let Some(parent) = self.node(current).parent() else {
                break;
            };
            if self.node(parent).color() == Color::Black {
                break;
            }
            let Some(grandparent) = self.node(parent).parent() else {
                // A red parent is never the root.
                break;
            };

            if self.node(grandparent).left() == Some(parent) {
                match self.node(grandparent).right() {
                    Some(uncle) if self.node(uncle).color() == Color::Red => {
                        // Red uncle: push the grandparent's blackness down and
                        // continue from there.
                        self.node_mut(parent).set_color(Color::Black);
                        self.node_mut(uncle).set_color(Color::Black);
                        self.node_mut(grandparent).set_color(Color::Red);
                        current = grandparent;
                    }
                    _ => {
                        let pivot = if self.node(parent).right() == Some(current) {
                            // Inner grandchild: rotate it to the outside first.
                            self.rotate_left(parent);
                            current
                        } else {
                            parent
                        };
                        self.node_mut(pivot).set_color(Color::Black);
                        self.node_mut(grandparent).set_color(Color::Red);
                        self.rotate_right(grandparent);
                        break;
                    }
                }
            } else {
                match self.node(grandparent).left() {
                    Some(uncle) if self.node(uncle).color() == Color::Red => {
                        self.node_mut(parent).set_color(Color::Black);
                        self.node_mut(uncle).set_color(Color::Black);
                        self.node_mut(grandparent).set_color(Color::Red);
                        current = grandparent;
                    }
                    _ => {
                        let pivot = if self.node(parent).left() == Some(current) {
                            self.rotate_right(parent);
                            current
                        } else {
                            parent
                        };
                        self.node_mut(pivot).set_color(Color::Black);
                        self.node_mut(grandparent).set_color(Color::Red);
                        self.rotate_left(grandparent);
                        break;
                    }
                }
            }
        }

        if let Some(root) = self.root {
            self.node_mut(root).set_color(Color::Black);
        }
    }

    /// Restores the red-black invariants after unlinking a black node.
    ///
    /// `current` is the node that moved into the vacated position (possibly
    /// absent) and `parent` is its parent.
    fn remove_fixup(&mut self, mut current: Option<Handle>, mut parent: Option<Handle>) {
        while current != self.root && !self.is_red(current) {
            let Some(p) = parent else {
                break;
            };

            if self.node(p).left() == current {
                let Some(mut sibling) = self.node(p).right() else {
                    // A black-height deficit always has a sibling subtree.
                    break;
                };
                if self.node(sibling).color() == Color::Red {
                    // Red sibling: rotate it above the parent to expose a
                    // black one.
                    self.node_mut(sibling).set_color(Color::Black);
                    self.node_mut(p).set_color(Color::Red);
                    self.rotate_left(p);
                    match self.node(p).right() {
                        Some(next) => sibling = next,
                        None => break,
                    }
                }

                if !self.is_red(self.node(sibling).left()) && !self.is_red(self.node(sibling).right()) {
                    // Both nephews black: recolor and move the deficit up.
                    self.node_mut(sibling).set_color(Color::Red);
                    current = Some(p);
                    parent = self.node(p).parent();
                } else {
                    if !self.is_red(self.node(sibling).right()) {
                        // Far nephew black: rotate the near one into its place.
                        if let Some(near) = self.node(sibling).left() {
                            self.node_mut(near).set_color(Color::Black);
                        }
                        self.node_mut(sibling).set_color(Color::Red);
                        self.rotate_right(sibling);
                        match self.node(p).right() {
                            Some(next) => sibling = next,
                            None => break,
                        }
                    }
                    // Far nephew red: terminal recolor and rotation.
                    let parent_color = self.node(p).color();
                    self.node_mut(sibling).set_color(parent_color);
                    self.node_mut(p).set_color(Color::Black);
                    if let Some(far) = self.node(sibling).right() {
                        self.node_mut(far).set_color(Color::Black);
                    }
                    self.rotate_left(p);
                    current = self.root;
                    break;
                }
            } else {
                // Mirror image: the deficit is on the right side.
                let Some(mut sibling) = self.node(p).left() else {
                    break;
                };
                if self.node(sibling).color() == Color::Red {
                    self.node_mut(sibling).set_color(Color::Black);
                    self.node_mut(p).set_color(Color::Red);
                    self.rotate_right(p);
                    match self.node(p).left() {
                        Some(next) => sibling = next,
                        None => break,
                    }
                }

                if !self.is_red(self.node(sibling).left()) && !self.is_red(self.node(sibling).right()) {
                    self.node_mut(sibling).set_color(Color::Red);
                    current = Some(p);
                    parent = self.node(p).parent();
                } else {
                    if !self.is_red(self.node(sibling).left()) {
                        if let Some(near) = self.node(sibling).right() {
                            self.node_mut(near).set_color(Color::Black);
                        }
                        self.node_mut(sibling).set_color(Color::Red);
                        self.rotate_left(sibling);
                        match self.node(p).left() {
                            Some(next) => sibling = next,
                            None => break,
                        }
                    }
                    let parent_color = self.node(p).color();
                    self.node_mut(sibling).set_color(parent_color);
                    self.node_mut(p).set_color(Color::Black);
                    if let Some(far) = self.node(sibling).left() {
                        self.node_mut(far).set_color(Color::Black);
                    }
                    self.rotate_right(p);
                    current = self.root;
                    break;
                }
            }
        }

        if let Some(current) = current {
            self.node_mut(current).set_color(Color::Black);
        }
    }

    /// Absent children count as black.
    fn is_red(&self, handle: Option<Handle>) -> bool {
        handle.is_some_and(|handle| self.node(handle).color() == Color::Red)
    }
}

impl<K: Ord, V> RawRBTree<K, V> {
    /// Locates a key with a single descent from the root.
    pub(crate) fn locate<Q>(&self, key: &Q) -> Location
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(root) = self.root else {
            return Location::Vacant(None);
        };

        let mut current = root;
        loop {
            match key.cmp(self.node(current).key().borrow()) {
                Ordering::Less => match self.node(current).left() {
                    Some(left) => current = left,
                    None => return Location::Vacant(Some((current, Side::Left))),
                },
                Ordering::Greater => match self.node(current).right() {
                    Some(right) => current = right,
                    None => return Location::Vacant(Some((current, Side::Right))),
                },
                Ordering::Equal => return Location::Found(current),
            }
        }
    }

    /// Returns the handle holding `key`, if present.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.locate(key) {
            Location::Found(handle) => Some(handle),
            Location::Vacant(_) => None,
        }
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.value(self.node(handle).value()))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        let value_handle = self.node(handle).value();
        Some(self.value_mut(value_handle))
    }

    /// Returns the key-value pair corresponding to the key.
    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        let node = self.node(handle);
        Some((node.key(), self.value(node.value())))
    }

    /// Returns true if the tree contains the specified key.
    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_some()
    }

    /// Inserts a key-value pair, keeping the existing entry on a duplicate.
    ///
    /// Returns the entry's handle and whether a new node was created. On a
    /// duplicate the given key and value are dropped and the stored entry is
    /// untouched.
    pub(crate) fn insert(&mut self, key: K, value: V) -> (Handle, bool) {
        match self.locate(&key) {
            Location::Found(handle) => (handle, false),
            Location::Vacant(link) => (self.attach(link, key, value), true),
        }
    }

    /// Inserts a key-value pair, replacing the value on a duplicate.
    ///
    /// Returns the previous value if the key was already present.
    pub(crate) fn insert_or_assign(&mut self, key: K, value: V) -> Option<V> {
        match self.locate(&key) {
            Location::Found(handle) => {
                let value_handle = self.node(handle).value();
                Some(core::mem::replace(self.value_mut(value_handle), value))
            }
            Location::Vacant(link) => {
                self.attach(link, key, value);
                None
            }
        }
    }
}

impl<K: Clone, V: Clone> Clone for RawRBTree<K, V> {
    /// Clones the arenas wholesale. Handles, colors, and shape carry over
    /// unchanged, so no traversal or rebalancing happens.
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            values: self.values.clone(),
            root: self.root,
            len: self.len,
        }
    }
}
