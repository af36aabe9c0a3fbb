//! An arena-backed AVL tree with an injectable comparator.

// Conventions used in comments:
// - The height of a missing subtree is -1 and the height of a leaf is 0.
// - The balance factor of a node `x` is `h(left(x)) - h(right(x))`, denoted `bf(x)`.
// - A node is left-heavy if `bf(x) > 0` and right-heavy if `bf(x) < 0`.
//
// The invariants of the tree, which hold whenever no mutation is in progress:
// 1. In-order values are strictly increasing under the tree's comparator.
// 2. `|bf(x)| <= 1` for every node.
// 3. Every non-root node is exactly one of its parent's children.
// 4. Every cached height equals `1 + max(h(left), h(right))`.
//
// A single structural change (attaching a leaf or splicing out a node with at most one child)
// can only push ancestors of the change to `|bf| = 2`. The rebalancing walk restores (2) and (4)
// bottom-up, one ancestor at a time.

mod classify;
mod compare;
mod config;
mod error;
mod iter;
mod node;
mod rebalance;
mod rotate;
mod stats;
mod validate;

#[cfg(any(test, feature = "model"))]
pub mod model;


use core::{cmp::Ordering, fmt};

pub use crate::{
    classify::{Imbalance, Rotation},
    compare::{Comparator, NaturalOrder},
    config::Config,
    error::{Error, Result},
    iter::Iter,
    node::{Dir, NodeId},
    stats::{BalanceStats, HeightAnalysis, RotationStats},
};

use crate::node::{Arena, Link, EMPTY_HEIGHT};

/// A self-balancing binary search tree.
///
/// Values are ordered by the comparator `C`, which defaults to the values' [`Ord`]
/// implementation. Every public mutation returns with all invariants restored, or fails with an
/// [`Error`] describing the broken contract.
pub struct AvlTree<T, C = NaturalOrder> {
    nodes: Arena<T>,
    root: Link,
    len: usize,
    cmp: C,
    config: Config,
    rotations: RotationStats,
}

impl<T: Ord> AvlTree<T> {
    /// Returns a new empty tree ordered by `T`'s [`Ord`] implementation.
    pub const fn new() -> AvlTree<T> {
        AvlTree::with_config(NaturalOrder, Config::new())
    }
}

impl<T, C> AvlTree<T, C>
where
    C: Comparator<T>,
{
    /// Returns a new empty tree ordered by `cmp`.
    pub const fn with_comparator(cmp: C) -> AvlTree<T, C> {
        AvlTree::with_config(cmp, Config::new())
    }

    /// Returns a new empty tree ordered by `cmp` and performing the checks in `config`.
    pub const fn with_config(cmp: C, config: Config) -> AvlTree<T, C> {
        AvlTree {
            nodes: Arena::new(),
            root: None,
            len: 0,
            cmp,
            config,
            rotations: RotationStats::new(),
        }
    }

    /// Returns `true` if the tree contains no elements.
    pub fn is_empty(&self) -> bool {
        let empty = self.len() == 0;
        debug_assert_eq!(empty, self.root.is_none());
        empty
    }

    /// Returns the number of elements in the tree.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns the height of the tree, or -1 if it is empty.
    pub fn height(&self) -> i32 {
        self.height_at(self.root)
    }

    /// Returns the checks this tree performs.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the comparator ordering this tree.
    pub const fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns the root node, if any.
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the value stored in `node`.
    pub fn value(&self, node: NodeId) -> Option<&T> {
        self.nodes.get(node).map(|n| &n.value)
    }

    /// Returns the left child of `node`.
    pub fn left(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.left()
    }

    /// Returns the right child of `node`.
    pub fn right(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.right()
    }

    /// Returns the parent of `node`, or `None` for the root.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.parent()
    }

    /// Returns the cached height of `node`.
    pub fn height_of(&self, node: NodeId) -> Option<i32> {
        self.nodes.get(node).map(|n| n.height())
    }

    /// Returns `h(left) - h(right)` for `node`.
    pub fn balance_factor(&self, node: NodeId) -> Option<i32> {
        self.nodes.contains(node).then(|| self.bf(node))
    }

    /// Returns the node holding a value equal to `value`.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn find(&self, value: &T) -> Option<NodeId> {
        let mut opt_cur = self.root;

        loop {
            let cur = opt_cur?;

            match self.cmp.compare(value, &self.nodes[cur].value) {
                Ordering::Less => opt_cur = self.nodes[cur].left(),
                Ordering::Equal => return Some(cur),
                Ordering::Greater => opt_cur = self.nodes[cur].right(),
            }
        }
    }

    /// Returns a reference to the stored value equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.find(value).map(|node| &self.nodes[node].value)
    }

    /// Returns `true` if the tree contains a value equal to `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Inserts a value into the tree.
    ///
    /// Returns `Ok(None)` if the value was inserted. If an equal value is already present the
    /// tree is left unchanged and `value` is handed back as `Ok(Some(value))`.
    ///
    /// This operation completes in _O(log(n))_ time.
    ///
    /// # Errors
    ///
    /// Fails if the node arena is full, or with whatever a configured check detects.
    pub fn insert(&mut self, value: T) -> Result<Option<T>> {
        let mut opt_parent = None;
        let mut opt_cur = self.root;
        let mut dir = Dir::Left;

        // Descend the tree, looking for an empty link.
        while let Some(cur) = opt_cur {
            dir = match self.cmp.compare(&value, &self.nodes[cur].value) {
                Ordering::Less => Dir::Left,
                Ordering::Greater => Dir::Right,
                Ordering::Equal => {
                    tracing::trace!(node = %cur, "insert: value already present");
                    return Ok(Some(value));
                }
            };

            opt_parent = Some(cur);
            opt_cur = self.nodes[cur].child(dir);
        }

        let node = self.nodes.alloc(value, opt_parent)?;
        match opt_parent {
            Some(parent) => {
                self.nodes[parent].set_child(dir, Some(node));
            }
            None => self.root = Some(node),
        }
        self.len += 1;

        self.rebalance_from(opt_parent)?;
        self.audit_after_mutation()?;

        Ok(None)
    }

    /// Removes the value equal to `value` from the tree and returns it.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn remove(&mut self, value: &T) -> Result<Option<T>> {
        let Some(node) = self.find(value) else {
            tracing::trace!("remove: value not present");
            return Ok(None);
        };

        let removed = self.remove_at(node)?;
        self.audit_after_mutation()?;

        Ok(Some(removed))
    }

    /// Removes the value equal to `value`, returning whether it was present.
    pub fn delete(&mut self, value: &T) -> Result<bool> {
        self.remove(value).map(|removed| removed.is_some())
    }

    fn remove_at(&mut self, node: NodeId) -> Result<T> {
        // A node with two children trades values with its in-order successor, the minimum of its
        // right subtree. The successor has no left child, so it is then spliced out like any
        // other node with at most one child, taking the removed value with it.
        let target = match (self.nodes[node].left(), self.nodes[node].right()) {
            (Some(_), Some(right)) => {
                let successor = self.min_in_subtree(right);
                self.nodes.swap_values(node, successor);
                successor
            }
            _ => node,
        };

        let (removed, parent) = self.splice(target);
        self.rebalance_from(parent)?;

        Ok(removed)
    }

    // Unlinks `node`, which has at most one child, elevating the child into its place.
    //
    // Returns the node's value and its former parent.
    fn splice(&mut self, node: NodeId) -> (T, Link) {
        let left = self.nodes[node].left();
        let right = self.nodes[node].right();
        debug_assert!(left.is_none() || right.is_none(), "spliced node must not be binary");

        let child = left.or(right);
        let parent = self.nodes[node].parent();

        self.replace_child_or_set_root(parent, node, child);
        self.maybe_set_parent(child, parent);

        self.len -= 1;
        (self.nodes.free(node), parent)
    }

    /// Clears the tree, removing all elements.
    ///
    /// Rotation statistics are kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns an iterator over the values of the tree in order.
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter::new(self)
    }

    fn audit_after_mutation(&self) -> Result<()> {
        if self.config.audit_after_mutation {
            self.check_invariants()?;
        }

        Ok(())
    }

    // Support methods ========================================================

    #[inline]
    fn ensure_live(&self, node: NodeId) -> Result<()> {
        if self.nodes.contains(node) {
            Ok(())
        } else {
            Err(Error::UnknownNode(node))
        }
    }

    // Returns the minimum node in the subtree rooted at `root`.
    fn min_in_subtree(&self, root: NodeId) -> NodeId {
        let mut cur = root;

        while let Some(left) = self.nodes[cur].left() {
            cur = left;
        }

        cur
    }

    fn maybe_set_parent(&mut self, opt_node: Link, parent: Link) {
        let Some(node) = opt_node else {
            return;
        };

        self.nodes[node].set_parent(parent);
    }

    #[inline]
    fn replace_child_or_set_root(&mut self, parent: Link, old_child: NodeId, new_child: Link) {
        match parent {
            Some(parent) => self.replace_child(parent, old_child, new_child),
            None => self.root = new_child,
        }
    }

    // Replaces the child link of `parent` pointing at `old_child` with `new_child`.
    //
    // `new_child`'s parent link is not updated.
    fn replace_child(&mut self, parent: NodeId, old_child: NodeId, new_child: Link) {
        let links = &mut self.nodes[parent];

        if links.left() == Some(old_child) {
            links.set_child(Dir::Left, new_child);
        } else {
            debug_assert_eq!(
                links.right(),
                Some(old_child),
                "`old_child` must be a child of `parent`"
            );
            links.set_child(Dir::Right, new_child);
        }
    }

    fn which_child(&self, parent: NodeId, child: NodeId) -> Dir {
        if self.nodes[parent].left() == Some(child) {
            Dir::Left
        } else {
            Dir::Right
        }
    }

    /// Returns the height of the linked subtree.
    #[inline]
    fn height_at(&self, link: Link) -> i32 {
        link.map(|n| self.nodes[n].height()).unwrap_or(EMPTY_HEIGHT)
    }

    #[inline]
    fn computed_height(&self, node: NodeId) -> i32 {
        let links = &self.nodes[node];
        1 + self.height_at(links.left()).max(self.height_at(links.right()))
    }

    #[inline]
    fn update_height(&mut self, node: NodeId) {
        let height = self.computed_height(node);
        self.nodes[node].set_height(height);
    }

    #[inline]
    fn bf(&self, node: NodeId) -> i32 {
        let links = &self.nodes[node];
        self.height_at(links.left()) - self.height_at(links.right())
    }
}

impl<T, C> Default for AvlTree<T, C>
where
    C: Comparator<T> + Default,
{
    fn default() -> Self {
        AvlTree::with_comparator(C::default())
    }
}

impl<'tree, T, C> IntoIterator for &'tree AvlTree<T, C>
where
    C: Comparator<T>,
{
    type Item = &'tree T;
    type IntoIter = Iter<'tree, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> fmt::Debug for AvlTree<T, C>
where
    T: fmt::Debug,
    C: Comparator<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
