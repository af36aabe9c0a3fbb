use core::cmp::Ordering;

use crate::{node::Link, AvlTree, Comparator, Dir, Error, NodeId, Result};

impl<T, C> AvlTree<T, C>
where
    C: Comparator<T>,
{
    /// Audits every invariant of the tree.
    ///
    /// Checks, for every node: parent links, order against all ancestors, cached height and
    /// balance factor. Also checks that the number of reachable nodes equals [`len`](Self::len).
    ///
    /// This operation completes in _O(n)_ time.
    pub fn check_invariants(&self) -> Result<()> {
        let Some(root) = self.root else {
            return self.check_len(0);
        };

        if self.nodes[root].parent().is_some() {
            return Err(Error::BrokenLink { node: root });
        }

        // Each entry carries the nearest ancestors the node must sort after and before.
        let mut stack: Vec<(NodeId, Link, Link)> = vec![(root, None, None)];
        let mut counted = 0;

        while let Some((node, lower, upper)) = stack.pop() {
            counted += 1;

            // A cycle would otherwise never terminate.
            if counted > self.len {
                return Err(Error::SizeMismatch {
                    len: self.len,
                    counted,
                });
            }

            let value = &self.nodes[node].value;
            let after_lower = lower.map_or(true, |lo| {
                self.cmp.compare(&self.nodes[lo].value, value) == Ordering::Less
            });
            let before_upper = upper.map_or(true, |hi| {
                self.cmp.compare(value, &self.nodes[hi].value) == Ordering::Less
            });
            if !after_lower || !before_upper {
                return Err(Error::OrderViolation { node });
            }

            let cached = self.nodes[node].height();
            let computed = self.computed_height(node);
            if cached != computed {
                return Err(Error::HeightMismatch {
                    node,
                    cached,
                    computed,
                });
            }

            let balance_factor = self.bf(node);
            if !(-1..=1).contains(&balance_factor) {
                return Err(Error::InvalidBalanceFactor {
                    node,
                    balance_factor,
                });
            }

            for dir in [Dir::Left, Dir::Right] {
                let Some(child) = self.nodes[node].child(dir) else {
                    continue;
                };

                if self.nodes[child].parent() != Some(node) {
                    return Err(Error::BrokenLink { node: child });
                }

                match dir {
                    Dir::Left => stack.push((child, lower, Some(node))),
                    Dir::Right => stack.push((child, Some(node), upper)),
                }
            }
        }

        self.check_len(counted)
    }

    fn check_len(&self, counted: usize) -> Result<()> {
        if counted == self.len {
            Ok(())
        } else {
            Err(Error::SizeMismatch {
                len: self.len,
                counted,
            })
        }
    }

    /// Returns `true` if every invariant holds.
    pub fn is_avl_valid(&self) -> bool {
        self.check_invariants().is_ok()
    }

    #[doc(hidden)]
    #[track_caller]
    pub fn assert_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("tree invariant violated: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{AvlTree, Dir, Error};

    fn sample() -> AvlTree<u32> {
        let mut tree = AvlTree::new();
        for v in [4, 2, 6, 1, 3, 5, 7] {
            tree.insert(v).unwrap();
        }
        tree.assert_invariants();
        tree
    }

    #[test]
    fn empty_tree_is_valid() {
        let tree = AvlTree::<u32>::new();
        assert_eq!(tree.check_invariants(), Ok(()));
        assert!(tree.is_avl_valid());
    }

    #[test]
    fn detects_stale_height() {
        let mut tree = sample();
        let root = tree.root().unwrap();
        tree.nodes[root].set_height(5);

        assert_eq!(
            tree.check_invariants(),
            Err(Error::HeightMismatch {
                node: root,
                cached: 5,
                computed: 2,
            })
        );
        assert!(!tree.is_avl_valid());
    }

    #[test]
    fn detects_order_violation_against_ancestor() {
        let mut tree = sample();

        // 3 sits in the left subtree of 4; raising it to 9 keeps it above its parent 2 but puts
        // it after the root.
        let three = tree.find(&3).unwrap();
        tree.nodes[three].value = 9;

        assert_eq!(
            tree.check_invariants(),
            Err(Error::OrderViolation { node: three })
        );
    }

    #[test]
    fn detects_broken_parent_link() {
        let mut tree = sample();
        let five = tree.find(&5).unwrap();
        let root = tree.root().unwrap();
        tree.nodes[five].set_parent(Some(root));

        assert_eq!(
            tree.check_invariants(),
            Err(Error::BrokenLink { node: five })
        );
    }

    #[test]
    fn detects_unbalanced_node() {
        let mut tree = sample();
        let six = tree.find(&6).unwrap();
        let five = tree.find(&5).unwrap();
        let seven = tree.find(&7).unwrap();

        // Move 5 below 7 as 8, leaving 6 right-heavy by two with order intact.
        tree.nodes[six].set_child(Dir::Left, None);
        tree.nodes[five].value = 8;
        tree.nodes[five].set_parent(Some(seven));
        tree.nodes[seven].set_child(Dir::Right, Some(five));
        tree.update_height(seven);
        tree.update_height(six);
        let root = tree.root().unwrap();
        tree.update_height(root);

        assert_eq!(
            tree.check_invariants(),
            Err(Error::InvalidBalanceFactor {
                node: six,
                balance_factor: -2,
            })
        );
    }

    #[test]
    fn detects_len_drift() {
        let mut tree = sample();
        tree.len += 1;

        assert_eq!(
            tree.check_invariants(),
            Err(Error::SizeMismatch { len: 8, counted: 7 })
        );
    }
}
