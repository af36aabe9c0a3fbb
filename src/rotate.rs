use core::cmp::Ordering;

use crate::{AvlTree, Comparator, Dir, Error, NodeId, Result, Rotation};

impl<T, C> AvlTree<T, C>
where
    C: Comparator<T>,
{
    /// Rotates `pivot` down to the left, lifting its right child into its place.
    ///
    /// Returns the new local subtree root. Heights are recomputed for `pivot` and the returned
    /// node only; ancestors are left for the caller to update.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MissingChild`] if `pivot` has no right child.
    pub fn rotate_left(&mut self, pivot: NodeId) -> Result<NodeId> {
        self.ensure_live(pivot)?;
        let up = self.rotate_at(pivot, Dir::Left)?;
        self.rotations.record(Rotation::Left);
        Ok(up)
    }

    /// Rotates `pivot` down to the right, lifting its left child into its place.
    ///
    /// The mirror image of [`rotate_left`](Self::rotate_left).
    pub fn rotate_right(&mut self, pivot: NodeId) -> Result<NodeId> {
        self.ensure_live(pivot)?;
        let up = self.rotate_at(pivot, Dir::Right)?;
        self.rotations.record(Rotation::Right);
        Ok(up)
    }

    /// Rotates the left child of `pivot` left, then `pivot` right.
    ///
    /// The right child of `pivot`'s left child becomes the new local root.
    pub fn rotate_left_right(&mut self, pivot: NodeId) -> Result<NodeId> {
        self.ensure_live(pivot)?;
        let up = self.rotate_twice_at(pivot, Dir::Right)?;
        self.rotations.record(Rotation::LeftRight);
        Ok(up)
    }

    /// Rotates the right child of `pivot` right, then `pivot` left.
    ///
    /// The left child of `pivot`'s right child becomes the new local root.
    pub fn rotate_right_left(&mut self, pivot: NodeId) -> Result<NodeId> {
        self.ensure_live(pivot)?;
        let up = self.rotate_twice_at(pivot, Dir::Left)?;
        self.rotations.record(Rotation::RightLeft);
        Ok(up)
    }

    /// Applies `rotation` at `pivot`.
    pub(crate) fn apply(&mut self, rotation: Rotation, pivot: NodeId) -> Result<NodeId> {
        match rotation {
            Rotation::Left => self.rotate_left(pivot),
            Rotation::Right => self.rotate_right(pivot),
            Rotation::LeftRight => self.rotate_left_right(pivot),
            Rotation::RightLeft => self.rotate_right_left(pivot),
        }
    }

    // Performs a single rotation, moving `pivot` down in direction `dir` and its `!dir` child up.
    //
    // - `pivot` becomes the `dir` child of `up`.
    // - `across` goes from the `dir` child of `up` to the `!dir` child of `pivot`.
    // - `pivot`'s former parent (or the root link) now points at `up`.
    fn rotate_at(&mut self, pivot: NodeId, dir: Dir) -> Result<NodeId> {
        let up = self.nodes[pivot].child(!dir).ok_or(Error::MissingChild {
            pivot,
            side: !dir,
        })?;

        let across = self.nodes[up].child(dir);
        self.nodes[pivot].set_child(!dir, across);
        self.maybe_set_parent(across, Some(pivot));

        self.nodes[up].set_child(dir, Some(pivot));
        let parent = self.nodes[pivot].set_parent(Some(up));
        self.nodes[up].set_parent(parent);
        self.replace_child_or_set_root(parent, pivot, Some(up));

        // `pivot` is now below `up`, so it must be updated first.
        self.update_height(pivot);
        self.update_height(up);

        if self.config.verify_rotations {
            self.verify_rotation(pivot, up, dir)?;
        }

        Ok(up)
    }

    // Performs a double rotation whose second step moves `pivot` down in direction `dir`.
    //
    // The first step rotates `pivot`'s `!dir` child in the opposite direction, so its `dir`
    // grandchild ends up at the top.
    fn rotate_twice_at(&mut self, pivot: NodeId, dir: Dir) -> Result<NodeId> {
        let down_first = self.nodes[pivot].child(!dir).ok_or(Error::MissingChild {
            pivot,
            side: !dir,
        })?;

        self.rotate_at(down_first, !dir)?;
        self.rotate_at(pivot, dir)
    }

    // Checks the links and local order around a rotation that moved `down` below `up`.
    fn verify_rotation(&self, down: NodeId, up: NodeId, dir: Dir) -> Result<()> {
        let fail = |reason| Error::InvalidRotation {
            pivot: down,
            reason,
        };

        if self.nodes[up].child(dir) != Some(down) || self.nodes[down].parent() != Some(up) {
            return Err(fail("pivot is not linked below the new subtree root"));
        }

        match self.nodes[up].parent() {
            Some(parent) => {
                let links = &self.nodes[parent];
                if links.left() != Some(up) && links.right() != Some(up) {
                    return Err(fail("former parent does not point at the new subtree root"));
                }
            }
            None => {
                if self.root != Some(up) {
                    return Err(fail("root link does not point at the new subtree root"));
                }
            }
        }

        for node in [down, up] {
            for side in [Dir::Left, Dir::Right] {
                let Some(child) = self.nodes[node].child(side) else {
                    continue;
                };

                if self.nodes[child].parent() != Some(node) {
                    return Err(fail("child back-reference was not updated"));
                }

                let expected = match side {
                    Dir::Left => Ordering::Less,
                    Dir::Right => Ordering::Greater,
                };
                let ordering = self
                    .cmp
                    .compare(&self.nodes[child].value, &self.nodes[node].value);
                if ordering != expected {
                    return Err(fail("local order is broken"));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{AvlTree, Config, Dir, Error, NaturalOrder, NodeId};

    // Builds a three node path without rebalancing: `values[1]` hangs off the root on side
    // `dirs[0]`, and `values[2]` hangs off that node on side `dirs[1]`.
    fn path(values: [u32; 3], dirs: [Dir; 2]) -> (AvlTree<u32>, [NodeId; 3]) {
        let mut tree = AvlTree::with_config(NaturalOrder, Config::strict());

        let a = tree.nodes.alloc(values[0], None).unwrap();
        let b = tree.nodes.alloc(values[1], Some(a)).unwrap();
        let c = tree.nodes.alloc(values[2], Some(b)).unwrap();
        tree.nodes[a].set_child(dirs[0], Some(b));
        tree.nodes[b].set_child(dirs[1], Some(c));

        for node in [c, b, a] {
            tree.update_height(node);
        }
        tree.root = Some(a);
        tree.len = 3;

        (tree, [a, b, c])
    }

    #[test]
    fn single_left_lifts_right_child() {
        let (mut tree, [a, b, c]) = path([1, 2, 3], [Dir::Right, Dir::Right]);
        assert_eq!(tree.balance_factor(a), Some(-2));

        let up = tree.rotate_left(a).unwrap();
        assert_eq!(up, b);
        assert_eq!(tree.root(), Some(b));
        assert_eq!(tree.left(b), Some(a));
        assert_eq!(tree.right(b), Some(c));
        assert_eq!(tree.parent(a), Some(b));
        assert_eq!(tree.height_of(a), Some(0));
        assert_eq!(tree.height_of(b), Some(1));
        assert_eq!(tree.rotation_stats().left, 1);
        tree.assert_invariants();
    }

    #[test]
    fn single_right_lifts_left_child() {
        let (mut tree, [a, b, c]) = path([3, 2, 1], [Dir::Left, Dir::Left]);

        let up = tree.rotate_right(a).unwrap();
        assert_eq!(up, b);
        assert_eq!(tree.root(), Some(b));
        assert_eq!(tree.left(b), Some(c));
        assert_eq!(tree.right(b), Some(a));
        assert_eq!(tree.rotation_stats().right, 1);
        tree.assert_invariants();
    }

    #[test]
    fn missing_child_is_reported() {
        let (mut tree, [a, ..]) = path([1, 2, 3], [Dir::Right, Dir::Right]);

        assert_eq!(
            tree.rotate_right(a),
            Err(Error::MissingChild {
                pivot: a,
                side: Dir::Left
            })
        );
        assert_eq!(
            tree.rotate_left_right(a),
            Err(Error::MissingChild {
                pivot: a,
                side: Dir::Left
            })
        );
        assert_eq!(tree.rotation_count(), 0);
    }

    #[test]
    fn left_right_lifts_the_grandchild() {
        let (mut tree, [a, b, c]) = path([3, 1, 2], [Dir::Left, Dir::Right]);

        let up = tree.rotate_left_right(a).unwrap();
        assert_eq!(up, c);
        assert_eq!(tree.root(), Some(c));
        assert_eq!(tree.left(c), Some(b));
        assert_eq!(tree.right(c), Some(a));
        tree.assert_invariants();

        let stats = tree.rotation_stats();
        assert_eq!(stats.left_right, 1);
        assert_eq!(stats.left, 0);
        assert_eq!(stats.right, 0);
    }

    #[test]
    fn right_left_lifts_the_grandchild() {
        let (mut tree, [a, b, c]) = path([1, 3, 2], [Dir::Right, Dir::Left]);

        let up = tree.rotate_right_left(a).unwrap();
        assert_eq!(up, c);
        assert_eq!(tree.root(), Some(c));
        assert_eq!(tree.left(c), Some(a));
        assert_eq!(tree.right(c), Some(b));
        assert_eq!(tree.rotation_stats().right_left, 1);
        tree.assert_invariants();
    }

    #[test]
    fn rotation_relinks_former_parent() {
        let mut tree = AvlTree::with_config(NaturalOrder, Config::strict());
        for v in [4, 2, 6, 1, 3, 5, 7] {
            tree.insert(v).unwrap();
        }

        let six = tree.find(&6).unwrap();
        let root = tree.root().unwrap();
        let seven = tree.rotate_left(six).unwrap();

        assert_eq!(tree.value(seven), Some(&7));
        assert_eq!(tree.right(root), Some(seven));
        assert_eq!(tree.parent(seven), Some(root));
        assert_eq!(tree.left(seven), Some(six));
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5, 6, 7]);

        // Ancestors keep their cached heights until a walk updates them.
        assert_eq!(tree.height_of(six), Some(1));
        assert_eq!(tree.height_of(seven), Some(2));
        assert_eq!(tree.height_of(root), Some(2));
        assert!(matches!(
            tree.check_invariants(),
            Err(Error::HeightMismatch { node, cached: 2, computed: 3 }) if node == root
        ));
    }

    #[test]
    fn verification_rejects_broken_order() {
        let config = Config::new().with_verify_rotations(true);
        let mut tree = AvlTree::with_config(NaturalOrder, config);
        for v in [4, 2, 6, 1, 3, 5, 7] {
            tree.insert(v).unwrap();
        }

        // Once 5 rises above 6, its value must sort before 6.
        let five = tree.find(&5).unwrap();
        let six = tree.find(&6).unwrap();
        tree.nodes[five].value = 100;

        assert_eq!(
            tree.rotate_right(six),
            Err(Error::InvalidRotation {
                pivot: six,
                reason: "local order is broken",
            })
        );
        assert_eq!(tree.rotation_count(), 0);
    }

    #[test]
    fn stale_handles_are_rejected() {
        let mut tree = AvlTree::new();
        tree.insert(1u32).unwrap();
        let node = tree.find(&1).unwrap();
        tree.remove(&1).unwrap();

        assert_eq!(tree.rotate_left(node), Err(Error::UnknownNode(node)));
    }
}
