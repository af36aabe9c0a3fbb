use core::fmt;

use crate::{AvlTree, Comparator, Dir, Error, NodeId, Result};

/// The four AVL rotations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// Single rotation lifting the right child.
    Left,
    /// Single rotation lifting the left child.
    Right,
    /// Left rotation of the left child, then right rotation of the pivot.
    LeftRight,
    /// Right rotation of the right child, then left rotation of the pivot.
    RightLeft,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Left,
        Rotation::Right,
        Rotation::LeftRight,
        Rotation::RightLeft,
    ];

    pub const fn is_double(self) -> bool {
        matches!(self, Rotation::LeftRight | Rotation::RightLeft)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rotation::Left => "left",
            Rotation::Right => "right",
            Rotation::LeftRight => "left-right",
            Rotation::RightLeft => "right-left",
        })
    }
}

/// A node whose balance factor exceeds the AVL bound, and the rotation that corrects it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Imbalance {
    pub node: NodeId,
    /// Balance factor of `node`, either 2 or -2.
    pub balance_factor: i32,
    /// Balance factor of the child on the heavy side.
    pub child_balance_factor: i32,
    pub rotation: Rotation,
}

impl<T, C> AvlTree<T, C>
where
    C: Comparator<T>,
{
    /// Classifies the imbalance at `node`.
    ///
    /// Returns `Ok(None)` if `|bf(node)| <= 1`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidBalanceFactor`] if `|bf(node)| > 2`; a single insert or removal
    /// never produces such a node, so it indicates an earlier missed correction.
    pub fn imbalance(&self, node: NodeId) -> Result<Option<Imbalance>> {
        self.ensure_live(node)?;
        self.classify(node)
    }

    /// Returns `true` if [`balance`](Self::balance) would rotate at `node`.
    pub fn can_balance(&self, node: NodeId) -> bool {
        matches!(self.imbalance(node), Ok(Some(_)))
    }

    /// Corrects the imbalance at `node`, if any.
    ///
    /// Returns the new local subtree root, which has replaced `node` in its parent, or `None` if
    /// `node` was within the AVL bound. Ancestor heights are not updated.
    pub fn balance(&mut self, node: NodeId) -> Result<Option<NodeId>> {
        self.ensure_live(node)?;
        self.balance_at(node)
    }

    pub(crate) fn balance_at(&mut self, node: NodeId) -> Result<Option<NodeId>> {
        let Some(imbalance) = self.classify(node)? else {
            return Ok(None);
        };

        let up = self.apply(imbalance.rotation, node)?;

        tracing::trace!(
            rotation = %imbalance.rotation,
            pivot = %node,
            balance_factor = imbalance.balance_factor,
            new_root = %up,
            "rebalance"
        );

        Ok(Some(up))
    }

    // A zero balance factor on the heavy child selects the single rotation. Both choices restore
    // the height bound, but only the single rotation yields the canonical AVL shape.
    pub(crate) fn classify(&self, node: NodeId) -> Result<Option<Imbalance>> {
        let balance_factor = self.bf(node);

        let heavy = match balance_factor {
            -1..=1 => return Ok(None),
            2 => Dir::Left,
            -2 => Dir::Right,
            _ => {
                return Err(Error::InvalidBalanceFactor {
                    node,
                    balance_factor,
                })
            }
        };

        // The heavy side has height >= 1, so the child exists in a coherent tree.
        let child = self.nodes[node].child(heavy).ok_or(Error::MissingChild {
            pivot: node,
            side: heavy,
        })?;
        let child_balance_factor = self.bf(child);

        let rotation = match heavy {
            Dir::Left if child_balance_factor < 0 => Rotation::LeftRight,
            Dir::Left => Rotation::Right,
            Dir::Right if child_balance_factor > 0 => Rotation::RightLeft,
            Dir::Right => Rotation::Left,
        };

        Ok(Some(Imbalance {
            node,
            balance_factor,
            child_balance_factor,
            rotation,
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::{AvlTree, Config, Dir, Error, Imbalance, NaturalOrder, NodeId, Rotation};

    // Hangs `values` off each other along `dirs` without rebalancing.
    fn path(values: &[u32], dirs: &[Dir]) -> (AvlTree<u32>, Vec<NodeId>) {
        assert_eq!(values.len(), dirs.len() + 1);

        let mut tree = AvlTree::with_config(NaturalOrder, Config::strict());
        let mut ids = vec![tree.nodes.alloc(values[0], None).unwrap()];

        for (&value, &dir) in values[1..].iter().zip(dirs) {
            let parent = *ids.last().unwrap();
            let node = tree.nodes.alloc(value, Some(parent)).unwrap();
            tree.nodes[parent].set_child(dir, Some(node));
            ids.push(node);
        }

        for &node in ids.iter().rev() {
            tree.update_height(node);
        }
        tree.root = Some(ids[0]);
        tree.len = ids.len();

        (tree, ids)
    }

    #[test]
    fn balanced_nodes_need_no_rotation() {
        let (tree, ids) = path(&[1, 2], &[Dir::Right]);

        assert_eq!(tree.imbalance(ids[0]), Ok(None));
        assert!(!tree.can_balance(ids[0]));
    }

    #[test]
    fn outer_cases_select_single_rotations() {
        let (tree, ids) = path(&[3, 2, 1], &[Dir::Left, Dir::Left]);
        assert_eq!(
            tree.imbalance(ids[0]),
            Ok(Some(Imbalance {
                node: ids[0],
                balance_factor: 2,
                child_balance_factor: 1,
                rotation: Rotation::Right,
            }))
        );

        let (tree, ids) = path(&[1, 2, 3], &[Dir::Right, Dir::Right]);
        let imbalance = tree.imbalance(ids[0]).unwrap().unwrap();
        assert_eq!(imbalance.rotation, Rotation::Left);
        assert_eq!(imbalance.balance_factor, -2);
        assert!(tree.can_balance(ids[0]));
    }

    #[test]
    fn inner_cases_select_double_rotations() {
        let (tree, ids) = path(&[3, 1, 2], &[Dir::Left, Dir::Right]);
        let imbalance = tree.imbalance(ids[0]).unwrap().unwrap();
        assert_eq!(imbalance.rotation, Rotation::LeftRight);
        assert_eq!(imbalance.child_balance_factor, -1);
        assert!(imbalance.rotation.is_double());

        let (tree, ids) = path(&[1, 3, 2], &[Dir::Right, Dir::Left]);
        assert_eq!(
            tree.imbalance(ids[0]).unwrap().unwrap().rotation,
            Rotation::RightLeft
        );
    }

    #[test]
    fn zero_child_balance_selects_single_rotation() {
        // 5 is left-heavy by two and its left child 3 has balance factor zero, the shape a
        // removal from the right subtree leaves behind.
        let (mut tree, ids) = path(&[5, 3, 2], &[Dir::Left, Dir::Left]);
        let four = tree.nodes.alloc(4, Some(ids[1])).unwrap();
        tree.nodes[ids[1]].set_child(Dir::Right, Some(four));
        tree.len += 1;

        let imbalance = tree.imbalance(ids[0]).unwrap().unwrap();
        assert_eq!(imbalance.child_balance_factor, 0);
        assert_eq!(imbalance.rotation, Rotation::Right);

        let up = tree.balance(ids[0]).unwrap();
        assert_eq!(up, Some(ids[1]));
        assert_eq!(tree.height_of(ids[1]), Some(2));
        assert_eq!(tree.balance_factor(ids[1]), Some(-1));
        tree.assert_invariants();
    }

    #[test]
    fn excessive_imbalance_is_an_error() {
        let (tree, ids) = path(&[1, 2, 3, 4], &[Dir::Right, Dir::Right, Dir::Right]);

        assert_eq!(
            tree.imbalance(ids[0]),
            Err(Error::InvalidBalanceFactor {
                node: ids[0],
                balance_factor: -3,
            })
        );
        assert!(!tree.can_balance(ids[0]));
    }

    #[test]
    fn rotation_names() {
        let names: Vec<String> = Rotation::ALL.iter().map(|r| r.to_string()).collect();
        assert_eq!(names, ["left", "right", "left-right", "right-left"]);
    }
}
