use crate::{AvlTree, Comparator, Rotation};

/// Rotations performed by a tree, by kind.
///
/// A double rotation counts once, under its own kind.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RotationStats {
    pub left: usize,
    pub right: usize,
    pub left_right: usize,
    pub right_left: usize,
}

impl RotationStats {
    pub const fn new() -> RotationStats {
        RotationStats {
            left: 0,
            right: 0,
            left_right: 0,
            right_left: 0,
        }
    }

    pub const fn get(&self, rotation: Rotation) -> usize {
        match rotation {
            Rotation::Left => self.left,
            Rotation::Right => self.right,
            Rotation::LeftRight => self.left_right,
            Rotation::RightLeft => self.right_left,
        }
    }

    pub const fn total(&self) -> usize {
        self.left + self.right + self.left_right + self.right_left
    }

    pub(crate) fn record(&mut self, rotation: Rotation) {
        let count = match rotation {
            Rotation::Left => &mut self.left,
            Rotation::Right => &mut self.right,
            Rotation::LeftRight => &mut self.left_right,
            Rotation::RightLeft => &mut self.right_left,
        };
        *count += 1;
    }
}

/// Distribution of balance factors over the nodes of a tree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceStats {
    pub nodes: usize,
    /// Nodes with a balance factor of zero.
    pub balanced: usize,
    pub left_heavy: usize,
    pub right_heavy: usize,
}

/// The height of a tree compared with the bounds for its size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HeightAnalysis {
    pub height: i32,
    /// The greatest height any AVL tree with the same number of nodes can have.
    pub avl_bound: i32,
    /// The height of a perfectly balanced tree with the same number of nodes.
    pub optimal: i32,
}

// Largest `h` such that a minimal AVL tree of height `h` has at most `len` nodes.
fn avl_height_bound(len: usize) -> i32 {
    if len == 0 {
        return -1;
    }

    // Node counts of minimal AVL trees of heights `h - 1` and `h`.
    let (mut smaller, mut current) = (0usize, 1usize);
    let mut height = 0;

    loop {
        let next = current.saturating_add(smaller).saturating_add(1);
        if next > len {
            return height;
        }

        (smaller, current) = (current, next);
        height += 1;
    }
}

// `ceil(log2(len + 1)) - 1`
fn optimal_height(len: usize) -> i32 {
    if len == 0 {
        return -1;
    }

    let levels = usize::BITS - len.leading_zeros();
    levels as i32 - 1
}

impl<T, C> AvlTree<T, C>
where
    C: Comparator<T>,
{
    /// Returns the rotations performed since the tree was created or the statistics were reset.
    pub const fn rotation_stats(&self) -> RotationStats {
        self.rotations
    }

    /// Returns the total number of rotations performed.
    ///
    /// A double rotation counts as one rotation, not as the two single rotations it is made of.
    pub const fn rotation_count(&self) -> usize {
        self.rotations.total()
    }

    pub fn reset_rotation_stats(&mut self) {
        self.rotations = RotationStats::new();
    }

    /// Counts nodes by the sign of their balance factor.
    pub fn balance_stats(&self) -> BalanceStats {
        let mut stats = BalanceStats::default();
        let mut stack: Vec<_> = self.root.into_iter().collect();

        while let Some(node) = stack.pop() {
            stats.nodes += 1;

            match self.bf(node) {
                0 => stats.balanced += 1,
                bf if bf > 0 => stats.left_heavy += 1,
                _ => stats.right_heavy += 1,
            }

            stack.extend(self.nodes[node].left());
            stack.extend(self.nodes[node].right());
        }

        stats
    }

    pub fn height_analysis(&self) -> HeightAnalysis {
        HeightAnalysis {
            height: self.height(),
            avl_bound: avl_height_bound(self.len),
            optimal: optimal_height(self.len),
        }
    }
}
