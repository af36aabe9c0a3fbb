use crate::{node::Link, AvlTree, Comparator, Result};

impl<T, C> AvlTree<T, C>
where
    C: Comparator<T>,
{
    // Restores heights and balance on the path from `start` to the root.
    //
    // `start` is the parent of the node that was attached or spliced out. Every ancestor is
    // visited: insertion needs at most one rotation, but a removal can need one at every level,
    // and each rotation can shorten the subtree it was applied to.
    pub(crate) fn rebalance_from(&mut self, start: Link) -> Result<()> {
        let mut opt_cur = start;

        while let Some(cur) = opt_cur {
            self.update_height(cur);

            // A rotation puts a new node at `cur`'s former position. Its height is already
            // current, so the walk resumes at its parent.
            let top = self.balance_at(cur)?.unwrap_or(cur);
            opt_cur = self.nodes[top].parent();
        }

        Ok(())
    }
}
