use crate::{node::Link, AvlTree, Comparator, Dir};

enum CameFrom {
    Parent,
    LeftChild,
    Here,
    RightChild,
}

/// An in-order iterator over the values of an [`AvlTree`].
///
/// The walk follows parent links, so it needs no stack.
pub struct Iter<'tree, T, C> {
    tree: &'tree AvlTree<T, C>,

    front_cur: Link,
    front_from: CameFrom,

    len: usize,
}

impl<'tree, T, C> Iter<'tree, T, C>
where
    C: Comparator<T>,
{
    pub(crate) fn new(tree: &'tree AvlTree<T, C>) -> Self {
        Iter {
            tree,

            front_cur: tree.root,
            front_from: CameFrom::Parent,
            len: tree.len(),
        }
    }
}

impl<'tree, T, C> Iterator for Iter<'tree, T, C>
where
    C: Comparator<T>,
{
    type Item = &'tree T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let tree: &'tree AvlTree<T, C> = self.tree;
        let nodes = &tree.nodes;
        let mut cur = self.front_cur?;

        loop {
            match self.front_from {
                CameFrom::Parent => {
                    // Upon entering a new subtree, find the minimum element.
                    while let Some(left) = nodes[cur].left() {
                        cur = left;
                    }

                    // Once the minimum is found, its (empty) left subtree has been exhausted.
                    self.front_from = CameFrom::LeftChild;
                }

                CameFrom::LeftChild => {
                    // The left subtree has been exhausted, so this node is up next.
                    self.front_cur = Some(cur);
                    self.front_from = CameFrom::Here;
                    self.len -= 1;

                    return Some(&nodes[cur].value);
                }

                CameFrom::Here => {
                    if let Some(right) = nodes[cur].right() {
                        self.front_from = CameFrom::Parent;
                        cur = right;
                    } else if let Some(parent) = nodes[cur].parent() {
                        self.front_from = match tree.which_child(parent, cur) {
                            Dir::Left => CameFrom::LeftChild,
                            Dir::Right => CameFrom::RightChild,
                        };
                        cur = parent;
                    } else {
                        unreachable!("iterator ran past the maximum with elements remaining")
                    }
                }

                CameFrom::RightChild => {
                    // Ascend until we find the successor element.
                    while let Some(parent) = nodes[cur].parent() {
                        match tree.which_child(parent, cur) {
                            Dir::Left => {
                                cur = parent;
                                break;
                            }
                            Dir::Right => cur = parent,
                        }
                    }

                    self.front_cur = Some(cur);
                    self.front_from = CameFrom::LeftChild;
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T, C> ExactSizeIterator for Iter<'_, T, C> where C: Comparator<T> {}

#[cfg(test)]
mod tests {
    use crate::AvlTree;

    #[test]
    fn yields_sorted_values() {
        let mut tree = AvlTree::new();
        for v in [5, 3, 8, 1, 4, 7, 9, 2, 6] {
            tree.insert(v).unwrap();
        }

        let mut iter = tree.iter();
        assert_eq!(iter.len(), 9);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.len(), 8);

        let rest: Vec<_> = iter.copied().collect();
        assert_eq!(rest, [2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let tree = AvlTree::<u32>::new();
        assert_eq!(tree.iter().next(), None);
    }

    #[test]
    fn into_iterator_for_ref() {
        let mut tree = AvlTree::new();
        for c in "tree".chars() {
            tree.insert(c).unwrap();
        }

        let chars: String = (&tree).into_iter().collect();
        assert_eq!(chars, "ert");
        assert_eq!(format!("{tree:?}"), "{'e', 'r', 't'}");
    }
}
