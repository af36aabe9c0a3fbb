use core::{
    fmt, mem,
    ops::{Index, IndexMut, Not},
};

use crate::{Error, Result};

/// A handle to a node stored in an [`AvlTree`](crate::AvlTree).
///
/// Handles are plain arena indices. A handle is invalidated when its node is removed, and the
/// slot may later be reused for a different value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) const fn new(index: u32) -> NodeId {
        NodeId(index)
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The side of a child link.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dir::Left => f.write_str("left"),
            Dir::Right => f.write_str("right"),
        }
    }
}

pub(crate) type Link = Option<NodeId>;

/// Height of a missing subtree.
pub(crate) const EMPTY_HEIGHT: i32 = -1;

pub(crate) struct Node<T> {
    pub(crate) value: T,
    parent: Link,
    children: [Link; 2],
    height: i32,
}

impl<T> Node<T> {
    fn leaf(value: T, parent: Link) -> Node<T> {
        Node {
            value,
            parent,
            children: [None; 2],
            height: 0,
        }
    }

    #[inline]
    pub(crate) fn parent(&self) -> Link {
        self.parent
    }

    #[inline]
    pub(crate) fn child(&self, dir: Dir) -> Link {
        self.children[dir as usize]
    }

    #[inline]
    pub(crate) fn left(&self) -> Link {
        self.child(Dir::Left)
    }

    #[inline]
    pub(crate) fn right(&self) -> Link {
        self.child(Dir::Right)
    }

    #[inline]
    pub(crate) fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Link) -> Link {
        mem::replace(&mut self.parent, parent)
    }

    #[inline]
    pub(crate) fn set_child(&mut self, dir: Dir, child: Link) -> Link {
        mem::replace(&mut self.children[dir as usize], child)
    }

    #[inline]
    pub(crate) fn set_height(&mut self, height: i32) {
        self.height = height;
    }
}

// The handle of the slot at index `len`, if it is addressable.
fn slot_id(len: usize) -> Result<NodeId> {
    u32::try_from(len)
        .map(NodeId::new)
        .map_err(|_| Error::ArenaFull { len })
}

enum Slot<T> {
    Occupied(Node<T>),
    Vacant { next_free: Link },
}

/// Flat node storage. Vacated slots form an intrusive free list.
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Link,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Arena<T> {
        Arena {
            slots: Vec::new(),
            free_head: None,
        }
    }

    /// Allocates a leaf holding `value`, reusing a vacant slot when one exists.
    ///
    /// Fails with [`Error::ArenaFull`] once every `u32` index is taken.
    pub(crate) fn alloc(&mut self, value: T, parent: Link) -> Result<NodeId> {
        let node = Node::leaf(value, parent);

        let id = match self.free_head {
            Some(id) => {
                let slot = mem::replace(&mut self.slots[id.index()], Slot::Occupied(node));
                self.free_head = match slot {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
                };
                id
            }
            None => {
                let id = slot_id(self.slots.len())?;
                self.slots.push(Slot::Occupied(node));
                id
            }
        };

        Ok(id)
    }

    /// Vacates the slot of `id`, returning the stored value.
    pub(crate) fn free(&mut self, id: NodeId) -> T {
        assert!(self.contains(id), "double free of node {id}");

        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };

        match mem::replace(&mut self.slots[id.index()], vacant) {
            Slot::Occupied(node) => {
                self.free_head = Some(id);
                node.value
            }
            Slot::Vacant { .. } => unreachable!(),
        }
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<T>> {
        match self.slots.get(id.index())? {
            Slot::Occupied(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    #[inline]
    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Exchanges the values stored in two live nodes, leaving their links untouched.
    pub(crate) fn swap_values(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }

        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(hi.index());

        match (&mut head[lo.index()], &mut tail[0]) {
            (Slot::Occupied(x), Slot::Occupied(y)) => mem::swap(&mut x.value, &mut y.value),
            _ => panic!("cannot swap values of vacant nodes {a} and {b}"),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = Node<T>;

    #[inline]
    fn index(&self, id: NodeId) -> &Node<T> {
        match &self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("node {id} is not live"),
        }
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match &mut self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("node {id} is not live"),
        }
    }
}
