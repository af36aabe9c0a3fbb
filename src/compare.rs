use core::cmp::Ordering;

/// A three-way comparator injected into a tree at construction.
///
/// Any `Fn(&T, &T) -> Ordering` closure is a comparator. Closures passed to
/// [`AvlTree::with_comparator`](crate::AvlTree::with_comparator) should annotate their argument
/// types so the borrow lifetimes are inferred as higher-ranked.
pub trait Comparator<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Compares values by their [`Ord`] implementation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T, F> Comparator<T> for F
where
    T: ?Sized,
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}
