use std::ptr::NonNull;

use super::inner::Inner;
use super::leaf::Leaf;
use super::BITS;

/// Owning handle to a tree node. Each handle accounts for one reference on
/// the body it points at: cloning increments the count, dropping decrements
/// it and frees the body (and, through the body's child handles, the whole
/// unshared subtree) when the count reaches zero.
pub(crate) enum Node<T> {
    Inner(NonNull<Inner<T>>),
    Leaf(NonNull<Leaf<T>>),
}

unsafe impl<T: Send + Sync> Send for Node<T> {}
unsafe impl<T: Send + Sync> Sync for Node<T> {}

impl<T> Node<T> {
    pub(crate) fn inner(&self) -> &Inner<T> {
        match self {
            Node::Inner(ptr) => unsafe { ptr.as_ref() },
            Node::Leaf(_) => panic!("expected an inner node"),
        }
    }

    pub(crate) fn leaf(&self) -> &Leaf<T> {
        match self {
            Node::Leaf(ptr) => unsafe { ptr.as_ref() },
            Node::Inner(_) => panic!("expected a leaf node"),
        }
    }

    /// Occupied slots: children of an inner node, elements of a leaf.
    pub(crate) fn slot_count(&self) -> usize {
        match self {
            Node::Inner(_) => self.inner().len(),
            Node::Leaf(_) => self.leaf().len(),
        }
    }

    /// Total element count of the subtree rooted here, where `level` is this
    /// node's level in bits. Strict nodes derive it from saturation, walking
    /// only the right spine; relaxed nodes read their size table.
    pub(crate) fn subtree_size(&self, level: usize) -> usize {
        if level == 0 {
            return self.leaf().len();
        }
        let inner = self.inner();
        let count = inner.len();
        if count == 0 {
            return 0;
        }
        match inner.sizes() {
            Some(sizes) => sizes[count - 1],
            None => {
                ((count - 1) << level)
                    + inner.children()[count - 1].subtree_size(level - BITS)
            }
        }
    }

    /// The level a root positioned at this node would have, from the height
    /// of the leftmost branch.
    pub(crate) fn shift(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Inner(_) => BITS + self.inner().children()[0].shift(),
        }
    }
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        unsafe {
            match self {
                Node::Inner(ptr) => Node::Inner(Inner::rc_inc(*ptr)),
                Node::Leaf(ptr) => Node::Leaf(Leaf::rc_inc(*ptr)),
            }
        }
    }
}

impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        unsafe {
            match self {
                Node::Inner(ptr) => Inner::rc_dec(*ptr),
                Node::Leaf(ptr) => Leaf::rc_dec(*ptr),
            }
        }
    }
}
