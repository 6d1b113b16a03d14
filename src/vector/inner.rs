use core::sync::atomic;
use core::sync::atomic::Ordering::Acquire;
use core::sync::atomic::Ordering::Relaxed;
use core::sync::atomic::Ordering::Release;
use std::alloc::alloc;
use std::alloc::dealloc;
use std::alloc::handle_alloc_error;
use std::alloc::Layout;
use std::ptr::NonNull;

use arrayvec::ArrayVec;

use super::node::Node;
use super::{BITS, WIDTH};

/// Interior node body: up to `WIDTH` children, plus an optional cumulative
/// size table.
///
/// The table is the structural discriminant between the two interior shapes:
/// without it the node is *strict* (every child but the rightmost is a fully
/// saturated subtree, so radix arithmetic on the index finds the child);
/// with it the node is *relaxed* (children may hold any number of elements,
/// and `sizes[i]` is the element count of children `0..=i`).
///
/// The table is allocated separately from the node and owned by it; entries
/// beyond the occupied slots stay zero.
#[repr(C)]
pub(crate) struct Inner<T> {
    rc: atomic::AtomicU32,
    sizes: Option<Box<[usize; WIDTH]>>,
    children: ArrayVec<Node<T>, WIDTH>,
}

impl<T> Inner<T> {
    fn alloc(body: Self) -> NonNull<Self> {
        unsafe {
            let layout = Layout::new::<Self>();
            let Some(ptr) = NonNull::new(alloc(layout) as *mut Self) else {
                handle_alloc_error(layout);
            };
            ptr.write(body);
            ptr
        }
    }

    pub(crate) fn empty() -> NonNull<Self> {
        Self::strict(ArrayVec::new())
    }

    pub(crate) fn strict(children: ArrayVec<Node<T>, WIDTH>) -> NonNull<Self> {
        Self::alloc(Self {
            rc: atomic::AtomicU32::new(1),
            sizes: None,
            children,
        })
    }

    /// A relaxed node at `level`, with the size table recomputed from the
    /// children.
    pub(crate) fn relaxed(children: ArrayVec<Node<T>, WIDTH>, level: usize) -> NonNull<Self> {
        let mut sizes = Box::new([0usize; WIDTH]);
        let mut acc = 0;
        for (i, child) in children.iter().enumerate() {
            acc += child.subtree_size(level - BITS);
            sizes[i] = acc;
        }
        Self::relaxed_with_sizes(children, sizes)
    }

    /// A relaxed node whose size table the caller has already filled in.
    pub(crate) fn relaxed_with_sizes(
        children: ArrayVec<Node<T>, WIDTH>,
        sizes: Box<[usize; WIDTH]>,
    ) -> NonNull<Self> {
        Self::alloc(Self {
            rc: atomic::AtomicU32::new(1),
            sizes: Some(sizes),
            children,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn children(&self) -> &[Node<T>] {
        &self.children
    }

    pub(crate) fn sizes(&self) -> Option<&[usize; WIDTH]> {
        self.sizes.as_deref()
    }

    pub(crate) fn is_relaxed(&self) -> bool {
        self.sizes.is_some()
    }

    /// A fresh size table holding the first `n` entries of this node's table.
    pub(crate) fn sizes_prefix(&self, n: usize) -> Box<[usize; WIDTH]> {
        let src = match &self.sizes {
            Some(sizes) => sizes,
            None => panic!("size table requested from a strict node"),
        };
        let mut out = Box::new([0usize; WIDTH]);
        out[..n].copy_from_slice(&src[..n]);
        out
    }

    pub(crate) unsafe fn rc_inc(inner: NonNull<Self>) -> NonNull<Self> {
        unsafe {
            let inner = inner.as_ptr();
            let mut current = (*inner).rc.load(Relaxed);
            loop {
                if current == u32::MAX {
                    panic!("max refcount exceeded");
                }
                match (*inner)
                    .rc
                    .compare_exchange(current, current + 1, Relaxed, Relaxed)
                {
                    Ok(_) => return NonNull::new_unchecked(inner),
                    Err(v) => current = v,
                }
            }
        }
    }

    pub(crate) unsafe fn rc_dec(inner: NonNull<Self>) {
        unsafe {
            let ptr = inner.as_ptr();
            if (*ptr).rc.fetch_sub(1, Release) != 1 {
                return;
            }
            (*ptr).rc.load(Acquire);

            // Dropping the body releases the size table and the owned child
            // handles, which in turn decrement their bodies.
            std::ptr::drop_in_place(ptr);

            let layout = Layout::new::<Self>();
            dealloc(ptr as *mut u8, layout);
        }
    }
}
