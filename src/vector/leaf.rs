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

use super::WIDTH;

/// Leaf node body: an inline buffer of up to `WIDTH` elements.
///
/// Bodies are allocated on the heap and shared between tree versions via the
/// embedded reference count; a body is immutable once its pointer has been
/// handed out.
#[repr(C)]
pub(crate) struct Leaf<T> {
    rc: atomic::AtomicU32,
    elems: ArrayVec<T, WIDTH>,
}

impl<T> Leaf<T> {
    pub(crate) fn new(elems: ArrayVec<T, WIDTH>) -> NonNull<Self> {
        unsafe {
            let layout = Layout::new::<Self>();
            let Some(ptr) = NonNull::new(alloc(layout) as *mut Self) else {
                handle_alloc_error(layout);
            };
            ptr.write(Self {
                rc: atomic::AtomicU32::new(1),
                elems,
            });
            ptr
        }
    }

    pub(crate) fn empty() -> NonNull<Self> {
        Self::new(ArrayVec::new())
    }

    pub(crate) fn unit(value: T) -> NonNull<Self> {
        let mut elems = ArrayVec::new();
        elems.push(value);
        Self::new(elems)
    }

    pub(crate) fn len(&self) -> usize {
        self.elems.len()
    }

    pub(crate) fn elems(&self) -> &[T] {
        &self.elems
    }

    pub(crate) unsafe fn rc_inc(leaf: NonNull<Self>) -> NonNull<Self> {
        unsafe {
            let leaf = leaf.as_ptr();
            let mut current = (*leaf).rc.load(Relaxed);
            loop {
                if current == u32::MAX {
                    panic!("max refcount exceeded");
                }
                match (*leaf)
                    .rc
                    .compare_exchange(current, current + 1, Relaxed, Relaxed)
                {
                    Ok(_) => return NonNull::new_unchecked(leaf),
                    Err(v) => current = v,
                }
            }
        }
    }

    pub(crate) unsafe fn rc_dec(leaf: NonNull<Self>) {
        unsafe {
            let ptr = leaf.as_ptr();
            if (*ptr).rc.fetch_sub(1, Release) != 1 {
                return;
            }
            (*ptr).rc.load(Acquire);

            std::ptr::drop_in_place(ptr);

            let layout = Layout::new::<Self>();
            dealloc(ptr as *mut u8, layout);
        }
    }
}

impl<T: Clone> Leaf<T> {
    pub(crate) fn from_slice(elems: &[T]) -> NonNull<Self> {
        debug_assert!(elems.len() <= WIDTH);
        Self::new(elems.iter().cloned().collect())
    }

    /// A fresh leaf holding `left` followed by `right`.
    pub(crate) fn from_pair(left: &[T], right: &[T]) -> NonNull<Self> {
        debug_assert!(left.len() + right.len() <= WIDTH);
        let mut elems: ArrayVec<T, WIDTH> = ArrayVec::new();
        elems.extend(left.iter().cloned());
        elems.extend(right.iter().cloned());
        Self::new(elems)
    }

    /// A copy of this leaf with `value` appended.
    pub(crate) fn emplace(&self, value: T) -> NonNull<Self> {
        debug_assert!(self.len() < WIDTH);
        let mut elems: ArrayVec<T, WIDTH> = self.elems.iter().cloned().collect();
        elems.push(value);
        Self::new(elems)
    }
}
