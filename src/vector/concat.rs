//! Two-tree concatenation.
//!
//! The engine descends the adjoining spines of both trees and joins the
//! innermost pair of leaves, rebalancing on the way back up: at every level
//! the children of the seam nodes are redistributed so that each relaxed
//! node stays within slack of the densest possible packing.

use arrayvec::ArrayVec;

use super::inner::Inner;
use super::leaf::Leaf;
use super::node::Node;
use super::{BITS, WIDTH};

/// Slack allowed over the densest packing before a merge pass runs.
const EXTRAS: usize = 2;
/// A node is left alone when it is within this many slots of full.
const INVARIANT: usize = 1;
/// Scratch capacity: children can come from three nodes at once.
const SCRATCH: usize = 3 * WIDTH;

/// Joins the subtree `l` (at level `lshift`) with `r` (at `rshift`),
/// preserving element order. Non-top calls return the joined node wrapped in
/// a parent at the next level up, ready for the caller's own rebalance; the
/// top call returns the new root itself.
pub(crate) fn concat_sub_tree<T: Clone>(
    lshift: usize,
    l: &Node<T>,
    rshift: usize,
    r: &Node<T>,
    is_top: bool,
) -> Node<T> {
    if lshift > rshift {
        let li = l.inner();
        let c = concat_sub_tree(
            lshift - BITS,
            &li.children()[li.len() - 1],
            rshift,
            r,
            false,
        );
        rebalance(Some(li), c, None, lshift, is_top)
    } else if lshift < rshift {
        let ri = r.inner();
        let c = concat_sub_tree(lshift, l, rshift - BITS, &ri.children()[0], false);
        rebalance(None, c, Some(ri), rshift, is_top)
    } else if lshift == 0 {
        let ll = l.leaf();
        let rl = r.leaf();
        if is_top && ll.len() + rl.len() <= WIDTH {
            Node::Leaf(Leaf::from_pair(ll.elems(), rl.elems()))
        } else {
            let mut children: ArrayVec<Node<T>, WIDTH> = ArrayVec::new();
            children.push(l.clone());
            children.push(r.clone());
            Node::Inner(Inner::relaxed(children, BITS))
        }
    } else {
        let li = l.inner();
        let ri = r.inner();
        let c = concat_sub_tree(
            lshift - BITS,
            &li.children()[li.len() - 1],
            rshift - BITS,
            &ri.children()[0],
            false,
        );
        rebalance(Some(li), c, Some(ri), lshift, is_top)
    }
}

/// Redistributes the children of the seam: everything from `lnode` except its
/// last child, everything from the joined `cnode`, and everything from
/// `rnode` except its first child. The result is one relaxed node (or, past
/// `WIDTH` children, a relaxed pair under a fresh parent).
fn rebalance<T: Clone>(
    lnode: Option<&Inner<T>>,
    cnode: Node<T>,
    rnode: Option<&Inner<T>>,
    shift: usize,
    is_top: bool,
) -> Node<T> {
    let mut all: ArrayVec<Node<T>, SCRATCH> = ArrayVec::new();
    if let Some(l) = lnode {
        for child in &l.children()[..l.len() - 1] {
            all.push(child.clone());
        }
    }
    for child in cnode.inner().children() {
        all.push(child.clone());
    }
    if let Some(r) = rnode {
        for child in &r.children()[1..] {
            all.push(child.clone());
        }
    }
    drop(cnode);

    // Plan: walk the slot counts, absorbing each undersized node into its
    // successors, until the population is within slack of the optimum. Only
    // the planned counts change here; the nodes themselves are rewritten
    // below.
    let mut slots: ArrayVec<usize, SCRATCH> = all.iter().map(|n| n.slot_count()).collect();
    let total: usize = slots.iter().sum();
    let optimal = (total - 1) / WIDTH + 1;
    let mut i = 0;
    while slots.len() >= optimal + EXTRAS {
        while slots[i] > WIDTH - INVARIANT {
            i += 1;
        }
        let mut remaining = slots[i];
        while remaining > 0 {
            let merged = (remaining + slots[i + 1]).min(WIDTH);
            remaining = remaining + slots[i + 1] - merged;
            slots[i] = merged;
            i += 1;
        }
        slots.remove(i);
        i -= 1;
    }

    // Materialize the plan with a cursor over the source children. A source
    // whose count already matches is reused whole; everything else is copied
    // into fresh nodes.
    let mut packed: ArrayVec<Node<T>, SCRATCH> = ArrayVec::new();
    let mut from_i = 0;
    let mut from_offset = 0;
    for &target in &slots {
        if from_offset == 0 && all[from_i].slot_count() == target {
            packed.push(all[from_i].clone());
            from_i += 1;
        } else if shift == BITS {
            let mut elems: ArrayVec<T, WIDTH> = ArrayVec::new();
            while elems.len() < target {
                let src = all[from_i].leaf().elems();
                let need = target - elems.len();
                let avail = src.len() - from_offset;
                if need >= avail {
                    elems.extend(src[from_offset..].iter().cloned());
                    from_i += 1;
                    from_offset = 0;
                } else {
                    elems.extend(src[from_offset..from_offset + need].iter().cloned());
                    from_offset += need;
                }
            }
            packed.push(Node::Leaf(Leaf::new(elems)));
        } else {
            let mut children: ArrayVec<Node<T>, WIDTH> = ArrayVec::new();
            while children.len() < target {
                let src = all[from_i].inner().children();
                let need = target - children.len();
                let avail = src.len() - from_offset;
                if need >= avail {
                    children.extend(src[from_offset..].iter().cloned());
                    from_i += 1;
                    from_offset = 0;
                } else {
                    children.extend(src[from_offset..from_offset + need].iter().cloned());
                    from_offset += need;
                }
            }
            packed.push(Node::Inner(Inner::relaxed(children, shift - BITS)));
        }
    }
    drop(all);

    if packed.len() <= WIDTH {
        let node = Node::Inner(Inner::relaxed(packed.into_iter().collect(), shift));
        if is_top {
            node
        } else {
            let mut wrapped: ArrayVec<Node<T>, WIDTH> = ArrayVec::new();
            wrapped.push(node);
            Node::Inner(Inner::relaxed(wrapped, shift + BITS))
        }
    } else {
        debug_assert!(packed.len() <= 2 * WIDTH);
        let mut left: ArrayVec<Node<T>, WIDTH> = ArrayVec::new();
        let mut right: ArrayVec<Node<T>, WIDTH> = ArrayVec::new();
        for (k, node) in packed.into_iter().enumerate() {
            if k < WIDTH {
                left.push(node);
            } else {
                right.push(node);
            }
        }
        let mut pair: ArrayVec<Node<T>, WIDTH> = ArrayVec::new();
        pair.push(Node::Inner(Inner::relaxed(left, shift)));
        pair.push(Node::Inner(Inner::relaxed(right, shift)));
        Node::Inner(Inner::relaxed(pair, shift + BITS))
    }
}
