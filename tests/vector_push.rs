use rrbvec::Vector;

#[test]
fn push_back_builds_the_sequence() {
    let mut v: Vector<u64> = Vector::new();
    for i in 0..2500 {
        v = v.push_back(i);
        assert_eq!(v.len() as u64, i + 1);
    }
    v.debug_check_invariants();
    for i in 0..2500u64 {
        assert_eq!(v.get(i as usize), Some(&i));
    }
}

#[test]
fn push_back_shares_the_old_version() {
    let base: Vector<u32> = (0..100).collect();
    let grown = base.push_back(100);
    assert_eq!(base.len(), 100);
    assert_eq!(grown.len(), 101);
    assert_eq!(base.get(100), None);
    assert_eq!(grown.get(100), Some(&100));
    base.debug_check_invariants();
    grown.debug_check_invariants();
}

#[test]
fn deep_tree_readback() {
    // Three trie levels plus a partial tail.
    let n = 32 * 32 * 32 + 1000;
    let v: Vector<usize> = (0..n).collect();
    v.debug_check_invariants();
    assert_eq!(v.len(), n);
    assert!(v.iter().copied().eq(0..n));
    for i in [0, 31, 32, 1023, 1024, 32767, 32768, n - 1] {
        assert_eq!(v[i], i);
    }
}

#[test]
fn extend_appends_in_order() {
    let mut v: Vector<i32> = (0..10).collect();
    v.extend(10..300);
    v.debug_check_invariants();
    assert!(v.iter().copied().eq(0..300));
}
