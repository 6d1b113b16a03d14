use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rrbvec::Vector;

#[test]
fn concat_keeps_both_sides_in_order() {
    let a: Vector<usize> = (0..1234).collect();
    let b: Vector<usize> = (1234..3000).collect();
    let joined = a.concat(&b);
    joined.debug_check_invariants();
    assert_eq!(joined.len(), 3000);
    assert!(joined.iter().copied().eq(0..3000));
    // The inputs are unchanged.
    assert_eq!(a.len(), 1234);
    assert_eq!(b.len(), 1766);
}

#[test]
fn repeated_concat_matches_im_vector() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut ours: Vector<u32> = Vector::new();
    let mut theirs: im::Vector<u32> = im::Vector::new();
    for _ in 0..40 {
        let len = rng.gen_range(0..400);
        let piece: Vec<u32> = (0..len).map(|_| rng.gen()).collect();
        let piece_ours: Vector<u32> = piece.iter().cloned().collect();
        ours = ours.concat(&piece_ours);
        theirs.extend(piece.iter().cloned());
        ours.debug_check_invariants();
        assert_eq!(ours.len(), theirs.len());
    }
    assert!(ours.iter().eq(theirs.iter()));
    for i in (0..ours.len()).step_by(101) {
        assert_eq!(ours.get(i), theirs.get(i));
    }
}

#[test]
fn mixed_workload_matches_im_vector() {
    let mut rng = StdRng::seed_from_u64(4242);
    let mut ours: Vector<u32> = Vector::new();
    let mut theirs: im::Vector<u32> = im::Vector::new();
    for step in 0..3000u32 {
        match rng.gen_range(0..10) {
            0..=5 => {
                ours = ours.push_back(step);
                theirs.push_back(step);
            }
            6..=7 if !theirs.is_empty() => {
                let i = rng.gen_range(0..theirs.len());
                ours = ours.set(i, step);
                theirs.set(i, step);
            }
            _ => {
                let len = rng.gen_range(0..100);
                let piece: Vec<u32> = (0..len).map(|_| rng.gen()).collect();
                let piece_ours: Vector<u32> = piece.iter().cloned().collect();
                ours = ours.concat(&piece_ours);
                theirs.extend(piece);
            }
        }
    }
    ours.debug_check_invariants();
    assert_eq!(ours.len(), theirs.len());
    assert!(ours.iter().eq(theirs.iter()));
}

#[test]
fn concat_chain_is_associative() {
    let pieces: Vec<Vector<usize>> = (0..6)
        .map(|k| (k * 100..k * 100 + 77).collect())
        .collect();
    let mut left_fold = Vector::new();
    for p in &pieces {
        left_fold = left_fold.concat(p);
    }
    let mut right_fold = Vector::new();
    for p in pieces.iter().rev() {
        right_fold = p.concat(&right_fold);
    }
    left_fold.debug_check_invariants();
    right_fold.debug_check_invariants();
    assert_eq!(left_fold, right_fold);
}
