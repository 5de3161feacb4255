use std::collections::BTreeSet;

use aka_tree::RBTreeSet;
use aka_tree::rbtree_set;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 10_000;

fn value_strategy() -> impl Strategy<Value = i64> {
    // Use a range that's smaller than TEST_SIZE to ensure value collisions
    -20_000i64..20_000i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i64),
    Remove(i64),
    Contains(i64),
    First,
    Last,
    PopFirst,
    PopLast,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Insert),
        3 => value_strategy().prop_map(SetOp::Remove),
        2 => value_strategy().prop_map(SetOp::Contains),
        1 => Just(SetOp::First),
        1 => Just(SetOp::Last),
        1 => Just(SetOp::PopFirst),
        1 => Just(SetOp::PopLast),
    ]
}

// ─── Core CRUD operations ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of insert/remove/query operations on both
    /// RBTreeSet and BTreeSet and asserts identical results at every step.
    #[test]
    fn set_ops_match_btreeset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        let mut rb_set: RBTreeSet<i64> = RBTreeSet::new();
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                SetOp::Insert(v) => {
                    let rb_result = rb_set.insert(*v);
                    let bt_result = bt_set.insert(*v);
                    prop_assert_eq!(rb_result, bt_result, "insert({})", v);
                }
                SetOp::Remove(v) => {
                    let rb_result = rb_set.remove(v);
                    let bt_result = bt_set.remove(v);
                    prop_assert_eq!(rb_result, bt_result, "remove({})", v);
                }
                SetOp::Contains(v) => {
                    let rb_result = rb_set.contains(v);
                    let bt_result = bt_set.contains(v);
                    prop_assert_eq!(rb_result, bt_result, "contains({})", v);
                }
                SetOp::First => {
                    prop_assert_eq!(rb_set.first(), bt_set.first(), "first() mismatch");
                }
                SetOp::Last => {
                    prop_assert_eq!(rb_set.last(), bt_set.last(), "last() mismatch");
                }
                SetOp::PopFirst => {
                    prop_assert_eq!(rb_set.pop_first(), bt_set.pop_first(), "pop_first() mismatch");
                }
                SetOp::PopLast => {
                    prop_assert_eq!(rb_set.pop_last(), bt_set.pop_last(), "pop_last() mismatch");
                }
            }

            prop_assert_eq!(rb_set.len(), bt_set.len(), "len() mismatch after {:?}", op);
            prop_assert_eq!(rb_set.is_empty(), bt_set.is_empty(), "is_empty() mismatch after {:?}", op);
        }

        let rb_items: Vec<i64> = rb_set.iter().copied().collect();
        let bt_items: Vec<i64> = bt_set.iter().copied().collect();
        prop_assert_eq!(&rb_items, &bt_items, "final contents mismatch");
    }

    /// Tests iteration in both directions matches BTreeSet.
    #[test]
    fn iter_matches_btreeset(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let bt_set: BTreeSet<i64> = values.iter().copied().collect();

        let rb_items: Vec<i64> = rb_set.iter().copied().collect();
        let bt_items: Vec<i64> = bt_set.iter().copied().collect();
        prop_assert_eq!(&rb_items, &bt_items, "iter() mismatch");

        let rb_rev: Vec<i64> = rb_set.iter().rev().copied().collect();
        let bt_rev: Vec<i64> = bt_set.iter().rev().copied().collect();
        prop_assert_eq!(&rb_rev, &bt_rev, "iter().rev() mismatch");

        let rb_owned: Vec<i64> = rb_set.into_iter().collect();
        let bt_owned: Vec<i64> = bt_set.into_iter().collect();
        prop_assert_eq!(&rb_owned, &bt_owned, "into_iter() mismatch");
    }

    /// Tests ExactSizeIterator and DoubleEndedIterator behavior.
    #[test]
    fn iter_size_and_double_ended(values in proptest::collection::vec(value_strategy(), 1..TEST_SIZE)) {
        let rb_set: RBTreeSet<i64> = values.iter().copied().collect();

        let iter = rb_set.iter();
        let len = iter.len();
        prop_assert_eq!(len, rb_set.len(), "ExactSizeIterator len mismatch");

        // Alternating front/back should yield all elements
        let mut from_front = Vec::new();
        let mut from_back = Vec::new();
        let mut iter = rb_set.iter();
        let mut toggle = true;
        loop {
            if toggle {
                if let Some(item) = iter.next() {
                    from_front.push(item);
                } else {
                    break;
                }
            } else if let Some(item) = iter.next_back() {
                from_back.push(item);
            } else {
                break;
            }
            toggle = !toggle;
        }
        prop_assert_eq!(from_front.len() + from_back.len(), rb_set.len());
    }

    /// Tests that clear produces an empty set.
    #[test]
    fn clear_empties_set(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let mut rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        rb_set.clear();
        prop_assert!(rb_set.is_empty());
        prop_assert_eq!(rb_set.len(), 0);
        prop_assert_eq!(rb_set.iter().count(), 0);
    }

    /// Tests get returns the stored value for present elements and None otherwise.
    #[test]
    fn get_matches_btreeset(
        values in proptest::collection::vec(value_strategy(), TEST_SIZE),
        probes in proptest::collection::vec(value_strategy(), 1_000),
    ) {
        let rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let bt_set: BTreeSet<i64> = values.iter().copied().collect();

        for probe in &probes {
            prop_assert_eq!(rb_set.get(probe), bt_set.get(probe), "get({})", probe);
        }
    }

    /// Tests take removes and returns present elements exactly like BTreeSet.
    #[test]
    fn take_matches_btreeset(
        values in proptest::collection::vec(value_strategy(), TEST_SIZE),
        probes in proptest::collection::vec(value_strategy(), TEST_SIZE / 5),
    ) {
        let mut rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let mut bt_set: BTreeSet<i64> = values.iter().copied().collect();

        for probe in &probes {
            prop_assert_eq!(rb_set.take(probe), bt_set.take(probe), "take({})", probe);
            prop_assert_eq!(rb_set.len(), bt_set.len(), "len() mismatch after take({})", probe);
        }

        let rb_items: Vec<i64> = rb_set.iter().copied().collect();
        let bt_items: Vec<i64> = bt_set.iter().copied().collect();
        prop_assert_eq!(&rb_items, &bt_items, "contents mismatch after takes");
    }

    /// Tests FromIterator deduplicates and sorts exactly like BTreeSet.
    #[test]
    fn from_iter_matches_btreeset(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let bt_set: BTreeSet<i64> = values.iter().copied().collect();

        prop_assert_eq!(rb_set.len(), bt_set.len());
        let rb_items: Vec<i64> = rb_set.iter().copied().collect();
        let bt_items: Vec<i64> = bt_set.iter().copied().collect();
        prop_assert_eq!(&rb_items, &bt_items, "FromIterator mismatch");
    }

    /// Tests Extend behaves like repeated insert.
    #[test]
    fn extend_matches_btreeset(
        initial in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
        extra in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
    ) {
        let mut rb_set: RBTreeSet<i64> = initial.iter().copied().collect();
        let mut bt_set: BTreeSet<i64> = initial.iter().copied().collect();

        rb_set.extend(extra.iter().copied());
        bt_set.extend(extra.iter().copied());

        prop_assert_eq!(rb_set.len(), bt_set.len());
        let rb_items: Vec<i64> = rb_set.iter().copied().collect();
        let bt_items: Vec<i64> = bt_set.iter().copied().collect();
        prop_assert_eq!(&rb_items, &bt_items, "Extend mismatch");
    }

    /// Tests Clone produces an equal, independent set.
    #[test]
    fn clone_produces_equal_set(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let mut cloned = rb_set.clone();

        prop_assert_eq!(&rb_set, &cloned);

        // Mutating the clone must not affect the original
        cloned.insert(i64::MAX);
        prop_assert_eq!(cloned.len(), rb_set.len() + 1);
        prop_assert!(!rb_set.contains(&i64::MAX));
    }

    /// Tests equality agrees with BTreeSet on the same inputs.
    #[test]
    fn eq_matches_btreeset(
        a_values in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
        b_values in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
    ) {
        let rb_a: RBTreeSet<i64> = a_values.iter().copied().collect();
        let rb_b: RBTreeSet<i64> = b_values.iter().copied().collect();
        let bt_a: BTreeSet<i64> = a_values.iter().copied().collect();
        let bt_b: BTreeSet<i64> = b_values.iter().copied().collect();

        prop_assert_eq!(rb_a == rb_b, bt_a == bt_b, "equality mismatch");
    }

    /// Tests lexicographic ordering agrees with BTreeSet.
    #[test]
    fn ord_matches_btreeset(
        a_values in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
        b_values in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
    ) {
        let rb_a: RBTreeSet<i64> = a_values.iter().copied().collect();
        let rb_b: RBTreeSet<i64> = b_values.iter().copied().collect();
        let bt_a: BTreeSet<i64> = a_values.iter().copied().collect();
        let bt_b: BTreeSet<i64> = b_values.iter().copied().collect();

        prop_assert_eq!(rb_a.cmp(&rb_b), bt_a.cmp(&bt_b), "cmp mismatch");
        prop_assert_eq!(rb_a.partial_cmp(&rb_b), bt_a.partial_cmp(&bt_b), "partial_cmp mismatch");
    }
}

// ─── merge and swap ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Tests merge moves every element missing from self and leaves the
    /// duplicates behind in other.
    #[test]
    fn merge_moves_missing_and_keeps_duplicates(
        a_values in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
        b_values in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
    ) {
        let mut rb_a: RBTreeSet<i64> = a_values.iter().copied().collect();
        let mut rb_b: RBTreeSet<i64> = b_values.iter().copied().collect();
        let bt_a: BTreeSet<i64> = a_values.iter().copied().collect();
        let bt_b: BTreeSet<i64> = b_values.iter().copied().collect();

        rb_a.merge(&mut rb_b);

        let expected_merged: Vec<i64> = bt_a.union(&bt_b).copied().collect();
        let expected_leftover: Vec<i64> = bt_a.intersection(&bt_b).copied().collect();

        let merged: Vec<i64> = rb_a.iter().copied().collect();
        let leftover: Vec<i64> = rb_b.iter().copied().collect();
        prop_assert_eq!(&merged, &expected_merged, "merged contents mismatch");
        prop_assert_eq!(&leftover, &expected_leftover, "leftover contents mismatch");
        prop_assert_eq!(rb_a.len(), expected_merged.len());
        prop_assert_eq!(rb_b.len(), expected_leftover.len());
    }

    /// Tests swap exchanges the full contents of two sets.
    #[test]
    fn swap_exchanges_sets(
        a_values in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
        b_values in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
    ) {
        let mut rb_a: RBTreeSet<i64> = a_values.iter().copied().collect();
        let mut rb_b: RBTreeSet<i64> = b_values.iter().copied().collect();
        let bt_a: BTreeSet<i64> = a_values.iter().copied().collect();
        let bt_b: BTreeSet<i64> = b_values.iter().copied().collect();

        rb_a.swap(&mut rb_b);

        let a_items: Vec<i64> = rb_a.iter().copied().collect();
        let b_items: Vec<i64> = rb_b.iter().copied().collect();
        let expected_a: Vec<i64> = bt_b.iter().copied().collect();
        let expected_b: Vec<i64> = bt_a.iter().copied().collect();
        prop_assert_eq!(&a_items, &expected_a, "contents of self after swap mismatch");
        prop_assert_eq!(&b_items, &expected_b, "contents of other after swap mismatch");
    }
}

// ─── Hash consistency ────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Tests that equal sets produce equal hashes.
    #[test]
    fn hash_consistent_for_equal_sets(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        use std::hash::{DefaultHasher, Hash, Hasher};

        // Reversed insertion order must not change the stored contents
        let rb_set1: RBTreeSet<i64> = values.iter().copied().collect();
        let rb_set2: RBTreeSet<i64> = values.iter().rev().copied().collect();

        let mut h1 = DefaultHasher::new();
        let mut h2 = DefaultHasher::new();
        rb_set1.hash(&mut h1);
        rb_set2.hash(&mut h2);

        prop_assert_eq!(&rb_set1, &rb_set2);
        prop_assert_eq!(h1.finish(), h2.finish(), "equal sets should have equal hashes");
    }
}

// ─── Consuming iterator interleaved tests ─────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Tests into_iter with interleaved next/next_back matches BTreeSet.
    #[test]
    fn into_iter_interleaved_next_next_back(values in proptest::collection::vec(value_strategy(), 1..TEST_SIZE)) {
        let rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let bt_set: BTreeSet<i64> = values.iter().copied().collect();

        let mut rb_iter = rb_set.into_iter();
        let mut bt_iter = bt_set.into_iter();

        let mut rb_items = Vec::new();
        let mut bt_items = Vec::new();

        let mut toggle = true;
        loop {
            if toggle {
                match (rb_iter.next(), bt_iter.next()) {
                    (Some(rb_item), Some(bt_item)) => {
                        prop_assert_eq!(rb_item, bt_item, "into_iter interleaved next() mismatch");
                        rb_items.push(rb_item);
                        bt_items.push(bt_item);
                    }
                    (None, None) => break,
                    (rb, bt) => {
                        prop_assert!(false, "into_iter next() mismatch: rb={:?}, bt={:?}", rb, bt);
                    }
                }
            } else {
                match (rb_iter.next_back(), bt_iter.next_back()) {
                    (Some(rb_item), Some(bt_item)) => {
                        prop_assert_eq!(rb_item, bt_item, "into_iter interleaved next_back() mismatch");
                        rb_items.push(rb_item);
                        bt_items.push(bt_item);
                    }
                    (None, None) => break,
                    (rb, bt) => {
                        prop_assert!(false, "into_iter next_back() mismatch: rb={:?}, bt={:?}", rb, bt);
                    }
                }
            }
            toggle = !toggle;
        }

        prop_assert_eq!(rb_items.len(), bt_items.len(), "into_iter interleaved total count mismatch");
    }
}

// ─── Deterministic Insertion Pattern Tests ────────────────────────────────────

/// Generates `n` pseudo-random values from a fixed-seed LCG, so the same
/// sequence (duplicates included) is produced on every run.
fn random_values_deterministic(n: usize) -> Vec<i64> {
    let mut values = Vec::with_capacity(n);
    let mut x: u64 = 12345; // Fixed seed for reproducibility
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        values.push((x >> 33) as i64);
    }
    values
}

mod insertion_pattern_tests {
    use std::collections::BTreeSet;

    use aka_tree::RBTreeSet;

    use super::*;

    const N: usize = 10_000;

    /// Tests ordered (ascending) inserts match BTreeSet.
    #[test]
    fn ordered_inserts_match_btreeset() {
        let mut rb_set: RBTreeSet<i64> = RBTreeSet::new();
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        // Insert in ascending order
        for i in 0..N as i64 {
            rb_set.insert(i);
            bt_set.insert(i);
        }

        // Verify length
        assert_eq!(rb_set.len(), N);
        assert_eq!(rb_set.len(), bt_set.len());

        // Verify all elements match
        let rb_items: Vec<i64> = rb_set.iter().copied().collect();
        let bt_items: Vec<i64> = bt_set.iter().copied().collect();
        assert_eq!(rb_items, bt_items, "ordered inserts content mismatch");

        // Verify first/last
        assert_eq!(rb_set.first(), bt_set.first());
        assert_eq!(rb_set.last(), bt_set.last());
    }

    /// Tests reverse-ordered (descending) inserts match BTreeSet.
    #[test]
    fn reverse_ordered_inserts_match_btreeset() {
        let mut rb_set: RBTreeSet<i64> = RBTreeSet::new();
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        // Insert in descending order
        for i in (0..N as i64).rev() {
            rb_set.insert(i);
            bt_set.insert(i);
        }

        // Verify length
        assert_eq!(rb_set.len(), N);
        assert_eq!(rb_set.len(), bt_set.len());

        // Verify all elements match
        let rb_items: Vec<i64> = rb_set.iter().copied().collect();
        let bt_items: Vec<i64> = bt_set.iter().copied().collect();
        assert_eq!(rb_items, bt_items, "reverse ordered inserts content mismatch");

        // Verify first/last
        assert_eq!(rb_set.first(), bt_set.first());
        assert_eq!(rb_set.last(), bt_set.last());
    }

    /// Tests random inserts match BTreeSet.
    #[test]
    fn random_inserts_match_btreeset() {
        let values = random_values_deterministic(N);
        let mut rb_set: RBTreeSet<i64> = RBTreeSet::new();
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        // Insert in random order
        for &v in &values {
            rb_set.insert(v);
            bt_set.insert(v);
        }

        // Verify length matches (accounting for duplicates in random values)
        assert_eq!(rb_set.len(), bt_set.len());

        // Verify all elements match
        let rb_items: Vec<i64> = rb_set.iter().copied().collect();
        let bt_items: Vec<i64> = bt_set.iter().copied().collect();
        assert_eq!(rb_items, bt_items, "random inserts content mismatch");

        // Verify first/last
        assert_eq!(rb_set.first(), bt_set.first());
        assert_eq!(rb_set.last(), bt_set.last());
    }

    /// Tests ordered contains checks match BTreeSet.
    #[test]
    fn ordered_contains_match_btreeset() {
        let rb_set: RBTreeSet<i64> = (0..N as i64).collect();
        let bt_set: BTreeSet<i64> = (0..N as i64).collect();

        // Probe in ascending order
        for i in 0..N as i64 {
            assert_eq!(rb_set.contains(&i), bt_set.contains(&i), "ordered contains({}) mismatch", i);
        }

        // Probe some non-existent values
        for i in [N as i64, N as i64 + 1, -1, -100] {
            assert_eq!(
                rb_set.contains(&i),
                bt_set.contains(&i),
                "ordered contains({}) for missing value mismatch",
                i
            );
        }
    }

    /// Tests reverse-ordered contains checks match BTreeSet.
    #[test]
    fn reverse_ordered_contains_match_btreeset() {
        let rb_set: RBTreeSet<i64> = (0..N as i64).collect();
        let bt_set: BTreeSet<i64> = (0..N as i64).collect();

        // Probe in descending order
        for i in (0..N as i64).rev() {
            assert_eq!(rb_set.contains(&i), bt_set.contains(&i), "reverse contains({}) mismatch", i);
        }
    }

    /// Tests random contains checks match BTreeSet.
    #[test]
    fn random_contains_match_btreeset() {
        let values = random_values_deterministic(N);
        let rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let bt_set: BTreeSet<i64> = values.iter().copied().collect();

        // Probe in random order (same as insertion order)
        for &v in &values {
            assert_eq!(rb_set.contains(&v), bt_set.contains(&v), "random contains({}) mismatch", v);
        }
    }

    /// Tests ordered remove operations match BTreeSet.
    #[test]
    fn ordered_removes_match_btreeset() {
        let mut rb_set: RBTreeSet<i64> = (0..N as i64).collect();
        let mut bt_set: BTreeSet<i64> = (0..N as i64).collect();

        // Remove in ascending order
        for i in 0..N as i64 {
            let rb_result = rb_set.remove(&i);
            let bt_result = bt_set.remove(&i);
            assert_eq!(rb_result, bt_result, "ordered remove({}) mismatch", i);
        }

        assert!(rb_set.is_empty());
        assert_eq!(rb_set.len(), bt_set.len());
    }

    /// Tests reverse-ordered remove operations match BTreeSet.
    #[test]
    fn reverse_ordered_removes_match_btreeset() {
        let mut rb_set: RBTreeSet<i64> = (0..N as i64).collect();
        let mut bt_set: BTreeSet<i64> = (0..N as i64).collect();

        // Remove in descending order
        for i in (0..N as i64).rev() {
            let rb_result = rb_set.remove(&i);
            let bt_result = bt_set.remove(&i);
            assert_eq!(rb_result, bt_result, "reverse remove({}) mismatch", i);
        }

        assert!(rb_set.is_empty());
        assert_eq!(rb_set.len(), bt_set.len());
    }

    /// Tests random remove operations match BTreeSet.
    #[test]
    fn random_removes_match_btreeset() {
        let values = random_values_deterministic(N);
        let mut rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let mut bt_set: BTreeSet<i64> = values.iter().copied().collect();

        // Remove in random order (same as insertion order)
        for &v in &values {
            let rb_result = rb_set.remove(&v);
            let bt_result = bt_set.remove(&v);
            assert_eq!(rb_result, bt_result, "random remove({}) mismatch", v);
        }

        assert!(rb_set.is_empty());
        assert_eq!(rb_set.len(), bt_set.len());
    }

    /// Tests full CRUD cycle with ordered inserts then removes.
    #[test]
    fn ordered_insert_then_ordered_remove() {
        let mut rb_set: RBTreeSet<i64> = RBTreeSet::new();
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        // Insert in ascending order
        for i in 0..N as i64 {
            rb_set.insert(i);
            bt_set.insert(i);
        }

        // Verify iteration after inserts
        let rb_items: Vec<i64> = rb_set.iter().copied().collect();
        let bt_items: Vec<i64> = bt_set.iter().copied().collect();
        assert_eq!(rb_items, bt_items);

        // Remove in ascending order, checking iteration periodically
        for i in 0..N as i64 {
            rb_set.remove(&i);
            bt_set.remove(&i);

            if i % 1000 == 999 {
                let rb_items: Vec<i64> = rb_set.iter().copied().collect();
                let bt_items: Vec<i64> = bt_set.iter().copied().collect();
                assert_eq!(rb_items, bt_items, "iteration mismatch after removing {}", i);
            }
        }

        assert!(rb_set.is_empty());
    }

    /// Tests full CRUD cycle with random inserts then removes.
    #[test]
    fn random_insert_then_random_remove() {
        let values = random_values_deterministic(N);
        let mut rb_set: RBTreeSet<i64> = RBTreeSet::new();
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        // Insert in random order
        for &v in &values {
            rb_set.insert(v);
            bt_set.insert(v);
        }

        // Verify iteration after inserts
        let rb_items: Vec<i64> = rb_set.iter().copied().collect();
        let bt_items: Vec<i64> = bt_set.iter().copied().collect();
        assert_eq!(rb_items, bt_items);

        // Remove in random order, checking iteration periodically
        for (i, &v) in values.iter().enumerate() {
            rb_set.remove(&v);
            bt_set.remove(&v);

            if i % 1000 == 999 {
                let rb_items: Vec<i64> = rb_set.iter().copied().collect();
                let bt_items: Vec<i64> = bt_set.iter().copied().collect();
                assert_eq!(rb_items, bt_items, "iteration mismatch after {} removals", i + 1);
            }
        }

        assert!(rb_set.is_empty());
    }

    /// Tests ascending inserts followed by a few scattered removes.
    #[test]
    fn ordered_inserts_with_scattered_removes() {
        let mut set: RBTreeSet<i64> = RBTreeSet::new();
        for i in 1..=100 {
            assert!(set.insert(i));
        }
        assert_eq!(set.len(), 100);

        for v in [1, 2, 10, 11] {
            assert!(set.remove(&v));
        }

        assert_eq!(set.len(), 96);
        assert!(!set.contains(&1));
        assert!(!set.contains(&2));
        assert!(!set.contains(&10));
        assert!(!set.contains(&11));
        assert!(set.contains(&3));
        assert!(set.contains(&100));

        let expected: Vec<i64> = (1..=100).filter(|v| ![1, 2, 10, 11].contains(v)).collect();
        let items: Vec<i64> = set.iter().copied().collect();
        assert_eq!(items, expected);
    }

    /// Tests interleaved inserts and removes keep the contents sorted.
    #[test]
    fn interleaved_inserts_and_removes_stay_sorted() {
        let mut set = RBTreeSet::from([5, 4, 3, 2, 7, 8, 9]);
        assert_eq!(set.len(), 7);

        assert!(set.remove(&7));
        assert!(set.insert(6));
        assert!(set.insert(1));
        assert!(set.remove(&3));

        let items: Vec<i64> = set.iter().copied().collect();
        assert_eq!(items, vec![1, 2, 4, 5, 6, 8, 9]);
        assert_eq!(set.first(), Some(&1));
        assert_eq!(set.last(), Some(&9));
    }
}

// ─── Coverage-focused top-down tests ────────────────────────────────────────

#[test]
#[allow(clippy::double_ended_iterator_last)]
fn capacity_default_from_array_extend_refs_and_iter_traits() {
    let set: RBTreeSet<i64> = RBTreeSet::with_capacity(8);
    assert!(set.is_empty());
    assert_eq!(set.capacity(), 8);

    let default_set: RBTreeSet<i64> = Default::default();
    assert!(default_set.is_empty());
    let _ = format!("{:?}", default_set);

    let from_arr = RBTreeSet::from([3, 1, 2]);
    let items: Vec<i64> = from_arr.iter().copied().collect();
    assert_eq!(items, vec![1, 2, 3]);

    let data = [4_i64, 5, 6];
    let mut extend_set: RBTreeSet<i64> = RBTreeSet::new();
    extend_set.extend(data.iter());
    assert_eq!(extend_set.len(), 3);
    assert!(extend_set.contains(&5));

    let iter = extend_set.iter();
    assert_eq!(iter.len(), 3);
    let _ = format!("{:?}", iter);
    assert_eq!(iter.clone().last(), Some(&6));

    let borrowed: Vec<i64> = (&extend_set).into_iter().copied().collect();
    assert_eq!(borrowed, vec![4, 5, 6]);

    let empty_iter: rbtree_set::Iter<'_, i64> = Default::default();
    assert_eq!(empty_iter.len(), 0);
    let _ = format!("{:?}", empty_iter);

    let empty_into_iter: rbtree_set::IntoIter<i64> = Default::default();
    assert_eq!(empty_into_iter.len(), 0);
    let _ = format!("{:?}", empty_into_iter);
}

#[test]
fn merge_and_swap_fast_paths() {
    let mut target = RBTreeSet::from([1]);
    let mut empty_source: RBTreeSet<i64> = RBTreeSet::new();
    target.merge(&mut empty_source);
    assert_eq!(target.len(), 1);
    assert!(empty_source.is_empty());

    let mut empty_target: RBTreeSet<i64> = RBTreeSet::new();
    let mut source = RBTreeSet::from([2, 3]);
    empty_target.merge(&mut source);
    assert!(source.is_empty());
    let items: Vec<i64> = empty_target.iter().copied().collect();
    assert_eq!(items, vec![2, 3]);

    let mut left = RBTreeSet::from([1]);
    let mut right: RBTreeSet<i64> = RBTreeSet::new();
    left.swap(&mut right);
    assert!(left.is_empty());
    assert_eq!(right.len(), 1);
}

#[test]
fn merge_retains_duplicates_in_source() {
    let mut target = RBTreeSet::from([1, 2, 3]);
    let mut source = RBTreeSet::from([2, 3, 4, 5]);

    target.merge(&mut source);

    let merged: Vec<i64> = target.iter().copied().collect();
    assert_eq!(merged, vec![1, 2, 3, 4, 5]);
    let leftover: Vec<i64> = source.iter().copied().collect();
    assert_eq!(leftover, vec![2, 3]);
}

#[test]
fn duplicate_insert_leaves_set_unchanged() {
    let mut set = RBTreeSet::from([1, 2, 3]);

    assert!(!set.insert(2));

    assert_eq!(set.len(), 3);
    let items: Vec<i64> = set.iter().copied().collect();
    assert_eq!(items, vec![1, 2, 3]);
}

#[test]
fn alternating_pops_drain_in_order() {
    let mut set: RBTreeSet<i64> = (0..10).collect();
    let mut bt_set: BTreeSet<i64> = (0..10).collect();

    loop {
        let rb = set.pop_first();
        assert_eq!(rb, bt_set.pop_first());
        if rb.is_none() {
            break;
        }

        let rb = set.pop_last();
        assert_eq!(rb, bt_set.pop_last());
        if rb.is_none() {
            break;
        }
    }

    assert!(set.is_empty());
    assert!(bt_set.is_empty());
}

#[test]
fn take_leaves_empty_set() {
    let mut set = RBTreeSet::from([1, 2, 3]);
    let moved = std::mem::take(&mut set);

    assert!(set.is_empty());
    assert_eq!(moved.len(), 3);
    let items: Vec<i64> = moved.iter().copied().collect();
    assert_eq!(items, vec![1, 2, 3]);
}
