use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;

/// Walk every node and assert the structural invariants of a B-tree.
pub(crate) fn validate_tree<T: std::fmt::Debug, C: Compare<T>>(t: &BTree<T, C>) {
    let Some(root) = t.root else {
        assert_eq!(t.len, 0, "empty tree must have no keys");
        assert_eq!(t.height, 0, "empty tree must have height 0");
        assert_eq!(t.nodes.len(), 0, "empty tree must have no nodes");
        return;
    };

    let max_keys = t.max_keys;
    let min_keys = t.min_degree - 1;

    // (node, depth, lower bound, upper bound)
    let mut stack: Vec<(NodeId, usize, Option<&T>, Option<&T>)> = vec![(root, 1, None, None)];
    let mut key_count = 0usize;
    let mut node_count = 0usize;
    let mut leaf_depth: Option<usize> = None;

    while let Some((id, depth, lower, upper)) = stack.pop() {
        let node = t.nodes.get(id);
        node_count += 1;
        key_count += node.keys.len();

        assert!(node.keys.len() <= max_keys, "node over capacity: {:?}", node.keys);
        if id == root {
            assert!(!node.keys.is_empty(), "live root must hold a key");
        } else {
            assert!(node.keys.len() >= min_keys, "node under minimum: {:?}", node.keys);
        }

        for pair in node.keys.windows(2) {
            assert!(!t.cmp.lt(&pair[1], &pair[0]), "keys out of order: {:?}", node.keys);
        }
        for key in &node.keys {
            if let Some(lower) = lower {
                assert!(!t.cmp.lt(key, lower), "{key:?} below separator {lower:?}");
            }
            if let Some(upper) = upper {
                assert!(!t.cmp.lt(upper, key), "{key:?} above separator {upper:?}");
            }
        }

        if node.leaf {
            assert!(node.children.is_empty(), "leaf with children");
            match leaf_depth {
                Some(d) => assert_eq!(d, depth, "leaves at different depths"),
                None => leaf_depth = Some(depth),
            }
            continue;
        }

        assert_eq!(
            node.children.len(),
            node.keys.len() + 1,
            "internal node shape mismatch"
        );
        for (i, &child) in node.children.iter().enumerate() {
            let lo = if i == 0 { lower } else { Some(&node.keys[i - 1]) };
            let hi = node.keys.get(i).or(upper);
            stack.push((child, depth + 1, lo, hi));
        }
    }

    assert_eq!(key_count, t.len, "reachable keys must match len");
    assert_eq!(node_count, t.nodes.len(), "every allocated node must be reachable");
    assert_eq!(leaf_depth, Some(t.height), "stored height must match leaf depth");
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 6)]
    Insert(#[proptest(strategy = "0u32..128")] u32),
    #[proptest(weight = 2)]
    Contains(#[proptest(strategy = "0u32..128")] u32),
    #[proptest(weight = 1)]
    Levels,
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(192))]

    #[test]
    fn prop_matches_sorted_model(degree in 2usize..=6, ops in prop::collection::vec(any::<Op>(), 0..=1500)) {
        let mut t: BTree<u32> = BTree::new(degree).unwrap();
        let mut model: Vec<u32> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(key) => {
                    t.insert(key);
                    let at = model.partition_point(|&k| k <= key);
                    model.insert(at, key);
                }
                Op::Contains(key) => {
                    prop_assert_eq!(t.contains(&key), model.binary_search(&key).is_ok());
                    prop_assert_eq!(t.count(&key), model.iter().filter(|&&k| k == key).count());
                }
                Op::Levels => {
                    let levels: Vec<Vec<&u32>> = t.levels().collect();
                    prop_assert_eq!(levels.len(), t.height());
                    prop_assert_eq!(levels.iter().map(Vec::len).sum::<usize>(), t.len());
                }
            }

            prop_assert_eq!(t.len(), model.len());
        }

        validate_tree(&t);
        let got: Vec<u32> = t.iter().copied().collect();
        prop_assert_eq!(got, model);
    }

    #[test]
    fn prop_reverse_order(degree in 2usize..=5, keys in prop::collection::vec(any::<u16>(), 0..=600)) {
        let mut t = BTree::with_comparator(degree, Reverse).unwrap();
        t.extend(keys.iter().copied());
        validate_tree(&t);

        let mut expected = keys;
        expected.sort_unstable_by(|a, b| b.cmp(a));
        let got: Vec<u16> = t.iter().copied().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_levels_are_sorted_and_repeatable(degree in 2usize..=4, keys in prop::collection::vec(0u32..1000, 1..=400)) {
        let mut t = BTree::new(degree).unwrap();
        t.extend(keys.iter().copied());

        let first: Vec<LevelEvent<'_, u32>> = t.events().collect();
        let second: Vec<LevelEvent<'_, u32>> = t.events().collect();
        prop_assert_eq!(&first, &second);

        let starts = first.iter().filter(|e| matches!(e, LevelEvent::Start)).count();
        let ends = first.iter().filter(|e| matches!(e, LevelEvent::End)).count();
        prop_assert_eq!(starts, t.height());
        prop_assert_eq!(ends, t.height());

        for level in t.levels() {
            prop_assert!(level.windows(2).all(|w| w[0] <= w[1]));
        }
        prop_assert!(t.levels().next().map_or(0, |root| root.len()) <= 2 * degree - 1);
    }
}

/// Visit every ordering of `items` in place (Heap's algorithm).
fn for_each_permutation<T>(items: &mut [T], mut f: impl FnMut(&[T])) {
    let n = items.len();
    let mut counters = vec![0usize; n];
    f(items);

    let mut i = 1;
    while i < n {
        if counters[i] < i {
            let j = if i % 2 == 0 { 0 } else { counters[i] };
            items.swap(j, i);
            f(items);
            counters[i] += 1;
            i = 1;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
}

#[test]
fn exhaustive_insert_order_small_multiset() {
    // Duplicates exercise the equal-key routing on both sides of a split.
    let keys: Vec<u32> = vec![1, 2, 2, 3, 5, 5, 8];

    for degree in 2..=3 {
        let mut order = keys.clone();
        let mut visited = 0usize;
        for_each_permutation(&mut order, |perm| {
            visited += 1;
            let mut t = BTree::new(degree).unwrap();
            t.extend(perm.iter().copied());

            validate_tree(&t);
            let got: Vec<u32> = t.iter().copied().collect();
            assert_eq!(got, keys, "insert order {perm:?}");
            assert!(t.contains(&5));
            assert!(!t.contains(&4));
            assert_eq!(t.count(&5), 2);
        });
        assert_eq!(visited, 5040);
    }
}

#[test]
fn ascending_inserts_keep_leaves_level() {
    for degree in 2..=10 {
        let mut t = BTree::new(degree).unwrap();
        for k in 0u32..5_000 {
            t.insert(k);
        }
        validate_tree(&t);
        assert_eq!(t.len(), 5_000);
    }
}
