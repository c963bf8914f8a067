use jbprojects::domain::ranking::{RankKey, RankedCollector};

#[test]
fn keeps_best_keys_regardless_of_arrival_order() {
    let mut collector = RankedCollector::new(3, |value: &i32| *value);
    for value in [5, 1, 9, 2, 8, 3] {
        collector.insert(value);
    }

    assert_eq!(collector.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn never_exceeds_capacity() {
    let mut collector = RankedCollector::new(4, |value: &u32| *value);
    for value in (0..50u32).map(|n| (n * 37) % 23) {
        collector.insert(value);
        assert!(collector.len() <= 4);
    }
    assert_eq!(collector.len(), 4);
}

#[test]
fn extend_matches_repeated_insert() {
    let items = [7, 3, 3, 10, 1, 6];

    let mut extended = RankedCollector::new(4, |value: &i32| -value);
    extended.extend(items);

    let mut inserted = RankedCollector::new(4, |value: &i32| -value);
    for item in items {
        inserted.insert(item);
    }

    assert_eq!(
        extended.into_vec(),
        inserted.into_vec()
    );
}

#[test]
fn extend_works_across_several_sources() {
    let mut collector = RankedCollector::new(3, |value: &i32| *value);
    collector.extend([9, 4]);
    collector.extend(vec![8, 1]);
    collector.extend(std::iter::once(2));

    assert_eq!(collector.into_vec(), vec![1, 2, 4]);
}

#[test]
fn equal_keys_keep_arrival_order() {
    let mut collector = RankedCollector::new(10, |item: &(i32, &str)| item.0);
    collector.extend([(1, "a"), (0, "b"), (1, "c"), (0, "d")]);

    let labels: Vec<&str> = collector.iter().map(|item| item.1).collect();
    assert_eq!(labels, vec!["b", "d", "a", "c"]);
}

#[test]
fn evict_worst_removes_largest_key() {
    let mut collector = RankedCollector::new(5, |value: &i32| *value);
    collector.extend([4, 2, 8]);

    assert_eq!(collector.evict_worst(), Some(8));
    assert_eq!(collector.evict_worst(), Some(4));
    assert_eq!(collector.evict_worst(), Some(2));
    assert_eq!(collector.evict_worst(), None);
    assert!(collector.is_empty());
}

#[test]
fn rank_keys_sort_negated_scores() {
    let mut collector = RankedCollector::new(2, |score: &f64| RankKey(-score));
    collector.extend([61.5, 99.9, 75.0]);

    assert_eq!(collector.into_vec(), vec![99.9, 75.0]);
}
