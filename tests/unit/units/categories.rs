use super::*;

#[test]
fn iteration_preserves_insertion_order() {
    let mut map = CategoryMap::new();
    map.add_item(2.0, "two");
    map.add_item(0.5, "half");
    map.add_item(1.0, "one");

    let entries: Vec<_> = map.iter().collect();
    assert_eq!(
        entries,
        vec![(2.0, "two"), (0.5, "half"), (1.0, "one")]
    );
}

#[test]
fn clear_empties_the_map() {
    let mut map = CategoryMap::new();
    map.add_item(1.0, "a");
    assert_eq!(map.len(), 1);
    assert!(!map.is_empty());

    map.clear();
    assert!(map.is_empty());
}
