use linkbus::error::QueryError;
use linkbus::hierarchy::SegmentForest;
use linkbus::model::Segment;

#[test]
fn equal_names_are_told_apart_by_identity() {
    // Parent with children [A("x"), B("x"), C("c")]; asking from A keeps B.
    let mut forest = SegmentForest::new();
    let p = forest.add_root(Segment::named("p", None));
    let a = forest.add_child(p, Segment::named("x", Some("p")));
    let b = forest.add_child(p, Segment::named("x", Some("p")));
    let _c = forest.add_child(p, Segment::named("c", Some("p")));

    let root = forest.root().unwrap();
    let node_a = forest.node(a).unwrap();
    let node_b = forest.node(b).unwrap();
    assert_eq!(node_a.sibling_ids(root), vec!["x", "c"]);
    assert_eq!(node_b.sibling_ids(root), vec!["x", "c"]);
    assert_eq!(node_a.sibling_ids_global(), vec!["x", "c"]);
    assert_ne!(node_a, node_b);
}

#[test]
fn siblings_skip_bus_drops() {
    let forest = SegmentForest::from_records(vec![
        Segment::named("trunk", None),
        Segment::named("left", Some("trunk")),
        Segment::bus_drop(Some("trunk")),
        Segment::named("right", Some("trunk")),
    ])
    .unwrap();
    let root = forest.root().unwrap();
    let left = forest.lookup("left").unwrap();
    assert_eq!(left.sibling_ids(root), vec!["right"]);
    // The unfiltered iterator still sees the bus drop.
    assert_eq!(left.siblings().count(), 2);
}

#[test]
fn root_has_no_siblings_for_any_root_argument() {
    let forest = SegmentForest::from_records(vec![
        Segment::named("r1", None),
        Segment::named("r2", None),
        Segment::named("k", Some("r2")),
    ])
    .unwrap();
    let r1 = forest.lookup("r1").unwrap();
    for candidate in forest.iter() {
        assert!(r1.sibling_ids(candidate).is_empty());
        assert_eq!(r1.try_sibling_ids(candidate), Ok(Vec::new()));
    }
    assert!(r1.sibling_ids_global().is_empty());
    assert_eq!(r1.siblings().count(), 0);
}

#[test]
fn root_that_misses_the_parent_is_silent_or_an_error() {
    let forest = SegmentForest::from_records(vec![
        Segment::named("r", None),
        Segment::named("a", Some("r")),
        Segment::named("b", Some("r")),
        Segment::named("a1", Some("a")),
        Segment::named("a2", Some("a")),
    ])
    .unwrap();
    let a1 = forest.lookup("a1").unwrap();
    let b = forest.lookup("b").unwrap();

    assert!(a1.sibling_ids(b).is_empty());
    assert_eq!(
        a1.try_sibling_ids(b),
        Err(QueryError::ParentNotInRoot {
            parent: "a".to_string()
        })
    );
    // The arena link does not depend on the supplied root.
    assert_eq!(a1.sibling_ids_global(), vec!["a2"]);
}

#[test]
fn subtree_root_containing_the_parent_is_enough() {
    let forest = SegmentForest::from_records(vec![
        Segment::named("r", None),
        Segment::named("a", Some("r")),
        Segment::named("a1", Some("a")),
        Segment::named("a2", Some("a")),
        Segment::named("a3", Some("a")),
    ])
    .unwrap();
    let a = forest.lookup("a").unwrap();
    let a2 = forest.lookup("a2").unwrap();
    assert_eq!(a2.sibling_ids(a), vec!["a1", "a3"]);
}

#[test]
fn bus_drop_caller_gets_all_named_siblings() {
    let mut forest = SegmentForest::new();
    let r = forest.add_root(Segment::named("r", None));
    let junction = forest.add_child(r, Segment::bus_drop(Some("r")));
    forest.add_child(r, Segment::named("s", Some("r")));
    forest.add_child(r, Segment::named("t", Some("r")));

    let root = forest.root().unwrap();
    let junction = forest.node(junction).unwrap();
    assert_eq!(junction.sibling_ids(root), vec!["s", "t"]);
}

#[test]
fn child_of_bus_drop_finds_no_parent_by_name() {
    // Scoped queries go through the stored parent name, which a child of a
    // bus drop does not have; the arena parent still exists.
    let mut forest = SegmentForest::new();
    let r = forest.add_root(Segment::named("r", None));
    let junction = forest.add_child(r, Segment::bus_drop(Some("r")));
    let k1 = forest.add_child(junction, Segment::named("k1", None));
    forest.add_child(junction, Segment::named("k2", None));

    let root = forest.root().unwrap();
    let k1 = forest.node(k1).unwrap();
    assert!(k1.sibling_ids(root).is_empty());
    assert_eq!(k1.sibling_ids_global(), vec!["k2"]);
    assert_eq!(k1.parent().map(|p| p.index()), Some(junction));
}
