use mbb_int_test::test_util::{
    bbox, brute_force_query, cube, ids, new_tree, random_box, random_objects, random_point,
    run_seeded, TestObject,
};
use mbb_rstar::{Predicate, Tolerance};

const PREDICATES: [Predicate; 7] = [
    Predicate::IntersectsStrict,
    Predicate::Intersects,
    Predicate::ContainsStrict,
    Predicate::Contains,
    Predicate::InsideStrict,
    Predicate::Inside,
    Predicate::Equals,
];

#[test]
fn test_predicates_match_brute_force() {
    run_seeded(&[81, 82, 83], |rng| {
        let objects = random_objects(rng, 500, 100.0, 12.0);
        let mut tree = new_tree(8);
        for object in &objects {
            tree.insert(object.clone())?;
        }
        let tol = Tolerance::default();

        for _ in 0..30 {
            let query = random_box(rng, 100.0, 40.0);
            for predicate in PREDICATES {
                let found = ids(tree.retrieve(&query, predicate));
                let expected = brute_force_query(&objects, &query, predicate, &tol);
                assert_eq!(found, expected, "{:?} against {}", predicate, query);
            }
        }

        // stored boxes as queries hit the containment and equality paths
        for object in objects.iter().step_by(25) {
            for predicate in PREDICATES {
                let found = ids(tree.retrieve(&object.bbox, predicate));
                let expected = brute_force_query(&objects, &object.bbox, predicate, &tol);
                assert_eq!(found, expected, "{:?} against stored {}", predicate, object.bbox);
            }
            assert!(ids(tree.equals(&object.bbox)).contains(&object.id));
        }
        Ok(())
    })
}

#[test]
fn test_named_queries_agree_with_retrieve() {
    run_seeded(&[91], |rng| {
        let objects = random_objects(rng, 200, 50.0, 10.0);
        let mut tree = new_tree(6);
        for object in &objects {
            tree.insert(object.clone())?;
        }

        let query = random_box(rng, 50.0, 25.0);
        assert_eq!(ids(tree.intersects(&query)), ids(tree.retrieve(&query, Predicate::Intersects)));
        assert_eq!(
            ids(tree.intersects_strict(&query)),
            ids(tree.retrieve(&query, Predicate::IntersectsStrict))
        );
        assert_eq!(ids(tree.inside(&query)), ids(tree.retrieve(&query, Predicate::Inside)));
        assert_eq!(
            ids(tree.inside_strict(&query)),
            ids(tree.retrieve(&query, Predicate::InsideStrict))
        );
        assert_eq!(ids(tree.contains(&query)), ids(tree.retrieve(&query, Predicate::Contains)));
        assert_eq!(
            ids(tree.contains_strict(&query)),
            ids(tree.retrieve(&query, Predicate::ContainsStrict))
        );
        Ok(())
    })
}

#[test]
fn test_contains_point_matches_brute_force() {
    run_seeded(&[101, 102], |rng| {
        let objects = random_objects(rng, 400, 60.0, 10.0);
        let mut tree = new_tree(8);
        for object in &objects {
            tree.insert(object.clone())?;
        }
        let tol = Tolerance::default();

        for _ in 0..50 {
            let point = random_point(rng, -5.0, 65.0);
            let expected = ids(objects.iter().filter(|o| o.bbox.contains_point(&point, &tol)));
            assert_eq!(ids(tree.contains_point(&point)), expected);
        }
        Ok(())
    })
}

#[test]
fn test_boundary_semantics() {
    let mut tree = new_tree(4);
    let a = TestObject::new(1, cube(0.0, 0.0, 0.0, 1.0));
    let b = TestObject::new(2, cube(1.0, 0.0, 0.0, 1.0));
    tree.insert(a.clone()).unwrap();
    tree.insert(b.clone()).unwrap();

    // a face shared with both boxes
    let face = bbox(0.5, 0.2, 0.2, 1.0, 0.8, 0.8);
    assert_eq!(ids(tree.intersects(&face)), vec![1, 2]);
    assert_eq!(ids(tree.intersects_strict(&face)), vec![1]);
    assert_eq!(ids(tree.contains(&face)), vec![1]);
    assert!(tree.contains_strict(&face).is_empty());

    // within epsilon counts as touching
    let nearly = bbox(1.0 + 1e-12, 0.0, 0.0, 1.5, 1.0, 1.0);
    assert_eq!(ids(tree.intersects(&nearly)), vec![1, 2]);
    assert_eq!(ids(tree.inside(&bbox(0.0, 0.0, 0.0, 1.0 - 1e-12, 1.0, 1.0))), vec![1]);
}

#[test]
fn test_tolerance_widens_matches() {
    let mut strict = new_tree(4);
    let mut loose = mbb_rstar::RStarTree::new(4, Tolerance::new(0.01).unwrap()).unwrap();
    let object = TestObject::new(1, cube(0.0, 0.0, 0.0, 1.0));
    strict.insert(object.clone()).unwrap();
    loose.insert(object).unwrap();

    let shifted = cube(0.005, 0.0, 0.0, 1.0);
    assert!(strict.equals(&shifted).is_empty());
    assert_eq!(ids(loose.equals(&shifted)), vec![1]);
}

#[test]
fn test_queries_on_empty_tree() {
    let tree = new_tree(4);
    let query = cube(0.0, 0.0, 0.0, 10.0);
    for predicate in PREDICATES {
        assert!(tree.retrieve(&query, predicate).is_empty());
    }
    assert!(tree.bounding_box().is_none());
    assert!(tree.all_entries().is_empty());
}
