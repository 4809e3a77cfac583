use mbb_int_test::test_util::{
    assert_valid, cube, ids, new_tree, random_objects, run_seeded, TestObject,
};
use mbb_rstar::{Predicate, Sameness};
use rand::seq::SliceRandom;

#[test]
fn test_insert_then_remove_everything_in_random_order() {
    run_seeded(&[41, 42, 43], |rng| {
        let mut objects = random_objects(rng, 300, 80.0, 6.0);
        let mut tree = new_tree(4);
        for object in &objects {
            tree.insert(object.clone())?;
        }

        objects.shuffle(rng);
        for (n, object) in objects.iter().enumerate() {
            assert!(tree.remove(object)?, "object {} not found", object.id);
            assert_eq!(tree.count(), objects.len() - n - 1);
            assert_valid(&tree);
        }

        assert_eq!(tree.count(), 0);
        assert!(tree.bounding_box().is_none());
        assert_eq!(tree.height(), 1);
        Ok(())
    })
}

#[test]
fn test_insert_remove_round_trip_restores_contents() {
    run_seeded(&[51, 52], |rng| {
        let objects = random_objects(rng, 200, 60.0, 5.0);
        let mut tree = new_tree(6);
        for object in &objects {
            tree.insert(object.clone())?;
        }
        let before = ids(tree.all_entries());
        let bbox_before = tree.bounding_box();

        let extra = TestObject::new(10_000, cube(30.0, 30.0, 30.0, 2.0));
        assert!(tree.insert(extra.clone())?);
        assert!(tree.remove(&extra)?);

        assert_eq!(ids(tree.all_entries()), before);
        assert_eq!(tree.bounding_box(), bbox_before);
        assert_valid(&tree);
        Ok(())
    })
}

#[test]
fn test_removing_absent_object_changes_nothing() {
    run_seeded(&[61], |rng| {
        let objects = random_objects(rng, 100, 50.0, 4.0);
        let mut tree = new_tree(4);
        for object in &objects {
            tree.insert(object.clone())?;
        }
        let stats = tree.stats();

        let stranger = TestObject::new(99_999, cube(500.0, 500.0, 500.0, 1.0));
        for _ in 0..3 {
            assert!(!tree.remove(&stranger)?);
        }
        assert_eq!(tree.stats(), stats);
        Ok(())
    })
}

#[test]
fn test_interleaved_inserts_and_removes() {
    run_seeded(&[71, 72], |rng| {
        let objects = random_objects(rng, 600, 100.0, 5.0);
        let mut tree = new_tree(5);
        let mut live: Vec<TestObject> = Vec::new();

        for chunk in objects.chunks(50) {
            for object in chunk {
                tree.insert(object.clone())?;
                live.push(object.clone());
            }
            live.shuffle(rng);
            for object in live.drain(..20) {
                assert!(tree.remove(&object)?);
            }
            assert_valid(&tree);
            assert_eq!(ids(tree.all_entries()), ids(&live));
        }
        Ok(())
    })
}

#[test]
fn test_geometry_and_identity_removal() {
    let mut tree = new_tree(4);
    let shape = cube(0.0, 0.0, 0.0, 1.0);
    tree.insert(TestObject::new(1, shape)).unwrap();
    tree.insert(TestObject::new(2, shape)).unwrap();

    // a stranger with the same box only matches by geometry
    let stranger = TestObject::new(3, shape);
    assert!(!tree.remove_identical(&stranger).unwrap());
    assert!(!tree.remove_with(&stranger, Sameness::Identity).unwrap());
    assert_eq!(tree.count(), 2);

    assert!(tree.remove(&stranger).unwrap());
    assert_eq!(tree.count(), 1);
    assert_valid(&tree);

    let left = ids(tree.retrieve(&shape, Predicate::Equals));
    assert_eq!(left.len(), 1);
    assert!(tree.remove_identical(&TestObject::new(left[0], shape)).unwrap());
    assert!(tree.is_empty());
}

#[test]
fn test_removal_from_overlapping_cluster() {
    // many boxes sharing most of their volume stress the containment descent
    let mut tree = new_tree(4);
    let objects: Vec<TestObject> = (0..80)
        .map(|i| TestObject::new(i, cube(i as f64 * 0.01, i as f64 * 0.02, 0.0, 5.0)))
        .collect();
    for object in &objects {
        tree.insert(object.clone()).unwrap();
    }
    for object in objects.iter().rev() {
        assert!(tree.remove(object).unwrap());
        assert_valid(&tree);
    }
    assert!(tree.is_empty());
}

#[test]
fn test_repeated_remove_is_idempotent() {
    let mut tree = new_tree(4);
    let object = TestObject::new(7, cube(1.0, 2.0, 3.0, 1.5));
    assert!(tree.insert(object.clone()).unwrap());

    assert!(tree.remove(&object).unwrap());
    assert!(!tree.remove(&object).unwrap());
    assert_eq!(tree.count(), 0);
    assert_valid(&tree);
}
