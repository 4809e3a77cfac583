use mbb_int_test::test_util::{
    assert_valid, cube, ids, new_tree, random_objects, run_seeded, tree_with_config, Shapeless,
    TestObject,
};
use mbb_rstar::{RStarConfig, RStarTree, SpatialIndexError, Tolerance};

#[test]
fn test_invariants_hold_after_every_insert() {
    run_seeded(&[1, 2, 3], |rng| {
        let objects = random_objects(rng, 400, 100.0, 8.0);
        let mut tree = new_tree(5);

        for object in &objects {
            assert!(tree.insert(object.clone())?);
            assert_valid(&tree);
        }
        assert_eq!(tree.count(), objects.len());
        Ok(())
    })
}

#[test]
fn test_height_grows_monotonically_with_small_nodes() {
    let mut tree = new_tree(4);
    let mut last_height = tree.height();

    // twenty unit boxes at half-unit spacing, so neighbours overlap
    for i in 0..20 {
        let x = i as f64 * 0.5;
        assert!(tree.insert(TestObject::new(i, cube(x, 0.0, 0.0, 1.0))).unwrap());
        assert!(tree.height() >= last_height, "height shrank on insert {}", i);
        last_height = tree.height();
        assert_valid(&tree);
    }

    assert_eq!(tree.count(), 20);
    assert!(tree.height() >= 3);
    let stats = tree.stats();
    assert_eq!(stats.total_entries, 20);
    assert!(stats.leaf_nodes >= 5);
}

#[test]
fn test_bounding_box_is_union_of_entries() {
    run_seeded(&[11, 12], |rng| {
        let objects = random_objects(rng, 150, 50.0, 5.0);
        let mut tree = new_tree(8);
        for object in &objects {
            tree.insert(object.clone())?;
        }

        let expected = objects
            .iter()
            .skip(1)
            .fold(objects[0].bbox, |acc, o| acc.union(&o.bbox));
        assert_eq!(tree.bounding_box(), Some(expected));
        Ok(())
    })
}

#[test]
fn test_duplicate_identity_is_rejected() {
    let mut tree = new_tree(4);
    let a = TestObject::new(1, cube(0.0, 0.0, 0.0, 1.0));
    assert!(tree.insert(a.clone()).unwrap());

    let before = tree.stats();
    assert!(!tree.insert(a.clone()).unwrap());
    assert_eq!(tree.stats(), before);

    // same geometry, different identity
    assert!(tree.insert(TestObject::new(2, a.bbox)).unwrap());
    assert_eq!(tree.count(), 2);
}

#[test]
fn test_missing_geometry_is_idempotent() {
    let mut tree: RStarTree<Shapeless> = RStarTree::new(4, Tolerance::default()).unwrap();
    for _ in 0..3 {
        assert_eq!(tree.insert(Shapeless), Err(SpatialIndexError::MissingGeometry));
        assert_eq!(tree.remove(&Shapeless), Err(SpatialIndexError::MissingGeometry));
    }
    assert_eq!(tree.count(), 0);
    assert_valid(&tree);
}

#[test]
fn test_bulk_insert_matches_incremental_contents() {
    run_seeded(&[21], |rng| {
        let objects = random_objects(rng, 1000, 200.0, 6.0);

        let mut bulk = new_tree(16);
        assert_eq!(bulk.bulk_insert(objects.clone())?, objects.len());
        assert_valid(&bulk);

        let mut incremental = new_tree(16);
        for object in &objects {
            incremental.insert(object.clone())?;
        }

        assert_eq!(ids(bulk.all_entries()), ids(incremental.all_entries()));
        assert_eq!(bulk.bounding_box(), incremental.bounding_box());
        Ok(())
    })
}

#[test]
fn test_configurations() {
    let configs = [
        RStarConfig::builder().max_entries(4).build().unwrap(),
        RStarConfig::builder().max_entries(6).reinsert_ratio(0.0).build().unwrap(),
        RStarConfig::builder()
            .max_entries(10)
            .min_fill_ratio(0.5)
            .reinsert_ratio(0.4)
            .build()
            .unwrap(),
        RStarConfig::builder()
            .max_entries(32)
            .tolerance(Tolerance::new(1e-6).unwrap())
            .build()
            .unwrap(),
    ];

    for config in configs {
        run_seeded(&[31, 32], |rng| {
            let objects = random_objects(rng, 500, 100.0, 10.0);
            let mut tree = tree_with_config(config);
            for object in &objects {
                tree.insert(object.clone())?;
            }
            assert_valid(&tree);
            assert_eq!(tree.count(), 500);
            Ok(())
        });
    }
}

#[test]
fn test_invalid_capacity_is_rejected() {
    for capacity in 0..4 {
        let result: Result<RStarTree<TestObject>, _> = RStarTree::new(capacity, Tolerance::default());
        assert!(matches!(result, Err(SpatialIndexError::InvalidCapacity(_))));
    }
}
