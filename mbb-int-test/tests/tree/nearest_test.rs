use mbb_int_test::test_util::{
    brute_force_nearest, cube, new_tree, random_objects, random_point, run_seeded, TestObject,
};
use mbb_rstar::Point3;

#[test]
fn test_nearest_matches_brute_force() {
    run_seeded(&[111, 112, 113], |rng| {
        let objects = random_objects(rng, 500, 100.0, 6.0);
        let mut tree = new_tree(8);
        for object in &objects {
            tree.insert(object.clone())?;
        }

        for k in [1, 5, 17, 64] {
            for _ in 0..10 {
                let point = random_point(rng, -20.0, 120.0);
                let got: Vec<f64> = tree.nearest(k, &point).iter().map(|n| n.distance).collect();
                assert_eq!(got, brute_force_nearest(&objects, &point, k), "k = {} at {}", k, point);
            }
        }
        Ok(())
    })
}

#[test]
fn test_nearest_results_are_consistent() {
    run_seeded(&[121], |rng| {
        let objects = random_objects(rng, 300, 50.0, 4.0);
        let mut tree = new_tree(6);
        for object in &objects {
            tree.insert(object.clone())?;
        }

        let point = random_point(rng, 0.0, 50.0);
        let result = tree.nearest(20, &point);
        assert_eq!(result.len(), 20);
        for neighbor in &result {
            let actual = neighbor.object.bbox.min_dist_squared(&point).sqrt();
            assert_eq!(neighbor.distance, actual);
        }
        assert!(result.windows(2).all(|w| w[0].distance <= w[1].distance));
        Ok(())
    })
}

#[test]
fn test_nearest_with_k_beyond_count() {
    run_seeded(&[131], |rng| {
        let objects = random_objects(rng, 37, 20.0, 3.0);
        let mut tree = new_tree(4);
        for object in &objects {
            tree.insert(object.clone())?;
        }

        let point = Point3::new(10.0, 10.0, 10.0);
        let result = tree.nearest(1000, &point);
        assert_eq!(result.len(), 37);
        let distances: Vec<f64> = result.iter().map(|n| n.distance).collect();
        assert_eq!(distances, brute_force_nearest(&objects, &point, 1000));
        Ok(())
    })
}

#[test]
fn test_within_distance_matches_brute_force() {
    run_seeded(&[141, 142], |rng| {
        let objects = random_objects(rng, 400, 100.0, 5.0);
        let mut tree = new_tree(8);
        for object in &objects {
            tree.insert(object.clone())?;
        }

        for radius in [0.0, 2.5, 10.0, 30.0] {
            let point = random_point(rng, 0.0, 100.0);
            let expected: Vec<f64> = brute_force_nearest(&objects, &point, objects.len())
                .into_iter()
                .filter(|d| *d <= radius)
                .collect();
            let got: Vec<f64> = tree
                .within_distance(&point, radius)
                .iter()
                .map(|n| n.distance)
                .collect();
            assert_eq!(got, expected, "radius {} at {}", radius, point);
        }
        Ok(())
    })
}

#[test]
fn test_point_inside_several_boxes() {
    let mut tree = new_tree(4);
    for i in 0..6 {
        tree.insert(TestObject::new(i, cube(i as f64 * 0.1, 0.0, 0.0, 2.0))).unwrap();
    }
    tree.insert(TestObject::new(100, cube(10.0, 10.0, 10.0, 1.0))).unwrap();

    let result = tree.nearest(6, &Point3::new(1.0, 1.0, 1.0));
    assert_eq!(result.len(), 6);
    assert!(result.iter().all(|n| n.distance == 0.0));
    assert!(result.iter().all(|n| n.object.id < 100));
}

#[test]
fn test_nearest_with_unbounded_k() {
    run_seeded(&[133], |rng| {
        let objects = random_objects(rng, 64, 30.0, 3.0);
        let mut tree = new_tree(5);
        for object in &objects {
            tree.insert(object.clone())?;
        }

        let point = random_point(rng, 0.0, 30.0);
        let expected = brute_force_nearest(&objects, &point, objects.len());
        for k in [usize::MAX, usize::MAX / 2, 1 << 40] {
            let got: Vec<f64> = tree.nearest(k, &point).iter().map(|n| n.distance).collect();
            assert_eq!(got, expected, "k = {}", k);
        }
        Ok(())
    })
}
