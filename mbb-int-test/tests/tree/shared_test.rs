use mbb_int_test::test_util::{assert_valid, cube, ids, random_objects, TestObject};
use mbb_rstar::{Point3, SharedRStarTree, SpatialIndex, Tolerance};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_multi_threaded_insert_and_remove() {
    let tree: SharedRStarTree<TestObject> = SharedRStarTree::new(8, Tolerance::default()).unwrap();

    let num_threads = 4;
    let inserts_per_thread = 150;
    let barrier = Arc::new(Barrier::new(num_threads));

    let mut handles = vec![];
    for thread_id in 0..num_threads {
        let tree = tree.clone();
        let barrier = Arc::clone(&barrier);

        handles.push(thread::spawn(move || {
            let mut rng = StdRng::seed_from_u64(thread_id as u64);
            let objects: Vec<TestObject> = random_objects(&mut rng, inserts_per_thread, 100.0, 5.0)
                .into_iter()
                .map(|o| TestObject::new(thread_id as u64 * 10_000 + o.id, o.bbox))
                .collect();

            barrier.wait();
            for object in &objects {
                assert!(tree.insert(object.clone()).unwrap());
            }
            // every thread drops its even ids again
            for object in objects.iter().filter(|o| o.id % 2 == 0) {
                assert!(tree.remove(object).unwrap());
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(tree.count(), num_threads * inserts_per_thread / 2);
    tree.read(|t| assert_valid(t));
    assert!(tree.all_entries().iter().all(|o| o.id % 2 == 1));
}

#[test]
fn test_readers_see_consistent_trees() {
    let tree: SharedRStarTree<TestObject> = SharedRStarTree::new(4, Tolerance::default()).unwrap();
    let writer = {
        let tree = tree.clone();
        thread::spawn(move || {
            for i in 0..500u64 {
                tree.insert(TestObject::new(i, cube((i % 50) as f64, (i / 50) as f64, 0.0, 0.9)))
                    .unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let tree = tree.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    let seen = tree.read(|t| {
                        assert_valid(t);
                        t.count()
                    });
                    assert!(seen <= 500);
                    let near = tree.nearest(3, &Point3::new(0.0, 0.0, 0.0));
                    assert!(near.len() <= 3);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(tree.count(), 500);
}

#[test]
fn test_spatial_index_interface() {
    let shared: SharedRStarTree<TestObject> = SharedRStarTree::new(4, Tolerance::default()).unwrap();
    let index: Arc<dyn SpatialIndex<TestObject>> = Arc::new(shared.clone());

    for i in 0..10u64 {
        assert!(index.add(TestObject::new(i, cube(i as f64 * 2.0, 0.0, 0.0, 1.0))).unwrap());
    }
    assert_eq!(index.size(), 10);

    let region = cube(-0.5, -0.5, -0.5, 4.0);
    assert_eq!(ids(&index.find_contained(&region)), vec![0, 1]);
    assert_eq!(ids(&index.find_intersecting(&region)), vec![0, 1]);

    let nearest = index.find_nearest(&Point3::new(100.0, 0.5, 0.5), 2);
    assert_eq!(nearest.iter().map(|n| n.object.id).collect::<Vec<_>>(), vec![9, 8]);

    let close = index.find_within_distance(&Point3::new(-1.0, 0.5, 0.5), 1.0);
    assert_eq!(close.len(), 1);

    let everything = index.find_nearest(&Point3::new(0.0, 0.0, 0.0), usize::MAX);
    assert_eq!(everything.len(), 10);
    assert_eq!(everything[0].object.id, 0);

    assert!(index.remove(&TestObject::new(0, cube(0.0, 0.0, 0.0, 1.0))).unwrap());
    assert_eq!(shared.count(), 9);
    index.clear();
    assert!(shared.is_empty());
}
