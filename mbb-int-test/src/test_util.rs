use mbb_rstar::{
    BoundingBox, IndexedObject, Point3, Predicate, RStarConfig, RStarTree, SpatialResult,
    Tolerance,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::panic::{catch_unwind, RefUnwindSafe, UnwindSafe};
use std::time::Instant;

/// Runs a deterministic test once per seed, reporting which seed failed.
///
/// The test receives a generator seeded with the current seed.
pub fn run_seeded<T>(seeds: &[u64], test: T)
where
    T: Fn(&mut StdRng) -> SpatialResult<()> + UnwindSafe + RefUnwindSafe,
{
    for &seed in seeds {
        let start_time = Instant::now();
        let result = catch_unwind(|| {
            let mut rng = StdRng::seed_from_u64(seed);
            test(&mut rng)
        });
        let elapsed = start_time.elapsed();

        let failure = match result {
            Ok(Ok(())) => {
                log::debug!("Seed {} passed in {:?}", seed, elapsed);
                continue;
            }
            Ok(Err(e)) => format!("Test failed: {:?}", e),
            Err(panic_err) => {
                if let Some(s) = panic_err.downcast_ref::<&str>() {
                    format!("Panic: {}", s)
                } else if let Some(s) = panic_err.downcast_ref::<String>() {
                    format!("Panic: {}", s)
                } else {
                    "Panic: unknown payload".to_string()
                }
            }
        };

        eprintln!("\n==================== TEST FAILED ====================");
        eprintln!("Seed: {} (took {:?})", seed, elapsed);
        eprintln!("{}", failure);
        eprintln!("=====================================================\n");
        panic!("Test failed for seed {}: {}", seed, failure);
    }
}

/// An indexed object with an identity independent of its geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct TestObject {
    pub id: u64,
    pub bbox: BoundingBox,
}

impl TestObject {
    pub fn new(id: u64, bbox: BoundingBox) -> Self {
        Self { id, bbox }
    }
}

impl IndexedObject for TestObject {
    fn bounding_box(&self) -> Option<BoundingBox> {
        Some(self.bbox)
    }

    fn identity_equal(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// An object without geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Shapeless;

impl IndexedObject for Shapeless {
    fn bounding_box(&self) -> Option<BoundingBox> {
        None
    }

    fn identity_equal(&self, _other: &Self) -> bool {
        true
    }
}

pub fn bbox(x0: f64, y0: f64, z0: f64, x1: f64, y1: f64, z1: f64) -> BoundingBox {
    BoundingBox::from_coords(x0, y0, z0, x1, y1, z1).unwrap()
}

/// Cube with edge `size` and lower corner at `(x, y, z)`.
pub fn cube(x: f64, y: f64, z: f64, size: f64) -> BoundingBox {
    bbox(x, y, z, x + size, y + size, z + size)
}

/// A random box inside `[0, world]^3` with extents in `[0.1, max_extent)`.
pub fn random_box(rng: &mut StdRng, world: f64, max_extent: f64) -> BoundingBox {
    let mut corner = [0.0; 3];
    let mut extent = [0.0; 3];
    for axis in 0..3 {
        extent[axis] = rng.random_range(0.1..max_extent);
        corner[axis] = rng.random_range(0.0..world - extent[axis]);
    }
    bbox(
        corner[0],
        corner[1],
        corner[2],
        corner[0] + extent[0],
        corner[1] + extent[1],
        corner[2] + extent[2],
    )
}

pub fn random_point(rng: &mut StdRng, lo: f64, hi: f64) -> Point3 {
    Point3::new(
        rng.random_range(lo..hi),
        rng.random_range(lo..hi),
        rng.random_range(lo..hi),
    )
}

/// `n` objects with ids `0..n` and random boxes.
pub fn random_objects(rng: &mut StdRng, n: usize, world: f64, max_extent: f64) -> Vec<TestObject> {
    (0..n as u64)
        .map(|id| TestObject::new(id, random_box(rng, world, max_extent)))
        .collect()
}

pub fn new_tree(max_entries: usize) -> RStarTree<TestObject> {
    RStarTree::new(max_entries, Tolerance::default()).unwrap()
}

pub fn tree_with_config(config: RStarConfig) -> RStarTree<TestObject> {
    RStarTree::with_config(config)
}

/// Panics with the report's errors if the tree is structurally broken.
pub fn assert_valid<T>(tree: &RStarTree<T>) {
    let report = tree.check_integrity();
    assert!(
        report.is_valid,
        "integrity check failed ({} nodes): {:#?}",
        report.nodes_checked, report.errors
    );
}

/// Sorted ids of a query result.
pub fn ids<'a, I>(objects: I) -> Vec<u64>
where
    I: IntoIterator<Item = &'a TestObject>,
{
    let mut ids: Vec<u64> = objects.into_iter().map(|o| o.id).collect();
    ids.sort_unstable();
    ids
}

// ============================================================================
// Brute-force oracles
// ============================================================================

pub fn brute_force_query(
    objects: &[TestObject],
    query: &BoundingBox,
    predicate: Predicate,
    tol: &Tolerance,
) -> Vec<u64> {
    ids(objects
        .iter()
        .filter(|o| predicate.matches(&o.bbox, query, tol)))
}

/// Ascending distances of the `k` nearest objects.
pub fn brute_force_nearest(objects: &[TestObject], point: &Point3, k: usize) -> Vec<f64> {
    let mut distances: Vec<f64> = objects
        .iter()
        .map(|o| o.bbox.min_dist_squared(point).sqrt())
        .collect();
    distances.sort_by(f64::total_cmp);
    distances.truncate(k);
    distances
}

pub fn brute_force_join(
    left: &[TestObject],
    right: &[TestObject],
    predicate: Predicate,
    tol: &Tolerance,
) -> Vec<(u64, u64)> {
    let mut pairs = Vec::new();
    for a in left {
        for b in right {
            if predicate.matches(&a.bbox, &b.bbox, tol) {
                pairs.push((a.id, b.id));
            }
        }
    }
    pairs.sort_unstable();
    pairs
}
