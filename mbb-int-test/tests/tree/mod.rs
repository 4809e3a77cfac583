//! R*-tree integration tests.
//!
//! These tests drive the tree through its public API only and check the
//! results against brute-force oracles and the integrity checker.

mod insertion_test;
mod nearest_test;
mod query_test;
mod removal_test;
mod shared_test;
