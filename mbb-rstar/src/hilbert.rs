//! Hilbert curve utilities for spatial locality ordering.
//!
//! The Hilbert curve maps 3D grid cells to a 1D index while keeping cells
//! that are close in space close along the curve. Bulk insertion sorts the
//! objects by the Hilbert index of their box centres so consecutive inserts
//! land in the same subtrees.

use crate::bounding_box::BoundingBox;
use crate::geometry::Point3;

/// Maximum order for 3D Hilbert encoding (3 * 21 = 63 bits fit in a u64).
pub const MAX_HILBERT_ORDER: u32 = 21;

/// Order used by bulk insertion.
pub(crate) const BULK_HILBERT_ORDER: u32 = 16;

/// Encodes normalized 3D coordinates to a Hilbert curve index.
///
/// # Arguments
/// * `x`, `y`, `z` - coordinates normalized to [0, 1]
/// * `order` - bits per axis (1-21)
///
/// # Example
/// ```rust
/// use mbb_rstar::hilbert::hilbert_index;
///
/// let index = hilbert_index(0.5, 0.5, 0.5, 8);
/// assert!(index < (1u64 << 24));
/// ```
pub fn hilbert_index(x: f64, y: f64, z: f64, order: u32) -> u64 {
    debug_assert!(order > 0 && order <= MAX_HILBERT_ORDER, "order must be 1-21");

    let n = 1u64 << order;
    let to_cell = |v: f64| -> u32 { ((v.clamp(0.0, 1.0) * n as f64) as u64).min(n - 1) as u32 };

    let mut cell = [to_cell(x), to_cell(y), to_cell(z)];
    axes_to_transpose(&mut cell, order);
    interleave(&cell, order)
}

/// Encodes a point to a Hilbert index after normalizing it against `bounds`.
///
/// Points outside `bounds` are clamped onto it.
pub fn hilbert_index_bounded(point: &Point3, bounds: &BoundingBox, order: u32) -> u64 {
    let normalize = |axis: usize| {
        let range = bounds.extent(axis);
        ((point.coord(axis) - bounds.min().coord(axis)) / range).clamp(0.0, 1.0)
    };
    hilbert_index(normalize(0), normalize(1), normalize(2), order)
}

/// Converts grid coordinates to the transposed Hilbert representation
/// in place (Skilling, "Programming the Hilbert curve", 2004).
fn axes_to_transpose(cell: &mut [u32; 3], order: u32) {
    let top = 1u32 << (order - 1);

    // inverse undo
    let mut q = top;
    while q > 1 {
        let p = q - 1;
        for i in 0..3 {
            if cell[i] & q != 0 {
                cell[0] ^= p;
            } else {
                let t = (cell[0] ^ cell[i]) & p;
                cell[0] ^= t;
                cell[i] ^= t;
            }
        }
        q >>= 1;
    }

    // gray encode
    for i in 1..3 {
        cell[i] ^= cell[i - 1];
    }
    let mut t = 0;
    let mut q = top;
    while q > 1 {
        if cell[2] & q != 0 {
            t ^= q - 1;
        }
        q >>= 1;
    }
    for c in cell.iter_mut() {
        *c ^= t;
    }
}

/// Interleaves the transposed bits, most significant first.
fn interleave(cell: &[u32; 3], order: u32) -> u64 {
    let mut index = 0u64;
    for bit in (0..order).rev() {
        for c in cell {
            index = (index << 1) | ((c >> bit) & 1) as u64;
        }
    }
    index
}
