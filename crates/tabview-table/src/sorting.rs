//! Single-key sorting over row indices
//!
//! Sorting never reorders the canonical rows; it reorders an index sequence produced by the
//! filter pipeline. The sort is stable, so rows with equal keys keep their canonical order.

use std::cmp::Ordering;

use tabview_core::{Row, Value};

use crate::filter_types::{SortDirection, SortSpec};

/// Compare two cells under `direction`
///
/// NULL (or missing) values sort last in both directions; only non-null comparisons are
/// reversed.
pub fn compare_values(a: &Value, b: &Value, direction: SortDirection) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match direction {
            SortDirection::Ascending => a.compare(b),
            SortDirection::Descending => a.compare(b).reverse(),
        },
    }
}

/// Sort `indices` (into `rows`) by an optional key
///
/// `None` leaves the incoming (canonical) order untouched.
pub fn sort_indices(rows: &[Row], mut indices: Vec<usize>, spec: Option<&SortSpec>) -> Vec<usize> {
    let Some(spec) = spec else {
        return indices;
    };
    indices.sort_by(|&a, &b| match (rows.get(a), rows.get(b)) {
        (Some(row_a), Some(row_b)) => {
            compare_values(row_a.value(&spec.field), row_b.value(&spec.field), spec.direction)
        }
        _ => Ordering::Equal,
    });
    indices
}
