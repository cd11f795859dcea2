//! Point selection
//!
//! The selection is a set of point indices; order carries no meaning.

use std::collections::BTreeSet;

/// Selection after clicking point `index`
///
/// A plain click selects only `index`, or clears the selection when
/// `index` was already the sole selected point. An additive (shift)
/// click toggles `index` in the existing set.
pub fn select_point(selection: &BTreeSet<usize>, index: usize, additive: bool) -> BTreeSet<usize> {
    let mut next = selection.clone();
    if additive {
        if !next.remove(&index) {
            next.insert(index);
        }
    } else if selection.len() == 1 && selection.contains(&index) {
        next.clear();
    } else {
        next = BTreeSet::from([index]);
    }
    next
}

/// Drop indices that no longer name a point
pub fn retain_valid(selection: &mut BTreeSet<usize>, len: usize) {
    selection.retain(|&i| i < len);
}
