//! Copy-on-write mutation helpers for sequence-valued state cells.
//!
//! Each helper clones the current [`Vector`] (an O(1) structural share),
//! edits the clone and hands it to [`StateCell::set`]. The previous sequence is
//! never touched, so holders of an older snapshot keep seeing it unchanged.
//!
//! Indices are not validated: out-of-range `start`/`delete_count` values are
//! clamped to the sequence bounds, the same way a plain truncation would.

use im::Vector;

use crate::StateCell;

/// Append `value`, commit, and return the new sequence.
pub fn push_state<T>(cell: &StateCell<Vector<T>>, value: T) -> Vector<T>
where
    T: Clone + Send + Sync + 'static,
{
    let mut next = cell.get();
    next.push_back(value);
    cell.set(next.clone());
    next
}

/// Remove `delete_count` entries starting at `start`, then append `append` to
/// the **tail** of what remains.
///
/// The appended values are not inserted at `start`; they always land after the
/// last surviving entry. Navigation relies on this: truncating a branch and
/// appending the replacement happen in a single call.
pub fn splice_state<T, I>(
    cell: &StateCell<Vector<T>>,
    start: usize,
    delete_count: usize,
    append: I,
) -> Vector<T>
where
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = T>,
{
    let mut next = cell.get();
    let start = start.min(next.len());
    let end = start.saturating_add(delete_count).min(next.len());
    let rest = next.split_off(end);
    next.truncate(start);
    next.append(rest);
    next.extend(append);
    cell.set(next.clone());
    next
}

/// Remove the last entry, commit, and return it.
///
/// An empty sequence is still committed (as a new empty sequence) and yields
/// `None`.
pub fn pop_state<T>(cell: &StateCell<Vector<T>>) -> Option<T>
where
    T: Clone + Send + Sync + 'static,
{
    let mut next = cell.get();
    let popped = next.pop_back();
    cell.set(next);
    popped
}

/// Overwrite the entry at `index`, commit, and return the new sequence.
///
/// Out-of-range indices leave the contents unchanged but still commit.
pub fn replace_state<T>(cell: &StateCell<Vector<T>>, index: usize, value: T) -> Vector<T>
where
    T: Clone + Send + Sync + 'static,
{
    let mut next = cell.get();
    if let Some(slot) = next.get_mut(index) {
        *slot = value;
    }
    cell.set(next.clone());
    next
}

#[cfg(test)]
mod tests {
    use im::{Vector, vector};

    use super::{pop_state, push_state, replace_state, splice_state};
    use crate::StateCell;

    fn cell_of(values: &[&'static str]) -> StateCell<Vector<&'static str>> {
        StateCell::new(values.iter().copied().collect())
    }

    #[test]
    fn push_leaves_previous_snapshot_untouched() {
        let cell = cell_of(&["a"]);
        let before = cell.get();
        let after = push_state(&cell, "b");

        assert_eq!(before, vector!["a"]);
        assert_eq!(after, vector!["a", "b"]);
        assert_eq!(cell.get(), after);
        assert_eq!(cell.version(), 1);
    }

    #[test]
    fn splice_appends_at_tail_not_at_start() {
        let cell = cell_of(&["a", "b", "c", "d"]);
        let next = splice_state(&cell, 1, 1, ["x"]);
        assert_eq!(next, vector!["a", "c", "d", "x"]);
    }

    #[test]
    fn splice_truncating_branch_then_appending() {
        let cell = cell_of(&["a", "b", "c"]);
        let next = splice_state(&cell, 1, 2, ["x"]);
        assert_eq!(next, vector!["a", "x"]);
    }

    #[test]
    fn splice_clamps_out_of_range_arguments() {
        let cell = cell_of(&["a", "b"]);
        assert_eq!(splice_state(&cell, 1, 99, ["z"]), vector!["a", "z"]);
        assert_eq!(splice_state(&cell, 10, 3, ["q"]), vector!["a", "z", "q"]);
        assert_eq!(splice_state(&cell, 0, 0, None), vector!["a", "z", "q"]);
    }

    #[test]
    fn pop_returns_last_and_handles_empty() {
        let cell = cell_of(&["a", "b"]);
        assert_eq!(pop_state(&cell), Some("b"));
        assert_eq!(pop_state(&cell), Some("a"));
        assert_eq!(pop_state(&cell), None);
        assert!(cell.get().is_empty());
        assert_eq!(cell.version(), 3);
    }

    #[test]
    fn replace_overwrites_single_slot() {
        let cell = cell_of(&["a", "b", "c"]);
        assert_eq!(replace_state(&cell, 1, "x"), vector!["a", "x", "c"]);
        assert_eq!(replace_state(&cell, 7, "y"), vector!["a", "x", "c"]);
    }
}
