//! Run-length list codec
//!
//! Ordered sequences of repeatable items are stored expanded and written
//! as `(value, count)` runs of consecutive equal items. Deltas between two
//! sequences are computed as multiset differences.
//!
//! Author: Moroya Sakamoto

/// A run of `count` consecutive equal items. `count` is never 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run<T> {
    pub value: T,
    pub count: usize,
}

impl<T> Run<T> {
    pub fn new(value: T, count: usize) -> Self {
        Self { value, count }
    }
}

/// Collapse maximal runs of consecutive equal items.
pub fn encode_runs<T: Clone + PartialEq>(items: &[T]) -> Vec<Run<T>> {
    let mut runs: Vec<Run<T>> = Vec::new();
    for item in items {
        match runs.last_mut() {
            Some(run) if run.value == *item => run.count += 1,
            _ => runs.push(Run::new(item.clone(), 1)),
        }
    }
    runs
}

/// Expand runs back into the item sequence.
pub fn decode_runs<T: Clone>(runs: &[Run<T>]) -> Vec<T> {
    let total = runs.iter().map(|r| r.count).sum();
    let mut items = Vec::with_capacity(total);
    for run in runs {
        items.extend(core::iter::repeat(run.value.clone()).take(run.count));
    }
    items
}

/// Index of the run containing item `index`, and the item index where that
/// run starts.
pub fn run_at<T: PartialEq>(items: &[T], index: usize) -> Option<(usize, usize)> {
    if index >= items.len() {
        return None;
    }
    let mut run = 0;
    let mut start = 0;
    for i in 1..=index {
        if items[i] != items[i - 1] {
            run += 1;
            start = i;
        }
    }
    Some((run, start))
}

// ── Multiset delta ─────────────────────────────────────────────────────

/// Items to add and remove to turn a base sequence into a working one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDelta<T> {
    /// In working order
    pub add: Vec<T>,
    /// In base order
    pub remove: Vec<T>,
}

impl<T> ListDelta<T> {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// Multiset difference: each working item consumes one equal base item.
/// Unconsumed working items are added, unconsumed base items removed.
pub fn list_delta<T: Clone + PartialEq>(working: &[T], base: &[T]) -> ListDelta<T> {
    let mut consumed = vec![false; base.len()];
    let mut add = Vec::new();
    for item in working {
        let slot = base
            .iter()
            .enumerate()
            .position(|(i, b)| !consumed[i] && b == item);
        match slot {
            Some(i) => consumed[i] = true,
            None => add.push(item.clone()),
        }
    }
    let remove = base
        .iter()
        .zip(&consumed)
        .filter(|(_, used)| !**used)
        .map(|(b, _)| b.clone())
        .collect();
    ListDelta { add, remove }
}

/// How an ordered list should be written.
#[derive(Debug, Clone, PartialEq)]
pub enum ListPatch<T> {
    /// Nothing to write
    Unchanged,
    /// No base: the whole working list, no add/remove framing
    Full(Vec<T>),
    /// Every base item removed and nothing added: one wholesale removal
    RemoveAll,
    /// Nothing in common with the base (or only the order changed):
    /// the working list written bare, replacing the base list
    Replace(Vec<T>),
    /// Itemized additions and removals
    Partial(ListDelta<T>),
}

/// Decide how to write `working` relative to an optional `base`.
pub fn plan_list<T: Clone + PartialEq>(working: &[T], base: Option<&[T]>) -> ListPatch<T> {
    let Some(base) = base else {
        return if working.is_empty() {
            ListPatch::Unchanged
        } else {
            ListPatch::Full(working.to_vec())
        };
    };
    if working == base {
        return ListPatch::Unchanged;
    }
    let delta = list_delta(working, base);
    if delta.is_empty() {
        // Same items, different order.
        ListPatch::Replace(working.to_vec())
    } else if !base.is_empty() && delta.remove.len() == base.len() {
        if working.is_empty() {
            ListPatch::RemoveAll
        } else {
            ListPatch::Replace(delta.add)
        }
    } else {
        ListPatch::Partial(delta)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
