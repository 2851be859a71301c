use std::collections::BTreeSet;

use foundation::ids::RecordIndex;

/// Deterministic set of selected record indices.
///
/// Ordering contract:
/// - Iteration yields indices in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    indices: BTreeSet<RecordIndex>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(index: RecordIndex) -> Self {
        let mut s = Self::new();
        s.insert(index);
        s
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: RecordIndex) -> bool {
        self.indices.contains(&index)
    }

    /// Returns `true` if the set changed.
    pub fn insert(&mut self, index: RecordIndex) -> bool {
        self.indices.insert(index)
    }

    /// Returns `true` if the set changed.
    pub fn remove(&mut self, index: RecordIndex) -> bool {
        self.indices.remove(&index)
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            indices: self.indices.union(&other.indices).copied().collect(),
        }
    }

    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            indices: self.indices.intersection(&other.indices).copied().collect(),
        }
    }

    /// Set difference: `self \ other`.
    pub fn diff(&self, other: &Self) -> Self {
        Self {
            indices: self.indices.difference(&other.indices).copied().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = RecordIndex> + '_ {
        self.indices.iter().copied()
    }
}

impl FromIterator<RecordIndex> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = RecordIndex>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SelectionSet;
    use foundation::ids::RecordIndex;

    fn r(idx: u32) -> RecordIndex {
        RecordIndex(idx)
    }

    #[test]
    fn insert_remove_contains_and_len() {
        let mut s = SelectionSet::new();
        assert!(s.is_empty());
        assert!(!s.contains(r(1)));

        assert!(s.insert(r(1)));
        assert!(s.contains(r(1)));
        assert_eq!(s.len(), 1);
        assert!(!s.insert(r(1)));
        assert_eq!(s.len(), 1);

        assert!(s.remove(r(1)));
        assert!(!s.contains(r(1)));
        assert!(!s.remove(r(1)));
    }

    #[test]
    fn collecting_deduplicates_and_sorts() {
        let s: SelectionSet = [r(10), r(2), r(65), r(2)].into_iter().collect();
        let got: Vec<u32> = s.iter().map(RecordIndex::get).collect();
        assert_eq!(got, vec![2, 10, 65]);
    }

    #[test]
    fn set_ops_union_intersect_diff() {
        let a: SelectionSet = [r(1), r(2), r(100)].into_iter().collect();
        let b: SelectionSet = [r(2), r(3), r(101)].into_iter().collect();

        let u: Vec<u32> = a.union(&b).iter().map(RecordIndex::get).collect();
        assert_eq!(u, vec![1, 2, 3, 100, 101]);

        let i: Vec<u32> = a.intersect(&b).iter().map(RecordIndex::get).collect();
        assert_eq!(i, vec![2]);

        let d: Vec<u32> = a.diff(&b).iter().map(RecordIndex::get).collect();
        assert_eq!(d, vec![1, 100]);
    }
}
