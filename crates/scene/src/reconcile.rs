//! Keyed enter / update / exit diffing.
//!
//! `reconcile` only computes the diff; what happens to each bucket (create
//! an element, start a transition, schedule removal) is supplied by the
//! caller through [`JoinEffects`].

use std::collections::{BTreeMap, BTreeSet};

/// Side effects applied per diff bucket.
pub trait JoinEffects<K, T> {
    fn enter(&mut self, key: K, datum: T);
    fn update(&mut self, key: K, datum: T);
    fn exit(&mut self, key: K);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diff<K, T> {
    /// Keys not currently rendered, in data order.
    pub entered: Vec<(K, T)>,
    /// Keys already rendered, in data order.
    pub updated: Vec<(K, T)>,
    /// Rendered keys absent from the new data, in key order.
    pub exited: Vec<K>,
}

impl<K, T> Diff<K, T> {
    pub fn is_noop(&self) -> bool {
        self.entered.is_empty() && self.updated.is_empty() && self.exited.is_empty()
    }

    /// Runs enter, then update, then exit effects.
    pub fn apply<E: JoinEffects<K, T>>(self, effects: &mut E) {
        for (key, datum) in self.entered {
            effects.enter(key, datum);
        }
        for (key, datum) in self.updated {
            effects.update(key, datum);
        }
        for key in self.exited {
            effects.exit(key);
        }
    }
}

/// Diffs the currently rendered keys against new keyed data.
///
/// If `next` repeats a key, the later datum replaces the earlier one while
/// keeping the earlier position.
pub fn reconcile<K, T, C, N>(current: C, next: N) -> Diff<K, T>
where
    K: Ord + Clone,
    C: IntoIterator<Item = K>,
    N: IntoIterator<Item = (K, T)>,
{
    let current: BTreeSet<K> = current.into_iter().collect();

    let mut ordered: Vec<(K, T)> = Vec::new();
    let mut position: BTreeMap<K, usize> = BTreeMap::new();
    for (key, datum) in next {
        match position.get(&key) {
            Some(&at) => ordered[at].1 = datum,
            None => {
                position.insert(key.clone(), ordered.len());
                ordered.push((key, datum));
            }
        }
    }

    let mut entered = Vec::new();
    let mut updated = Vec::new();
    for (key, datum) in ordered {
        if current.contains(&key) {
            updated.push((key, datum));
        } else {
            entered.push((key, datum));
        }
    }
    let exited = current
        .into_iter()
        .filter(|k| !position.contains_key(k))
        .collect();

    Diff {
        entered,
        updated,
        exited,
    }
}

#[cfg(test)]
mod tests {
    use super::{JoinEffects, reconcile};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Log(Vec<String>);

    impl JoinEffects<u32, &'static str> for Log {
        fn enter(&mut self, key: u32, datum: &'static str) {
            self.0.push(format!("enter {key} {datum}"));
        }
        fn update(&mut self, key: u32, datum: &'static str) {
            self.0.push(format!("update {key} {datum}"));
        }
        fn exit(&mut self, key: u32) {
            self.0.push(format!("exit {key}"));
        }
    }

    #[test]
    fn splits_into_buckets() {
        let diff = reconcile(vec![1, 2, 3], vec![(3, "c"), (4, "d"), (1, "a")]);
        assert_eq!(diff.entered, vec![(4, "d")]);
        assert_eq!(diff.updated, vec![(3, "c"), (1, "a")]);
        assert_eq!(diff.exited, vec![2]);
    }

    #[test]
    fn unchanged_data_only_updates() {
        let diff = reconcile(vec![1, 2], vec![(1, "a"), (2, "b")]);
        assert!(diff.entered.is_empty());
        assert!(diff.exited.is_empty());
        assert_eq!(diff.updated.len(), 2);
    }

    #[test]
    fn duplicate_keys_keep_first_position_and_last_datum() {
        let diff = reconcile(Vec::<u32>::new(), vec![(7, "x"), (8, "y"), (7, "z")]);
        assert_eq!(diff.entered, vec![(7, "z"), (8, "y")]);
    }

    #[test]
    fn effects_run_in_bucket_order() {
        let mut log = Log::default();
        reconcile(vec![1, 2], vec![(2, "b"), (3, "c")]).apply(&mut log);
        assert_eq!(log.0, vec!["enter 3 c", "update 2 b", "exit 1"]);
    }

    #[test]
    fn empty_to_empty_is_noop() {
        let diff = reconcile(Vec::<u32>::new(), Vec::<(u32, ())>::new());
        assert!(diff.is_noop());
    }
}
