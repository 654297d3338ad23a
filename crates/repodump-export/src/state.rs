//! Run state: the global pending queue and the per-dump inline frontier.

use std::collections::VecDeque;
use std::hash::BuildHasherDefault;

use hashbrown::{HashMap, HashSet};
use repodump_common::{ObjectId, QName};
use repodump_repository::ObjectRef;
use rustc_hash::FxHasher;

pub(crate) type FxHashMap<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher>>;
pub(crate) type FxHashSet<T> = HashSet<T, BuildHasherDefault<FxHasher>>;

/// Retrievable objects discovered by reference and not yet exported.
///
/// Insertion ordered. Pushing an id that is already queued keeps its
/// original position; an id removed and pushed again goes to the back.
#[derive(Debug, Default)]
pub struct PendingQueue {
    order: VecDeque<(u64, ObjectId)>,
    entries: FxHashMap<ObjectId, (u64, QName)>,
    next_seq: u64,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `id` unless it is already queued. Returns whether it was added.
    pub fn push(&mut self, id: ObjectId, class: QName) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(id.clone(), (seq, class));
        self.order.push_back((seq, id));
        true
    }

    /// Drop `id` from the queue if present.
    pub fn remove(&mut self, id: &ObjectId) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.entries.contains_key(id)
    }

    /// Take the oldest queued entry.
    pub fn pop(&mut self) -> Option<(ObjectId, QName)> {
        while let Some((seq, id)) = self.order.pop_front() {
            // Entries removed out of band leave stale slots behind.
            if self.entries.get(&id).map(|(live, _)| *live) == Some(seq) {
                if let Some((_, class)) = self.entries.remove(&id) {
                    return Some((id, class));
                }
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Non-retrievable objects waiting to be embedded after the current element.
#[derive(Default)]
pub(crate) struct Frontier {
    order: VecDeque<(ObjectId, ObjectRef)>,
    queued: FxHashSet<ObjectId>,
}

impl Frontier {
    /// Add an object unless it is already waiting.
    pub fn insert(&mut self, id: ObjectId, object: ObjectRef) -> bool {
        if !self.queued.insert(id.clone()) {
            return false;
        }
        self.order.push_back((id, object));
        true
    }

    pub fn pop(&mut self) -> Option<(ObjectId, ObjectRef)> {
        let (id, object) = self.order.pop_front()?;
        self.queued.remove(&id);
        Some((id, object))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(name: &str) -> QName {
        QName::new("custom", name)
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = PendingQueue::new();
        queue.push("a".into(), q("A"));
        queue.push("b".into(), q("B"));
        queue.push("c".into(), q("C"));
        let order: Vec<String> = std::iter::from_fn(|| queue.pop())
            .map(|(id, _)| id.to_string())
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_push_never_moves_existing_entry() {
        let mut queue = PendingQueue::new();
        assert!(queue.push("a".into(), q("A")));
        assert!(queue.push("b".into(), q("B")));
        assert!(!queue.push("a".into(), q("Other")));
        assert_eq!(queue.len(), 2);

        let (id, class) = queue.pop().unwrap();
        assert_eq!(id.as_str(), "a");
        assert_eq!(class, q("A"));
    }

    #[test]
    fn test_removed_then_requeued_goes_to_back() {
        let mut queue = PendingQueue::new();
        queue.push("a".into(), q("A"));
        queue.push("b".into(), q("B"));
        assert!(queue.remove(&"a".into()));
        queue.push("a".into(), q("A"));

        assert_eq!(queue.pop().unwrap().0.as_str(), "b");
        assert_eq!(queue.pop().unwrap().0.as_str(), "a");
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_remove_missing() {
        let mut queue = PendingQueue::new();
        assert!(!queue.remove(&"x".into()));
        assert!(!queue.contains(&"x".into()));
    }
}
