//! Binary min-heap of node indices that can lower a priority in place.
//!
//! The heap only stores indices. Priorities and the back-reference to each node's heap position
//! live in the caller's per-node table, reached through [`HeapSlots`]. Lowering a priority then
//! only needs a sift-up from the recorded position instead of a search through the array.

use log::trace;

use crate::grid::NodeIndex;

/// Per-node storage the heap reads priorities from and writes positions into
pub trait HeapSlots {
    fn priority(&self, node: NodeIndex) -> u32;
    fn queue_pos(&self, node: NodeIndex) -> Option<usize>;
    fn set_queue_pos(&mut self, node: NodeIndex, pos: Option<usize>);
}

#[derive(Clone, Debug, Default)]
pub struct IndexedMinHeap {
    items: Vec<NodeIndex>,
    capacity: usize,
}

impl IndexedMinHeap {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds a node. Ignored when the heap is full or the node is already queued.
    pub fn insert<S: HeapSlots + ?Sized>(&mut self, node: NodeIndex, slots: &mut S) {
        if self.items.len() >= self.capacity {
            trace!("heap full, dropping node {}", node);
            return;
        }
        if slots.queue_pos(node).is_some() {
            return;
        }

        self.items.push(node);
        let pos = self.items.len() - 1;
        slots.set_queue_pos(node, Some(pos));
        self.sift_up(pos, slots);
    }

    /// Removes and returns the node with the lowest priority, `None` when empty
    pub fn extract_min<S: HeapSlots + ?Sized>(&mut self, slots: &mut S) -> Option<NodeIndex> {
        let last = self.items.pop()?;
        let min = if self.items.is_empty() {
            last
        } else {
            let min = std::mem::replace(&mut self.items[0], last);
            slots.set_queue_pos(last, Some(0));
            self.sift_down(0, slots);
            min
        };
        slots.set_queue_pos(min, None);
        Some(min)
    }

    /// Restores the heap order after the caller lowered the priority of `node`
    pub fn decrease_priority_notify<S: HeapSlots + ?Sized>(
        &mut self,
        node: NodeIndex,
        slots: &mut S,
    ) {
        if let Some(pos) = slots.queue_pos(node) {
            self.sift_up(pos, slots);
        }
    }

    fn sift_up<S: HeapSlots + ?Sized>(&mut self, mut pos: usize, slots: &mut S) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if slots.priority(self.items[parent]) <= slots.priority(self.items[pos]) {
                break;
            }
            self.swap(pos, parent, slots);
            pos = parent;
        }
    }

    fn sift_down<S: HeapSlots + ?Sized>(&mut self, mut pos: usize, slots: &mut S) {
        loop {
            let mut smallest = pos;
            for child in [2 * pos + 1, 2 * pos + 2] {
                if child < self.items.len()
                    && slots.priority(self.items[child]) < slots.priority(self.items[smallest])
                {
                    smallest = child;
                }
            }
            if smallest == pos {
                break;
            }
            self.swap(pos, smallest, slots);
            pos = smallest;
        }
    }

    fn swap<S: HeapSlots + ?Sized>(&mut self, a: usize, b: usize, slots: &mut S) {
        self.items.swap(a, b);
        slots.set_queue_pos(self.items[a], Some(a));
        slots.set_queue_pos(self.items[b], Some(b));
    }

    /// Checks the heap order and that every queued node knows its own position
    pub fn is_consistent<S: HeapSlots + ?Sized>(&self, slots: &S) -> bool {
        self.items.iter().enumerate().all(|(pos, &node)| {
            let ordered = pos == 0 || {
                let parent = self.items[(pos - 1) / 2];
                slots.priority(parent) <= slots.priority(node)
            };
            ordered && slots.queue_pos(node) == Some(pos)
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Debug, Default)]
    struct Slots {
        priority: Vec<u32>,
        pos: Vec<Option<usize>>,
    }

    impl Slots {
        fn new(priority: Vec<u32>) -> Self {
            let pos = vec![None; priority.len()];
            Self { priority, pos }
        }
    }

    impl HeapSlots for Slots {
        fn priority(&self, node: NodeIndex) -> u32 {
            self.priority[node]
        }

        fn queue_pos(&self, node: NodeIndex) -> Option<usize> {
            self.pos[node]
        }

        fn set_queue_pos(&mut self, node: NodeIndex, pos: Option<usize>) {
            self.pos[node] = pos;
        }
    }

    #[test]
    fn test_extracts_in_priority_order() {
        let mut slots = Slots::new(vec![5, 3, 8, 1, 9, 2]);
        let mut heap = IndexedMinHeap::with_capacity(6);
        for node in 0..6 {
            heap.insert(node, &mut slots);
        }
        assert!(heap.is_consistent(&slots));

        let order: Vec<_> = std::iter::from_fn(|| heap.extract_min(&mut slots)).collect();
        assert_eq!(order, vec![3, 5, 1, 0, 2, 4]);
        assert!(slots.pos.iter().all(Option::is_none));
    }

    #[test]
    fn test_empty_and_full() {
        let mut slots = Slots::new(vec![1, 2, 3]);
        let mut heap = IndexedMinHeap::with_capacity(2);
        assert_eq!(heap.extract_min(&mut slots), None);

        heap.insert(0, &mut slots);
        heap.insert(1, &mut slots);
        heap.insert(2, &mut slots);
        assert_eq!(heap.len(), 2);
        assert_eq!(slots.pos[2], None);

        // inserting a queued node again is ignored
        heap.extract_min(&mut slots);
        heap.insert(1, &mut slots);
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_decrease_priority() {
        let mut slots = Slots::new(vec![u32::MAX; 5]);
        slots.priority[0] = 0;
        let mut heap = IndexedMinHeap::with_capacity(5);
        for node in 0..5 {
            heap.insert(node, &mut slots);
        }
        assert_eq!(heap.extract_min(&mut slots), Some(0));

        slots.priority[4] = 7;
        heap.decrease_priority_notify(4, &mut slots);
        slots.priority[2] = 3;
        heap.decrease_priority_notify(2, &mut slots);
        assert!(heap.is_consistent(&slots));

        assert_eq!(heap.extract_min(&mut slots), Some(2));
        assert_eq!(heap.extract_min(&mut slots), Some(4));

        // not queued anymore, nothing happens
        slots.priority[4] = 0;
        heap.decrease_priority_notify(4, &mut slots);
        assert!(heap.is_consistent(&slots));
        assert_eq!(heap.len(), 2);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(usize),
        Extract,
        Decrease(usize, u32),
    }

    fn op(nodes: usize) -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..nodes).prop_map(Op::Insert),
            Just(Op::Extract),
            (0..nodes, 0u32..1000).prop_map(|(n, by)| Op::Decrease(n, by)),
        ]
    }

    proptest! {
        #[test]
        fn heap_stays_consistent(
            priorities in prop::collection::vec(0u32..1000, 1..40),
            ops in prop::collection::vec(op(40), 0..200),
        ) {
            let n = priorities.len();
            let mut slots = Slots::new(priorities);
            let mut heap = IndexedMinHeap::with_capacity(n);
            let mut last_extracted: Option<u32> = None;

            for op in ops {
                match op {
                    Op::Insert(node) => {
                        heap.insert(node % n, &mut slots);
                        last_extracted = None;
                    }
                    Op::Extract => {
                        if let Some(node) = heap.extract_min(&mut slots) {
                            let p = slots.priority[node];
                            if let Some(last) = last_extracted {
                                prop_assert!(last <= p);
                            }
                            prop_assert_eq!(slots.pos[node], None);
                            last_extracted = Some(p);
                        }
                    }
                    Op::Decrease(node, by) => {
                        let node = node % n;
                        slots.priority[node] = slots.priority[node].saturating_sub(by);
                        heap.decrease_priority_notify(node, &mut slots);
                        last_extracted = None;
                    }
                }
                prop_assert!(heap.is_consistent(&slots));
                prop_assert!(heap.len() <= n);
            }
        }
    }
}
