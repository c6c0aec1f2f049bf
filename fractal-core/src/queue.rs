//! Work queue of pending segments.
//!
//! Segments are stored in an index-addressed arena. Each slot links to the
//! next pending slot by index, and the queue tracks the head and tail
//! indices, so popping the head and splicing after any tracked position
//! are both O(1). Popped slots are pushed onto a free list and reused,
//! which keeps the arena as large as the widest frontier rather than the
//! whole tree.

use crate::{segment::Segment, types::SegmentId};

/// Where a pair of children is placed in the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertDiscipline {
    /// Behind everything already pending (breadth-first flavored).
    Tail,
    /// Ahead of everything already pending, right where the parent was
    /// popped from (a depth-first burst for that lineage).
    AfterCurrent,
}

#[derive(Debug)]
struct Slot {
    segment: Option<Segment>,
    next: Option<SegmentId>,
}

#[derive(Debug, Default)]
pub struct SegmentQueue {
    slots: Vec<Slot>,
    free: Vec<SegmentId>,
    head: Option<SegmentId>,
    tail: Option<SegmentId>,
    len: usize,
}

impl SegmentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all pending work and makes `trunk` the only pending segment.
    pub fn push_trunk(&mut self, trunk: Segment) -> SegmentId {
        self.clear();
        self.insert_after(None, trunk)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    #[inline]
    pub fn has_next(&self) -> bool {
        self.head.is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn tail(&self) -> Option<SegmentId> {
        self.tail
    }

    /// Removes and returns the earliest pending segment.
    pub fn pop_next(&mut self) -> Option<Segment> {
        let id = self.head?;
        let slot = &mut self.slots[id];
        let segment = slot.segment.take();
        self.head = slot.next.take();
        if self.head.is_none() {
            self.tail = None;
        }
        self.free.push(id);
        self.len -= 1;
        segment
    }

    /// Splices `segment` in right after the pending slot `at`, or at the
    /// front of the queue when `at` is `None`.
    ///
    /// ### Returns
    /// The id of the slot now holding `segment`.
    ///
    /// ### Panics
    /// Panics if `at` does not name a pending slot.
    pub fn insert_after(&mut self, at: Option<SegmentId>, segment: Segment) -> SegmentId {
        let next = match at {
            Some(prev) => {
                assert!(
                    self.slots[prev].segment.is_some(),
                    "slot {prev} is not pending"
                );
                self.slots[prev].next
            }
            None => self.head,
        };

        let id = self.alloc(segment, next);
        match at {
            Some(prev) => self.slots[prev].next = Some(id),
            None => self.head = Some(id),
        }
        if next.is_none() {
            self.tail = Some(id);
        }
        self.len += 1;
        id
    }

    /// Inserts two siblings, keeping `first` ahead of `second`.
    pub fn insert_pair(&mut self, discipline: InsertDiscipline, first: Segment, second: Segment) {
        let at = match discipline {
            InsertDiscipline::Tail => self.tail,
            InsertDiscipline::AfterCurrent => None,
        };
        let first_id = self.insert_after(at, first);
        self.insert_after(Some(first_id), second);
    }

    /// Pending segments in pop order.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let id = cursor?;
            let slot = &self.slots[id];
            cursor = slot.next;
            slot.segment.as_ref()
        })
    }

    fn alloc(&mut self, segment: Segment, next: Option<SegmentId>) -> SegmentId {
        let slot = Slot {
            segment: Some(segment),
            next,
        };
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = slot;
                id
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        }
    }
}
