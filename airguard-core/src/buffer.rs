//! Fixed-Capacity Ring Buffer for Sample History
//!
//! ## Overview
//!
//! Backing store of the [`SlidingWindow`](crate::window::SlidingWindow). The
//! capacity is chosen at runtime from configuration but never changes after
//! construction, so all storage is allocated once up front.
//!
//! ### Why a Ring Buffer?
//!
//! The window only ever needs the most recent N samples:
//! - O(1) insertion (overwrites oldest when full)
//! - O(1) access to the newest element
//! - O(n) iteration, oldest first
//! - No reallocation after construction
//!
//! ### Memory Layout
//!
//! ```text
//! RingBuffer with capacity 5, after 7 pushes (A..G):
//! ┌─────┬─────┬─────┬─────┬─────┐
//! │  F  │  G  │  C  │  D  │  E  │  ← physical slots
//! └─────┴─────┴─────┴─────┴─────┘
//!                ↑
//!                └── write_pos = 2 (next overwrite, also the oldest)
//!
//! Logical view (oldest → newest): C D E F G
//! ```

use core::num::NonZeroUsize;

/// Ring buffer that keeps the most recent `capacity` items
///
/// ## Internal Invariants
///
/// - `write_pos < capacity`
/// - `len <= capacity`
/// - Iteration yields items in insertion order
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    /// Storage slots, `None` until first written
    data: Vec<Option<T>>,

    /// Index where the next write will occur
    write_pos: usize,

    /// Current number of valid items
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer holding at most `capacity` items
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        let capacity = capacity.get();
        let mut data = Vec::with_capacity(capacity);
        data.resize_with(capacity, || None);
        Self { data, write_pos: 0, len: 0 }
    }

    /// Adds an item, returning the evicted oldest item when full
    ///
    /// ```rust
    /// # use airguard_core::buffer::RingBuffer;
    /// # use core::num::NonZeroUsize;
    /// let mut buf = RingBuffer::with_capacity(NonZeroUsize::new(3).unwrap());
    /// buf.push(1);
    /// buf.push(2);
    /// buf.push(3);
    ///
    /// // Fourth push evicts the first
    /// assert_eq!(buf.push(4), Some(1));
    /// assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    /// ```
    pub fn push(&mut self, item: T) -> Option<T> {
        let capacity = self.capacity();
        let evicted = self.data[self.write_pos].replace(item);
        self.write_pos = (self.write_pos + 1) % capacity;

        if self.len < capacity {
            self.len += 1;
            None
        } else {
            evicted
        }
    }

    /// Maximum number of items retained
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of items currently held
    pub fn len(&self) -> usize {
        self.len
    }

    /// True until the first push
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recently pushed item
    pub fn last(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        let capacity = self.capacity();
        let idx = (self.write_pos + capacity - 1) % capacity;
        self.data[idx].as_ref()
    }

    /// Item by logical index (0 = oldest, len-1 = newest)
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }

        let actual_index = if self.len < self.capacity() {
            // Not wrapped yet, data starts at 0
            index
        } else {
            // Full: the oldest item sits at write_pos
            (self.write_pos + index) % self.capacity()
        };

        self.data[actual_index].as_ref()
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> RingBufferIter<'_, T> {
        RingBufferIter { buffer: self, index: 0 }
    }
}

/// Iterator over ring buffer contents, oldest first
pub struct RingBufferIter<'a, T> {
    buffer: &'a RingBuffer<T>,
    index: usize,
}

impl<'a, T> Iterator for RingBufferIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<'a, T> ExactSizeIterator for RingBufferIter<'a, T> {}
