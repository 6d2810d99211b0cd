/// Bounded FIFO over a pre-allocated slot array.
/// Pushing into a full buffer evicts the oldest entry.
pub struct RingBuffer<T> {
    slots: Vec<T>,
    /// Slot holding the oldest entry.
    oldest: usize,
    len: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer needs a non-zero capacity");
        Self {
            slots: vec![T::default(); capacity],
            oldest: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn slot(&self, i: usize) -> usize {
        (self.oldest + i) % self.slots.len()
    }

    pub fn push(&mut self, value: T) {
        if self.len < self.capacity() {
            let idx = self.slot(self.len);
            self.slots[idx] = value;
            self.len += 1;
        } else {
            self.slots[self.oldest] = value;
            self.oldest = self.slot(1);
        }
    }

    pub fn newest(&self) -> Option<&T> {
        self.len.checked_sub(1).map(|i| &self.slots[self.slot(i)])
    }

    /// Forget every entry. Keeps the allocation.
    pub fn clear(&mut self) {
        self.oldest = 0;
        self.len = 0;
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        (0..self.len).map(move |i| &self.slots[self.slot(i)])
    }

    /// The newest `n` entries (or fewer), oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &T> {
        self.iter().skip(self.len.saturating_sub(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_first() {
        let mut ring = RingBuffer::new(3);
        for v in 1..=5u32 {
            ring.push(v);
        }
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(ring.newest(), Some(&5));
    }

    #[test]
    fn recent_takes_tail() {
        let mut ring = RingBuffer::new(8);
        for v in 0..6u32 {
            ring.push(v);
        }
        let tail: Vec<u32> = ring.recent(2).copied().collect();
        assert_eq!(tail, vec![4, 5]);
        assert_eq!(ring.recent(100).count(), 6);
    }

    #[test]
    fn clear_resets() {
        let mut ring = RingBuffer::new(2);
        ring.push(1u8);
        ring.push(2u8);
        ring.push(3u8);
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.newest(), None);
        ring.push(9);
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![9]);
    }
}
