use std::ops::{Index, IndexMut, Range};
use thiserror::Error;

/// Errors raised by bounded byte-sequence operations.
///
/// The legacy raw-buffer contract treats capacity overruns as a caller-side
/// precondition violation. This crate strengthens that into a checked
/// invariant: any operation that would grow a view past the memory it wraps
/// reports `CapacityExceeded` instead of corrupting memory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The initial logical length handed to a view is larger than the
    /// physical region backing it.
    #[error("logical length {len} exceeds buffer capacity {capacity}")]
    LengthExceedsCapacity { len: usize, capacity: usize },

    /// A mutating operation would grow the sequence past its capacity.
    #[error("operation would grow buffer past its capacity of {capacity} bytes")]
    CapacityExceeded { capacity: usize },

    /// An index was outside the logical length of the sequence.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A range was empty-inverted or reached past the logical length.
    #[error("range {start}..{end} is invalid for length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },
}

/// A bounded, non-owning mutable view over caller-owned memory.
///
/// Wraps a raw region of fixed physical capacity (the full extent of the
/// borrowed slice) together with a separate logical length. This is the
/// bridge between an allocation-based mutation algorithm, which expects a
/// growable sequence, and the legacy fixed-capacity buffer contract: the
/// algorithm inserts and erases through the view while the view guarantees
/// it never writes outside the region it was given.
///
/// Views are trial-scoped. One is created fresh for each raw-buffer
/// mutation call and discarded when the call returns; nothing persists.
#[derive(Debug)]
pub struct FixedBufferView<'a> {
    data: &'a mut [u8],
    len: usize,
}

impl<'a> FixedBufferView<'a> {
    /// Wraps `data` with an initial logical length of `len`.
    ///
    /// Returns `BufferError::LengthExceedsCapacity` if `len` is larger than
    /// the slice itself.
    pub fn new(data: &'a mut [u8], len: usize) -> Result<Self, BufferError> {
        if len > data.len() {
            return Err(BufferError::LengthExceedsCapacity {
                len,
                capacity: data.len(),
            });
        }
        Ok(Self { data, len })
    }

    /// Current logical length of the view.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the logical length is zero.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Physical capacity of the wrapped region. The logical length can
    /// never exceed this.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The logically live prefix of the wrapped region.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Mutable access to the logically live prefix.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data[..self.len]
    }

    /// Checked indexed read.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.as_slice().get(index).copied()
    }

    /// Iterates over the logically live bytes.
    pub fn iter(&self) -> std::slice::Iter<'_, u8> {
        self.as_slice().iter()
    }

    /// Inserts `value` at `at`, shifting the run `at..len` one slot right.
    ///
    /// Fails with `CapacityExceeded` if the view is already full, and with
    /// `IndexOutOfBounds` if `at > len`. All untouched bytes keep their
    /// relative order.
    pub fn insert(&mut self, at: usize, value: u8) -> Result<(), BufferError> {
        if self.len == self.capacity() {
            return Err(BufferError::CapacityExceeded {
                capacity: self.capacity(),
            });
        }
        if at > self.len {
            return Err(BufferError::IndexOutOfBounds {
                index: at,
                len: self.len,
            });
        }
        self.data.copy_within(at..self.len, at + 1);
        self.data[at] = value;
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the byte at `at`, shifting the tail left.
    pub fn erase(&mut self, at: usize) -> Result<u8, BufferError> {
        if at >= self.len {
            return Err(BufferError::IndexOutOfBounds {
                index: at,
                len: self.len,
            });
        }
        let removed = self.data[at];
        self.data.copy_within(at + 1..self.len, at);
        self.len -= 1;
        Ok(removed)
    }

    /// Removes `range` and compacts the remainder contiguously, preserving
    /// the order of everything outside the range.
    pub fn erase_range(&mut self, range: Range<usize>) -> Result<(), BufferError> {
        if range.start > range.end || range.end > self.len {
            return Err(BufferError::InvalidRange {
                start: range.start,
                end: range.end,
                len: self.len,
            });
        }
        self.data.copy_within(range.end..self.len, range.start);
        self.len -= range.end - range.start;
        Ok(())
    }

    /// Shrinks the logical length to `new_len`; a no-op if `new_len` is not
    /// smaller than the current length.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len < self.len {
            self.len = new_len;
        }
    }
}

impl Index<usize> for FixedBufferView<'_> {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.as_slice()[index]
    }
}

impl IndexMut<usize> for FixedBufferView<'_> {
    fn index_mut(&mut self, index: usize) -> &mut u8 {
        &mut self.as_mut_slice()[index]
    }
}

impl<'b> IntoIterator for &'b FixedBufferView<'_> {
    type Item = &'b u8;
    type IntoIter = std::slice::Iter<'b, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_length_beyond_capacity() {
        let mut backing = [0u8; 4];
        let result = FixedBufferView::new(&mut backing, 5);
        assert_eq!(
            result.err(),
            Some(BufferError::LengthExceedsCapacity {
                len: 5,
                capacity: 4
            }),
            "A logical length larger than the backing slice must be rejected"
        );
    }

    #[test]
    fn insert_then_erase_restores_original_content() {
        // Capacity 10, content "ABCDE", logical length 5.
        let mut backing = [0u8; 10];
        backing[..5].copy_from_slice(b"ABCDE");
        let mut view = FixedBufferView::new(&mut backing, 5).unwrap();

        view.insert(2, b'X').unwrap();
        assert_eq!(view.as_slice(), b"ABXCDE");
        assert_eq!(view.len(), 6);

        let removed = view.erase(2).unwrap();
        assert_eq!(removed, b'X');
        assert_eq!(view.as_slice(), b"ABCDE");
        assert_eq!(view.len(), 5);
    }

    #[test]
    fn insert_shifts_only_the_tail_and_never_writes_past_capacity() {
        for at in 0..=3 {
            let mut backing = [0xEEu8; 6];
            backing[..3].copy_from_slice(&[10, 20, 30]);
            let mut view = FixedBufferView::new(&mut backing, 3).unwrap();
            view.insert(at, 99).unwrap();
            assert_eq!(view.len(), 4, "Insert at {} should grow length by 1", at);

            let mut expected = vec![10u8, 20, 30];
            expected.insert(at, 99);
            assert_eq!(view.as_slice(), expected.as_slice());
        }
    }

    #[test]
    fn insert_into_full_view_reports_capacity_exceeded() {
        let mut backing = [1u8, 2, 3];
        let mut view = FixedBufferView::new(&mut backing, 3).unwrap();
        assert_eq!(
            view.insert(1, 9),
            Err(BufferError::CapacityExceeded { capacity: 3 }),
            "A full view must refuse to grow instead of writing out of bounds"
        );
        assert_eq!(view.as_slice(), &[1, 2, 3], "Failed insert must not modify content");
    }

    #[test]
    fn insert_past_length_reports_index_out_of_bounds() {
        let mut backing = [0u8; 8];
        let mut view = FixedBufferView::new(&mut backing, 2).unwrap();
        assert_eq!(
            view.insert(3, 7),
            Err(BufferError::IndexOutOfBounds { index: 3, len: 2 })
        );
    }

    #[test]
    fn erase_range_compacts_remainder_in_order() {
        let mut backing = *b"ABCDEFGH";
        let mut view = FixedBufferView::new(&mut backing, 8).unwrap();
        view.erase_range(2..5).unwrap();
        assert_eq!(view.as_slice(), b"ABFGH");
        assert_eq!(view.len(), 5);
    }

    #[test]
    fn erase_range_rejects_inverted_and_overlong_ranges() {
        let mut backing = [0u8; 4];
        let mut view = FixedBufferView::new(&mut backing, 4).unwrap();
        assert!(view.erase_range(3..2).is_err());
        assert!(view.erase_range(2..5).is_err());
        assert_eq!(view.len(), 4, "Failed erase_range must not change length");
    }

    #[test]
    fn erase_on_empty_view_reports_index_out_of_bounds() {
        let mut backing = [0u8; 4];
        let mut view = FixedBufferView::new(&mut backing, 0).unwrap();
        assert_eq!(
            view.erase(0),
            Err(BufferError::IndexOutOfBounds { index: 0, len: 0 })
        );
    }

    #[test]
    fn indexing_iteration_and_truncate_follow_logical_length() {
        let mut backing = *b"WXYZ";
        let mut view = FixedBufferView::new(&mut backing, 3).unwrap();
        assert_eq!(view[0], b'W');
        assert_eq!(view.get(2), Some(b'Y'));
        assert_eq!(view.get(3), None, "Index 3 is past the logical length");

        view[1] = b'!';
        let collected: Vec<u8> = view.iter().copied().collect();
        assert_eq!(collected, b"W!Y");

        view.truncate(1);
        assert_eq!(view.as_slice(), b"W");
        view.truncate(5);
        assert_eq!(view.len(), 1, "Truncate to a larger length is a no-op");
    }
}
