use crate::buffer::{BufferError, FixedBufferView};
use std::ops::Range;

/// The common surface of a mutable byte sequence.
///
/// This is the seam that lets one mutation algorithm drive two incompatible
/// buffer models: an owned, freely resizable `Vec<u8>` and a caller-owned
/// [`FixedBufferView`] of fixed physical capacity. Mutation strategies are
/// written against this trait and never care which model backs it; the
/// bounded implementation reports `CapacityExceeded` where the owned one
/// would simply grow.
pub trait ByteSequence {
    /// Current logical length.
    fn len(&self) -> usize;

    /// Returns `true` if the logical length is zero.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upper bound on the logical length. Owned sequences are effectively
    /// unbounded and report `usize::MAX`.
    fn capacity(&self) -> usize;

    /// The logically live bytes.
    fn as_slice(&self) -> &[u8];

    /// Mutable access to the logically live bytes.
    fn as_mut_slice(&mut self) -> &mut [u8];

    /// Inserts `value` at `at`, shifting the tail right.
    fn insert(&mut self, at: usize, value: u8) -> Result<(), BufferError>;

    /// Removes and returns the byte at `at`, shifting the tail left.
    fn erase(&mut self, at: usize) -> Result<u8, BufferError>;

    /// Removes `range`, compacting the remainder contiguously.
    fn erase_range(&mut self, range: Range<usize>) -> Result<(), BufferError>;

    /// Shrinks the logical length to `new_len` if smaller.
    fn truncate(&mut self, new_len: usize);
}

impl ByteSequence for Vec<u8> {
    fn len(&self) -> usize {
        self.len()
    }

    fn capacity(&self) -> usize {
        usize::MAX
    }

    fn as_slice(&self) -> &[u8] {
        self
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        self
    }

    fn insert(&mut self, at: usize, value: u8) -> Result<(), BufferError> {
        if at > self.len() {
            return Err(BufferError::IndexOutOfBounds {
                index: at,
                len: self.len(),
            });
        }
        Vec::insert(self, at, value);
        Ok(())
    }

    fn erase(&mut self, at: usize) -> Result<u8, BufferError> {
        if at >= self.len() {
            return Err(BufferError::IndexOutOfBounds {
                index: at,
                len: self.len(),
            });
        }
        Ok(self.remove(at))
    }

    fn erase_range(&mut self, range: Range<usize>) -> Result<(), BufferError> {
        if range.start > range.end || range.end > self.len() {
            return Err(BufferError::InvalidRange {
                start: range.start,
                end: range.end,
                len: self.len(),
            });
        }
        self.drain(range);
        Ok(())
    }

    fn truncate(&mut self, new_len: usize) {
        Vec::truncate(self, new_len);
    }
}

impl ByteSequence for FixedBufferView<'_> {
    fn len(&self) -> usize {
        FixedBufferView::len(self)
    }

    fn capacity(&self) -> usize {
        FixedBufferView::capacity(self)
    }

    fn as_slice(&self) -> &[u8] {
        FixedBufferView::as_slice(self)
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        FixedBufferView::as_mut_slice(self)
    }

    fn insert(&mut self, at: usize, value: u8) -> Result<(), BufferError> {
        FixedBufferView::insert(self, at, value)
    }

    fn erase(&mut self, at: usize) -> Result<u8, BufferError> {
        FixedBufferView::erase(self, at)
    }

    fn erase_range(&mut self, range: Range<usize>) -> Result<(), BufferError> {
        FixedBufferView::erase_range(self, range)
    }

    fn truncate(&mut self, new_len: usize) {
        FixedBufferView::truncate(self, new_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_impl_matches_owned_semantics() {
        let mut seq: Vec<u8> = vec![1, 2, 3];
        assert_eq!(ByteSequence::len(&seq), 3);
        assert_eq!(ByteSequence::capacity(&seq), usize::MAX);

        ByteSequence::insert(&mut seq, 1, 9).unwrap();
        assert_eq!(ByteSequence::as_slice(&seq), &[1, 9, 2, 3]);

        let removed = ByteSequence::erase(&mut seq, 0).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(ByteSequence::as_slice(&seq), &[9, 2, 3]);

        ByteSequence::erase_range(&mut seq, 1..3).unwrap();
        assert_eq!(ByteSequence::as_slice(&seq), &[9]);
    }

    #[test]
    fn vec_impl_rejects_out_of_bounds_positions() {
        let mut seq: Vec<u8> = vec![1, 2];
        assert!(ByteSequence::insert(&mut seq, 3, 0).is_err());
        assert!(ByteSequence::erase(&mut seq, 2).is_err());
        assert!(ByteSequence::erase_range(&mut seq, 0..3).is_err());
        assert_eq!(seq, vec![1, 2], "Failed operations must not modify the vec");
    }

    #[test]
    fn both_models_agree_through_the_trait() {
        fn exercise<S: ByteSequence>(seq: &mut S) -> Vec<u8> {
            seq.insert(0, b'a').unwrap();
            seq.insert(1, b'c').unwrap();
            seq.insert(1, b'b').unwrap();
            seq.erase(2).unwrap();
            seq.as_slice().to_vec()
        }

        let mut owned: Vec<u8> = Vec::new();
        let mut backing = [0u8; 8];
        let mut view = FixedBufferView::new(&mut backing, 0).unwrap();

        assert_eq!(
            exercise(&mut owned),
            exercise(&mut view),
            "The same operations must produce the same bytes in both buffer models"
        );
        assert_eq!(owned, b"ab");
    }
}
