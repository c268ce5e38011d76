use crate::buffer::BufferError;
use crate::sequence::ByteSequence;
use rand::Rng;

/// Smallest value mixed into a byte by the flip operation.
const FLIP_DELTA_MIN: u8 = 1;
/// Largest value mixed into a byte by the flip operation.
const FLIP_DELTA_MAX: u8 = 15;

/// A pluggable byte-sequence mutation strategy.
///
/// Strategies are the externally supplied half of the bridge: they decide
/// *which* transformation to apply, while the [`ByteSequence`] they operate
/// on decides how insert/erase behave for the underlying buffer model.
/// A strategy must uphold two bounds regardless of the sequence it is given:
///
/// * the resulting length never exceeds `min(max_size, seq.capacity())`;
/// * with `only_shrink` set, the resulting length never exceeds the input
///   length.
///
/// # Type Parameters (on `mutate`)
/// * `S`: The sequence model being mutated; either an owned `Vec<u8>` or a
///   bounded [`FixedBufferView`](crate::buffer::FixedBufferView).
/// * `R`: The random number generator driving mutation decisions.
pub trait MutationStrategy: Send + Sync {
    /// Applies one mutation step to `seq`.
    ///
    /// # Arguments
    /// * `seq`: The sequence to mutate in place.
    /// * `rng`: Randomness source, exclusive to the calling trial.
    /// * `dictionary`: Literal byte strings available as splice material.
    ///   May be empty.
    /// * `max_size`: Logical upper bound on the result length, on top of
    ///   whatever physical capacity `seq` itself enforces.
    /// * `only_shrink`: When `true`, only length-reducing operations are
    ///   permitted.
    fn mutate<S, R>(
        &self,
        seq: &mut S,
        rng: &mut R,
        dictionary: &[Vec<u8>],
        max_size: usize,
        only_shrink: bool,
    ) -> Result<(), BufferError>
    where
        S: ByteSequence,
        R: Rng + ?Sized;
}

/// The operations `StandardByteMutation` chooses among.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    FlipByte,
    InsertByte,
    EraseByte,
    EraseRange,
    SpliceToken,
}

/// The default byte-level mutation strategy.
///
/// Picks uniformly among byte-flip, random-byte insert, single-byte erase,
/// range erase, and dictionary-token splice, after filtering out operations
/// that cannot apply at the current length and capacity. Because the filter
/// runs first, the strategy never attempts an out-of-bounds write and never
/// surfaces `CapacityExceeded` to its caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardByteMutation;

impl StandardByteMutation {
    fn splice_fits(dictionary: &[Vec<u8>], len: usize, cap: usize) -> bool {
        dictionary
            .iter()
            .any(|token| !token.is_empty() && len + token.len() <= cap)
    }
}

impl MutationStrategy for StandardByteMutation {
    fn mutate<S, R>(
        &self,
        seq: &mut S,
        rng: &mut R,
        dictionary: &[Vec<u8>],
        max_size: usize,
        only_shrink: bool,
    ) -> Result<(), BufferError>
    where
        S: ByteSequence,
        R: Rng + ?Sized,
    {
        let cap = max_size.min(seq.capacity());
        if seq.len() > cap {
            // An oversized input is brought back under the bound before any
            // other operation is considered.
            seq.truncate(cap);
        }
        let len = seq.len();

        if only_shrink {
            if len == 0 {
                return Ok(());
            }
            let start = rng.random_range(0..len);
            let end = rng.random_range(start..len) + 1;
            return seq.erase_range(start..end);
        }

        let mut candidates: Vec<Operation> = Vec::with_capacity(5);
        if len > 0 {
            candidates.push(Operation::FlipByte);
            candidates.push(Operation::EraseByte);
        }
        if len >= 2 {
            candidates.push(Operation::EraseRange);
        }
        if len < cap {
            candidates.push(Operation::InsertByte);
        }
        if Self::splice_fits(dictionary, len, cap) {
            candidates.push(Operation::SpliceToken);
        }
        if candidates.is_empty() {
            // Empty sequence with zero headroom: nothing can change.
            return Ok(());
        }

        match candidates[rng.random_range(0..candidates.len())] {
            Operation::FlipByte => {
                let delta = rng.random_range(FLIP_DELTA_MIN..=FLIP_DELTA_MAX);
                let at = rng.random_range(0..len);
                let bytes = seq.as_mut_slice();
                bytes[at] = bytes[at].wrapping_add(delta);
                Ok(())
            }
            Operation::InsertByte => {
                let at = rng.random_range(0..=len);
                let value = rng.random_range(0..=u8::MAX);
                seq.insert(at, value)
            }
            Operation::EraseByte => {
                let at = rng.random_range(0..len);
                seq.erase(at).map(|_| ())
            }
            Operation::EraseRange => {
                let start = rng.random_range(0..len);
                let end = rng.random_range(start..len) + 1;
                seq.erase_range(start..end)
            }
            Operation::SpliceToken => {
                let fitting: Vec<&Vec<u8>> = dictionary
                    .iter()
                    .filter(|token| !token.is_empty() && len + token.len() <= cap)
                    .collect();
                let token = fitting[rng.random_range(0..fitting.len())];
                let at = rng.random_range(0..=len);
                for (offset, byte) in token.iter().enumerate() {
                    seq.insert(at + offset, *byte)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::FixedBufferView;
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    const TEST_MAX: usize = 64;

    #[test]
    fn only_shrink_never_grows_the_sequence() {
        let strategy = StandardByteMutation;
        let mut rng = ChaCha8Rng::from_seed([3u8; 32]);
        for _ in 0..500 {
            let mut seq: Vec<u8> = vec![0xAB; 16];
            let before = seq.len();
            strategy
                .mutate(&mut seq, &mut rng, &[], TEST_MAX, true)
                .unwrap();
            assert!(
                seq.len() < before,
                "only_shrink must strictly remove bytes from a non-empty input, got {} -> {}",
                before,
                seq.len()
            );
        }
    }

    #[test]
    fn only_shrink_on_empty_sequence_is_a_noop() {
        let strategy = StandardByteMutation;
        let mut rng = ChaCha8Rng::from_seed([4u8; 32]);
        let mut seq: Vec<u8> = Vec::new();
        strategy
            .mutate(&mut seq, &mut rng, &[], TEST_MAX, true)
            .unwrap();
        assert!(seq.is_empty());
    }

    #[test]
    fn mutated_length_never_exceeds_max_size() {
        let strategy = StandardByteMutation;
        let mut rng = ChaCha8Rng::from_seed([5u8; 32]);
        let dictionary = vec![b"token".to_vec(), b"longer-token".to_vec()];
        let mut seq: Vec<u8> = Vec::new();
        for _ in 0..2000 {
            strategy
                .mutate(&mut seq, &mut rng, &dictionary, 32, false)
                .unwrap();
            assert!(
                seq.len() <= 32,
                "Length {} escaped the configured maximum of 32",
                seq.len()
            );
        }
    }

    #[test]
    fn oversized_input_is_brought_back_under_the_bound() {
        let strategy = StandardByteMutation;
        let mut rng = ChaCha8Rng::from_seed([6u8; 32]);
        let mut seq: Vec<u8> = vec![1; 100];
        strategy.mutate(&mut seq, &mut rng, &[], 10, false).unwrap();
        assert!(seq.len() <= 10);
    }

    #[test]
    fn fixed_view_mutation_respects_physical_capacity() {
        let strategy = StandardByteMutation;
        let mut rng = ChaCha8Rng::from_seed([7u8; 32]);
        let mut backing = [0u8; 12];
        backing[..4].copy_from_slice(b"seed");
        let mut view = FixedBufferView::new(&mut backing, 4).unwrap();
        for _ in 0..1000 {
            strategy
                .mutate(&mut view, &mut rng, &[], usize::MAX, false)
                .unwrap();
            assert!(
                view.len() <= view.capacity(),
                "View length {} exceeded capacity {}",
                view.len(),
                view.capacity()
            );
        }
    }

    #[test]
    fn dictionary_tokens_are_spliced_in_verbatim() {
        let strategy = StandardByteMutation;
        let mut rng = ChaCha8Rng::from_seed([8u8; 32]);
        let dictionary = vec![b"HEADER".to_vec()];
        let mut spliced = false;
        for _ in 0..500 {
            let mut seq: Vec<u8> = b"seed".to_vec();
            strategy
                .mutate(&mut seq, &mut rng, &dictionary, TEST_MAX, false)
                .unwrap();
            if seq.windows(6).any(|w| w == b"HEADER") {
                spliced = true;
                break;
            }
        }
        assert!(
            spliced,
            "The dictionary token should appear intact within 500 single-step mutations"
        );
    }

    #[test]
    fn empty_sequence_with_zero_headroom_is_left_alone() {
        let strategy = StandardByteMutation;
        let mut rng = ChaCha8Rng::from_seed([9u8; 32]);
        let mut backing: [u8; 0] = [];
        let mut view = FixedBufferView::new(&mut backing, 0).unwrap();
        strategy
            .mutate(&mut view, &mut rng, &[], TEST_MAX, false)
            .unwrap();
        assert_eq!(view.len(), 0);
    }
}
