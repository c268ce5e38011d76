use crate::buffer::BufferError;
#[cfg(feature = "raw-entry")]
use crate::buffer::FixedBufferView;
use crate::mutation::{MutationStrategy, StandardByteMutation};
use rand::{Rng, RngCore};
use std::process;

/// An externally supplied override for the generic mutation strategy.
///
/// Mirrors the legacy contract `(buffer, current_len, max_len, seed) ->
/// new_len`: the callee may rewrite the first `max_len` bytes of `buffer`
/// and returns the new logical length. At most one capability exists per
/// harness; it is resolved once at adapter construction and absent by
/// default.
pub type CustomMutatorFn = Box<dyn Fn(&mut [u8], usize, usize, u32) -> usize + Send + Sync>;

/// Bridges the generic mutation strategy to both buffer models and owns the
/// per-process mutation wiring: the configured maximum input length, the
/// dictionary and seed pools, and the optional custom-mutator capability.
///
/// The adapter is built once at harness start. The pools it caches are
/// read-only for its lifetime; every `mutate`/`raw_mutate` call is an
/// independent, trial-scoped unit of work.
pub struct ByteDomainAdapter<M: MutationStrategy = StandardByteMutation> {
    max_len: usize,
    strategy: M,
    dictionary: Vec<Vec<u8>>,
    seeds: Vec<Vec<u8>>,
    custom_mutator: Option<CustomMutatorFn>,
}

impl ByteDomainAdapter<StandardByteMutation> {
    /// Creates an adapter around the default mutation strategy.
    pub fn new(max_len: usize) -> Self {
        Self::with_strategy(max_len, StandardByteMutation)
    }
}

impl<M: MutationStrategy> ByteDomainAdapter<M> {
    /// Creates an adapter around an externally supplied strategy.
    pub fn with_strategy(max_len: usize, strategy: M) -> Self {
        Self {
            max_len,
            strategy,
            dictionary: Vec::new(),
            seeds: Vec::new(),
            custom_mutator: None,
        }
    }

    /// Installs the dictionary pool. The loader runs exactly once, here;
    /// its result is cached for the adapter's lifetime and handed to the
    /// strategy as splice material.
    pub fn with_dictionary(mut self, loader: impl FnOnce() -> Vec<Vec<u8>>) -> Self {
        self.dictionary = loader();
        self
    }

    /// Installs the seed pool. The loader runs exactly once, here.
    pub fn with_seeds(mut self, loader: impl FnOnce() -> Vec<Vec<u8>>) -> Self {
        self.seeds = loader();
        self
    }

    /// Registers the at-most-one custom-mutator capability.
    pub fn with_custom_mutator(mut self, mutator: CustomMutatorFn) -> Self {
        self.custom_mutator = Some(mutator);
        self
    }

    /// Configured maximum input length.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// The cached dictionary tokens.
    pub fn dictionary(&self) -> &[Vec<u8>] {
        &self.dictionary
    }

    /// The cached seed-corpus entries.
    pub fn seed_inputs(&self) -> &[Vec<u8>] {
        &self.seeds
    }

    /// Picks one seed entry uniformly, or `None` if the pool is empty.
    pub fn random_seed<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&[u8]> {
        if self.seeds.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.seeds.len());
        Some(&self.seeds[index])
    }

    /// Mutates an owned buffer in place.
    ///
    /// With a registered capability the call is a pass-through: the buffer's
    /// backing storage is grown to the effective maximum (tail contents
    /// unspecified), the capability is invoked with the legacy argument
    /// tuple, and the buffer is truncated to whatever length it returns
    /// (clamped to the maximum). Without one, the generic strategy runs
    /// bounded by the configured maximum length.
    ///
    /// With `only_shrink` set the effective maximum is the current length,
    /// so the result is never longer than the input.
    pub fn mutate<R: Rng + ?Sized>(
        &self,
        buf: &mut Vec<u8>,
        rng: &mut R,
        only_shrink: bool,
    ) -> Result<(), BufferError> {
        if let Some(capability) = &self.custom_mutator {
            let current = buf.len();
            let new_max = if only_shrink { current } else { self.max_len };
            buf.resize(new_max, 0);
            let new_len = capability(buf.as_mut_slice(), current, new_max, rng.next_u32());
            buf.truncate(new_len.min(new_max));
            return Ok(());
        }
        self.strategy
            .mutate(buf, rng, &self.dictionary, self.max_len, only_shrink)
    }

    /// The legacy raw-buffer mutation entry point.
    ///
    /// Wraps the caller-owned `(data, size)` pair in a [`FixedBufferView`]
    /// and applies the generic strategy directly through the view, with
    /// zero copying; the view's physical capacity is the bound. Returns the
    /// resulting logical length.
    ///
    /// Compiled in only when no alternative fuzzing-engine integration
    /// supplies its own mutation hook (the `raw-entry` feature, a
    /// build-time choice, not a runtime branch).
    #[cfg(feature = "raw-entry")]
    pub fn raw_mutate<R: Rng + ?Sized>(
        &self,
        data: &mut [u8],
        size: usize,
        rng: &mut R,
    ) -> Result<usize, BufferError> {
        let mut view = FixedBufferView::new(data, size)?;
        self.strategy
            .mutate(&mut view, rng, &self.dictionary, usize::MAX, false)?;
        Ok(view.len())
    }
}

/// The poisoned legacy cross-over hook.
///
/// Cross-over mutation is not supported by this harness. The hook is
/// defined unconditionally, independent of the `raw-entry` feature, so any
/// legacy caller of the classic cross-over contract is guaranteed to hit
/// this diagnostic rather than a silently absent symbol. It never returns.
pub fn cross_over(_data1: &[u8], _data2: &[u8], _out: &mut [u8], _seed: u32) -> ! {
    eprintln!("cross-over mutation is not supported by this harness");
    process::exit(1);
}
