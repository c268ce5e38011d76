use crate::adapter::ByteDomainAdapter;
use crate::buffer::BufferError;
use crate::config::HarnessConfig;
use crate::loader::{LoaderError, read_dictionary, read_seeds};
use crate::mutation::{MutationStrategy, StandardByteMutation};
use rand::Rng;
use std::process;

/// Builds the per-process adapter from configuration.
///
/// Dictionary and seed pools load here, once, and stay read-only for the
/// rest of the run. A malformed dictionary is fatal: the process aborts
/// with a non-zero status and a diagnostic naming the offending file.
/// Empty paths load nothing and are not an error.
pub fn build_adapter(config: &HarnessConfig) -> Result<ByteDomainAdapter, anyhow::Error> {
    let max_len = config.inputs.max_input_len;

    let seeds = read_seeds(&config.inputs.corpus_path, max_len)
        .map_err(|e| anyhow::anyhow!("Failed to load seed corpus: {}", e))?;

    let dictionary = match read_dictionary(&config.inputs.dictionary_path) {
        Ok(tokens) => tokens,
        Err(error @ LoaderError::DictionaryParse { .. }) => {
            eprintln!("{error}");
            process::exit(1);
        }
        Err(error) => return Err(anyhow::anyhow!("Failed to load dictionary: {}", error)),
    };

    Ok(ByteDomainAdapter::new(max_len)
        .with_dictionary(|| dictionary)
        .with_seeds(|| seeds))
}

/// The harness entry point: one registered fuzz trial around an opaque
/// target-under-test.
///
/// Each trial draws one mutated byte sequence from the adapter (informed by
/// the loaded dictionary and seed pool) and invokes the target with it. The
/// target reports findings solely by terminating the process; no error
/// value comes back from it and none is synthesized. Nothing persists
/// across trials beyond the read-only pools.
pub struct FuzzHarness<T, M = StandardByteMutation>
where
    T: Fn(&[u8]),
    M: MutationStrategy,
{
    adapter: ByteDomainAdapter<M>,
    target: T,
}

impl<T, M> FuzzHarness<T, M>
where
    T: Fn(&[u8]),
    M: MutationStrategy,
{
    /// Composes a harness from an already-built adapter and the target.
    pub fn new(adapter: ByteDomainAdapter<M>, target: T) -> Self {
        Self { adapter, target }
    }

    /// The adapter backing this harness.
    pub fn adapter(&self) -> &ByteDomainAdapter<M> {
        &self.adapter
    }

    /// Executes a single trial and returns the input that was fed to the
    /// target.
    pub fn run_one<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<u8>, BufferError> {
        let mut input = match self.adapter.random_seed(rng) {
            Some(seed) => seed.to_vec(),
            None => Vec::new(),
        };
        self.adapter.mutate(&mut input, rng, false)?;
        (self.target)(&input);
        Ok(input)
    }

    /// Runs `trials` independent trials back to back, synchronously.
    pub fn run<R: Rng + ?Sized>(&self, trials: u64, rng: &mut R) -> Result<(), BufferError> {
        for _ in 0..trials {
            self.run_one(rng)?;
        }
        Ok(())
    }
}

impl<T> FuzzHarness<T, StandardByteMutation>
where
    T: Fn(&[u8]),
{
    /// Convenience constructor: builds the adapter from configuration and
    /// wraps `target`.
    pub fn from_config(config: &HarnessConfig, target: T) -> Result<Self, anyhow::Error> {
        Ok(Self::new(build_adapter(config)?, target))
    }
}
