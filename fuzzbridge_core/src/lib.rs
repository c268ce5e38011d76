pub mod adapter;
pub mod buffer;
pub mod config;
pub mod harness;
pub mod loader;
pub mod mutation;
pub mod sequence;

pub use adapter::{ByteDomainAdapter, CustomMutatorFn, cross_over};
pub use buffer::{BufferError, FixedBufferView};
pub use config::{HarnessConfig, InputSettings, TrialSettings};
pub use harness::{FuzzHarness, build_adapter};
pub use loader::{
    DictionaryError, FileEntry, LoaderError, parse_dictionary, read_dictionary, read_seeds,
};
pub use mutation::{MutationStrategy, StandardByteMutation};
pub use sequence::ByteSequence;
