pub mod cards;
pub mod error;
pub mod ledger;
pub mod matching;
pub mod normalize;
pub mod round;
pub mod sampler;
pub mod scoring;
pub mod state;
pub mod store;
pub mod wordlist;

pub use error::{LoadError, RoundError, StoreError};
pub use ledger::UsageLedger;
pub use sampler::WeightedSampler;
pub use scoring::score;
pub use state::Session;
