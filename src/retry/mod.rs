//! Retrying operations that are not done yet.
//!
//! [`run`] drives an operation callback until it succeeds, fails hard, its
//! backoff policy gives up or the caller cancels. Policies are built fresh
//! per call by a [`BackoffProvider`], so concurrent reconciliations never
//! share timing state. Time and randomness come from injectable sources.

mod backoff;
mod clock;
mod context;
mod error;
mod executor;
mod retryability;


pub use backoff::*;
pub use clock::*;
pub use context::*;
pub use error::*;
pub use executor::*;
pub use retryability::*;
