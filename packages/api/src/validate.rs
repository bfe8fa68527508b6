//! # Generic validation runner
//!
//! Entity validators describe their business rules as an ordered list of
//! step tags and implement [`Validator::apply`] for each tag.
//! [`Validator::run`] walks the list in order and stops at the first
//! failure, so no step ever observes a half-validated record. Steps may
//! mutate the candidate — normalize a field, replace a plaintext credential
//! with its hash, fill a default — and later steps see those mutations.
//!
//! The same runner drives both the user chain and the much smaller recipe
//! chain; adding an entity means writing a step enum and an `apply`, not a
//! new execution mechanism.

use crate::error::Error;

/// An ordered, fail-fast validation pipeline over candidate records.
pub trait Validator {
    /// Record type the pipeline validates and mutates.
    type Candidate;
    /// Tag naming a single validation step.
    type Step: Copy;

    /// Apply one step, mutating the candidate in place.
    fn apply(
        &self,
        step: Self::Step,
        candidate: &mut Self::Candidate,
    ) -> impl std::future::Future<Output = Result<(), Error>>;

    /// Run every step in order, returning the first failure.
    fn run(
        &self,
        candidate: &mut Self::Candidate,
        steps: &[Self::Step],
    ) -> impl std::future::Future<Output = Result<(), Error>> {
        async move {
            for &step in steps {
                self.apply(step, candidate).await?;
            }
            Ok(())
        }
    }
}
