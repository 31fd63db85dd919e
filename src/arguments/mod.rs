//! # Argument Contracts
//!
//! An [`Argument`] is the typed parsing seam between the grammar tree and
//! the many independent argument kinds (integer, word, mention, ...). A
//! contract consumes one or more tokens from the reader and either produces
//! an [`ArgValue`](crate::models::ArgValue) or a typed failure.
//!
//! Contracts may leave the reader partially advanced on failure; the tree
//! walker rewinds to its per-attempt mark before trying the next sibling.

pub mod mention;
pub mod primitives;

use crate::{core::reader::{ReaderError, TokenReader}, models::ArgValue};
use thiserror::Error;

/// Failure modes of an argument contract.
#[derive(Error, Debug)]
pub enum ArgumentError {
    /// The input tokens do not form a valid value of this kind. This is a
    /// grammar-level failure: the walker rewinds and retries siblings.
    #[error("{0}")]
    Invalid(String),

    /// The reader ran out of tokens mid-parse. Also grammar-level.
    #[error(transparent)]
    Exhausted(#[from] ReaderError),

    /// A collaborator failed in a way that is not a property of the input
    /// (broken lookup table, poisoned lock, ...). Halts the walk
    /// immediately; never retried against siblings.
    #[error("{0}")]
    Fatal(String),
}

impl ArgumentError {
    /// True for the variant that must abort the walk instead of driving
    /// sibling backtracking.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

/// A typed parsing function: token(s) in, value or typed failure out.
///
/// Implementations must be cheap to call and side-effect-free apart from
/// advancing the reader. They may consume a variable number of tokens.
pub trait Argument: Send + Sync {
    fn parse(&self, reader: &mut TokenReader) -> Result<ArgValue, ArgumentError>;
}
