//! Structured error types for input validation at the shell boundary.

use thiserror::Error;

/// Errors raised while turning user input into a search request.
///
/// The search engine itself is total over its inputs and never fails;
/// these variants only surface from [`crate::session::form`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimateError {
    /// None of the four input groups was filled in completely.
    #[error(
        "enter either sensitivity & specificity & n, PPV & NPV & n, PLR & NLR & n, \
         or TP, TN, FP, FN, and leave the other fields blank"
    )]
    NoInputGroup,

    /// More than one input group was supplied at once.
    #[error("only one input group may be supplied, got: {0}")]
    AmbiguousInput(String),

    /// A count-valued field held a fractional or non-finite number.
    #[error("{field} must be a whole number, got {value}")]
    NotAnInteger { field: &'static str, value: f64 },

    /// Out-of-range or otherwise unusable value.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Sample size above the configured enumeration guard.
    #[error("sample size {requested} exceeds the configured limit of {limit}")]
    SampleSizeLimit { requested: u64, limit: u32 },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EstimateError>;
