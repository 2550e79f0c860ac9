//! Error type shared by the compiler, tokenizer and hydrator.
//!
//! Every variant here describes a defect in declared metadata or a caller
//! mistake. Input text that matches nothing is never an error: it surfaces as
//! unmatched tokens and lowers the coverage metric instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("variant `{variant}` references undeclared field `{field}` in its template")]
    UnknownField { variant: &'static str, field: String },

    #[error("variant `{variant}` declares field `{field}` but its template never uses it")]
    UnreferencedField { variant: &'static str, field: &'static str },

    #[error("variant `{variant}` declares field `{field}` more than once")]
    DuplicateField { variant: &'static str, field: &'static str },

    #[error("variant `{variant}` has an unbalanced `{delimiter}` in its template")]
    UnbalancedTemplate { variant: &'static str, delimiter: char },

    #[error("variant `{0}` is registered more than once")]
    DuplicateVariant(&'static str),

    #[error("variant `{0}` is referenced but was never registered")]
    UndeclaredVariant(&'static str),

    #[error("nested variants form a cycle: {}", .chain.join(" -> "))]
    RecursiveVariant { chain: Vec<&'static str> },

    #[error("compiled pattern for `{variant}` is not a valid regex: {source}")]
    InvalidPattern {
        variant: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("captured text `{text}` for field `{field}` matches no member of `{family}`")]
    NoMatchingMember { field: &'static str, family: &'static str, text: String },

    #[error("variant `{variant}` no longer matches its own token text `{text}`")]
    HydrationMismatch { variant: &'static str, text: String },

    #[error("minimum unmatched run length must be 1 or 2, got {0}")]
    InvalidRunLength(usize),
}

impl Error {
    /// True when the error points at declared variant metadata rather than at
    /// caller-supplied options.
    pub fn is_defect(&self) -> bool {
        !matches!(self, Error::InvalidRunLength(_))
    }
}
