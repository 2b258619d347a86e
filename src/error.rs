//! Errors raised while running a [`Reduction`](crate::reduction::Reduction).

use std::num::ParseIntError;

use thiserror::Error;

/// Result alias used throughout this crate.
pub type Result<T, E = ReduceError> = std::result::Result<T, E>;

/// An error that aborts a whole reduction.
///
/// No partial output is ever produced alongside an error: either the
/// reduction finishes and yields its output, or it yields one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReduceError {
    /// The requested execution mode cannot be honored by the reduction,
    /// e.g. parallel execution of a reduction without a combiner.
    #[error("`{reduction}` cannot run in the requested mode: {reason}")]
    Configuration {
        /// Name of the offending reduction.
        reduction: &'static str,
        /// What is missing.
        reason: ConfigError,
    },

    /// An input token could not be parsed.
    #[error("invalid token `{token}`: {reason}")]
    Parse {
        /// The token as it was given.
        token: String,
        /// Why it was rejected.
        #[source]
        reason: TokenError,
    },
}

/// Why a reduction refused an execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Parallel execution needs a way to merge partial accumulators.
    #[error("no combiner to merge partitions")]
    MissingCombiner,

    /// The reduction declares itself concurrent but cannot accumulate
    /// into a shared accumulator.
    #[error("declared concurrent without a shared accumulator")]
    MissingShared,
}

/// Why a range token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// A bound is not a non-negative integer.
    #[error("not a valid index")]
    InvalidNumber(#[from] ParseIntError),

    /// Indices are 1-based.
    #[error("index 0 is out of range, indices start at 1")]
    ZeroIndex,

    /// `low-high` with `low > high`.
    #[error("range {low}-{high} is descending")]
    Descending { low: usize, high: usize },

    /// An index above the largest supported one.
    #[error("index {index} is out of range, the largest is {max}")]
    TooLarge { index: usize, max: usize },

    /// More than two bounds, or an empty bound.
    #[error("expected `n` or `low-high`")]
    Malformed,
}

impl ReduceError {
    pub(crate) fn configuration(reduction: &'static str, reason: ConfigError) -> Self {
        tracing::warn!(reduction, %reason, "refusing execution mode");
        Self::Configuration { reduction, reason }
    }

    pub(crate) fn parse(token: &str, reason: TokenError) -> Self {
        Self::Parse {
            token: token.to_owned(),
            reason,
        }
    }

    /// Returns `true` if this is a [`Configuration`](ReduceError::Configuration) error.
    #[inline]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Returns `true` if this is a [`Parse`](ReduceError::Parse) error.
    #[inline]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = ReduceError::Configuration {
            reduction: "Joining",
            reason: ConfigError::MissingCombiner,
        };
        assert_eq!(
            err.to_string(),
            "`Joining` cannot run in the requested mode: no combiner to merge partitions"
        );

        let err = ReduceError::parse("5-2", TokenError::Descending { low: 5, high: 2 });
        assert!(err.is_parse());
        assert_eq!(err.to_string(), "invalid token `5-2`: range 5-2 is descending");
    }

    #[test]
    fn parse_int_source() {
        let source = "a".parse::<usize>().unwrap_err();
        let err = ReduceError::parse("a-3", source.clone().into());
        assert_eq!(
            err,
            ReduceError::Parse {
                token: "a-3".into(),
                reason: TokenError::InvalidNumber(source),
            }
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
